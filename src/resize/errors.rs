use crate::resize::responses::{ResizeErrorCode, ResizeErrorResponse};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use image::ImageError;
use std::io;
use std::time::Duration;
use thiserror::Error;

const MEBIBYTE: usize = 1024 * 1024;

/// Everything the resize endpoint reports to its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResizeError {
    MissingField,
    InvalidDimensions,
    UnsupportedType,
    PayloadTooLarge { max_upload_bytes: usize },
    ProcessingFailed,
}

impl ResizeError {
    pub fn code(&self) -> ResizeErrorCode {
        match self {
            Self::MissingField => ResizeErrorCode::MissingField,
            Self::InvalidDimensions => ResizeErrorCode::InvalidDimensions,
            Self::UnsupportedType => ResizeErrorCode::UnsupportedType,
            Self::PayloadTooLarge { .. } => ResizeErrorCode::PayloadTooLarge,
            Self::ProcessingFailed => ResizeErrorCode::ProcessingFailed,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::ProcessingFailed => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::MissingField => "Missing required fields: image, width, or height".to_string(),
            Self::InvalidDimensions => {
                "Invalid dimensions. Width and height must be positive numbers.".to_string()
            }
            Self::UnsupportedType => {
                "Invalid file type. Only JPG, PNG, and WebP files are allowed.".to_string()
            }
            Self::PayloadTooLarge { max_upload_bytes } => format!(
                "File size too large. Maximum size is {}.",
                human_size(*max_upload_bytes)
            ),
            Self::ProcessingFailed => "Failed to process image. Please try again.".to_string(),
        }
    }
}

impl IntoResponse for ResizeError {
    fn into_response(self) -> Response {
        let body = ResizeErrorResponse {
            error: self.message(),
            error_code: self.code(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Failures inside the decode/resample/encode step. Never shown to the caller as is.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("failed to read the image header: {0}")]
    FormatDetection(#[source] io::Error),
    #[error("failed to decode the image: {0}")]
    Decode(#[source] ImageError),
    #[error("failed to encode the resized image: {0}")]
    Encode(#[source] ImageError),
    #[error("the transform panicked: {0}")]
    Panicked(String),
    #[error("the transform task was cancelled")]
    Cancelled,
    #[error("the transform did not finish within {0:?}")]
    TimedOut(Duration),
}

impl From<TransformError> for ResizeError {
    fn from(err: TransformError) -> Self {
        // Every variant is listed so that a new one has to be classified here.
        let kind = match &err {
            TransformError::FormatDetection(_) | TransformError::Decode(_) => "invalid_input",
            TransformError::Encode(_) => "encoder",
            TransformError::Panicked(_) | TransformError::Cancelled => "internal",
            TransformError::TimedOut(_) => "timeout",
        };
        tracing::error!(
            task = "image_processing_failed",
            failure_kind = kind,
            error = %err,
            "Error processing image."
        );
        Self::ProcessingFailed
    }
}

fn human_size(bytes: usize) -> String {
    if bytes >= MEBIBYTE && bytes % MEBIBYTE == 0 {
        format!("{}MB", bytes / MEBIBYTE)
    } else {
        format!("{} bytes", bytes)
    }
}
