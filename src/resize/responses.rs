use crate::resize::consts::{FALLBACK_FILE_NAME, OUTPUT_CONTENT_TYPE};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeErrorResponse {
    /// Human readable description, safe to show to end users.
    pub error: String,
    pub error_code: ResizeErrorCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResizeErrorCode {
    MissingField,
    InvalidDimensions,
    UnsupportedType,
    PayloadTooLarge,
    ProcessingFailed,
}

/// A resized JPEG, sent back as a download.
#[derive(Debug)]
pub struct ResizedImage {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

impl ResizedImage {
    pub fn new(bytes: Vec<u8>, original_file_name: &str) -> Self {
        Self {
            bytes,
            file_name: suggested_file_name(original_file_name),
        }
    }
}

impl IntoResponse for ResizedImage {
    fn into_response(self) -> Response {
        let disposition = format!("attachment; filename=\"{}\"", self.file_name);
        // Sanitized names are always valid header values, the fallback is only a safety net.
        let disposition = HeaderValue::from_str(&disposition).unwrap_or_else(|_| {
            HeaderValue::from_static("attachment; filename=\"resized_image.jpg\"")
        });
        (
            StatusCode::OK,
            [
                (CONTENT_TYPE, HeaderValue::from_static(OUTPUT_CONTENT_TYPE)),
                (CONTENT_DISPOSITION, disposition),
            ],
            self.bytes,
        )
            .into_response()
    }
}

/// `resized_<original name>.jpg`, with characters that would break the header replaced.
pub fn suggested_file_name(original_file_name: &str) -> String {
    let sanitized: String = original_file_name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let name = if sanitized.trim().is_empty() {
        FALLBACK_FILE_NAME
    } else {
        sanitized.as_str()
    };
    format!("resized_{}.jpg", name)
}
