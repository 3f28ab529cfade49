use crate::app_context::AppContext;
use crate::resize::consts::{HEIGHT_FIELD, IMAGE_FIELD, WIDTH_FIELD};
use crate::resize::errors::ResizeError;
use async_trait::async_trait;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{FromRef, FromRequest, Multipart, Request};
use axum::http::StatusCode;

/// Raw fields of a resize form, before any validation.
///
/// Only the first occurrence of each known field is kept; anything else is skipped.
#[derive(Debug, Default)]
pub struct ResizeForm {
    pub image: Option<UploadedImage>,
    pub width: Option<String>,
    pub height: Option<String>,
    /// The body hit the transport limit, fields after that point were never seen.
    pub truncated: bool,
}

#[derive(Debug, Default)]
pub struct UploadedImage {
    /// Empty once the upload went over the ceiling.
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    pub file_name: Option<String>,
    pub oversized: bool,
}

impl UploadedImage {
    fn push_chunk(&mut self, chunk: &[u8], max_upload_bytes: usize) {
        if self.oversized {
            return;
        }
        if self.bytes.len() + chunk.len() > max_upload_bytes {
            self.mark_oversized();
        } else {
            self.bytes.extend_from_slice(chunk);
        }
    }

    fn mark_oversized(&mut self) {
        self.oversized = true;
        self.bytes = Vec::new();
    }
}

#[async_trait]
impl<S> FromRequest<S> for ResizeForm
where
    AppContext: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ResizeError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let max_upload_bytes = AppContext::from_ref(state).resize.max_upload_bytes;

        // A body that isn't a multipart form has none of the required fields.
        let mut multipart = Multipart::from_request(request, state)
            .await
            .map_err(|rejection| {
                tracing::debug!("Rejected a non-multipart resize request: {}", rejection);
                ResizeError::MissingField
            })?;

        let mut form = ResizeForm::default();
        loop {
            let mut field = match multipart.next_field().await {
                Ok(Some(field)) => field,
                Ok(None) => break,
                Err(err) => {
                    body_limit_reached(err)?;
                    form.truncated = true;
                    break;
                }
            };
            match field.name() {
                Some(IMAGE_FIELD) if form.image.is_none() => {
                    let mut image = UploadedImage {
                        content_type: field.content_type().map(str::to_owned),
                        file_name: field.file_name().map(str::to_owned),
                        ..UploadedImage::default()
                    };
                    let outcome = read_image(&mut field, &mut image, max_upload_bytes).await;
                    if let Err(err) = outcome {
                        body_limit_reached(err)?;
                        // Only part of the image arrived.
                        image.mark_oversized();
                        form.image = Some(image);
                        form.truncated = true;
                        break;
                    }
                    form.image = Some(image);
                }
                Some(WIDTH_FIELD) if form.width.is_none() => match field.text().await {
                    Ok(text) => form.width = Some(text),
                    Err(err) => {
                        body_limit_reached(err)?;
                        form.truncated = true;
                        break;
                    }
                },
                Some(HEIGHT_FIELD) if form.height.is_none() => match field.text().await {
                    Ok(text) => form.height = Some(text),
                    Err(err) => {
                        body_limit_reached(err)?;
                        form.truncated = true;
                        break;
                    }
                },
                _ => {}
            }
        }
        Ok(form)
    }
}

/// Streams the image field, keeping at most `max_upload_bytes`. Anything past the ceiling is
/// drained so that the fields after the image can still be read.
async fn read_image(
    field: &mut Field<'_>,
    image: &mut UploadedImage,
    max_upload_bytes: usize,
) -> Result<(), MultipartError> {
    while let Some(chunk) = field.chunk().await? {
        image.push_chunk(&chunk, max_upload_bytes);
    }
    Ok(())
}

/// `Ok` when the stream stopped at the body limit: what was read so far still gets validated.
/// Any other broken stream yields none of the required fields.
fn body_limit_reached(err: MultipartError) -> Result<(), ResizeError> {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return Ok(());
    }
    tracing::debug!("Failed to read the multipart payload: {}", err.body_text());
    Err(ResizeError::MissingField)
}
