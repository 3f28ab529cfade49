use crate::app_context::AppContext;
use crate::resize::config::ResizeConfig;
use crate::resize::errors::{ResizeError, TransformError};
use crate::resize::extractors::ResizeForm;
use crate::resize::img::{self, TransformParams};
use crate::resize::requests::ResizeRequest;
use crate::resize::responses::ResizedImage;
use crate::resize::validation;
use axum::extract::State;
use std::any::Any;
use tokio::task;
use tokio::time;

pub async fn resize(
    State(app_context): State<AppContext>,
    form: ResizeForm,
) -> Result<ResizedImage, ResizeError> {
    let config = &app_context.resize;
    let request = validation::validate(form, config).inspect_err(|err| {
        tracing::info!(
            task = "image_rejected",
            error_code = ?err.code(),
            "Rejected a resize request."
        );
    })?;

    let original_file_name = request.original_file_name.clone();
    let (input_bytes, width, height) = (request.image_bytes.len(), request.width, request.height);
    let output_bytes = transform(request, config).await?;

    tracing::info!(
        task = "image_resized",
        width,
        height,
        input_bytes,
        output_bytes = output_bytes.len(),
    );
    Ok(ResizedImage::new(output_bytes, &original_file_name))
}

/// Runs the transform on the blocking pool, bounded by the configured timeout.
///
/// On timeout the blocking task keeps running until the codec returns, its result (and raster)
/// is then dropped. No retries happen here.
async fn transform(
    request: ResizeRequest,
    config: &ResizeConfig,
) -> Result<Vec<u8>, TransformError> {
    let params = TransformParams::new(request.width, request.height, config);
    let handle = task::spawn_blocking(move || {
        img::resize(&request.image_bytes, &request.mime_type, &params)
    });
    match time::timeout(config.transform_timeout, handle).await {
        Err(_elapsed) => Err(TransformError::TimedOut(config.transform_timeout)),
        Ok(Err(join_error)) if join_error.is_panic() => Err(TransformError::Panicked(
            panic_message(join_error.into_panic()),
        )),
        Ok(Err(_)) => Err(TransformError::Cancelled),
        Ok(Ok(result)) => result,
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::from("unknown panic payload")
    }
}
