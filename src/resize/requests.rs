/// A resize request that passed validation. Consumed by exactly one transform.
#[derive(Debug)]
pub struct ResizeRequest {
    pub image_bytes: Vec<u8>,
    /// Normalized form of the declared content type, e.g. `image/png`.
    pub mime_type: String,
    pub original_file_name: String,
    pub width: u32,
    pub height: u32,
}
