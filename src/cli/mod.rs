use clap::Parser;
use std::net::SocketAddr;
use url::Url;
#[cfg(test)]
pub mod tests;

#[derive(Debug, Parser)]
#[command(about = "HTTP service that resizes uploaded images to JPEG.")]
pub struct Args {
    #[arg(long)]
    #[arg(default_value = "0.0.0.0:3030")]
    pub listen_address: SocketAddr,
    /// Origins allowed to call the API from a browser.
    #[arg(long, value_delimiter = ',')]
    #[arg(default_value = "http://127.0.0.1:3000,http://localhost:3000")]
    pub allowed_origins: Vec<String>,
    /// Largest accepted image upload, in bytes.
    #[arg(long)]
    #[arg(default_value_t = 10 * 1024 * 1024)]
    pub max_upload_bytes: usize,
    /// Largest accepted value for either requested side, in pixels.
    #[arg(long)]
    #[arg(default_value_t = 8192)]
    pub max_output_dimension: u32,
    #[arg(long)]
    #[arg(default_value_t = 90)]
    pub jpeg_quality: u8,
    #[arg(long)]
    #[arg(default_value_t = 30)]
    pub transform_timeout_secs: u64,
    /// Quickwit instance to ship structured logs to. Logs only go to stdout when unset.
    #[arg(long)]
    pub quickwit_url: Option<Url>,
}
