use crate::cli::Args;
use crate::resize::config::ResizeConfig;
use std::sync::Arc;

/// State shared by all handlers. Read-only after startup.
#[derive(Clone, Default)]
pub struct AppContext {
    pub resize: Arc<ResizeConfig>,
}

impl AppContext {
    pub fn new(resize: ResizeConfig) -> Self {
        Self {
            resize: Arc::new(resize),
        }
    }
}

pub fn init(args: &Args) -> AppContext {
    AppContext::new(ResizeConfig::from_args(args))
}
