//! Application state shared by every handler.

use pictor_core::Config;
use pictor_services::ImageService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub images: Arc<ImageService>,
}

impl AppState {
    pub fn new(config: Config, images: ImageService) -> Arc<Self> {
        Arc::new(Self {
            config,
            images: Arc::new(images),
        })
    }
}
