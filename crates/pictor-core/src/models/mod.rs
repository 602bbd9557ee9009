//! Data models shared by the repository, the services and the HTTP layer.

mod image;

pub use image::{ImageRecord, ImageResponse, NewImageRecord};
