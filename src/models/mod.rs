pub mod events;
pub mod http;
pub mod image;

pub use events::*;
pub use http::*;
pub use image::*;
