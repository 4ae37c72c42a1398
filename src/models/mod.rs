pub mod image;
pub mod state;

pub use image::*;
pub use state::*;
