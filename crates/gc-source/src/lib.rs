//! Image loading for glyphcast.

pub mod image;

pub use crate::image::{ImageSource, load_image};
