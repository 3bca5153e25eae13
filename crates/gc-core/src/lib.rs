//! Configuration, types, and shared structures for glyphcast.
//!
//! This crate contains all shared types, traits, and configuration logic
//! used across the glyphcast workspace.

pub mod charset;
pub mod config;
pub mod error;
pub mod frame;
pub mod glyph;
pub mod traits;

pub use charset::{ActiveCharset, CharSelection};
pub use config::ConvertConfig;
pub use error::CoreError;
pub use frame::{CharGrid, PixelGrid, Rgb};
pub use glyph::GlyphBitmap;
pub use traits::GlyphRenderer;
