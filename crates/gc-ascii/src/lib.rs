//! ASCII conversion engine for glyphcast.
//!
//! Ranks glyphs by brightness and maps image cells to the closest glyph.

pub mod catalog;
pub mod converter;
pub mod glyph_brightness;
pub mod luminance;
pub mod partition;

#[cfg(test)]
mod testing;

pub use catalog::BrightnessCatalog;
pub use converter::ArtConverter;
