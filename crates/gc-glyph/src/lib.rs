/// Glyph rasterization for glyphcast.
///
/// Provides the `GlyphRenderer` implementation backed by a font file.
pub mod font;

pub use font::FontRenderer;
