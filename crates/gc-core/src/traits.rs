use crate::error::CoreError;
use crate::glyph::GlyphBitmap;

/// Rasterise un caractère en bitmap booléen N×N.
///
/// Implémenté par : `FontRenderer` (gc-glyph). Les tests fournissent leurs
/// propres renderers déterministes.
///
/// # Example
/// ```
/// use gc_core::traits::GlyphRenderer;
/// use gc_core::glyph::GlyphBitmap;
/// use gc_core::CoreError;
///
/// struct Blank;
/// impl GlyphRenderer for Blank {
///     fn resolution(&self) -> u32 { 8 }
///     fn render(&self, _ch: char) -> Result<GlyphBitmap, CoreError> {
///         Ok(GlyphBitmap::new(8))
///     }
/// }
/// assert_eq!(Blank.render('a').unwrap().lit_count(), 0);
/// ```
pub trait GlyphRenderer: Send + 'static {
    /// Côté N du bitmap produit.
    fn resolution(&self) -> u32;

    /// Rasterise `ch`. Doit être déterministe pour un même renderer.
    ///
    /// # Errors
    /// `CoreError::MissingGlyph` si le renderer ne connaît pas `ch`.
    fn render(&self, ch: char) -> Result<GlyphBitmap, CoreError>;
}
