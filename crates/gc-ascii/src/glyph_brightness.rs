use gc_core::error::CoreError;
use gc_core::traits::GlyphRenderer;

/// Luminosité absolue d'un caractère : fraction [0, 1] de pixels allumés
/// dans son bitmap N×N.
///
/// # Errors
/// Propage `CoreError::MissingGlyph` du renderer.
///
/// # Example
/// ```
/// use gc_core::{CoreError, GlyphBitmap, GlyphRenderer};
/// use gc_ascii::glyph_brightness::absolute_brightness;
///
/// struct HalfLit;
/// impl GlyphRenderer for HalfLit {
///     fn resolution(&self) -> u32 { 4 }
///     fn render(&self, _ch: char) -> Result<GlyphBitmap, CoreError> {
///         Ok(GlyphBitmap::from_fn(4, |_, y| y < 2))
///     }
/// }
/// assert_eq!(absolute_brightness(&HalfLit, 'x').unwrap(), 0.5);
/// ```
pub fn absolute_brightness(renderer: &dyn GlyphRenderer, ch: char) -> Result<f64, CoreError> {
    let bitmap = renderer.render(ch)?;
    let total = f64::from(bitmap.size()) * f64::from(bitmap.size());
    if total == 0.0 {
        return Ok(0.0);
    }
    Ok(bitmap.lit_count() as f64 / total)
}
