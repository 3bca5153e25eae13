use gc_core::frame::Rgb;

use crate::partition::SubImage;

/// Poids BT.709 du canal rouge.
pub const RED_WEIGHT: f64 = 0.2126;
/// Poids BT.709 du canal vert.
pub const GREEN_WEIGHT: f64 = 0.7152;
/// Poids BT.709 du canal bleu.
pub const BLUE_WEIGHT: f64 = 0.0722;
/// Valeur maximale d'un canal.
pub const MAX_CHANNEL: f64 = 255.0;

/// Luma d'un pixel, normalisée [0, 1].
///
/// # Example
/// ```
/// use gc_ascii::luminance::pixel_luma;
/// assert_eq!(pixel_luma((0, 0, 0)), 0.0);
/// assert!((pixel_luma((255, 255, 255)) - 1.0).abs() < 1e-12);
/// ```
#[inline(always)]
#[must_use]
pub fn pixel_luma((r, g, b): Rgb) -> f64 {
    (f64::from(r) * RED_WEIGHT + f64::from(g) * GREEN_WEIGHT + f64::from(b) * BLUE_WEIGHT)
        / MAX_CHANNEL
}

/// Luminosité moyenne [0, 1] d'une sous-image.
///
/// # Example
/// ```
/// use gc_core::frame::{PixelGrid, WHITE};
/// use gc_ascii::partition::divide;
/// use gc_ascii::luminance::sub_image_brightness;
///
/// let division = divide(PixelGrid::filled(8, 8, WHITE), 2).unwrap();
/// let b = sub_image_brightness(&division.cell(1, 1));
/// assert!((b - 1.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn sub_image_brightness(sub: &SubImage<'_>) -> f64 {
    let count = f64::from(sub.size()) * f64::from(sub.size());
    if count == 0.0 {
        return 0.0;
    }
    sub.pixels().map(pixel_luma).sum::<f64>() / count
}
