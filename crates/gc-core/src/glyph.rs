/// Bitmap booléen carré (N×N) d'un glyphe rasterisé. `true` = pixel allumé.
///
/// # Example
/// ```
/// use gc_core::glyph::GlyphBitmap;
/// let bm = GlyphBitmap::from_fn(4, |x, _| x < 2);
/// assert_eq!(bm.lit_count(), 8);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphBitmap {
    size: u32,
    bits: Vec<bool>,
}

impl GlyphBitmap {
    /// Bitmap vide (tout éteint) de côté `size`.
    #[must_use]
    pub fn new(size: u32) -> Self {
        Self {
            size,
            bits: vec![false; size as usize * size as usize],
        }
    }

    /// Build a bitmap from a predicate over (x, y).
    #[must_use]
    pub fn from_fn(size: u32, mut lit: impl FnMut(u32, u32) -> bool) -> Self {
        let mut bm = Self::new(size);
        for y in 0..size {
            for x in 0..size {
                bm.set(x, y, lit(x, y));
            }
        }
        bm
    }

    /// Side length N.
    #[inline]
    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Pixel (x, y). Hors limites → éteint.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.size || y >= self.size {
            return false;
        }
        self.bits[y as usize * self.size as usize + x as usize]
    }

    /// Écrit le pixel (x, y). Hors limites → ignoré.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, on: bool) {
        if x < self.size && y < self.size {
            self.bits[y as usize * self.size as usize + x as usize] = on;
        }
    }

    /// Nombre de pixels allumés.
    #[must_use]
    pub fn lit_count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }
}
