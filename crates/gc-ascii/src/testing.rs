//! Renderer déterministe pour les tests unitaires.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use gc_core::error::CoreError;
use gc_core::glyph::GlyphBitmap;
use gc_core::traits::GlyphRenderer;

/// 10×10 bitmaps: glyph `c` lights the first `lit` pixels, so its absolute
/// brightness is `lit / 100`. Counts render calls.
pub(crate) struct StubRenderer {
    lit: HashMap<char, u32>,
    calls: Arc<AtomicUsize>,
}

impl StubRenderer {
    pub(crate) fn new(table: &[(char, u32)]) -> Self {
        Self {
            lit: table.iter().copied().collect(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Digits `0`..=`9` lighting 10, 20, …, 100 pixels.
    pub(crate) fn digits() -> Self {
        Self::new(&('0'..='9').zip((1..=10).map(|n| n * 10)).collect::<Vec<_>>())
    }

    pub(crate) fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl GlyphRenderer for StubRenderer {
    fn resolution(&self) -> u32 {
        10
    }

    fn render(&self, ch: char) -> Result<GlyphBitmap, CoreError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let lit = *self.lit.get(&ch).ok_or(CoreError::MissingGlyph { ch })?;
        Ok(GlyphBitmap::from_fn(10, |x, y| y * 10 + x < lit))
    }
}
