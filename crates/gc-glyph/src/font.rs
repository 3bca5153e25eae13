use std::path::Path;

use ab_glyph::{Font, FontVec, PxScale, ScaleFont, point};
use anyhow::{Context, Result};
use gc_core::error::CoreError;
use gc_core::glyph::GlyphBitmap;
use gc_core::traits::GlyphRenderer;

/// Polices monospace essayées, dans l'ordre, quand aucune n'est configurée.
pub const SYSTEM_MONO_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/msttcorefonts/Courier_New.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu-sans-mono-fonts/DejaVuSansMono.ttf",
    "/Library/Fonts/Courier New.ttf",
    "/System/Library/Fonts/Menlo.ttc",
    "C:\\Windows\\Fonts\\cour.ttf",
];

/// Rasterise les glyphes d'une police TrueType/OpenType dans un carré N×N.
///
/// La hauteur de la police (ascent − descent) occupe les N lignes, le glyphe
/// est centré horizontalement sur son avance. Un pixel est allumé si sa
/// couverture atteint `threshold`. Aucun cache : chaque appel rasterise.
pub struct FontRenderer {
    font: FontVec,
    size: u32,
    threshold: f32,
}

impl FontRenderer {
    /// Construit le renderer depuis les octets bruts d'une police.
    ///
    /// # Errors
    /// Retourne une erreur si la police est invalide ou si `size` vaut 0.
    pub fn from_bytes(data: Vec<u8>, size: u32, threshold: f32) -> Result<Self> {
        if size == 0 {
            anyhow::bail!("Taille de glyphe nulle");
        }
        let font = FontVec::try_from_vec(data).context("Police invalide")?;
        Ok(Self {
            font,
            size,
            threshold: threshold.clamp(0.0, 1.0),
        })
    }

    /// Charge une police depuis le disque.
    ///
    /// # Errors
    /// Retourne une erreur si le fichier est illisible ou la police invalide.
    pub fn from_file(path: &Path, size: u32, threshold: f32) -> Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("Impossible de lire la police {}", path.display()))?;
        let renderer = Self::from_bytes(data, size, threshold)
            .with_context(|| format!("Police rejetée : {}", path.display()))?;
        log::info!(
            "Police {} chargée ({}×{}, seuil {:.2})",
            path.display(),
            size,
            size,
            renderer.threshold
        );
        Ok(renderer)
    }

    /// Première police de [`SYSTEM_MONO_FONTS`] présente sur la machine.
    ///
    /// # Errors
    /// Retourne une erreur si aucune ne se charge.
    pub fn system_default(size: u32, threshold: f32) -> Result<Self> {
        for candidate in SYSTEM_MONO_FONTS {
            let path = Path::new(candidate);
            if !path.exists() {
                continue;
            }
            match Self::from_file(path, size, threshold) {
                Ok(renderer) => return Ok(renderer),
                Err(e) => log::warn!("Police système ignorée : {e:#}"),
            }
        }
        anyhow::bail!("Aucune police monospace trouvée. Utilisez --font <fichier.ttf>.")
    }
}

impl GlyphRenderer for FontRenderer {
    fn resolution(&self) -> u32 {
        self.size
    }

    fn render(&self, ch: char) -> Result<GlyphBitmap, CoreError> {
        // glyph_id 0 = .notdef : la police ne couvre pas ce caractère.
        let gid = self.font.glyph_id(ch);
        if gid.0 == 0 {
            return Err(CoreError::MissingGlyph { ch });
        }

        let mut bitmap = GlyphBitmap::new(self.size);
        let cell = self.size as f32;
        let scaled = self.font.as_scaled(PxScale::from(cell));
        let x_offset = ((cell - scaled.h_advance(gid)) / 2.0).max(0.0);
        let glyph = gid.with_scale_and_position(scaled.scale(), point(x_offset, scaled.ascent()));

        if let Some(outline) = self.font.outline_glyph(glyph) {
            let bounds = outline.px_bounds();
            let threshold = self.threshold;
            #[allow(clippy::cast_possible_wrap)]
            outline.draw(|x, y, coverage| {
                let px = x as i32 + bounds.min.x as i32;
                let py = y as i32 + bounds.min.y as i32;
                if px >= 0 && py >= 0 && coverage >= threshold {
                    bitmap.set(px as u32, py as u32, true);
                }
            });
        }
        Ok(bitmap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_rejected() {
        assert!(FontRenderer::from_bytes(vec![0, 1, 2, 3], 16, 0.5).is_err());
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(FontRenderer::from_bytes(Vec::new(), 0, 0.5).is_err());
    }

    #[test]
    fn missing_font_file_is_an_error() {
        let err = FontRenderer::from_file(Path::new("/nope/font.ttf"), 16, 0.5);
        assert!(err.is_err());
    }

    #[test]
    fn system_font_renders_plausible_glyphs() {
        // Ne tourne que si une police système est installée.
        let Ok(renderer) = FontRenderer::system_default(16, 0.5) else {
            return;
        };
        assert_eq!(renderer.resolution(), 16);
        let space = renderer.render(' ').unwrap();
        let dot = renderer.render('.').unwrap();
        let at = renderer.render('@').unwrap();
        assert_eq!(space.lit_count(), 0);
        assert!(dot.lit_count() < at.lit_count());
        // Déterministe.
        assert_eq!(renderer.render('@').unwrap(), at);
    }
}
