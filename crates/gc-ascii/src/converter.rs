use std::sync::Arc;

use gc_core::charset::ActiveCharset;
use gc_core::error::CoreError;
use gc_core::frame::{CharGrid, PixelGrid, Rgb, WHITE};
use gc_core::traits::GlyphRenderer;

use crate::catalog::BrightnessCatalog;
use crate::luminance::sub_image_brightness;
use crate::partition::{self, Division};

/// Découpage mémorisé d'une image pour une résolution donnée.
struct CachedDivision {
    image: Arc<PixelGrid>,
    resolution: u32,
    division: Division,
    /// Luminosité de chaque cellule, row-major.
    brightness: Vec<f64>,
}

impl CachedDivision {
    fn build(image: &Arc<PixelGrid>, resolution: u32, fill: Rgb) -> Result<Self, CoreError> {
        let division = partition::divide(partition::pad(image, fill), resolution)?;
        let brightness = division
            .cells()
            .map(|cell| sub_image_brightness(&cell))
            .collect();
        log::debug!(
            "Découpage {}×{} → {}×{} cellules de {} px",
            image.width,
            image.height,
            division.cols(),
            division.rows(),
            division.cell_size()
        );
        Ok(Self {
            image: Arc::clone(image),
            resolution,
            division,
            brightness,
        })
    }

    /// Même instance d'image (pas seulement même contenu) et même résolution.
    fn matches(&self, image: &Arc<PixelGrid>, resolution: u32) -> bool {
        Arc::ptr_eq(&self.image, image) && self.resolution == resolution
    }

    fn lookup(&self, catalog: &BrightnessCatalog) -> Result<CharGrid, CoreError> {
        let mut grid = CharGrid::new(self.division.cols(), self.division.rows());
        for (cell, &brightness) in self.division.cells().zip(&self.brightness) {
            grid.set(cell.col(), cell.row(), catalog.query(brightness)?);
        }
        Ok(grid)
    }
}

/// Session de conversion image → grille de caractères.
///
/// Possède son `BrightnessCatalog` et mémorise le dernier découpage : deux
/// appels successifs sur le même `Arc<PixelGrid>` à la même résolution
/// réutilisent padding, découpage et luminosités des cellules.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use gc_core::{ActiveCharset, CoreError, GlyphBitmap, GlyphRenderer, PixelGrid};
/// use gc_ascii::converter::ArtConverter;
///
/// // Les chiffres allument 1 à 10 lignes d'un bitmap 10×10.
/// struct Digits;
/// impl GlyphRenderer for Digits {
///     fn resolution(&self) -> u32 { 10 }
///     fn render(&self, ch: char) -> Result<GlyphBitmap, CoreError> {
///         let rows = ch.to_digit(10).ok_or(CoreError::MissingGlyph { ch })? + 1;
///         Ok(GlyphBitmap::from_fn(10, |_, y| y < rows))
///     }
/// }
///
/// let mut converter = ArtConverter::new(Box::new(Digits));
/// let image = Arc::new(PixelGrid::new(64, 32)); // noir
/// let grid = converter.convert(&image, 8, &ActiveCharset::digits()).unwrap();
/// assert_eq!((grid.width, grid.height), (8, 4));
/// assert!(grid.cells.iter().all(|&c| c == '0'));
/// ```
pub struct ArtConverter {
    catalog: BrightnessCatalog,
    fill: Rgb,
    cache: Option<CachedDivision>,
    /// Nombre de découpages calculés depuis la création.
    #[cfg(test)]
    built: usize,
}

impl ArtConverter {
    /// Session vide : le premier `convert` peuple le catalogue.
    #[must_use]
    pub fn new(renderer: Box<dyn GlyphRenderer>) -> Self {
        Self {
            catalog: BrightnessCatalog::empty(renderer),
            fill: WHITE,
            cache: None,
            #[cfg(test)]
            built: 0,
        }
    }

    /// Session dont le catalogue est initialisé avec `chars`.
    ///
    /// # Errors
    /// `CoreError::EmptyCharset` or `MissingGlyph` from catalog construction.
    pub fn with_charset(
        renderer: Box<dyn GlyphRenderer>,
        chars: &ActiveCharset,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            catalog: BrightnessCatalog::new(renderer, chars.iter())?,
            fill: WHITE,
            cache: None,
            #[cfg(test)]
            built: 0,
        })
    }

    /// Couleur de padding (blanc par défaut).
    #[must_use]
    pub fn with_fill(mut self, fill: Rgb) -> Self {
        self.fill = fill;
        self
    }

    /// Read access to the session catalog.
    #[must_use]
    pub fn catalog(&self) -> &BrightnessCatalog {
        &self.catalog
    }

    /// `true` if the next `convert(image, resolution, _)` will reuse the cache.
    #[must_use]
    pub fn is_cached(&self, image: &Arc<PixelGrid>, resolution: u32) -> bool {
        self.cache
            .as_ref()
            .is_some_and(|cached| cached.matches(image, resolution))
    }

    /// Convert `image` into a `rows × resolution` character grid.
    ///
    /// All fallible steps run before the catalog or the cache change: a
    /// failed call leaves the session exactly as it was.
    ///
    /// # Errors
    /// - `CoreError::EmptyCharset` if `chars` is empty.
    /// - `CoreError::InvalidResolution` if `resolution` does not tile the
    ///   padded image.
    /// - `CoreError::MissingGlyph` if a newly added character cannot be drawn.
    pub fn convert(
        &mut self,
        image: &Arc<PixelGrid>,
        resolution: u32,
        chars: &ActiveCharset,
    ) -> Result<CharGrid, CoreError> {
        if chars.is_empty() {
            return Err(CoreError::EmptyCharset);
        }
        let (padded_width, padded_height) = partition::padded_size(image.width, image.height);
        partition::cell_size(padded_width, padded_height, resolution)?;

        let added: Vec<char> = chars.iter().filter(|&c| !self.catalog.contains(c)).collect();
        let removed: Vec<char> = self
            .catalog
            .active_chars()
            .filter(|&c| !chars.contains(c))
            .collect();
        self.catalog.prepare(added.iter().copied())?;

        let cache = match self.cache.take() {
            Some(cached) if cached.matches(image, resolution) => {
                log::debug!("Découpage réutilisé (même image, résolution {resolution})");
                cached
            }
            previous => match CachedDivision::build(image, resolution, self.fill) {
                Ok(fresh) => {
                    #[cfg(test)]
                    {
                        self.built += 1;
                    }
                    fresh
                }
                Err(e) => {
                    self.cache = previous;
                    return Err(e);
                }
            },
        };

        for ch in removed {
            self.catalog.remove(ch);
        }
        for ch in added {
            // Luminosité déjà en cache via `prepare` : ne peut plus échouer.
            self.catalog.add(ch)?;
        }

        let result = cache.lookup(&self.catalog);
        self.cache = Some(cache);
        if let Ok(ref grid) = result {
            log::info!(
                "Conversion {}×{} → {}×{} caractères ({} actifs)",
                image.width,
                image.height,
                grid.width,
                grid.height,
                self.catalog.len()
            );
        }
        result
    }
}
