use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use gc_core::error::CoreError;
use gc_core::frame::PixelGrid;

/// Image statique chargée une fois, partagée par `Arc`.
///
/// Le convertisseur mémorise son découpage par identité d'`Arc` : tant que
/// la même `ImageSource` est utilisée, les conversions successives le réutilisent.
///
/// # Example
/// ```no_run
/// use gc_source::image::ImageSource;
/// use std::path::Path;
/// let source = ImageSource::new(Path::new("photo.png")).unwrap();
/// let (w, h) = source.native_size();
/// ```
pub struct ImageSource {
    path: PathBuf,
    image: Arc<PixelGrid>,
}

impl ImageSource {
    /// Load an image from disk.
    ///
    /// # Errors
    /// Returns an error if the file is missing, cannot be decoded, or is empty.
    pub fn new(path: &Path) -> Result<Self> {
        let image = load_image(path)?;
        log::info!(
            "Image chargée : {} ({}×{})",
            path.display(),
            image.width,
            image.height
        );
        Ok(Self {
            path: path.to_path_buf(),
            image: Arc::new(image),
        })
    }

    /// Shared handle on the decoded pixels.
    #[must_use]
    pub fn image(&self) -> Arc<PixelGrid> {
        Arc::clone(&self.image)
    }

    /// Dimensions d'origine, avant padding.
    #[must_use]
    pub fn native_size(&self) -> (u32, u32) {
        (self.image.width, self.image.height)
    }

    /// Path the image was loaded from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Décode `path` en grille RGB ; le canal alpha est ignoré.
///
/// # Errors
/// Returns an error if the image cannot be loaded or has a zero side.
///
/// # Example
/// ```no_run
/// use gc_source::image::load_image;
/// let grid = load_image("test.png").unwrap();
/// ```
pub fn load_image(path: impl AsRef<Path>) -> Result<PixelGrid> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CoreError::FileNotFound {
            path: path.display().to_string(),
        }
        .into());
    }
    let img =
        image::open(path).with_context(|| format!("Impossible de charger {}", path.display()))?;
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    PixelGrid::from_raw(width, height, rgb.into_raw())
        .with_context(|| format!("Image invalide : {}", path.display()))
}
