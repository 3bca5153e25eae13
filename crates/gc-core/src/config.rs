use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::charset::{ActiveCharset, CharSelection};
use crate::error::CoreError;
use crate::frame::Rgb;

/// Configuration d'une session de conversion.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use gc_core::config::ConvertConfig;
/// let config = ConvertConfig::default();
/// assert_eq!(config.resolution, 128);
/// assert_eq!(config.active_charset().unwrap().len(), 10);
/// ```
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ConvertConfig {
    // === Conversion ===
    /// Nombre de colonnes de caractères.
    pub resolution: u32,
    /// Sélections formant le jeu actif initial (`"0-9"`, `"all"`, `"space"`, `"x"`).
    pub charset: Vec<String>,
    /// Couleur de padding RGB.
    pub fill: [u8; 3],

    // === Glyphes ===
    /// Côté N du bitmap de rasterisation des glyphes.
    pub glyph_size: u32,
    /// Couverture minimale [0.05, 0.95] pour qu'un pixel de glyphe soit allumé.
    pub glyph_threshold: f32,
    /// Police TrueType/OpenType utilisée pour rasteriser les glyphes.
    pub font: Option<PathBuf>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            resolution: 128,
            charset: vec!["0-9".to_string()],
            fill: [255, 255, 255],
            glyph_size: 16,
            glyph_threshold: 0.5,
            font: None,
        }
    }
}

impl ConvertConfig {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization to prevent out-of-range values.
    pub fn clamp_all(&mut self) {
        self.resolution = self.resolution.max(1);
        self.glyph_size = self.glyph_size.clamp(4, 128);
        self.glyph_threshold = self.glyph_threshold.clamp(0.05, 0.95);
    }

    /// Padding color as an `Rgb` triple.
    #[must_use]
    pub fn fill_color(&self) -> Rgb {
        (self.fill[0], self.fill[1], self.fill[2])
    }

    /// Construit le jeu actif à partir des sélections configurées.
    ///
    /// # Errors
    /// `CoreError::InvalidCharSelection` si une sélection est illisible.
    pub fn active_charset(&self) -> Result<ActiveCharset, CoreError> {
        let mut set = ActiveCharset::new();
        for raw in &self.charset {
            set.add(&raw.parse::<CharSelection>()?);
        }
        Ok(set)
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    convert: Option<ConvertSection>,
    glyph: Option<GlyphSection>,
}

/// Convert section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
struct ConvertSection {
    resolution: Option<u32>,
    charset: Option<Vec<String>>,
    fill: Option<[u8; 3]>,
}

/// Glyph section of the TOML config, all fields optional.
#[derive(Deserialize)]
struct GlyphSection {
    size: Option<u32>,
    threshold: Option<f32>,
    font: Option<PathBuf>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// Un chemin de police relatif est résolu par rapport au dossier du fichier.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use gc_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<ConvertConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;

    let file: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Erreur de parsing TOML dans {}", path.display()))?;

    let mut config = ConvertConfig::default();

    if let Some(c) = file.convert {
        if let Some(v) = c.resolution {
            config.resolution = v;
        }
        if let Some(v) = c.charset {
            config.charset = v;
        }
        if let Some(v) = c.fill {
            config.fill = v;
        }
    }

    if let Some(g) = file.glyph {
        if let Some(v) = g.size {
            config.glyph_size = v;
        }
        if let Some(v) = g.threshold {
            config.glyph_threshold = v;
        }
        if let Some(v) = g.font {
            config.font = Some(match path.parent() {
                Some(dir) if v.is_relative() => dir.join(v),
                _ => v,
            });
        }
    }

    // Valide les sélections dès le chargement plutôt qu'à la conversion.
    config
        .active_charset()
        .with_context(|| format!("Charset invalide dans {}", path.display()))?;

    config.clamp_all();
    log::debug!("Config chargée depuis {} : {config:?}", path.display());
    Ok(config)
}
