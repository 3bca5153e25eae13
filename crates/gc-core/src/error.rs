use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Referenced file does not exist.
    #[error("Fichier introuvable : {path}")]
    FileNotFound {
        /// Path that was not found.
        path: String,
    },

    /// Invalid width/height dimensions, or pixel data of the wrong length.
    #[error("Dimensions invalides : {width}×{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// No active character to match against.
    #[error("Did not execute. Charset is empty.")]
    EmptyCharset,

    /// Resolution is zero or does not tile the padded image.
    #[error("Résolution invalide : {resolution} pour une largeur paddée de {padded_width}")]
    InvalidResolution {
        /// Requested number of character columns.
        resolution: u32,
        /// Width of the power-of-two padded image.
        padded_width: u32,
    },

    /// The glyph renderer has no glyph for this character.
    #[error("Glyphe indisponible pour {ch:?}")]
    MissingGlyph {
        /// The character that could not be rendered.
        ch: char,
    },

    /// Unparseable character selection (`a`, `a-z`, `all`, `space`).
    #[error("Sélection de caractères invalide : {0:?}")]
    InvalidCharSelection(String),
}
