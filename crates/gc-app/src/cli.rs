use std::path::PathBuf;

use clap::{ArgAction, Parser};
use gc_ascii::partition::ResolutionBounds;
use gc_core::charset::{ActiveCharset, CharSelection};
use gc_core::config::ConvertConfig;
use gc_core::error::CoreError;

/// glyphcast — ASCII art by glyph brightness matching.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Image à convertir (PNG, JPEG, BMP, GIF).
    #[arg(long)]
    pub image: PathBuf,

    /// Police TrueType/OpenType des glyphes. Défaut : config, puis police système.
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Nombre de caractères par ligne.
    #[arg(long)]
    pub resolution: Option<u32>,

    /// Double la résolution. Répétable (`--res-up --res-up` : ×4).
    #[arg(long, action = ArgAction::Count, conflicts_with = "res_down")]
    pub res_up: u8,

    /// Divise la résolution par deux. Répétable.
    #[arg(long, action = ArgAction::Count)]
    pub res_down: u8,

    /// Remplace le jeu de la config : `x`, `space`, `all` ou `a-z`. Répétable.
    #[arg(long = "chars", value_name = "SEL")]
    pub chars: Vec<CharSelection>,

    /// Ajoute une sélection au jeu actif. Répétable.
    #[arg(long, value_name = "SEL")]
    pub add: Vec<CharSelection>,

    /// Retire une sélection du jeu actif. Répétable.
    #[arg(long, value_name = "SEL")]
    pub remove: Vec<CharSelection>,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Apply `--resolution` and `--font` on top of the loaded config.
    pub fn apply_overrides(&self, config: &mut ConvertConfig) {
        if let Some(resolution) = self.resolution {
            config.resolution = resolution;
        }
        if let Some(ref font) = self.font {
            config.font = Some(font.clone());
        }
        config.clamp_all();
    }

    /// Applique `--res-up` / `--res-down` pas à pas dans `bounds`.
    ///
    /// Un pas qui sortirait des bornes est ignoré, comme les suivants, et la
    /// dernière résolution valide est conservée.
    #[must_use]
    pub fn step_resolution(&self, bounds: &ResolutionBounds, resolution: u32) -> u32 {
        let mut current = resolution;
        let (steps, up) = if self.res_up > 0 {
            (self.res_up, true)
        } else {
            (self.res_down, false)
        };
        for _ in 0..steps {
            let next = if up {
                bounds.double(current)
            } else {
                bounds.halve(current)
            };
            match next {
                Ok(next) => current = next,
                Err(e) => {
                    log::warn!(
                        "Résolution inchangée, bornes {}..={} atteintes : {e}",
                        bounds.min,
                        bounds.max
                    );
                    break;
                }
            }
        }
        current
    }

    /// Jeu actif final : config (ou `--chars`), puis `--add`, puis `--remove`.
    ///
    /// # Errors
    /// `CoreError::InvalidCharSelection` if a config selection is unreadable.
    pub fn charset(&self, config: &ConvertConfig) -> Result<ActiveCharset, CoreError> {
        let mut set = if self.chars.is_empty() {
            config.active_charset()?
        } else {
            let mut set = ActiveCharset::new();
            for sel in &self.chars {
                set.add(sel);
            }
            set
        };
        for sel in &self.add {
            set.add(sel);
        }
        for sel in &self.remove {
            set.remove(sel);
        }
        Ok(set)
    }
}
