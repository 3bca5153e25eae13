use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use gc_ascii::ArtConverter;
use gc_ascii::partition::ResolutionBounds;
use gc_core::config::{ConvertConfig, load_config};
use gc_core::error::CoreError;
use gc_glyph::FontRenderer;
use gc_source::ImageSource;

pub mod cli;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config, appliquer les overrides CLI
    let mut config = resolve_config(&cli)?;
    cli.apply_overrides(&mut config);

    // 4. Jeu actif
    let chars = cli.charset(&config)?;
    if chars.is_empty() {
        println!("{}", CoreError::EmptyCharset);
        std::process::exit(1);
    }

    // 5. Image et résolution
    let source = ImageSource::new(&cli.image)?;
    let (width, height) = source.native_size();
    let bounds = ResolutionBounds::for_image(width, height);
    if !bounds.contains(config.resolution) {
        anyhow::bail!(
            "Résolution {} hors limites pour {}×{} (min {}, max {})",
            config.resolution,
            width,
            height,
            bounds.min,
            bounds.max
        );
    }
    let resolution = cli.step_resolution(&bounds, config.resolution);
    if resolution != config.resolution {
        log::info!("Résolution : {} → {resolution}", config.resolution);
    }

    // 6. Police
    let renderer = match config.font {
        Some(ref path) => FontRenderer::from_file(path, config.glyph_size, config.glyph_threshold)?,
        None => FontRenderer::system_default(config.glyph_size, config.glyph_threshold)?,
    };

    // 7. Conversion
    let mut converter = ArtConverter::new(Box::new(renderer)).with_fill(config.fill_color());
    let grid = converter
        .convert(&source.image(), resolution, &chars)
        .with_context(|| format!("Conversion de {} impossible", source.path().display()))?;

    // 8. Sortie
    let mut out = BufWriter::new(io::stdout().lock());
    for line in grid.to_lines() {
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(())
}

fn resolve_config(cli: &cli::Cli) -> Result<ConvertConfig> {
    if cli.config.exists() {
        load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(ConvertConfig::default())
    }
}
