//! Subcommand dispatch: command-line overrides on top of the config, then
//! one library call per step.

use assetprep_core::{PrepResult, atlas, brightest, bundle, flip, glyphs};

use crate::cli::Command;
use crate::config::Config;

/// Runs `command`, consuming the config it was resolved against.
pub fn run(command: Command, mut config: Config) -> PrepResult<()> {
    let style = config.output.json_style();
    match command {
        Command::Bundle {
            font,
            textures,
            output,
        } => {
            let cfg = &mut config.bundle;
            override_with(&mut cfg.font, font);
            override_with(&mut cfg.textures, textures);
            override_with(&mut cfg.output, output);
            bundle::merge_files(&cfg.font, &cfg.textures, &cfg.output, style)?;
        }
        Command::CorrectGlyphs { metrics } => {
            let cfg = &mut config.glyphs;
            override_with(&mut cfg.metrics, metrics);
            glyphs::correct_file(&cfg.metrics, &cfg.corrections, style)?;
        }
        Command::WhitestCell {
            image,
            metrics,
            ignore_alpha,
        } => {
            let cfg = &mut config.whitest_cell;
            override_with(&mut cfg.image, image);
            override_with(&mut cfg.metrics, metrics);
            cfg.ignore_alpha |= ignore_alpha;
            brightest::mark_whitest_cell(&cfg.image, &cfg.metrics, cfg.scan_options(), style)?;
        }
        Command::Flip { images } => {
            let images = if images.is_empty() {
                config.flip.images
            } else {
                images
            };
            if images.is_empty() {
                log::warn!("flip: no images configured");
            }
            flip::flip_files(&images)?;
        }
        Command::ExtractAtlas { plist, output } => {
            let cfg = &mut config.atlas;
            override_with(&mut cfg.plist, plist);
            override_with(&mut cfg.output, output);
            atlas::extract_file(&cfg.plist, &cfg.output, &cfg.extract_options(), style)?;
        }
    }
    Ok(())
}

fn override_with<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}
