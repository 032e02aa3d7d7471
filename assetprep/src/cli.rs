//! Command-line arguments.
//!
//! Every path flag overrides the matching config entry; an absent flag
//! leaves the config value in place.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about = "Prepare SDF font and texture atlas assets")]
pub struct Cli {
    /// Config file [default: assetprep.toml in the working directory]
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// More output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only report errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print the default configuration to stdout and exit
    #[arg(long)]
    pub print_config: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Merge the font and texture descriptors into one data bundle
    Bundle {
        /// Font descriptor JSON
        #[arg(long, value_name = "PATH")]
        font: Option<PathBuf>,
        /// Texture atlas JSON
        #[arg(long, value_name = "PATH")]
        textures: Option<PathBuf>,
        /// Bundle to write
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Copy base-letter vertical offsets onto accented glyphs
    CorrectGlyphs {
        /// Glyph metrics JSON, rewritten in place
        #[arg(long, value_name = "PATH")]
        metrics: Option<PathBuf>,
    },

    /// Record the brightest texel of the SDF texture in the glyph metrics
    WhitestCell {
        /// SDF texture to scan
        #[arg(long, value_name = "PATH")]
        image: Option<PathBuf>,
        /// Glyph metrics JSON, rewritten in place
        #[arg(long, value_name = "PATH")]
        metrics: Option<PathBuf>,
        /// Skip the alpha channel while scanning
        #[arg(long)]
        ignore_alpha: bool,
    },

    /// Flip images vertically, in place
    Flip {
        /// Images to flip [default: the configured list]
        #[arg(value_name = "IMAGES")]
        images: Vec<PathBuf>,
    },

    /// Convert texture-packer plist output into atlas JSON
    ExtractAtlas {
        /// Packer plist
        #[arg(long, value_name = "PATH")]
        plist: Option<PathBuf>,
        /// Atlas JSON to write
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}
