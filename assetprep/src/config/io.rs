//! Config file loading.

use std::path::Path;

use super::Config;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "assetprep.toml";

impl Config {
    /// Load the default config file at `path`. Returns defaults if the file
    /// doesn't exist; a file that exists but can't be read or parsed is an
    /// error.
    pub fn load(path: &Path) -> Result<Self, String> {
        match std::fs::read_to_string(path) {
            Ok(data) => {
                let cfg = parse(path, &data)?;
                log::debug!("config: loaded from {}", path.display());
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("config: {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(format!("failed to read {}: {e}", path.display())),
        }
    }

    /// Try to load config, returning an error message on failure.
    /// Unlike `load()`, a missing file is also an error; used for a config
    /// file named on the command line.
    pub fn try_load(path: &Path) -> Result<Self, String> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
        parse(path, &data)
    }
}

fn parse(path: &Path, data: &str) -> Result<Config, String> {
    toml::from_str(data).map_err(|e| format!("parse error in {}: {e}", path.display()))
}
