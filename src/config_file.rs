use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::{Args, OutMode, SourceLang};
use crate::error::{BadgeError, Result};

/// Defaults read from a `--config` JSON file.
///
/// ```json
/// { "ratio": "splash", "outmode": "bin", "disableDithering": true }
/// ```
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigFile {
    pub ratio: Option<String>,
    pub outmode: Option<String>,
    pub disable_dithering: Option<bool>,
    pub show: Option<bool>,
    pub legacy_ratio: Option<bool>,
    pub source_lang: Option<String>,
    pub var_name: Option<String>,
    pub output_dir: Option<String>,
    pub verbose: Option<bool>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| BadgeError::Config {
            path: path.to_path_buf(),
            message: format!("failed to read: {}", e),
        })?;

        serde_json::from_str(&contents).map_err(|e| BadgeError::Config {
            path: path.to_path_buf(),
            message: format!("failed to parse: {}", e),
        })
    }
}

impl Args {
    /// Load the `--config` file, if any, and fill in every setting the
    /// command line left unset
    pub fn load_and_merge_config(&mut self) -> Result<()> {
        if let Some(config_path) = self.config_file.clone() {
            let config = ConfigFile::load(&config_path)?;
            self.merge_from_config(config)?;
        }
        Ok(())
    }

    pub fn merge_from_config(&mut self, config: ConfigFile) -> Result<()> {
        if self.ratio.is_none() {
            self.ratio = config.ratio;
        }

        if self.outmode.is_none() {
            if let Some(mode) = config.outmode {
                let parsed = OutMode::from_str(&mode, true)
                    .map_err(|_| BadgeError::InvalidOutMode(mode.clone()))?;
                self.outmode = Some(parsed);
            }
        }

        if self.source_lang.is_none() {
            if let Some(lang) = config.source_lang {
                let parsed = SourceLang::from_str(&lang, true)
                    .map_err(|_| BadgeError::InvalidSourceLang(lang.clone()))?;
                self.source_lang = Some(parsed);
            }
        }

        if self.var_name.is_none() {
            self.var_name = config.var_name;
        }

        if self.output_dir.is_none() {
            self.output_dir = config.output_dir.map(PathBuf::from);
        }

        // Boolean flags - only apply if currently false (default)
        if !self.disable_dithering {
            self.disable_dithering = config.disable_dithering.unwrap_or(false);
        }

        if !self.show {
            self.show = config.show.unwrap_or(false);
        }

        if !self.legacy_ratio {
            self.legacy_ratio = config.legacy_ratio.unwrap_or(false);
        }

        if !self.verbose {
            self.verbose = config.verbose.unwrap_or(false);
        }

        Ok(())
    }
}
