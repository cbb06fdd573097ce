//! Configuration loading for the command-line front end
//!
//! Each setting is taken from the first source that has it:
//! 1. Command-line argument or its environment variable (merged by the caller)
//! 2. TOML config file
//! 3. Compiled default

use crate::core::phonology::Separator;
use crate::error::{InflectError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const SEPARATOR_ENV: &str = "PVI_SEPARATOR";
pub const CACHE_ENV: &str = "PVI_CACHE";

const APP_DIR: &str = "persian-verbs";
const CONFIG_FILE: &str = "config.toml";
const CACHE_FILE: &str = "paradigms.bin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub separator: Separator,
    pub cache_path: PathBuf,
    /// Print profiles as JSON instead of a table.
    pub json: bool,
}

/// The subset of settings a config file may carry.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    separator: Option<String>,
    cache: Option<PathBuf>,
    json: Option<bool>,
}

impl Config {
    /// Merges command-line values over the config file over the defaults.
    /// An explicitly named config file must exist; the default one is
    /// optional.
    pub fn resolve(
        cli_separator: Option<&str>,
        cli_cache: Option<&Path>,
        cli_json: bool,
        config_file: Option<&Path>,
    ) -> Result<Self> {
        let file = match config_file {
            Some(path) => load_file(path)?,
            None => match default_config_file().filter(|path| path.exists()) {
                Some(path) => load_file(&path)?,
                None => FileConfig::default(),
            },
        };

        let separator = match cli_separator.or(file.separator.as_deref()) {
            Some(value) => value.parse()?,
            None => Separator::default(),
        };
        let cache_path = match cli_cache {
            Some(path) => path.to_path_buf(),
            None => file.cache.unwrap_or_else(default_cache_path),
        };
        let config = Config {
            separator,
            cache_path,
            json: cli_json || file.json.unwrap_or(false),
        };
        debug!(?config, "configuration resolved");
        Ok(config)
    }
}

fn load_file(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| InflectError::Config(format!("{}: {}", path.display(), e)))
}

/// `<config dir>/persian-verbs/config.toml`
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE))
}

pub fn default_cache_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR))
        .join(CACHE_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn command_line_wins_over_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("config.toml");
        fs::write(&file, "separator = \"space\"\ncache = \"/tmp/from-file.bin\"\n").unwrap();

        let config =
            Config::resolve(Some("none"), Some(Path::new("/tmp/cli.bin")), false, Some(&file))
                .unwrap();
        assert_eq!(config.separator, Separator::None);
        assert_eq!(config.cache_path, PathBuf::from("/tmp/cli.bin"));
    }

    #[test]
    fn file_fills_what_the_command_line_omits() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("config.toml");
        fs::write(&file, "separator = \"space\"\njson = true\n").unwrap();

        let config = Config::resolve(None, None, false, Some(&file)).unwrap();
        assert_eq!(config.separator, Separator::Space);
        assert!(config.json);
        assert_eq!(config.cache_path, default_cache_path());
    }

    #[test]
    fn empty_file_means_defaults() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("config.toml");
        fs::write(&file, "").unwrap();

        let config = Config::resolve(None, None, false, Some(&file)).unwrap();
        assert_eq!(config.separator, Separator::Zwnj);
        assert!(!config.json);
        assert!(config.cache_path.ends_with("persian-verbs/paradigms.bin"));
    }

    #[test]
    fn bad_separator_in_file_is_rejected() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("config.toml");
        fs::write(&file, "separator = \"dash\"\n").unwrap();

        assert!(matches!(
            Config::resolve(None, None, false, Some(&file)),
            Err(InflectError::InvalidSeparator(s)) if s == "dash"
        ));
    }

    #[test]
    fn unknown_keys_and_missing_file_are_errors() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("config.toml");
        fs::write(&file, "colour = \"red\"\n").unwrap();
        assert!(matches!(
            Config::resolve(None, None, false, Some(&file)),
            Err(InflectError::Config(_))
        ));
        assert!(matches!(
            Config::resolve(None, None, false, Some(&dir.path().join("absent.toml"))),
            Err(InflectError::Io(_))
        ));
    }
}
