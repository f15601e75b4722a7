use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Context;
use serde::Deserialize;
use crate::report::DEFAULT_TOP_K;

const CONFIG_FILE: &str = "config.toml";

/// Report settings, read from a TOML file. Keys missing from the file keep their default value.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub(crate) struct Config {
    /// Export file used when none is given on the command line
    pub(crate) input: PathBuf,
    /// Directory receiving the chart images
    pub(crate) output_dir: PathBuf,
    /// Number of expenses listed per month
    pub(crate) top: usize,
    /// Maximum characters of payer name and purpose in chart tables
    pub(crate) text_width: usize,
    /// List months in calendar order instead of the order they appear in the export
    pub(crate) chronological: bool,
    pub(crate) theme: Theme,
}

/// Chart colours as `#RRGGBB`
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub(crate) struct Theme {
    pub(crate) face: String,
    pub(crate) axes: String,
    pub(crate) label: String,
    pub(crate) line: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input: PathBuf::from("private/import/import.csv"),
            output_dir: PathBuf::from("private/images"),
            top: DEFAULT_TOP_K,
            text_width: 42,
            chronological: false,
            theme: Theme::default(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            face: "#000000".to_string(),
            axes: "#333333".to_string(),
            label: "#FFFFFF".to_string(),
            line: "#87CEEB".to_string(),
        }
    }
}

impl Config {
    /// Load config from a file, or the defaults if there is no such file
    pub(crate) fn load_from_file(file_path: &Path) -> anyhow::Result<Config> {
        if file_path.exists() && file_path.is_file() {
            let content = fs::read_to_string(file_path)
                .with_context(|| format!("reading {}", file_path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("parsing {}", file_path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// `<config dir>/saldo/config.toml`, e.g. ~/.config/saldo/config.toml on Linux
    pub(crate) fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(env!("CARGO_PKG_NAME")).join(CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use crate::config::Config;

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = Config::load_from_file(&PathBuf::from("/nonexistent/saldo.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.top, 10);
        assert_eq!(config.text_width, 42);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "output_dir = \"out\"\nchronological = true\n\n[theme]\nline = \"#FF0000\"\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert!(config.chronological);
        assert_eq!(config.theme.line, "#FF0000");
        assert_eq!(config.theme.axes, "#333333");
        assert_eq!(config.input, PathBuf::from("private/import/import.csv"));
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "top = \"ten\"\n").unwrap();
        assert!(Config::load_from_file(&path).is_err());
    }
}
