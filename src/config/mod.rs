//! User configuration loaded from TOML

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Directories scanned for additional ABI files
    #[serde(default)]
    pub abi_paths: Vec<String>,

    /// Whether the built-in EFP interfaces are registered
    #[serde(default = "default_builtin")]
    pub builtin: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            abi_paths: Vec::new(),
            builtin: default_builtin(),
        }
    }
}

fn default_builtin() -> bool {
    true
}

impl Config {
    /// Configured ABI directories, expanded and made absolute
    pub fn abi_roots(&self) -> Vec<PathBuf> {
        self.abi_paths
            .iter()
            .filter_map(|raw| expand_path(raw))
            .collect()
    }
}

/// Load the config file, falling back to defaults when missing or invalid
pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) => {
            if path.exists() {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
            }
            return Config::default();
        }
    };
    parse(&content).unwrap_or_else(|err| {
        tracing::warn!("Failed to parse config at {:?}: {}", path, err);
        Config::default()
    })
}

pub fn parse(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(content)
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("EFP_ABI_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("efp-abi").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("efp-abi").join("config.toml"));
    }

    directories::ProjectDirs::from("xyz", "efp", "efp-abi")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn expand_path(path: &str) -> Option<PathBuf> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(rest) = trimmed.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
            return Some(home.join(rest));
        }
    }

    let mut buf = PathBuf::from(trimmed);
    if buf.is_relative() {
        if let Ok(cwd) = std::env::current_dir() {
            buf = cwd.join(buf);
        }
    }
    Some(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let config = parse("").unwrap();
        assert!(config.builtin);
        assert!(config.abi_paths.is_empty());
    }

    #[test]
    fn test_parse_values() {
        let config = parse("abi_paths = [\"/opt/abis\", \" \"]\nbuiltin = false\n").unwrap();
        assert!(!config.builtin);
        assert_eq!(config.abi_roots(), vec![PathBuf::from("/opt/abis")]);
    }

    #[test]
    fn test_parse_rejects_wrong_types() {
        assert!(parse("builtin = \"yes\"").is_err());
    }

    #[test]
    fn test_expand_relative_path() {
        let expanded = expand_path("abis").unwrap();
        assert!(expanded.is_absolute());
        assert!(expanded.ends_with("abis"));
        assert_eq!(expand_path("   "), None);
    }
}
