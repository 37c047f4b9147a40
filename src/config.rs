//! Application configuration with TOML file support.
//!
//! Every field has a default and the struct is `#[serde(default)]`, so a
//! config file only needs the keys it wants to override.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable naming a TOML config file.
pub const CONFIG_ENV: &str = "ORBITVIEW_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default `env_logger` filter, overridden by `RUST_LOG`.
    pub log_filter: String,
    /// Present with vsync (`Fifo`) instead of `Immediate`.
    pub vsync: bool,
    /// Show the FPS / frame time overlay.
    pub show_stats: bool,
    pub ui_font_size: f32,
    /// Clear colour used by scenes that don't set a background.
    pub clear_color: [f32; 3],
    pub default_window: WindowSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_filter: "info,wgpu_core=warn,wgpu_hal=warn,naga=warn".to_string(),
            vsync: true,
            show_stats: true,
            ui_font_size: 16.0,
            clear_color: [0.0, 0.0, 0.0],
            default_window: WindowSize::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Load a config file. Missing keys use defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load the file named by `ORBITVIEW_CONFIG`, or defaults when unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn present_mode(&self) -> wgpu::PresentMode {
        if self.vsync {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::Immediate
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_toml_overrides_only_given_keys() {
        let config = AppConfig::from_toml_str(
            r#"
            vsync = false

            [default_window]
            width = 200
            "#,
        )
        .unwrap();

        assert!(!config.vsync);
        assert_eq!(config.default_window.width, 200);
        assert_eq!(config.default_window.height, 800);
        assert!(config.show_stats);
        assert_eq!(config.present_mode(), wgpu::PresentMode::Immediate);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let err = AppConfig::from_toml_str("vsync = \"sometimes\"").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = AppConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        match err {
            Error::ConfigIo { path, .. } => assert!(path.ends_with("here.toml")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
