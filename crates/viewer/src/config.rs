use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

pub(crate) const CONFIG_PATH_ENV_VAR: &str = "CAMERA_VIEWER_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "viewer.json";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct ViewerConfig {
    pub(crate) window_title: String,
    pub(crate) window_width: u32,
    pub(crate) window_height: u32,
    pub(crate) start_focal_x: f32,
    pub(crate) start_focal_y: f32,
    pub(crate) start_zoom: f32,
    pub(crate) marker_spacing_world: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_title: "Camera Viewer".to_string(),
            window_width: 1280,
            window_height: 720,
            start_focal_x: 0.0,
            start_focal_y: 0.0,
            start_zoom: 1.0,
            marker_spacing_world: 64.0,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file '{path}': {detail}")]
    Parse { path: PathBuf, detail: String },
}

/// Loads the viewer config from `CAMERA_VIEWER_CONFIG`, falling back to
/// `viewer.json` in the working directory. A missing default file yields the
/// built-in defaults; an explicitly configured path must exist.
pub(crate) fn load_config() -> Result<ViewerConfig, ConfigError> {
    match env::var(CONFIG_PATH_ENV_VAR) {
        Ok(value) if !value.trim().is_empty() => {
            load_config_from_path(Path::new(value.trim()), true)
        }
        _ => load_config_from_path(Path::new(DEFAULT_CONFIG_PATH), false),
    }
}

fn load_config_from_path(path: &Path, required: bool) -> Result<ViewerConfig, ConfigError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(source) if source.kind() == ErrorKind::NotFound && !required => {
            info!(path = %path.display(), "viewer_config_missing_using_defaults");
            return Ok(ViewerConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let config = parse_config_json(&raw).map_err(|detail| ConfigError::Parse {
        path: path.to_path_buf(),
        detail,
    })?;
    info!(path = %path.display(), "viewer_config_loaded");
    Ok(config)
}

fn parse_config_json(raw: &str) -> Result<ViewerConfig, String> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, ViewerConfig>(&mut deserializer) {
        Ok(config) => Ok(config),
        Err(error) => {
            let json_path = error.path().to_string();
            let source = error.into_inner();
            if json_path.is_empty() || json_path == "." {
                Err(source.to_string())
            } else {
                Err(format!("at {json_path}: {source}"))
            }
        }
    }
}
