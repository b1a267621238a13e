use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    pub listen_port: u16,
    pub backend_url: String,
    pub backend_token: String,
    pub admin_path: String,
    /// Static bearer token for the admin API. Empty means open (local dev).
    pub admin_token: String,
    pub data_dir: String,
    /// Keep simulation state in memory only, nothing written to disk.
    #[serde(default)]
    pub ephemeral: bool,
}

impl PanelConfig {
    pub fn load() -> Result<Self> {
        // Try to load from /etc/samodelkin/panel.toml first
        let config_paths = vec!["/etc/samodelkin/panel.toml", "./panel.toml"];

        for path in config_paths {
            if let Ok(contents) = fs::read_to_string(path) {
                tracing::info!("Loading config from {}", path);
                return Ok(toml::from_str(&contents)?);
            }
        }

        // Fallback to environment variables
        tracing::info!("Loading config from environment");
        Ok(Self {
            listen_port: std::env::var("PANEL_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            backend_url: std::env::var("BACKEND_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8080".to_string()),
            backend_token: std::env::var("BACKEND_TOKEN").unwrap_or_default(),
            admin_path: std::env::var("ADMIN_PATH").unwrap_or_else(|_| "/admin".to_string()),
            admin_token: std::env::var("ADMIN_TOKEN").unwrap_or_default(),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| ".".to_string()),
            ephemeral: matches!(
                std::env::var("EPHEMERAL").as_deref(),
                Ok("1") | Ok("true")
            ),
        })
    }

    /// Admin path with a guaranteed leading slash.
    pub fn admin_prefix(&self) -> String {
        if self.admin_path.starts_with('/') {
            self.admin_path.clone()
        } else {
            format!("/{}", self.admin_path)
        }
    }

    pub fn state_file(&self) -> PathBuf {
        Path::new(&self.data_dir).join("simulation_state.json")
    }
}
