//! Configuration types.

use std::path::PathBuf;

/// Registry configuration, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Directory holding the YAML content and account files.
    pub data_dir: PathBuf,
    /// Port for the HTTP server.
    pub port: u16,
    /// Pro id used when a read-only context request omits one.
    pub default_pro_id: String,
    /// Default item count for the UI next-steps list.
    pub ui_next_steps_limit: usize,
    /// Default item count for the agent next-steps endpoint.
    pub agent_next_steps_limit: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            port: 8080,
            default_pro_id: "pro-001".to_string(),
            ui_next_steps_limit: 3,
            agent_next_steps_limit: 5,
        }
    }
}

impl RegistryConfig {
    /// Build a config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            data_dir: std::env::var("PRO_ONBOARD_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            port: std::env::var("PRO_ONBOARD_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            default_pro_id: std::env::var("PRO_ONBOARD_DEFAULT_PRO")
                .unwrap_or(defaults.default_pro_id),
            ui_next_steps_limit: defaults.ui_next_steps_limit,
            agent_next_steps_limit: defaults.agent_next_steps_limit,
        }
    }
}
