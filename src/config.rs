use std::error::Error;
use std::fs;
use std::path::Path;

use cube_runtime::StreamConfig;
use cube_world::WorldGenConfig;
use serde::Deserialize;

/// Top-level document: `[world]` terrain parameters and `[stream]` settings.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub world: WorldGenConfig,
    #[serde(default)]
    pub stream: StreamConfig,
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: AppConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        self.world.validate()?;
        self.stream.validate()?;
        Ok(())
    }
}

pub fn load_app_config(path: &Path) -> Result<AppConfig, Box<dyn Error>> {
    let s = fs::read_to_string(path).map_err(|e| format!("reading {}: {e}", path.display()))?;
    AppConfig::from_toml_str(&s)
}
