use std::fs;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::PlannerError;

/// Configuration stored in ~/.tripplan/config.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerConfig {
    /// IANA zone used to decide which local day an activity falls on, and to
    /// read timestamps that carry no offset.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_pretty_json")]
    pub pretty_json: bool,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_pretty_json() -> bool {
    true
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            pretty_json: default_pretty_json(),
        }
    }
}

impl PlannerConfig {
    pub fn tz(&self) -> Result<Tz, PlannerError> {
        parse_timezone(&self.timezone)
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz, PlannerError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| PlannerError::UnknownTimezone(name.to_string()))
}

pub fn default_config_path() -> Result<PathBuf, PlannerError> {
    let home = dirs::home_dir()
        .ok_or_else(|| PlannerError::Config("Could not find home directory".to_string()))?;
    Ok(home.join(".tripplan").join("config.json"))
}

/// Load `~/.tripplan/config.json`, falling back to defaults when it doesn't exist.
pub fn load_config() -> Result<PlannerConfig, PlannerError> {
    let path = default_config_path()?;
    if !path.exists() {
        log::debug!("No config at {}; using defaults", path.display());
        return Ok(PlannerConfig::default());
    }
    load_config_from(&path)
}

/// Load an explicitly named config file. A missing file is an error here.
pub fn load_config_from(path: &Path) -> Result<PlannerConfig, PlannerError> {
    let content = fs::read_to_string(path).map_err(|e| PlannerError::io(path, e))?;
    let config: PlannerConfig =
        serde_json::from_str(&content).map_err(|e| PlannerError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    // Surface a bad zone at load time rather than on first use.
    config.tz()?;

    log::info!("Loaded config from {} (timezone {})", path.display(), config.timezone);
    Ok(config)
}
