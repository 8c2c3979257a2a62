//! Bot configuration loading from config.toml
//!
//! The file is read once at startup and again whenever an administrator runs
//! `/reload`. Every field has a default so a partial (or empty) file is valid.
//! Secrets never live here; they come from the environment.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Prefix for text commands
    pub prefix: String,
    /// `chrono` format used for plain dates typed by admins
    pub datetime_fmt: String,
    /// Rank names indexed by membership level
    pub mem_level_names: Vec<String>,
    /// Member fields admins may change with `update-member`
    pub updateable_keys: Vec<String>,
    /// Answers that count as "yes"
    pub true_values: Vec<String>,
    /// Answers that count as "no"
    pub false_values: Vec<String>,
    /// Guild used for fast command registration during development
    pub test_guild_id: Option<u64>,
    /// Channel watched for applications
    pub application_channel_id: Option<u64>,
    /// Role granted to accepted applicants
    pub trial_member_role_id: Option<u64>,
    /// Wise Old Man group that competitions are mirrored to
    pub wom_group_id: Option<i64>,
    /// Enabled command modules
    pub modules: Vec<String>,
    /// Google Sheets credential locations
    pub sheets: SheetsConfig,
}

/// File locations for the Google Sheets integration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SheetsConfig {
    /// OAuth client credentials downloaded from the Google console
    pub credentials_path: PathBuf,
    /// Cached access/refresh token
    pub token_path: PathBuf,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            credentials_path: PathBuf::from("credentials.json"),
            token_path: PathBuf::from("token.json"),
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            prefix: "!".to_string(),
            datetime_fmt: "%Y-%m-%d".to_string(),
            mem_level_names: strings(&[
                "Trial",
                "Junior",
                "Member",
                "Senior",
                "Tenured",
                "Esteemed",
                "Moderator",
                "Captain",
                "Owner",
            ]),
            updateable_keys: strings(&[
                "rsn",
                "discord_id",
                "discord_id_num",
                "membership_level",
                "join_date",
                "special_status",
                "previous_rsn",
                "alt_rsn",
                "on_leave",
                "active",
                "notes",
                "loc",
                "timezone",
                "skill_comp_pts",
                "boss_comp_pts",
            ]),
            true_values: strings(&["true", "1", "t", "y", "yes", "yeah", "yup", "ye"]),
            false_values: strings(&["false", "0", "f", "n", "no", "nope", "nah"]),
            test_guild_id: None,
            application_channel_id: None,
            trial_member_role_id: None,
            wom_group_id: None,
            modules: strings(&[
                "admin",
                "applications",
                "competition",
                "dev",
                "general",
                "lookup",
                "lottery",
                "profile",
            ]),
            sheets: SheetsConfig::default(),
        }
    }
}

impl BotConfig {
    /// True when `value` is one of the configured "yes" synonyms.
    #[must_use]
    pub fn is_truthy(&self, value: &str) -> bool {
        let value = value.trim().to_lowercase();
        self.true_values.iter().any(|t| *t == value)
    }

    /// Rank name for a membership level.
    #[must_use]
    pub fn level_name(&self, level: i32) -> Option<&str> {
        usize::try_from(level)
            .ok()
            .and_then(|i| self.mem_level_names.get(i))
            .map(String::as_str)
    }

    /// True when `key` is on the update allowlist.
    #[must_use]
    pub fn is_updateable(&self, key: &str) -> bool {
        self.updateable_keys.iter().any(|k| k == key)
    }

    /// True when the command module is enabled.
    #[must_use]
    pub fn module_enabled(&self, module: &str) -> bool {
        self.modules.iter().any(|m| m == module)
    }
}

/// Loads bot configuration from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<BotConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!(
            "Failed to read config file {}: {e}",
            path.as_ref().display()
        ),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Path of the configuration file: `CONFIG_PATH` or `./config.toml`.
#[must_use]
pub fn config_path() -> PathBuf {
    std::env::var("CONFIG_PATH").map_or_else(|_| PathBuf::from("config.toml"), PathBuf::from)
}
