//! Application configuration.
//!
//! Sources, later overriding earlier:
//! 1. built-in defaults
//! 2. `hotel_desk.toml` in the working directory (if present)
//! 3. the file passed to [`DeskConfig::load`] (if any)
//! 4. the file named by `HOTEL_DESK_CONFIG` (if set)
//! 5. `HOTEL_DESK__*` environment variables, e.g. `HOTEL_DESK__ROOMS=101,102`
//!    or `HOTEL_DESK__HOTEL__NAME="Sea View"`

use crate::error::{DeskError, DeskResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Default configuration file name, without extension.
pub const DEFAULT_CONFIG_FILE: &str = "hotel_desk";
/// Environment variable naming an extra configuration file.
pub const CONFIG_ENV_VAR: &str = "HOTEL_DESK_CONFIG";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "HOTEL_DESK";
/// Environment variable holding a tracing filter directive.
pub const LOG_ENV_VAR: &str = "HOTEL_DESK_LOG";

/// Identification block printed at the top of every receipt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HotelProfile {
    pub name: String,
    pub address: String,
    pub gstin: String,
    pub phone: String,
}

impl Default for HotelProfile {
    fn default() -> Self {
        Self {
            name: "CAPITAL 409".into(),
            address: "Megha Road, Abhanpur, Chhattisgarh, India".into(),
            gstin: "22IOLPS6709M1Z6".into(),
            phone: "+91 74149 83156".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DeskConfig {
    /// SQLite database file.
    pub database_path: PathBuf,
    /// Directory receiving rendered receipts.
    pub receipts_dir: PathBuf,
    /// Rooms seeded into the registry at startup.
    pub rooms: Vec<String>,
    pub hotel: HotelProfile,
    /// Program and arguments used to print; the receipt path is appended.
    pub print_command: Vec<String>,
    pub log_level: String,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("hotel_billing.db"),
            receipts_dir: PathBuf::from("receipts"),
            rooms: ["101", "102", "103", "104", "105", "106"]
                .iter()
                .map(|r| r.to_string())
                .collect(),
            hotel: HotelProfile::default(),
            print_command: vec!["lpr".to_string()],
            log_level: "info".to_string(),
        }
    }
}

impl DeskConfig {
    pub fn load(path: Option<&Path>) -> DeskResult<Self> {
        use ::config::{Config, Environment, File};

        let mut builder = Config::builder()
            .add_source(Config::try_from(&DeskConfig::default())?)
            .add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::from(config_path).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::with_name(&config_path).required(true));
        }

        let config: DeskConfig = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("rooms")
                    .with_list_parse_key("print_command")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DeskResult<()> {
        if self.rooms.is_empty() {
            return Err(DeskError::Config("at least one room must be configured".into()));
        }

        let mut seen = HashSet::new();
        for room in &self.rooms {
            let room = room.trim();
            if room.is_empty() {
                return Err(DeskError::Config("room numbers cannot be blank".into()));
            }
            if !seen.insert(room) {
                return Err(DeskError::Config(format!("room {} is listed twice", room)));
            }
        }

        if self.print_command.first().map_or(true, |p| p.trim().is_empty()) {
            return Err(DeskError::Config("print_command cannot be empty".into()));
        }

        Ok(())
    }

    /// Anchors relative file locations under `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        if self.database_path.is_relative() {
            self.database_path = base.join(&self.database_path);
        }
        if self.receipts_dir.is_relative() {
            self.receipts_dir = base.join(&self.receipts_dir);
        }
    }
}
