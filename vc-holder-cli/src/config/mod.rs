use std::env;

use dotenv::dotenv;
use tracing::Level;
use vc_holder::RocksDbHolderConfig;

pub const DEFAULT_DB_PATH: &str = "./holder-db";

// types to components
#[derive(Clone, Debug)]
pub struct LoggerConfig {
	pub logger_level: Level,
}

#[derive(Debug)]
pub struct Config {
	pub logger_config: LoggerConfig,
	pub rocks_db_config: RocksDbHolderConfig,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
	#[error("unrecognized LOGGER_LEVEL {0:?}")]
	BadLoggerLevel(String),
}

fn parse_level_from_string(level: &str) -> Option<Level> {
	match level.to_lowercase().as_str() {
		"trace" => Some(Level::TRACE),
		"debug" => Some(Level::DEBUG),
		"info" => Some(Level::INFO),
		"warn" => Some(Level::WARN),
		"error" => Some(Level::ERROR),
		_ => None,
	}
}

impl Config {
	pub fn from_env() -> Result<Self, ConfigError> {
		dotenv().ok();
		Self::from_lookup(|key| env::var(key).ok())
	}

	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
		let logger_level_str = lookup("LOGGER_LEVEL").unwrap_or("info".to_string());
		let logger_level = parse_level_from_string(&logger_level_str)
			.ok_or(ConfigError::BadLoggerLevel(logger_level_str))?;

		let holder_db_path = lookup("HOLDER_DB_PATH").unwrap_or(DEFAULT_DB_PATH.to_string());

		let logger_config = LoggerConfig { logger_level };
		let rocks_db_config = RocksDbHolderConfig::new(holder_db_path);

		Ok(Config { logger_config, rocks_db_config })
	}
}
