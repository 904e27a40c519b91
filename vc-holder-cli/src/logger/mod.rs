use tracing_subscriber::filter::{FromEnvError, LevelFilter};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::LoggerConfig;

pub const LOG_ENV_VAR: &str = "VC_HOLDER_LOG";

#[derive(thiserror::Error, Debug)]
pub enum LoggingError {
	#[error("cannot load logging configuration from $VC_HOLDER_LOG: {0}")]
	BadEnv(FromEnvError),
}

/// Installs the global subscriber. Logs go to stderr so stdout stays machine-readable.
pub fn init(logger_config: LoggerConfig) -> Result<(), Box<dyn std::error::Error>> {
	let level = logger_config.logger_level.as_str().to_lowercase();
	let env_filter = EnvFilter::builder()
		.with_env_var(LOG_ENV_VAR)
		.from_env()
		.map_err(LoggingError::BadEnv)?
		.add_directive(LevelFilter::WARN.into())
		.add_directive(format!("vc_holder={}", level).parse()?)
		.add_directive(format!("vc_holder_cli={}", level).parse()?);
	FmtSubscriber::builder()
		.with_file(false)
		.with_env_filter(env_filter)
		.with_target(true) // include module path
		.with_level(true)
		.with_writer(std::io::stderr)
		.with_ansi(true)
		.init();
	Ok(())
}
