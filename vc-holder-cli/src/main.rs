use clap::Parser;
use tracing::debug;
use vc_holder::RocksDbHolder;

use crate::cli::Command;
use crate::config::Config;

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod import;
pub mod logger;

fn main() -> Result<(), Box<dyn std::error::Error>> {
	let config = Config::from_env()?;
	let args = cli::Args::parse();

	logger::init(config.logger_config.clone())?;
	debug!("\n{:#?}", config);

	let mut rocks_db_config = config.rocks_db_config;
	if let Some(db_dir) = args.db_dir {
		rocks_db_config.path = db_dir;
	}
	let holder = RocksDbHolder::open(&rocks_db_config)?;

	let mut out = std::io::stdout().lock();
	match args.command {
		Command::Store(store_args) => commands::store(&holder, store_args, &mut out)?,
		Command::Get(lookup_args) => commands::get(&holder, lookup_args, &mut out)?,
		Command::Delete(lookup_args) => commands::delete(&holder, lookup_args, &mut out)?,
		Command::Search(search_args) => commands::search(&holder, search_args, &mut out)?,
	}
	Ok(())
}
