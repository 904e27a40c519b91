use std::path::PathBuf;

use vc_holder::HolderError;

#[derive(thiserror::Error, Debug)]
pub enum CliError {
	#[error("ReadError: {path}: {source}")]
	ReadError { path: PathBuf, source: std::io::Error },

	#[error("OutputError: {0}")]
	OutputError(#[from] std::io::Error),

	#[error("ParseError: {0}")]
	ParseError(#[from] serde_json::Error),

	#[error("either --id or --given-id is required")]
	MissingLookupKey,

	#[error("HolderError: {0}")]
	HolderError(#[from] HolderError),
}
