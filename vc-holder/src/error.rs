use rocksdb::Error as RocksDbError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Problems detectable from a record or a query alone, before any backend call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
	#[error("EmptyTypes: a credential record needs at least one expanded type")]
	EmptyTypes,

	#[error("KeyCollision: cred_tags key {0:?} collides with a derived tag")]
	KeyCollision(String),

	#[error("UnsupportedQuery: {0}")]
	UnsupportedQuery(String),
}

#[derive(Debug, Error)]
pub enum HolderError {
	#[error("ValidationError: {0}")]
	ValidationError(#[from] ValidationError),

	#[error("NotFoundError: {0}")]
	NotFoundError(String),

	#[error("DuplicateGivenIdError: {0}")]
	DuplicateGivenIdError(String),

	#[error("MultipleResultsError: {0}")]
	MultipleResultsError(String),

	#[error("ClosedCursorError")]
	ClosedCursorError,

	#[error("DbError: {0}")]
	DbError(RocksDbError),

	#[error("SerdeError: {0}")]
	SerdeError(SerdeJsonError),

	#[error("BackendError: {0}")]
	BackendError(String),
}

impl HolderError {
	/// Whether the failure came from the storage dependency rather than from the caller's input.
	pub fn is_backend_error(&self) -> bool {
		matches!(self, Self::DbError(_) | Self::SerdeError(_) | Self::BackendError(_))
	}
}
