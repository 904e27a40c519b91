use std::sync::Arc;

use rocksdb::{BoundColumnFamily, DB};

use crate::error::HolderError;

pub mod given_id;
pub mod record;
pub mod tag;

pub const RECORD_CF: &str = "record";
pub const TAG_CF: &str = "tag";
pub const GIVEN_ID_CF: &str = "given_id";
pub const COLUMN_FAMILIES: [&str; 3] = [RECORD_CF, TAG_CF, GIVEN_ID_CF];

pub(crate) fn column_family<'a>(
	db: &'a DB, name: &str,
) -> Result<Arc<BoundColumnFamily<'a>>, HolderError> {
	db.cf_handle(name)
		.ok_or_else(|| HolderError::BackendError(format!("missing column family {}", name)))
}

pub(crate) fn decode_record_id(bytes: &[u8]) -> Result<crate::record::RecordId, HolderError> {
	let id = std::str::from_utf8(bytes)
		.map_err(|e| HolderError::BackendError(format!("malformed record id: {}", e)))?;
	Ok(crate::record::RecordId::new(id))
}
