use rocksdb::{WriteBatch, DB};

use crate::error::HolderError;
use crate::record::RecordId;
use crate::storage::rocks_db::managers::{column_family, decode_record_id, GIVEN_ID_CF};

/// Given id -> record id, backing the one-record-per-given-id rule.
#[derive(Debug)]
pub struct GivenIdManager;

impl GivenIdManager {
	pub fn read(db: &DB, given_id: &str) -> Result<Option<RecordId>, HolderError> {
		let cf = column_family(db, GIVEN_ID_CF)?;
		let bytes = db.get_cf(&cf, given_id.as_bytes()).map_err(HolderError::DbError)?;
		bytes.map(|bytes| decode_record_id(&bytes)).transpose()
	}

	pub fn write(
		db: &DB, batch: &mut WriteBatch, given_id: &str, record_id: &RecordId,
	) -> Result<(), HolderError> {
		let cf = column_family(db, GIVEN_ID_CF)?;
		batch.put_cf(&cf, given_id.as_bytes(), record_id.as_str().as_bytes());
		Ok(())
	}

	pub fn remove(db: &DB, batch: &mut WriteBatch, given_id: &str) -> Result<(), HolderError> {
		let cf = column_family(db, GIVEN_ID_CF)?;
		batch.delete_cf(&cf, given_id.as_bytes());
		Ok(())
	}
}
