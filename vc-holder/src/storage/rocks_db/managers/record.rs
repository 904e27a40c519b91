use std::collections::BTreeSet;

use rocksdb::{IteratorMode, WriteBatch, DB};

use crate::error::HolderError;
use crate::record::{RecordId, VcRecord};
use crate::storage::rocks_db::managers::{column_family, decode_record_id, RECORD_CF};

/// Record id -> serialized record.
#[derive(Debug)]
pub struct RecordManager;

impl RecordManager {
	pub fn read(db: &DB, record_id: &RecordId) -> Result<Option<VcRecord>, HolderError> {
		let cf = column_family(db, RECORD_CF)?;
		let bytes = db.get_cf(&cf, record_id.as_str().as_bytes()).map_err(HolderError::DbError)?;
		bytes
			.map(|bytes| serde_json::from_slice(&bytes).map_err(HolderError::SerdeError))
			.transpose()
	}

	pub fn exists(db: &DB, record_id: &RecordId) -> Result<bool, HolderError> {
		let cf = column_family(db, RECORD_CF)?;
		let bytes = db.get_cf(&cf, record_id.as_str().as_bytes()).map_err(HolderError::DbError)?;
		Ok(bytes.is_some())
	}

	pub fn read_ids(db: &DB) -> Result<BTreeSet<RecordId>, HolderError> {
		let cf = column_family(db, RECORD_CF)?;
		let ids = db.iterator_cf(&cf, IteratorMode::Start).try_fold(BTreeSet::new(), |mut acc, item| {
			let (key, _) = item.map_err(HolderError::DbError)?;
			acc.insert(decode_record_id(&key)?);
			Ok::<_, HolderError>(acc)
		})?;
		Ok(ids)
	}

	pub fn write(db: &DB, batch: &mut WriteBatch, record: &VcRecord) -> Result<(), HolderError> {
		let cf = column_family(db, RECORD_CF)?;
		let record_id = record
			.record_id
			.as_ref()
			.ok_or_else(|| HolderError::BackendError("record has no id".to_string()))?;
		let bytes = serde_json::to_vec(record).map_err(HolderError::SerdeError)?;
		batch.put_cf(&cf, record_id.as_str().as_bytes(), bytes);
		Ok(())
	}

	pub fn remove(db: &DB, batch: &mut WriteBatch, record_id: &RecordId) -> Result<(), HolderError> {
		let cf = column_family(db, RECORD_CF)?;
		batch.delete_cf(&cf, record_id.as_str().as_bytes());
		Ok(())
	}
}
