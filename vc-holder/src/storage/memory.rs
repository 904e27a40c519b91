use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::error::HolderError;
use crate::query::TagQuery;
use crate::record::{RecordId, VcRecord};
use crate::storage::{HolderStore, IdCursor, RecordCursor};
use crate::tags::{TagMap, TagProjector};

struct StoredRecord {
	record: VcRecord,
	tags: TagMap,
}

type Records = BTreeMap<RecordId, StoredRecord>;

/// Holder store kept entirely in process memory.
///
/// Useful for tests and for wallets that do not outlive the process.
#[derive(Default)]
pub struct InMemoryHolder {
	records: RwLock<Records>,
}

impl InMemoryHolder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn count(&self) -> Result<usize, HolderError> {
		let records = self.read()?;
		Ok(records.len())
	}

	fn read(&self) -> Result<RwLockReadGuard<'_, Records>, HolderError> {
		self.records.read().map_err(|e| HolderError::BackendError(format!("lock poisoned: {}", e)))
	}

	fn write(&self) -> Result<RwLockWriteGuard<'_, Records>, HolderError> {
		self.records.write().map_err(|e| HolderError::BackendError(format!("lock poisoned: {}", e)))
	}
}

impl HolderStore for InMemoryHolder {
	fn store(&self, record: &VcRecord) -> Result<RecordId, HolderError> {
		let tags = TagProjector::tag_map(record)?;
		let record_id = record.record_id.clone().unwrap_or_else(RecordId::generate);

		let mut records = self.write()?;
		if let Some(given_id) = &record.given_id {
			let taken = records.values().any(|stored| stored.record.given_id.as_ref() == Some(given_id));
			if taken {
				return Err(HolderError::DuplicateGivenIdError(given_id.clone()));
			}
		}
		if records.contains_key(&record_id) {
			return Err(HolderError::BackendError(format!("record {} already exists", record_id)));
		}

		let mut record = record.clone();
		record.record_id = Some(record_id.clone());
		debug!(%record_id, tag_count = tags.len(), "storing credential record");
		records.insert(record_id.clone(), StoredRecord { record, tags });

		Ok(record_id)
	}

	fn retrieve_by_id(&self, record_id: &RecordId) -> Result<VcRecord, HolderError> {
		let records = self.read()?;
		records
			.get(record_id)
			.map(|stored| stored.record.clone())
			.ok_or_else(|| HolderError::NotFoundError(record_id.to_string()))
	}

	fn delete(&self, record_id: &RecordId) -> Result<(), HolderError> {
		let mut records = self.write()?;
		records.remove(record_id).ok_or_else(|| HolderError::NotFoundError(record_id.to_string()))?;
		debug!(%record_id, "deleted credential record");
		Ok(())
	}

	fn search(
		&self, query: &TagQuery, limit: Option<usize>,
	) -> Result<Box<dyn RecordCursor + '_>, HolderError> {
		let records = self.read()?;
		let ids: Vec<RecordId> = records
			.iter()
			.filter(|(_, stored)| query.matches(&stored.tags))
			.map(|(record_id, _)| record_id.clone())
			.collect();
		drop(records);
		debug!(matches = ids.len(), "opened credential search");

		let cursor = IdCursor::new(ids, limit, move |record_id| {
			let records = self.read()?;
			let record = records.get(record_id).map(|stored| stored.record.clone());
			Ok(record)
		});
		Ok(Box::new(cursor))
	}
}
