use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};

use rocksdb::{Options, WriteBatch, DB};
use tracing::{debug, info};

use crate::error::HolderError;
use crate::query::TagQuery;
use crate::record::{RecordId, VcRecord};
use crate::storage::{HolderStore, IdCursor, RecordCursor};
use crate::tags::TagProjector;

use managers::{
	given_id::GivenIdManager, record::RecordManager, tag::TagManager, COLUMN_FAMILIES,
};
pub use types::RocksDbHolderConfig;

pub mod managers;
pub mod types;

/// Holder store persisted in a RocksDB database.
///
/// Records, the tag index and the given-id index live in separate column
/// families and change together through one `WriteBatch` per operation.
pub struct RocksDbHolder {
	db: DB,
	// serialises the given-id check with the write that depends on it
	write_lock: Mutex<()>,
}

impl RocksDbHolder {
	pub fn open(config: &RocksDbHolderConfig) -> Result<Self, HolderError> {
		let mut opts = Options::default();
		opts.create_missing_column_families(true);
		opts.create_if_missing(config.create_if_missing);
		let db = DB::open_cf(&opts, &config.path, COLUMN_FAMILIES).map_err(HolderError::DbError)?;
		info!(path = %config.path, "opened holder store");

		Ok(Self { db, write_lock: Mutex::new(()) })
	}

	fn lock_writes(&self) -> Result<MutexGuard<'_, ()>, HolderError> {
		self.write_lock
			.lock()
			.map_err(|e| HolderError::BackendError(format!("lock poisoned: {}", e)))
	}

	/// Translates the query tree into set algebra over tag index scans.
	fn evaluate(&self, query: &TagQuery) -> Result<BTreeSet<RecordId>, HolderError> {
		match query {
			TagQuery::Eq(name, value) => TagManager::lookup(&self.db, name, value),
			TagQuery::And(clauses) => {
				let mut clauses = clauses.iter();
				let Some(first) = clauses.next() else {
					return RecordManager::read_ids(&self.db);
				};
				let mut ids = self.evaluate(first)?;
				for clause in clauses {
					if ids.is_empty() {
						break;
					}
					let other = self.evaluate(clause)?;
					ids.retain(|record_id| other.contains(record_id));
				}
				Ok(ids)
			},
			TagQuery::Or(clauses) => clauses.iter().try_fold(BTreeSet::new(), |mut acc, clause| {
				acc.extend(self.evaluate(clause)?);
				Ok::<_, HolderError>(acc)
			}),
		}
	}
}

impl HolderStore for RocksDbHolder {
	fn store(&self, record: &VcRecord) -> Result<RecordId, HolderError> {
		let tags = TagProjector::tag_map(record)?;
		let record_id = record.record_id.clone().unwrap_or_else(RecordId::generate);
		let mut record = record.clone();
		record.record_id = Some(record_id.clone());

		let _guard = self.lock_writes()?;
		if let Some(given_id) = &record.given_id {
			if GivenIdManager::read(&self.db, given_id)?.is_some() {
				return Err(HolderError::DuplicateGivenIdError(given_id.clone()));
			}
		}
		if RecordManager::exists(&self.db, &record_id)? {
			return Err(HolderError::BackendError(format!("record {} already exists", record_id)));
		}

		let mut batch = WriteBatch::default();
		RecordManager::write(&self.db, &mut batch, &record)?;
		TagManager::write_tags(&self.db, &mut batch, &tags, &record_id)?;
		if let Some(given_id) = &record.given_id {
			GivenIdManager::write(&self.db, &mut batch, given_id, &record_id)?;
		}
		self.db.write(batch).map_err(HolderError::DbError)?;

		debug!(
			%record_id,
			given_id = ?record.given_id,
			tag_count = tags.len(),
			"stored credential record"
		);
		Ok(record_id)
	}

	fn retrieve_by_id(&self, record_id: &RecordId) -> Result<VcRecord, HolderError> {
		RecordManager::read(&self.db, record_id)?
			.ok_or_else(|| HolderError::NotFoundError(record_id.to_string()))
	}

	fn delete(&self, record_id: &RecordId) -> Result<(), HolderError> {
		let _guard = self.lock_writes()?;
		let record = RecordManager::read(&self.db, record_id)?
			.ok_or_else(|| HolderError::NotFoundError(record_id.to_string()))?;
		let tags = TagProjector::tag_map(&record)?;

		let mut batch = WriteBatch::default();
		RecordManager::remove(&self.db, &mut batch, record_id)?;
		TagManager::remove_tags(&self.db, &mut batch, &tags, record_id)?;
		if let Some(given_id) = &record.given_id {
			GivenIdManager::remove(&self.db, &mut batch, given_id)?;
		}
		self.db.write(batch).map_err(HolderError::DbError)?;

		debug!(%record_id, "deleted credential record");
		Ok(())
	}

	fn search(
		&self, query: &TagQuery, limit: Option<usize>,
	) -> Result<Box<dyn RecordCursor + '_>, HolderError> {
		let ids = self.evaluate(query)?;
		debug!(matches = ids.len(), "opened credential search");

		let cursor =
			IdCursor::new(ids, limit, move |record_id| RecordManager::read(&self.db, record_id));
		Ok(Box::new(cursor))
	}
}
