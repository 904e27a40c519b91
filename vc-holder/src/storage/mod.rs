use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::error::HolderError;
use crate::filter::CredentialFilter;
use crate::query::TagQuery;
use crate::record::{RecordId, VcRecord};
use crate::tags::Tag;

pub mod memory;
pub mod rocks_db;

#[cfg(test)]
pub(crate) mod test_suite;

/// Batch size used by `RecordCursor::fetch_all`.
pub const DEFAULT_FETCH_SIZE: usize = 10;

/// Single-owner handle over the results of a search.
pub trait RecordCursor: Send {
	/// Returns up to `max_count` further records. An exhausted cursor yields an empty batch.
	fn fetch(&mut self, max_count: usize) -> Result<Vec<VcRecord>, HolderError>;

	/// Releases the cursor. Closing twice is a no-op.
	fn close(&mut self);

	fn is_closed(&self) -> bool;

	fn fetch_all(&mut self) -> Result<Vec<VcRecord>, HolderError> {
		let mut rows = Vec::new();
		loop {
			let batch = self.fetch(DEFAULT_FETCH_SIZE)?;
			if batch.is_empty() {
				return Ok(rows);
			}
			rows.extend(batch);
		}
	}
}

/// Credential persistence over a tag-indexed backend.
///
/// One implementation exists per backend. Implementations are shared between
/// holder sessions, so they must tolerate concurrent calls.
pub trait HolderStore: Send + Sync {
	/// Persists a record together with its projected tags, atomically.
	fn store(&self, record: &VcRecord) -> Result<RecordId, HolderError>;

	fn retrieve_by_id(&self, record_id: &RecordId) -> Result<VcRecord, HolderError>;

	fn delete(&self, record_id: &RecordId) -> Result<(), HolderError>;

	fn search(
		&self, query: &TagQuery, limit: Option<usize>,
	) -> Result<Box<dyn RecordCursor + '_>, HolderError>;

	fn retrieve_by_given_id(&self, given_id: &str) -> Result<VcRecord, HolderError> {
		let query = TagQuery::tag(Tag::GivenId(given_id.to_string()));
		let mut cursor = self.search(&query, Some(2))?;
		let mut rows = cursor.fetch(2)?;
		cursor.close();

		match rows.len() {
			0 => Err(HolderError::NotFoundError(given_id.to_string())),
			1 => Ok(rows.remove(0)),
			_ => {
				warn!(given_id, "more than one record holds the same given id");
				Err(HolderError::MultipleResultsError(given_id.to_string()))
			},
		}
	}

	fn delete_by_given_id(&self, given_id: &str) -> Result<(), HolderError> {
		let record = self.retrieve_by_given_id(given_id)?;
		let record_id =
			record.record_id.ok_or_else(|| HolderError::NotFoundError(given_id.to_string()))?;
		self.delete(&record_id)
	}

	fn search_credentials(
		&self, filter: &CredentialFilter, limit: Option<usize>,
	) -> Result<Box<dyn RecordCursor + '_>, HolderError> {
		let query = filter.compile();
		debug!(?query, "compiled credential filter");
		self.search(&query, limit)
	}
}

type RecordLoader<'a> =
	Box<dyn FnMut(&RecordId) -> Result<Option<VcRecord>, HolderError> + Send + 'a>;

/// Cursor over a snapshot of matching record ids.
///
/// Records are loaded only when fetched; ids deleted in the meantime are skipped.
pub struct IdCursor<'a> {
	pending: VecDeque<RecordId>,
	load: RecordLoader<'a>,
	closed: bool,
}

impl<'a> IdCursor<'a> {
	pub fn new<F>(ids: impl IntoIterator<Item = RecordId>, limit: Option<usize>, load: F) -> Self
	where
		F: FnMut(&RecordId) -> Result<Option<VcRecord>, HolderError> + Send + 'a,
	{
		let pending = ids.into_iter().take(limit.unwrap_or(usize::MAX)).collect();
		IdCursor { pending, load: Box::new(load), closed: false }
	}

	pub fn remaining(&self) -> usize {
		self.pending.len()
	}
}

impl<'a> RecordCursor for IdCursor<'a> {
	fn fetch(&mut self, max_count: usize) -> Result<Vec<VcRecord>, HolderError> {
		if self.closed {
			return Err(HolderError::ClosedCursorError);
		}

		let mut rows = Vec::new();
		while rows.len() < max_count {
			let Some(record_id) = self.pending.pop_front() else {
				break;
			};
			if let Some(record) = (self.load)(&record_id)? {
				rows.push(record);
			}
		}
		Ok(rows)
	}

	fn close(&mut self) {
		self.closed = true;
		self.pending.clear();
	}

	fn is_closed(&self) -> bool {
		self.closed
	}
}
