use std::collections::BTreeSet;

use rocksdb::{Direction, IteratorMode, WriteBatch, DB};

use crate::error::HolderError;
use crate::record::RecordId;
use crate::storage::rocks_db::managers::{column_family, decode_record_id, TAG_CF};
use crate::tags::TagMap;

/// Equality index over tags.
///
/// Keys are `len(name) | name | len(value) | value | record_id` with big-endian
/// u32 lengths and empty values, so a prefix scan over the first four parts
/// lists every record holding that exact tag.
#[derive(Debug)]
pub struct TagManager;

impl TagManager {
	pub fn tag_prefix(name: &str, value: &str) -> Result<Vec<u8>, HolderError> {
		let mut prefix = Vec::with_capacity(name.len() + value.len() + 8);
		for part in [name, value] {
			let len = u32::try_from(part.len())
				.map_err(|_| HolderError::BackendError("tag too long".to_string()))?;
			prefix.extend_from_slice(&len.to_be_bytes());
			prefix.extend_from_slice(part.as_bytes());
		}
		Ok(prefix)
	}

	pub fn tag_key(name: &str, value: &str, record_id: &RecordId) -> Result<Vec<u8>, HolderError> {
		let mut key = Self::tag_prefix(name, value)?;
		key.extend_from_slice(record_id.as_str().as_bytes());
		Ok(key)
	}

	pub fn write_tags(
		db: &DB, batch: &mut WriteBatch, tags: &TagMap, record_id: &RecordId,
	) -> Result<(), HolderError> {
		let cf = column_family(db, TAG_CF)?;
		for (name, value) in tags {
			batch.put_cf(&cf, Self::tag_key(name, value, record_id)?, b"");
		}
		Ok(())
	}

	pub fn remove_tags(
		db: &DB, batch: &mut WriteBatch, tags: &TagMap, record_id: &RecordId,
	) -> Result<(), HolderError> {
		let cf = column_family(db, TAG_CF)?;
		for (name, value) in tags {
			batch.delete_cf(&cf, Self::tag_key(name, value, record_id)?);
		}
		Ok(())
	}

	/// Ids of every record tagged `name = value`.
	pub fn lookup(db: &DB, name: &str, value: &str) -> Result<BTreeSet<RecordId>, HolderError> {
		let cf = column_family(db, TAG_CF)?;
		let prefix = Self::tag_prefix(name, value)?;

		let mut ids = BTreeSet::new();
		for item in db.iterator_cf(&cf, IteratorMode::From(prefix.as_slice(), Direction::Forward)) {
			let (key, _) = item.map_err(HolderError::DbError)?;
			if !key.starts_with(&prefix) {
				break;
			}
			ids.insert(decode_record_id(&key[prefix.len()..])?);
		}
		Ok(ids)
	}
}
