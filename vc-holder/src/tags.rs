use std::collections::BTreeMap;

use crate::error::ValidationError;
use crate::record::VcRecord;

pub const TYPE_PREFIX: &str = "type:";
pub const SCHEMA_PREFIX: &str = "schm:";
pub const SUBJECT_PREFIX: &str = "subj:";
pub const PROOF_PREFIX: &str = "proof:";
pub const ISSUER_TAG: &str = "issuer";
pub const GIVEN_ID_TAG: &str = "given_id";
/// Value of every set-membership flag tag.
pub const FLAG_VALUE: &str = "1";

/// Flat tag name -> value pairs, the only shape the storage backends index.
pub type TagMap = BTreeMap<String, String>;

/// A single searchable tag.
///
/// Set-valued record fields become one flag tag per element, named by prefix.
/// Prefixed names are built by plain concatenation; a URI is never escaped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tag {
	Type(String),
	Schema(String),
	Subject(String),
	Proof(String),
	Issuer(String),
	GivenId(String),
	Custom { name: String, value: String },
}

impl Tag {
	pub fn name(&self) -> String {
		match self {
			Self::Type(uri) => format!("{}{}", TYPE_PREFIX, uri),
			Self::Schema(uri) => format!("{}{}", SCHEMA_PREFIX, uri),
			Self::Subject(id) => format!("{}{}", SUBJECT_PREFIX, id),
			Self::Proof(proof_type) => format!("{}{}", PROOF_PREFIX, proof_type),
			Self::Issuer(_) => ISSUER_TAG.to_string(),
			Self::GivenId(_) => GIVEN_ID_TAG.to_string(),
			Self::Custom { name, .. } => name.clone(),
		}
	}

	pub fn value(&self) -> &str {
		match self {
			Self::Type(_) | Self::Schema(_) | Self::Subject(_) | Self::Proof(_) => FLAG_VALUE,
			Self::Issuer(issuer_id) => issuer_id,
			Self::GivenId(given_id) => given_id,
			Self::Custom { value, .. } => value,
		}
	}

	pub fn into_pair(self) -> (String, String) {
		(self.name(), self.value().to_string())
	}
}

/// Whether `name` belongs to the derived tag namespace, whatever fields a record sets.
pub fn is_reserved_name(name: &str) -> bool {
	name == ISSUER_TAG
		|| name == GIVEN_ID_TAG
		|| [TYPE_PREFIX, SCHEMA_PREFIX, SUBJECT_PREFIX, PROOF_PREFIX]
			.iter()
			.any(|prefix| name.starts_with(prefix))
}

#[derive(Debug)]
pub struct TagProjector;

impl TagProjector {
	/// Derives every tag of a record, derived tags first, then `cred_tags`.
	pub fn project(record: &VcRecord) -> Result<Vec<Tag>, ValidationError> {
		record.validate()?;

		let mut tags = Vec::new();
		tags.extend(record.expanded_types.iter().cloned().map(Tag::Type));
		tags.extend(record.schema_ids.iter().cloned().map(Tag::Schema));
		tags.extend(record.subject_ids.iter().cloned().map(Tag::Subject));
		tags.extend(record.proof_types.iter().cloned().map(Tag::Proof));
		if let Some(issuer_id) = &record.issuer_id {
			tags.push(Tag::Issuer(issuer_id.clone()));
		}
		if let Some(given_id) = &record.given_id {
			tags.push(Tag::GivenId(given_id.clone()));
		}

		for (name, value) in &record.cred_tags {
			if is_reserved_name(name) {
				return Err(ValidationError::KeyCollision(name.clone()));
			}
			tags.push(Tag::Custom { name: name.clone(), value: value.clone() });
		}

		Ok(tags)
	}

	/// Flattens the projected tags into storage-boundary string pairs.
	pub fn tag_map(record: &VcRecord) -> Result<TagMap, ValidationError> {
		let tags = Self::project(record)?;
		Ok(tags.into_iter().map(Tag::into_pair).collect())
	}
}
