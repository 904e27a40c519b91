use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Storage-assigned handle of a credential record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn generate() -> Self {
		Self(Uuid::new_v4().to_string())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for RecordId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Flattened, storable form of a verifiable credential.
///
/// The set-valued fields compare by membership, so two records built from the
/// same credential with differently ordered `@type` arrays are equal. `contexts`
/// keeps document order and is never indexed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VcRecord {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub record_id: Option<RecordId>,
	#[serde(default)]
	pub contexts: Vec<String>,
	pub expanded_types: BTreeSet<String>,
	#[serde(default)]
	pub schema_ids: BTreeSet<String>,
	#[serde(default)]
	pub issuer_id: Option<String>,
	#[serde(default)]
	pub subject_ids: BTreeSet<String>,
	#[serde(default)]
	pub proof_types: BTreeSet<String>,
	#[serde(default)]
	pub given_id: Option<String>,
	#[serde(default)]
	pub cred_tags: BTreeMap<String, String>,
	/// The credential document as received, returned untouched on match.
	pub cred_value: serde_json::Value,
}

impl VcRecord {
	pub fn new(cred_value: serde_json::Value) -> Self {
		VcRecord {
			record_id: None,
			contexts: Vec::new(),
			expanded_types: BTreeSet::new(),
			schema_ids: BTreeSet::new(),
			issuer_id: None,
			subject_ids: BTreeSet::new(),
			proof_types: BTreeSet::new(),
			given_id: None,
			cred_tags: BTreeMap::new(),
			cred_value,
		}
	}

	pub fn with_contexts<I, S>(mut self, contexts: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.contexts.extend(contexts.into_iter().map(Into::into));
		self
	}

	pub fn with_types<I, S>(mut self, types: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.expanded_types.extend(types.into_iter().map(Into::into));
		self
	}

	pub fn with_schema_ids<I, S>(mut self, schema_ids: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.schema_ids.extend(schema_ids.into_iter().map(Into::into));
		self
	}

	pub fn with_issuer_id(mut self, issuer_id: impl Into<String>) -> Self {
		self.issuer_id = Some(issuer_id.into());
		self
	}

	pub fn with_subject_ids<I, S>(mut self, subject_ids: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.subject_ids.extend(subject_ids.into_iter().map(Into::into));
		self
	}

	pub fn with_proof_types<I, S>(mut self, proof_types: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.proof_types.extend(proof_types.into_iter().map(Into::into));
		self
	}

	pub fn with_given_id(mut self, given_id: impl Into<String>) -> Self {
		self.given_id = Some(given_id.into());
		self
	}

	pub fn with_tag(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.cred_tags.insert(name.into(), value.into());
		self
	}

	/// Structural check run before a record reaches any store.
	pub fn validate(&self) -> Result<(), ValidationError> {
		if self.expanded_types.is_empty() {
			return Err(ValidationError::EmptyTypes);
		}
		Ok(())
	}
}

#[cfg(test)]
mod test {
	use serde_json::json;

	use super::{RecordId, VcRecord};
	use crate::error::ValidationError;

	#[test]
	fn should_reject_record_without_types() {
		let record = VcRecord::new(json!({})).with_schema_ids(["https://example.org/schema.json"]);
		assert_eq!(record.validate(), Err(ValidationError::EmptyTypes));
	}

	#[test]
	fn should_compare_sets_by_membership() {
		let a = VcRecord::new(json!({"id": 1})).with_types(["A", "B"]).with_contexts(["c1", "c2"]);
		let b = VcRecord::new(json!({"id": 1})).with_types(["B", "A", "A"]).with_contexts(["c1", "c2"]);
		assert_eq!(a, b);
		assert!(a.validate().is_ok());

		let c = VcRecord::new(json!({"id": 1})).with_types(["A", "B"]).with_contexts(["c2", "c1"]);
		assert_ne!(a, c);
	}

	#[test]
	fn should_generate_distinct_record_ids() {
		let a = RecordId::generate();
		let b = RecordId::generate();
		assert_ne!(a, b);
		assert_eq!(a.as_str().len(), 36);
	}

	#[test]
	fn should_default_missing_fields_on_deserialize() {
		let record: VcRecord = serde_json::from_value(json!({
			"expanded_types": ["https://www.w3.org/2018/credentials#VerifiableCredential"],
			"cred_value": {"...": "..."},
		}))
		.unwrap();
		assert!(record.record_id.is_none());
		assert!(record.schema_ids.is_empty());
		assert!(record.cred_tags.is_empty());
	}
}
