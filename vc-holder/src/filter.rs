use itertools::Itertools;

use crate::query::{build_type_or_schema_query, TagQuery};
use crate::tags::Tag;

/// Search criteria accepted by `HolderStore::search_credentials`.
///
/// Within a set-valued field any listed value satisfies the field; all
/// populated fields must hold together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialFilter {
	/// Accepted for symmetry with the record shape; contexts are not indexed.
	pub contexts: Vec<String>,
	pub types: Vec<String>,
	pub schema_ids: Vec<String>,
	pub issuer_id: Option<String>,
	pub subject_id: Option<String>,
	pub proof_types: Vec<String>,
	pub given_id: Option<String>,
	pub tag_query: Option<TagQuery>,
	/// Presentation-definition identifiers, each matched as a type or a schema.
	pub pd_uri_list: Vec<String>,
}

impl CredentialFilter {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_contexts<I: IntoIterator<Item = S>, S: Into<String>>(mut self, contexts: I) -> Self {
		self.contexts.extend(contexts.into_iter().map(Into::into));
		self
	}

	pub fn with_types<I: IntoIterator<Item = S>, S: Into<String>>(mut self, types: I) -> Self {
		self.types.extend(types.into_iter().map(Into::into));
		self
	}

	pub fn with_schema_ids<I: IntoIterator<Item = S>, S: Into<String>>(mut self, ids: I) -> Self {
		self.schema_ids.extend(ids.into_iter().map(Into::into));
		self
	}

	pub fn with_issuer_id(mut self, issuer_id: impl Into<String>) -> Self {
		self.issuer_id = Some(issuer_id.into());
		self
	}

	pub fn with_subject_id(mut self, subject_id: impl Into<String>) -> Self {
		self.subject_id = Some(subject_id.into());
		self
	}

	pub fn with_proof_types<I: IntoIterator<Item = S>, S: Into<String>>(mut self, types: I) -> Self {
		self.proof_types.extend(types.into_iter().map(Into::into));
		self
	}

	pub fn with_given_id(mut self, given_id: impl Into<String>) -> Self {
		self.given_id = Some(given_id.into());
		self
	}

	pub fn with_tag_query(mut self, tag_query: TagQuery) -> Self {
		self.tag_query = Some(tag_query);
		self
	}

	pub fn with_pd_uris<I: IntoIterator<Item = S>, S: Into<String>>(mut self, uris: I) -> Self {
		self.pd_uri_list.extend(uris.into_iter().map(Into::into));
		self
	}

	/// Compiles the criteria into a single conjunction. No criteria means every record.
	pub fn compile(&self) -> TagQuery {
		let mut clauses = Vec::new();

		clauses.extend(any_of(&self.types, Tag::Type));
		clauses.extend(any_of(&self.schema_ids, Tag::Schema));
		clauses.extend(any_of(&self.proof_types, Tag::Proof));
		if let Some(issuer_id) = &self.issuer_id {
			clauses.push(TagQuery::tag(Tag::Issuer(issuer_id.clone())));
		}
		if let Some(subject_id) = &self.subject_id {
			clauses.push(TagQuery::tag(Tag::Subject(subject_id.clone())));
		}
		if let Some(given_id) = &self.given_id {
			clauses.push(TagQuery::tag(Tag::GivenId(given_id.clone())));
		}
		if let Some(tag_query) = &self.tag_query {
			clauses.push(tag_query.clone());
		}
		if !self.pd_uri_list.is_empty() {
			clauses.push(build_type_or_schema_query(&self.pd_uri_list));
		}

		TagQuery::and(clauses)
	}
}

fn any_of(values: &[String], tag: fn(String) -> Tag) -> Option<TagQuery> {
	if values.is_empty() {
		return None;
	}
	Some(TagQuery::or(values.iter().unique().cloned().map(tag).map(TagQuery::tag)))
}
