use itertools::Itertools;
use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::tags::{Tag, TagMap};

const AND_OPERATOR: &str = "$and";
const OR_OPERATOR: &str = "$or";

/// Boolean expression over tag equality predicates.
///
/// `And(vec![])` matches every record and `Or(vec![])` matches none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagQuery {
	Eq(String, String),
	And(Vec<TagQuery>),
	Or(Vec<TagQuery>),
}

impl TagQuery {
	/// The identity query.
	pub fn all() -> Self {
		Self::And(Vec::new())
	}

	pub fn is_all(&self) -> bool {
		matches!(self, Self::And(clauses) if clauses.is_empty())
	}

	pub fn equals(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self::Eq(name.into(), value.into())
	}

	pub fn tag(tag: Tag) -> Self {
		let (name, value) = tag.into_pair();
		Self::Eq(name, value)
	}

	/// Conjunction with nested conjunctions inlined.
	pub fn and(clauses: impl IntoIterator<Item = TagQuery>) -> Self {
		let mut flat = Vec::new();
		for clause in clauses {
			match clause {
				Self::And(inner) => flat.extend(inner),
				other => flat.push(other),
			}
		}
		Self::And(flat)
	}

	/// Disjunction with nested disjunctions inlined; a single alternative stands alone.
	pub fn or(clauses: impl IntoIterator<Item = TagQuery>) -> Self {
		let mut flat = Vec::new();
		for clause in clauses {
			match clause {
				Self::Or(inner) => flat.extend(inner),
				other => flat.push(other),
			}
		}
		if flat.len() == 1 {
			return flat.remove(0);
		}
		Self::Or(flat)
	}

	pub fn matches(&self, tags: &TagMap) -> bool {
		match self {
			Self::Eq(name, value) => tags.get(name) == Some(value),
			Self::And(clauses) => clauses.iter().all(|clause| clause.matches(tags)),
			Self::Or(clauses) => clauses.iter().any(|clause| clause.matches(tags)),
		}
	}

	/// Renders the tree in the wallet's JSON tag-query dialect.
	pub fn to_wql(&self) -> Value {
		let mut object = Map::new();
		match self {
			Self::Eq(name, value) => {
				object.insert(name.clone(), Value::String(value.clone()));
			},
			Self::And(clauses) => {
				object.insert(
					AND_OPERATOR.to_string(),
					Value::Array(clauses.iter().map(TagQuery::to_wql).collect()),
				);
			},
			Self::Or(clauses) => {
				object.insert(
					OR_OPERATOR.to_string(),
					Value::Array(clauses.iter().map(TagQuery::to_wql).collect()),
				);
			},
		}
		Value::Object(object)
	}

	/// Parses a caller-supplied query fragment.
	///
	/// A map with several keys is read as their conjunction. Operators with no
	/// counterpart in the tree, such as `$not` or `$in`, are rejected.
	pub fn from_wql(value: &Value) -> Result<Self, ValidationError> {
		let object = value.as_object().ok_or_else(|| {
			ValidationError::UnsupportedQuery(format!("expected an object, got {}", value))
		})?;

		let mut clauses = Vec::with_capacity(object.len());
		for (key, inner) in object {
			let clause = match key.as_str() {
				AND_OPERATOR => Self::And(Self::parse_clauses(key, inner)?),
				OR_OPERATOR => Self::Or(Self::parse_clauses(key, inner)?),
				op if op.starts_with('$') => {
					return Err(ValidationError::UnsupportedQuery(format!(
						"operator {} is not supported",
						op
					)));
				},
				name => match inner {
					Value::String(tag_value) => Self::Eq(name.to_string(), tag_value.clone()),
					other => {
						return Err(ValidationError::UnsupportedQuery(format!(
							"tag {} must be compared to a string, got {}",
							name, other
						)));
					},
				},
			};
			clauses.push(clause);
		}

		if clauses.len() == 1 {
			return Ok(clauses.remove(0));
		}
		Ok(Self::And(clauses))
	}

	fn parse_clauses(operator: &str, value: &Value) -> Result<Vec<Self>, ValidationError> {
		let items = value.as_array().ok_or_else(|| {
			ValidationError::UnsupportedQuery(format!("{} expects an array", operator))
		})?;
		items.iter().map(Self::from_wql).collect()
	}
}

/// Compiles presentation-definition identifiers into a query.
///
/// Every URI must be satisfied, either as an expanded type or as a schema id.
/// Repeated URIs are compiled once. An empty list yields the identity query.
pub fn build_type_or_schema_query<I, S>(uris: I) -> TagQuery
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let clauses = uris
		.into_iter()
		.map(|uri| uri.as_ref().to_string())
		.unique()
		.map(|uri| {
			TagQuery::Or(vec![TagQuery::tag(Tag::Type(uri.clone())), TagQuery::tag(Tag::Schema(uri))])
		})
		.collect();
	TagQuery::And(clauses)
}
