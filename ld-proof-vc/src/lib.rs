use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_PROOF_PURPOSE: &str = "assertionMethod";

/// JSON-LD credential as the issuer sent it. Type IRIs are kept as written.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VerifiableCredential {
	#[serde(rename = "@context")]
	pub context: OneOrMore<Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	#[serde(rename = "type")]
	pub type_: OneOrMore<String>,
	pub issuer: Issuer,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub issuance_date: Option<String>,
	pub credential_subject: OneOrMore<Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub credential_schema: Option<OneOrMore<CredentialSchema>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub proof: Option<OneOrMore<Proof>>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl VerifiableCredential {
	/// Context entries given as URIs; embedded context objects are skipped.
	pub fn context_uris(&self) -> Vec<String> {
		self.context.iter().filter_map(|c| c.as_str().map(str::to_string)).collect()
	}

	pub fn types(&self) -> Vec<String> {
		self.type_.iter().cloned().collect()
	}

	pub fn issuer_id(&self) -> &str {
		self.issuer.id()
	}

	pub fn subject_ids(&self) -> Vec<String> {
		self.credential_subject
			.iter()
			.filter_map(|subject| subject.get("id").and_then(Value::as_str).map(str::to_string))
			.collect()
	}

	pub fn schema_ids(&self) -> Vec<String> {
		self.credential_schema
			.as_ref()
			.map(|schemas| schemas.iter().map(|schema| schema.id.clone()).collect())
			.unwrap_or_default()
	}

	pub fn proof_types(&self) -> Vec<String> {
		self.proof
			.as_ref()
			.map(|proofs| proofs.iter().map(|proof| proof.type_.clone()).collect())
			.unwrap_or_default()
	}
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum Issuer {
	Id(String),
	Object {
		id: String,
		#[serde(flatten)]
		extra: Map<String, Value>,
	},
}

impl Issuer {
	pub fn id(&self) -> &str {
		match self {
			Self::Id(id) => id,
			Self::Object { id, .. } => id,
		}
	}
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CredentialSchema {
	pub id: String,
	#[serde(rename = "type")]
	pub type_: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Proof {
	#[serde(rename = "type")]
	pub type_: String,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

/// Credential detail attached to a linked-data-proof issuance message.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LdProofVcDetail {
	pub credential: VerifiableCredential,
	pub options: LdProofVcDetailOptions,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LdProofVcDetailOptions {
	/// Suite from the Linked Data Cryptographic Suite Registry, e.g. `Ed25519Signature2018`.
	pub proof_type: String,
	#[serde(default = "default_proof_purpose")]
	pub proof_purpose: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub created: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub domain: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub challenge: Option<String>,
	/// Omitted when the issued credential carries no status entry.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub credential_status: Option<CredentialStatusOptions>,
}

fn default_proof_purpose() -> String {
	DEFAULT_PROOF_PURPOSE.to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CredentialStatusOptions {
	#[serde(rename = "type")]
	pub type_: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum OneOrMore<T> {
	// tried first, otherwise `OneOrMore<Value>` reads an array as a single value
	More(Vec<T>),
	One(T),
}

impl<T> OneOrMore<T> {
	pub fn iter(&self) -> std::slice::Iter<'_, T> {
		match self {
			Self::One(v) => std::slice::from_ref(v).iter(),
			Self::More(v) => v.iter(),
		}
	}

	pub fn len(&self) -> usize {
		self.iter().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
