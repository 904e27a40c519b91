use std::fs;
use std::path::Path;

use ld_proof_vc::{LdProofVcDetail, VerifiableCredential};
use serde_json::Value;
use tracing::debug;
use vc_holder::VcRecord;

use crate::error::CliError;

/// Copies the indexable fields of a credential into a record carrying `cred_value` verbatim.
pub fn record_from_credential(vc: &VerifiableCredential, cred_value: Value) -> VcRecord {
	let record = VcRecord::new(cred_value)
		.with_contexts(vc.context_uris())
		.with_types(vc.types())
		.with_schema_ids(vc.schema_ids())
		.with_issuer_id(vc.issuer_id())
		.with_subject_ids(vc.subject_ids())
		.with_proof_types(vc.proof_types());
	match &vc.id {
		Some(id) => record.with_given_id(id),
		None => record,
	}
}

/// A detail document is stored whole; its proof type comes from the options.
pub fn record_from_detail(detail: &LdProofVcDetail, cred_value: Value) -> VcRecord {
	record_from_credential(&detail.credential, cred_value)
		.with_proof_types([detail.options.proof_type.as_str()])
}

pub fn parse_record(document: Value, detail: bool) -> Result<VcRecord, CliError> {
	let record = if detail {
		let detail: LdProofVcDetail = serde_json::from_value(document.clone())?;
		record_from_detail(&detail, document)
	} else {
		let vc: VerifiableCredential = serde_json::from_value(document.clone())?;
		record_from_credential(&vc, document)
	};
	Ok(record)
}

pub fn read_record(path: &Path, detail: bool) -> Result<VcRecord, CliError> {
	let raw = fs::read_to_string(path)
		.map_err(|source| CliError::ReadError { path: path.to_path_buf(), source })?;
	let document: Value = serde_json::from_str(&raw)?;
	debug!(path = %path.display(), detail, "read credential document");
	parse_record(document, detail)
}
