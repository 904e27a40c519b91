//! Behaviour every `HolderStore` backend has to share.

use assert_matches::assert_matches;
use serde_json::json;

use crate::error::{HolderError, ValidationError};
use crate::filter::CredentialFilter;
use crate::query::{build_type_or_schema_query, TagQuery};
use crate::record::{RecordId, VcRecord};
use crate::storage::HolderStore;

pub const VC_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";
pub const VC_TYPE: &str = "https://www.w3.org/2018/credentials#VerifiableCredential";
pub const DEGREE_TYPE: &str = "https://example.org/examples#UniversityDegreeCredential";
pub const VC_SUBJECT_ID: &str = "did:example:ebfeb1f712ebc6f1c276e12ec21";
pub const VC_PROOF_TYPE: &str = "Ed25519Signature2018";
pub const VC_ISSUER_ID: &str = "https://example.edu/issuers/14";
pub const VC_SCHEMA_ID: &str = "https://example.org/examples/degree.json";
pub const VC_GIVEN_ID: &str = "http://example.edu/credentials/3732";

pub fn sample_record() -> VcRecord {
	VcRecord::new(json!({"...": "..."}))
		.with_contexts([VC_CONTEXT, "https://www.w3.org/2018/credentials/examples/v1"])
		.with_types([VC_TYPE, DEGREE_TYPE])
		.with_schema_ids([VC_SCHEMA_ID])
		.with_issuer_id(VC_ISSUER_ID)
		.with_subject_ids([VC_SUBJECT_ID])
		.with_proof_types([VC_PROOF_TYPE])
		.with_given_id(VC_GIVEN_ID)
		.with_tag("tag", "value")
}

fn search_all(store: &dyn HolderStore, filter: &CredentialFilter) -> Vec<VcRecord> {
	let mut cursor = store.search_credentials(filter, None).unwrap();
	let rows = cursor.fetch_all().unwrap();
	cursor.close();
	rows
}

fn stored(mut record: VcRecord, record_id: RecordId) -> VcRecord {
	record.record_id = Some(record_id);
	record
}

pub fn round_trip(store: &dyn HolderStore) {
	let record = sample_record();
	let record_id = store.store(&record).unwrap();

	let loaded = store.retrieve_by_id(&record_id).unwrap();
	assert_eq!(loaded, stored(record.clone(), record_id.clone()));

	let preset = VcRecord::new(json!({"id": 2}))
		.with_types([VC_TYPE])
		.with_contexts([VC_CONTEXT, VC_CONTEXT]);
	let preset = stored(preset, RecordId::new("preset-id"));
	assert_eq!(store.store(&preset).unwrap(), RecordId::new("preset-id"));
	assert_eq!(store.retrieve_by_id(&RecordId::new("preset-id")).unwrap(), preset);
	assert_matches!(store.store(&preset), Err(e) if e.is_backend_error());
}

pub fn missing_records(store: &dyn HolderStore) {
	assert_matches!(
		store.retrieve_by_id(&RecordId::new("missing")),
		Err(HolderError::NotFoundError(id)) if id == "missing"
	);
	assert_matches!(
		store.retrieve_by_given_id("missing"),
		Err(HolderError::NotFoundError(id)) if id == "missing"
	);
	assert_matches!(store.delete(&RecordId::new("missing")), Err(HolderError::NotFoundError(_)));
}

pub fn unique_given_id(store: &dyn HolderStore) {
	let record = sample_record();
	let record_id = store.store(&record).unwrap();

	let found = store.retrieve_by_given_id(VC_GIVEN_ID).unwrap();
	assert_eq!(found, stored(record.clone(), record_id));

	let rows = search_all(store, &CredentialFilter::new().with_given_id(VC_GIVEN_ID));
	assert_eq!(rows.len(), 1);

	let twin = VcRecord::new(json!({"twin": true})).with_types([VC_TYPE]).with_given_id(VC_GIVEN_ID);
	assert_matches!(
		store.store(&twin),
		Err(HolderError::DuplicateGivenIdError(id)) if id == VC_GIVEN_ID
	);
	assert_eq!(search_all(store, &CredentialFilter::new()).len(), 1);
}

pub fn search_by_type(store: &dyn HolderStore) {
	let record = sample_record();
	let record_id = store.store(&record).unwrap();

	let rows = search_all(store, &CredentialFilter::new().with_types([VC_TYPE]));
	assert_eq!(rows, vec![stored(record, record_id)]);

	let rows = search_all(store, &CredentialFilter::new().with_types(["Unrelated"]));
	assert!(rows.is_empty());
}

pub fn search_by_type_or_schema(store: &dyn HolderStore) {
	let record = sample_record();
	let record_id = store.store(&record).unwrap();

	let query = build_type_or_schema_query([VC_TYPE, DEGREE_TYPE]);
	let mut cursor = store.search(&query, None).unwrap();
	assert_eq!(cursor.fetch(10).unwrap(), vec![stored(record.clone(), record_id.clone())]);

	// type for the first identifier, schema for the second
	let mixed = VcRecord::new(json!({"mixed": true})).with_types(["U1"]).with_schema_ids(["U2"]);
	let mixed_id = store.store(&mixed).unwrap();
	let rows = search_all(store, &CredentialFilter::new().with_pd_uris(["U1", "U2"]));
	assert_eq!(rows, vec![stored(mixed, mixed_id)]);

	let rows = search_all(store, &CredentialFilter::new().with_pd_uris([VC_SCHEMA_ID]));
	assert_eq!(rows, vec![stored(record, record_id)]);

	let rows = search_all(store, &CredentialFilter::new().with_pd_uris(["U2", "Unrelated"]));
	assert!(rows.is_empty());
}

pub fn search_by_filter_fields(store: &dyn HolderStore) {
	let degree = sample_record();
	let degree_id = store.store(&degree).unwrap();
	let other = VcRecord::new(json!({"other": true}))
		.with_types([VC_TYPE])
		.with_issuer_id("did:example:other-issuer")
		.with_subject_ids(["did:example:other-subject"])
		.with_proof_types(["BbsBlsSignature2020"])
		.with_tag("tag", "other");
	let other_id = store.store(&other).unwrap();

	let degree = stored(degree, degree_id);
	let other = stored(other, other_id);

	assert_eq!(search_all(store, &CredentialFilter::new()).len(), 2);
	assert_eq!(search_all(store, &CredentialFilter::new().with_types([VC_TYPE])).len(), 2);
	assert_eq!(
		search_all(store, &CredentialFilter::new().with_issuer_id(VC_ISSUER_ID)),
		vec![degree.clone()]
	);
	assert_eq!(
		search_all(store, &CredentialFilter::new().with_subject_id("did:example:other-subject")),
		vec![other.clone()]
	);
	assert_eq!(
		search_all(store, &CredentialFilter::new().with_schema_ids([VC_SCHEMA_ID, "Unrelated"])),
		vec![degree.clone()]
	);
	assert_eq!(
		search_all(store, &CredentialFilter::new().with_proof_types(["BbsBlsSignature2020"])),
		vec![other.clone()]
	);
	assert_eq!(
		search_all(store, &CredentialFilter::new().with_tag_query(TagQuery::equals("tag", "value"))),
		vec![degree.clone()]
	);
	assert_eq!(
		search_all(
			store,
			&CredentialFilter::new()
				.with_contexts(["https://unrelated.example/context"])
				.with_types([VC_TYPE])
				.with_issuer_id("did:example:other-issuer")
		),
		vec![other]
	);
	assert!(search_all(
		store,
		&CredentialFilter::new().with_issuer_id(VC_ISSUER_ID).with_proof_types(["BbsBlsSignature2020"])
	)
	.is_empty());
}

pub fn delete_records(store: &dyn HolderStore) {
	let record = sample_record();
	let record_id = store.store(&record).unwrap();
	store.delete(&record_id).unwrap();

	assert_matches!(store.retrieve_by_id(&record_id), Err(HolderError::NotFoundError(_)));
	assert!(search_all(store, &CredentialFilter::new().with_types([VC_TYPE])).is_empty());
	assert!(search_all(store, &CredentialFilter::new()).is_empty());

	// the given id is free again once its record is gone
	let reissued = store.store(&record).unwrap();
	store.delete_by_given_id(VC_GIVEN_ID).unwrap();
	assert_matches!(store.retrieve_by_id(&reissued), Err(HolderError::NotFoundError(_)));
	assert_matches!(store.delete_by_given_id(VC_GIVEN_ID), Err(HolderError::NotFoundError(_)));
}

pub fn cursor_lifecycle(store: &dyn HolderStore) {
	for i in 0..5 {
		let record = VcRecord::new(json!({ "n": i })).with_types([VC_TYPE]);
		store.store(&record).unwrap();
	}

	let query = CredentialFilter::new().with_types([VC_TYPE]).compile();
	let mut cursor = store.search(&query, None).unwrap();
	assert_eq!(cursor.fetch(3).unwrap().len(), 3);
	assert_eq!(cursor.fetch(3).unwrap().len(), 2);
	assert!(cursor.fetch(3).unwrap().is_empty());
	cursor.close();
	cursor.close();
	assert_matches!(cursor.fetch(1), Err(HolderError::ClosedCursorError));

	let mut limited = store.search(&query, Some(4)).unwrap();
	assert_eq!(limited.fetch_all().unwrap().len(), 4);

	let mut empty = store.search(&TagQuery::equals("type:Unrelated", "1"), None).unwrap();
	assert!(empty.fetch(10).unwrap().is_empty());
	empty.close();
	assert!(empty.is_closed());
}

pub fn invalid_records(store: &dyn HolderStore) {
	let untyped = VcRecord::new(json!({})).with_schema_ids([VC_SCHEMA_ID]);
	assert_matches!(
		store.store(&untyped),
		Err(HolderError::ValidationError(ValidationError::EmptyTypes))
	);

	let colliding = VcRecord::new(json!({}))
		.with_types([VC_TYPE])
		.with_given_id(VC_GIVEN_ID)
		.with_tag("given_id", "shadow");
	assert_matches!(
		store.store(&colliding),
		Err(HolderError::ValidationError(ValidationError::KeyCollision(key))) if key == "given_id"
	);

	// reserved names are refused even when the record lacks the matching field
	let shadow_given_id = VcRecord::new(json!({"shadow": true}))
		.with_types([VC_TYPE])
		.with_tag("given_id", VC_GIVEN_ID);
	assert_matches!(
		store.store(&shadow_given_id),
		Err(HolderError::ValidationError(ValidationError::KeyCollision(key))) if key == "given_id"
	);
	let fake_type = VcRecord::new(json!({"fake": true}))
		.with_types(["Other"])
		.with_tag(format!("type:{}", DEGREE_TYPE), "1");
	assert_matches!(
		store.store(&fake_type),
		Err(HolderError::ValidationError(ValidationError::KeyCollision(_)))
	);

	assert!(search_all(store, &CredentialFilter::new()).is_empty());
	assert_matches!(store.retrieve_by_given_id(VC_GIVEN_ID), Err(HolderError::NotFoundError(_)));

	let real = store.store(&sample_record()).unwrap();
	assert_eq!(store.retrieve_by_given_id(VC_GIVEN_ID).unwrap().record_id, Some(real));
	assert_eq!(search_all(store, &CredentialFilter::new().with_given_id(VC_GIVEN_ID)).len(), 1);
	assert!(search_all(store, &CredentialFilter::new().with_types(["Other"])).is_empty());
}

pub fn concurrent_given_id(store: &dyn HolderStore) {
	let results: Vec<Result<RecordId, HolderError>> = std::thread::scope(|scope| {
		let handles: Vec<_> = (0..8)
			.map(|i| {
				scope.spawn(move || {
					let record = VcRecord::new(json!({ "attempt": i }))
						.with_types([VC_TYPE])
						.with_given_id(VC_GIVEN_ID);
					store.store(&record)
				})
			})
			.collect();
		handles.into_iter().map(|handle| handle.join().unwrap()).collect()
	});

	assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
	assert!(results
		.iter()
		.filter_map(|result| result.as_ref().err())
		.all(|e| matches!(e, HolderError::DuplicateGivenIdError(_))));
	assert!(store.retrieve_by_given_id(VC_GIVEN_ID).is_ok());
}
