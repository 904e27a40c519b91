use std::path::PathBuf;

use clap::{Parser as ClapParser, Subcommand};
use vc_holder::{CredentialFilter, TagQuery};

#[derive(ClapParser)]
#[command(about = "Store and query the verifiable credentials held by a wallet")]
pub struct Args {
	/// Database directory; overrides HOLDER_DB_PATH.
	#[arg(long, value_name = "DIR")]
	pub db_dir: Option<String>,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
	/// Store a credential read from a JSON file and print its record id.
	Store(StoreArgs),
	/// Print one stored record.
	Get(LookupArgs),
	/// Remove one stored record.
	Delete(LookupArgs),
	/// Print every record matching the given criteria.
	Search(SearchArgs),
}

#[derive(clap::Args)]
pub struct StoreArgs {
	/// Credential JSON file.
	#[arg(long, value_name = "FILE")]
	pub file: PathBuf,

	/// The file holds an LD-proof credential detail (`credential` plus `options`).
	#[arg(long)]
	pub detail: bool,

	/// Additional application tag.
	#[arg(long = "tag", value_name = "NAME=VALUE", value_parser = parse_tag)]
	pub tags: Vec<(String, String)>,
}

#[derive(clap::Args)]
#[group(required = true, multiple = false)]
pub struct LookupArgs {
	/// Record id assigned by the store.
	#[arg(long)]
	pub id: Option<String>,

	/// Credential id as given by the issuer.
	#[arg(long)]
	pub given_id: Option<String>,
}

#[derive(clap::Args, Default)]
pub struct SearchArgs {
	#[arg(long = "type", value_name = "URI")]
	pub types: Vec<String>,

	#[arg(long = "schema", value_name = "URI")]
	pub schema_ids: Vec<String>,

	#[arg(long = "issuer")]
	pub issuer_id: Option<String>,

	#[arg(long = "subject")]
	pub subject_id: Option<String>,

	#[arg(long = "proof-type")]
	pub proof_types: Vec<String>,

	#[arg(long)]
	pub given_id: Option<String>,

	/// Presentation definition URI; each must match a type or a schema.
	#[arg(long = "pd-uri", value_name = "URI")]
	pub pd_uris: Vec<String>,

	/// Extra WQL fragment, e.g. '{"tag":"value"}'.
	#[arg(long, value_name = "WQL", value_parser = parse_tag_query)]
	pub tag_query: Option<TagQuery>,

	#[arg(long)]
	pub limit: Option<usize>,
}

impl SearchArgs {
	pub fn to_filter(&self) -> CredentialFilter {
		let mut filter = CredentialFilter::new()
			.with_types(&self.types)
			.with_schema_ids(&self.schema_ids)
			.with_proof_types(&self.proof_types)
			.with_pd_uris(&self.pd_uris);
		if let Some(issuer_id) = &self.issuer_id {
			filter = filter.with_issuer_id(issuer_id);
		}
		if let Some(subject_id) = &self.subject_id {
			filter = filter.with_subject_id(subject_id);
		}
		if let Some(given_id) = &self.given_id {
			filter = filter.with_given_id(given_id);
		}
		if let Some(tag_query) = &self.tag_query {
			filter = filter.with_tag_query(tag_query.clone());
		}
		filter
	}
}

pub fn parse_tag(s: &str) -> Result<(String, String), String> {
	let (name, value) = s.split_once('=').ok_or_else(|| format!("expected NAME=VALUE, got {:?}", s))?;
	if name.is_empty() {
		return Err(format!("empty tag name in {:?}", s));
	}
	Ok((name.to_string(), value.to_string()))
}

pub fn parse_tag_query(s: &str) -> Result<TagQuery, String> {
	let value: serde_json::Value = serde_json::from_str(s).map_err(|e| e.to_string())?;
	TagQuery::from_wql(&value).map_err(|e| e.to_string())
}
