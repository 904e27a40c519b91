use std::io::Write;

use tracing::info;
use vc_holder::{HolderError, HolderStore, RecordId, VcRecord};

use crate::cli::{LookupArgs, SearchArgs, StoreArgs};
use crate::error::CliError;
use crate::import::read_record;

pub fn store(
	holder: &dyn HolderStore, args: StoreArgs, out: &mut impl Write,
) -> Result<(), CliError> {
	let mut record = read_record(&args.file, args.detail)?;
	record.cred_tags.extend(args.tags);

	let record_id = holder.store(&record)?;
	info!(%record_id, given_id = ?record.given_id, "stored credential");
	writeln!(out, "{}", record_id)?;
	Ok(())
}

fn lookup(holder: &dyn HolderStore, args: &LookupArgs) -> Result<VcRecord, CliError> {
	let record = match (&args.id, &args.given_id) {
		(Some(id), _) => holder.retrieve_by_id(&RecordId::new(id.as_str()))?,
		(None, Some(given_id)) => holder.retrieve_by_given_id(given_id)?,
		(None, None) => return Err(CliError::MissingLookupKey),
	};
	Ok(record)
}

pub fn get(
	holder: &dyn HolderStore, args: LookupArgs, out: &mut impl Write,
) -> Result<(), CliError> {
	let record = lookup(holder, &args)?;
	serde_json::to_writer_pretty(&mut *out, &record)?;
	writeln!(out)?;
	Ok(())
}

pub fn delete(
	holder: &dyn HolderStore, args: LookupArgs, out: &mut impl Write,
) -> Result<(), CliError> {
	let record = lookup(holder, &args)?;
	let record_id = record
		.record_id
		.ok_or_else(|| HolderError::BackendError("stored record has no id".to_string()))?;
	holder.delete(&record_id)?;
	info!(%record_id, "deleted credential");
	writeln!(out, "{}", record_id)?;
	Ok(())
}

pub fn search(
	holder: &dyn HolderStore, args: SearchArgs, out: &mut impl Write,
) -> Result<(), CliError> {
	let filter = args.to_filter();
	let mut cursor = holder.search_credentials(&filter, args.limit)?;
	let rows = cursor.fetch_all()?;
	cursor.close();

	info!(count = rows.len(), "search finished");
	serde_json::to_writer_pretty(&mut *out, &rows)?;
	writeln!(out)?;
	Ok(())
}
