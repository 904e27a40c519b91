//! Tag index and query engine for a wallet's verifiable credentials.
//!
//! A [`VcRecord`] is projected into flat equality tags by [`TagProjector`];
//! search criteria compile into a [`TagQuery`] tree; a [`HolderStore`]
//! backend persists records with their tags and answers queries through a
//! [`RecordCursor`].

pub mod error;
pub mod filter;
pub mod query;
pub mod record;
pub mod storage;
pub mod tags;

pub use error::{HolderError, ValidationError};
pub use filter::CredentialFilter;
pub use query::{build_type_or_schema_query, TagQuery};
pub use record::{RecordId, VcRecord};
pub use storage::memory::InMemoryHolder;
pub use storage::rocks_db::{RocksDbHolder, RocksDbHolderConfig};
pub use storage::{HolderStore, RecordCursor};
pub use tags::{Tag, TagMap, TagProjector};
