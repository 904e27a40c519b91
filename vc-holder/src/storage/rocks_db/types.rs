#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RocksDbHolderConfig {
	pub path: String,
	pub create_if_missing: bool,
}

impl RocksDbHolderConfig {
	pub fn new(path: impl Into<String>) -> Self {
		RocksDbHolderConfig { path: path.into(), create_if_missing: true }
	}
}
