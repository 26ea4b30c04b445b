use crate::payload::{Payload, ResourceKind};

mod file;
pub use file::*;
mod memory;
pub use memory::*;

/// Identifies one cached resource of one repository.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
	pub repository: String,
	pub resource: String,
}

impl CacheKey {
	pub fn new(repository: &str, kind: &ResourceKind) -> Self {
		Self {
			repository: repository.to_owned(),
			resource: kind.cache_name(),
		}
	}
}

impl std::fmt::Display for CacheKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}/{}", self.repository, self.resource)
	}
}

/// Key-value storage of fetched payloads with expiry.
///
/// Implementations must never return an expired entry. Writes replace the existing entry.
pub trait Cache {
	fn get(&self, key: &CacheKey) -> Option<Payload>;
	fn set(&self, key: CacheKey, payload: Payload, ttl: time::Duration);
}
