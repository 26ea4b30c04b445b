use super::{Cache, CacheKey};
use crate::payload::Payload;
use std::{collections::HashMap, sync::Mutex};
use time::OffsetDateTime;

struct Entry {
	payload: Payload,
	expires_at: OffsetDateTime,
}

/// A cache which lives as long as the process.
#[derive(Default)]
pub struct MemoryCache {
	entries: Mutex<HashMap<CacheKey, Entry>>,
}

impl MemoryCache {
	pub fn len(&self) -> usize {
		self.entries.lock().map(|entries| entries.len()).unwrap_or_default()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl Cache for MemoryCache {
	fn get(&self, key: &CacheKey) -> Option<Payload> {
		let Ok(mut entries) = self.entries.lock() else {
			return None;
		};
		let entry = entries.get(key)?;
		if OffsetDateTime::now_utc() < entry.expires_at {
			return Some(entry.payload.clone());
		}
		entries.remove(key);
		None
	}

	fn set(&self, key: CacheKey, payload: Payload, ttl: time::Duration) {
		let Ok(mut entries) = self.entries.lock() else {
			return;
		};
		let expires_at = OffsetDateTime::now_utc() + ttl;
		entries.insert(key, Entry { payload, expires_at });
	}
}
