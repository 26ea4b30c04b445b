use super::{Cache, CacheKey};
use crate::payload::Payload;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

#[derive(Serialize, Deserialize)]
struct Entry {
	/// Unix timestamp, in seconds.
	expires_at: i64,
	payload: Payload,
}

/// A cache which keeps one json file per entry in a directory, so it survives between runs.
pub struct FileCache {
	root: PathBuf,
}

impl FileCache {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	fn path(&self, key: &CacheKey) -> PathBuf {
		let safe = |value: &str| {
			value
				.chars()
				.map(|c| match c.is_ascii_alphanumeric() || c == '-' || c == '.' {
					true => c,
					false => '_',
				})
				.collect::<String>()
		};
		self.root.join(format!("{}--{}.json", safe(&key.repository), safe(&key.resource)))
	}
}

impl Cache for FileCache {
	fn get(&self, key: &CacheKey) -> Option<Payload> {
		let path = self.path(key);
		let content = std::fs::read_to_string(&path).ok()?;
		let entry = match serde_json::from_str::<Entry>(&content) {
			Ok(entry) => entry,
			Err(err) => {
				log::warn!(target: "updater", "Ignoring unreadable cache entry {}: {err}", path.display());
				return None;
			}
		};
		if OffsetDateTime::now_utc().unix_timestamp() >= entry.expires_at {
			if let Err(err) = std::fs::remove_file(&path) {
				log::trace!(target: "updater", "Expired cache entry {} was not removed: {err}", path.display());
			}
			return None;
		}
		Some(entry.payload)
	}

	fn set(&self, key: CacheKey, payload: Payload, ttl: time::Duration) {
		let expires_at = (OffsetDateTime::now_utc() + ttl).unix_timestamp();
		let path = self.path(&key);
		let result = std::fs::create_dir_all(&self.root)
			.map_err(|err| err.to_string())
			.and_then(|_| serde_json::to_string(&Entry { expires_at, payload }).map_err(|err| err.to_string()))
			.and_then(|content| std::fs::write(&path, content).map_err(|err| err.to_string()));
		if let Err(err) = result {
			log::warn!(target: "updater", "Failed to cache {key} at {}: {err}", path.display());
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::payload::ResourceKind;

	#[test]
	fn survives_reopen() {
		let dir = tempfile::tempdir().unwrap();
		let key = CacheKey::new("widget", &ResourceKind::File("widget.php".into()));
		FileCache::new(dir.path()).set(key.clone(), Payload::Changelog("* fix".into()), time::Duration::hours(1));
		let reopened = FileCache::new(dir.path());
		assert_eq!(reopened.get(&key), Some(Payload::Changelog("* fix".into())));
		assert!(dir.path().join("widget--widget.php.json").exists());
	}

	#[test]
	fn expired_entry_is_removed() {
		let dir = tempfile::tempdir().unwrap();
		let cache = FileCache::new(dir.path().join("nested"));
		let key = CacheKey::new("widget", &ResourceKind::Tags);
		cache.set(key.clone(), Payload::Tags(Vec::new()), time::Duration::ZERO);
		assert_eq!(cache.get(&key), None);
		assert!(!dir.path().join("nested/widget--tags.json").exists());
	}

	#[test]
	fn corrupt_entry_is_a_miss() {
		let dir = tempfile::tempdir().unwrap();
		let cache = FileCache::new(dir.path());
		let key = CacheKey::new("widget", &ResourceKind::Readme);
		std::fs::write(dir.path().join("widget--readme.json"), "not json").unwrap();
		assert_eq!(cache.get(&key), None);
	}
}
