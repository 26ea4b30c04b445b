use crate::parsers::{FileHeaders, LanguagePack, ReadmeInfo, RepoMeta};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The resources the fetcher knows how to retrieve.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
	/// Headers of a file in the repository, usually the main plugin file or `style.css`.
	File(String),
	Tags,
	/// A changelog file. All changelog files share one cache entry.
	Changelog(String),
	Readme,
	Meta,
	Branches,
	LanguagePacks,
}

impl ResourceKind {
	/// The name this kind is cached under.
	pub fn cache_name(&self) -> String {
		match self {
			Self::File(file) => file.clone(),
			Self::Tags => "tags".into(),
			Self::Changelog(_) => "changelog".into(),
			Self::Readme => "readme".into(),
			Self::Meta => "meta".into(),
			Self::Branches => "branches".into(),
			Self::LanguagePacks => "languages".into(),
		}
	}

	/// Message of the sentinel which stands in for this resource when it could not be retrieved.
	pub fn not_found_message(&self) -> String {
		match self {
			Self::File(file) => format!("No {file} found"),
			Self::Tags => "No tags found".into(),
			Self::Changelog(_) => "No changelog found".into(),
			Self::Readme => "No readme found".into(),
			Self::Meta => "No repository metadata found".into(),
			Self::Branches => "No branches found".into(),
			Self::LanguagePacks => "No language packs found".into(),
		}
	}
}

impl std::fmt::Display for ResourceKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::File(file) | Self::Changelog(file) => write!(f, "{}({file})", self.cache_name()),
			_ => write!(f, "{}", self.cache_name()),
		}
	}
}

/// A normalized response, as stored in the cache.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Payload {
	/// Sentinel for a resource the server did not provide.
	NotFound(String),
	FileHeaders(FileHeaders),
	/// Newest first.
	Tags(Vec<String>),
	/// Unrendered changelog text.
	Changelog(String),
	Readme(ReadmeInfo),
	Meta(RepoMeta),
	Branches(BTreeMap<String, String>),
	LanguagePacks(BTreeMap<String, LanguagePack>),
}

impl Payload {
	pub fn name(&self) -> &'static str {
		match self {
			Self::NotFound(_) => "not_found",
			Self::FileHeaders(_) => "file_headers",
			Self::Tags(_) => "tags",
			Self::Changelog(_) => "changelog",
			Self::Readme(_) => "readme",
			Self::Meta(_) => "meta",
			Self::Branches(_) => "branches",
			Self::LanguagePacks(_) => "language_packs",
		}
	}
}

/// Outcome of fetching one resource. Only [`FetchResult::Success`] changes the descriptor.
#[derive(Clone, Debug)]
pub enum FetchResult {
	Success(Payload),
	/// The server has no such resource, or a cached sentinel says so.
	NotFound(String),
	/// The request did not get an answer.
	TransportError(bitbucket_server::Error),
	/// The answer could not be understood.
	ValidationError(String),
	/// Nothing was requested because nothing could have changed.
	Skipped,
}

impl FetchResult {
	pub fn is_success(&self) -> bool {
		matches!(self, Self::Success(_))
	}
}

impl std::fmt::Display for FetchResult {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Success(payload) => write!(f, "success ({})", payload.name()),
			Self::NotFound(message) => write!(f, "not found: {message}"),
			Self::TransportError(error) => write!(f, "transport error: {error}"),
			Self::ValidationError(message) => write!(f, "invalid: {message}"),
			Self::Skipped => write!(f, "skipped"),
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn changelogs_share_a_cache_entry() {
		let a = ResourceKind::Changelog("CHANGES.md".into());
		let b = ResourceKind::Changelog("CHANGELOG.md".into());
		assert_eq!(a.cache_name(), b.cache_name());
		assert_eq!(a.to_string(), "changelog(CHANGES.md)");
	}

	#[test]
	fn cached_form() {
		let payload = Payload::Tags(vec!["v1.0".into()]);
		let json = serde_json::to_string(&payload).unwrap();
		assert_eq!(json, r#"{"kind":"tags","data":["v1.0"]}"#);
		let sentinel: Payload = serde_json::from_str(r#"{"kind":"not_found","data":"No tags found"}"#).unwrap();
		assert_eq!(sentinel, Payload::NotFound("No tags found".into()));
	}
}
