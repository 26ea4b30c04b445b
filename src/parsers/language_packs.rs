use crate::descriptor::RepoKind;
use bitbucket_server::{raw::LanguagePackEntry, RepoRef};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A translation package, ready for the host's installer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguagePack {
	pub language: String,
	/// Absolute download url.
	pub package: String,
	/// `plugin` or `theme`.
	#[serde(rename = "type")]
	pub kind: String,
	/// The remote version the pack was listed for.
	pub version: String,
	#[serde(flatten)]
	pub extra: BTreeMap<String, serde_json::Value>,
}

/// Reads the repository a `Languages` header points at.
/// Accepts a repository url on the server (`.../projects/KEY/repos/slug`) or a bare `KEY/slug`.
pub fn parse_language_source(uri: &str) -> Option<RepoRef> {
	let uri = uri.trim();
	if let Ok(url) = url::Url::parse(uri) {
		let segments = url.path_segments()?.filter(|segment| !segment.is_empty()).collect::<Vec<_>>();
		let project = segments.iter().position(|segment| *segment == "projects")?;
		return match &segments[project + 1..] {
			[owner, "repos", repo, ..] => Some(RepoRef::new(*owner, *repo)),
			_ => None,
		};
	}
	match uri.split('/').collect::<Vec<_>>()[..] {
		[owner, repo] if !owner.is_empty() && !repo.is_empty() => Some(RepoRef::new(owner, repo)),
		_ => None,
	}
}

/// Turns manifest entries into self-contained packs keyed by language.
/// `package_url` resolves a package path relative to the language repository into an absolute url.
pub fn localize_language_packs(
	entries: BTreeMap<String, LanguagePackEntry>,
	kind: RepoKind,
	version: &str,
	package_url: impl Fn(&str) -> String,
) -> BTreeMap<String, LanguagePack> {
	entries
		.into_values()
		.map(|entry| {
			let pack = LanguagePack {
				package: package_url(&entry.package),
				kind: kind.as_str().to_owned(),
				version: version.to_owned(),
				language: entry.language,
				extra: entry.extra,
			};
			(pack.language.clone(), pack)
		})
		.collect()
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn source_from_url() {
		let source = parse_language_source("https://git.example.com/projects/ACME/repos/widget-i18n/browse");
		assert_eq!(source, Some(RepoRef::new("ACME", "widget-i18n")));
		assert_eq!(parse_language_source("https://git.example.com/users/bob"), None);
	}

	#[test]
	fn source_from_short_form() {
		assert_eq!(parse_language_source("ACME/widget-i18n"), Some(RepoRef::new("ACME", "widget-i18n")));
		assert_eq!(parse_language_source("widget-i18n"), None);
	}

	#[test]
	fn stamps_type_and_version() {
		let entries: BTreeMap<String, LanguagePackEntry> = serde_json::from_str(
			r#"{"de":{"language":"de_DE","package":"/packages/widget-de_DE.zip","updated":"2024-02-01"}}"#,
		)
		.unwrap();
		let packs = localize_language_packs(entries, RepoKind::Theme, "2.1", |package| {
			format!("https://git.example.com/raw{package}")
		});
		let pack = &packs["de_DE"];
		assert_eq!(pack.package, "https://git.example.com/raw/packages/widget-de_DE.zip");
		assert_eq!(pack.kind, "theme");
		assert_eq!(pack.version, "2.1");
		assert_eq!(pack.extra["updated"], "2024-02-01");
	}
}
