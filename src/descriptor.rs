use crate::parsers::{FileHeaders, LanguagePack, ReadmeInfo, RepoMeta};
use bitbucket_server::{RepoRef, DEFAULT_BRANCH};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::PathBuf};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepoKind {
	#[default]
	Plugin,
	Theme,
}

impl RepoKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Plugin => "plugin",
			Self::Theme => "theme",
		}
	}
}

impl std::str::FromStr for RepoKind {
	type Err = InvalidRepoKind;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"plugin" => Ok(Self::Plugin),
			"theme" => Ok(Self::Theme),
			_ => Err(InvalidRepoKind(s.to_owned())),
		}
	}
}

#[derive(thiserror::Error, Debug)]
#[error("Invalid repository kind {0:?}, expected plugin or theme")]
pub struct InvalidRepoKind(String);

/// Everything known about one tracked repository.
///
/// Created by the host for each update cycle and enriched in place by the fetcher.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
	pub kind: RepoKind,
	/// Identifies the repository in caches and in the private repository set.
	pub slug: String,
	/// The project key on the server.
	pub owner: String,
	pub repo: String,
	/// The branch updates are taken from. Unset means [`DEFAULT_BRANCH`].
	pub branch: Option<String>,
	/// Root url of the self-hosted server.
	pub enterprise: String,
	pub private: bool,
	/// Directory of the installed copy.
	pub local_path: PathBuf,
	pub local_version: String,

	pub name: Option<String>,
	pub author: Option<String>,
	pub remote_version: Option<String>,
	pub requires: Option<String>,
	pub requires_php: Option<String>,
	pub tested: Option<String>,
	/// Where the language packs of this repository are hosted.
	pub languages: Option<String>,
	pub contributors: Vec<String>,
	pub donate_link: Option<String>,
	pub upgrade_notice: BTreeMap<String, String>,

	/// Newest first.
	pub tags: Vec<String>,
	pub newest_tag: Option<String>,
	/// Tag to archive url, for rolling back to an older release.
	pub rollback: BTreeMap<String, String>,
	/// Rendered text per section name (description, changelog, ...).
	pub sections: BTreeMap<String, String>,
	/// Branch name to archive url.
	pub branches: BTreeMap<String, String>,
	pub language_packs: BTreeMap<String, LanguagePack>,
	pub repo_meta: Option<RepoMeta>,
	pub download_link: Option<String>,
}

impl RepositoryDescriptor {
	pub fn new(kind: RepoKind, owner: impl Into<String>, repo: impl Into<String>, enterprise: impl Into<String>) -> Self {
		let repo = repo.into();
		Self {
			kind,
			slug: repo.clone(),
			owner: owner.into(),
			repo,
			enterprise: enterprise.into(),
			..Default::default()
		}
	}

	pub fn branch(&self) -> &str {
		match self.branch.as_deref() {
			Some(branch) if !branch.is_empty() => branch,
			_ => DEFAULT_BRANCH,
		}
	}

	/// Pins an unset branch to [`DEFAULT_BRANCH`] and returns the active branch.
	pub fn ensure_branch(&mut self) -> &str {
		if self.branch.as_deref().map_or(true, str::is_empty) {
			self.branch = Some(DEFAULT_BRANCH.to_owned());
		}
		self.branch()
	}

	pub fn is_default_branch(&self) -> bool {
		self.branch() == DEFAULT_BRANCH
	}

	pub fn repo_ref(&self) -> RepoRef {
		RepoRef::new(&self.owner, &self.repo).private(self.private)
	}

	pub fn set_file_info(&mut self, headers: &FileHeaders) {
		self.name = Some(headers.name.clone());
		self.remote_version = Some(headers.version.clone());
		if headers.author.is_some() {
			self.author = headers.author.clone();
		}
		if headers.requires.is_some() {
			self.requires = headers.requires.clone();
		}
		if headers.requires_php.is_some() {
			self.requires_php = headers.requires_php.clone();
		}
		if headers.languages.is_some() {
			self.languages = headers.languages.clone();
		}
		if let Some(description) = &headers.description {
			self.sections.entry("description".into()).or_insert_with(|| description.clone());
		}
	}

	/// Stores the tag listing, which must already be ordered newest first.
	pub fn set_tags(&mut self, tags: Vec<String>, rollback: BTreeMap<String, String>) {
		self.newest_tag = tags.first().cloned();
		self.tags = tags;
		self.rollback = rollback;
	}

	pub fn set_changelog(&mut self, changelog: String) {
		self.sections.insert("changelog".into(), changelog);
	}

	/// Applies a parsed readme whose sections are already rendered.
	/// A changelog read from a dedicated changelog file takes precedence over the readme's.
	pub fn set_readme_info(&mut self, readme: &ReadmeInfo) {
		if readme.tested.is_some() {
			self.tested = readme.tested.clone();
		}
		if readme.requires.is_some() {
			self.requires = readme.requires.clone();
		}
		if readme.requires_php.is_some() {
			self.requires_php = readme.requires_php.clone();
		}
		if readme.donate_link.is_some() {
			self.donate_link = readme.donate_link.clone();
		}
		if !readme.contributors.is_empty() {
			self.contributors = readme.contributors.clone();
		}
		for (section, text) in &readme.sections {
			if section == "changelog" && self.sections.contains_key(section) {
				continue;
			}
			self.sections.insert(section.clone(), text.clone());
		}
		self.upgrade_notice = readme.upgrade_notice.clone();
	}

	pub fn set_repo_meta(&mut self, meta: RepoMeta) {
		self.private = meta.private;
		self.repo_meta = Some(meta);
	}

	pub fn set_branches(&mut self, branches: BTreeMap<String, String>) {
		self.branches = branches;
	}

	pub fn set_language_packs(&mut self, packs: BTreeMap<String, LanguagePack>) {
		self.language_packs = packs;
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn descriptor() -> RepositoryDescriptor {
		RepositoryDescriptor::new(RepoKind::Plugin, "ACME", "widget", "https://git.example.com")
	}

	#[test]
	fn branch_defaults_to_master() {
		let mut repository = descriptor();
		assert_eq!(repository.branch(), "master");
		assert_eq!(repository.branch, None);
		repository.branch = Some(String::new());
		assert_eq!(repository.ensure_branch(), "master");
		assert_eq!(repository.branch.as_deref(), Some("master"));
		repository.branch = Some("dev".into());
		assert_eq!(repository.ensure_branch(), "dev");
		assert!(!repository.is_default_branch());
	}

	#[test]
	fn tags_set_newest() {
		let mut repository = descriptor();
		repository.set_tags(vec!["v2.0".into(), "v1.0".into()], BTreeMap::new());
		assert_eq!(repository.newest_tag.as_deref(), Some("v2.0"));
		repository.set_tags(Vec::new(), BTreeMap::new());
		assert_eq!(repository.newest_tag, None);
	}

	#[test]
	fn readme_keeps_dedicated_changelog() {
		let mut repository = descriptor();
		repository.set_changelog("<p>from CHANGES.md</p>".into());
		let readme = ReadmeInfo {
			tested: Some("6.4".into()),
			sections: [
				("changelog".to_owned(), "<p>from readme</p>".to_owned()),
				("installation".to_owned(), "<p>unzip</p>".to_owned()),
			]
			.into(),
			..Default::default()
		};
		repository.set_readme_info(&readme);
		assert_eq!(repository.sections["changelog"], "<p>from CHANGES.md</p>");
		assert_eq!(repository.sections["installation"], "<p>unzip</p>");
		assert_eq!(repository.tested.as_deref(), Some("6.4"));
	}

	#[test]
	fn meta_sets_private() {
		let mut repository = descriptor();
		repository.set_repo_meta(RepoMeta {
			slug: "widget".into(),
			name: "Widget".into(),
			private: true,
			..Default::default()
		});
		assert!(repository.private);
		assert!(repository.repo_ref().private);
	}
}
