use super::RemoteResourceFetcher;
use crate::{
	descriptor::RepositoryDescriptor,
	parsers,
	payload::{FetchResult, Payload, ResourceKind},
};
use bitbucket_server::raw;

impl RemoteResourceFetcher {
	/// Reads a changelog file such as `CHANGES.md` into the descriptor's changelog section.
	pub async fn get_remote_changes(&self, repository: &mut RepositoryDescriptor, file: &str) -> FetchResult {
		let kind = ResourceKind::Changelog(file.to_owned());
		let payload = match self.cached(repository, &kind) {
			Some(payload) => payload,
			None => {
				let contents = match self.local_fallback(repository, file) {
					Some(contents) => contents,
					None => {
						let branch = repository.ensure_branch().to_owned();
						let repo = repository.repo_ref();
						let request = self.client.get_raw_file(raw::Args {
							repository: &repo,
							file,
							at: &branch,
						});
						match request.await {
							Ok(contents) => contents,
							Err(error) => return self.degrade(repository, &kind, error),
						}
					}
				};
				let payload = match parsers::parse_changelog(&contents) {
					Ok(changelog) => Payload::Changelog(changelog),
					Err(error) => return FetchResult::ValidationError(error.to_string()),
				};
				self.store(repository, &kind, &payload);
				payload
			}
		};
		match payload {
			Payload::Changelog(changelog) => {
				repository.set_changelog(self.markdown.render(&changelog));
				FetchResult::Success(Payload::Changelog(changelog))
			}
			other => Self::reject(&kind, other),
		}
	}
}

#[cfg(test)]
mod test {
	use super::super::test::*;
	use super::*;
	use futures::executor::block_on;

	fn changes() -> ResourceKind {
		ResourceKind::Changelog("CHANGES.md".into())
	}

	#[test]
	fn raw_file_on_branch() {
		let harness = Harness::new();
		harness.transport.respond("/browse/CHANGES.md?at=dev&raw", 200, "## 1.1\n* Faster widgets\n");
		let mut repository = widget();
		repository.owner = "acme".into();
		repository.branch = Some("dev".into());
		let result = block_on(harness.fetcher.get_remote_changes(&mut repository, "CHANGES.md"));
		assert!(result.is_success());
		assert_eq!(
			harness.transport.urls(),
			vec!["https://git.example.com/projects/acme/repos/widget/browse/CHANGES.md?at=dev&raw".to_owned()]
		);
		assert_eq!(repository.sections["changelog"], "<h2>1.1</h2>\n<ul><li>Faster widgets</li></ul>");
		assert_eq!(
			harness.cached(&repository, &changes()),
			Some(Payload::Changelog("## 1.1\n* Faster widgets".into()))
		);
	}

	#[test]
	fn missing_changelog_does_not_abort() {
		let harness = Harness::new();
		harness.transport.respond("/browse/CHANGES.md", 404, "");
		let mut repository = widget();
		let result = block_on(harness.fetcher.get_remote_changes(&mut repository, "CHANGES.md"));
		assert!(matches!(result, FetchResult::NotFound(message) if message == "No changelog found"));
		assert!(!repository.sections.contains_key("changelog"));

		harness
			.transport
			.respond("/repos/widget/tags", 200, r#"{"size":1,"values":[{"id":"refs/tags/v1.0","displayId":"v1.0"}]}"#);
		assert!(block_on(harness.fetcher.get_remote_tag(&mut repository)).is_success());
	}

	#[test]
	fn installed_copy_when_no_update() {
		let harness = Harness::new();
		harness.host.can_update.set(false);
		harness.host.install("CHANGES.md", "* Installed notes");
		let mut repository = widget();
		let result = block_on(harness.fetcher.get_remote_changes(&mut repository, "CHANGES.md"));
		assert!(result.is_success());
		assert_eq!(harness.transport.calls(), 0);
		assert_eq!(repository.sections["changelog"], "<ul><li>Installed notes</li></ul>");
	}

	#[test]
	fn network_when_no_installed_copy() {
		let harness = Harness::new();
		harness.host.can_update.set(false);
		harness.transport.respond("/browse/CHANGES.md", 200, "* Remote notes");
		let mut repository = widget();
		assert!(block_on(harness.fetcher.get_remote_changes(&mut repository, "CHANGES.md")).is_success());
		assert_eq!(harness.transport.calls(), 1);
	}

	#[test]
	fn expired_entry_is_refetched() {
		let harness = Harness::new();
		let mut repository = widget();
		let key = crate::cache::CacheKey::new(&repository.slug, &changes());
		crate::cache::Cache::set(&*harness.cache, key, Payload::Changelog("old".into()), time::Duration::ZERO);
		harness.transport.respond("/browse/CHANGES.md", 200, "new");
		assert!(block_on(harness.fetcher.get_remote_changes(&mut repository, "CHANGES.md")).is_success());
		assert_eq!(harness.transport.calls(), 1);
		assert_eq!(repository.sections["changelog"], "<p>new</p>");
	}
}
