use super::RemoteResourceFetcher;
use crate::{
	descriptor::RepositoryDescriptor,
	parsers,
	payload::{FetchResult, Payload, ResourceKind},
};
use bitbucket_server::RepoRef;

impl RemoteResourceFetcher {
	/// Lists the translation packages hosted in `source`, with absolute download urls.
	pub async fn get_language_pack(&self, repository: &mut RepositoryDescriptor, source: &RepoRef) -> FetchResult {
		let kind = ResourceKind::LanguagePacks;
		let payload = match self.cached(repository, &kind) {
			Some(payload) => payload,
			None => {
				let entries = match self.client.get_language_packs(source).await {
					Ok(entries) => entries,
					Err(error) => return self.degrade(repository, &kind, error),
				};
				let payload = match entries.is_empty() {
					true => Payload::NotFound(kind.not_found_message()),
					false => {
						let version = repository.remote_version.clone().unwrap_or_default();
						let packs = parsers::localize_language_packs(entries, repository.kind, &version, |package| {
							self.client.language_package_url(source, package)
						});
						Payload::LanguagePacks(packs)
					}
				};
				self.store(repository, &kind, &payload);
				payload
			}
		};
		match payload {
			Payload::LanguagePacks(packs) => {
				repository.set_language_packs(packs.clone());
				FetchResult::Success(Payload::LanguagePacks(packs))
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

	static MANIFEST: &str = r#"{
		"de_DE":{"language":"de_DE","package":"/packages/widget-de_DE.zip"},
		"fr_FR":{"language":"fr_FR","package":"/packages/widget-fr_FR.zip"}
	}"#;

	#[test]
	fn packs_through_header_source() {
		let harness = Harness::new();
		harness
			.transport
			.respond("/repos/widget-i18n/browse/language-pack.json?at=master&raw", 200, MANIFEST);
		let mut repository = widget();
		repository.remote_version = Some("2.0".into());
		repository.languages = Some("https://git.example.com/projects/ACME/repos/widget-i18n".into());
		let result = block_on(harness.fetcher.fetch(&ResourceKind::LanguagePacks, &mut repository));
		assert!(result.is_success());
		let pack = &repository.language_packs["fr_FR"];
		assert_eq!(
			pack.package,
			"https://git.example.com/projects/ACME/repos/widget-i18n/browse/packages/widget-fr_FR.zip?at=master&raw"
		);
		assert_eq!(pack.kind, "plugin");
		assert_eq!(pack.version, "2.0");
	}

	#[test]
	fn missing_manifest_is_not_fatal() {
		let harness = Harness::new();
		let mut repository = widget();
		let source = RepoRef::new("ACME", "widget-i18n");
		let result = block_on(harness.fetcher.get_language_pack(&mut repository, &source));
		assert!(matches!(result, FetchResult::NotFound(_)));
		assert!(repository.language_packs.is_empty());
	}
}
