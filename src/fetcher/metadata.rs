use super::RemoteResourceFetcher;
use crate::{
	descriptor::RepositoryDescriptor,
	parsers,
	payload::{FetchResult, Payload, ResourceKind},
};

impl RemoteResourceFetcher {
	/// Reads the repository's metadata, which also decides whether it is private.
	pub async fn get_repo_meta(&self, repository: &mut RepositoryDescriptor) -> FetchResult {
		let kind = ResourceKind::Meta;
		let payload = match self.cached(repository, &kind) {
			Some(payload) => payload,
			None if self.no_update(repository) => return FetchResult::Skipped,
			None => {
				let payload = match self.client.get_repository(&repository.repo_ref()).await {
					Ok(info) => Payload::Meta(parsers::parse_repo_meta(&info)),
					Err(error) => return self.degrade(repository, &kind, error),
				};
				self.store(repository, &kind, &payload);
				payload
			}
		};
		match payload {
			Payload::Meta(meta) => {
				repository.set_repo_meta(meta.clone());
				FetchResult::Success(Payload::Meta(meta))
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

	fn respond(harness: &Harness, public: bool) {
		let body = format!(
			r#"{{"slug":"widget","id":3,"name":"Widget","project":{{"key":"ACME","id":1,"public":{public}}},"public":false}}"#
		);
		harness.transport.respond("/projects/ACME/repos/widget", 200, &body);
	}

	#[test]
	fn public_project_is_not_private() {
		let harness = Harness::new();
		respond(&harness, true);
		let mut repository = widget();
		repository.private = true;
		assert!(block_on(harness.fetcher.get_repo_meta(&mut repository)).is_success());
		assert!(!repository.private);
		assert_eq!(repository.repo_meta.as_ref().map(|meta| meta.name.as_str()), Some("Widget"));
	}

	#[test]
	fn non_public_project_is_private() {
		let harness = Harness::new();
		respond(&harness, false);
		let mut repository = widget();
		assert!(block_on(harness.fetcher.get_repo_meta(&mut repository)).is_success());
		assert!(repository.private);
	}

	#[test]
	fn failure_leaves_descriptor_untouched() {
		let harness = Harness::new();
		harness.transport.respond("/projects/ACME/repos/widget", 500, "");
		let mut repository = widget();
		let before = repository.clone();
		let result = block_on(harness.fetcher.get_repo_meta(&mut repository));
		assert!(matches!(result, FetchResult::NotFound(_)));
		assert_eq!(repository, before);
	}
}
