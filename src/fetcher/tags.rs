use super::RemoteResourceFetcher;
use crate::{
	descriptor::RepositoryDescriptor,
	parsers,
	payload::{FetchResult, Payload, ResourceKind},
};
use std::collections::BTreeMap;

impl RemoteResourceFetcher {
	/// Lists the repository's tags. An empty or failed listing stands in as "No tags found".
	pub async fn get_remote_tag(&self, repository: &mut RepositoryDescriptor) -> FetchResult {
		let kind = ResourceKind::Tags;
		let payload = match self.cached(repository, &kind) {
			Some(payload) => payload,
			None if self.no_update(repository) => return FetchResult::Skipped,
			None => {
				let page = match self.client.get_tags(&repository.repo_ref()).await {
					Ok(page) => page,
					Err(error) => return self.degrade(repository, &kind, error),
				};
				let payload = match parsers::parse_tags(&page) {
					Some(tags) => Payload::Tags(tags),
					None => Payload::NotFound(kind.not_found_message()),
				};
				self.store(repository, &kind, &payload);
				payload
			}
		};
		match payload {
			Payload::Tags(tags) => {
				let repo = repository.repo_ref();
				let rollback = tags
					.iter()
					.map(|tag| (tag.clone(), self.client.archive_url(&repo, Some(tag))))
					.collect::<BTreeMap<_, _>>();
				repository.set_tags(tags.clone(), rollback);
				FetchResult::Success(Payload::Tags(tags))
			}
			other => Self::reject(&kind, other),
		}
	}
}
