use super::RemoteResourceFetcher;
use crate::{
	descriptor::RepositoryDescriptor,
	payload::{FetchResult, Payload, ResourceKind},
};
use std::collections::BTreeMap;

impl RemoteResourceFetcher {
	/// Maps every branch to the archive url installing it. Only done when branch switching is enabled.
	pub async fn get_remote_branches(&self, repository: &mut RepositoryDescriptor) -> FetchResult {
		let kind = ResourceKind::Branches;
		let payload = match self.cached(repository, &kind) {
			Some(payload) => payload,
			None if !self.config.branch_switch => return FetchResult::Skipped,
			None => {
				let branches = match self.client.get_branches(&repository.repo_ref()).await {
					Ok(branches) => branches,
					Err(error) => return self.degrade(repository, &kind, error),
				};
				let payload = match branches.is_empty() {
					true => Payload::NotFound(kind.not_found_message()),
					false => Payload::Branches(
						branches
							.into_iter()
							.map(|branch| {
								let link = self.construct_download_link(repository, None, Some(&branch.display_id));
								(branch.display_id, link)
							})
							.collect::<BTreeMap<_, _>>(),
					),
				};
				self.store(repository, &kind, &payload);
				payload
			}
		};
		match payload {
			Payload::Branches(branches) => {
				repository.set_branches(branches.clone());
				FetchResult::Success(Payload::Branches(branches))
			}
			other => Self::reject(&kind, other),
		}
	}
}
