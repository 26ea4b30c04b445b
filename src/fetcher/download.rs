use super::RemoteResourceFetcher;
use crate::descriptor::RepositoryDescriptor;

impl RemoteResourceFetcher {
	/// The archive url updates are installed from.
	///
	/// On the default branch the newest tag is installed when the repository has tags; on any other branch
	/// the branch head is. A `rollback` tag overrides that, and a `branch_switch` overrides everything.
	pub fn construct_download_link(
		&self,
		repository: &RepositoryDescriptor,
		rollback: Option<&str>,
		branch_switch: Option<&str>,
	) -> String {
		let newest_tag = match repository.is_default_branch() && !repository.tags.is_empty() {
			true => repository.newest_tag.as_deref(),
			false => None,
		};
		let at = branch_switch.or(rollback).or(newest_tag).unwrap_or_else(|| repository.branch());
		self.client.archive_url(&repository.repo_ref(), Some(at))
	}
}
