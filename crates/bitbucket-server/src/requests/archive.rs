use crate::RepoRef;

impl crate::BitbucketServerClient {
	/// Url of a zip archive of the repository, served by the archive servlet plugin.
	/// Without `at` the server archives its default branch.
	pub fn archive_url(&self, repository: &RepoRef, at: Option<&str>) -> String {
		let base = format!(
			"{}/plugins/servlet/archive/projects/{}/repos/{}",
			self.enterprise, repository.owner, repository.repo
		);
		match at {
			Some(at) => format!("{base}?at={}", urlencoding::encode(at)),
			None => base,
		}
	}
}
