use super::RemoteResourceFetcher;
use crate::{
	descriptor::RepositoryDescriptor,
	parsers,
	payload::{FetchResult, Payload, ResourceKind},
};
use bitbucket_server::repos::browse;

impl RemoteResourceFetcher {
	/// Reads the headers of `file` (the main plugin file, or `style.css`) on the active branch.
	pub async fn get_remote_info(&self, repository: &mut RepositoryDescriptor, file: &str) -> FetchResult {
		let kind = ResourceKind::File(file.to_owned());
		let payload = match self.cached(repository, &kind) {
			Some(payload) => payload,
			None => {
				let branch = repository.ensure_branch().to_owned();
				let repo = repository.repo_ref();
				let request = self.client.get_file_lines(browse::Args {
					repository: &repo,
					path: file,
					at: &branch,
				});
				let contents = match request.await {
					Ok(contents) => contents,
					Err(error) => return self.degrade(repository, &kind, error),
				};
				let payload = match parsers::parse_file_headers(&contents, repository.kind) {
					Ok(headers) => Payload::FileHeaders(headers),
					Err(error) => return FetchResult::ValidationError(error.to_string()),
				};
				self.store(repository, &kind, &payload);
				payload
			}
		};
		match payload {
			Payload::FileHeaders(headers) => {
				repository.set_file_info(&headers);
				FetchResult::Success(Payload::FileHeaders(headers))
			}
			other => Self::reject(&kind, other),
		}
	}
}
