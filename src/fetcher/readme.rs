use super::{RemoteResourceFetcher, README_FILE};
use crate::{
	descriptor::RepositoryDescriptor,
	parsers::{self, ReadmeInfo},
	payload::{FetchResult, Payload, ResourceKind},
};
use bitbucket_server::raw;

impl RemoteResourceFetcher {
	/// Reads `readme.txt`, for repositories whose installed copy ships one.
	pub async fn get_remote_readme(&self, repository: &mut RepositoryDescriptor) -> FetchResult {
		if !self.host.has_local_file(repository, README_FILE) {
			return FetchResult::Skipped;
		}
		let kind = ResourceKind::Readme;
		let payload = match self.cached(repository, &kind) {
			Some(payload) => payload,
			None => {
				let contents = match self.local_fallback(repository, README_FILE) {
					Some(contents) => contents,
					None => {
						let branch = repository.ensure_branch().to_owned();
						let repo = repository.repo_ref();
						let request = self.client.get_raw_file(raw::Args {
							repository: &repo,
							file: README_FILE,
							at: &branch,
						});
						match request.await {
							Ok(contents) => contents,
							Err(error) => return self.degrade(repository, &kind, error),
						}
					}
				};
				let payload = match parsers::parse_readme(&contents) {
					Ok(readme) => Payload::Readme(readme),
					Err(error) => return FetchResult::ValidationError(error.to_string()),
				};
				self.store(repository, &kind, &payload);
				payload
			}
		};
		match payload {
			Payload::Readme(readme) => {
				repository.set_readme_info(&self.render_readme(&readme));
				FetchResult::Success(Payload::Readme(readme))
			}
			other => Self::reject(&kind, other),
		}
	}

	fn render_readme(&self, readme: &ReadmeInfo) -> ReadmeInfo {
		let render = |(key, text): (&String, &String)| (key.clone(), self.markdown.render(text));
		ReadmeInfo {
			sections: readme.sections.iter().map(render).collect(),
			upgrade_notice: readme.upgrade_notice.iter().map(render).collect(),
			..readme.clone()
		}
	}
}
