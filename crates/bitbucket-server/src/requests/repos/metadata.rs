use crate::{Error, RepoRef};
use futures_util::future::LocalBoxFuture;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryInfo {
	pub slug: String,
	pub name: String,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default)]
	pub state: Option<String>,
	#[serde(default)]
	pub forkable: Option<bool>,
	/// Whether the repository itself is public, independent of its project.
	#[serde(default)]
	pub public: Option<bool>,
	pub project: Project,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Project {
	pub key: String,
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub public: bool,
}

impl crate::BitbucketServerClient {
	pub fn get_repository(&self, repository: &RepoRef) -> LocalBoxFuture<'static, Result<RepositoryInfo, Error>> {
		let url = self.api_url(repository, "");
		self.get_json::<RepositoryInfo>(&url, repository)
	}
}
