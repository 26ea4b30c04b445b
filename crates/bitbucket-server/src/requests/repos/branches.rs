use crate::{Error, RepoRef};
use futures_util::future::LocalBoxFuture;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
	pub id: String,
	pub display_id: String,
	#[serde(default)]
	pub is_default: bool,
}

#[derive(Deserialize)]
struct Page {
	#[serde(default)]
	values: Vec<Branch>,
}

impl crate::BitbucketServerClient {
	pub fn get_branches(&self, repository: &RepoRef) -> LocalBoxFuture<'static, Result<Vec<Branch>, Error>> {
		let url = self.api_url(repository, "/branches");
		let page = self.get_json::<Page>(&url, repository);
		Box::pin(async move { Ok(page.await?.values) })
	}
}
