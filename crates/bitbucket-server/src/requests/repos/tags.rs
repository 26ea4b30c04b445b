use crate::{ApiMessage, Error, RepoRef};
use futures_util::future::LocalBoxFuture;
use serde::Deserialize;

/// One page of the tag listing.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TagPage {
	#[serde(default)]
	pub size: Option<u64>,
	#[serde(default)]
	pub values: Vec<Tag>,
	#[serde(default)]
	pub is_last_page: Option<bool>,
	/// Present when the server could not list the tags.
	#[serde(default)]
	pub errors: Option<Vec<ApiMessage>>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
	pub id: String,
	pub display_id: String,
	#[serde(default)]
	pub latest_commit: Option<String>,
}

impl TagPage {
	/// True when the page carries no usable tags.
	pub fn is_empty(&self) -> bool {
		self.errors.is_some() || self.size.map_or(false, |size| size < 1) || self.values.is_empty()
	}
}

impl crate::BitbucketServerClient {
	pub fn get_tags(&self, repository: &RepoRef) -> LocalBoxFuture<'static, Result<TagPage, Error>> {
		let url = self.api_url(repository, "/tags");
		self.get_json::<TagPage>(&url, repository)
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn parse(body: &str) -> TagPage {
		serde_json::from_str(body).unwrap()
	}

	#[test]
	fn listed() {
		let page = parse(
			r#"{"size":2,"limit":25,"isLastPage":true,"start":0,"values":[
				{"id":"refs/tags/v1.1","displayId":"v1.1","latestCommit":"abc"},
				{"id":"refs/tags/v1.0","displayId":"v1.0","latestCommit":"def"}
			]}"#,
		);
		assert!(!page.is_empty());
		assert_eq!(page.values[0].display_id, "v1.1");
		assert_eq!(page.values[1].latest_commit.as_deref(), Some("def"));
	}

	#[test]
	fn zero_size() {
		assert!(parse(r#"{"size":0,"values":[]}"#).is_empty());
	}

	#[test]
	fn errors() {
		assert!(parse(r#"{"errors":[{"message":"Project ACME does not exist."}]}"#).is_empty());
	}
}
