use crate::{encode_path, Error, RepoRef};
use futures_util::future::LocalBoxFuture;
use serde::Deserialize;

pub struct Args<'a> {
	pub repository: &'a RepoRef,
	/// The path to the file in the repository.
	pub path: &'a str,
	/// The branch or tag to read the file at.
	pub at: &'a str,
}

#[derive(Deserialize)]
struct Page {
	#[serde(default)]
	lines: Vec<Line>,
}

#[derive(Deserialize)]
struct Line {
	text: String,
}

impl crate::BitbucketServerClient {
	pub fn browse_url(&self, request: &Args<'_>) -> String {
		let suffix = format!("/browse/{}", encode_path(request.path));
		format!(
			"{}?at={}",
			self.api_url(request.repository, &suffix),
			urlencoding::encode(request.at)
		)
	}

	/// Fetches a file through the browse api.
	/// The api answers with one json object per line, which are joined back into `\n` terminated text.
	pub fn get_file_lines(&self, request: Args<'_>) -> LocalBoxFuture<'static, Result<String, Error>> {
		let page = self.get_json::<Page>(&self.browse_url(&request), request.repository);
		Box::pin(async move {
			let page = page.await?;
			if page.lines.is_empty() {
				return Err(Error::EmptyBody);
			}
			let mut content = String::new();
			for line in page.lines {
				content.push_str(&line.text);
				content.push('\n');
			}
			Ok(content)
		})
	}
}
