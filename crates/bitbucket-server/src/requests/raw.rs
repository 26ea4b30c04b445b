use crate::{Error, RepoRef};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The manifest, at the root of a language repository, listing its translation packages.
pub static LANGUAGE_PACK_MANIFEST: &str = "language-pack.json";

pub struct Args<'a> {
	pub repository: &'a RepoRef,
	/// The file name, which is encoded as a single url component.
	pub file: &'a str,
	/// The branch or tag to read the file at.
	pub at: &'a str,
}

/// A locale entry of a language pack manifest.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LanguagePackEntry {
	pub language: String,
	/// Path of the package archive, relative to the root of the language repository.
	pub package: String,
	#[serde(flatten)]
	pub extra: BTreeMap<String, serde_json::Value>,
}

impl crate::BitbucketServerClient {
	/// The rest api cannot stream file contents, so raw files are read through the web ui's `raw` view.
	pub fn raw_file_url(&self, request: &Args<'_>) -> String {
		self.raw_url(request.repository, &urlencoding::encode(request.file), request.at)
	}

	fn raw_url(&self, repository: &RepoRef, encoded_path: &str, at: &str) -> String {
		format!(
			"{}/projects/{}/repos/{}/browse/{encoded_path}?at={}&raw",
			self.enterprise,
			repository.owner,
			repository.repo,
			urlencoding::encode(at),
		)
	}

	pub fn get_raw_file(&self, request: Args<'_>) -> LocalBoxFuture<'static, Result<String, Error>> {
		let response = self.get(&self.raw_file_url(&request), request.repository);
		Box::pin(async move { response.await?.into_non_empty_body() })
	}

	/// Fetches the language pack manifest from the default branch of a language repository.
	pub fn get_language_packs(
		&self,
		repository: &RepoRef,
	) -> LocalBoxFuture<'static, Result<BTreeMap<String, LanguagePackEntry>, Error>> {
		let manifest = self.get_raw_file(Args {
			repository,
			file: LANGUAGE_PACK_MANIFEST,
			at: crate::DEFAULT_BRANCH,
		});
		Box::pin(async move {
			let manifest = manifest.await?;
			Ok(serde_json::from_str(&manifest)?)
		})
	}

	/// Absolute download url of a package listed in a language pack manifest.
	/// Packages live in subdirectories, so their path keeps its separators.
	pub fn language_package_url(&self, repository: &RepoRef, package: &str) -> String {
		let path = crate::encode_path(package.trim_start_matches('/'));
		self.raw_url(repository, &path, crate::DEFAULT_BRANCH)
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::{BitbucketServerClient, ScriptedTransport};
	use futures::executor::block_on;
	use std::rc::Rc;

	fn client(transport: Rc<ScriptedTransport>) -> BitbucketServerClient {
		BitbucketServerClient::with_transport("https://git.example.com", transport).unwrap()
	}

	#[test]
	fn raw_url() {
		let client = client(Rc::new(ScriptedTransport::default()));
		let repository = RepoRef::new("acme", "widget");
		let args = Args {
			repository: &repository,
			file: "CHANGES.md",
			at: "dev",
		};
		assert_eq!(
			client.raw_file_url(&args),
			"https://git.example.com/projects/acme/repos/widget/browse/CHANGES.md?at=dev&raw"
		);
	}

	#[test]
	fn raw_url_encodes_file() {
		let client = client(Rc::new(ScriptedTransport::default()));
		let repository = RepoRef::new("acme", "widget");
		let args = Args {
			repository: &repository,
			file: "docs/change log.md",
			at: "release/2.0",
		};
		assert!(client
			.raw_file_url(&args)
			.ends_with("/browse/docs%2Fchange%20log.md?at=release%2F2.0&raw"));
	}

	#[test]
	fn empty_raw_file() {
		let transport = Rc::new(ScriptedTransport::default());
		transport.respond("/browse/readme.txt", 200, "");
		let client = client(transport);
		let repository = RepoRef::new("acme", "widget");
		let args = Args {
			repository: &repository,
			file: "readme.txt",
			at: "master",
		};
		assert!(matches!(block_on(client.get_raw_file(args)), Err(Error::EmptyBody)));
	}

	#[test]
	fn language_manifest() {
		let transport = Rc::new(ScriptedTransport::default());
		transport.respond(
			"/browse/language-pack.json?at=master&raw",
			200,
			r#"{"de_DE":{"language":"de_DE","package":"/packages/widget-de_DE.zip","updated":"2024-01-01"}}"#,
		);
		let client = client(transport);
		let repository = RepoRef::new("acme", "widget-translations");
		let packs = block_on(client.get_language_packs(&repository)).unwrap();
		let entry = &packs["de_DE"];
		assert_eq!(entry.package, "/packages/widget-de_DE.zip");
		assert_eq!(entry.extra["updated"], "2024-01-01");
		assert_eq!(
			client.language_package_url(&repository, &entry.package),
			"https://git.example.com/projects/acme/repos/widget-translations/browse/packages/widget-de_DE.zip?at=master&raw"
		);
	}

	#[test]
	fn package_url_keeps_directories() {
		let client = client(Rc::new(ScriptedTransport::default()));
		let repository = RepoRef::new("ACME", "widget-i18n");
		assert_eq!(
			client.language_package_url(&repository, "/packages/de DE/widget.zip"),
			"https://git.example.com/projects/ACME/repos/widget-i18n/browse/packages/de%20DE/widget.zip?at=master&raw"
		);
		assert!(client
			.language_package_url(&repository, "widget-fr_FR.zip")
			.ends_with("/browse/widget-fr_FR.zip?at=master&raw"));
	}
}
