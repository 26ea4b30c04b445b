use bitbucket_server::repos::metadata::RepositoryInfo;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoMeta {
	pub slug: String,
	pub name: String,
	pub project_key: String,
	pub description: Option<String>,
	pub private: bool,
	pub forkable: bool,
}

/// Visibility is decided by the project; a repository in a non-public project is private.
pub fn parse_repo_meta(info: &RepositoryInfo) -> RepoMeta {
	RepoMeta {
		slug: info.slug.clone(),
		name: info.name.clone(),
		project_key: info.project.key.clone(),
		description: info.description.clone().filter(|description| !description.is_empty()),
		private: !info.project.public,
		forkable: info.forkable.unwrap_or_default(),
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn info(project_public: bool) -> RepositoryInfo {
		let body = format!(
			r#"{{"slug":"widget","name":"Widget","description":"","forkable":true,
			"project":{{"key":"ACME","public":{project_public}}}}}"#
		);
		serde_json::from_str(&body).unwrap()
	}

	#[test]
	fn public_project() {
		let meta = parse_repo_meta(&info(true));
		assert!(!meta.private);
		assert_eq!(meta.project_key, "ACME");
		assert_eq!(meta.description, None);
		assert!(meta.forkable);
	}

	#[test]
	fn non_public_project() {
		assert!(parse_repo_meta(&info(false)).private);
	}
}
