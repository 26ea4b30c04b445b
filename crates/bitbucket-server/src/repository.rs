/// Identifies the repository a request is made on behalf of.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepoRef {
	/// The project key; personal repositories are not supported.
	pub owner: String,
	/// The repository slug.
	pub repo: String,
	/// Whether the repository is known to need credentials.
	pub private: bool,
}

impl RepoRef {
	pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
		Self {
			owner: owner.into(),
			repo: repo.into(),
			private: false,
		}
	}

	pub fn private(mut self, private: bool) -> Self {
		self.private = private;
		self
	}
}

impl std::fmt::Display for RepoRef {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}/{}", self.owner, self.repo)
	}
}
