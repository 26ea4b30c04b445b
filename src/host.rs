use crate::{descriptor::RepositoryDescriptor, parsers::version};
use std::cmp::Ordering;

/// Capabilities the fetcher borrows from the application hosting it.
pub trait Host {
	/// Whether the remote copy may be newer than the installed one.
	fn can_update(&self, repository: &RepositoryDescriptor) -> bool;

	/// Contents of a file of the installed copy, if it exists and is not empty.
	fn local_file(&self, repository: &RepositoryDescriptor, file: &str) -> Option<String>;

	fn has_local_file(&self, repository: &RepositoryDescriptor, file: &str) -> bool {
		self.local_file(repository, file).is_some()
	}
}

/// The in-flight request the fetcher runs on behalf of.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestContext {
	/// Set while installing a repository from the install form.
	pub install: Option<InstallRequest>,
	/// Slug of the repository an ajax update was posted for.
	pub ajax_update: Option<String>,
	/// Background keep-alive requests never carry credentials.
	pub heartbeat: bool,
	/// Ignore cached payloads and ask the server again.
	pub refresh_cache: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InstallRequest {
	/// The provider the form posted, such as `bitbucket`.
	pub provider: String,
	pub is_private: bool,
}

/// A host backed by the installed copy on the local file system.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalInstall;

impl Host for LocalInstall {
	fn can_update(&self, repository: &RepositoryDescriptor) -> bool {
		let Some(remote) = repository.remote_version.as_deref() else {
			return false;
		};
		version::compare(remote, &repository.local_version) == Ordering::Greater
	}

	fn local_file(&self, repository: &RepositoryDescriptor, file: &str) -> Option<String> {
		let path = repository.local_path.join(file);
		match std::fs::read_to_string(&path) {
			Ok(content) if !content.trim().is_empty() => Some(content),
			Ok(_) => None,
			Err(err) => {
				log::trace!(target: "updater", "No local {}: {err}", path.display());
				None
			}
		}
	}
}
