//! Request middleware which decides what credentials leave the process.

use crate::{config::Config, host::RequestContext};
use bitbucket_server::{HttpRequest, RequestMiddleware};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use std::rc::Rc;

/// Hosts the provider's release assets on object storage which signs its own urls.
pub static ASSET_STORAGE_HOST: &str = "bbuseruploads.s3.amazonaws.com";
/// The provider id install requests post for this provider.
pub static PROVIDER_ID: &str = "bitbucket";

pub static AUTHENTICATE_PRIORITY: i32 = 5;
pub static RELEASE_ASSET_PRIORITY: i32 = 15;

/// Attaches basic credentials to requests for private repositories on the enterprise server.
pub struct AuthenticationInjector {
	config: Rc<Config>,
	context: RequestContext,
	enterprise_host: Option<String>,
}

impl AuthenticationInjector {
	pub fn new(config: Rc<Config>, context: RequestContext, enterprise_host: Option<String>) -> Self {
		Self {
			config,
			context,
			enterprise_host,
		}
	}

	fn targets_provider(&self, request: &HttpRequest) -> bool {
		let Some(host) = request.host() else {
			return false;
		};
		let host = host.to_lowercase();
		match &self.enterprise_host {
			Some(enterprise) if host == enterprise.to_lowercase() => true,
			_ => host.contains(PROVIDER_ID),
		}
	}

	fn is_private_repository(&self, request: &HttpRequest) -> bool {
		let Some(repository) = &request.repository else {
			return false;
		};
		repository.private
			|| (self.config.is_private(&repository.repo) && request.url.as_str().contains(repository.repo.as_str()))
	}

	fn is_private_install(&self) -> bool {
		let Some(install) = &self.context.install else {
			return false;
		};
		install.is_private && install.provider == PROVIDER_ID && !self.config.credentials.is_empty()
	}

	fn is_private_ajax_update(&self, request: &HttpRequest) -> bool {
		if self.context.heartbeat {
			return false;
		}
		let Some(slug) = &self.context.ajax_update else {
			return false;
		};
		self.config.is_private(slug) && request.url.as_str().to_lowercase().contains(&slug.to_lowercase())
	}
}

impl RequestMiddleware for AuthenticationInjector {
	fn apply(&self, request: &mut HttpRequest) {
		if !self.targets_provider(request) {
			return;
		}
		let private = self.is_private_repository(request);
		if !(private || self.is_private_install() || self.is_private_ajax_update(request)) {
			return;
		}
		match HeaderValue::from_str(&self.config.credentials.basic_authorization()) {
			Ok(value) => {
				request.headers.insert(AUTHORIZATION, value);
			}
			Err(err) => log::warn!(target: "updater", "Credentials cannot be sent as a header: {err}"),
		}
	}
}

/// Removes basic credentials from requests to the asset storage host, which rejects them.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReleaseAssetAuth;

impl RequestMiddleware for ReleaseAssetAuth {
	fn apply(&self, request: &mut HttpRequest) {
		let Some(host) = request.host().map(str::to_owned) else {
			return;
		};
		if host.eq_ignore_ascii_case(ASSET_STORAGE_HOST) && request.headers.remove(AUTHORIZATION).is_some() {
			log::debug!(target: "updater", "Dropped credentials for {host}");
		}
	}
}
