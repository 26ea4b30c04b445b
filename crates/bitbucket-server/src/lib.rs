//! Client for the REST api of a self-hosted Bitbucket Server.
//!
//! Every request is built as an [`HttpRequest`], passed through the client's [`MiddlewareChain`]
//! and then dispatched over a [`Transport`], so hosts can decorate (authenticate) outgoing requests
//! and tests can script the server.

use futures_util::future::LocalBoxFuture;
use itertools::Itertools;
use serde::de::DeserializeOwned;
use std::rc::Rc;

mod error;
pub use error::*;
mod middleware;
pub use middleware::*;
mod repository;
pub use repository::*;
mod requests;
pub use requests::*;
mod transport;
pub use transport::*;

/// The branch used when a repository does not name one.
pub static DEFAULT_BRANCH: &str = "master";
pub(crate) static REST_API_PATH: &str = "rest/api";

#[derive(Clone)]
pub struct BitbucketServerClient {
	pub(crate) enterprise: String,
	pub(crate) api_root: String,
	pub(crate) transport: Rc<dyn Transport>,
	pub(crate) middleware: MiddlewareChain,
}

impl BitbucketServerClient {
	/// Creates a client which talks to `enterprise` over http.
	pub fn new(enterprise: &str, user_agent: &'static str) -> Result<Self, Error> {
		let transport = ReqwestTransport::new(user_agent)?;
		Self::with_transport(enterprise, Rc::new(transport))
	}

	pub fn with_transport(enterprise: &str, transport: Rc<dyn Transport>) -> Result<Self, Error> {
		let enterprise = url::Url::parse(enterprise)?;
		let enterprise = enterprise.as_str().trim_end_matches('/').to_owned();
		let api_root = format!("{enterprise}/{REST_API_PATH}");
		Ok(Self {
			enterprise,
			api_root,
			transport,
			middleware: MiddlewareChain::default(),
		})
	}

	/// Overrides the root of the rest api, which defaults to `{enterprise}/rest/api`.
	pub fn with_api_root(mut self, api_root: &str) -> Result<Self, Error> {
		let api_root = url::Url::parse(api_root)?;
		self.api_root = api_root.as_str().trim_end_matches('/').to_owned();
		Ok(self)
	}

	pub fn enterprise(&self) -> &str {
		&self.enterprise
	}

	pub fn api_root(&self) -> &str {
		&self.api_root
	}

	/// The host name of the enterprise server, used to decide which requests belong to it.
	pub fn enterprise_host(&self) -> Option<String> {
		let url = url::Url::parse(&self.enterprise).ok()?;
		url.host_str().map(str::to_owned)
	}

	pub fn middleware(&self) -> &MiddlewareChain {
		&self.middleware
	}

	pub fn middleware_mut(&mut self) -> &mut MiddlewareChain {
		&mut self.middleware
	}

	pub(crate) fn api_url(&self, repository: &RepoRef, suffix: &str) -> String {
		format!(
			"{}/1.0/projects/{}/repos/{}{suffix}",
			self.api_root, repository.owner, repository.repo
		)
	}

	/// Sends a GET for `url` through the middleware chain, failing on any non-success status.
	pub(crate) fn get(&self, url: &str, repository: &RepoRef) -> LocalBoxFuture<'static, Result<HttpResponse, Error>> {
		let request = match HttpRequest::get(url, Some(repository.clone())) {
			Ok(request) => request,
			Err(err) => return Box::pin(async move { Err(err) }),
		};
		let request = self.middleware.apply(request);
		log::debug!(target: "bitbucket-server", "GET {}", request.url);
		let response = self.transport.send(request);
		Box::pin(async move {
			let response = response.await?;
			response.error_for_status()
		})
	}

	pub(crate) fn get_json<T>(&self, url: &str, repository: &RepoRef) -> LocalBoxFuture<'static, Result<T, Error>>
	where
		T: DeserializeOwned + 'static,
	{
		let response = self.get(url, repository);
		Box::pin(async move {
			let body = response.await?.into_non_empty_body()?;
			Ok(serde_json::from_str::<T>(&body)?)
		})
	}
}

/// Percent-encodes each segment of a repository path, keeping the separators.
pub(crate) fn encode_path(path: &str) -> String {
	path.split('/').map(|segment| urlencoding::encode(segment)).join("/")
}
