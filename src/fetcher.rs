//! The staleness-aware fetch pipeline shared by every resource kind:
//! cache lookup, optional local fallback, one request, parse, cache, validate, then project onto the descriptor.

use crate::{
	auth::{AuthenticationInjector, ReleaseAssetAuth, AUTHENTICATE_PRIORITY, RELEASE_ASSET_PRIORITY},
	cache::{Cache, CacheKey},
	config::Config,
	descriptor::RepositoryDescriptor,
	host::{Host, RequestContext},
	markdown::{BasicMarkdown, MarkdownRenderer},
	parsers,
	payload::{FetchResult, Payload, ResourceKind},
};
use bitbucket_server::{BitbucketServerClient, HttpRequest, RequestMiddleware};
use std::rc::Rc;

mod branches;
mod changes;
mod download;
mod language_pack;
mod metadata;
mod readme;
mod remote_info;
mod tags;

pub static README_FILE: &str = "readme.txt";
pub static CHANGELOG_FILE: &str = "CHANGES.md";

/// Fetches the remote resources of repositories on one enterprise server.
pub struct RemoteResourceFetcher {
	client: BitbucketServerClient,
	cache: Rc<dyn Cache>,
	host: Rc<dyn Host>,
	config: Rc<Config>,
	context: RequestContext,
	markdown: Rc<dyn MarkdownRenderer>,
	/// The middleware this fetcher installed on its client.
	layers: Vec<Rc<dyn RequestMiddleware>>,
}

impl RemoteResourceFetcher {
	/// Wraps `client`, installing the authentication middleware on it.
	pub fn new(
		mut client: BitbucketServerClient,
		cache: Rc<dyn Cache>,
		host: Rc<dyn Host>,
		config: Rc<Config>,
		context: RequestContext,
	) -> Self {
		let injector: Rc<dyn RequestMiddleware> = Rc::new(AuthenticationInjector::new(
			config.clone(),
			context.clone(),
			client.enterprise_host(),
		));
		let assets: Rc<dyn RequestMiddleware> = Rc::new(ReleaseAssetAuth);
		client.middleware_mut().add(AUTHENTICATE_PRIORITY, injector.clone());
		client.middleware_mut().add(RELEASE_ASSET_PRIORITY, assets.clone());
		Self {
			client,
			cache,
			host,
			config,
			context,
			markdown: Rc::new(BasicMarkdown),
			layers: vec![injector, assets],
		}
	}

	pub fn with_markdown(mut self, markdown: Rc<dyn MarkdownRenderer>) -> Self {
		self.markdown = markdown;
		self
	}

	pub fn client(&self) -> &BitbucketServerClient {
		&self.client
	}

	/// Uninstalls the middleware added by [`RemoteResourceFetcher::new`].
	pub fn remove_hooks(&mut self) {
		for layer in self.layers.drain(..) {
			self.client.middleware_mut().remove(&layer);
		}
	}

	/// Builds a request for a url the host downloads itself (archives, packages),
	/// decorated the same way as the fetcher's own requests.
	pub fn download_request(
		&self,
		repository: &RepositoryDescriptor,
		url: &str,
	) -> Result<HttpRequest, bitbucket_server::Error> {
		let request = HttpRequest::get(url, Some(repository.repo_ref()))?;
		Ok(self.client.middleware().apply(request))
	}

	/// Fetches any kind of resource and applies it to `repository`.
	pub async fn fetch(&self, kind: &ResourceKind, repository: &mut RepositoryDescriptor) -> FetchResult {
		let result = match kind {
			ResourceKind::File(file) => self.get_remote_info(repository, file).await,
			ResourceKind::Tags => self.get_remote_tag(repository).await,
			ResourceKind::Changelog(file) => self.get_remote_changes(repository, file).await,
			ResourceKind::Readme => self.get_remote_readme(repository).await,
			ResourceKind::Meta => self.get_repo_meta(repository).await,
			ResourceKind::Branches => self.get_remote_branches(repository).await,
			ResourceKind::LanguagePacks => {
				let source = repository.languages.as_deref().and_then(parsers::parse_language_source);
				match source {
					Some(source) => self.get_language_pack(repository, &source).await,
					None => FetchResult::NotFound(kind.not_found_message()),
				}
			}
		};
		log::debug!(target: "updater", "{} {kind}: {result}", repository.slug);
		result
	}

	fn cached(&self, repository: &RepositoryDescriptor, kind: &ResourceKind) -> Option<Payload> {
		if self.context.refresh_cache {
			return None;
		}
		let payload = self.cache.get(&CacheKey::new(&repository.slug, kind))?;
		log::trace!(target: "updater", "{} {kind}: cache hit", repository.slug);
		Some(payload)
	}

	fn store(&self, repository: &RepositoryDescriptor, kind: &ResourceKind, payload: &Payload) {
		let key = CacheKey::new(&repository.slug, kind);
		self.cache.set(key, payload.clone(), self.config.ttl());
	}

	/// True when the host reports the installed copy is current, so the network can be spared.
	fn no_update(&self, repository: &RepositoryDescriptor) -> bool {
		!self.context.refresh_cache && !self.host.can_update(repository)
	}

	/// The installed copy of `file`, read instead of the remote one when no update is available.
	fn local_fallback(&self, repository: &RepositoryDescriptor, file: &str) -> Option<String> {
		if !self.no_update(repository) {
			return None;
		}
		let content = self.host.local_file(repository, file)?;
		log::debug!(target: "updater", "{}: no update available, using installed {file}", repository.slug);
		Some(content)
	}

	/// Caches a sentinel in place of the resource a request failed to retrieve,
	/// so one missing resource neither aborts the others nor is requested again before the ttl runs out.
	/// A body which cannot be decoded is a parse failure, and is not cached.
	fn degrade(
		&self,
		repository: &RepositoryDescriptor,
		kind: &ResourceKind,
		error: bitbucket_server::Error,
	) -> FetchResult {
		log::warn!(target: "updater", "{} {kind}: {error}", repository.slug);
		if error.is_malformed_body() {
			return FetchResult::ValidationError(error.to_string());
		}
		let message = kind.not_found_message();
		self.store(repository, kind, &Payload::NotFound(message.clone()));
		match error.is_missing_resource() {
			true => FetchResult::NotFound(message),
			false => FetchResult::TransportError(error),
		}
	}

	/// The result for a payload the kind being fetched cannot use.
	fn reject(kind: &ResourceKind, payload: Payload) -> FetchResult {
		match payload {
			Payload::NotFound(message) => FetchResult::NotFound(message),
			other => FetchResult::ValidationError(format!("expected a {kind} payload, found {}", other.name())),
		}
	}
}
