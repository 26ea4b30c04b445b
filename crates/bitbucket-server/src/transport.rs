use crate::{Error, ErrorBody, RepoRef};
use futures_util::future::LocalBoxFuture;
use reqwest::{header::HeaderMap, Method};

/// An outgoing request, before it is handed to a [`Transport`].
#[derive(Clone, Debug)]
pub struct HttpRequest {
	pub method: Method,
	pub url: url::Url,
	pub headers: HeaderMap,
	/// The repository this request was made for, if any.
	pub repository: Option<RepoRef>,
}

impl HttpRequest {
	pub fn get(url: &str, repository: Option<RepoRef>) -> Result<Self, Error> {
		Ok(Self {
			method: Method::GET,
			url: url::Url::parse(url)?,
			headers: HeaderMap::new(),
			repository,
		})
	}

	pub fn host(&self) -> Option<&str> {
		self.url.host_str()
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
	pub status: u16,
	pub body: String,
}

impl HttpResponse {
	pub fn new(status: u16, body: impl Into<String>) -> Self {
		Self {
			status,
			body: body.into(),
		}
	}

	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Converts a non-success response into an error, preferring the messages the server sent.
	pub fn error_for_status(self) -> Result<Self, Error> {
		if self.is_success() {
			return Ok(self);
		}
		if let Ok(body) = serde_json::from_str::<ErrorBody>(&self.body) {
			let messages = body.errors.into_iter().map(|error| error.message).collect::<Vec<_>>();
			return Err(Error::Api(messages.into()));
		}
		Err(Error::Status(self.status))
	}

	pub fn into_non_empty_body(self) -> Result<String, Error> {
		if self.body.trim().is_empty() {
			return Err(Error::EmptyBody);
		}
		Ok(self.body)
	}
}

/// Dispatches requests. Implementations must not alter the request; that is the job of middleware.
pub trait Transport {
	fn send(&self, request: HttpRequest) -> LocalBoxFuture<'static, Result<HttpResponse, Error>>;
}

pub struct ReqwestTransport {
	client: reqwest::Client,
}

impl ReqwestTransport {
	pub fn new(user_agent: &'static str) -> Result<Self, Error> {
		let client = reqwest::Client::builder().user_agent(user_agent).build()?;
		Ok(Self { client })
	}
}

impl Transport for ReqwestTransport {
	fn send(&self, request: HttpRequest) -> LocalBoxFuture<'static, Result<HttpResponse, Error>> {
		let builder = self.client.request(request.method, request.url).headers(request.headers);
		Box::pin(async move {
			let response = builder.send().await?;
			let status = response.status().as_u16();
			let body = response.text().await?;
			Ok(HttpResponse { status, body })
		})
	}
}

#[cfg(any(test, feature = "mock"))]
mod scripted {
	use super::*;
	use std::cell::RefCell;

	/// A transport which answers from a list of canned responses and records every request it sees.
	///
	/// A request is answered by the response whose url fragment is the longest one contained in the
	/// request url. Unmatched requests receive an empty 404.
	#[derive(Default)]
	pub struct ScriptedTransport {
		responses: RefCell<Vec<(String, Result<HttpResponse, Error>)>>,
		requests: RefCell<Vec<HttpRequest>>,
	}

	impl ScriptedTransport {
		pub fn respond(&self, url_fragment: &str, status: u16, body: &str) -> &Self {
			let response = Ok(HttpResponse::new(status, body));
			self.responses.borrow_mut().push((url_fragment.to_owned(), response));
			self
		}

		pub fn fail(&self, url_fragment: &str, error: Error) -> &Self {
			self.responses.borrow_mut().push((url_fragment.to_owned(), Err(error)));
			self
		}

		pub fn calls(&self) -> usize {
			self.requests.borrow().len()
		}

		pub fn requests(&self) -> Vec<HttpRequest> {
			self.requests.borrow().clone()
		}

		pub fn urls(&self) -> Vec<String> {
			self.requests.borrow().iter().map(|request| request.url.to_string()).collect()
		}
	}

	impl Transport for ScriptedTransport {
		fn send(&self, request: HttpRequest) -> LocalBoxFuture<'static, Result<HttpResponse, Error>> {
			let url = request.url.to_string();
			let response = {
				let responses = self.responses.borrow();
				let matched = responses
					.iter()
					.filter(|(fragment, _)| url.contains(fragment.as_str()))
					.max_by_key(|(fragment, _)| fragment.len());
				match matched {
					Some((_, response)) => response.clone(),
					None => Ok(HttpResponse::new(404, "")),
				}
			};
			self.requests.borrow_mut().push(request);
			Box::pin(futures_util::future::ready(response))
		}
	}
}
#[cfg(any(test, feature = "mock"))]
pub use scripted::*;
