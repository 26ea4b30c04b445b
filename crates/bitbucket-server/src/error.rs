use serde::Deserialize;
use std::sync::Arc;

#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
	#[error(transparent)]
	Request(Arc<reqwest::Error>),
	#[error(transparent)]
	Deserialization(Arc<serde_json::Error>),
	#[error(transparent)]
	Url(#[from] url::ParseError),
	#[error("Server responded with status {0}")]
	Status(u16),
	#[error("Server responded with errors: {}", .0.join("; "))]
	Api(Arc<Vec<String>>),
	#[error("Server responded with an empty body")]
	EmptyBody,
}

impl Error {
	/// True when the server answered, but the answer did not contain the requested resource.
	pub fn is_missing_resource(&self) -> bool {
		matches!(self, Self::Status(_) | Self::Api(_) | Self::EmptyBody)
	}

	/// True when the server answered successfully with a body of an unexpected shape,
	/// such as a login page served in place of the api.
	pub fn is_malformed_body(&self) -> bool {
		matches!(self, Self::Deserialization(_))
	}
}

impl From<reqwest::Error> for Error {
	fn from(value: reqwest::Error) -> Self {
		Self::Request(Arc::new(value))
	}
}

impl From<serde_json::Error> for Error {
	fn from(value: serde_json::Error) -> Self {
		Self::Deserialization(Arc::new(value))
	}
}

/// A single entry of the `errors` list the server returns alongside failed requests.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ApiMessage {
	#[serde(default)]
	pub context: Option<String>,
	pub message: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ErrorBody {
	pub errors: Vec<ApiMessage>,
}
