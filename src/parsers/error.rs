#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
	#[error("Missing required header {0:?}")]
	MissingHeader(&'static str),
	#[error("Changelog is empty")]
	EmptyChangelog,
	#[error("Readme is malformed: {0}")]
	MalformedReadme(String),
}
