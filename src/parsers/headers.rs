use super::Error;
use crate::descriptor::RepoKind;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
	// Closing comment markers and php close tags end a header value.
	static ref TRAILING_COMMENT: Regex = Regex::new(r"\s*(?:\*/|\?>).*").unwrap();
}

/// Headers read from the comment block of a plugin's main file or a theme's `style.css`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FileHeaders {
	pub name: String,
	pub version: String,
	pub uri: Option<String>,
	pub description: Option<String>,
	pub author: Option<String>,
	pub author_uri: Option<String>,
	pub text_domain: Option<String>,
	/// Minimum version of the host application.
	pub requires: Option<String>,
	pub requires_php: Option<String>,
	/// Where this repository is tracked on the server.
	pub provider_uri: Option<String>,
	pub branch: Option<String>,
	pub languages: Option<String>,
}

struct HeaderPatterns {
	name: (&'static str, Regex),
	version: Regex,
	uri: Regex,
	description: Regex,
	author: Regex,
	author_uri: Regex,
	text_domain: Regex,
	requires: Regex,
	requires_php: Regex,
	provider_uri: Regex,
	branch: Regex,
	languages: Regex,
}

fn header_pattern(label: &str) -> Regex {
	Regex::new(&format!(r"(?mi)^[ \t/*#@]*{}:(.*)$", regex::escape(label))).unwrap()
}

impl HeaderPatterns {
	fn new(kind: RepoKind) -> Self {
		let (name, uri, provider_uri) = match kind {
			RepoKind::Plugin => ("Plugin Name", "Plugin URI", "Bitbucket Plugin URI"),
			RepoKind::Theme => ("Theme Name", "Theme URI", "Bitbucket Theme URI"),
		};
		Self {
			name: (name, header_pattern(name)),
			version: header_pattern("Version"),
			uri: header_pattern(uri),
			description: header_pattern("Description"),
			author: header_pattern("Author"),
			author_uri: header_pattern("Author URI"),
			text_domain: header_pattern("Text Domain"),
			requires: header_pattern("Requires at least"),
			requires_php: header_pattern("Requires PHP"),
			provider_uri: header_pattern(provider_uri),
			branch: header_pattern("Bitbucket Branch"),
			languages: header_pattern("Languages"),
		}
	}
}

lazy_static! {
	static ref PLUGIN_HEADERS: HeaderPatterns = HeaderPatterns::new(RepoKind::Plugin);
	static ref THEME_HEADERS: HeaderPatterns = HeaderPatterns::new(RepoKind::Theme);
}

fn header_value(contents: &str, pattern: &Regex) -> Option<String> {
	let captures = pattern.captures(contents)?;
	let value = TRAILING_COMMENT.replace(&captures[1], "");
	let value = value.trim();
	(!value.is_empty()).then(|| value.to_owned())
}

/// Extracts the `Label: value` headers of a plugin or theme file.
/// A file without a name or version is not a plugin or theme.
pub fn parse_file_headers(contents: &str, kind: RepoKind) -> Result<FileHeaders, Error> {
	let patterns: &HeaderPatterns = match kind {
		RepoKind::Plugin => &*PLUGIN_HEADERS,
		RepoKind::Theme => &*THEME_HEADERS,
	};
	let header = |pattern: &Regex| header_value(contents, pattern);
	let (name_label, name_pattern) = &patterns.name;
	Ok(FileHeaders {
		name: header(name_pattern).ok_or(Error::MissingHeader(*name_label))?,
		version: header(&patterns.version).ok_or(Error::MissingHeader("Version"))?,
		uri: header(&patterns.uri),
		description: header(&patterns.description),
		author: header(&patterns.author),
		author_uri: header(&patterns.author_uri),
		text_domain: header(&patterns.text_domain),
		requires: header(&patterns.requires),
		requires_php: header(&patterns.requires_php),
		provider_uri: header(&patterns.provider_uri),
		branch: header(&patterns.branch),
		languages: header(&patterns.languages),
	})
}
