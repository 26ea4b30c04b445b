use super::Error;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

lazy_static! {
	static ref TITLE: Regex = Regex::new(r"^===\s*(.+?)\s*===$").unwrap();
	static ref SECTION: Regex = Regex::new(r"^==\s*([^=].*?)\s*==$").unwrap();
	static ref SUBSECTION: Regex = Regex::new(r"^=\s*([^=].*?)\s*=$").unwrap();
	static ref FIELD: Regex = Regex::new(r"^([A-Za-z][A-Za-z ]*?)\s*:\s*(.*)$").unwrap();
}

/// The contents of a `readme.txt` in the plugin directory format.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadmeInfo {
	pub name: Option<String>,
	pub contributors: Vec<String>,
	pub donate_link: Option<String>,
	pub tags: Vec<String>,
	pub requires: Option<String>,
	pub tested: Option<String>,
	pub requires_php: Option<String>,
	pub stable_tag: Option<String>,
	pub license: Option<String>,
	pub license_uri: Option<String>,
	pub short_description: Option<String>,
	/// Section bodies keyed by normalized section name, such as `description` or `faq`.
	pub sections: BTreeMap<String, String>,
	/// Notices keyed by the version they apply to.
	pub upgrade_notice: BTreeMap<String, String>,
}

fn section_key(title: &str) -> String {
	let key = title.trim().to_lowercase().split_whitespace().collect::<Vec<_>>().join("_");
	match key.as_str() {
		"frequently_asked_questions" => "faq".to_owned(),
		_ => key,
	}
}

fn list(value: &str) -> Vec<String> {
	value
		.split(',')
		.map(str::trim)
		.filter(|item| !item.is_empty())
		.map(str::to_owned)
		.collect()
}

fn text(value: &str) -> Option<String> {
	let value = value.trim();
	(!value.is_empty()).then(|| value.to_owned())
}

/// Splits a section like `Upgrade Notice` into its `= version =` blocks.
fn subsections(body: &str) -> BTreeMap<String, String> {
	let mut blocks = BTreeMap::new();
	let mut current: Option<(String, Vec<&str>)> = None;
	for line in body.lines() {
		if let Some(captures) = SUBSECTION.captures(line.trim()) {
			if let Some((title, lines)) = current.take() {
				blocks.insert(title, lines.join("\n").trim().to_owned());
			}
			current = Some((captures[1].to_owned(), Vec::new()));
			continue;
		}
		if let Some((_, lines)) = &mut current {
			lines.push(line);
		}
	}
	if let Some((title, lines)) = current {
		blocks.insert(title, lines.join("\n").trim().to_owned());
	}
	blocks
}

pub fn parse_readme(raw: &str) -> Result<ReadmeInfo, Error> {
	let content = raw.trim_start_matches('\u{feff}').replace("\r\n", "\n");
	let mut readme = ReadmeInfo::default();
	let mut lines = content.lines().peekable();

	while let Some(&line) = lines.peek() {
		if !line.trim().is_empty() {
			break;
		}
		lines.next();
	}
	if let Some(&line) = lines.peek() {
		if let Some(captures) = TITLE.captures(line.trim()) {
			readme.name = Some(captures[1].to_owned());
			lines.next();
		}
	}

	// Header fields run until the first blank line or section.
	while let Some(&line) = lines.peek() {
		let line = line.trim();
		if line.is_empty() || SECTION.is_match(line) {
			break;
		}
		lines.next();
		let Some(captures) = FIELD.captures(line) else {
			continue;
		};
		let value = &captures[2];
		match captures[1].to_lowercase().as_str() {
			"contributors" => readme.contributors = list(value),
			"donate link" => readme.donate_link = text(value),
			"tags" => readme.tags = list(value),
			"requires at least" => readme.requires = text(value),
			"tested up to" => readme.tested = text(value),
			"requires php" => readme.requires_php = text(value),
			"stable tag" => readme.stable_tag = text(value),
			"license" => readme.license = text(value),
			"license uri" => readme.license_uri = text(value),
			_ => {}
		}
	}

	let mut short_description = Vec::new();
	let mut section: Option<(String, Vec<&str>)> = None;
	for line in lines {
		if let Some(captures) = SECTION.captures(line.trim()) {
			if let Some((key, body)) = section.take() {
				readme.sections.insert(key, body.join("\n").trim().to_owned());
			}
			section = Some((section_key(&captures[1]), Vec::new()));
			continue;
		}
		match &mut section {
			Some((_, body)) => body.push(line),
			None if !line.trim().is_empty() => short_description.push(line.trim()),
			None => {}
		}
	}
	if let Some((key, body)) = section {
		readme.sections.insert(key, body.join("\n").trim().to_owned());
	}
	readme.short_description = text(&short_description.join(" "));

	if let Some(notices) = readme.sections.remove("upgrade_notice") {
		readme.upgrade_notice = subsections(&notices);
	}

	if readme.name.is_none() && readme.sections.is_empty() {
		return Err(Error::MalformedReadme("no title and no sections".into()));
	}
	Ok(readme)
}

#[cfg(test)]
mod test {
	use super::*;
	use trim_margin::MarginTrimmable;

	fn sample() -> String {
		"
		|=== Widget ===
		|Contributors: acme, wile
		|Donate link: https://example.com/donate
		|Tags: widgets, blocks
		|Requires at least: 5.2
		|Tested up to: 6.4
		|Requires PHP: 7.4
		|Stable tag: 1.4.2
		|License: GPLv2 or later
		|
		|Adds widgets to
		|everything.
		|
		|== Description ==
		|Widgets, everywhere.
		|
		|== Frequently Asked Questions ==
		|= Does it work? =
		|Yes.
		|
		|== Changelog ==
		|= 1.4.2 =
		|* Fixed things.
		|
		|== Upgrade Notice ==
		|= 1.4.2 =
		|Upgrade now.
		|= 1.4.0 =
		|Requires PHP 7.4.
		|"
		.trim_margin()
		.unwrap()
	}

	#[test]
	fn fields() {
		let readme = parse_readme(&sample()).unwrap();
		assert_eq!(readme.name.as_deref(), Some("Widget"));
		assert_eq!(readme.contributors, vec!["acme", "wile"]);
		assert_eq!(readme.tags, vec!["widgets", "blocks"]);
		assert_eq!(readme.donate_link.as_deref(), Some("https://example.com/donate"));
		assert_eq!(readme.requires.as_deref(), Some("5.2"));
		assert_eq!(readme.tested.as_deref(), Some("6.4"));
		assert_eq!(readme.requires_php.as_deref(), Some("7.4"));
		assert_eq!(readme.stable_tag.as_deref(), Some("1.4.2"));
		assert_eq!(readme.license.as_deref(), Some("GPLv2 or later"));
		assert_eq!(readme.short_description.as_deref(), Some("Adds widgets to everything."));
	}

	#[test]
	fn sections() {
		let readme = parse_readme(&sample()).unwrap();
		assert_eq!(
			readme.sections.keys().collect::<Vec<_>>(),
			vec!["changelog", "description", "faq"]
		);
		assert_eq!(readme.sections["description"], "Widgets, everywhere.");
		assert_eq!(readme.sections["changelog"], "= 1.4.2 =\n* Fixed things.");
		assert_eq!(readme.upgrade_notice["1.4.2"], "Upgrade now.");
		assert_eq!(readme.upgrade_notice["1.4.0"], "Requires PHP 7.4.");
	}

	#[test]
	fn windows_line_endings() {
		let readme = parse_readme("=== Widget ===\r\nStable tag: 2.0\r\n\r\n== Description ==\r\nHi\r\n").unwrap();
		assert_eq!(readme.stable_tag.as_deref(), Some("2.0"));
		assert_eq!(readme.sections["description"], "Hi");
	}

	#[test]
	fn not_a_readme() {
		assert!(matches!(parse_readme("just some text"), Err(Error::MalformedReadme(_))));
	}
}
