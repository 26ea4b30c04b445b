use super::Error;

/// Normalizes a changelog file. Rendering happens when the changelog is applied to a descriptor.
pub fn parse_changelog(raw: &str) -> Result<String, Error> {
	let text = raw.trim_start_matches('\u{feff}').replace("\r\n", "\n");
	let text = text.trim();
	if text.is_empty() {
		return Err(Error::EmptyChangelog);
	}
	Ok(text.to_owned())
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn normalizes_line_endings() {
		assert_eq!(parse_changelog("\u{feff}# 1.0\r\n* first\r\n\r\n").unwrap(), "# 1.0\n* first");
	}

	#[test]
	fn empty() {
		assert_eq!(parse_changelog(" \n\t"), Err(Error::EmptyChangelog));
	}
}
