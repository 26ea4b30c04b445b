//! Ordering of release versions and tag names such as `v1.2.10` or `2.0-beta1`.

use itertools::{EitherOrBoth, Itertools};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Token {
	// Declared first so that pre-release labels sort below numbers.
	Label(String),
	Number(u64),
}

fn tokens(version: &str) -> Vec<Token> {
	let version = version.trim().trim_start_matches(|c| c == 'v' || c == 'V');
	let mut tokens = Vec::new();
	for part in version.split(|c: char| !c.is_ascii_alphanumeric()).filter(|part| !part.is_empty()) {
		let groups = part.chars().group_by(|c| c.is_ascii_digit());
		for (numeric, group) in &groups {
			let text = group.collect::<String>();
			tokens.push(match numeric {
				true => text.parse::<u64>().map(Token::Number).unwrap_or(Token::Label(text)),
				false => Token::Label(text.to_lowercase()),
			});
		}
	}
	tokens
}

/// Compares two versions component by component.
/// A trailing number makes a version newer (`1.0.1 > 1.0`), a trailing label makes it older (`1.0-rc1 < 1.0`).
pub fn compare(a: &str, b: &str) -> Ordering {
	for pair in tokens(a).into_iter().zip_longest(tokens(b)) {
		let ordering = match pair {
			EitherOrBoth::Both(a, b) => a.cmp(&b),
			EitherOrBoth::Left(Token::Number(_)) => Ordering::Greater,
			EitherOrBoth::Left(Token::Label(_)) => Ordering::Less,
			EitherOrBoth::Right(Token::Number(_)) => Ordering::Less,
			EitherOrBoth::Right(Token::Label(_)) => Ordering::Greater,
		};
		if ordering != Ordering::Equal {
			return ordering;
		}
	}
	Ordering::Equal
}

/// Sorts versions newest first.
pub fn sort_newest_first(versions: &mut [String]) {
	versions.sort_by(|a, b| compare(b, a));
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn numeric_components() {
		assert_eq!(compare("1.10", "1.9"), Ordering::Greater);
		assert_eq!(compare("v2.0", "2.0"), Ordering::Equal);
		assert_eq!(compare("1.0.1", "1.0"), Ordering::Greater);
		assert_eq!(compare("", "0.1"), Ordering::Less);
	}

	#[test]
	fn pre_releases() {
		assert_eq!(compare("2.0-beta1", "2.0"), Ordering::Less);
		assert_eq!(compare("2.0-beta2", "2.0-beta1"), Ordering::Greater);
		assert_eq!(compare("2.0rc1", "2.0-beta3"), Ordering::Greater);
		assert_eq!(compare("2.0-RC1", "2.0.0"), Ordering::Less);
	}

	#[test]
	fn newest_first() {
		let mut tags = vec!["v1.9".to_owned(), "v1.10".into(), "v1.10-rc1".into(), "v0.3".into()];
		sort_newest_first(&mut tags);
		assert_eq!(tags, vec!["v1.10", "v1.10-rc1", "v1.9", "v0.3"]);
	}
}
