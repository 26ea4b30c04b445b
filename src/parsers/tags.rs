use super::version;
use bitbucket_server::repos::tags::TagPage;
use itertools::Itertools;

/// Tag names of a listing, newest first. `None` when the server has no tags to offer.
pub fn parse_tags(page: &TagPage) -> Option<Vec<String>> {
	if page.is_empty() {
		return None;
	}
	let mut tags = page.values.iter().map(|tag| tag.display_id.clone()).unique().collect::<Vec<_>>();
	version::sort_newest_first(&mut tags);
	Some(tags)
}
