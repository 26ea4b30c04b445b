//! Rendering of changelog and readme text into html for the host's update screens.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
	static ref HEADING: Regex = Regex::new(r"^(#{1,6})\s+(.*?)\s*#*$").unwrap();
	static ref README_HEADING: Regex = Regex::new(r"^=\s*([^=].*?)\s*=$").unwrap();
	static ref LIST_ITEM: Regex = Regex::new(r"^[*+-]\s+(.*)$").unwrap();
	static ref CODE: Regex = Regex::new(r"`([^`]+)`").unwrap();
	static ref STRONG: Regex = Regex::new(r"\*\*([^*]+)\*\*").unwrap();
	static ref EMPHASIS: Regex = Regex::new(r"\*([^*\s][^*]*)\*").unwrap();
	static ref LINK: Regex = Regex::new(r"\[([^\]]+)\]\(([^)\s]+)\)").unwrap();
}

pub trait MarkdownRenderer {
	fn render(&self, markdown: &str) -> String;
}

/// Renders headings, lists, paragraphs and inline emphasis, code and links.
/// Readme style `= 1.0 =` lines render as headings too.
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicMarkdown;

enum Block {
	None,
	Paragraph(Vec<String>),
	List(Vec<String>),
}

fn escape(text: &str) -> String {
	text.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
		.replace('"', "&quot;")
		.replace('\'', "&#39;")
}

/// Only web and relative targets may become links; anything naming another scheme is dropped.
fn is_safe_target(target: &str) -> bool {
	if target.contains('<') {
		return false;
	}
	let lower = target.to_ascii_lowercase();
	if lower.starts_with("http://") || lower.starts_with("https://") {
		return true;
	}
	let scheme_end = target.find(&['/', '?', '#'][..]).unwrap_or(target.len());
	!target[..scheme_end].contains(':')
}

fn inline(text: &str) -> String {
	let text = escape(text.trim());
	let text = CODE.replace_all(&text, "<code>$1</code>");
	let text = LINK.replace_all(&text, |captures: &regex::Captures| match is_safe_target(&captures[2]) {
		true => format!(r#"<a href="{}">{}</a>"#, &captures[2], &captures[1]),
		false => captures[1].to_owned(),
	});
	let text = STRONG.replace_all(&text, "<strong>$1</strong>");
	EMPHASIS.replace_all(&text, "<em>$1</em>").into_owned()
}

fn close(block: Block, html: &mut Vec<String>) {
	match block {
		Block::None => {}
		Block::Paragraph(lines) => html.push(format!("<p>{}</p>", lines.join(" "))),
		Block::List(items) => {
			let items = items.into_iter().map(|item| format!("<li>{item}</li>")).collect::<String>();
			html.push(format!("<ul>{items}</ul>"));
		}
	}
}

impl MarkdownRenderer for BasicMarkdown {
	fn render(&self, markdown: &str) -> String {
		let mut html = Vec::new();
		let mut block = Block::None;
		for line in markdown.lines() {
			let line = line.trim_end();
			let trimmed = line.trim_start();
			if trimmed.is_empty() {
				close(std::mem::replace(&mut block, Block::None), &mut html);
				continue;
			}
			if let Some(captures) = HEADING.captures(trimmed) {
				close(std::mem::replace(&mut block, Block::None), &mut html);
				let level = captures[1].len();
				html.push(format!("<h{level}>{}</h{level}>", inline(&captures[2])));
				continue;
			}
			if let Some(captures) = README_HEADING.captures(trimmed) {
				close(std::mem::replace(&mut block, Block::None), &mut html);
				html.push(format!("<h4>{}</h4>", inline(&captures[1])));
				continue;
			}
			if let Some(captures) = LIST_ITEM.captures(trimmed) {
				let item = inline(&captures[1]);
				match &mut block {
					Block::List(items) => items.push(item),
					_ => {
						close(std::mem::replace(&mut block, Block::List(vec![item])), &mut html);
					}
				}
				continue;
			}
			match &mut block {
				Block::Paragraph(lines) => lines.push(inline(trimmed)),
				Block::List(items) if line.starts_with(char::is_whitespace) => {
					// continuation of the previous list item
					if let Some(last) = items.last_mut() {
						last.push(' ');
						last.push_str(&inline(trimmed));
					}
				}
				_ => {
					close(std::mem::replace(&mut block, Block::Paragraph(vec![inline(trimmed)])), &mut html);
				}
			}
		}
		close(block, &mut html);
		html.join("\n")
	}
}
