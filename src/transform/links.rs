//! Link rewrites: mailto subjects, Hacker News deep links and plain-text URLs.

use crate::rules::HackerNewsApp;
use crate::transform::dom::{Document, parse_selector};
use html_escape::{encode_double_quoted_attribute, encode_text};
use regex::Regex;
use std::sync::LazyLock;

const HACKER_NEWS_PREFIX: &str = "https://news.ycombinator.com/";

static TEXT_LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?mi)(\bhttps?://[-A-Z0-9+&@#/%?=~_|!:,.;]*[-A-Z0-9+&@#/%=~_|])").unwrap()
});

/// Append the subject of every `mailto:` link to its text.
pub fn add_mailto_subject(content: String) -> String {
	let Some(mailto) = parse_selector(r#"a[href^="mailto:"]"#) else {
		return content;
	};

	let mut doc = Document::parse(&content);
	let links = doc.select(&mailto);
	if links.is_empty() {
		return content;
	}

	for link in links {
		let subject = doc
			.attr(link, "href")
			.and_then(|href| url::Url::parse(href).ok())
			.and_then(|href| {
				href.query_pairs()
					.find(|(key, _)| key == "subject")
					.map(|(_, subject)| subject.into_owned())
			})
			.unwrap_or_default();

		if !subject.is_empty() {
			doc.append_html(link, &format!(" [{}]", encode_text(&subject)));
		}
	}

	doc.body_html()
}

fn hacker_news_link(href: &str, app: HackerNewsApp) -> Option<String> {
	let comments = url::Url::parse(href).ok()?;

	let link = match app {
		HackerNewsApp::Hack => {
			let target = comments.as_str().replacen(HACKER_NEWS_PREFIX, "hack://", 1);
			format!(
				r#"<a href="{}">Open with HACK</a>"#,
				encode_double_quoted_attribute(&target)
			)
		}
		HackerNewsApp::Opener => {
			let query = url::form_urlencoded::Serializer::new(String::new())
				.append_pair("url", comments.as_str())
				.finish();
			format!(
				r#"<a href="opener://x-callback-url/show-options?{}">Open with Opener</a>"#,
				encode_double_quoted_attribute(&query)
			)
		}
	};

	Some(link)
}

/// Add an "Open with" link for the given app next to every Hacker News link.
pub fn add_hacker_news_links(content: String, app: HackerNewsApp) -> String {
	let Some(selector) = parse_selector(&format!(r#"a[href^="{HACKER_NEWS_PREFIX}"]"#)) else {
		return content;
	};

	let mut doc = Document::parse(&content);
	let links = doc.select(&selector);
	if links.is_empty() {
		return content;
	}

	for link in links {
		let Some(open_with) = doc
			.attr(link, "href")
			.and_then(|href| hacker_news_link(href, app))
		else {
			continue;
		};

		if let Some(parent) = doc.parent(link) {
			doc.append_html(parent, &format!(" {open_with}"));
		}
	}

	doc.body_html()
}

/// Turn bare `http(s)://` URLs into anchors.
pub fn convert_text_links(content: String) -> String {
	TEXT_LINK_REGEX
		.replace_all(&content, r#"<a href="${1}">${1}</a>"#)
		.into_owned()
}

pub fn nl2br(content: String) -> String {
	content.replace('\n', "<br>")
}
