//! Ghost bookmark cards and HTML tables flattened to plain markup.

use crate::transform::dom::{Document, parse_selector};
use ego_tree::NodeId;
use html_escape::{encode_double_quoted_attribute, encode_text};

const CARD_SELECTOR: &str = "figure.kg-card";

/// Table-structure elements unwrapped by [`remove_tables`], in order.
const TABLE_SELECTORS: &[&str] = &["table", "tbody", "thead", "td", "th", "td"];

fn card_link(doc: &Document, card: NodeId) -> Option<String> {
	let first_text = |selector: &str| {
		parse_selector(selector)
			.and_then(|selector| doc.select_within(card, &selector).into_iter().next())
			.map(|id| doc.text(id))
			.unwrap_or_default()
	};

	let title = first_text(".kg-bookmark-title");
	let author = first_text(".kg-bookmark-author");
	let href = parse_selector("a.kg-bookmark-container")
		.and_then(|selector| doc.select_within(card, &selector).into_iter().next())
		.and_then(|id| doc.attr(id, "href"))
		.unwrap_or_default();

	if href.is_empty() || title.is_empty() {
		return None;
	}

	let text = if author.is_empty() || title.ends_with(&author) {
		encode_text(&title).into_owned()
	} else {
		format!("{} - {}", encode_text(&title), encode_text(&author))
	};

	Some(format!(
		r#"<a href="{}">{}</a>"#,
		encode_double_quoted_attribute(href),
		text
	))
}

/// Replace Ghost bookmark cards with plain links. Runs of valid cards with
/// nothing but whitespace between them are collected into a single list.
pub fn fix_ghost_cards(content: String) -> String {
	let Some(cards) = parse_selector(CARD_SELECTOR) else {
		return content;
	};

	let mut doc = Document::parse(&content);
	let mut current_list: Option<NodeId> = None;

	for card in doc.select(&cards) {
		let Some(link) = card_link(&doc, card) else {
			current_list = None;
			continue;
		};

		let next_is_card = doc
			.next_content_sibling(card)
			.filter(|&next| doc.element(next).is_some_and(|next| cards.matches(&next)))
			.is_some_and(|next| card_link(&doc, next).is_some());

		if next_is_card && current_list.is_none() {
			current_list = doc.insert_html_before(card, "<ul></ul>").into_iter().next();
		}

		match current_list {
			Some(list) => {
				doc.append_html(list, &format!("<li>{link}</li>"));
				doc.remove(card);
			}
			None => doc.replace_with_html(card, &link),
		}

		if !next_is_card {
			current_list = None;
		}
	}

	doc.body_html().trim().to_string()
}

/// Unwrap every table element, keeping the cell contents as flow content.
pub fn remove_tables(content: String) -> String {
	let mut doc = Document::parse(&content);

	for selector in TABLE_SELECTORS.iter().filter_map(|selector| parse_selector(selector)) {
		while let Some(element) = doc.select_first(&selector) {
			let Some(parent) = doc.parent(element) else {
				break;
			};

			let inner = doc.inner_html(element);
			doc.append_html(parent, &inner);
			doc.remove(element);
		}
	}

	doc.body_html()
}
