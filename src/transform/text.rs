//! Regex replacements, element removal and text-node rewrites.

use crate::transform::dom::{Document, parse_selector};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use pulldown_cmark::{Options, Parser, html};
use regex::Regex;
use std::collections::HashSet;

/// Replace every match of `search` with `replacement` (`$1` style groups).
/// An invalid pattern leaves the value untouched.
pub fn replace_custom(value: String, search: &str, replacement: &str) -> String {
	match Regex::new(search) {
		Ok(regex) => regex.replace_all(&value, replacement).into_owned(),
		Err(err) => {
			tracing::debug!(pattern = search, error = %err, "Invalid replace pattern");
			value
		}
	}
}

/// Remove every element matching `selector`.
pub fn remove_custom(content: String, selector: &str) -> String {
	let Some(selector) = parse_selector(selector) else {
		return content;
	};

	let mut doc = Document::parse(&content);
	for id in doc.select(&selector) {
		doc.remove(id);
	}

	doc.body_html()
}

/// Line breaks inside the encoded text are ignored, so wrapped base64 decodes.
fn decode_base64_text(text: &str) -> Option<String> {
	let encoded: String = text
		.trim()
		.chars()
		.filter(|&c| c != '\r' && c != '\n')
		.collect();
	let bytes = STANDARD.decode(encoded).ok()?;
	String::from_utf8(bytes).ok()
}

/// Decode base64 text nodes found under the elements matching `selector`.
/// Text that is not valid base64 is kept as is.
pub fn base64_decode(content: String, selector: &str) -> String {
	let Some(selector) = parse_selector(selector) else {
		return content;
	};

	let mut doc = Document::parse(&content);
	let mut seen = HashSet::new();

	for element in doc.select(&selector) {
		for text in doc.descendant_texts(element) {
			if !seen.insert(text) {
				continue;
			}

			let decoded = doc.text_content(text).and_then(decode_base64_text);
			if let Some(decoded) = decoded {
				doc.set_text(text, &decoded);
			}
		}
	}

	doc.body_html()
}

/// Render CommonMark content to HTML. Raw HTML in the source is passed through.
pub fn parse_markdown(content: &str) -> String {
	let parser = Parser::new_ext(content, Options::empty());
	let mut output = String::with_capacity(content.len() * 3 / 2);
	html::push_html(&mut output, parser);
	output
}

/// Lowercase the value, then capitalize the first letter of every word.
pub fn titlelize(value: &str) -> String {
	let mut previous = ' ';
	value
		.to_lowercase()
		.chars()
		.flat_map(|current| {
			let capitalize = previous.is_whitespace();
			previous = current;
			if capitalize {
				current.to_uppercase().collect::<Vec<_>>()
			} else {
				vec![current]
			}
		})
		.collect()
}
