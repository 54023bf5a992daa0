//! Entry and feed data consumed by the rewrite engine.

use crate::error::{Result, RewriteError};
use serde::{Deserialize, Serialize};

/// A fetched feed item. Only the fields the engine reads or edits are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
	pub url: String,

	#[serde(default)]
	pub title: String,

	#[serde(default)]
	pub content: String,
}

impl Entry {
	pub fn new(url: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
		Entry {
			url: url.into(),
			title: title.into(),
			content: content.into(),
		}
	}

	/// Parse an entry from its JSON form: `{"url": .., "title": .., "content": ..}`.
	pub fn from_json(input: &str) -> Result<Self> {
		serde_json::from_str(input).map_err(|source| RewriteError::EntryParse { source })
	}
}

/// Per-feed rewrite settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
	/// Custom content rules. Replaces the predefined rules entirely when non-empty.
	#[serde(default)]
	pub rewrite_rules: String,

	/// URL rule in the form `rewrite("<regex>"|"<replacement>")`.
	#[serde(default)]
	pub url_rewrite_rules: String,
}
