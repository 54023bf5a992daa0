use crate::error::{Result, RewriteError};
use crate::model::{Entry, Feed};
use regex::Regex;
use std::sync::LazyLock;

static URL_REWRITE_RULE_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r#"^rewrite\("([^"]+)"\|"([^"]+)"\)$"#).unwrap());

/// Parsed URL rewrite rule: `rewrite("<regex>"|"<replacement>")`.
#[derive(Debug)]
pub struct UrlRewrite {
	/// The pattern to match against the entry URL.
	pub pattern: Regex,

	/// The replacement string, with `$1` style group references.
	pub replacement: String,
}

impl UrlRewrite {
	/// Parse a rule. Surrounding whitespace is ignored; the quoted parts are
	/// taken verbatim, without unescaping.
	pub fn parse(input: &str) -> Result<Self> {
		let rule = input.trim();

		let Some(captures) = URL_REWRITE_RULE_REGEX.captures(rule) else {
			return Err(RewriteError::InvalidUrlRewrite {
				rule: rule.to_string(),
			});
		};

		let pattern_str = &captures[1];
		let replacement = captures[2].to_string();

		let pattern = Regex::new(pattern_str).map_err(|source| RewriteError::InvalidRegex {
			pattern: pattern_str.to_string(),
			source,
		})?;

		Ok(UrlRewrite {
			pattern,
			replacement,
		})
	}

	/// Apply this rule to a URL, substituting every non-overlapping match.
	pub fn apply(&self, url: &str) -> String {
		self.pattern.replace_all(url, &self.replacement).into_owned()
	}
}

/// The entry URL after the feed's URL rewrite rule, or the URL unchanged
/// when the feed has no usable rule.
pub fn rewrite_entry_url(feed: &Feed, entry: &Entry) -> String {
	let rule = feed.url_rewrite_rules.trim();
	if rule.is_empty() {
		return entry.url.clone();
	}

	match UrlRewrite::parse(rule) {
		Ok(rewrite) => {
			let rewritten = rewrite.apply(&entry.url);
			tracing::debug!(
				original_url = %entry.url,
				rewritten_url = %rewritten,
				rule,
				"Rewriting entry URL"
			);
			rewritten
		}
		Err(err) => {
			tracing::debug!(rule, error = %err, "Cannot apply URL rewrite rule");
			entry.url.clone()
		}
	}
}
