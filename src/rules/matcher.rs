use crate::config::types::{FeedRule, FeedRuleWithSource, MergedConfig};
use crate::error::{Result, RewriteError};
use crate::model::Feed;
use regex::Regex;

/// A compiled feed rule ready for matching.
#[derive(Debug)]
pub struct CompiledFeedRule {
	/// The original rule.
	pub rule: FeedRule,

	/// Compiled URL pattern regex.
	pub url_regex: Option<Regex>,

	/// Source config path (for debugging).
	pub source: std::path::PathBuf,
}

impl CompiledFeedRule {
	/// Compile a rule from a FeedRuleWithSource.
	pub fn from_rule_with_source(rws: &FeedRuleWithSource) -> Result<Self> {
		let url_regex = rws
			.rule
			.url_pattern
			.as_ref()
			.map(|p| compile_regex(p))
			.transpose()?;

		Ok(CompiledFeedRule {
			rule: rws.rule.clone(),
			url_regex,
			source: rws.source.clone(),
		})
	}

	/// Check if this rule applies to the given entry URL.
	pub fn matches(&self, entry_url: &str) -> bool {
		self.url_regex
			.as_ref()
			.is_none_or(|regex| regex.is_match(entry_url))
	}

	pub fn feed(&self) -> Feed {
		self.rule.feed()
	}
}

/// Compile a regex pattern string.
fn compile_regex(pattern: &str) -> Result<Regex> {
	Regex::new(pattern).map_err(|source| RewriteError::InvalidRegex {
		pattern: pattern.to_string(),
		source,
	})
}

/// Compile all feed rules in a merged config.
pub fn compile_feed_rules(config: &MergedConfig) -> Result<Vec<CompiledFeedRule>> {
	config
		.feeds
		.iter()
		.map(CompiledFeedRule::from_rule_with_source)
		.collect()
}

/// Find the first feed rule matching an entry URL.
pub fn find_feed_rule<'a>(
	rules: &'a [CompiledFeedRule],
	entry_url: &str,
) -> Option<&'a CompiledFeedRule> {
	rules.iter().find(|rule| rule.matches(entry_url))
}
