use crate::error::{Result, RewriteError};
use crate::model::Feed;
use crate::rules::UrlRewrite;
use serde::Deserialize;
use std::path::PathBuf;

/// Top-level configuration from a `.entry-rewrite.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// If true, stop directory cascade and jump directly to ~/.entry-rewrite.toml.
	#[serde(default)]
	pub root: bool,

	/// Embed URL prefix for YouTube players, e.g. "https://www.youtube-nocookie.com/embed/".
	#[serde(default)]
	pub youtube_embed_url_override: Option<String>,

	/// Invidious instance host used by `add_youtube_video_using_invidious_player`.
	#[serde(default)]
	pub invidious_instance: Option<String>,

	/// Per-feed rewrite settings.
	/// First matching feed wins.
	#[serde(default)]
	pub feeds: Vec<FeedRule>,
}

/// Rewrite settings for the entries whose URL matches `url_pattern`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FeedRule {
	/// Regex pattern matched against the entry URL. Matches everything when absent.
	pub url_pattern: Option<String>,

	/// Content rewrite rules, e.g. `add_image_title,remove(".ads")`.
	pub rewrite_rules: Option<String>,

	/// URL rewrite rule.
	/// Format: `rewrite("pattern"|"replacement")`.
	pub url_rewrite_rules: Option<String>,
}

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

/// Merged configuration from multiple config files in the cascade.
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
	/// All feed rules from all configs, in cascade order (first match wins).
	pub feeds: Vec<FeedRuleWithSource>,

	/// Embed URL prefix from the most specific config that sets it.
	pub youtube_embed_url_override: Option<String>,

	/// Invidious instance from the most specific config that sets it.
	pub invidious_instance: Option<String>,
}

/// A feed rule with its source config path for debugging/display.
#[derive(Debug, Clone)]
pub struct FeedRuleWithSource {
	/// The feed rule itself.
	pub rule: FeedRule,

	/// The config file this rule came from.
	pub source: PathBuf,
}

impl FeedRule {
	/// Validate the URL pattern and the URL rewrite rule.
	pub fn validate(&self) -> Result<()> {
		if let Some(ref pattern) = self.url_pattern {
			regex::Regex::new(pattern).map_err(|source| RewriteError::InvalidRegex {
				pattern: pattern.clone(),
				source,
			})?;
		}

		if let Some(ref rule) = self.url_rewrite_rules
			&& !rule.trim().is_empty()
		{
			UrlRewrite::parse(rule)?;
		}

		Ok(())
	}

	/// The feed settings this rule applies.
	pub fn feed(&self) -> Feed {
		Feed {
			rewrite_rules: self.rewrite_rules.clone().unwrap_or_default(),
			url_rewrite_rules: self.url_rewrite_rules.clone().unwrap_or_default(),
		}
	}
}

impl Config {
	/// Validate all feed rules in this config.
	pub fn validate(&self) -> Result<()> {
		for feed in &self.feeds {
			feed.validate()?;
		}
		Ok(())
	}
}
