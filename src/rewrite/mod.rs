//! Rewrite orchestration.
//!
//! This module handles:
//! - Choosing the rule source (custom rules beat the predefined site rules)
//! - Applying decoded rules to an entry in order
//! - Options shared by the video rules

use crate::model::Entry;
use crate::rules::{Rule, compile_rules, predefined_rules_for};
use crate::transform::{cards, images, links, text, video};

pub const DEFAULT_EMBED_URL_TEMPLATE: &str = "https://www.youtube-nocookie.com/embed/";
pub const DEFAULT_INVIDIOUS_INSTANCE: &str = "yewtu.be";

pub const EMBED_URL_ENV_VAR: &str = "YOUTUBE_EMBED_URL_OVERRIDE";
pub const INVIDIOUS_INSTANCE_ENV_VAR: &str = "INVIDIOUS_INSTANCE";

/// Settings read by the video rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOptions {
	embed_url_template: String,
	alternate_video_frontend_host: String,
}

impl Default for RewriteOptions {
	fn default() -> Self {
		RewriteOptions {
			embed_url_template: DEFAULT_EMBED_URL_TEMPLATE.to_string(),
			alternate_video_frontend_host: DEFAULT_INVIDIOUS_INSTANCE.to_string(),
		}
	}
}

impl RewriteOptions {
	pub fn with_embed_url_template(mut self, template: impl Into<String>) -> Self {
		self.embed_url_template = template.into();
		self
	}

	pub fn with_alternate_video_frontend_host(mut self, host: impl Into<String>) -> Self {
		self.alternate_video_frontend_host = host.into();
		self
	}

	/// Apply `YOUTUBE_EMBED_URL_OVERRIDE` and `INVIDIOUS_INSTANCE` when set
	/// to a non-empty value.
	pub fn with_env_overrides(self) -> Self {
		let options = match env_value(EMBED_URL_ENV_VAR) {
			Some(template) => self.with_embed_url_template(template),
			None => self,
		};
		match env_value(INVIDIOUS_INSTANCE_ENV_VAR) {
			Some(host) => options.with_alternate_video_frontend_host(host),
			None => options,
		}
	}

	/// Prefix the video id is appended to, e.g. `https://www.youtube-nocookie.com/embed/`.
	pub fn embed_url_template(&self) -> &str {
		&self.embed_url_template
	}

	/// Invidious instance host used by `add_youtube_video_using_invidious_player`.
	pub fn alternate_video_frontend_host(&self) -> &str {
		&self.alternate_video_frontend_host
	}
}

fn env_value(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|value| !value.is_empty())
}

/// Rules that would run for an entry: the custom rules when non-empty,
/// otherwise the predefined rules for the entry's site, then the PDF link rule.
pub fn rules_for_entry(entry_url: &str, custom_rule_text: &str) -> Vec<Rule> {
	let rule_text = if custom_rule_text.is_empty() {
		predefined_rules_for(entry_url)
	} else {
		custom_rule_text
	};

	let mut rules = compile_rules(rule_text);
	rules.push(Rule::AddPdfDownloadLink);
	rules
}

/// Rewrite an entry's title and content with the custom or predefined rules.
pub fn rewrite(entry_url: &str, entry: &mut Entry, custom_rule_text: &str, options: &RewriteOptions) {
	let rules = rules_for_entry(entry_url, custom_rule_text);

	tracing::debug!(
		entry_url,
		rules = ?rules.iter().map(ToString::to_string).collect::<Vec<_>>(),
		"Rewrite rules applied"
	);

	apply_rules(&rules, entry_url, entry, options);
}

/// Apply an explicit rule string to an entry, without the predefined lookup
/// and without the PDF link rule.
pub fn apply_content_rewrite_rules(entry: &mut Entry, rule_text: &str, options: &RewriteOptions) {
	let rules = compile_rules(rule_text);
	let entry_url = entry.url.clone();

	tracing::debug!(
		entry_url = %entry_url,
		rules = ?rules.iter().map(ToString::to_string).collect::<Vec<_>>(),
		"Content rewrite rules applied"
	);

	apply_rules(&rules, &entry_url, entry, options);
}

fn apply_rules(rules: &[Rule], entry_url: &str, entry: &mut Entry, options: &RewriteOptions) {
	let fields = (std::mem::take(&mut entry.title), std::mem::take(&mut entry.content));

	let (title, content) = rules.iter().fold(fields, |(title, content), rule| {
		apply_rule(rule, entry_url, title, content, options)
	});

	entry.title = title;
	entry.content = content;
}

/// Apply one rule, returning the new `(title, content)`.
pub fn apply_rule(
	rule: &Rule,
	entry_url: &str,
	title: String,
	content: String,
	options: &RewriteOptions,
) -> (String, String) {
	let content = match rule {
		Rule::ReplaceTitle {
			search,
			replacement,
		} => return (text::replace_custom(title, search, replacement), content),
		Rule::RemoveClickbait => return (text::titlelize(&title), content),

		Rule::AddImageTitle => images::add_image_title(content),
		Rule::AddDynamicImage => images::add_dynamic_image(content),
		Rule::AddDynamicIframe => images::add_dynamic_iframe(content),
		Rule::FixMediumImages => images::fix_medium_images(content),
		Rule::UseNoscriptFigureImages => images::use_noscript_figure_images(content),
		Rule::RemoveImgBlurParams => images::remove_img_blur_params(content),

		Rule::AddYoutubeVideo => {
			video::add_youtube_video(entry_url, content, options.embed_url_template())
		}
		Rule::AddYoutubeVideoUsingInvidiousPlayer => video::add_youtube_video_using_invidious_player(
			entry_url,
			content,
			options.alternate_video_frontend_host(),
		),
		Rule::AddYoutubeVideoFromId => {
			video::add_youtube_video_from_id(content, options.embed_url_template())
		}
		Rule::AddInvidiousVideo => video::add_invidious_video(entry_url, content),
		Rule::AddCastopodEpisode => video::add_castopod_episode(entry_url, content),
		Rule::AddPdfDownloadLink => video::add_pdf_download_link(entry_url, content),

		Rule::AddMailtoSubject => links::add_mailto_subject(content),
		Rule::AddHackerNewsLinks(app) => links::add_hacker_news_links(content, *app),
		Rule::ConvertTextLinks => links::convert_text_links(content),
		Rule::Nl2br => links::nl2br(content),

		Rule::FixGhostCards => cards::fix_ghost_cards(content),
		Rule::RemoveTables => cards::remove_tables(content),

		Rule::ParseMarkdown => text::parse_markdown(&content),

		Rule::Replace {
			search,
			replacement,
		} => text::replace_custom(content, search, replacement),
		Rule::Remove { selector } => text::remove_custom(content, selector),
		Rule::Base64Decode { selector } => text::base64_decode(content, selector),
	};

	(title, content)
}
