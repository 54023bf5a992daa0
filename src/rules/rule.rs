use crate::rules::lexer::quote;
use crate::rules::parser::{RawRule, parse_rules};
use std::fmt;

/// Deep-link target for Hacker News comment links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HackerNewsApp {
	Hack,
	Opener,
}

impl HackerNewsApp {
	pub fn from_name(app: &str) -> Option<Self> {
		match app {
			"hack" => Some(HackerNewsApp::Hack),
			"opener" => Some(HackerNewsApp::Opener),
			_ => None,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			HackerNewsApp::Hack => "hack",
			HackerNewsApp::Opener => "opener",
		}
	}
}

/// A decoded rewrite rule with validated arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
	AddImageTitle,
	AddMailtoSubject,
	AddDynamicImage,
	AddDynamicIframe,
	AddYoutubeVideo,
	AddInvidiousVideo,
	AddYoutubeVideoUsingInvidiousPlayer,
	AddYoutubeVideoFromId,
	AddPdfDownloadLink,
	AddCastopodEpisode,
	Nl2br,
	ConvertTextLinks,
	FixMediumImages,
	UseNoscriptFigureImages,
	FixGhostCards,
	RemoveTables,
	RemoveClickbait,
	RemoveImgBlurParams,
	ParseMarkdown,
	Replace { search: String, replacement: String },
	ReplaceTitle { search: String, replacement: String },
	Remove { selector: String },
	Base64Decode { selector: String },
	AddHackerNewsLinks(HackerNewsApp),
}

const HN_LINKS_PREFIX: &str = "add_hn_links_using_";

impl Rule {
	/// Decode a parsed rule.
	///
	/// Unknown names decode to `None` with a debug log, since rule text may
	/// name rules this build does not know. Known rules missing required
	/// arguments decode to `None` with a warning.
	pub fn decode(raw: &RawRule) -> Option<Rule> {
		let rule = match raw.name.as_str() {
			"add_image_title" => Rule::AddImageTitle,
			"add_mailto_subject" => Rule::AddMailtoSubject,
			"add_dynamic_image" => Rule::AddDynamicImage,
			"add_dynamic_iframe" => Rule::AddDynamicIframe,
			"add_youtube_video" => Rule::AddYoutubeVideo,
			"add_invidious_video" => Rule::AddInvidiousVideo,
			"add_youtube_video_using_invidious_player" => Rule::AddYoutubeVideoUsingInvidiousPlayer,
			"add_youtube_video_from_id" => Rule::AddYoutubeVideoFromId,
			"add_pdf_download_link" => Rule::AddPdfDownloadLink,
			"add_castopod_episode" => Rule::AddCastopodEpisode,
			"nl2br" => Rule::Nl2br,
			"convert_text_link" | "convert_text_links" => Rule::ConvertTextLinks,
			"fix_medium_images" => Rule::FixMediumImages,
			"use_noscript_figure_images" => Rule::UseNoscriptFigureImages,
			"fix_ghost_cards" => Rule::FixGhostCards,
			"remove_tables" => Rule::RemoveTables,
			"remove_clickbait" => Rule::RemoveClickbait,
			"remove_img_blur_params" => Rule::RemoveImgBlurParams,
			"parse_markdown" => Rule::ParseMarkdown,
			"replace" | "replace_title" => {
				let [search, replacement, ..] = raw.args.as_slice() else {
					tracing::warn!(
						rule = %raw.name,
						args = ?raw.args,
						"Cannot find search and replace terms for rule"
					);
					return None;
				};
				let (search, replacement) = (search.clone(), replacement.clone());
				if raw.name == "replace" {
					Rule::Replace {
						search,
						replacement,
					}
				} else {
					Rule::ReplaceTitle {
						search,
						replacement,
					}
				}
			}
			"remove" => {
				let Some(selector) = raw.args.first() else {
					tracing::warn!(rule = %raw.name, "Cannot find selector for remove rule");
					return None;
				};
				Rule::Remove {
					selector: selector.clone(),
				}
			}
			"base64_decode" => Rule::Base64Decode {
				selector: raw
					.args
					.first()
					.cloned()
					.unwrap_or_else(|| "body".to_string()),
			},
			name if name.starts_with(HN_LINKS_PREFIX) => {
				let app = &name[HN_LINKS_PREFIX.len()..];
				let Some(app) = HackerNewsApp::from_name(app) else {
					tracing::warn!(app, "Unknown app provided for Hacker News links rewrite rule");
					return None;
				};
				Rule::AddHackerNewsLinks(app)
			}
			name => {
				tracing::debug!(rule = name, "Skipping unknown rewrite rule");
				return None;
			}
		};

		Some(rule)
	}

	/// The rule's name as written in rule text.
	pub fn name(&self) -> &'static str {
		match self {
			Rule::AddImageTitle => "add_image_title",
			Rule::AddMailtoSubject => "add_mailto_subject",
			Rule::AddDynamicImage => "add_dynamic_image",
			Rule::AddDynamicIframe => "add_dynamic_iframe",
			Rule::AddYoutubeVideo => "add_youtube_video",
			Rule::AddInvidiousVideo => "add_invidious_video",
			Rule::AddYoutubeVideoUsingInvidiousPlayer => "add_youtube_video_using_invidious_player",
			Rule::AddYoutubeVideoFromId => "add_youtube_video_from_id",
			Rule::AddPdfDownloadLink => "add_pdf_download_link",
			Rule::AddCastopodEpisode => "add_castopod_episode",
			Rule::Nl2br => "nl2br",
			Rule::ConvertTextLinks => "convert_text_links",
			Rule::FixMediumImages => "fix_medium_images",
			Rule::UseNoscriptFigureImages => "use_noscript_figure_images",
			Rule::FixGhostCards => "fix_ghost_cards",
			Rule::RemoveTables => "remove_tables",
			Rule::RemoveClickbait => "remove_clickbait",
			Rule::RemoveImgBlurParams => "remove_img_blur_params",
			Rule::ParseMarkdown => "parse_markdown",
			Rule::Replace { .. } => "replace",
			Rule::ReplaceTitle { .. } => "replace_title",
			Rule::Remove { .. } => "remove",
			Rule::Base64Decode { .. } => "base64_decode",
			Rule::AddHackerNewsLinks(HackerNewsApp::Hack) => "add_hn_links_using_hack",
			Rule::AddHackerNewsLinks(HackerNewsApp::Opener) => "add_hn_links_using_opener",
		}
	}
}

impl fmt::Display for Rule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Rule::Replace {
				search,
				replacement,
			}
			| Rule::ReplaceTitle {
				search,
				replacement,
			} => write!(f, "{}({}|{})", self.name(), quote(search), quote(replacement)),
			Rule::Remove { selector } | Rule::Base64Decode { selector } => {
				write!(f, "{}({})", self.name(), quote(selector))
			}
			_ => f.write_str(self.name()),
		}
	}
}

/// Decode every parsed rule, dropping the ones that do not decode.
pub fn decode_rules(raw_rules: &[RawRule]) -> Vec<Rule> {
	raw_rules.iter().filter_map(Rule::decode).collect()
}

/// Parse and decode rule text in one step.
pub fn compile_rules(text: &str) -> Vec<Rule> {
	decode_rules(&parse_rules(text))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn raw(name: &str, args: &[&str]) -> RawRule {
		RawRule {
			name: name.to_string(),
			args: args.iter().map(|a| a.to_string()).collect(),
		}
	}

	#[test]
	fn test_decode_simple_rules() {
		assert_eq!(
			Rule::decode(&raw("add_image_title", &[])),
			Some(Rule::AddImageTitle)
		);
		assert_eq!(
			Rule::decode(&raw("convert_text_link", &[])),
			Some(Rule::ConvertTextLinks)
		);
		assert_eq!(
			Rule::decode(&raw("convert_text_links", &[])),
			Some(Rule::ConvertTextLinks)
		);
	}

	#[test]
	fn test_decode_replace_requires_two_args() {
		assert_eq!(
			Rule::decode(&raw("replace", &["a", "b"])),
			Some(Rule::Replace {
				search: "a".to_string(),
				replacement: "b".to_string(),
			})
		);
		assert_eq!(Rule::decode(&raw("replace", &["a"])), None);
		assert_eq!(Rule::decode(&raw("replace_title", &[])), None);
	}

	#[test]
	fn test_decode_replace_ignores_extra_args() {
		assert_eq!(
			Rule::decode(&raw("replace_title", &["a", "b", "c"])),
			Some(Rule::ReplaceTitle {
				search: "a".to_string(),
				replacement: "b".to_string(),
			})
		);
	}

	#[test]
	fn test_decode_remove_requires_selector() {
		assert_eq!(
			Rule::decode(&raw("remove", &[".ads"])),
			Some(Rule::Remove {
				selector: ".ads".to_string()
			})
		);
		assert_eq!(Rule::decode(&raw("remove", &[])), None);
	}

	#[test]
	fn test_decode_base64_default_selector() {
		assert_eq!(
			Rule::decode(&raw("base64_decode", &[])),
			Some(Rule::Base64Decode {
				selector: "body".to_string()
			})
		);
		assert_eq!(
			Rule::decode(&raw("base64_decode", &["p.encoded"])),
			Some(Rule::Base64Decode {
				selector: "p.encoded".to_string()
			})
		);
	}

	#[test]
	fn test_decode_hacker_news_apps() {
		assert_eq!(
			Rule::decode(&raw("add_hn_links_using_hack", &[])),
			Some(Rule::AddHackerNewsLinks(HackerNewsApp::Hack))
		);
		assert_eq!(
			Rule::decode(&raw("add_hn_links_using_opener", &[])),
			Some(Rule::AddHackerNewsLinks(HackerNewsApp::Opener))
		);
		assert_eq!(Rule::decode(&raw("add_hn_links_using_lynx", &[])), None);
	}

	#[test]
	fn test_decode_parse_markdown() {
		assert_eq!(
			Rule::decode(&raw("parse_markdown", &[])),
			Some(Rule::ParseMarkdown)
		);
	}

	#[test]
	fn test_decode_unknown_rule() {
		assert_eq!(Rule::decode(&raw("parse_markdwon", &[])), None);
		assert_eq!(Rule::decode(&raw("some_future_rule", &["x"])), None);
	}

	#[test]
	fn test_compile_rules_keeps_order() {
		let rules = compile_rules(r#"nl2br, unknown, remove(".x"), add_image_title"#);
		assert_eq!(
			rules,
			vec![
				Rule::Nl2br,
				Rule::Remove {
					selector: ".x".to_string()
				},
				Rule::AddImageTitle,
			]
		);
	}

	#[test]
	fn test_display_round_trips_through_parser() {
		let rules = compile_rules(r#"replace("a\"b\\s\t"|"c"),base64_decode,add_hn_links_using_hack"#);
		let text = rules
			.iter()
			.map(|r| r.to_string())
			.collect::<Vec<_>>()
			.join(",");
		assert_eq!(compile_rules(&text), rules);
	}
}
