use crate::config::types::Config;
use crate::error::{Result, RewriteError};
use std::path::Path;

/// Parse a config file from the given path.
pub fn parse_config_file(path: &Path) -> Result<Config> {
	let content = std::fs::read_to_string(path).map_err(|source| RewriteError::ConfigRead {
		path: path.to_path_buf(),
		source,
	})?;

	parse_config_str(&content, path)
}

/// Parse a config from a string (useful for testing).
pub fn parse_config_str(content: &str, path: &Path) -> Result<Config> {
	let config: Config = toml::from_str(content).map_err(|source| RewriteError::ConfigParse {
		path: path.to_path_buf(),
		source,
	})?;

	// Validate the parsed config
	config.validate()?;

	Ok(config)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::path::PathBuf;

	#[test]
	fn test_parse_empty_config() {
		let content = "";
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();

		assert!(!config.root);
		assert!(config.youtube_embed_url_override.is_none());
		assert!(config.invidious_instance.is_none());
		assert!(config.feeds.is_empty());
	}

	#[test]
	fn test_parse_basic_config() {
		let content = r#"
root = true
youtube-embed-url-override = "https://invidious.custom/embed/"
invidious-instance = "invidious.example.org"
"#;
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();

		assert!(config.root);
		assert_eq!(
			config.youtube_embed_url_override,
			Some("https://invidious.custom/embed/".to_string())
		);
		assert_eq!(
			config.invidious_instance,
			Some("invidious.example.org".to_string())
		);
	}

	#[test]
	fn test_parse_feeds_array_of_tables() {
		let content = r#"
[[feeds]]
url_pattern = "^https://news\\.ycombinator\\.com/"
rewrite_rules = "add_hn_links_using_opener"
url_rewrite_rules = 'rewrite("^https://news\.ycombinator\.com/item\?id=(.+)"|"https://hn.algolia.com/api/v1/items/$1")'

[[feeds]]
rewrite_rules = 'remove(".ads"),add_image_title'
"#;
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();

		assert_eq!(config.feeds.len(), 2);

		let feed1 = &config.feeds[0];
		assert_eq!(
			feed1.url_pattern,
			Some(r"^https://news\.ycombinator\.com/".to_string())
		);
		assert_eq!(
			feed1.rewrite_rules,
			Some("add_hn_links_using_opener".to_string())
		);
		assert!(feed1.url_rewrite_rules.is_some());

		let feed2 = &config.feeds[1];
		assert!(feed2.url_pattern.is_none());
		assert_eq!(
			feed2.rewrite_rules,
			Some(r#"remove(".ads"),add_image_title"#.to_string())
		);
	}

	#[test]
	fn test_parse_feeds_inline_tables() {
		let content = r#"
feeds = [
    { url_pattern = "xkcd", rewrite_rules = "add_image_title" },
    { url_pattern = "medium", rewrite_rules = "fix_medium_images" },
]
"#;
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();

		assert_eq!(config.feeds.len(), 2);
	}

	#[test]
	fn test_invalid_url_pattern() {
		let content = r#"
[[feeds]]
url_pattern = "[invalid"
"#;
		let path = PathBuf::from("test.toml");
		let result = parse_config_str(content, &path);

		match result.unwrap_err() {
			RewriteError::InvalidRegex { pattern, .. } => assert_eq!(pattern, "[invalid"),
			other => panic!("Expected InvalidRegex error, got {other:?}"),
		}
	}

	#[test]
	fn test_malformed_url_rewrite_rule() {
		let content = r#"
[[feeds]]
url_rewrite_rules = 'rewrite("only one part")'
"#;
		let path = PathBuf::from("test.toml");
		let result = parse_config_str(content, &path);

		assert!(matches!(
			result,
			Err(RewriteError::InvalidUrlRewrite { .. })
		));
	}

	#[test]
	fn test_blank_url_rewrite_rule_is_allowed() {
		let content = r#"
[[feeds]]
url_rewrite_rules = "  "
"#;
		let path = PathBuf::from("test.toml");
		assert!(parse_config_str(content, &path).is_ok());
	}

	#[test]
	fn test_parse_invalid_toml() {
		let path = PathBuf::from("test.toml");
		let result = parse_config_str("root = ", &path);

		match result.unwrap_err() {
			RewriteError::ConfigParse { path, .. } => assert_eq!(path, PathBuf::from("test.toml")),
			other => panic!("Expected ConfigParse error, got {other:?}"),
		}
	}
}
