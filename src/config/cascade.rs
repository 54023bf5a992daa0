use crate::config::parser::parse_config_file;
use crate::config::types::{FeedRuleWithSource, LoadedConfig, MergedConfig};
use crate::error::{Result, RewriteError};
use crate::rewrite::RewriteOptions;
use std::path::{Path, PathBuf};

/// File name looked up in every directory of the cascade and in the home directory.
pub const CONFIG_FILE_NAME: &str = ".entry-rewrite.toml";

/// Discover and load all config files in the cascade.
///
/// The cascade order is:
/// 1. Start from `start_dir` and look for `.entry-rewrite.toml`
/// 2. If found and `root = true`, skip to user config only
/// 3. Otherwise, continue up the directory tree
/// 4. Finally, check ~/.entry-rewrite.toml
///
/// Returns configs in cascade order (most specific first).
pub fn discover_configs(start_dir: &Path) -> Result<Vec<LoadedConfig>> {
	let mut configs = Vec::new();
	let mut current_dir = start_dir.to_path_buf();

	// Walk up the directory tree
	loop {
		let config_path = current_dir.join(CONFIG_FILE_NAME);

		if config_path.exists() {
			let config = parse_config_file(&config_path)?;
			let is_root = config.root;

			tracing::debug!(path = %config_path.display(), root = is_root, "Loaded config file");
			configs.push(LoadedConfig {
				config,
				path: config_path,
			});

			if is_root {
				break;
			}
		}

		// Move to parent directory
		if let Some(parent) = current_dir.parent() {
			current_dir = parent.to_path_buf();
		} else {
			break;
		}
	}

	let user_config_path = user_config_path()?;
	let already_loaded = configs.iter().any(|loaded| loaded.path == user_config_path);

	if user_config_path.exists() && !already_loaded {
		let config = parse_config_file(&user_config_path)?;
		tracing::debug!(path = %user_config_path.display(), "Loaded user config file");
		configs.push(LoadedConfig {
			config,
			path: user_config_path,
		});
	}

	Ok(configs)
}

/// Merge multiple configs into a single effective config.
///
/// Feed rules are collected in cascade order (first match wins).
/// Scalar options come from the most specific config that sets them.
pub fn merge_configs(configs: &[LoadedConfig]) -> MergedConfig {
	let mut merged = MergedConfig::default();

	for loaded in configs {
		// Collect feed rules with their source
		for rule in &loaded.config.feeds {
			merged.feeds.push(FeedRuleWithSource {
				rule: rule.clone(),
				source: loaded.path.clone(),
			});
		}

		if merged.youtube_embed_url_override.is_none() {
			merged.youtube_embed_url_override = loaded.config.youtube_embed_url_override.clone();
		}
		if merged.invidious_instance.is_none() {
			merged.invidious_instance = loaded.config.invidious_instance.clone();
		}
	}

	merged
}

/// Convenience function to discover, load, and merge configs from a directory.
pub fn load_merged_config(start_dir: &Path) -> Result<MergedConfig> {
	let configs = discover_configs(start_dir)?;
	Ok(merge_configs(&configs))
}

/// Get the path to the user's config file.
pub fn user_config_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(RewriteError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(CONFIG_FILE_NAME))
}

/// Effective rewrite options: environment variables beat config files, which
/// beat the built-in defaults.
pub fn resolve_options(config: &MergedConfig) -> RewriteOptions {
	let mut options = RewriteOptions::default();

	if let Some(ref template) = config.youtube_embed_url_override {
		options = options.with_embed_url_template(template.clone());
	}
	if let Some(ref host) = config.invidious_instance {
		options = options.with_alternate_video_frontend_host(host.clone());
	}

	options.with_env_overrides()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::parser::parse_config_str;

	fn loaded(content: &str, path: &str) -> LoadedConfig {
		LoadedConfig {
			config: parse_config_str(content, Path::new(path)).unwrap(),
			path: PathBuf::from(path),
		}
	}

	#[test]
	fn test_user_config_path() {
		let path = user_config_path();
		assert!(path.is_ok());
		let path = path.unwrap();
		assert!(path.ends_with(".entry-rewrite.toml"));
	}

	#[test]
	fn test_merge_first_scalar_wins() {
		let configs = vec![
			loaded(r#"invidious-instance = "near.example""#, "/a/b/.entry-rewrite.toml"),
			loaded(
				r#"
invidious-instance = "far.example"
youtube-embed-url-override = "https://far.example/embed/"
"#,
				"/a/.entry-rewrite.toml",
			),
		];

		let merged = merge_configs(&configs);
		assert_eq!(merged.invidious_instance, Some("near.example".to_string()));
		assert_eq!(
			merged.youtube_embed_url_override,
			Some("https://far.example/embed/".to_string())
		);
	}

	#[test]
	fn test_merge_feeds_keep_cascade_order() {
		let configs = vec![
			loaded(
				r#"
[[feeds]]
url_pattern = "near"
"#,
				"/a/b/.entry-rewrite.toml",
			),
			loaded(
				r#"
[[feeds]]
url_pattern = "far"
"#,
				"/a/.entry-rewrite.toml",
			),
		];

		let merged = merge_configs(&configs);
		assert_eq!(merged.feeds.len(), 2);
		assert_eq!(merged.feeds[0].rule.url_pattern, Some("near".to_string()));
		assert_eq!(merged.feeds[0].source, PathBuf::from("/a/b/.entry-rewrite.toml"));
		assert_eq!(merged.feeds[1].rule.url_pattern, Some("far".to_string()));
	}

	#[test]
	fn test_discover_configs_stops_at_root() {
		let temp = tempfile::tempdir().unwrap();
		let outer = temp.path().join("outer");
		let inner = outer.join("inner");
		std::fs::create_dir_all(&inner).unwrap();

		std::fs::write(outer.join(CONFIG_FILE_NAME), "invidious-instance = \"outer\"\n").unwrap();
		std::fs::write(
			inner.join(CONFIG_FILE_NAME),
			"root = true\ninvidious-instance = \"inner\"\n",
		)
		.unwrap();

		let configs = discover_configs(&inner).unwrap();
		assert!(configs.iter().all(|c| c.path != outer.join(CONFIG_FILE_NAME)));
		assert_eq!(configs[0].path, inner.join(CONFIG_FILE_NAME));
	}

	#[test]
	fn test_discover_configs_walks_up() {
		let temp = tempfile::tempdir().unwrap();
		let outer = temp.path().join("outer");
		let inner = outer.join("inner");
		std::fs::create_dir_all(&inner).unwrap();

		std::fs::write(outer.join(CONFIG_FILE_NAME), "invidious-instance = \"outer\"\n").unwrap();

		let configs = discover_configs(&inner).unwrap();
		assert_eq!(configs[0].path, outer.join(CONFIG_FILE_NAME));
	}

	#[test]
	fn test_discover_configs_reports_parse_errors() {
		let temp = tempfile::tempdir().unwrap();
		std::fs::write(temp.path().join(CONFIG_FILE_NAME), "root = ").unwrap();

		let result = discover_configs(temp.path());
		assert!(matches!(result, Err(RewriteError::ConfigParse { .. })));
	}
}
