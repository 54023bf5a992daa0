use std::path::PathBuf;

/// Library-level structured errors for entry-rewrite.
///
/// The rewrite engine itself never fails: these errors come from the outer
/// layers (config files, entry input, strict rule parsing). The CLI binary
/// wraps them with `anyhow` for context chains.
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
	#[error("Failed to read config file: {path}")]
	ConfigRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid regex pattern: {pattern}")]
	InvalidRegex {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Invalid URL rewrite rule, expected rewrite(\"<regex>\"|\"<replacement>\"): {rule}")]
	InvalidUrlRewrite { rule: String },

	#[error("Failed to read entry: {path}")]
	EntryRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse entry JSON")]
	EntryParse {
		#[source]
		source: serde_json::Error,
	},

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// Result type alias using RewriteError.
pub type Result<T> = std::result::Result<T, RewriteError>;
