use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use entry_rewrite::config::{
	CONFIG_FILE_NAME, MergedConfig, discover_configs, generate_init_template, load_merged_config,
	resolve_options, user_config_path,
};
use entry_rewrite::model::{Entry, Feed};
use entry_rewrite::rewrite::{rewrite, rules_for_entry};
use entry_rewrite::rules::{compile_feed_rules, find_feed_rule, referer_for_url, rewrite_entry_url};

#[derive(Parser)]
#[command(name = "entry-rewrite")]
#[command(
	author,
	version,
	about = "Rewrite feed entry titles, HTML content and URLs with site rules"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Create a template .entry-rewrite.toml in the current directory
	#[arg(long)]
	init: bool,

	/// Overwrite existing .entry-rewrite.toml when using --init
	#[arg(long, requires = "init")]
	force: bool,
}

#[derive(Subcommand)]
enum Commands {
	/// Rewrite an entry read as JSON from a file or stdin
	Rewrite {
		/// Entry JSON file, or "-" for stdin
		file: Option<PathBuf>,

		/// Rule text to use instead of the configured or built-in rules
		#[arg(long)]
		rules: Option<String>,
	},

	/// Print an entry URL after the URL rewrite rule
	Url {
		url: String,

		/// URL rewrite rule to use instead of the configured one
		#[arg(long)]
		rules: Option<String>,
	},

	/// Print the referer to send when fetching media from a URL
	Referer { url: String },

	/// List the rules that would run for an entry URL
	Rules { url: String },

	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display every config file in the cascade with its settings
	Show,
	/// Check all config files for errors without rewriting anything
	Validate,
}

fn main() -> ExitCode {
	tracing_subscriber::registry()
		.with(fmt::layer().with_writer(std::io::stderr))
		.with(EnvFilter::from_default_env())
		.init();

	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();

	// Handle --init
	if cli.init {
		return handle_init(cli.force);
	}

	let Some(command) = cli.command else {
		// No command specified - this shouldn't happen due to arg_required_else_help
		return Ok(ExitCode::SUCCESS);
	};

	match command {
		Commands::Rewrite { file, rules } => handle_rewrite(file.as_deref(), rules),
		Commands::Url { url, rules } => handle_url(&url, rules),
		Commands::Referer { url } => handle_referer(&url),
		Commands::Rules { url } => handle_rules(&url),
		Commands::Config { action } => match action {
			ConfigAction::Show => handle_config_show(),
			ConfigAction::Validate => handle_config_validate(),
		},
	}
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let config_path = PathBuf::from(CONFIG_FILE_NAME);

	if config_path.exists() && !force {
		anyhow::bail!("{CONFIG_FILE_NAME} already exists. Use --force to overwrite.");
	}

	let template = generate_init_template();
	std::fs::write(&config_path, template)
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created {CONFIG_FILE_NAME}");
	Ok(ExitCode::SUCCESS)
}

fn load_config() -> Result<MergedConfig> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	load_merged_config(&cwd).context("Failed to load configuration")
}

/// Feed settings of the first configured feed matching the entry URL.
fn feed_for_url(config: &MergedConfig, entry_url: &str) -> Result<Feed> {
	let feeds = compile_feed_rules(config).context("Failed to compile feed rules")?;

	Ok(match find_feed_rule(&feeds, entry_url) {
		Some(matched) => {
			tracing::debug!(source = %matched.source.display(), entry_url, "Matched feed rule");
			matched.feed()
		}
		None => Feed::default(),
	})
}

fn read_entry(file: Option<&Path>) -> Result<Entry> {
	let input = match file {
		Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
			.map_err(|source| entry_rewrite::RewriteError::EntryRead {
				path: path.to_path_buf(),
				source,
			})?,
		_ => {
			let mut input = String::new();
			std::io::stdin()
				.read_to_string(&mut input)
				.context("Failed to read entry from stdin")?;
			input
		}
	};

	Ok(Entry::from_json(&input)?)
}

fn handle_rewrite(file: Option<&Path>, rules: Option<String>) -> Result<ExitCode> {
	let config = load_config()?;
	let options = resolve_options(&config);

	let mut entry = read_entry(file)?;
	let mut feed = feed_for_url(&config, &entry.url)?;
	if let Some(rules) = rules {
		feed.rewrite_rules = rules;
	}

	let entry_url = entry.url.clone();
	rewrite(&entry_url, &mut entry, &feed.rewrite_rules, &options);
	entry.url = rewrite_entry_url(&feed, &entry);

	let output = serde_json::to_string_pretty(&entry).context("Failed to serialize entry")?;
	println!("{output}");
	Ok(ExitCode::SUCCESS)
}

fn handle_url(url: &str, rules: Option<String>) -> Result<ExitCode> {
	let feed = match rules {
		Some(url_rewrite_rules) => Feed {
			url_rewrite_rules,
			..Default::default()
		},
		None => feed_for_url(&load_config()?, url)?,
	};

	let entry = Entry::new(url, "", "");
	println!("{}", rewrite_entry_url(&feed, &entry));
	Ok(ExitCode::SUCCESS)
}

fn handle_referer(url: &str) -> Result<ExitCode> {
	if let Some(referer) = referer_for_url(url) {
		println!("{referer}");
	}
	Ok(ExitCode::SUCCESS)
}

fn handle_rules(url: &str) -> Result<ExitCode> {
	let feed = feed_for_url(&load_config()?, url)?;

	for rule in rules_for_entry(url, &feed.rewrite_rules) {
		println!("{rule}");
	}
	Ok(ExitCode::SUCCESS)
}

fn handle_config_show() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let configs = discover_configs(&cwd).context("Failed to discover config files")?;

	if configs.is_empty() {
		println!("No configuration files found.");
		return Ok(ExitCode::SUCCESS);
	}

	println!("Configuration files (in cascade order):\n");

	for loaded in &configs {
		println!("# Source: {}", loaded.path.display());
		println!("# root: {}", loaded.config.root);
		if let Some(ref template) = loaded.config.youtube_embed_url_override {
			println!("# youtube-embed-url-override: {}", template);
		}
		if let Some(ref instance) = loaded.config.invidious_instance {
			println!("# invidious-instance: {}", instance);
		}
		println!("# feeds: {}", loaded.config.feeds.len());
		println!();

		for (i, feed) in loaded.config.feeds.iter().enumerate() {
			println!("  Feed {}:", i + 1);
			if let Some(ref pattern) = feed.url_pattern {
				println!("    url_pattern: {}", pattern);
			}
			if let Some(ref rules) = feed.rewrite_rules {
				println!("    rewrite_rules: {}", rules);
			}
			if let Some(ref rules) = feed.url_rewrite_rules {
				println!("    url_rewrite_rules: {}", rules);
			}
			println!();
		}
	}

	let options = resolve_options(&entry_rewrite::config::merge_configs(&configs));
	println!("Effective options:");
	println!("  youtube-embed-url-override: {}", options.embed_url_template());
	println!("  invidious-instance: {}", options.alternate_video_frontend_host());
	println!();

	// Show user config path
	if let Ok(user_path) = user_config_path() {
		println!("User config path: {}", user_path.display());
		if user_path.exists() {
			println!("  (exists)");
		} else {
			println!("  (not found)");
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_validate() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	match discover_configs(&cwd) {
		Ok(configs) => {
			if configs.is_empty() {
				println!("No configuration files found.");
			} else {
				println!("All configuration files are valid:");
				for loaded in &configs {
					println!(
						"  {} ({} feeds)",
						loaded.path.display(),
						loaded.config.feeds.len()
					);
				}
			}
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Configuration error: {}", e);
			Ok(ExitCode::FAILURE)
		}
	}
}
