//! entry-rewrite - rule engine for rewriting feed entries.
//!
//! This library provides the core functionality for entry-rewrite, including:
//! - A small rule language (`add_image_title,remove(".ads")`) and its parser
//! - Built-in rules per site and referer lookups for media hosts
//! - HTML and text transformations applied to entry titles and content
//! - URL rewrite rules
//! - Configuration file parsing and cascade discovery
//!
//! # Example
//!
//! ```no_run
//! use entry_rewrite::model::Entry;
//! use entry_rewrite::rewrite::{RewriteOptions, rewrite};
//!
//! let mut entry = Entry::new(
//!     "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
//!     "A video",
//!     "<p>Description</p>",
//! );
//! let options = RewriteOptions::default().with_env_overrides();
//!
//! let entry_url = entry.url.clone();
//! rewrite(&entry_url, &mut entry, "", &options);
//!
//! println!("{}", entry.content);
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod rewrite;
pub mod rules;
pub mod transform;

pub use error::{Result, RewriteError};
