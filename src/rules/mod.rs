//! Rule text, site tables and feed matching.
//!
//! This module handles:
//! - Tokenizing and parsing rule text into typed rules
//! - Built-in rules per site and referer lookups
//! - Matching configured feed rules against entry URLs
//! - URL rewrite rules

pub mod lexer;
pub mod matcher;
pub mod parser;
pub mod predefined;
pub mod referer;
pub mod rule;
pub mod url_rewrite;

pub use matcher::{CompiledFeedRule, compile_feed_rules, find_feed_rule};
pub use parser::{RawRule, parse_rules};
pub use predefined::{PREDEFINED_RULES, predefined_rules_for, url_domain};
pub use referer::referer_for_url;
pub use rule::{HackerNewsApp, Rule, compile_rules, decode_rules};
pub use url_rewrite::{UrlRewrite, rewrite_entry_url};
