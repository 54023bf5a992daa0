//! HTML and text transformations applied by rewrite rules.
//!
//! Every function takes the value it rewrites by value and returns the new
//! value. Anything that cannot be parsed is returned unchanged.

pub mod cards;
pub mod dom;
pub mod images;
pub mod links;
pub mod text;
pub mod video;

pub use dom::{Document, parse_selector};
