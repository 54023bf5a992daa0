use crate::rules::lexer::{Scanner, Token, unquote};

/// A rule as written in rule text: a name and its positional arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRule {
	pub name: String,
	pub args: Vec<String>,
}

impl RawRule {
	pub fn new(name: impl Into<String>) -> Self {
		RawRule {
			name: name.into(),
			args: Vec::new(),
		}
	}
}

/// Parse rule text such as `add_dynamic_image,replace("a"|"b")` into rules.
///
/// Each identifier starts a rule and each string literal becomes an argument of
/// the latest rule. Strings before the first identifier, and strings that fail
/// to unquote, are dropped. This never fails.
pub fn parse_rules(text: &str) -> Vec<RawRule> {
	let mut rules: Vec<RawRule> = Vec::new();

	for token in Scanner::new(text) {
		match token {
			Token::Ident(name) => rules.push(RawRule::new(name)),
			Token::Str(literal) => {
				let Some(rule) = rules.last_mut() else {
					continue;
				};

				match unquote(literal) {
					Some(arg) => rule.args.push(arg),
					None => tracing::debug!(
						rule = %rule.name,
						literal,
						"Dropping rule argument that cannot be unquoted"
					),
				}
			}
		}
	}

	rules
}

#[cfg(test)]
mod tests {
	use super::*;

	fn rule(name: &str, args: &[&str]) -> RawRule {
		RawRule {
			name: name.to_string(),
			args: args.iter().map(|a| a.to_string()).collect(),
		}
	}

	#[test]
	fn test_parse_three_rules() {
		let rules = parse_rules(r#"add_dynamic_image,replace("a"|"b"),remove(".x")"#);
		assert_eq!(
			rules,
			vec![
				rule("add_dynamic_image", &[]),
				rule("replace", &["a", "b"]),
				rule("remove", &[".x"]),
			]
		);
	}

	#[test]
	fn test_parse_selector_with_punctuation() {
		let rules = parse_rules(
			r#"add_dynamic_image,replace("article/(.*).svg"|"article/$1.png"),remove(".spam, .ads:not(.keep)")"#,
		);
		assert_eq!(rules.len(), 3);
		assert_eq!(rules[1].args, vec!["article/(.*).svg", "article/$1.png"]);
		assert_eq!(rules[2].args, vec![".spam, .ads:not(.keep)"]);
	}

	#[test]
	fn test_parse_empty_text() {
		assert!(parse_rules("").is_empty());
		assert!(parse_rules("  , ( ) ").is_empty());
	}

	#[test]
	fn test_string_before_identifier_is_dropped() {
		let rules = parse_rules(r#""orphan" nl2br"#);
		assert_eq!(rules, vec![rule("nl2br", &[])]);
	}

	#[test]
	fn test_invalid_escape_drops_argument() {
		let rules = parse_rules(r#"replace("\d+"|"x")"#);
		assert_eq!(rules, vec![rule("replace", &["x"])]);
	}

	#[test]
	fn test_escaped_backslash_survives() {
		let rules = parse_rules(r#"replace_title("(?i)^a\\s*ti"|"Ti")"#);
		assert_eq!(rules, vec![rule("replace_title", &[r"(?i)^a\s*ti", "Ti"])]);
	}

	#[test]
	fn test_whitespace_between_rules() {
		let rules = parse_rules("add_image_title\n\tadd_mailto_subject");
		assert_eq!(
			rules,
			vec![rule("add_image_title", &[]), rule("add_mailto_subject", &[])]
		);
	}
}
