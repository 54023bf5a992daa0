/// A token recognized in rule text. Everything else is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
	/// A rule name: a letter or `_`, then letters, digits or `_`.
	Ident(&'a str),

	/// A double-quoted literal, quotes included. May be unterminated.
	Str(&'a str),
}

/// Identifier and string tokenizer over rule text.
///
/// Punctuation such as commas, parentheses and pipes is consumed as noise.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
	src: &'a str,
	pos: usize,
}

impl<'a> Scanner<'a> {
	pub fn new(src: &'a str) -> Self {
		Scanner { src, pos: 0 }
	}
}

impl<'a> Iterator for Scanner<'a> {
	type Item = Token<'a>;

	fn next(&mut self) -> Option<Token<'a>> {
		loop {
			let rest = &self.src[self.pos..];
			let c = rest.chars().next()?;

			if is_ident_start(c) {
				let end = rest
					.char_indices()
					.find(|&(_, ch)| !is_ident_char(ch))
					.map_or(rest.len(), |(i, _)| i);
				self.pos += end;
				return Some(Token::Ident(&rest[..end]));
			}

			if c == '"' {
				let end = string_end(rest);
				self.pos += end;
				return Some(Token::Str(&rest[..end]));
			}

			self.pos += c.len_utf8();
		}
	}
}

fn is_ident_start(c: char) -> bool {
	c == '_' || c.is_alphabetic()
}

fn is_ident_char(c: char) -> bool {
	is_ident_start(c) || c.is_numeric()
}

/// Byte length of the string literal at the start of `rest`.
///
/// The literal stops after the closing quote, or before a raw newline or the
/// end of input when it is not terminated.
fn string_end(rest: &str) -> usize {
	let mut chars = rest.char_indices().skip(1);

	while let Some((i, c)) = chars.next() {
		match c {
			'"' => return i + 1,
			'\n' => return i,
			'\\' => {
				if let Some((j, escaped)) = chars.next()
					&& escaped == '\n'
				{
					return j;
				}
			}
			_ => {}
		}
	}

	rest.len()
}

/// Remove the quotes from a string token and resolve its escape sequences.
///
/// Returns `None` for literals that are unterminated, contain a raw newline,
/// use an unknown escape or decode to invalid UTF-8.
pub fn unquote(token: &str) -> Option<String> {
	let inner = token.strip_prefix('"')?.strip_suffix('"')?;
	let mut bytes: Vec<u8> = Vec::with_capacity(inner.len());
	let mut chars = inner.chars();

	while let Some(c) = chars.next() {
		match c {
			'"' | '\n' => return None,
			'\\' => {
				let escaped = chars.next()?;
				match escaped {
					'a' => bytes.push(0x07),
					'b' => bytes.push(0x08),
					'f' => bytes.push(0x0c),
					'n' => bytes.push(b'\n'),
					'r' => bytes.push(b'\r'),
					't' => bytes.push(b'\t'),
					'v' => bytes.push(0x0b),
					'\\' => bytes.push(b'\\'),
					'"' => bytes.push(b'"'),
					'0'..='7' => {
						let first = escaped.to_digit(8)?;
						let value = read_digits(&mut chars, 8, 2)?;
						let value = first * 64 + value;
						bytes.push(u8::try_from(value).ok()?);
					}
					'x' => {
						let value = read_digits(&mut chars, 16, 2)?;
						bytes.push(u8::try_from(value).ok()?);
					}
					'u' | 'U' => {
						let width = if escaped == 'u' { 4 } else { 8 };
						let value = read_digits(&mut chars, 16, width)?;
						push_char(&mut bytes, char::from_u32(value)?);
					}
					_ => return None,
				}
			}
			_ => push_char(&mut bytes, c),
		}
	}

	String::from_utf8(bytes).ok()
}

/// Quote `value` as a string literal that [`unquote`] reads back unchanged.
pub fn quote(value: &str) -> String {
	let mut quoted = String::with_capacity(value.len() + 2);
	quoted.push('"');
	for c in value.chars() {
		match c {
			'"' => quoted.push_str("\\\""),
			'\\' => quoted.push_str("\\\\"),
			'\n' => quoted.push_str("\\n"),
			'\r' => quoted.push_str("\\r"),
			'\t' => quoted.push_str("\\t"),
			c if c.is_control() => quoted.push_str(&format!("\\u{:04x}", c as u32)),
			c => quoted.push(c),
		}
	}
	quoted.push('"');
	quoted
}

fn read_digits(chars: &mut std::str::Chars<'_>, radix: u32, count: usize) -> Option<u32> {
	let mut value: u32 = 0;
	for _ in 0..count {
		let digit = chars.next()?.to_digit(radix)?;
		value = value.checked_mul(radix)?.checked_add(digit)?;
	}
	Some(value)
}

fn push_char(bytes: &mut Vec<u8>, c: char) {
	let mut buf = [0u8; 4];
	bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}
