use derive_more::Deref;
use logos::Logos;
use serde::Deserialize;
use serde::Serialize;

use crate::matcher::ends_with_ci;
use crate::matcher::find_byte;
use crate::matcher::has_element_prefix;

/// `type` attribute value that marks the paged-content element of a template.
pub const PAGE_CONTENT: &str = "PageContent";

/// One name/value pair from an element's open tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
	pub name: String,
	pub value: String,
}

/// Attribute collection with case-insensitive lookup.
///
/// Insertion order is preserved; inserting under an existing name
/// (case-insensitively) overwrites its value, so the last occurrence in
/// markup wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Deref)]
pub struct Attributes(Vec<Attribute>);

impl Attributes {
	pub fn new() -> Self {
		Self(Vec::new())
	}

	pub fn get(&self, name: &str) -> Option<&str> {
		self.0
			.iter()
			.find(|attribute| attribute.name.eq_ignore_ascii_case(name))
			.map(|attribute| attribute.value.as_str())
	}

	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
		let name = name.into();
		let value = value.into();
		match self
			.0
			.iter_mut()
			.find(|attribute| attribute.name.eq_ignore_ascii_case(&name))
		{
			Some(existing) => existing.value = value,
			None => self.0.push(Attribute { name, value }),
		}
	}
}

/// Decomposed view of one element token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementInfo {
	/// Lowercase local tag name: `x` for `<stl:x>`.
	pub name: String,
	pub attributes: Attributes,
	/// The element's full markup, open tag through close tag.
	pub outer: String,
	/// Serialized markup between the open and close tags.
	pub inner: String,
}

/// Lenient single-fragment markup parse: tag name, attributes, and serialized
/// children of the first node in `markup`, or `None` when no element can be
/// made of it. Implementations must degrade, never error.
pub trait FragmentParser {
	fn parse_fragment(&self, markup: &str) -> Option<ElementInfo>;
}

/// Decompose an element token with the crate's own [`LenientParser`].
pub fn decompose(token: &str) -> Option<ElementInfo> {
	decompose_with(&LenientParser, token)
}

/// Decompose an element token with an injected parser.
pub fn decompose_with(parser: &impl FragmentParser, token: &str) -> Option<ElementInfo> {
	parser.parse_fragment(token)
}

/// The decomposed inner markup of a token, or empty when decomposition fails.
pub fn inner_markup(token: &str) -> String {
	decompose(token).map(|info| info.inner).unwrap_or_default()
}

/// Cheap filter for "is this token the element called `name`": the token must
/// open with `<name ` or `<name>` and end with `</name>` or `/>`, all
/// case-insensitively. Use before paying for [`decompose`] on large candidate
/// lists.
pub fn is_element(token: &str, name: &str) -> bool {
	has_element_prefix(token, name)
		&& (ends_with_ci(token, &format!("</{name}>")) || ends_with_ci(token, "/>"))
}

/// First `<stl:content>` label whose `type` attribute equals `type_value`,
/// case-insensitively.
pub fn find_content_with_type<'a>(labels: &'a [String], type_value: &str) -> Option<&'a str> {
	find_with_type(labels, "stl:content", type_value)
}

/// First `<stl:channel>` label whose `type` attribute equals `type_value`,
/// case-insensitively.
pub fn find_channel_with_type<'a>(labels: &'a [String], type_value: &str) -> Option<&'a str> {
	find_with_type(labels, "stl:channel", type_value)
}

fn find_with_type<'a>(labels: &'a [String], name: &str, type_value: &str) -> Option<&'a str> {
	labels.iter().map(String::as_str).find(|label| {
		has_element_prefix(label, name)
			&& decompose(label).is_some_and(|info| {
				info.attributes
					.get("type")
					.is_some_and(|value| value.eq_ignore_ascii_case(type_value))
			})
	})
}

/// The default [`FragmentParser`]: an explicit scan over the open tag with a
/// flat logos pass for attributes, a depth-matched close tag, and auto-close
/// at the end of input when the close tag is missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LenientParser;

impl FragmentParser for LenientParser {
	fn parse_fragment(&self, markup: &str) -> Option<ElementInfo> {
		let trimmed = markup.trim();
		let bytes = trimmed.as_bytes();
		if bytes.first() != Some(&b'<') {
			return None;
		}

		let mut name_end = 1;
		while name_end < bytes.len() && is_element_name_byte(bytes[name_end]) {
			name_end += 1;
		}
		if name_end == 1 {
			return None;
		}
		let full_name = trimmed[1..name_end].to_ascii_lowercase();
		let name = local_name(&full_name)?;

		let gt = find_byte(bytes, name_end, b'>')?;
		let self_closing = bytes[gt - 1] == b'/';
		let head_end = if self_closing { gt - 1 } else { gt };
		let attributes = parse_attributes(&trimmed[name_end..head_end]);

		if self_closing {
			return Some(ElementInfo {
				name,
				attributes,
				outer: trimmed[..gt + 1].to_string(),
				inner: String::new(),
			});
		}

		// No close tag in sight means the element swallows the rest of the
		// fragment, the way tolerant html parsers auto-close at end of input.
		let (inner_end, outer_end) = match find_close(bytes, gt + 1, &full_name) {
			Some(close) => close,
			None => (trimmed.len(), trimmed.len()),
		};
		Some(ElementInfo {
			name,
			attributes,
			outer: trimmed[..outer_end].to_string(),
			inner: trimmed[gt + 1..inner_end].to_string(),
		})
	}
}

/// Raw tokens for the flat attribute scan inside an open tag.
#[derive(Logos, Debug, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
enum AttrToken {
	#[token("=")]
	Equals,
	#[regex(r#""[^"]*""#)]
	DoubleQuoted,
	#[regex(r"'[^']*'")]
	SingleQuoted,
	#[regex(r#"[^\s='"]+"#)]
	Bare,
}

/// Walk the attribute text of an open tag. Unrecognized bytes are skipped;
/// a name with no `=value` keeps an empty value; a later duplicate name
/// overwrites an earlier one.
fn parse_attributes(head: &str) -> Attributes {
	let mut attributes = Attributes::new();
	let mut lexer = AttrToken::lexer(head);
	let mut current: Option<String> = None;
	let mut pending_equals = false;

	while let Some(result) = lexer.next() {
		let Ok(token) = result else {
			continue;
		};
		match token {
			AttrToken::Equals => {
				if current.is_some() {
					pending_equals = true;
				}
			}
			AttrToken::Bare => {
				if pending_equals {
					if let Some(name) = current.take() {
						attributes.insert(name, lexer.slice());
					}
					pending_equals = false;
				} else {
					if let Some(name) = current.take() {
						attributes.insert(name, "");
					}
					current = Some(lexer.slice().to_string());
				}
			}
			AttrToken::DoubleQuoted | AttrToken::SingleQuoted => {
				let slice = lexer.slice();
				let value = &slice[1..slice.len() - 1];
				if pending_equals {
					if let Some(name) = current.take() {
						attributes.insert(name, value);
					}
					pending_equals = false;
				}
			}
		}
	}
	if let Some(name) = current.take() {
		attributes.insert(name, "");
	}
	attributes
}

/// Depth-matched close tag for `name`: returns the byte where the close tag
/// starts and the byte just past its `>`.
fn find_close(bytes: &[u8], from: usize, name: &str) -> Option<(usize, usize)> {
	let mut depth = 1usize;
	let mut pos = from;

	while let Some(at) = find_byte(bytes, pos, b'<') {
		if bytes.get(at + 1) == Some(&b'/') {
			if matches_name(bytes, at + 2, name) {
				match find_byte(bytes, at + 2 + name.len(), b'>') {
					Some(gt) => {
						depth -= 1;
						if depth == 0 {
							return Some((at, gt + 1));
						}
						pos = gt + 1;
					}
					None => pos = at + 2,
				}
			} else {
				pos = at + 2;
			}
		} else if matches_name(bytes, at + 1, name) {
			match find_byte(bytes, at + 1 + name.len(), b'>') {
				Some(gt) => {
					if bytes[gt - 1] != b'/' {
						depth += 1;
					}
					pos = gt + 1;
				}
				None => pos = at + 1,
			}
		} else {
			pos = at + 1;
		}
	}
	None
}

fn matches_name(bytes: &[u8], start: usize, name: &str) -> bool {
	let end = start + name.len();
	end <= bytes.len()
		&& bytes[start..end].eq_ignore_ascii_case(name.as_bytes())
		&& bytes.get(end).is_none_or(|&byte| !is_element_name_byte(byte))
}

fn is_element_name_byte(byte: u8) -> bool {
	byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b':' | b'-' | b'.')
}

/// The segment after the last `:` of a full tag name; `None` when empty.
fn local_name(full_name: &str) -> Option<String> {
	let local = full_name.rsplit(':').next().unwrap_or(full_name);
	if local.is_empty() {
		None
	} else {
		Some(local.to_string())
	}
}
