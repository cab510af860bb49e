use tracing::trace;

use crate::tokens::ElementToken;
use crate::tokens::EntityToken;
use crate::tokens::Namespace;

const OPEN: &[u8] = b"<stl:";
const CLOSE: &[u8] = b"</stl:";

/// Find every top-level STL element in `text`, in order.
///
/// Matching balances nesting depth per tag name: each `<stl:x ...>` opens a
/// level, each `</stl:x ...>` closes one, and the element ends when the depth
/// returns to zero. Tag names are case-insensitive. Self-closing tags are
/// atomic matches and never affect the depth of an enclosing element. An open
/// tag that never balances yields no match; scanning resumes just past it, so
/// balanced elements inside it are still found.
///
/// The scan is a single explicit cursor walk: linear in the input and immune
/// to backtracking blowup on adversarial nesting.
pub fn match_elements(text: &str) -> Vec<ElementToken> {
	let bytes = text.as_bytes();
	let mut tokens = vec![];
	let mut cursor = 0;

	while let Some(at) = find_ci(bytes, cursor, OPEN) {
		let Some(head) = parse_head(bytes, at) else {
			cursor = at + 1;
			continue;
		};
		let name = text[head.name_start..head.name_end].to_ascii_lowercase();
		if head.self_closing {
			tokens.push(element_token(text, at, head.end, &name, true));
			cursor = head.end;
			continue;
		}
		match find_balanced_end(bytes, head.end, &name) {
			Some(end) => {
				tokens.push(element_token(text, at, end, &name, false));
				cursor = end;
			}
			// Unbalanced open: no match for this occurrence, keep scanning
			// inside it.
			None => cursor = at + 1,
		}
	}

	trace!(elements = tokens.len(), "matched stl elements");
	tokens
}

/// `text` with every matched element removed.
pub fn strip_elements(text: &str) -> String {
	let tokens = match_elements(text);
	if tokens.is_empty() {
		return text.to_string();
	}

	let mut stripped = String::with_capacity(text.len());
	let mut last = 0;
	for token in &tokens {
		stripped.push_str(&text[last..token.span.start]);
		last = token.span.end;
	}
	stripped.push_str(&text[last..]);
	stripped
}

/// Find every `{namespace.expr}` entity in `text`, in order.
///
/// Elements are stripped first, so placeholders inside an STL element are
/// never reported. A match opens with one of the fixed namespace prefixes
/// (case-insensitive) and runs to the next `}` with no brace in between.
pub fn match_entities(text: &str) -> Vec<EntityToken> {
	let stripped = strip_elements(text);
	let bytes = stripped.as_bytes();
	let mut tokens = vec![];
	let mut i = 0;

	while i < bytes.len() {
		if bytes[i] != b'{' {
			i += 1;
			continue;
		}
		let Some((namespace, prefix_len)) = Namespace::match_prefix(&bytes[i..]) else {
			i += 1;
			continue;
		};
		let mut j = i + prefix_len;
		while j < bytes.len() && bytes[j] != b'{' && bytes[j] != b'}' {
			j += 1;
		}
		if j < bytes.len() && bytes[j] == b'}' {
			tokens.push(EntityToken {
				namespace,
				text: stripped[i..=j].to_string(),
			});
			i = j + 1;
		} else {
			// Ran into `{` or the end of input: not an entity. A `{` may
			// itself open one, so restart there.
			i = j.max(i + 1);
		}
	}

	trace!(entities = tokens.len(), "matched stl entities");
	tokens
}

/// Cheap conservative pre-filter for entity presence: true iff `text`
/// contains a closing brace and at least one namespace prefix. May report
/// true when a full [`match_entities`] pass finds nothing; never use it as an
/// exact predicate.
pub fn has_entity_hint(text: &str) -> bool {
	if !text.contains('}') {
		return false;
	}
	let lowered = text.to_ascii_lowercase();
	Namespace::ALL
		.iter()
		.any(|namespace| namespace.prefixes().iter().any(|prefix| lowered.contains(prefix)))
}

/// The combined label list handlers iterate: element texts first, then
/// entity texts.
pub fn stl_labels(text: &str) -> Vec<String> {
	let mut labels: Vec<String> = match_elements(text)
		.into_iter()
		.map(|token| token.text)
		.collect();
	labels.extend(match_entities(text).into_iter().map(|token| token.text));
	labels
}

/// First label that opens with `<name ` or `<name>`, case-insensitively.
pub fn find_element<'a>(name: &str, labels: &'a [String]) -> Option<&'a str> {
	labels
		.iter()
		.map(String::as_str)
		.find(|label| has_element_prefix(label, name))
}

/// Whether any label opens with `<name ` or `<name>`, case-insensitively.
pub fn contains_element(name: &str, labels: &[String]) -> bool {
	find_element(name, labels).is_some()
}

/// The entity with any `_suffix` stripped from its expression:
/// `{content.title_fmt}` becomes `{content.title}`. Unchanged when there is
/// no underscore.
pub fn entity_name(entity: &str) -> String {
	match entity.find('_') {
		Some(at) => format!("{}}}", &entity[..at]),
		None => entity.to_string(),
	}
}

/// The `_suffix` of an entity expression: the text between the last `_` and
/// the last `}`. Empty on any malformed shape.
pub fn entity_value(entity: &str) -> String {
	let Some(underscore) = entity.rfind('_') else {
		return String::new();
	};
	match entity.rfind('}') {
		Some(brace) if brace > underscore => entity[underscore + 1..brace].to_string(),
		_ => String::new(),
	}
}

pub(crate) fn starts_with_ci(text: &str, prefix: &str) -> bool {
	text.len() >= prefix.len()
		&& text.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

pub(crate) fn ends_with_ci(text: &str, suffix: &str) -> bool {
	text.len() >= suffix.len()
		&& text.as_bytes()[text.len() - suffix.len()..].eq_ignore_ascii_case(suffix.as_bytes())
}

pub(crate) fn has_element_prefix(label: &str, name: &str) -> bool {
	starts_with_ci(label, &format!("<{name} ")) || starts_with_ci(label, &format!("<{name}>"))
}

/// A parsed `<stl:name ...>` open-tag head.
struct TagHead {
	name_start: usize,
	name_end: usize,
	/// Byte just past the closing `>`.
	end: usize,
	self_closing: bool,
}

fn is_name_byte(byte: u8) -> bool {
	byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Parse the open tag starting at `at` (which must sit on `<stl:`). The name
/// must be non-empty; everything after it up to the next `>` is attribute
/// text and is not inspected here.
fn parse_head(bytes: &[u8], at: usize) -> Option<TagHead> {
	let name_start = at + OPEN.len();
	let mut name_end = name_start;
	while name_end < bytes.len() && is_name_byte(bytes[name_end]) {
		name_end += 1;
	}
	if name_end == name_start {
		return None;
	}
	let gt = find_byte(bytes, name_end, b'>')?;
	Some(TagHead {
		name_start,
		name_end,
		end: gt + 1,
		self_closing: bytes[gt - 1] == b'/',
	})
}

/// Scan forward from the end of an open tag, counting same-name opens and
/// closes, and return the byte just past the close tag that balances it.
fn find_balanced_end(bytes: &[u8], from: usize, name: &str) -> Option<usize> {
	let mut depth = 1usize;
	let mut pos = from;

	loop {
		let open = find_ci(bytes, pos, OPEN);
		let close = find_ci(bytes, pos, CLOSE);
		let (at, is_close) = match (open, close) {
			(Some(o), Some(c)) => {
				if o < c {
					(o, false)
				} else {
					(c, true)
				}
			}
			(Some(o), None) => (o, false),
			(None, Some(c)) => (c, true),
			(None, None) => return None,
		};

		if is_close {
			let name_at = at + CLOSE.len();
			if matches_name_ci(bytes, name_at, name) {
				let gt = find_byte(bytes, name_at + name.len(), b'>')?;
				depth -= 1;
				if depth == 0 {
					return Some(gt + 1);
				}
				pos = gt + 1;
			} else {
				pos = name_at;
			}
		} else {
			match parse_head(bytes, at) {
				Some(head) => {
					if !head.self_closing && matches_name_ci(bytes, head.name_start, name) {
						depth += 1;
					}
					pos = head.end;
				}
				None => pos = at + 1,
			}
		}
	}
}

/// Case-insensitive `name` at `start`, ending on a non-name byte.
fn matches_name_ci(bytes: &[u8], start: usize, name: &str) -> bool {
	let end = start + name.len();
	end <= bytes.len()
		&& bytes[start..end].eq_ignore_ascii_case(name.as_bytes())
		&& bytes.get(end).is_none_or(|&byte| !is_name_byte(byte))
}

fn find_ci(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
	if bytes.len() < needle.len() {
		return None;
	}
	(from..=bytes.len() - needle.len())
		.find(|&i| bytes[i..i + needle.len()].eq_ignore_ascii_case(needle))
}

pub(crate) fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
	(from..bytes.len()).find(|&i| bytes[i] == needle)
}

fn element_token(
	text: &str,
	start: usize,
	end: usize,
	name: &str,
	self_closing: bool,
) -> ElementToken {
	ElementToken {
		name: name.to_string(),
		text: text[start..end].to_string(),
		span: start..end,
		self_closing,
	}
}
