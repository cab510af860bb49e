use serde::Deserialize;
use serde::Serialize;

/// Byte range into the scanned template text.
pub type Span = std::ops::Range<usize>;

/// One complete top-level STL element matched in raw template text: either a
/// balanced open/close pair (possibly containing same-named nested pairs) or
/// a single self-closing tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementToken {
	/// Lowercase tag name, e.g. `each` for `<stl:each>`.
	pub name: String,
	/// The matched substring, exactly as it appears in the input.
	pub text: String,
	/// Where the match sits in the input.
	pub span: Span,
	/// Whether the element is a single `<stl:name ... />` tag.
	pub self_closing: bool,
}

/// One `{namespace.expr}` data placeholder.
///
/// Entities are detected on element-stripped text, so removal can fuse text
/// across a gap; the token therefore carries no span into the original input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityToken {
	pub namespace: Namespace,
	/// The matched placeholder, braces included.
	pub text: String,
}

/// The fixed set of entity namespaces.
///
/// `Stl` covers both spellings, `{stl.expr}` and `{stl:expr}`; every other
/// namespace uses the dot separator only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Namespace {
	Stl,
	Content,
	Channel,
	Comment,
	Request,
	Sql,
	User,
	Navigation,
	Photo,
}

impl Namespace {
	pub const ALL: [Namespace; 9] = [
		Namespace::Stl,
		Namespace::Content,
		Namespace::Channel,
		Namespace::Comment,
		Namespace::Request,
		Namespace::Sql,
		Namespace::User,
		Namespace::Navigation,
		Namespace::Photo,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			Namespace::Stl => "stl",
			Namespace::Content => "content",
			Namespace::Channel => "channel",
			Namespace::Comment => "comment",
			Namespace::Request => "request",
			Namespace::Sql => "sql",
			Namespace::User => "user",
			Namespace::Navigation => "navigation",
			Namespace::Photo => "photo",
		}
	}

	/// The brace prefixes that open an entity of this namespace.
	pub fn prefixes(self) -> &'static [&'static str] {
		match self {
			Namespace::Stl => &["{stl.", "{stl:"],
			Namespace::Content => &["{content."],
			Namespace::Channel => &["{channel."],
			Namespace::Comment => &["{comment."],
			Namespace::Request => &["{request."],
			Namespace::Sql => &["{sql."],
			Namespace::User => &["{user."],
			Namespace::Navigation => &["{navigation."],
			Namespace::Photo => &["{photo."],
		}
	}

	/// Match a namespace prefix at the start of `rest`, returning the
	/// namespace and the prefix length in bytes.
	pub(crate) fn match_prefix(rest: &[u8]) -> Option<(Namespace, usize)> {
		for namespace in Namespace::ALL {
			for prefix in namespace.prefixes() {
				if rest.len() >= prefix.len()
					&& rest[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
				{
					return Some((namespace, prefix.len()));
				}
			}
		}
		None
	}
}
