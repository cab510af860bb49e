//! `stl_core` is the parsing engine for STL template markup: custom
//! `<stl:name ...>` elements and `{namespace.expr}` data placeholders
//! embedded in otherwise free-form HTML. It turns raw template text into
//! structured tokens for a rendering pipeline, and it degrades on malformed
//! markup instead of failing: a hand-authored CMS template must never abort
//! a page render because of one broken tag.
//!
//! ## Processing pipeline
//!
//! ```text
//! Raw template text
//!   → matcher (balanced element scan + entity scan → ElementToken / EntityToken)
//!   → element (lenient decomposition → ElementInfo: name, attributes, inner markup)
//!   → blocks (loading / yes / no conditional slot extraction)
//!   → context + url (per-render item index and current-url resolution)
//! ```
//!
//! ## Key types
//!
//! - [`ElementToken`] / [`EntityToken`]: substrings matched in template text.
//! - [`ElementInfo`]: decomposed element with its lowercase name,
//!   case-insensitive [`Attributes`], and outer and inner markup.
//! - [`ParseContext`]: ambient iteration state read by [`item_index`].
//! - [`TemplateKind`]: page classification driving [`resolve_current_url`],
//!   which delegates lookups to the [`PathResolver`] and
//!   [`ChannelRepository`] collaborators.
//!
//! Everything except [`resolve_current_url`] is a synchronous pure function
//! over immutable input: no shared state, safe under unbounded concurrent
//! rendering.

pub use blocks::*;
pub use context::*;
pub use element::*;
pub use error::*;
pub use matcher::*;
pub use tokens::*;
pub use url::*;

mod blocks;
mod context;
mod element;
mod error;
mod matcher;
mod tokens;
mod url;

#[cfg(test)]
mod __fixtures;
