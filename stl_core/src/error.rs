use miette::Diagnostic;
use thiserror::Error;

/// Failures surfaced at the I/O boundary of the engine.
///
/// Matching and decomposition never produce an error: malformed markup
/// degrades to empty results. Only the collaborators behind
/// [`resolve_current_url`](crate::resolve_current_url) can fail, and those
/// failures propagate unchanged for the render pipeline to handle.
#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum StlError {
	#[error(transparent)]
	#[diagnostic(code(stl::io_error))]
	Io(#[from] std::io::Error),

	#[error("channel lookup failed for channel {id}: {reason}")]
	#[diagnostic(code(stl::channel_lookup))]
	ChannelLookup { id: i32, reason: String },

	#[error("url construction failed: {0}")]
	#[diagnostic(
		code(stl::url_build),
		help("check the site configuration and the template's publish settings")
	)]
	UrlBuild(String),
}

pub type StlResult<T> = Result<T, StlError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyResult<T> = Result<T, AnyError>;
