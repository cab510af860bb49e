use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::error::StlResult;

/// Classification of the page a template renders. Each kind has its own
/// URL-resolution rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TemplateKind {
	Site,
	Channel,
	Content,
	File,
}

impl TemplateKind {
	/// Parse a stored classification string. Unrecognized values yield
	/// `None`; callers treat that as "no current url".
	pub fn parse(value: &str) -> Option<Self> {
		match value.to_ascii_lowercase().as_str() {
			"site" => Some(Self::Site),
			"channel" => Some(Self::Channel),
			"content" => Some(Self::Content),
			"file" => Some(Self::File),
			_ => None,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Site => "site",
			Self::Channel => "channel",
			Self::Content => "content",
			Self::File => "file",
		}
	}
}

/// Opaque site handle. Its real shape belongs to the persistence layer; the
/// resolver only passes it through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
	pub id: i32,
	pub name: String,
}

/// Opaque channel handle returned by [`ChannelRepository`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
	pub id: i32,
	pub site_id: i32,
	pub name: String,
}

/// Opaque content handle supplied by the render pipeline when the current
/// content entity is already loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
	pub id: i32,
	pub channel_id: i32,
	pub title: String,
}

/// URL construction collaborator. Every method may perform I/O and is
/// awaited; failures propagate to the render pipeline.
#[allow(async_fn_in_trait)]
pub trait PathResolver {
	async fn web_url(&self, site: &Site) -> StlResult<String>;

	async fn content_url(
		&self,
		site: &Site,
		channel: &Channel,
		content_id: i32,
		is_local: bool,
	) -> StlResult<String>;

	/// Resolve directly from an already-loaded content entity.
	async fn content_url_of(
		&self,
		site: &Site,
		content: &Content,
		is_local: bool,
	) -> StlResult<String>;

	async fn channel_url(
		&self,
		site: &Site,
		channel: &Channel,
		is_local: bool,
	) -> StlResult<String>;

	async fn file_url(&self, site: &Site, template_id: i32, is_local: bool) -> StlResult<String>;
}

/// Channel lookup collaborator.
#[allow(async_fn_in_trait)]
pub trait ChannelRepository {
	async fn channel(&self, channel_id: i32) -> StlResult<Option<Channel>>;
}

/// Canonical URL of the page currently being rendered, dispatched on the
/// template classification.
///
/// Content pages resolve directly from a loaded content entity when one is
/// supplied, and otherwise look the owning channel up first. A channel id
/// that resolves to no channel degrades to an empty URL rather than failing
/// the render.
#[allow(clippy::too_many_arguments)]
pub async fn resolve_current_url<P, R>(
	paths: &P,
	channels: &R,
	kind: TemplateKind,
	site: &Site,
	channel_id: i32,
	content_id: i32,
	content: Option<&Content>,
	template_id: i32,
	is_local: bool,
) -> StlResult<String>
where
	P: PathResolver,
	R: ChannelRepository,
{
	debug!(
		kind = kind.as_str(),
		channel_id, content_id, template_id, is_local, "resolving current url"
	);

	match kind {
		TemplateKind::Site => paths.web_url(site).await,
		TemplateKind::Content => match content {
			Some(content) => paths.content_url_of(site, content, is_local).await,
			None => match channels.channel(channel_id).await? {
				Some(channel) => paths.content_url(site, &channel, content_id, is_local).await,
				None => Ok(String::new()),
			},
		},
		TemplateKind::Channel => match channels.channel(channel_id).await? {
			Some(channel) => paths.channel_url(site, &channel, is_local).await,
			None => Ok(String::new()),
		},
		TemplateKind::File => paths.file_url(site, template_id, is_local).await,
	}
}
