use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use crate::Channel;
use crate::ChannelRepository;
use crate::Content;
use crate::PathResolver;
use crate::Site;
use crate::StlError;
use crate::StlResult;

/// A template mixing plain html, elements, and entities.
pub const PAGE_TEMPLATE: &str = r#"<html><body>
<h1>{content.title}</h1>
<stl:content type="Body"></stl:content>
<stl:channel><a href="{channel.url}">{channel.name}</a></stl:channel>
<p>{user.name}</p>
</body></html>"#;

pub fn sample_site() -> Site {
	Site {
		id: 1,
		name: "main".to_string(),
	}
}

pub fn sample_channel(id: i32) -> Channel {
	Channel {
		id,
		site_id: 1,
		name: "news".to_string(),
	}
}

pub fn sample_content() -> Content {
	Content {
		id: 33,
		channel_id: 2,
		title: "hello".to_string(),
	}
}

/// Path resolver producing deterministic urls from its arguments.
#[derive(Debug, Default)]
pub struct FakePaths;

impl PathResolver for FakePaths {
	async fn web_url(&self, site: &Site) -> StlResult<String> {
		Ok(format!("/site/{}", site.id))
	}

	async fn content_url(
		&self,
		site: &Site,
		channel: &Channel,
		content_id: i32,
		is_local: bool,
	) -> StlResult<String> {
		Ok(format!(
			"/site/{}/channel/{}/content/{}{}",
			site.id,
			channel.id,
			content_id,
			local_suffix(is_local)
		))
	}

	async fn content_url_of(
		&self,
		site: &Site,
		content: &Content,
		is_local: bool,
	) -> StlResult<String> {
		Ok(format!(
			"/site/{}/content/{}{}",
			site.id,
			content.id,
			local_suffix(is_local)
		))
	}

	async fn channel_url(
		&self,
		site: &Site,
		channel: &Channel,
		is_local: bool,
	) -> StlResult<String> {
		Ok(format!(
			"/site/{}/channel/{}{}",
			site.id,
			channel.id,
			local_suffix(is_local)
		))
	}

	async fn file_url(&self, site: &Site, template_id: i32, is_local: bool) -> StlResult<String> {
		Ok(format!(
			"/site/{}/file/{}{}",
			site.id,
			template_id,
			local_suffix(is_local)
		))
	}
}

fn local_suffix(is_local: bool) -> &'static str {
	if is_local { "?preview" } else { "" }
}

/// Channel repository backed by a fixed id set, counting every lookup.
#[derive(Debug)]
pub struct FakeChannels {
	known: Vec<i32>,
	lookups: AtomicUsize,
}

impl FakeChannels {
	pub fn new(known: &[i32]) -> Self {
		Self {
			known: known.to_vec(),
			lookups: AtomicUsize::new(0),
		}
	}

	pub fn lookup_count(&self) -> usize {
		self.lookups.load(Ordering::SeqCst)
	}
}

impl ChannelRepository for FakeChannels {
	async fn channel(&self, channel_id: i32) -> StlResult<Option<Channel>> {
		self.lookups.fetch_add(1, Ordering::SeqCst);
		Ok(self
			.known
			.contains(&channel_id)
			.then(|| sample_channel(channel_id)))
	}
}

/// Repository whose lookups always fail, for error propagation tests.
#[derive(Debug, Default)]
pub struct FailingChannels;

impl ChannelRepository for FailingChannels {
	async fn channel(&self, channel_id: i32) -> StlResult<Option<Channel>> {
		Err(StlError::ChannelLookup {
			id: channel_id,
			reason: "connection refused".to_string(),
		})
	}
}
