use serde::Deserialize;
use serde::Serialize;

/// Attribute value handlers use for the sequential-position expression, as in
/// `<stl:content type="ItemIndex+2">`.
pub const ITEM_INDEX: &str = "ItemIndex";

/// What kind of iteration the render pipeline is currently inside.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParseType {
	#[default]
	Undefined,
	Channel,
	Content,
	SqlContent,
	Site,
	Each,
}

/// The current item of one iteration kind, exposing its zero-based key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerItem {
	pub key: i32,
}

/// Per-type current-item holders, owned and filled by the render pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemContainer {
	pub channel_item: Option<ContainerItem>,
	pub content_item: Option<ContainerItem>,
	pub sql_item: Option<ContainerItem>,
	pub site_item: Option<ContainerItem>,
	pub each_item: Option<ContainerItem>,
}

/// Ambient render-time state read by the resolvers. The engine never mutates
/// it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseContext {
	pub context_type: ParseType,
	/// Offset contributed by earlier pages of a paged list.
	pub page_item_index: i32,
	pub item_container: ItemContainer,
}

/// Sequential one-based position of the current item:
/// `page_item_index + key + 1`, where the key comes from the holder matching
/// the context type. An unrecognized context type (or an unset holder)
/// contributes zero.
pub fn item_index(context: &ParseContext) -> i32 {
	let container = &context.item_container;
	let key = match context.context_type {
		ParseType::Channel => container.channel_item.map_or(0, |item| item.key),
		ParseType::Content => container.content_item.map_or(0, |item| item.key),
		ParseType::SqlContent => container.sql_item.map_or(0, |item| item.key),
		ParseType::Site => container.site_item.map_or(0, |item| item.key),
		ParseType::Each => container.each_item.map_or(0, |item| item.key),
		ParseType::Undefined => 0,
	};
	context.page_item_index + key + 1
}

/// Apply an inline offset expression such as `ItemIndex+2` to a resolved
/// index. An expression with neither `+` nor `-` leaves the base unchanged;
/// the step after a single `+`/`-` parses with a default of 1, so a
/// malformed step still increments or decrements.
pub fn adjust_index(base: i32, expression: &str) -> i32 {
	if !expression.contains('+') && !expression.contains('-') {
		return base;
	}

	let parts: Vec<&str> = expression.split('+').collect();
	if parts.len() == 2 {
		return base + parse_step(parts[1]);
	}

	let parts: Vec<&str> = expression.split('-').collect();
	if parts.len() == 2 {
		return base - parse_step(parts[1]);
	}

	base
}

fn parse_step(raw: &str) -> i32 {
	raw.trim().parse().unwrap_or(1)
}
