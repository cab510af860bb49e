use std::collections::HashMap;

use crate::element::inner_markup;
use crate::element::is_element;
use crate::matcher::match_elements;

/// Child element shown while an ajax-rendered container is loading.
pub const LOADING: &str = "stl:loading";
/// Child element rendered when a condition holds.
pub const YES: &str = "stl:yes";
pub const YES_ALT: &str = "stl:isYes";
/// Child element rendered when a condition fails.
pub const NO: &str = "stl:no";
pub const NO_ALT: &str = "stl:isNo";

/// Split a container's inner markup into its loading slot and the remaining
/// body. Without a loading child the body is the markup unchanged. When
/// several loading children exist the last one wins (historical behavior,
/// not a supported authoring pattern).
pub fn extract_loading(markup: &str) -> (String, String) {
	let mut loading = String::new();
	let mut body = String::new();

	for token in match_elements(markup) {
		if is_element(&token.text, LOADING) {
			loading = inner_markup(&token.text);
			body = markup.replace(&token.text, "");
		}
	}
	if loading.is_empty() && body.is_empty() {
		body = markup.to_string();
	}

	(trimmed(&loading), trimmed(&body))
}

/// Extract the yes and no slots from a container's inner markup. When
/// neither is present (or both decompose to empty), the whole markup becomes
/// the yes slot. Duplicate children follow the same last-wins quirk as
/// [`extract_loading`].
pub fn extract_yes_no(markup: &str) -> (String, String) {
	let mut yes = String::new();
	let mut no = String::new();

	for token in match_elements(markup) {
		if is_element(&token.text, YES) || is_element(&token.text, YES_ALT) {
			yes = inner_markup(&token.text);
		} else if is_element(&token.text, NO) || is_element(&token.text, NO_ALT) {
			no = inner_markup(&token.text);
		}
	}
	if yes.is_empty() && no.is_empty() {
		yes = markup.to_string();
	}

	(trimmed(&yes), trimmed(&no))
}

/// Extract all three conditional slots. When none of the aliases appear, the
/// whole markup becomes the yes slot.
pub fn extract_loading_yes_no(markup: &str) -> (String, String, String) {
	let mut loading = String::new();
	let mut yes = String::new();
	let mut no = String::new();

	for token in match_elements(markup) {
		if is_element(&token.text, LOADING) {
			loading = inner_markup(&token.text);
		} else if is_element(&token.text, YES) || is_element(&token.text, YES_ALT) {
			yes = inner_markup(&token.text);
		} else if is_element(&token.text, NO) || is_element(&token.text, NO_ALT) {
			no = inner_markup(&token.text);
		}
	}
	if loading.is_empty() && yes.is_empty() && no.is_empty() {
		yes = markup.to_string();
	}

	(trimmed(&loading), trimmed(&yes), trimmed(&no))
}

/// Generic named-slot extraction: every requested name maps to the inner
/// markup of its last matching child, or empty when absent. Values are not
/// trimmed.
pub fn extract_named(markup: &str, names: &[&str]) -> HashMap<String, String> {
	let mut slots: HashMap<String, String> = names
		.iter()
		.map(|name| ((*name).to_string(), String::new()))
		.collect();
	if markup.is_empty() {
		return slots;
	}

	for token in match_elements(markup) {
		for name in names {
			if is_element(&token.text, name) {
				slots.insert((*name).to_string(), inner_markup(&token.text));
			}
		}
	}
	slots
}

fn trimmed(text: &str) -> String {
	text.trim().to_string()
}
