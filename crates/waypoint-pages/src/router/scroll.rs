//! Scroll restoration after navigation.

use super::error::HistoryError;

/// Where to scroll after a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollTarget {
	/// The element with this id.
	Element(String),
	Top,
}

impl ScrollTarget {
	/// `#section` targets the element `section`; an empty hash targets the top.
	pub fn from_hash(hash: &str) -> Self {
		let id = hash.strip_prefix('#').unwrap_or(hash);
		if id.is_empty() {
			return Self::Top;
		}
		match urlencoding::decode(id) {
			Ok(decoded) => Self::Element(decoded.into_owned()),
			Err(_) => Self::Element(id.to_string()),
		}
	}
}

/// Scrolls to the target of `hash` on the next tick, falling back to the
/// top of the page when no such element exists.
#[cfg(target_arch = "wasm32")]
pub fn restore_scroll(hash: &str) -> Result<(), HistoryError> {
	use wasm_bindgen::JsCast;
	use wasm_bindgen::prelude::*;

	use super::history::js_error;

	let window =
		web_sys::window().ok_or_else(|| HistoryError::Unavailable("no window object".into()))?;
	let target = ScrollTarget::from_hash(hash);

	let callback = Closure::once_into_js(move || {
		let Some(window) = web_sys::window() else {
			return;
		};
		let element = match &target {
			ScrollTarget::Element(id) => window
				.document()
				.and_then(|document| document.get_element_by_id(id)),
			ScrollTarget::Top => None,
		};
		match element {
			Some(element) => element.scroll_into_view(),
			None => window.scroll_to_with_x_and_y(0.0, 0.0),
		}
	});

	window
		.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), 0)
		.map_err(js_error)?;
	Ok(())
}

/// Outside the browser there is nothing to scroll.
#[cfg(not(target_arch = "wasm32"))]
pub fn restore_scroll(hash: &str) -> Result<(), HistoryError> {
	tracing::trace!(scroll_target = ?ScrollTarget::from_hash(hash), "scroll restoration skipped");
	Ok(())
}
