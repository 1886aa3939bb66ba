//! Same-origin link interception.
//!
//! [`Router::follow_link`] decides whether an anchor click stays in the
//! application; `intercept_links` (wasm32 only) wires that decision to a
//! delegated `click` listener on the document.

use super::config::RoutingMode;
use super::core::Router;
use super::error::RouterError;
use super::history::NavigationType;
use super::location::{LocationState, RouterLocation};

/// The resolved parts of a clicked anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget {
	pub origin: String,
	pub path: String,
	pub search: String,
	pub hash: String,
}

impl LinkTarget {
	/// Splits `url` (`path?search#hash`) for `origin`.
	pub fn new(origin: impl Into<String>, url: &str) -> Self {
		let location = RouterLocation::from_url(url);
		Self {
			origin: origin.into(),
			path: location.path().to_string(),
			search: location.search().to_string(),
			hash: location.hash().to_string(),
		}
	}
}

/// What [`Router::follow_link`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
	/// Left to the browser.
	External,
	/// Already at the target; nothing written.
	Unchanged,
	/// Pushed a new entry.
	Navigated,
}

impl<C: Clone + 'static> Router<C> {
	/// Handles a click on a link to `target` from a page at `current_origin`.
	///
	/// Other origins are left to the browser, and so are links to another
	/// document in hash mode.
	pub fn follow_link(
		&self,
		target: &LinkTarget,
		current_origin: &str,
	) -> Result<LinkOutcome, RouterError> {
		if target.origin != current_origin {
			return Ok(LinkOutcome::External);
		}

		let url = RouterLocation::new(&target.path, &target.search, &target.hash)?;
		let mode = self.location().mode();
		if mode == RoutingMode::Hash {
			let current = self.history().location()?;
			if current.path() != url.path() || current.search() != url.search() {
				return Ok(LinkOutcome::External);
			}
		}

		let location = LocationState::derive(&url, mode);
		if *self.location().snapshot() == location {
			return Ok(LinkOutcome::Unchanged);
		}

		self.commit(location, NavigationType::Push)?;
		Ok(LinkOutcome::Navigated)
	}
}

/// Routes same-origin anchor clicks through `router`.
///
/// Modified clicks, non-primary buttons, `download` links and links with a
/// non-`_self` target keep their default behavior.
#[cfg(target_arch = "wasm32")]
pub fn intercept_links<C: Clone + 'static>(
	router: &Router<C>,
) -> Result<super::history::ListenerHandle, super::error::HistoryError> {
	use std::rc::Rc;

	use wasm_bindgen::JsCast;
	use wasm_bindgen::prelude::*;
	use web_sys::{Element, HtmlAnchorElement, MouseEvent};

	use super::error::HistoryError;
	use super::history::{ListenerHandle, js_error};

	let window =
		web_sys::window().ok_or_else(|| HistoryError::Unavailable("no window object".into()))?;
	let document = window
		.document()
		.ok_or_else(|| HistoryError::Unavailable("no document object".into()))?;

	let weak = Rc::downgrade(&router.inner);
	let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
		if event.default_prevented()
			|| event.button() != 0
			|| event.meta_key()
			|| event.ctrl_key()
			|| event.shift_key()
			|| event.alt_key()
		{
			return;
		}

		let Some(anchor) = event
			.target()
			.and_then(|target| target.dyn_into::<Element>().ok())
			.and_then(|element| element.closest("a").ok().flatten())
			.and_then(|element| element.dyn_into::<HtmlAnchorElement>().ok())
		else {
			return;
		};

		let frame = anchor.target();
		if (!frame.is_empty() && frame != "_self") || anchor.has_attribute("download") {
			return;
		}

		let Some(inner) = weak.upgrade() else {
			return;
		};
		let Some(current_origin) = web_sys::window().and_then(|w| w.location().origin().ok())
		else {
			return;
		};

		let target = LinkTarget {
			origin: anchor.origin(),
			path: anchor.pathname(),
			search: anchor.search(),
			hash: anchor.hash(),
		};
		match (Router { inner }).follow_link(&target, &current_origin) {
			Ok(LinkOutcome::External) => {}
			Ok(_) => event.prevent_default(),
			Err(err) => tracing::warn!(error = %err, "link navigation failed"),
		}
	}) as Box<dyn FnMut(_)>);

	document
		.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
		.map_err(js_error)?;

	Ok(ListenerHandle::new(move || {
		let _ = document
			.remove_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
		drop(closure);
	}))
}
