//! Host history integration.
//!
//! The router never touches the browser directly; it talks to a [`History`]
//! implementation. [`MemoryHistory`] keeps an in-process entry stack and is
//! what native builds and tests use. `BrowserHistory` (wasm32 only) wraps
//! `window.history` and `window.location`.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use super::error::HistoryError;
use super::location::RouterLocation;

/// Navigation type for history writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationType {
	/// Adds a new entry (`pushState`).
	Push,
	/// Mutates the current entry (`replaceState`).
	Replace,
}

/// Host signals a [`History`] can deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryEvent {
	/// Entry traversal (`popstate`).
	PopState,
	/// Fragment change (`hashchange`).
	HashChange,
}

impl HistoryEvent {
	/// DOM event name.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::PopState => "popstate",
			Self::HashChange => "hashchange",
		}
	}
}

/// Callback registered with [`History::listen`].
pub type HistoryListener = Rc<dyn Fn()>;

/// The host history stack.
///
/// Writes (`push_entry`, `replace_entry`) never fire events; traversals do,
/// asynchronously in browsers and synchronously in [`MemoryHistory`].
pub trait History {
	/// The real URL of the current entry.
	fn location(&self) -> Result<RouterLocation, HistoryError>;

	/// Adds an entry for `url`. A `url` starting with `#` keeps the current
	/// path and search.
	fn push_entry(&self, url: &str) -> Result<(), HistoryError>;

	/// Rewrites the current entry to `url`.
	fn replace_entry(&self, url: &str) -> Result<(), HistoryError>;

	fn go_back(&self) -> Result<(), HistoryError>;

	fn go_forward(&self) -> Result<(), HistoryError>;

	/// Registers `listener` for `event` until the handle is dropped.
	fn listen(
		&self,
		event: HistoryEvent,
		listener: HistoryListener,
	) -> Result<ListenerHandle, HistoryError>;
}

/// Registration returned by [`History::listen`].
///
/// Dropping the handle removes the listener.
#[must_use = "dropping a ListenerHandle removes the listener immediately"]
pub struct ListenerHandle {
	remove: Option<Box<dyn FnOnce()>>,
}

impl ListenerHandle {
	pub fn new(remove: impl FnOnce() + 'static) -> Self {
		Self {
			remove: Some(Box::new(remove)),
		}
	}

	/// Keep the listener installed for the lifetime of the host.
	pub fn forget(mut self) {
		self.remove = None;
	}
}

impl Drop for ListenerHandle {
	fn drop(&mut self) {
		if let Some(remove) = self.remove.take() {
			remove();
		}
	}
}

impl fmt::Debug for ListenerHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ListenerHandle")
			.field("active", &self.remove.is_some())
			.finish()
	}
}

fn resolve_url(current: &RouterLocation, url: &str) -> RouterLocation {
	if url.starts_with('#') {
		RouterLocation::from_url(&format!("{}{}{}", current.path(), current.search(), url))
	} else {
		RouterLocation::from_url(url)
	}
}

struct Entries {
	stack: Vec<RouterLocation>,
	index: usize,
}

struct Listeners {
	next_id: u64,
	entries: Vec<(u64, HistoryEvent, HistoryListener)>,
}

/// In-memory history stack.
///
/// Clones share the same stack and listeners.
#[derive(Clone)]
pub struct MemoryHistory {
	entries: Rc<RefCell<Entries>>,
	listeners: Rc<RefCell<Listeners>>,
	traversals: Rc<Cell<usize>>,
}

impl MemoryHistory {
	/// Creates a stack with a single entry for `initial_url`.
	pub fn new(initial_url: &str) -> Self {
		Self {
			entries: Rc::new(RefCell::new(Entries {
				stack: vec![RouterLocation::from_url(initial_url)],
				index: 0,
			})),
			listeners: Rc::new(RefCell::new(Listeners {
				next_id: 0,
				entries: Vec::new(),
			})),
			traversals: Rc::new(Cell::new(0)),
		}
	}

	/// Hrefs of all entries, oldest first.
	pub fn entries(&self) -> Vec<String> {
		self.entries
			.borrow()
			.stack
			.iter()
			.map(RouterLocation::href)
			.collect()
	}

	/// Position of the current entry.
	pub fn index(&self) -> usize {
		self.entries.borrow().index
	}

	pub fn len(&self) -> usize {
		self.entries.borrow().stack.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.borrow().stack.is_empty()
	}

	/// Number of traversals performed so far.
	pub fn traversals(&self) -> usize {
		self.traversals.get()
	}

	/// Moves `delta` entries. Out-of-range moves are ignored.
	///
	/// Fires `PopState`, then `HashChange` when the fragment differs.
	pub fn go(&self, delta: isize) -> Result<(), HistoryError> {
		let (previous_hash, current_hash) = {
			let mut entries = self.entries.borrow_mut();
			let Some(target) = entries
				.index
				.checked_add_signed(delta)
				.filter(|target| *target < entries.stack.len())
			else {
				return Ok(());
			};
			if target == entries.index {
				return Ok(());
			}
			let previous = entries.stack[entries.index].hash().to_string();
			entries.index = target;
			(previous, entries.stack[target].hash().to_string())
		};

		self.traversals.set(self.traversals.get() + 1);
		self.dispatch(HistoryEvent::PopState);
		if previous_hash != current_hash {
			self.dispatch(HistoryEvent::HashChange);
		}
		Ok(())
	}

	/// Simulates the user editing the fragment in the address bar.
	///
	/// Pushes an entry with the new fragment and fires `PopState` and
	/// `HashChange`.
	pub fn navigate_fragment(&self, hash: &str) -> Result<(), HistoryError> {
		let fragment = if hash.starts_with('#') {
			hash.to_string()
		} else {
			format!("#{}", hash)
		};
		let changed = {
			let current = self.location()?;
			current.hash() != fragment
		};
		self.push_entry(&fragment)?;
		self.dispatch(HistoryEvent::PopState);
		if changed {
			self.dispatch(HistoryEvent::HashChange);
		}
		Ok(())
	}

	fn dispatch(&self, event: HistoryEvent) {
		// Collected first so listeners may navigate or unregister.
		let listeners: Vec<HistoryListener> = self
			.listeners
			.borrow()
			.entries
			.iter()
			.filter(|(_, kind, _)| *kind == event)
			.map(|(_, _, listener)| Rc::clone(listener))
			.collect();

		tracing::debug!(event = event.as_str(), listeners = listeners.len(), "history event");
		for listener in listeners {
			listener();
		}
	}
}

impl Default for MemoryHistory {
	fn default() -> Self {
		Self::new("/")
	}
}

impl History for MemoryHistory {
	fn location(&self) -> Result<RouterLocation, HistoryError> {
		let entries = self.entries.borrow();
		entries
			.stack
			.get(entries.index)
			.cloned()
			.ok_or_else(|| HistoryError::Unavailable("empty history stack".to_string()))
	}

	fn push_entry(&self, url: &str) -> Result<(), HistoryError> {
		let mut entries = self.entries.borrow_mut();
		let index = entries.index;
		let next = resolve_url(&entries.stack[index], url);
		// A push discards any forward entries.
		entries.stack.truncate(index + 1);
		entries.stack.push(next);
		entries.index = index + 1;
		Ok(())
	}

	fn replace_entry(&self, url: &str) -> Result<(), HistoryError> {
		let mut entries = self.entries.borrow_mut();
		let index = entries.index;
		let next = resolve_url(&entries.stack[index], url);
		entries.stack[index] = next;
		Ok(())
	}

	fn go_back(&self) -> Result<(), HistoryError> {
		self.go(-1)
	}

	fn go_forward(&self) -> Result<(), HistoryError> {
		self.go(1)
	}

	fn listen(
		&self,
		event: HistoryEvent,
		listener: HistoryListener,
	) -> Result<ListenerHandle, HistoryError> {
		let id = {
			let mut listeners = self.listeners.borrow_mut();
			let id = listeners.next_id;
			listeners.next_id += 1;
			listeners.entries.push((id, event, listener));
			id
		};

		let weak: Weak<RefCell<Listeners>> = Rc::downgrade(&self.listeners);
		Ok(ListenerHandle::new(move || {
			if let Some(listeners) = weak.upgrade() {
				listeners
					.borrow_mut()
					.entries
					.retain(|(entry_id, _, _)| *entry_id != id);
			}
		}))
	}
}

impl fmt::Debug for MemoryHistory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MemoryHistory")
			.field("entries", &self.entries())
			.field("index", &self.index())
			.finish()
	}
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserHistory;

#[cfg(target_arch = "wasm32")]
mod browser {
	use wasm_bindgen::JsCast;
	use wasm_bindgen::prelude::*;
	use web_sys::{Event, Window};

	use super::{History, HistoryError, HistoryEvent, HistoryListener, ListenerHandle};
	use crate::router::location::RouterLocation;

	pub(crate) fn js_error(value: JsValue) -> HistoryError {
		HistoryError::Operation(
			value
				.as_string()
				.unwrap_or_else(|| format!("{:?}", value)),
		)
	}

	/// `window.history` / `window.location` backed history.
	#[derive(Debug, Clone)]
	pub struct BrowserHistory {
		window: Window,
	}

	impl BrowserHistory {
		pub fn new() -> Result<Self, HistoryError> {
			let window = web_sys::window()
				.ok_or_else(|| HistoryError::Unavailable("no window object".to_string()))?;
			Ok(Self { window })
		}

		fn history(&self) -> Result<web_sys::History, HistoryError> {
			self.window.history().map_err(js_error)
		}
	}

	impl History for BrowserHistory {
		fn location(&self) -> Result<RouterLocation, HistoryError> {
			let location = self.window.location();
			let path = location.pathname().map_err(js_error)?;
			let search = location.search().map_err(js_error)?;
			let hash = location.hash().map_err(js_error)?;
			Ok(RouterLocation::from_url(&format!("{}{}{}", path, search, hash)))
		}

		fn push_entry(&self, url: &str) -> Result<(), HistoryError> {
			self.history()?
				.push_state_with_url(&JsValue::NULL, "", Some(url))
				.map_err(js_error)
		}

		fn replace_entry(&self, url: &str) -> Result<(), HistoryError> {
			self.history()?
				.replace_state_with_url(&JsValue::NULL, "", Some(url))
				.map_err(js_error)
		}

		fn go_back(&self) -> Result<(), HistoryError> {
			self.history()?.back().map_err(js_error)
		}

		fn go_forward(&self) -> Result<(), HistoryError> {
			self.history()?.forward().map_err(js_error)
		}

		fn listen(
			&self,
			event: HistoryEvent,
			listener: HistoryListener,
		) -> Result<ListenerHandle, HistoryError> {
			let closure = Closure::wrap(Box::new(move |_event: Event| {
				listener();
			}) as Box<dyn FnMut(_)>);

			self.window
				.add_event_listener_with_callback(event.as_str(), closure.as_ref().unchecked_ref())
				.map_err(js_error)?;

			let window = self.window.clone();
			Ok(ListenerHandle::new(move || {
				let _ = window.remove_event_listener_with_callback(
					event.as_str(),
					closure.as_ref().unchecked_ref(),
				);
				drop(closure);
			}))
		}
	}
}

#[cfg(target_arch = "wasm32")]
pub(crate) use browser::js_error;
