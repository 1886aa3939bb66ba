//! Location State.
//!
//! [`LocationState`] is the router-owned reactive cell holding the current
//! [`RouterLocation`]. It is replaced wholesale on every navigation, so an
//! observer never sees a path from one navigation paired with the search or
//! hash of another.

use std::fmt;
use std::rc::{Rc, Weak};

use waypoint_core::{Signal, Subscription};

use super::config::RoutingMode;
use super::error::{HistoryError, RouterError};
use super::history::{History, ListenerHandle};

/// Snapshot of the virtual location.
///
/// `path` never contains `?` or `#`; `search` is empty or starts with `?`;
/// `hash` is empty or starts with `#`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouterLocation {
	path: String,
	search: String,
	hash: String,
}

impl Default for RouterLocation {
	fn default() -> Self {
		Self {
			path: "/".to_string(),
			search: String::new(),
			hash: String::new(),
		}
	}
}

impl RouterLocation {
	/// Builds a location from its parts.
	///
	/// `search` and `hash` gain their `?`/`#` prefix when missing; a bare
	/// `?` or `#` is treated as empty.
	pub fn new(
		path: impl Into<String>,
		search: impl AsRef<str>,
		hash: impl AsRef<str>,
	) -> Result<Self, RouterError> {
		let path = path.into();
		if path.contains(['?', '#']) {
			return Err(RouterError::InvalidPath(path));
		}
		Ok(Self {
			path: normalize_path(path),
			search: with_prefix('?', search.as_ref()),
			hash: with_prefix('#', hash.as_ref()),
		})
	}

	/// Splits a raw `path?search#hash` string.
	///
	/// The fragment starts at the first `#`; the query at the first `?`
	/// before it.
	pub fn from_url(url: &str) -> Self {
		let (rest, hash) = url.split_once('#').unwrap_or((url, ""));
		let (path, search) = rest.split_once('?').unwrap_or((rest, ""));
		Self {
			path: normalize_path(path.to_string()),
			search: with_prefix('?', search),
			hash: with_prefix('#', hash),
		}
	}

	pub fn path(&self) -> &str {
		&self.path
	}

	/// Query string including the leading `?`, or empty.
	pub fn search(&self) -> &str {
		&self.search
	}

	/// Fragment including the leading `#`, or empty.
	pub fn hash(&self) -> &str {
		&self.hash
	}

	/// `path + search + hash`.
	pub fn href(&self) -> String {
		format!("{}{}{}", self.path, self.search, self.hash)
	}
}

impl fmt::Display for RouterLocation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}{}{}", self.path, self.search, self.hash)
	}
}

fn normalize_path(path: String) -> String {
	if path.is_empty() {
		"/".to_string()
	} else {
		path
	}
}

fn with_prefix(prefix: char, value: &str) -> String {
	let value = value.strip_prefix(prefix).unwrap_or(value);
	if value.is_empty() {
		String::new()
	} else {
		format!("{}{}", prefix, value)
	}
}

/// Decomposes a hash-mode fragment into `[path, search, hash]`.
///
/// `"#/a?x=1#top"` becomes `["/a", "?x=1", "#top"]`. Without a `?`, the
/// path ends at the first inner `#`. An empty input yields three empty
/// strings.
pub fn split_hash_location(hash: &str) -> [String; 3] {
	let payload = hash.strip_prefix('#').unwrap_or(hash);

	let (path, query, fragment) = match payload.split_once('?') {
		Some((path, rest)) => {
			let (query, fragment) = rest.split_once('#').unwrap_or((rest, ""));
			(path, query, fragment)
		}
		None => {
			let (path, fragment) = payload.split_once('#').unwrap_or((payload, ""));
			(path, "", fragment)
		}
	};

	[
		path.to_string(),
		with_prefix('?', query),
		with_prefix('#', fragment),
	]
}

/// Reactive holder of the current [`RouterLocation`].
///
/// Clones share the same cell.
#[derive(Clone)]
pub struct LocationState {
	signal: Signal<RouterLocation>,
	mode: RoutingMode,
}

impl LocationState {
	pub fn new(initial: RouterLocation, mode: RoutingMode) -> Self {
		Self {
			signal: Signal::new(initial),
			mode,
		}
	}

	/// Initializes from the host's current URL.
	pub fn from_history(history: &dyn History, mode: RoutingMode) -> Result<Self, HistoryError> {
		let url = history.location()?;
		Ok(Self::new(Self::derive(&url, mode), mode))
	}

	/// Maps the real host URL to the virtual location for `mode`.
	pub fn derive(url: &RouterLocation, mode: RoutingMode) -> RouterLocation {
		match mode {
			RoutingMode::Path => url.clone(),
			RoutingMode::Hash => {
				let [path, search, hash] = split_hash_location(url.hash());
				RouterLocation {
					path: normalize_path(path),
					search,
					hash,
				}
			}
		}
	}

	pub fn mode(&self) -> RoutingMode {
		self.mode
	}

	pub fn get(&self) -> RouterLocation {
		self.signal.get()
	}

	/// Shared snapshot, unaffected by later navigations.
	pub fn snapshot(&self) -> Rc<RouterLocation> {
		self.signal.snapshot()
	}

	/// Replaces the location and notifies observers.
	pub fn set(&self, location: RouterLocation) {
		tracing::debug!(location = %location, "location updated");
		self.signal.set(location);
	}

	/// Observes every replacement.
	pub fn subscribe<F>(&self, observer: F) -> Subscription
	where
		F: Fn(&RouterLocation) + 'static,
	{
		self.signal.subscribe(observer)
	}

	pub fn signal(&self) -> &Signal<RouterLocation> {
		&self.signal
	}

	/// Re-reads the host URL.
	pub fn sync_from(&self, history: &dyn History) -> Result<(), HistoryError> {
		let url = history.location()?;
		self.set(Self::derive(&url, self.mode));
		Ok(())
	}

	/// Follows host-initiated changes (traversal, fragment edits).
	///
	/// Listens to `popstate` in path mode and `hashchange` in hash mode.
	/// The history is held weakly.
	pub fn attach(&self, history: &Rc<dyn History>) -> Result<ListenerHandle, HistoryError> {
		let state = self.clone();
		let weak: Weak<dyn History> = Rc::downgrade(history);
		history.listen(
			self.mode.history_event(),
			Rc::new(move || {
				let Some(history) = weak.upgrade() else {
					return;
				};
				if let Err(err) = state.sync_from(history.as_ref()) {
					tracing::warn!(error = %err, "failed to read host location");
				}
			}),
		)
	}
}

impl fmt::Debug for LocationState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LocationState")
			.field("location", &self.snapshot())
			.field("mode", &self.mode)
			.finish()
	}
}
