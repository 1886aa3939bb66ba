//! Router configuration.
//!
//! [`RouterConfig`] is fixed for the lifetime of a [`Router`](super::Router).
//! Every field has a default, so a partial JSON document is a valid config:
//!
//! ```
//! use waypoint_pages::router::RouterConfig;
//!
//! let config = RouterConfig::from_json(r#"{ "hash_mode": true }"#).unwrap();
//! assert!(config.hash_mode);
//! assert_eq!(config.max_redirects, 8);
//! assert!(config.scroll_restoration);
//! ```

use serde::{Deserialize, Serialize};

use super::history::HistoryEvent;

/// Default bound on consecutive guard redirects for a single resolution.
pub const DEFAULT_MAX_REDIRECTS: usize = 8;

fn default_max_redirects() -> usize {
	DEFAULT_MAX_REDIRECTS
}

fn default_true() -> bool {
	true
}

/// How the virtual location is stored in the host URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingMode {
	/// The location is the real `pathname + search + hash`.
	Path,
	/// The location lives in the fragment: `#/path?query#hash`.
	Hash,
}

impl RoutingMode {
	/// Host signal that announces a location change in this mode.
	pub fn history_event(self) -> HistoryEvent {
		match self {
			Self::Path => HistoryEvent::PopState,
			Self::Hash => HistoryEvent::HashChange,
		}
	}
}

/// Router settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterConfig {
	/// Keep the location in the URL fragment instead of the real path.
	#[serde(default)]
	pub hash_mode: bool,

	/// Maximum guard redirects followed while resolving one navigation.
	#[serde(default = "default_max_redirects")]
	pub max_redirects: usize,

	/// Scroll to the hash target (or the top) after an approved navigation.
	#[serde(default = "default_true")]
	pub scroll_restoration: bool,
}

impl Default for RouterConfig {
	fn default() -> Self {
		Self {
			hash_mode: false,
			max_redirects: DEFAULT_MAX_REDIRECTS,
			scroll_restoration: true,
		}
	}
}

impl RouterConfig {
	/// Path-mode defaults.
	pub fn new() -> Self {
		Self::default()
	}

	/// Hash-mode defaults.
	pub fn hash() -> Self {
		Self::default().with_hash_mode(true)
	}

	/// Load a config from JSON; missing fields take their defaults.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}

	pub fn with_hash_mode(mut self, hash_mode: bool) -> Self {
		self.hash_mode = hash_mode;
		self
	}

	pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
		self.max_redirects = max_redirects;
		self
	}

	pub fn with_scroll_restoration(mut self, scroll_restoration: bool) -> Self {
		self.scroll_restoration = scroll_restoration;
		self
	}

	/// The routing mode selected by [`hash_mode`](Self::hash_mode).
	pub fn mode(&self) -> RoutingMode {
		if self.hash_mode {
			RoutingMode::Hash
		} else {
			RoutingMode::Path
		}
	}
}
