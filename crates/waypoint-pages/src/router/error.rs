//! Router error types.

use thiserror::Error;
use waypoint_urls::PatternError;

/// Failure of the host history API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
	/// No history or location object is reachable (e.g. no `window`).
	#[error("History API unavailable: {0}")]
	Unavailable(String),
	/// The host rejected the operation.
	#[error("History operation failed: {0}")]
	Operation(String),
}

/// Rejection raised by a route guard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Route condition failed: {message}")]
pub struct ConditionError {
	message: String,
}

impl ConditionError {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}

	pub fn message(&self) -> &str {
		&self.message
	}
}

/// Rejection raised by a component or data loader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Route loader failed: {message}")]
pub struct LoadError {
	message: String,
}

impl LoadError {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}

	pub fn message(&self) -> &str {
		&self.message
	}
}

/// Why a matched route shows its error component instead of rendering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
	/// A guard rejected the navigation.
	#[error(transparent)]
	Condition(#[from] ConditionError),
	/// The component or data loader rejected.
	#[error(transparent)]
	Load(#[from] LoadError),
}

impl ViewError {
	pub fn message(&self) -> &str {
		match self {
			Self::Condition(err) => err.message(),
			Self::Load(err) => err.message(),
		}
	}
}

/// Error type for router operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
	/// A route template failed to compile.
	#[error(transparent)]
	Pattern(#[from] PatternError),
	/// A navigation path carried its own query or fragment.
	#[error("Invalid navigation path '{0}': use query_params and hash options instead of '?' or '#'")]
	InvalidPath(String),
	/// The host history rejected a write or traversal.
	#[error("Navigation failed: {0}")]
	NavigationFailed(#[from] HistoryError),
	/// Guards kept redirecting past the configured bound.
	#[error("Redirect limit of {limit} exceeded: {}", chain.join(" -> "))]
	RedirectLoop {
		/// Configured `max_redirects`.
		limit: usize,
		/// Visited locations, oldest first, ending with the rejected target.
		chain: Vec<String>,
	},
}
