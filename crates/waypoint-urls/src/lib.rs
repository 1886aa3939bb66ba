//! # Waypoint URLs
//!
//! URL-level building blocks of the Waypoint router:
//!
//! - [`pattern`]: compiles route templates such as `/users/:id/posts/:postId`
//!   into anchored regex matchers with an ordered key list.
//! - [`params`]: parses and serializes query strings, extracts path
//!   parameters and applies numeric coercion.
//! - [`error`]: error types for template compilation and typed parameter access.
//!
//! ## Example
//!
//! ```
//! use waypoint_urls::{ParamValue, PathMatcher, parse_search};
//!
//! let matcher = PathMatcher::compile("/users/:id/posts/:postId").unwrap();
//! let params = matcher.match_path("/users/42/posts/abc").unwrap();
//!
//! assert_eq!(params.get("id"), Some(&ParamValue::Number(42.0)));
//! assert_eq!(params.get("postId"), Some(&ParamValue::from("abc")));
//!
//! let search = parse_search("?page=2&sort=name");
//! assert_eq!(search.get_as::<u32>("page").unwrap(), 2);
//! ```

pub mod error;
pub mod params;
pub mod pattern;

pub use error::{PathError, PatternError};
pub use params::{
	ParamMap, ParamValue, PathParams, SearchParams, append_search, are_superficially_equal,
	extract_path_params, parse_search, serialize_search,
};
pub use pattern::PathMatcher;
