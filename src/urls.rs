//! Route templates and the parameter codec.
//!
//! # Examples
//!
//! ```
//! use waypoint::urls::{PathMatcher, parse_search, serialize_search};
//!
//! let matcher = PathMatcher::compile("/users/:id/posts/:postId").unwrap();
//! let params = matcher.match_path("/users/42/posts/abc").unwrap();
//! assert_eq!(params.get_as::<u64>("id").unwrap(), 42);
//!
//! let search = parse_search("?page=2&q=rust");
//! assert_eq!(serialize_search(&search), "?page=2&q=rust");
//! ```

pub use waypoint_urls::*;
