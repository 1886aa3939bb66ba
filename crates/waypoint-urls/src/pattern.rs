//! Route template compilation.
//!
//! Templates are made of `/`-separated segments:
//! - `users` - Literal segment, matched exactly
//! - `:id` - Named parameter, captures one path segment (no `/`)
//! - `:tab?` - Optional named parameter; a missing segment captures `null`
//! - `*` - Wildcard, last segment only, captures the rest of the path as `wild`;
//!   an empty rest (`/files` or `/files/`) captures `null`
//!
//! Every compiled pattern is anchored to the whole path and accepts one
//! optional trailing slash, so `/users/:id` matches both `/users/42` and
//! `/users/42/`.

use std::collections::HashSet;
use std::fmt;

use regex::{Regex, RegexBuilder};

use crate::error::PatternError;
use crate::params::{ParamMap, ParamValue, PathParams};

/// Maximum allowed length for a route template in bytes.
const MAX_TEMPLATE_LENGTH: usize = 1024;

/// Maximum allowed number of path segments in a route template.
const MAX_TEMPLATE_SEGMENTS: usize = 32;

/// Maximum allowed size for a compiled template regex (in bytes).
const MAX_REGEX_SIZE: usize = 1 << 20; // 1 MiB

/// Key under which the `*` wildcard is captured.
pub const WILDCARD_KEY: &str = "wild";

/// A compiled route template.
///
/// Built once per route when the router is constructed and immutable
/// afterwards. The number of keys always equals the number of capture groups
/// in the pattern, and keys are listed in template order.
#[derive(Debug, Clone)]
pub struct PathMatcher {
	/// The original template string.
	template: String,
	/// Compiled, anchored regex.
	pattern: Regex,
	/// Parameter names in template order.
	keys: Vec<String>,
}

impl PathMatcher {
	/// Compiles a route template.
	///
	/// # Errors
	///
	/// Returns [`PatternError`] if the template is malformed (missing leading
	/// `/`, empty/invalid/duplicate parameter names, wildcard not last) or
	/// exceeds the length/segment/regex size limits.
	pub fn compile(template: &str) -> Result<Self, PatternError> {
		if template.len() > MAX_TEMPLATE_LENGTH {
			return Err(PatternError::TooLong {
				length: template.len(),
				max: MAX_TEMPLATE_LENGTH,
			});
		}

		let Some(body) = template.strip_prefix('/') else {
			return Err(PatternError::MissingLeadingSlash {
				template: template.to_string(),
			});
		};

		let segments: Vec<&str> = body.split('/').collect();
		if segments.len() > MAX_TEMPLATE_SEGMENTS {
			return Err(PatternError::TooManySegments {
				count: segments.len(),
				max: MAX_TEMPLATE_SEGMENTS,
			});
		}

		let mut source = String::from("^");
		let mut keys: Vec<String> = Vec::new();
		let mut seen = HashSet::new();
		let last = segments.len() - 1;

		for (index, segment) in segments.iter().enumerate() {
			if *segment == "*" {
				if index != last {
					return Err(PatternError::MisplacedWildcard {
						template: template.to_string(),
					});
				}
				if !seen.insert(WILDCARD_KEY) {
					return Err(PatternError::DuplicateParam {
						template: template.to_string(),
						name: WILDCARD_KEY.to_string(),
					});
				}
				keys.push(WILDCARD_KEY.to_string());
				source.push_str("(?:/(.+?))?");
			} else if let Some(marker) = segment.strip_prefix(':') {
				let (name, optional) = match marker.strip_suffix('?') {
					Some(name) => (name, true),
					None => (marker, false),
				};
				Self::validate_name(template, index, name)?;
				if !seen.insert(name) {
					return Err(PatternError::DuplicateParam {
						template: template.to_string(),
						name: name.to_string(),
					});
				}
				keys.push(name.to_string());
				if optional {
					source.push_str("(?:/([^/]+?))?");
				} else {
					source.push_str("/([^/]+?)");
				}
			} else if segment.is_empty() && index == last {
				// Trailing slash (or the root template); covered by the optional `/` below.
			} else {
				source.push('/');
				source.push_str(&regex::escape(segment));
			}
		}

		source.push_str("/?$");

		let pattern = RegexBuilder::new(&source)
			.size_limit(MAX_REGEX_SIZE)
			.build()
			.map_err(|e| PatternError::Regex(e.to_string()))?;

		debug_assert_eq!(pattern.captures_len() - 1, keys.len());

		Ok(Self {
			template: template.to_string(),
			pattern,
			keys,
		})
	}

	fn validate_name(template: &str, segment: usize, name: &str) -> Result<(), PatternError> {
		if name.is_empty() {
			return Err(PatternError::EmptyParamName {
				template: template.to_string(),
				segment,
			});
		}

		let mut chars = name.chars();
		let valid_start = chars
			.next()
			.is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
		let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
		if !valid_start || !valid_rest {
			return Err(PatternError::InvalidParamName {
				template: template.to_string(),
				name: name.to_string(),
			});
		}
		Ok(())
	}

	/// Returns the original template string.
	pub fn template(&self) -> &str {
		&self.template
	}

	/// Returns the compiled regex.
	pub fn pattern(&self) -> &Regex {
		&self.pattern
	}

	/// Returns the parameter names in template order.
	pub fn keys(&self) -> &[String] {
		&self.keys
	}

	/// Checks if this template matches the given path.
	pub fn is_match(&self, path: &str) -> bool {
		self.pattern.is_match(path)
	}

	/// Matches `path` and extracts its parameters in one step.
	///
	/// Returns `None` when the path does not match. Captured segments are
	/// percent-decoded and coerced; a missing optional segment maps to
	/// [`ParamValue::Null`].
	pub fn match_path(&self, path: &str) -> Option<PathParams> {
		let captures = self.pattern.captures(path)?;

		let mut params = ParamMap::new();
		for (index, key) in self.keys.iter().enumerate() {
			let value = match captures.get(index + 1) {
				Some(capture) => {
					let raw = capture.as_str();
					let decoded = urlencoding::decode(raw)
						.map(|decoded| decoded.into_owned())
						.unwrap_or_else(|_| raw.to_string());
					ParamValue::coerce(&decoded)
				}
				None => ParamValue::Null,
			};
			params.insert(key.clone(), value);
		}
		Some(params)
	}
}

impl PartialEq for PathMatcher {
	fn eq(&self, other: &Self) -> bool {
		self.template == other.template
	}
}

impl Eq for PathMatcher {}

impl fmt::Display for PathMatcher {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.template)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_literal_template() {
		let matcher = PathMatcher::compile("/users").unwrap();
		assert!(matcher.keys().is_empty());
		assert!(matcher.is_match("/users"));
		assert!(matcher.is_match("/users/"));
		assert!(!matcher.is_match("/users/123"));
		assert!(!matcher.is_match("/users-list"));
	}

	#[rstest]
	fn test_root_template() {
		let matcher = PathMatcher::compile("/").unwrap();
		assert!(matcher.is_match("/"));
		assert!(!matcher.is_match("/a"));
	}

	#[rstest]
	fn test_multiple_params() {
		let matcher = PathMatcher::compile("/users/:id/posts/:postId").unwrap();
		let params = matcher.match_path("/users/42/posts/abc").unwrap();

		assert_eq!(params.get("id"), Some(&ParamValue::Number(42.0)));
		assert_eq!(params.get("postId"), Some(&ParamValue::from("abc")));
		assert_eq!(matcher.keys(), &["id", "postId"]);
	}

	#[rstest]
	fn test_param_does_not_cross_segments() {
		let matcher = PathMatcher::compile("/users/:id").unwrap();
		assert!(!matcher.is_match("/users/1/2"));
		assert!(!matcher.is_match("/users/"));
		assert!(matcher.match_path("/users").is_none());
	}

	#[rstest]
	fn test_optional_param() {
		let matcher = PathMatcher::compile("/settings/:tab?").unwrap();

		let with_tab = matcher.match_path("/settings/profile").unwrap();
		assert_eq!(with_tab.get("tab"), Some(&ParamValue::from("profile")));

		let without_tab = matcher.match_path("/settings").unwrap();
		assert_eq!(without_tab.get("tab"), Some(&ParamValue::Null));
	}

	#[rstest]
	fn test_wildcard() {
		let matcher = PathMatcher::compile("/files/*").unwrap();
		let params = matcher.match_path("/files/css/site/main.css").unwrap();
		assert_eq!(
			params.get(WILDCARD_KEY),
			Some(&ParamValue::from("css/site/main.css"))
		);
		assert_eq!(
			matcher.match_path("/files/docs/").unwrap().get(WILDCARD_KEY),
			Some(&ParamValue::from("docs"))
		);
	}

	#[rstest]
	#[case("/files")]
	#[case("/files/")]
	fn test_empty_wildcard_is_null(#[case] path: &str) {
		let matcher = PathMatcher::compile("/files/*").unwrap();
		assert_eq!(
			matcher.match_path(path).unwrap().get(WILDCARD_KEY),
			Some(&ParamValue::Null)
		);
	}

	#[rstest]
	fn test_params_are_decoded() {
		let matcher = PathMatcher::compile("/tags/:name").unwrap();
		let params = matcher.match_path("/tags/rust%20lang").unwrap();
		assert_eq!(params.get("name"), Some(&ParamValue::from("rust lang")));
	}

	#[rstest]
	fn test_special_chars_escaped() {
		let matcher = PathMatcher::compile("/api/v1.0/(beta)").unwrap();
		assert!(matcher.is_match("/api/v1.0/(beta)"));
		assert!(!matcher.is_match("/api/v1X0/(beta)"));
	}

	#[rstest]
	fn test_keys_match_capture_groups() {
		for template in ["/", "/a/:x/b/:y/c/:z", "/s/:tab?", "/f/:id/*"] {
			let matcher = PathMatcher::compile(template).unwrap();
			assert_eq!(matcher.pattern().captures_len() - 1, matcher.keys().len());
		}
	}

	#[rstest]
	fn test_compile_is_deterministic() {
		let first = PathMatcher::compile("/users/:id/posts/:postId").unwrap();
		let second = PathMatcher::compile("/users/:id/posts/:postId").unwrap();

		assert_eq!(first, second);
		for path in ["/users/1/posts/2", "/users/x/posts", "/users/1/posts/2/"] {
			assert_eq!(first.match_path(path), second.match_path(path));
		}
	}

	#[rstest]
	#[case("users/:id")]
	#[case("")]
	fn test_rejects_missing_leading_slash(#[case] template: &str) {
		assert!(matches!(
			PathMatcher::compile(template),
			Err(PatternError::MissingLeadingSlash { .. })
		));
	}

	#[rstest]
	fn test_rejects_empty_param_name() {
		assert!(matches!(
			PathMatcher::compile("/users/:"),
			Err(PatternError::EmptyParamName { segment: 1, .. })
		));
	}

	#[rstest]
	#[case("/users/:1id")]
	#[case("/users/:user-id")]
	fn test_rejects_invalid_param_name(#[case] template: &str) {
		assert!(matches!(
			PathMatcher::compile(template),
			Err(PatternError::InvalidParamName { .. })
		));
	}

	#[rstest]
	fn test_rejects_duplicate_param() {
		assert!(matches!(
			PathMatcher::compile("/a/:id/b/:id"),
			Err(PatternError::DuplicateParam { .. })
		));
	}

	#[rstest]
	fn test_rejects_misplaced_wildcard() {
		assert!(matches!(
			PathMatcher::compile("/files/*/edit"),
			Err(PatternError::MisplacedWildcard { .. })
		));
	}

	#[rstest]
	fn test_rejects_excessive_length() {
		// Arrange: a template exceeding 1024 bytes
		let long_template = "/".to_string() + &"a".repeat(1025);

		// Act
		let result = PathMatcher::compile(&long_template);

		// Assert
		assert!(matches!(result, Err(PatternError::TooLong { .. })));
	}

	#[rstest]
	fn test_rejects_excessive_segments() {
		// Arrange: a template with more than 32 segments
		let segments: Vec<&str> = (0..35).map(|_| "seg").collect();
		let template = format!("/{}", segments.join("/"));

		// Act
		let result = PathMatcher::compile(&template);

		// Assert
		assert!(matches!(result, Err(PatternError::TooManySegments { .. })));
	}

	#[rstest]
	fn test_display() {
		let matcher = PathMatcher::compile("/users/:id").unwrap();
		assert_eq!(format!("{}", matcher), "/users/:id");
	}
}
