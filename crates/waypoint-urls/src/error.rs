//! Error types for route templates and parameter access.

use thiserror::Error;

/// Error returned when a route template cannot be compiled.
///
/// Templates are compiled once when the router is constructed, so any of
/// these errors surfaces before the first navigation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
	/// The template does not start with `/`.
	#[error("Route template '{template}' must start with '/'")]
	MissingLeadingSlash {
		/// The offending template.
		template: String,
	},
	/// A `:` marker without a name.
	#[error("Route template '{template}' has an empty parameter name in segment {segment}")]
	EmptyParamName {
		/// The offending template.
		template: String,
		/// Zero-based segment index.
		segment: usize,
	},
	/// A parameter name that is not an identifier.
	#[error("Invalid parameter name '{name}' in route template '{template}'")]
	InvalidParamName {
		/// The offending template.
		template: String,
		/// The rejected name.
		name: String,
	},
	/// The same parameter name appears twice.
	#[error("Duplicate parameter '{name}' in route template '{template}'")]
	DuplicateParam {
		/// The offending template.
		template: String,
		/// The repeated name.
		name: String,
	},
	/// `*` used anywhere but the final segment.
	#[error("Wildcard must be the last segment of route template '{template}'")]
	MisplacedWildcard {
		/// The offending template.
		template: String,
	},
	/// Template longer than the allowed maximum.
	#[error("Pattern length {length} exceeds maximum allowed length of {max} bytes")]
	TooLong {
		/// Actual length in bytes.
		length: usize,
		/// Allowed maximum.
		max: usize,
	},
	/// Template with too many segments.
	#[error("Pattern has {count} path segments, exceeding maximum of {max}")]
	TooManySegments {
		/// Actual segment count.
		count: usize,
		/// Allowed maximum.
		max: usize,
	},
	/// The generated regex failed to compile.
	#[error("Failed to compile pattern regex: {0}")]
	Regex(String),
}

/// Error type for typed path/search parameter access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
	/// The parameter is absent or `null`.
	#[error("Missing parameter: {name}")]
	Missing {
		/// Parameter name.
		name: String,
	},
	/// Failed to parse a parameter value.
	#[error("Failed to parse parameter '{name}' value '{raw_value}' as {param_type}: {reason}")]
	ParseError {
		/// Parameter name.
		name: String,
		/// Expected type name.
		param_type: &'static str,
		/// Raw string value that failed to parse.
		raw_value: String,
		/// Error message from parsing.
		reason: String,
	},
}
