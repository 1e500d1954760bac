//! Shared helpers for query-variable prefixing and host-style query strings.
//!
//! This module handles:
//! - The fixed HTTP method vocabulary routes may declare
//! - Prefixing of query-variable names to namespace route sets
//! - Building and parsing the host's `index.php?`-style query strings

use serde::{Deserialize, Serialize};

/// Marker the host front controller expects at the start of a query string.
pub const QUERY_MARKER: &str = "index.php?";

/// HTTP methods a route may declare.
///
/// The vocabulary is fixed and case-sensitive: only the uppercase token is
/// accepted anywhere (construction, definition files, compiled artifacts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
	Get,
	Post,
	Put,
	Patch,
	Delete,
	Head,
	Options,
}

impl Method {
	/// Parse an uppercase method token. Lowercase variants do not parse.
	pub fn parse(token: &str) -> Option<Method> {
		match token {
			"GET" => Some(Method::Get),
			"POST" => Some(Method::Post),
			"PUT" => Some(Method::Put),
			"PATCH" => Some(Method::Patch),
			"DELETE" => Some(Method::Delete),
			"HEAD" => Some(Method::Head),
			"OPTIONS" => Some(Method::Options),
			_ => None,
		}
	}

	/// Get the wire token for this method.
	pub fn as_str(&self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Patch => "PATCH",
			Method::Delete => "DELETE",
			Method::Head => "HEAD",
			Method::Options => "OPTIONS",
		}
	}
}

impl std::fmt::Display for Method {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Prepend `prefix` to `value` unless it is already present.
///
/// Idempotent under repeated application.
pub fn apply_prefix(value: &str, prefix: &str) -> String {
	if value.starts_with(prefix) {
		value.to_string()
	} else {
		format!("{prefix}{value}")
	}
}

/// Apply `prefix` to every key in a pair list; values untouched, order kept.
pub fn apply_prefix_to_keys(pairs: &[(String, String)], prefix: &str) -> Vec<(String, String)> {
	pairs
		.iter()
		.map(|(key, value)| (apply_prefix(key, prefix), value.clone()))
		.collect()
}

/// Serialize key/value pairs into a host-style query string.
///
/// Pairs are joined as `key=value` with `&` in insertion order behind the
/// `index.php?` marker. Values are expected to already be safe tokens
/// (substitution placeholders included), so no URL-encoding is performed.
pub fn build_query(pairs: &[(String, String)]) -> String {
	let joined = pairs
		.iter()
		.map(|(key, value)| format!("{key}={value}"))
		.collect::<Vec<_>>()
		.join("&");

	format!("{QUERY_MARKER}{joined}")
}

/// Parse a host-style query string back into key/value pairs.
///
/// Strips a leading `index.php?` marker if present, then splits on `&` and
/// the first `=`. A segment without `=` maps to an empty value; empty
/// segments are skipped. No URL-decoding is performed, so this round-trips
/// `build_query` output for tokens free of `&` and `=`.
pub fn parse_query(query: &str) -> Vec<(String, String)> {
	let raw = query.strip_prefix(QUERY_MARKER).unwrap_or(query);

	raw.split('&')
		.filter(|segment| !segment.is_empty())
		.map(|segment| {
			if let Some(eq_pos) = segment.find('=') {
				(segment[..eq_pos].to_string(), segment[eq_pos + 1..].to_string())
			} else {
				(segment.to_string(), String::new())
			}
		})
		.collect()
}

/// Check that a methods list is non-empty and contains only valid tokens.
///
/// Any token outside the fixed vocabulary (including lowercase variants)
/// invalidates the whole list. Duplicates of valid tokens are allowed.
pub fn is_valid_methods_list<S: AsRef<str>>(methods: &[S]) -> bool {
	!methods.is_empty() && methods.iter().all(|m| Method::parse(m.as_ref()).is_some())
}
