//! Request-path matching against registered routes.
//!
//! The hosting environment normally owns pattern matching; this module
//! carries the same semantics so a route set is usable standalone. First
//! matching route wins, and within a route the first matching rule wins.

use crate::collection::RouteCollection;
use crate::error::{RerouteError, Result};
use crate::rewrite::Route;
use crate::support::Method;
use regex::{Captures, Regex};
use std::collections::HashMap;

/// A matched route together with its resolved query variables.
pub struct RouteMatch<'a> {
	pub route: &'a dyn Route,

	/// Prefixed query-variable names with substitution expressions expanded,
	/// followed by numeric-named capture-group values (`"1"`, `"2"`, ...).
	pub query_vars: Vec<(String, String)>,
}

/// Match `path` against one route.
///
/// Returns `None` when the method is not declared or no rule pattern
/// matches. On a match, each substitution expression has its `$matches[N]`
/// placeholders replaced with capture-group text (missing groups expand to
/// empty), and variable names carry the route's prefix.
pub fn match_route(route: &dyn Route, method: Method, path: &str) -> Result<Option<Vec<(String, String)>>> {
	if !route.methods().contains(&method) {
		return Ok(None);
	}

	let placeholder = compile_pattern(r"\$matches\[([0-9]+)\]")?;

	// Rules store unprefixed variable names; registration exposes prefixed ones.
	let prefixed_by_name: HashMap<String, String> = route
		.prefixed_to_unprefixed_query_variables()
		.into_iter()
		.map(|(prefixed, original)| (original, prefixed))
		.collect();

	for rule in route.rules() {
		let regex = compile_pattern(&rule.pattern)?;

		if let Some(caps) = regex.captures(path) {
			let mut query_vars = Vec::new();

			for (name, template) in &rule.query {
				let key = prefixed_by_name
					.get(name)
					.cloned()
					.unwrap_or_else(|| name.clone());
				query_vars.push((key, expand_captures(template, &placeholder, &caps)));
			}

			for (index, group) in caps.iter().enumerate().skip(1) {
				if let Some(m) = group {
					query_vars.push((index.to_string(), m.as_str().to_string()));
				}
			}

			return Ok(Some(query_vars));
		}
	}

	Ok(None)
}

/// Find the first route in attachment order that matches `path`.
pub fn match_collection<'a>(
	collection: &'a RouteCollection,
	method: Method,
	path: &str,
) -> Result<Option<RouteMatch<'a>>> {
	for route in collection.iter() {
		if let Some(query_vars) = match_route(route, method, path)? {
			return Ok(Some(RouteMatch { route, query_vars }));
		}
	}

	Ok(None)
}

/// Replace every `$matches[N]` placeholder with capture group N's text.
fn expand_captures(template: &str, placeholder: &Regex, caps: &Captures) -> String {
	placeholder
		.replace_all(template, |pc: &Captures| {
			pc[1].parse::<usize>()
				.ok()
				.and_then(|index| caps.get(index))
				.map_or_else(String::new, |m| m.as_str().to_string())
		})
		.into_owned()
}

/// Compile a pattern string, wrapping failures with the offending pattern.
fn compile_pattern(pattern: &str) -> Result<Regex> {
	Regex::new(pattern).map_err(|source| RerouteError::InvalidRegex {
		pattern: pattern.to_string(),
		source,
	})
}
