//! Route descriptors and their precompiled form.
//!
//! This module handles:
//! - `Rewrite`, the immutable descriptor application code registers
//! - `OptimizedRewrite`, the precompiled variant reconstructed from artifacts
//! - The `Route` capability both forms expose to compilers and dispatch

use crate::error::{RerouteError, Result};
use crate::handler::HandlerRef;
use crate::support::{Method, apply_prefix};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One path-pattern regex mapped to query-variable substitution expressions.
///
/// `query` is an ordered list of (variable name, expression) pairs; the
/// expressions may reference capture groups as `$matches[N]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
	pub pattern: String,

	#[serde(default)]
	pub query: Vec<(String, String)>,
}

impl Rule {
	pub fn new(pattern: impl Into<String>, query: Vec<(String, String)>) -> Rule {
		Rule {
			pattern: pattern.into(),
			query,
		}
	}
}

/// Capability shared by uncompiled and precompiled routes.
///
/// The two query-variable accessors return owned data: `Rewrite` derives
/// them on demand, `OptimizedRewrite` hands back its stored copies.
pub trait Route {
	/// HTTP methods this route responds to.
	fn methods(&self) -> &[Method];

	/// Pattern rules in declaration order.
	fn rules(&self) -> &[Rule];

	/// The handler invoked when this route is dispatched.
	fn handler(&self) -> &HandlerRef;

	/// Optional activation predicate; absent means always active.
	fn is_active_callback(&self) -> Option<&HandlerRef>;

	/// Prefixed name → original name, first-seen order across rules.
	fn prefixed_to_unprefixed_query_variables(&self) -> Vec<(String, String)>;

	/// All query-variable names this route declares, prefixed, deduplicated.
	fn query_variables(&self) -> Vec<String>;
}

/// Immutable descriptor of one route.
///
/// Constructed once at registration time; methods and rule patterns are
/// validated up front so no partially-valid route ever exists.
#[derive(Debug, Clone)]
pub struct Rewrite {
	methods: Vec<Method>,
	rules: Vec<Rule>,
	handler: HandlerRef,
	query_variable_prefix: String,
	is_active_callback: Option<HandlerRef>,
}

impl Rewrite {
	/// Create a route descriptor from method tokens, rules, and a handler.
	///
	/// Fails if the methods list is empty or contains a token outside the
	/// fixed vocabulary, or if any rule pattern is not a valid regex.
	pub fn new<S: AsRef<str>>(methods: &[S], rules: Vec<Rule>, handler: HandlerRef) -> Result<Rewrite> {
		let methods = parse_methods(methods)?;

		for rule in &rules {
			compile_pattern(&rule.pattern)?;
		}

		Ok(Rewrite {
			methods,
			rules,
			handler,
			query_variable_prefix: String::new(),
			is_active_callback: None,
		})
	}

	/// Set the query-variable prefix namespacing this route set.
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Rewrite {
		self.query_variable_prefix = prefix.into();
		self
	}

	/// Set the activation predicate evaluated at dispatch time.
	pub fn with_is_active_callback(mut self, callback: impl Into<HandlerRef>) -> Rewrite {
		self.is_active_callback = Some(callback.into());
		self
	}

	/// The prefix applied to this route's query-variable names.
	pub fn query_variable_prefix(&self) -> &str {
		&self.query_variable_prefix
	}
}

impl Route for Rewrite {
	fn methods(&self) -> &[Method] {
		&self.methods
	}

	fn rules(&self) -> &[Rule] {
		&self.rules
	}

	fn handler(&self) -> &HandlerRef {
		&self.handler
	}

	fn is_active_callback(&self) -> Option<&HandlerRef> {
		self.is_active_callback.as_ref()
	}

	fn prefixed_to_unprefixed_query_variables(&self) -> Vec<(String, String)> {
		derive_query_variable_map(&self.rules, &self.query_variable_prefix)
	}

	fn query_variables(&self) -> Vec<String> {
		self.prefixed_to_unprefixed_query_variables()
			.into_iter()
			.map(|(prefixed, _)| prefixed)
			.collect()
	}
}

/// Precompiled route carrying already-resolved query-variable mappings.
///
/// Produced by the compiler or reconstructed from an artifact; read-only
/// data consumed at dispatch time. Performs no validation of its own.
#[derive(Debug, Clone)]
pub struct OptimizedRewrite {
	methods: Vec<Method>,
	rules: Vec<Rule>,
	handler: HandlerRef,
	prefixed_to_unprefixed_query_variables: Vec<(String, String)>,
	query_variables: Vec<String>,
	is_active_callback: Option<HandlerRef>,
}

impl OptimizedRewrite {
	pub fn new(
		methods: Vec<Method>,
		rules: Vec<Rule>,
		handler: HandlerRef,
		prefixed_to_unprefixed_query_variables: Vec<(String, String)>,
		query_variables: Vec<String>,
		is_active_callback: Option<HandlerRef>,
	) -> OptimizedRewrite {
		OptimizedRewrite {
			methods,
			rules,
			handler,
			prefixed_to_unprefixed_query_variables,
			query_variables,
			is_active_callback,
		}
	}
}

impl Route for OptimizedRewrite {
	fn methods(&self) -> &[Method] {
		&self.methods
	}

	fn rules(&self) -> &[Rule] {
		&self.rules
	}

	fn handler(&self) -> &HandlerRef {
		&self.handler
	}

	fn is_active_callback(&self) -> Option<&HandlerRef> {
		self.is_active_callback.as_ref()
	}

	fn prefixed_to_unprefixed_query_variables(&self) -> Vec<(String, String)> {
		self.prefixed_to_unprefixed_query_variables.clone()
	}

	fn query_variables(&self) -> Vec<String> {
		self.query_variables.clone()
	}
}

/// Parse and validate a methods token list.
fn parse_methods<S: AsRef<str>>(methods: &[S]) -> Result<Vec<Method>> {
	if methods.is_empty() {
		return Err(RerouteError::EmptyMethodsList);
	}

	methods
		.iter()
		.map(|token| {
			Method::parse(token.as_ref()).ok_or_else(|| RerouteError::InvalidMethod {
				method: token.as_ref().to_string(),
			})
		})
		.collect()
}

/// Compile a rule pattern, wrapping failures with the offending pattern.
fn compile_pattern(pattern: &str) -> Result<Regex> {
	Regex::new(pattern).map_err(|source| RerouteError::InvalidRegex {
		pattern: pattern.to_string(),
		source,
	})
}

/// Walk rules in order and map each first-seen variable name, prefixed, to
/// its original name.
fn derive_query_variable_map(rules: &[Rule], prefix: &str) -> Vec<(String, String)> {
	let mut map: Vec<(String, String)> = Vec::new();

	for rule in rules {
		for (name, _) in &rule.query {
			let prefixed = apply_prefix(name, prefix);
			if !map.iter().any(|(seen, _)| *seen == prefixed) {
				map.push((prefixed, name.clone()));
			}
		}
	}

	map
}
