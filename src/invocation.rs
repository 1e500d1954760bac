//! Handler and activation-callback invocation for matched routes.
//!
//! This module handles:
//! - Resolving direct or named handler references at dispatch time
//! - Prefix-aware named argument binding from resolved query variables
//! - Strict boolean coercion of activation-callback return values

use crate::error::{RerouteError, Result};
use crate::handler::{HandlerFn, HandlerRef, HandlerResolver};
use crate::rewrite::Route;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Per-request context supplied by the caller before dispatch.
///
/// `query_vars` is the host-resolved query-variable mapping for the current
/// request, keyed by the names the route registered (prefixed, when the
/// route carries a prefix).
#[derive(Debug, Clone, Default)]
pub struct InvocationContext {
	pub query_vars: HashMap<String, String>,
}

impl InvocationContext {
	pub fn new() -> InvocationContext {
		InvocationContext::default()
	}

	/// Build a context from resolved query-variable pairs.
	pub fn with_query_vars<I>(pairs: I) -> InvocationContext
	where
		I: IntoIterator<Item = (String, String)>,
	{
		InvocationContext {
			query_vars: pairs.into_iter().collect(),
		}
	}
}

/// Named values available to a handler during one invocation.
#[derive(Debug, Clone, Default)]
pub struct InvocationArgs {
	values: HashMap<String, String>,
}

impl InvocationArgs {
	/// Look up a value by parameter name.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.values.get(name).map(String::as_str)
	}

	/// Look up a capture-group value by index (group 1 is named `"1"`).
	pub fn capture(&self, index: usize) -> Option<&str> {
		self.get(&index.to_string())
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

/// Resolves and calls a route's handler and activation callback.
///
/// Holds the per-request context; set it with `with_additional_context`
/// before each dispatch. One strategy instance serves one request at a
/// time.
#[derive(Default)]
pub struct InvocationStrategy {
	resolver: Option<Arc<dyn HandlerResolver>>,
	context: InvocationContext,
}

impl InvocationStrategy {
	/// Strategy without a resolver; named references fail to resolve.
	pub fn new() -> InvocationStrategy {
		InvocationStrategy::default()
	}

	/// Strategy resolving named references through `resolver`.
	pub fn with_resolver(resolver: Arc<dyn HandlerResolver>) -> InvocationStrategy {
		InvocationStrategy {
			resolver: Some(resolver),
			context: InvocationContext::default(),
		}
	}

	/// Replace the per-request context used by subsequent invocations.
	pub fn with_additional_context(&mut self, context: InvocationContext) -> &mut InvocationStrategy {
		self.context = context;
		self
	}

	/// Resolve and invoke the route's handler, returning its value unchanged.
	pub fn invoke_handler(&self, route: &dyn Route) -> Result<Value> {
		let handler = self.resolve(route.handler())?;
		let args = self.build_args(route);

		Ok(handler(&args))
	}

	/// Evaluate the route's activation callback.
	///
	/// Absence of a callback means the route is always active. Otherwise the
	/// callback is invoked exactly once and its return value is coerced with
	/// the host platform's boolean cast: `false`, null, numeric zero, `""`,
	/// `"0"`, and empty arrays or objects are inactive; anything else is
	/// active.
	pub fn invoke_is_active_callback(&self, route: &dyn Route) -> Result<bool> {
		let Some(reference) = route.is_active_callback() else {
			return Ok(true);
		};

		let callback = self.resolve(reference)?;
		let args = self.build_args(route);

		Ok(coerce_to_bool(&callback(&args)))
	}

	fn resolve(&self, reference: &HandlerRef) -> Result<HandlerFn> {
		match reference {
			HandlerRef::Direct(f) => Ok(f.clone()),
			HandlerRef::Named(name) => self
				.resolver
				.as_ref()
				.and_then(|resolver| resolver.get(name))
				.ok_or_else(|| RerouteError::HandlerNotResolvable { name: name.clone() }),
		}
	}

	/// Expose every prefixed query variable under its unprefixed name as
	/// well, so handler parameters may be named either way. Prefixed entries
	/// take precedence on conflict.
	fn build_args(&self, route: &dyn Route) -> InvocationArgs {
		let mut values = self.context.query_vars.clone();

		for (prefixed, unprefixed) in route.prefixed_to_unprefixed_query_variables() {
			if prefixed == unprefixed {
				continue;
			}
			if let Some(value) = self.context.query_vars.get(&prefixed) {
				values.insert(unprefixed, value.clone());
			}
		}

		InvocationArgs { values }
	}
}

/// Host-platform boolean cast over dynamic values.
fn coerce_to_bool(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(b) => *b,
		Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
		Value::String(s) => !s.is_empty() && s != "0",
		Value::Array(items) => !items.is_empty(),
		Value::Object(entries) => !entries.is_empty(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::handler::HandlerRegistry;
	use crate::rewrite::{Rewrite, Rule};
	use serde_json::json;
	use std::sync::atomic::{AtomicUsize, Ordering};

	fn query(raw: &[(&str, &str)]) -> Vec<(String, String)> {
		raw.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	fn one_rule() -> Vec<Rule> {
		vec![Rule::new("^one$", query(&[("one", "one")]))]
	}

	#[test]
	fn test_invoke_handler() {
		let count = Arc::new(AtomicUsize::new(0));
		let seen = count.clone();

		let strategy = InvocationStrategy::new();
		let rewrite = Rewrite::new(
			&["GET"],
			one_rule(),
			HandlerRef::direct(move |_args| {
				seen.fetch_add(1, Ordering::SeqCst);
				json!("returnvalue")
			}),
		)
		.unwrap();

		let value = strategy.invoke_handler(&rewrite).unwrap();

		assert_eq!(count.load(Ordering::SeqCst), 1);
		assert_eq!(value, json!("returnvalue"));
	}

	#[test]
	fn test_invoke_handler_with_additional_parameters() {
		let mut strategy = InvocationStrategy::new();
		strategy.with_additional_context(InvocationContext::with_query_vars(query(&[(
			"one",
			"testvalue",
		)])));

		let rewrite = Rewrite::new(
			&["GET"],
			vec![Rule::new("^one$", query(&[("one", "$matches[1]")]))],
			HandlerRef::direct(|args| json!(args.get("one"))),
		)
		.unwrap();

		let value = strategy.invoke_handler(&rewrite).unwrap();
		assert_eq!(value, json!("testvalue"));
	}

	#[test]
	fn test_invoke_handler_with_registry_backed_resolver() {
		let count = Arc::new(AtomicUsize::new(0));
		let seen = count.clone();

		let mut registry = HandlerRegistry::new();
		registry.register("testhandler", move |_args| {
			seen.fetch_add(1, Ordering::SeqCst);
			json!("returnvalue")
		});

		let strategy = InvocationStrategy::with_resolver(Arc::new(registry));
		let rewrite = Rewrite::new(
			&["GET"],
			vec![Rule::new("^one$", query(&[("one", "$matches[1]")]))],
			HandlerRef::named("testhandler"),
		)
		.unwrap();

		let value = strategy.invoke_handler(&rewrite).unwrap();

		assert_eq!(count.load(Ordering::SeqCst), 1);
		assert_eq!(value, json!("returnvalue"));
	}

	#[test]
	fn test_invoke_handler_with_prefixed_additional_parameters() {
		let mut strategy = InvocationStrategy::new();
		strategy.with_additional_context(InvocationContext::with_query_vars(query(&[(
			"pfx_one",
			"testvalue",
		)])));

		let rewrite = Rewrite::new(
			&["GET"],
			vec![Rule::new("^one$", query(&[("one", "$matches[1]")]))],
			HandlerRef::direct(|args| json!(args.get("one"))),
		)
		.unwrap()
		.with_prefix("pfx_");

		let value = strategy.invoke_handler(&rewrite).unwrap();
		assert_eq!(value, json!("testvalue"));
	}

	#[test]
	fn test_prefixed_entries_take_precedence() {
		let mut strategy = InvocationStrategy::new();
		strategy.with_additional_context(InvocationContext::with_query_vars(query(&[
			("pfx_one", "prefixed"),
			("one", "bare"),
		])));

		let rewrite = Rewrite::new(
			&["GET"],
			vec![Rule::new("^one$", query(&[("one", "$matches[1]")]))],
			HandlerRef::direct(|args| json!([args.get("one"), args.get("pfx_one")])),
		)
		.unwrap()
		.with_prefix("pfx_");

		let value = strategy.invoke_handler(&rewrite).unwrap();
		assert_eq!(value, json!(["prefixed", "prefixed"]));
	}

	#[test]
	fn test_invoke_handler_unknown_name_fails() {
		let strategy = InvocationStrategy::with_resolver(Arc::new(HandlerRegistry::new()));
		let rewrite = Rewrite::new(&["GET"], one_rule(), HandlerRef::named("missing")).unwrap();

		let result = strategy.invoke_handler(&rewrite);
		match result.unwrap_err() {
			RerouteError::HandlerNotResolvable { name } => assert_eq!(name, "missing"),
			other => panic!("Expected HandlerNotResolvable error, got {other:?}"),
		}
	}

	#[test]
	fn test_invoke_handler_named_without_resolver_fails() {
		let strategy = InvocationStrategy::new();
		let rewrite = Rewrite::new(&["GET"], one_rule(), HandlerRef::named("testhandler")).unwrap();

		let result = strategy.invoke_handler(&rewrite);
		assert!(matches!(
			result,
			Err(RerouteError::HandlerNotResolvable { .. })
		));
	}

	#[test]
	fn test_invoke_handler_numeric_capture_parameters() {
		let mut strategy = InvocationStrategy::new();
		strategy.with_additional_context(InvocationContext::with_query_vars(query(&[
			("1", "42"),
			("id", "42"),
		])));

		let rewrite = Rewrite::new(
			&["GET"],
			vec![Rule::new(
				"^products/([0-9]+)$",
				query(&[("id", "$matches[1]")]),
			)],
			HandlerRef::direct(|args| json!(args.capture(1))),
		)
		.unwrap();

		let value = strategy.invoke_handler(&rewrite).unwrap();
		assert_eq!(value, json!("42"));
	}

	#[test]
	fn test_invoke_is_active_callback() {
		let count = Arc::new(AtomicUsize::new(0));
		let strategy = InvocationStrategy::new();

		let seen = count.clone();
		let one = Rewrite::new(
			&["GET"],
			one_rule(),
			HandlerRef::direct(|_args| json!(null)),
		)
		.unwrap()
		.with_is_active_callback(HandlerRef::direct(move |_args| {
			seen.fetch_add(1, Ordering::SeqCst);
			json!(true)
		}));

		let seen = count.clone();
		let two = Rewrite::new(
			&["GET"],
			one_rule(),
			HandlerRef::direct(|_args| json!(null)),
		)
		.unwrap()
		.with_is_active_callback(HandlerRef::direct(move |_args| {
			seen.fetch_add(1, Ordering::SeqCst);
			json!(false)
		}));

		assert!(strategy.invoke_is_active_callback(&one).unwrap());
		assert!(!strategy.invoke_is_active_callback(&two).unwrap());
		assert_eq!(count.load(Ordering::SeqCst), 2);
	}

	#[test]
	fn test_invoke_is_active_callback_with_registry_backed_resolver() {
		let count = Arc::new(AtomicUsize::new(0));
		let seen = count.clone();

		let mut registry = HandlerRegistry::new();
		registry.register("testisactivecallback", move |_args| {
			seen.fetch_add(1, Ordering::SeqCst);
			json!(false)
		});

		let strategy = InvocationStrategy::with_resolver(Arc::new(registry));
		let rewrite = Rewrite::new(
			&["GET"],
			one_rule(),
			HandlerRef::direct(|_args| json!(null)),
		)
		.unwrap()
		.with_is_active_callback("testisactivecallback");

		assert!(!strategy.invoke_is_active_callback(&rewrite).unwrap());
		assert_eq!(count.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn test_invoke_is_active_callback_with_no_callback_set() {
		let strategy = InvocationStrategy::new();
		let rewrite = Rewrite::new(
			&["GET"],
			one_rule(),
			HandlerRef::direct(|_args| json!(null)),
		)
		.unwrap();

		assert!(strategy.invoke_is_active_callback(&rewrite).unwrap());
	}

	#[test]
	fn test_invoke_is_active_callback_with_non_boolean_return_value() {
		let count = Arc::new(AtomicUsize::new(0));
		let strategy = InvocationStrategy::new();

		let seen = count.clone();
		let one = Rewrite::new(
			&["GET"],
			one_rule(),
			HandlerRef::direct(|_args| json!(null)),
		)
		.unwrap()
		.with_is_active_callback(HandlerRef::direct(move |_args| {
			seen.fetch_add(1, Ordering::SeqCst);
			json!(1)
		}));

		let seen = count.clone();
		let two = Rewrite::new(
			&["GET"],
			one_rule(),
			HandlerRef::direct(|_args| json!(null)),
		)
		.unwrap()
		.with_is_active_callback(HandlerRef::direct(move |_args| {
			seen.fetch_add(1, Ordering::SeqCst);
			json!("")
		}));

		assert!(strategy.invoke_is_active_callback(&one).unwrap());
		assert!(!strategy.invoke_is_active_callback(&two).unwrap());
		assert_eq!(count.load(Ordering::SeqCst), 2);
	}

	#[test]
	fn test_coerce_to_bool() {
		assert!(coerce_to_bool(&json!(true)));
		assert!(coerce_to_bool(&json!(1)));
		assert!(coerce_to_bool(&json!(-1)));
		assert!(coerce_to_bool(&json!(0.5)));
		assert!(coerce_to_bool(&json!("yes")));
		assert!(coerce_to_bool(&json!([0])));
		assert!(coerce_to_bool(&json!({"k": "v"})));

		assert!(!coerce_to_bool(&json!(false)));
		assert!(!coerce_to_bool(&json!(null)));
		assert!(!coerce_to_bool(&json!(0)));
		assert!(!coerce_to_bool(&json!(0.0)));
		assert!(!coerce_to_bool(&json!("")));
		assert!(!coerce_to_bool(&json!("0")));
		assert!(!coerce_to_bool(&json!([])));
		assert!(!coerce_to_bool(&json!({})));
	}
}
