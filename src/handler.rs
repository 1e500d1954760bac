//! Handler references and the registry they resolve through.
//!
//! A route's handler (and optional activation callback) is either a direct
//! callable or an opaque name looked up in a [`HandlerResolver`] at
//! invocation time. Named references are the only form that survives
//! compilation to an artifact.

use crate::invocation::InvocationArgs;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Callable signature shared by handlers and activation callbacks.
pub type HandlerFn = Arc<dyn Fn(&InvocationArgs) -> Value + Send + Sync>;

/// A handler reference: directly invocable, or a name for the resolver.
#[derive(Clone)]
pub enum HandlerRef {
	/// An invocable used as-is.
	Direct(HandlerFn),

	/// An opaque identifier resolved through a [`HandlerResolver`].
	Named(String),
}

impl HandlerRef {
	/// Wrap a closure as a direct handler reference.
	pub fn direct<F>(f: F) -> HandlerRef
	where
		F: Fn(&InvocationArgs) -> Value + Send + Sync + 'static,
	{
		HandlerRef::Direct(Arc::new(f))
	}

	/// Create a named handler reference.
	pub fn named(name: impl Into<String>) -> HandlerRef {
		HandlerRef::Named(name.into())
	}

	/// The name of this reference, if it is the named form.
	pub fn name(&self) -> Option<&str> {
		match self {
			HandlerRef::Direct(_) => None,
			HandlerRef::Named(name) => Some(name),
		}
	}
}

impl std::fmt::Debug for HandlerRef {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			HandlerRef::Direct(_) => f.write_str("Direct(<callable>)"),
			HandlerRef::Named(name) => write!(f, "Named({name:?})"),
		}
	}
}

impl From<&str> for HandlerRef {
	fn from(name: &str) -> HandlerRef {
		HandlerRef::Named(name.to_string())
	}
}

impl From<String> for HandlerRef {
	fn from(name: String) -> HandlerRef {
		HandlerRef::Named(name)
	}
}

/// Capability for resolving named handler references.
pub trait HandlerResolver {
	/// Whether `name` is known to this resolver.
	fn has(&self, name: &str) -> bool;

	/// Look up the callable registered under `name`.
	fn get(&self, name: &str) -> Option<HandlerFn>;
}

/// Simple in-memory resolver backed by a name → callable map.
#[derive(Default, Clone)]
pub struct HandlerRegistry {
	entries: HashMap<String, HandlerFn>,
}

impl HandlerRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a callable under `name`, replacing any previous entry.
	pub fn register<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
	where
		F: Fn(&InvocationArgs) -> Value + Send + Sync + 'static,
	{
		self.entries.insert(name.into(), Arc::new(f));
		self
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl HandlerResolver for HandlerRegistry {
	fn has(&self, name: &str) -> bool {
		self.entries.contains_key(name)
	}

	fn get(&self, name: &str) -> Option<HandlerFn> {
		self.entries.get(name).cloned()
	}
}

impl std::fmt::Debug for HandlerRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut names: Vec<_> = self.entries.keys().collect();
		names.sort();
		f.debug_struct("HandlerRegistry").field("names", &names).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_registry_has_and_get() {
		let mut registry = HandlerRegistry::new();
		registry.register("testhandler", |_args| json!("returnvalue"));

		assert!(registry.has("testhandler"));
		assert!(!registry.has("missing"));

		let handler = registry.get("testhandler").unwrap();
		assert_eq!(handler(&InvocationArgs::default()), json!("returnvalue"));
		assert!(registry.get("missing").is_none());
	}

	#[test]
	fn test_registry_register_replaces() {
		let mut registry = HandlerRegistry::new();
		registry.register("h", |_args| json!(1));
		registry.register("h", |_args| json!(2));

		assert_eq!(registry.len(), 1);
		let handler = registry.get("h").unwrap();
		assert_eq!(handler(&InvocationArgs::default()), json!(2));
	}

	#[test]
	fn test_handler_ref_name() {
		assert_eq!(HandlerRef::named("products.index").name(), Some("products.index"));
		assert_eq!(HandlerRef::direct(|_args| json!(null)).name(), None);
	}

	#[test]
	fn test_handler_ref_debug_hides_callable() {
		let direct = HandlerRef::direct(|_args| json!(null));
		assert_eq!(format!("{direct:?}"), "Direct(<callable>)");

		let named = HandlerRef::named("testhandler");
		assert_eq!(format!("{named:?}"), "Named(\"testhandler\")");
	}
}
