//! Reroute - declarative rewrite-rule registration, compilation, and dispatch.
//!
//! This library provides the core functionality for reroute, including:
//! - Route descriptors with validated methods and regex pattern rules
//! - Compilation of route sets into a reloadable registration artifact
//! - Request-path matching with capture-group substitution
//! - Handler resolution and invocation with prefix-aware argument binding
//!
//! # Example
//!
//! ```
//! use reroute::collection::RouteCollection;
//! use reroute::compiler::{RewriteListCompiler, load_compiled};
//! use reroute::handler::{HandlerRef, HandlerRegistry};
//! use reroute::invocation::{InvocationContext, InvocationStrategy};
//! use reroute::matcher::match_collection;
//! use reroute::rewrite::{Rewrite, Rule};
//! use reroute::support::Method;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let rules = vec![Rule::new(
//!     "^products/([0-9]+)$",
//!     vec![("id".to_string(), "$matches[1]".to_string())],
//! )];
//! let rewrite = Rewrite::new(&["GET"], rules, HandlerRef::named("products.show"))
//!     .unwrap()
//!     .with_prefix("shop_");
//!
//! // Precompile once...
//! let artifact = RewriteListCompiler::new(std::slice::from_ref(&rewrite))
//!     .compile()
//!     .unwrap();
//!
//! // ...reconstruct many times.
//! let mut routes = RouteCollection::new();
//! load_compiled(&artifact, &mut routes).unwrap();
//!
//! let matched = match_collection(&routes, Method::Get, "products/42")
//!     .unwrap()
//!     .expect("route matches");
//!
//! let mut registry = HandlerRegistry::new();
//! registry.register("products.show", |args| json!({ "id": args.get("id") }));
//!
//! let mut strategy = InvocationStrategy::with_resolver(Arc::new(registry));
//! strategy.with_additional_context(InvocationContext::with_query_vars(
//!     matched.query_vars.clone(),
//! ));
//!
//! let value = strategy.invoke_handler(matched.route).unwrap();
//! assert_eq!(value, json!({ "id": "42" }));
//! ```

pub mod collection;
pub mod compiler;
pub mod config;
pub mod error;
pub mod handler;
pub mod invocation;
pub mod matcher;
pub mod rewrite;
pub mod support;

pub use error::{RerouteError, Result};
