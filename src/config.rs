//! Route-definition files for the CLI.
//!
//! This module handles:
//! - TOML route-definition parsing
//! - File-level prefix defaulting with per-route overrides
//! - Building validated route descriptors from definitions

use crate::error::{RerouteError, Result};
use crate::handler::HandlerRef;
use crate::rewrite::{Rewrite, Rule};
use serde::Deserialize;
use std::path::Path;

/// Top-level shape of a routes file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoutesFile {
	/// Default query-variable prefix applied to every route.
	#[serde(default)]
	pub prefix: Option<String>,

	/// Route definitions, in registration order.
	#[serde(default)]
	pub routes: Vec<RouteDef>,
}

/// One declared route.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteDef {
	/// HTTP method tokens; validated when the descriptor is built.
	pub methods: Vec<String>,

	/// Named handler token resolved at dispatch time.
	pub handler: String,

	/// Overrides the file-level prefix when set.
	#[serde(default)]
	pub prefix: Option<String>,

	/// Optional named activation-callback token.
	#[serde(default)]
	pub is_active: Option<String>,

	#[serde(default)]
	pub rules: Vec<RuleDef>,
}

/// One declared pattern rule.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleDef {
	pub pattern: String,

	/// (query-variable name, substitution expression) pairs, in order.
	#[serde(default)]
	pub query: Vec<(String, String)>,
}

/// Parse a routes file from the given path.
pub fn parse_routes_file(path: &Path) -> Result<RoutesFile> {
	let content = std::fs::read_to_string(path).map_err(|source| RerouteError::RoutesReadError {
		path: path.to_path_buf(),
		source,
	})?;

	parse_routes_str(&content, path)
}

/// Parse a routes file from a string (useful for testing).
pub fn parse_routes_str(content: &str, path: &Path) -> Result<RoutesFile> {
	toml::from_str(content).map_err(|source| RerouteError::RoutesParseError {
		path: path.to_path_buf(),
		source,
	})
}

impl RoutesFile {
	/// Build validated route descriptors from the parsed definitions.
	///
	/// Fails on the first definition with an invalid method token or
	/// pattern; no partial route set is produced.
	pub fn build(&self) -> Result<Vec<Rewrite>> {
		self.routes.iter().map(|def| self.build_route(def)).collect()
	}

	fn build_route(&self, def: &RouteDef) -> Result<Rewrite> {
		let rules = def
			.rules
			.iter()
			.map(|rule| Rule::new(rule.pattern.clone(), rule.query.clone()))
			.collect();

		let handler = HandlerRef::named(def.handler.as_str());
		let mut rewrite = Rewrite::new(&def.methods, rules, handler)?;

		let prefix = def.prefix.as_deref().or(self.prefix.as_deref());
		if let Some(prefix) = prefix {
			rewrite = rewrite.with_prefix(prefix);
		}

		if let Some(is_active) = def.is_active.as_deref() {
			rewrite = rewrite.with_is_active_callback(HandlerRef::named(is_active));
		}

		Ok(rewrite)
	}
}
