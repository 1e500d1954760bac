use crate::error::{RerouteError, Result};
use crate::handler::HandlerRef;
use crate::rewrite::{OptimizedRewrite, Rewrite, Route, Rule};
use crate::support::Method;
use serde::{Deserialize, Serialize};

/// Compiles one route descriptor into its precomputed form.
///
/// The primary artifact is an [`OptimizedRewrite`] with the query-variable
/// mappings already resolved; the secondary artifact is a serializable
/// [`CompiledRewrite`] record for embedding in a registration artifact.
pub struct RewriteCompiler<'a> {
	rewrite: &'a Rewrite,
}

impl<'a> RewriteCompiler<'a> {
	pub fn new(rewrite: &'a Rewrite) -> RewriteCompiler<'a> {
		RewriteCompiler { rewrite }
	}

	/// Precompute the route's query-variable mappings.
	///
	/// No validation happens here beyond the deduplication the derivation
	/// already performs; the descriptor validated itself at construction.
	pub fn compile(&self) -> OptimizedRewrite {
		OptimizedRewrite::new(
			self.rewrite.methods().to_vec(),
			self.rewrite.rules().to_vec(),
			self.rewrite.handler().clone(),
			self.rewrite.prefixed_to_unprefixed_query_variables(),
			self.rewrite.query_variables(),
			self.rewrite.is_active_callback().cloned(),
		)
	}

	/// Produce the serializable record for this route.
	///
	/// Handler and activation references must be named: a direct callable
	/// has no portable form and fails with `HandlerNotSerializable`.
	pub fn definition(&self) -> Result<CompiledRewrite> {
		let handler = named_token(self.rewrite.handler(), "handler")?;

		let is_active_callback = self
			.rewrite
			.is_active_callback()
			.map(|callback| named_token(callback, "is_active_callback"))
			.transpose()?;

		Ok(CompiledRewrite {
			methods: self.rewrite.methods().to_vec(),
			handler,
			is_active_callback,
			prefixed_to_unprefixed_query_variables: self
				.rewrite
				.prefixed_to_unprefixed_query_variables(),
			query_variables: self.rewrite.query_variables(),
			rules: self.rewrite.rules().to_vec(),
		})
	}
}

/// Serialized form of one compiled route.
///
/// When reloaded, `reconstruct` rebuilds an equivalent [`OptimizedRewrite`]
/// without re-running the original registration code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledRewrite {
	pub methods: Vec<Method>,

	pub handler: String,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub is_active_callback: Option<String>,

	#[serde(default)]
	pub prefixed_to_unprefixed_query_variables: Vec<(String, String)>,

	#[serde(default)]
	pub query_variables: Vec<String>,

	// Kept last so TOML serialization emits values before table arrays.
	#[serde(default)]
	pub rules: Vec<Rule>,
}

impl CompiledRewrite {
	/// Rebuild the precompiled route this record describes.
	pub fn reconstruct(&self) -> OptimizedRewrite {
		OptimizedRewrite::new(
			self.methods.clone(),
			self.rules.clone(),
			HandlerRef::Named(self.handler.clone()),
			self.prefixed_to_unprefixed_query_variables.clone(),
			self.query_variables.clone(),
			self.is_active_callback.clone().map(HandlerRef::Named),
		)
	}

	/// The textual form of this record on its own.
	pub fn to_toml(&self) -> Result<String> {
		toml::to_string(self).map_err(|source| RerouteError::ArtifactSerializeError { source })
	}
}

fn named_token(reference: &HandlerRef, role: &'static str) -> Result<String> {
	reference
		.name()
		.map(str::to_string)
		.ok_or(RerouteError::HandlerNotSerializable { role })
}
