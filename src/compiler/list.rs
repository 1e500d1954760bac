use crate::collection::RouteCollection;
use crate::compiler::rewrite::{CompiledRewrite, RewriteCompiler};
use crate::error::{RerouteError, Result};
use crate::rewrite::Rewrite;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Batches route descriptors into one reloadable registration artifact.
///
/// The artifact holds one record per route in input order; nothing is
/// reordered or deduplicated, so conflicting routes are preserved verbatim
/// for the host to reconcile. Compilation is pure text production with no
/// side effects.
pub struct RewriteListCompiler<'a> {
	rewrites: &'a [Rewrite],
}

impl<'a> RewriteListCompiler<'a> {
	pub fn new(rewrites: &'a [Rewrite]) -> RewriteListCompiler<'a> {
		RewriteListCompiler { rewrites }
	}

	/// Serialize every route into one TOML document.
	pub fn compile(&self) -> Result<String> {
		let rewrites = self
			.rewrites
			.iter()
			.map(|rewrite| RewriteCompiler::new(rewrite).definition())
			.collect::<Result<Vec<_>>>()?;

		toml::to_string(&CompiledRewriteList { rewrites })
			.map_err(|source| RerouteError::ArtifactSerializeError { source })
	}
}

/// Top-level shape of a compiled registration artifact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompiledRewriteList {
	#[serde(default)]
	pub rewrites: Vec<CompiledRewrite>,
}

/// Reconstruct every route in a compiled artifact and attach each to the
/// collection, in document order. Returns the number of routes attached.
pub fn load_compiled(artifact: &str, collection: &mut RouteCollection) -> Result<usize> {
	let list: CompiledRewriteList =
		toml::from_str(artifact).map_err(|source| RerouteError::ArtifactParseError { source })?;

	let count = list.rewrites.len();
	for definition in &list.rewrites {
		collection.attach(definition.reconstruct());
	}

	Ok(count)
}

/// Read a compiled artifact from disk and load it into the collection.
pub fn load_compiled_file(path: &Path, collection: &mut RouteCollection) -> Result<usize> {
	let content = std::fs::read_to_string(path).map_err(|source| RerouteError::ArtifactReadError {
		path: path.to_path_buf(),
		source,
	})?;

	load_compiled(&content, collection)
}
