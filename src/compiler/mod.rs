//! Compilation of route descriptors into a portable registration artifact.
//!
//! This module handles:
//! - Precomputing a single route's query-variable mappings
//! - Serializing route definitions into a reloadable TOML artifact
//! - Reconstructing and attaching routes from a compiled artifact

pub mod list;
pub mod rewrite;

pub use list::{CompiledRewriteList, RewriteListCompiler, load_compiled, load_compiled_file};
pub use rewrite::{CompiledRewrite, RewriteCompiler};
