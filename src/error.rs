use std::path::PathBuf;

/// Library-level structured errors for reroute.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum RerouteError {
	#[error("Route methods list must not be empty")]
	EmptyMethodsList,

	#[error("Invalid HTTP method: {method}")]
	InvalidMethod { method: String },

	#[error("Invalid regex pattern in rule: {pattern}")]
	InvalidRegex {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Handler not resolvable: {name}")]
	HandlerNotResolvable { name: String },

	#[error("Cannot serialize direct {role} reference; only named handlers have a portable form")]
	HandlerNotSerializable { role: &'static str },

	#[error("Failed to read routes file: {path}")]
	RoutesReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse routes file: {path}")]
	RoutesParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Failed to read compiled artifact: {path}")]
	ArtifactReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse compiled artifact")]
	ArtifactParseError {
		#[source]
		source: toml::de::Error,
	},

	#[error("Failed to serialize compiled artifact")]
	ArtifactSerializeError {
		#[source]
		source: toml::ser::Error,
	},
}

/// Result type alias using RerouteError.
pub type Result<T> = std::result::Result<T, RerouteError>;
