//! Composition error types.

use rewire_di::DiError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for composition passes.
pub type ComposeResult<T> = Result<T, ComposeError>;

/// Errors that abort a composition pass.
///
/// Passes are not transactional: bindings added or replaced before the failure stay in the
/// registry.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ComposeError {
	/// More than one scanned candidate binds the same capability and key.
	#[error("ambiguous implementation for {capability}{}: {}", key_suffix(.key), .candidates.join(", "))]
	AmbiguousImplementation {
		/// Closed capability being bound.
		capability: String,
		/// Binding key, if keyed.
		key: Option<String>,
		/// Every candidate that matched.
		candidates: Vec<String>,
	},

	/// More than one decorator candidate is indexed under a bound capability.
	#[error("ambiguous decorator for {capability}: {}", .candidates.join(", "))]
	AmbiguousDecorator {
		/// Capability of the binding being decorated.
		capability: String,
		/// Every decorator candidate found for it.
		candidates: Vec<String>,
	},

	/// Registry or catalog failure.
	#[error(transparent)]
	Di(#[from] DiError),

	/// Settings text is not valid.
	#[error("invalid composition settings: {0}")]
	Settings(#[from] toml::de::Error),

	/// Settings file could not be read.
	#[error("failed to read composition settings from {}: {source}", .path.display())]
	SettingsIo {
		/// File that was read.
		path: PathBuf,
		/// Underlying I/O error.
		source: std::io::Error,
	},
}

fn key_suffix(key: &Option<String>) -> String {
	key.as_ref()
		.map(|key| format!(" (key `{}`)", key))
		.unwrap_or_default()
}
