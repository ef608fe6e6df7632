//! Registry error types.

use crate::cycle_detection::CycleError;
use crate::types::{ServiceKey, TypeRef};
use thiserror::Error;

/// Result type for registry and resolution operations.
pub type DiResult<T> = Result<T, DiError>;

/// Errors raised while building a catalog, registering bindings or resolving values.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DiError {
	/// No binding satisfies a required parameter or resolution request.
	#[error("unresolvable dependency: no binding for {capability}{}", key_suffix(.key))]
	UnresolvableDependency {
		/// Capability that was requested.
		capability: String,
		/// Binding key of the request, if keyed.
		key: Option<String>,
	},

	/// The type is not described in the catalog.
	#[error("unknown type: {0}")]
	UnknownType(String),

	/// The type exists but cannot be instantiated (abstract, capability, open, constraint failure).
	#[error("type {ty} cannot be constructed: {reason}")]
	NotConstructible {
		/// Requested type.
		ty: String,
		/// Why it cannot be constructed.
		reason: String,
	},

	/// The implementation has no constructor for the requested instantiation.
	#[error("no constructor registered for {0}")]
	MissingConstructor(String),

	/// Wrong number of type arguments.
	#[error("{ty} expects {expected} type argument(s), got {actual}")]
	ArityMismatch {
		/// Offending type.
		ty: String,
		/// Parameters declared by the definition.
		expected: usize,
		/// Arguments supplied.
		actual: usize,
	},

	/// A resolved value is not of the requested Rust type.
	#[error("value produced by {implementation} is not a {expected}")]
	TypeMismatch {
		/// Requested Rust type name.
		expected: &'static str,
		/// Implementation that produced the value.
		implementation: String,
	},

	/// Catalog validation failure.
	#[error("invalid definition for {name}: {reason}")]
	InvalidDefinition {
		/// Definition name.
		name: String,
		/// Validation failure.
		reason: String,
	},

	/// A seed value was passed to a constructor that never asked for it.
	#[error("constructor of {implementation} did not accept the supplied {seed} value")]
	SeedNotConsumed {
		/// Implementation being constructed.
		implementation: String,
		/// Type the seed was supplied as.
		seed: String,
	},

	/// Circular resolution or depth overflow.
	#[error(transparent)]
	Cycle(#[from] CycleError),

	/// A user constructor or factory failed.
	#[error("construction of {ty} failed: {message}")]
	Construction {
		/// Type being constructed.
		ty: String,
		/// Failure message.
		message: String,
	},
}

impl DiError {
	pub(crate) fn unresolvable(capability: &TypeRef, key: Option<&ServiceKey>) -> Self {
		DiError::UnresolvableDependency {
			capability: capability.to_string(),
			key: key.map(ToString::to_string),
		}
	}

	pub(crate) fn not_constructible(ty: &TypeRef, reason: impl Into<String>) -> Self {
		DiError::NotConstructible {
			ty: ty.to_string(),
			reason: reason.into(),
		}
	}

	pub(crate) fn invalid(name: impl ToString, reason: impl Into<String>) -> Self {
		DiError::InvalidDefinition {
			name: name.to_string(),
			reason: reason.into(),
		}
	}

	/// Error for constructors and factories that fail for their own reasons.
	pub fn construction(ty: &TypeRef, message: impl Into<String>) -> Self {
		DiError::Construction {
			ty: ty.to_string(),
			message: message.into(),
		}
	}
}

fn key_suffix(key: &Option<String>) -> String {
	match key {
		Some(key) => format!(" (key `{}`)", key),
		None => String::new(),
	}
}
