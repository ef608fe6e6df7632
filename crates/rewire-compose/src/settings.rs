//! Composition settings
//!
//! Settings are read from a small TOML document:
//!
//! ```toml
//! default_lifetime = "scoped"
//! ambiguity = "pick-first"
//! trace_skips = false
//! ```
//!
//! Every field is optional and falls back to [`ComposeSettings::default`].

use crate::error::{ComposeError, ComposeResult};
use rewire_di::Lifetime;
use serde::Deserialize;
use std::path::PathBuf;

/// What to do when several candidates compete for one binding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AmbiguityPolicy {
	/// Abort the pass with an ambiguity error.
	#[default]
	FailFast,
	/// Keep the first candidate and log the others.
	PickFirst,
}

/// Settings of a composition session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ComposeSettings {
	/// Lifetime of scanned bindings when a pass does not name one.
	pub default_lifetime: Lifetime,
	/// Handling of competing candidates.
	pub ambiguity: AmbiguityPolicy,
	/// Emit a debug event for every binding a pass leaves alone.
	pub trace_skips: bool,
}

impl Default for ComposeSettings {
	fn default() -> Self {
		Self {
			default_lifetime: Lifetime::Ephemeral,
			ambiguity: AmbiguityPolicy::FailFast,
			trace_skips: true,
		}
	}
}

impl ComposeSettings {
	/// Parses settings from TOML text.
	///
	/// ```
	/// use rewire_compose::{AmbiguityPolicy, ComposeSettings};
	///
	/// let settings = ComposeSettings::from_toml_str(r#"ambiguity = "pick-first""#).unwrap();
	/// assert_eq!(settings.ambiguity, AmbiguityPolicy::PickFirst);
	/// assert!(settings.trace_skips);
	/// ```
	pub fn from_toml_str(text: &str) -> ComposeResult<Self> {
		Ok(toml::from_str(text)?)
	}

	/// Reads and parses a TOML settings file.
	pub fn from_toml_file(path: impl Into<PathBuf>) -> ComposeResult<Self> {
		let path = path.into();
		let text = std::fs::read_to_string(&path)
			.map_err(|source| ComposeError::SettingsIo { path, source })?;
		Self::from_toml_str(&text)
	}

	pub fn with_default_lifetime(mut self, lifetime: Lifetime) -> Self {
		self.default_lifetime = lifetime;
		self
	}

	pub fn with_ambiguity(mut self, ambiguity: AmbiguityPolicy) -> Self {
		self.ambiguity = ambiguity;
		self
	}

	pub fn with_trace_skips(mut self, trace_skips: bool) -> Self {
		self.trace_skips = trace_skips;
		self
	}
}
