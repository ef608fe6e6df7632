//! Composition module.
//!
//! This module provides scan-and-bind and decoration passes over a registry.
//!
//! # Examples
//!
//! ```rust,no_run
//! # #[cfg(feature = "compose")]
//! use rewire::compose::{ComposeSettings, CompositionSession};
//! ```

#[cfg(feature = "compose")]
pub use rewire_compose::*;
