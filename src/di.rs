//! Dependency injection module.
//!
//! This module provides the type catalog, bindings and resolvers.
//!
//! # Examples
//!
//! ```rust,no_run
//! use rewire::di::{ServiceCollection, TypeCatalog, TypeRef};
//! ```

pub use rewire_di::*;
