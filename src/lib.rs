//! # Rewire
//!
//! Convention-based registration and decoration for a dependency-injection registry.
//!
//! Rewire describes capabilities and their implementations once in a type catalog, then
//! composes a registry in bulk: every implementation of a capability is bound in one scan,
//! and registered bindings are wrapped with decorators chosen by capability.
//!
//! ## Feature Flags
//!
//! - `compose` (default) - Scan-and-bind and decoration passes
//!
//! ## Quick Example
//!
//! ```rust
//! use rewire::prelude::*;
//! use std::sync::Arc;
//!
//! trait Clock: Send + Sync {
//! 	fn now(&self) -> u64;
//! }
//!
//! struct Fixed;
//!
//! impl Clock for Fixed {
//! 	fn now(&self) -> u64 {
//! 		42
//! 	}
//! }
//!
//! let clock = TypeRef::named("Clock");
//! let catalog = TypeCatalog::builder()
//! 	.with(TypeDefinition::capability("Clock"))
//! 	.with(
//! 		TypeDefinition::implementation("Fixed")
//! 			.implements(clock.clone())
//! 			.constructor(|_| Ok(Instance::new(Arc::new(Fixed) as Arc<dyn Clock>))),
//! 	)
//! 	.build()
//! 	.unwrap();
//!
//! let mut services = ServiceCollection::new(catalog);
//! let mut session = CompositionSession::new(&mut services);
//! session.scan_catalog(&clock, Lifetime::Shared).unwrap();
//! drop(session);
//!
//! let provider = services.build_provider();
//! assert_eq!(provider.resolve_as::<Arc<dyn Clock>>(&clock).unwrap().now(), 42);
//! ```

pub mod compose;
pub mod di;

// Re-export registry types
pub use rewire_di::{
	Binding, BindingId, DiError, DiResult, Instance, Lifetime, Registry, Resolver,
	ServiceCollection, ServiceKey, ServiceProvider, ServiceScope, TypeCatalog, TypeDefinition,
	TypeRef, register_types,
};

// Re-export composition types
#[cfg(feature = "compose")]
pub use rewire_compose::{
	AmbiguityPolicy, ComposeError, ComposeResult, ComposeSettings, CompositionSession,
	ProvenanceTable, WrapRecord,
};

pub mod prelude {
	pub use crate::{
		Binding, DiError, DiResult, Instance, Lifetime, Registry, Resolver, ServiceCollection,
		ServiceKey, ServiceProvider, TypeCatalog, TypeDefinition, TypeRef,
	};

	pub use rewire_di::{Activation, Constraint, NamedType};

	#[cfg(feature = "compose")]
	pub use crate::{AmbiguityPolicy, ComposeError, ComposeSettings, CompositionSession};
}
