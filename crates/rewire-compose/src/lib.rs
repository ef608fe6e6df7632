//! # Rewire Composition
//!
//! Bulk registration and decoration passes over a [`rewire_di`] registry.
//!
//! ## Features
//!
//! - **Scan-and-bind**: bind every candidate implementing a capability, including open-generic
//!   capabilities and keyed implementations
//! - **Decoration**: wrap registered bindings with decorators chosen by capability, composing
//!   pipelines across passes
//! - **Pipeline guard**: a decorator is never applied twice along one wrap chain
//! - **Filters**: suppress decoration per (capability, decorator) pair
//!
//! ## Example
//!
//! ```rust
//! use rewire_compose::CompositionSession;
//! use rewire_di::{
//! 	Instance, Lifetime, Resolver, ServiceCollection, TypeCatalog, TypeDefinition, TypeRef,
//! };
//! use std::sync::Arc;
//!
//! trait Greeter: Send + Sync {
//! 	fn greet(&self) -> String;
//! }
//!
//! struct English;
//!
//! impl Greeter for English {
//! 	fn greet(&self) -> String {
//! 		"hello".into()
//! 	}
//! }
//!
//! struct Shouting(Arc<dyn Greeter>);
//!
//! impl Greeter for Shouting {
//! 	fn greet(&self) -> String {
//! 		self.0.greet().to_uppercase()
//! 	}
//! }
//!
//! let greeter = TypeRef::named("Greeter");
//! let catalog = TypeCatalog::builder()
//! 	.with(TypeDefinition::capability("Greeter"))
//! 	.with(
//! 		TypeDefinition::implementation("English")
//! 			.implements(greeter.clone())
//! 			.constructor(|_| Ok(Instance::new(Arc::new(English) as Arc<dyn Greeter>))),
//! 	)
//! 	.with(
//! 		TypeDefinition::implementation("Shouting")
//! 			.implements(greeter.clone())
//! 			.constructor(|activation| {
//! 				let inner = activation.parameter_as::<Arc<dyn Greeter>>(&TypeRef::named("Greeter"))?;
//! 				Ok(Instance::new(Arc::new(Shouting(inner)) as Arc<dyn Greeter>))
//! 			}),
//! 	)
//! 	.build()
//! 	.unwrap();
//!
//! let mut services = ServiceCollection::new(catalog);
//! let mut session = CompositionSession::new(&mut services);
//! session
//! 	.scan_and_bind(&greeter, &[TypeRef::named("English")], Lifetime::Ephemeral)
//! 	.unwrap();
//! session.apply_decorators(&[TypeRef::named("Shouting")]).unwrap();
//! drop(session);
//!
//! let provider = services.build_provider();
//! let resolved = provider.resolve_as::<Arc<dyn Greeter>>(&greeter).unwrap();
//! assert_eq!(resolved.greet(), "HELLO");
//! ```

pub mod decorate;
pub mod error;
pub mod generic;
pub mod matcher;
pub mod provenance;
pub mod scan;
pub mod session;
pub mod settings;

pub use decorate::{DecorationComposer, DecoratorFilter, DecoratorIndex};
pub use error::{ComposeError, ComposeResult};
pub use generic::GenericResolver;
pub use matcher::CapabilityMatcher;
pub use provenance::{ProvenanceTable, WrapRecord};
pub use scan::Scanner;
pub use session::CompositionSession;
pub use settings::{AmbiguityPolicy, ComposeSettings};
