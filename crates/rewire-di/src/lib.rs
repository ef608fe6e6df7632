//! # Rewire Dependency Injection
//!
//! A small dependency-injection registry over explicitly described types.
//!
//! ## Features
//!
//! - **Type catalog**: capabilities, implementations and plain types are described once, with
//!   generic parameters, constraints and constructors
//! - **Open generics**: bindings for closed capabilities are backed by generic implementations
//! - **Keyed bindings**: keyed and unkeyed bindings of one capability coexist
//! - **Lifetimes**: ephemeral, scoped and shared values
//! - **Compile-time registration**: catalogs assembled from `register_types!` submissions
//!
//! ## Example
//!
//! ```rust
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
//! let catalog = TypeCatalog::builder()
//! 	.with(TypeDefinition::capability("Greeter"))
//! 	.with(
//! 		TypeDefinition::implementation("English")
//! 			.implements(TypeRef::named("Greeter"))
//! 			.constructor(|_| Ok(Instance::new(Arc::new(English) as Arc<dyn Greeter>))),
//! 	)
//! 	.build()
//! 	.unwrap();
//!
//! let mut services = ServiceCollection::new(catalog);
//! services.add_type(TypeRef::named("Greeter"), TypeRef::named("English"), Lifetime::Ephemeral);
//!
//! let provider = services.build_provider();
//! let greeter = provider
//! 	.resolve_as::<Arc<dyn Greeter>>(&TypeRef::named("Greeter"))
//! 	.unwrap();
//! assert_eq!(greeter.greet(), "hello");
//! ```

pub mod activation;
pub mod binding;
pub mod catalog;
pub mod collection;
pub mod cycle_detection;
pub mod error;
pub mod instance;
pub mod provider;
pub mod scope;
pub mod types;

pub use activation::{Activation, Seed};
pub use binding::{Binding, BindingId, ConstructionStrategy, FactoryFn, Lifetime};
pub use catalog::{
	Constraint, ConstructorFn, GenericParam, TypeCatalog, TypeCatalogBuilder, TypeDefinition,
	TypeKind, TypeRegistration,
};
pub use collection::{Registry, ServiceCollection};
pub use cycle_detection::CycleError;
pub use error::{DiError, DiResult};
pub use instance::Instance;
pub use provider::{Resolver, ServiceProvider, ServiceScope};
pub use scope::InstanceCache;
pub use types::{DefId, NamedType, ServiceKey, TypeRef};

// Re-export inventory for type registration
pub use inventory;
