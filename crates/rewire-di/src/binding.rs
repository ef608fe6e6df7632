//! Bindings
//!
//! A [`Binding`] tells the registry how to produce a value for a capability: from a
//! concrete type, from a factory closure or from a ready-made instance.

use crate::error::DiResult;
use crate::instance::Instance;
use crate::provider::Resolver;
use crate::types::{ServiceKey, TypeRef};
use serde::Deserialize;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use uuid::Uuid;

/// How long a resolved value lives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifetime {
	/// A new value for every request.
	#[default]
	Ephemeral,
	/// One value per scope.
	Scoped,
	/// One value for the root provider and all its scopes.
	Shared,
}

/// Identity of a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(Uuid);

impl BindingId {
	pub fn new() -> Self {
		Self(Uuid::new_v4())
	}
}

impl Default for BindingId {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Display for BindingId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

type FactoryInner = Arc<dyn Fn(&dyn Resolver, Option<&ServiceKey>) -> DiResult<Instance> + Send + Sync>;

/// Factory closure of a binding.
///
/// Receives the resolver the value is requested from and the binding key.
#[derive(Clone)]
pub struct FactoryFn(FactoryInner);

impl FactoryFn {
	pub fn new<F>(factory: F) -> Self
	where
		F: Fn(&dyn Resolver, Option<&ServiceKey>) -> DiResult<Instance> + Send + Sync + 'static,
	{
		Self(Arc::new(factory))
	}

	pub fn call(&self, resolver: &dyn Resolver, key: Option<&ServiceKey>) -> DiResult<Instance> {
		(self.0)(resolver, key)
	}
}

impl Deref for FactoryFn {
	type Target = FactoryInner;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl fmt::Debug for FactoryFn {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("FactoryFn(..)")
	}
}

/// How a binding produces its value. Exactly one strategy per binding.
#[derive(Debug, Clone)]
pub enum ConstructionStrategy {
	/// Construct a concrete, closed type through its catalog constructor.
	FromType(TypeRef),
	/// Call a factory.
	FromFactory(FactoryFn),
	/// Hand out a pre-built value.
	FromInstance(Instance),
}

impl ConstructionStrategy {
	/// Produces a value with this strategy, outside any caching.
	pub fn produce(&self, resolver: &dyn Resolver, key: Option<&ServiceKey>) -> DiResult<Instance> {
		match self {
			ConstructionStrategy::FromType(ty) => resolver.instantiate(ty, None),
			ConstructionStrategy::FromFactory(factory) => factory.call(resolver, key),
			ConstructionStrategy::FromInstance(instance) => Ok(instance.clone()),
		}
	}

	/// Implementation type known without running the strategy.
	pub fn implementation_type(&self) -> Option<&TypeRef> {
		match self {
			ConstructionStrategy::FromType(ty) => Some(ty),
			ConstructionStrategy::FromFactory(_) => None,
			ConstructionStrategy::FromInstance(instance) => instance.implementation(),
		}
	}
}

/// A registration of a capability.
#[derive(Debug, Clone)]
pub struct Binding {
	id: BindingId,
	capability: TypeRef,
	key: Option<ServiceKey>,
	lifetime: Lifetime,
	strategy: ConstructionStrategy,
}

impl Binding {
	pub fn new(capability: TypeRef, lifetime: Lifetime, strategy: ConstructionStrategy) -> Self {
		Self {
			id: BindingId::new(),
			capability,
			key: None,
			lifetime,
			strategy,
		}
	}

	/// Binding constructing `implementation` for `capability`.
	pub fn from_type(capability: TypeRef, implementation: TypeRef, lifetime: Lifetime) -> Self {
		Self::new(
			capability,
			lifetime,
			ConstructionStrategy::FromType(implementation),
		)
	}

	/// Binding calling `factory` for `capability`.
	///
	/// ```
	/// use rewire_di::{Binding, Instance, Lifetime, TypeRef};
	///
	/// let binding = Binding::from_factory(TypeRef::named("Clock"), Lifetime::Scoped, |_, _| {
	/// 	Ok(Instance::new(0u64))
	/// });
	/// assert_eq!(binding.lifetime(), Lifetime::Scoped);
	/// ```
	pub fn from_factory<F>(capability: TypeRef, lifetime: Lifetime, factory: F) -> Self
	where
		F: Fn(&dyn Resolver, Option<&ServiceKey>) -> DiResult<Instance> + Send + Sync + 'static,
	{
		Self::new(
			capability,
			lifetime,
			ConstructionStrategy::FromFactory(FactoryFn::new(factory)),
		)
	}

	/// Binding handing out `instance`. Always [`Lifetime::Shared`].
	pub fn from_instance(capability: TypeRef, instance: Instance) -> Self {
		Self::new(
			capability,
			Lifetime::Shared,
			ConstructionStrategy::FromInstance(instance),
		)
	}

	pub fn with_key(mut self, key: impl Into<ServiceKey>) -> Self {
		self.key = Some(key.into());
		self
	}

	/// Sets the key, or clears it with `None`.
	pub fn with_optional_key(mut self, key: Option<ServiceKey>) -> Self {
		self.key = key;
		self
	}

	pub fn id(&self) -> BindingId {
		self.id
	}

	pub fn capability(&self) -> &TypeRef {
		&self.capability
	}

	pub fn key(&self) -> Option<&ServiceKey> {
		self.key.as_ref()
	}

	pub fn lifetime(&self) -> Lifetime {
		self.lifetime
	}

	pub fn strategy(&self) -> &ConstructionStrategy {
		&self.strategy
	}

	pub fn is_keyed(&self) -> bool {
		self.key.is_some()
	}

	/// Whether the binding answers a request for `capability` with `key`.
	///
	/// Keyed and unkeyed requests never match each other's bindings.
	pub fn matches(&self, capability: &TypeRef, key: Option<&ServiceKey>) -> bool {
		self.capability == *capability && self.key.as_ref() == key
	}

	pub fn implementation_type(&self) -> Option<&TypeRef> {
		self.strategy.implementation_type()
	}
}
