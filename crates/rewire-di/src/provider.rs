//! Resolution
//!
//! A [`ServiceProvider`] is the frozen form of a [`ServiceCollection`](crate::ServiceCollection).
//! It answers requests for capabilities, caching values according to each binding's
//! [`Lifetime`]:
//!
//! - `Ephemeral` values are produced for every request.
//! - `Scoped` values are cached per [`ServiceScope`]; the root provider acts as its own scope.
//! - `Shared` values are cached in the root provider and produced with the root as resolver,
//!   so every scope sees the same value.

use crate::activation::{Seed, activate};
use crate::binding::{Binding, Lifetime};
use crate::catalog::TypeCatalog;
use crate::cycle_detection::begin_resolution;
use crate::error::{DiError, DiResult};
use crate::instance::Instance;
use crate::scope::InstanceCache;
use crate::types::{ServiceKey, TypeRef};
use std::any::Any;
use std::sync::Arc;

/// Source of resolved values.
pub trait Resolver: Send + Sync {
	/// Catalog the resolver instantiates against.
	fn catalog(&self) -> &TypeCatalog;

	/// Value of the last binding registered for `capability` and `key`, if any.
	fn try_resolve(&self, capability: &TypeRef, key: Option<&ServiceKey>) -> DiResult<Option<Instance>>;

	/// Values of every binding registered for `capability` and `key`, in registration order.
	fn resolve_all(&self, capability: &TypeRef, key: Option<&ServiceKey>) -> DiResult<Vec<Instance>>;

	/// Constructs the closed implementation `implementation`, outside any binding.
	///
	/// Constructor parameters come from `seed` when it fits and from this resolver otherwise.
	fn instantiate(&self, implementation: &TypeRef, seed: Option<Seed>) -> DiResult<Instance>;

	fn resolve(&self, capability: &TypeRef) -> DiResult<Instance> {
		self.try_resolve(capability, None)?
			.ok_or_else(|| DiError::unresolvable(capability, None))
	}

	fn resolve_keyed(&self, capability: &TypeRef, key: &ServiceKey) -> DiResult<Instance> {
		self.try_resolve(capability, Some(key))?
			.ok_or_else(|| DiError::unresolvable(capability, Some(key)))
	}

	/// Resolves `capability` and clones the value out as `T`.
	fn resolve_as<T: Any + Clone>(&self, capability: &TypeRef) -> DiResult<T>
	where
		Self: Sized,
	{
		self.resolve(capability)?.get::<T>()
	}
}

struct ProviderInner {
	catalog: Arc<TypeCatalog>,
	bindings: Vec<Binding>,
	shared: InstanceCache,
	root_scope: InstanceCache,
}

/// Root resolver over a frozen binding list.
#[derive(Clone)]
pub struct ServiceProvider {
	inner: Arc<ProviderInner>,
}

impl ServiceProvider {
	pub fn new(catalog: Arc<TypeCatalog>, bindings: Vec<Binding>) -> Self {
		tracing::debug!(bindings = bindings.len(), "service provider built");
		Self {
			inner: Arc::new(ProviderInner {
				catalog,
				bindings,
				shared: InstanceCache::new(),
				root_scope: InstanceCache::new(),
			}),
		}
	}

	pub fn bindings(&self) -> &[Binding] {
		&self.inner.bindings
	}

	/// Opens a scope with its own cache of scoped values.
	pub fn create_scope(&self) -> ServiceScope {
		ServiceScope {
			root: self.clone(),
			cache: InstanceCache::new(),
		}
	}

	fn find(&self, capability: &TypeRef, key: Option<&ServiceKey>) -> Option<&Binding> {
		self.inner
			.bindings
			.iter()
			.rev()
			.find(|binding| binding.matches(capability, key))
	}

	fn find_all<'a>(
		&'a self,
		capability: &'a TypeRef,
		key: Option<&'a ServiceKey>,
	) -> impl Iterator<Item = &'a Binding> + 'a {
		self.inner
			.bindings
			.iter()
			.filter(move |binding| binding.matches(capability, key))
	}

	/// Produces the value of `binding` for a request made through `resolver`, whose scoped
	/// values live in `scope`.
	fn resolve_binding(&self, resolver: &dyn Resolver, scope: &InstanceCache, binding: &Binding) -> DiResult<Instance> {
		tracing::trace!(
			capability = %binding.capability(),
			binding = %binding.id(),
			lifetime = ?binding.lifetime(),
			"resolving binding"
		);
		match binding.lifetime() {
			Lifetime::Ephemeral => produce(resolver, binding),
			Lifetime::Scoped => scope.get_or_try_insert_with(binding.id(), || produce(resolver, binding)),
			Lifetime::Shared => self
				.inner
				.shared
				.get_or_try_insert_with(binding.id(), || produce(self, binding)),
		}
	}
}

fn produce(resolver: &dyn Resolver, binding: &Binding) -> DiResult<Instance> {
	let _guard = begin_resolution(binding.id(), binding.capability())?;
	binding.strategy().produce(resolver, binding.key())
}

impl Resolver for ServiceProvider {
	fn catalog(&self) -> &TypeCatalog {
		&self.inner.catalog
	}

	fn try_resolve(&self, capability: &TypeRef, key: Option<&ServiceKey>) -> DiResult<Option<Instance>> {
		self.find(capability, key)
			.map(|binding| self.resolve_binding(self, &self.inner.root_scope, binding))
			.transpose()
	}

	fn resolve_all(&self, capability: &TypeRef, key: Option<&ServiceKey>) -> DiResult<Vec<Instance>> {
		self.find_all(capability, key)
			.map(|binding| self.resolve_binding(self, &self.inner.root_scope, binding))
			.collect()
	}

	fn instantiate(&self, implementation: &TypeRef, seed: Option<Seed>) -> DiResult<Instance> {
		activate(self, implementation, seed)
	}
}

/// Child resolver with its own scoped values.
///
/// Shared values still come from the root provider.
pub struct ServiceScope {
	root: ServiceProvider,
	cache: InstanceCache,
}

impl ServiceScope {
	pub fn root(&self) -> &ServiceProvider {
		&self.root
	}
}

impl Resolver for ServiceScope {
	fn catalog(&self) -> &TypeCatalog {
		self.root.catalog()
	}

	fn try_resolve(&self, capability: &TypeRef, key: Option<&ServiceKey>) -> DiResult<Option<Instance>> {
		self.root
			.find(capability, key)
			.map(|binding| self.root.resolve_binding(self, &self.cache, binding))
			.transpose()
	}

	fn resolve_all(&self, capability: &TypeRef, key: Option<&ServiceKey>) -> DiResult<Vec<Instance>> {
		self.root
			.find_all(capability, key)
			.map(|binding| self.root.resolve_binding(self, &self.cache, binding))
			.collect()
	}

	fn instantiate(&self, implementation: &TypeRef, seed: Option<Seed>) -> DiResult<Instance> {
		activate(self, implementation, seed)
	}
}
