//! Binding registry

use crate::binding::{Binding, BindingId, Lifetime};
use crate::catalog::TypeCatalog;
use crate::provider::ServiceProvider;
use crate::types::{ServiceKey, TypeRef};
use std::sync::Arc;

/// Mutable store of bindings, consumed by composition passes before the registry is frozen.
pub trait Registry {
	/// Catalog the bindings are instantiated against.
	fn catalog(&self) -> Arc<TypeCatalog>;

	/// Bindings in registration order.
	fn bindings(&self) -> &[Binding];

	fn add(&mut self, binding: Binding);

	/// Removes the binding with `id`, returning it.
	fn remove(&mut self, id: BindingId) -> Option<Binding>;

	/// Replaces the binding with `id`. Nothing is added when no such binding exists.
	fn replace(&mut self, id: BindingId, binding: Binding) -> Option<Binding> {
		let removed = self.remove(id)?;
		self.add(binding);
		Some(removed)
	}
}

/// Ordered binding list backed by a [`TypeCatalog`].
///
/// # Examples
///
/// ```
/// use rewire_di::{Instance, Lifetime, Resolver, ServiceCollection, TypeCatalog, TypeDefinition, TypeRef};
///
/// let catalog = TypeCatalog::builder()
/// 	.with(TypeDefinition::capability("Clock"))
/// 	.with(
/// 		TypeDefinition::implementation("FixedClock")
/// 			.implements(TypeRef::named("Clock"))
/// 			.constructor(|_| Ok(Instance::new(7u64))),
/// 	)
/// 	.build()
/// 	.unwrap();
///
/// let mut services = ServiceCollection::new(catalog);
/// services.add_type(TypeRef::named("Clock"), TypeRef::named("FixedClock"), Lifetime::Shared);
///
/// let provider = services.build_provider();
/// let clock = provider.resolve(&TypeRef::named("Clock")).unwrap();
/// assert_eq!(clock.get::<u64>().unwrap(), 7);
/// ```
#[derive(Debug, Clone)]
pub struct ServiceCollection {
	catalog: Arc<TypeCatalog>,
	bindings: Vec<Binding>,
}

impl ServiceCollection {
	pub fn new(catalog: TypeCatalog) -> Self {
		Self::with_catalog(Arc::new(catalog))
	}

	pub fn with_catalog(catalog: Arc<TypeCatalog>) -> Self {
		Self {
			catalog,
			bindings: Vec::new(),
		}
	}

	/// Registers `implementation` for `capability`.
	pub fn add_type(&mut self, capability: TypeRef, implementation: TypeRef, lifetime: Lifetime) -> BindingId {
		self.push(Binding::from_type(capability, implementation, lifetime))
	}

	/// Registers a binding and returns its identity.
	pub fn push(&mut self, binding: Binding) -> BindingId {
		let id = binding.id();
		self.add(binding);
		id
	}

	pub fn get(&self, id: BindingId) -> Option<&Binding> {
		self.bindings.iter().find(|binding| binding.id() == id)
	}

	/// The binding answering single resolution of `capability`: the last one registered.
	pub fn find(&self, capability: &TypeRef, key: Option<&ServiceKey>) -> Option<&Binding> {
		self.bindings
			.iter()
			.rev()
			.find(|binding| binding.matches(capability, key))
	}

	/// Every binding for `capability` and `key`, in registration order.
	pub fn find_all<'a>(
		&'a self,
		capability: &'a TypeRef,
		key: Option<&'a ServiceKey>,
	) -> impl Iterator<Item = &'a Binding> + 'a {
		self.bindings
			.iter()
			.filter(move |binding| binding.matches(capability, key))
	}

	pub fn len(&self) -> usize {
		self.bindings.len()
	}

	pub fn is_empty(&self) -> bool {
		self.bindings.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Binding> {
		self.bindings.iter()
	}

	/// Freezes the current bindings into a provider.
	pub fn build_provider(&self) -> ServiceProvider {
		ServiceProvider::new(Arc::clone(&self.catalog), self.bindings.clone())
	}

	fn position(&self, id: BindingId) -> Option<usize> {
		self.bindings.iter().position(|binding| binding.id() == id)
	}
}

impl Registry for ServiceCollection {
	fn catalog(&self) -> Arc<TypeCatalog> {
		Arc::clone(&self.catalog)
	}

	fn bindings(&self) -> &[Binding] {
		&self.bindings
	}

	fn add(&mut self, binding: Binding) {
		self.bindings.push(binding);
	}

	fn remove(&mut self, id: BindingId) -> Option<Binding> {
		let position = self.position(id)?;
		Some(self.bindings.remove(position))
	}

	/// Keeps the replacement at the position of the replaced binding, so registration order
	/// (and with it last-wins resolution) is unchanged.
	fn replace(&mut self, id: BindingId, binding: Binding) -> Option<Binding> {
		let position = self.position(id)?;
		Some(std::mem::replace(&mut self.bindings[position], binding))
	}
}
