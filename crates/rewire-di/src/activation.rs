//! Constructor activation
//!
//! Constructors registered in the [`TypeCatalog`](crate::TypeCatalog) pull their parameters
//! through an [`Activation`]. An activation may carry a [`Seed`]: a value handed in by the
//! caller of [`Resolver::instantiate`] that takes precedence over the registry for the first
//! parameter whose type it can stand in for. Decorators receive the value they wrap this way.

use crate::catalog::TypeKind;
use crate::error::{DiError, DiResult};
use crate::instance::Instance;
use crate::provider::Resolver;
use crate::types::{ServiceKey, TypeRef};
use std::any::Any;

/// Value supplied to a constructor ahead of the registry.
#[derive(Debug, Clone)]
pub struct Seed {
	ty: TypeRef,
	value: Instance,
}

impl Seed {
	/// `ty` is the type the value is offered as.
	pub fn new(ty: TypeRef, value: Instance) -> Self {
		Self { ty, value }
	}

	pub fn ty(&self) -> &TypeRef {
		&self.ty
	}

	pub fn value(&self) -> &Instance {
		&self.value
	}
}

/// Parameter source of a running constructor.
pub struct Activation<'a> {
	resolver: &'a dyn Resolver,
	implementation: &'a TypeRef,
	seed: Option<Seed>,
}

impl<'a> Activation<'a> {
	pub(crate) fn new(resolver: &'a dyn Resolver, implementation: &'a TypeRef, seed: Option<Seed>) -> Self {
		Self {
			resolver,
			implementation,
			seed,
		}
	}

	/// Closed type being constructed.
	pub fn implementation(&self) -> &TypeRef {
		self.implementation
	}

	/// Type arguments of the type being constructed.
	pub fn type_args(&self) -> &[TypeRef] {
		self.implementation.args()
	}

	pub fn resolver(&self) -> &'a dyn Resolver {
		self.resolver
	}

	/// Seed still waiting to be consumed.
	pub fn seed(&self) -> Option<&Seed> {
		self.seed.as_ref()
	}

	/// Required parameter of type `ty`: the seed when it fits, otherwise the registry.
	pub fn parameter(&mut self, ty: &TypeRef) -> DiResult<Instance> {
		if let Some(seed) = self.take_seed(ty) {
			return Ok(seed);
		}
		self.resolver.resolve(ty)
	}

	/// [`parameter`](Self::parameter) cloned out as `T`.
	pub fn parameter_as<T: Any + Clone>(&mut self, ty: &TypeRef) -> DiResult<T> {
		self.parameter(ty)?.get::<T>()
	}

	/// Parameter that may be absent from the registry.
	pub fn optional(&mut self, ty: &TypeRef) -> DiResult<Option<Instance>> {
		if let Some(seed) = self.take_seed(ty) {
			return Ok(Some(seed));
		}
		self.resolver.try_resolve(ty, None)
	}

	/// Parameter resolved from a keyed binding. Seeds never satisfy keyed parameters.
	pub fn keyed_parameter(&mut self, ty: &TypeRef, key: &ServiceKey) -> DiResult<Instance> {
		self.resolver.resolve_keyed(ty, key)
	}

	/// Every unkeyed value bound for `ty`, in registration order.
	pub fn all(&self, ty: &TypeRef) -> DiResult<Vec<Instance>> {
		self.resolver.resolve_all(ty, None)
	}

	fn take_seed(&mut self, ty: &TypeRef) -> Option<Instance> {
		let resolver = self.resolver;
		let catalog = resolver.catalog();
		self.seed
			.take_if(|seed| catalog.is_assignable(seed.ty(), ty))
			.map(|seed| seed.value)
	}

	fn finish(self) -> DiResult<()> {
		match self.seed {
			Some(seed) => Err(DiError::SeedNotConsumed {
				implementation: self.implementation.to_string(),
				seed: seed.ty.to_string(),
			}),
			None => Ok(()),
		}
	}
}

/// Constructs the closed implementation `ty` with its catalog constructor.
pub(crate) fn activate(resolver: &dyn Resolver, ty: &TypeRef, seed: Option<Seed>) -> DiResult<Instance> {
	let catalog = resolver.catalog();
	let definition = catalog
		.definition_of(ty)
		.ok_or_else(|| DiError::UnknownType(ty.to_string()))?;

	if definition.kind() != TypeKind::Implementation {
		return Err(DiError::not_constructible(ty, "not an implementation type"));
	}
	if definition.is_abstract() {
		return Err(DiError::not_constructible(ty, "abstract type"));
	}
	if ty.is_open() {
		return Err(DiError::not_constructible(ty, "open generic type"));
	}
	if definition.arity() != ty.args().len() {
		return Err(DiError::ArityMismatch {
			ty: ty.to_string(),
			expected: definition.arity(),
			actual: ty.args().len(),
		});
	}
	if !catalog.satisfies_constraints(definition.id(), ty.args()) {
		return Err(DiError::not_constructible(
			ty,
			"type arguments violate generic constraints",
		));
	}

	let constructor = catalog
		.constructor_for(ty)
		.ok_or_else(|| DiError::MissingConstructor(ty.to_string()))?;

	let mut activation = Activation::new(resolver, ty, seed);
	let instance = constructor(&mut activation)?;
	activation.finish()?;
	Ok(instance.with_implementation(ty.clone()))
}
