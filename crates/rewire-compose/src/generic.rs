//! Open-generic instantiation
//!
//! Closes an open-generic candidate against a closed capability: the candidate's K type
//! parameters take the first K type arguments of the capability, and the closed candidate is
//! accepted only when it still satisfies the capability.

use rewire_di::{TypeCatalog, TypeRef};

/// Instantiates open-generic candidates from closed capabilities.
#[derive(Debug, Clone, Copy)]
pub struct GenericResolver<'a> {
	catalog: &'a TypeCatalog,
}

impl<'a> GenericResolver<'a> {
	pub fn new(catalog: &'a TypeCatalog) -> Self {
		Self { catalog }
	}

	/// Closed candidate type for `capability`, or `None` when the candidate cannot be closed
	/// against it.
	///
	/// Fails when the capability is not closed, carries fewer arguments than the candidate has
	/// parameters, an argument violates a parameter constraint, or the closed candidate
	/// declares no capability that `capability` is assignable to.
	///
	/// ```
	/// use rewire_compose::GenericResolver;
	/// use rewire_di::{TypeCatalog, TypeDefinition, TypeRef};
	///
	/// let catalog = TypeCatalog::builder()
	/// 	.with(TypeDefinition::value("i64"))
	/// 	.with(TypeDefinition::capability("Repository").param("T"))
	/// 	.with(
	/// 		TypeDefinition::implementation("Cached")
	/// 			.param("T")
	/// 			.implements(TypeRef::generic("Repository", [TypeRef::Param(0)])),
	/// 	)
	/// 	.build()
	/// 	.unwrap();
	///
	/// let resolver = GenericResolver::new(&catalog);
	/// let closed = resolver.resolve(
	/// 	&TypeRef::definition_of("Cached", 1),
	/// 	&TypeRef::generic("Repository", [TypeRef::named("i64")]),
	/// );
	/// assert_eq!(closed, Some(TypeRef::generic("Cached", [TypeRef::named("i64")])));
	/// ```
	pub fn resolve(&self, candidate: &TypeRef, capability: &TypeRef) -> Option<TypeRef> {
		if capability.is_open() {
			return None;
		}
		let definition = self.catalog.definition_of(candidate)?;
		let arity = definition.arity();
		let args = capability.args();
		if args.len() < arity {
			return None;
		}

		let args = &args[..arity];
		if !self.catalog.satisfies_constraints(definition.id(), args) {
			return None;
		}

		let closed = TypeRef::generic(definition.id().clone(), args.iter().cloned());
		let satisfied = self
			.catalog
			.capabilities_of(&closed)
			.iter()
			.any(|declared| self.catalog.is_assignable(capability, declared));
		satisfied.then_some(closed)
	}
}
