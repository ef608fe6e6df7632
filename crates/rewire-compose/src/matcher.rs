//! Capability matching
//!
//! Decides whether a candidate type satisfies a capability. A closed or non-generic
//! capability is matched exactly; a capability that still mentions type parameters is
//! matched by generic definition, whatever the candidate's own type arguments are.
//!
//! ```
//! use rewire_compose::CapabilityMatcher;
//! use rewire_di::{TypeCatalog, TypeDefinition, TypeRef};
//!
//! let catalog = TypeCatalog::builder()
//! 	.with(TypeDefinition::value("i64"))
//! 	.with(TypeDefinition::capability("Repository").param("T"))
//! 	.with(
//! 		TypeDefinition::implementation("LongRepository")
//! 			.implements(TypeRef::generic("Repository", [TypeRef::named("i64")])),
//! 	)
//! 	.build()
//! 	.unwrap();
//!
//! let matcher = CapabilityMatcher::new(&catalog);
//! let candidate = TypeRef::named("LongRepository");
//!
//! assert!(matcher.matches(&candidate, &TypeRef::definition_of("Repository", 1)));
//! assert!(matcher.matches(&candidate, &TypeRef::generic("Repository", [TypeRef::named("i64")])));
//! assert!(!matcher.matches(&candidate, &TypeRef::generic("Repository", [TypeRef::named("String")])));
//! ```

use rewire_di::{TypeCatalog, TypeRef};

/// Pure matcher over the declared capabilities recorded in a catalog.
#[derive(Debug, Clone, Copy)]
pub struct CapabilityMatcher<'a> {
	catalog: &'a TypeCatalog,
}

impl<'a> CapabilityMatcher<'a> {
	pub fn new(catalog: &'a TypeCatalog) -> Self {
		Self { catalog }
	}

	pub fn matches(&self, candidate: &TypeRef, capability: &TypeRef) -> bool {
		self.catalog
			.capabilities_of(candidate)
			.iter()
			.any(|declared| Self::satisfies(declared, capability))
	}

	/// Declared capabilities of `candidate` (transitively) that satisfy `capability`, in
	/// declaration order.
	pub fn matching_capabilities(&self, candidate: &TypeRef, capability: &TypeRef) -> Vec<TypeRef> {
		self.catalog
			.capabilities_of(candidate)
			.into_iter()
			.filter(|declared| Self::satisfies(declared, capability))
			.collect()
	}

	fn satisfies(declared: &TypeRef, capability: &TypeRef) -> bool {
		if declared == capability {
			return true;
		}
		capability.is_open()
			&& declared.generic_definition().is_some()
			&& declared.generic_definition() == capability.generic_definition()
	}
}
