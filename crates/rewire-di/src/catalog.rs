//! Type catalog
//!
//! The catalog is the registry's view of the type system. Every capability, implementation
//! and plain value type that takes part in registration is described by a
//! [`TypeDefinition`]: its generic parameters and their constraints, the capabilities it
//! declares, whether it is abstract, the binding key it asks for and the constructors that
//! produce it.
//!
//! Catalogs are built once at start-up, either explicitly through
//! [`TypeCatalog::builder`] or from compile-time registrations collected with
//! [`register_types!`](crate::register_types) and [`TypeCatalog::discover`].
//!
//! # Example
//!
//! ```
//! use rewire_di::{Instance, TypeCatalog, TypeDefinition, TypeRef};
//!
//! let catalog = TypeCatalog::builder()
//! 	.with(TypeDefinition::capability("Clock"))
//! 	.with(
//! 		TypeDefinition::implementation("SystemClock")
//! 			.implements(TypeRef::named("Clock"))
//! 			.constructor(|_| Ok(Instance::new(0u64))),
//! 	)
//! 	.build()
//! 	.unwrap();
//!
//! let clock = TypeRef::named("SystemClock");
//! assert!(catalog.is_assignable(&clock, &TypeRef::named("Clock")));
//! assert_eq!(catalog.implementations(), vec![clock]);
//! ```

use crate::activation::Activation;
use crate::error::{DiError, DiResult};
use crate::instance::Instance;
use crate::types::{DefId, ServiceKey, TypeRef};
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Constructor of an implementation type.
///
/// Receives an [`Activation`] through which it pulls its parameters from the resolver.
pub type ConstructorFn = Arc<dyn Fn(&mut Activation<'_>) -> DiResult<Instance> + Send + Sync>;

/// What a definition describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
	/// An abstract capability that bindings are registered for.
	Capability,
	/// A concrete (or abstract) implementation that can be scanned and constructed.
	Implementation,
	/// A plain type that only appears as a type argument.
	Value,
}

/// Constraint on a generic parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
	/// The argument must be assignable to the capability. Parameters of the constrained
	/// definition are substituted before the check.
	Implements(TypeRef),
	/// The argument must be a non-abstract implementation with a constructor.
	Constructible,
}

/// A generic parameter of a definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericParam {
	name: String,
	constraints: Vec<Constraint>,
}

impl GenericParam {
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn constraints(&self) -> &[Constraint] {
		&self.constraints
	}
}

/// Description of a single type.
#[derive(Clone)]
pub struct TypeDefinition {
	id: DefId,
	kind: TypeKind,
	params: Vec<GenericParam>,
	capabilities: Vec<TypeRef>,
	is_abstract: bool,
	key: Option<ServiceKey>,
	constructor: Option<ConstructorFn>,
	instantiations: HashMap<Vec<TypeRef>, ConstructorFn>,
}

impl TypeDefinition {
	fn new(id: impl Into<DefId>, kind: TypeKind) -> Self {
		Self {
			id: id.into(),
			kind,
			params: Vec::new(),
			capabilities: Vec::new(),
			is_abstract: false,
			key: None,
			constructor: None,
			instantiations: HashMap::new(),
		}
	}

	/// Starts a capability definition.
	pub fn capability(id: impl Into<DefId>) -> Self {
		Self::new(id, TypeKind::Capability)
	}

	/// Starts an implementation definition.
	pub fn implementation(id: impl Into<DefId>) -> Self {
		Self::new(id, TypeKind::Implementation)
	}

	/// Starts a plain value definition.
	pub fn value(id: impl Into<DefId>) -> Self {
		Self::new(id, TypeKind::Value)
	}

	/// Adds an unconstrained generic parameter. Parameters are referenced by position
	/// with [`TypeRef::Param`].
	pub fn param(self, name: impl Into<String>) -> Self {
		self.param_with(name, [])
	}

	/// Adds a generic parameter with constraints.
	pub fn param_with<I>(mut self, name: impl Into<String>, constraints: I) -> Self
	where
		I: IntoIterator<Item = Constraint>,
	{
		self.params.push(GenericParam {
			name: name.into(),
			constraints: constraints.into_iter().collect(),
		});
		self
	}

	/// Declares a capability of an implementation or value type.
	pub fn implements(mut self, capability: TypeRef) -> Self {
		self.capabilities.push(capability);
		self
	}

	/// Declares a super-capability of a capability.
	pub fn extends(self, capability: TypeRef) -> Self {
		self.implements(capability)
	}

	/// Marks an implementation abstract: it is never scanned nor constructed.
	pub fn abstract_type(mut self) -> Self {
		self.is_abstract = true;
		self
	}

	/// Key used for bindings produced by scanning this implementation.
	pub fn keyed(mut self, key: impl Into<ServiceKey>) -> Self {
		self.key = Some(key.into());
		self
	}

	/// General constructor, used for every instantiation without a dedicated one.
	pub fn constructor<F>(mut self, constructor: F) -> Self
	where
		F: Fn(&mut Activation<'_>) -> DiResult<Instance> + Send + Sync + 'static,
	{
		self.constructor = Some(Arc::new(constructor));
		self
	}

	/// Constructor for one closed instantiation of a generic implementation.
	///
	/// ```
	/// use rewire_di::{Instance, TypeDefinition, TypeRef};
	///
	/// let holder = TypeDefinition::implementation("Holder")
	/// 	.param("T")
	/// 	.instantiation([TypeRef::named("i64")], |_| Ok(Instance::new(0i64)))
	/// 	.instantiation([TypeRef::named("String")], |_| Ok(Instance::new(String::new())));
	///
	/// assert!(holder.has_constructor_for(&[TypeRef::named("i64")]));
	/// assert!(!holder.has_constructor_for(&[TypeRef::named("u8")]));
	/// ```
	pub fn instantiation<I, F>(mut self, args: I, constructor: F) -> Self
	where
		I: IntoIterator<Item = TypeRef>,
		F: Fn(&mut Activation<'_>) -> DiResult<Instance> + Send + Sync + 'static,
	{
		self.instantiations
			.insert(args.into_iter().collect(), Arc::new(constructor));
		self
	}

	pub fn id(&self) -> &DefId {
		&self.id
	}

	pub fn kind(&self) -> TypeKind {
		self.kind
	}

	pub fn params(&self) -> &[GenericParam] {
		&self.params
	}

	pub fn arity(&self) -> usize {
		self.params.len()
	}

	/// Declared capabilities, expressed over this definition's own parameters.
	pub fn declared_capabilities(&self) -> &[TypeRef] {
		&self.capabilities
	}

	pub fn is_abstract(&self) -> bool {
		self.is_abstract
	}

	pub fn key(&self) -> Option<&ServiceKey> {
		self.key.as_ref()
	}

	/// This definition applied to its own parameters.
	pub fn generic_definition(&self) -> TypeRef {
		TypeRef::definition_of(self.id.clone(), self.arity())
	}

	pub fn has_constructor_for(&self, args: &[TypeRef]) -> bool {
		self.constructor_for(args).is_some()
	}

	fn constructor_for(&self, args: &[TypeRef]) -> Option<&ConstructorFn> {
		self.instantiations
			.get(args)
			.or(self.constructor.as_ref())
	}
}

impl fmt::Debug for TypeDefinition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TypeDefinition")
			.field("id", &self.id)
			.field("kind", &self.kind)
			.field("params", &self.params)
			.field("capabilities", &self.capabilities)
			.field("is_abstract", &self.is_abstract)
			.field("key", &self.key)
			.field("constructor", &self.constructor.is_some())
			.field("instantiations", &self.instantiations.len())
			.finish()
	}
}

/// Builder collecting definitions and validating them as a whole.
#[derive(Default)]
pub struct TypeCatalogBuilder {
	definitions: IndexMap<DefId, TypeDefinition>,
	duplicates: Vec<DefId>,
}

impl TypeCatalogBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a definition. A second definition under the same name fails [`build`](Self::build).
	pub fn define(&mut self, definition: TypeDefinition) -> &mut Self {
		if self.definitions.contains_key(definition.id()) {
			self.duplicates.push(definition.id().clone());
		} else {
			self.definitions.insert(definition.id().clone(), definition);
		}
		self
	}

	/// Owned variant of [`define`](Self::define) for chaining.
	pub fn with(mut self, definition: TypeDefinition) -> Self {
		self.define(definition);
		self
	}

	/// Applies every registration submitted with [`register_types!`](crate::register_types).
	pub fn with_registered(mut self) -> Self {
		for registration in inventory::iter::<TypeRegistration> {
			registration.apply(&mut self);
		}
		self
	}

	/// Validates the definitions and freezes them into a catalog.
	pub fn build(self) -> DiResult<TypeCatalog> {
		if let Some(duplicate) = self.duplicates.first() {
			return Err(DiError::invalid(duplicate, "defined more than once"));
		}

		let catalog = TypeCatalog {
			definitions: self.definitions,
		};
		for definition in catalog.definitions.values() {
			catalog.validate(definition)?;
		}
		Ok(catalog)
	}
}

/// Validated, immutable set of type definitions.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
	definitions: IndexMap<DefId, TypeDefinition>,
}

impl TypeCatalog {
	pub fn builder() -> TypeCatalogBuilder {
		TypeCatalogBuilder::new()
	}

	/// Builds a catalog from every compile-time registration.
	pub fn discover() -> DiResult<Self> {
		Self::builder().with_registered().build()
	}

	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}

	pub fn definition(&self, id: &DefId) -> Option<&TypeDefinition> {
		self.definitions.get(id)
	}

	/// Definition referenced by a type expression, `None` for parameters and unknown names.
	pub fn definition_of(&self, ty: &TypeRef) -> Option<&TypeDefinition> {
		ty.def().and_then(|id| self.definition(id))
	}

	pub fn kind_of(&self, ty: &TypeRef) -> Option<TypeKind> {
		self.definition_of(ty).map(TypeDefinition::kind)
	}

	pub fn is_capability(&self, ty: &TypeRef) -> bool {
		self.kind_of(ty) == Some(TypeKind::Capability)
	}

	/// Generic definition of the type's definition, `None` for non-generic or unknown types.
	pub fn generic_definition_of(&self, ty: &TypeRef) -> Option<TypeRef> {
		self.definition_of(ty)
			.filter(|definition| definition.arity() > 0)
			.map(TypeDefinition::generic_definition)
	}

	/// Type expression for a named definition: its generic definition when generic.
	pub fn type_ref(&self, name: &str) -> DiResult<TypeRef> {
		self.definition(&DefId::new(name))
			.map(TypeDefinition::generic_definition)
			.ok_or_else(|| DiError::UnknownType(name.to_string()))
	}

	/// Every implementation definition, in definition order, as generic definitions.
	pub fn implementations(&self) -> Vec<TypeRef> {
		self.definitions
			.values()
			.filter(|definition| definition.kind() == TypeKind::Implementation)
			.map(TypeDefinition::generic_definition)
			.collect()
	}

	/// Directly declared capabilities of `ty`, with its type arguments substituted.
	///
	/// For a generic definition the result still mentions its parameters.
	pub fn declared_capabilities(&self, ty: &TypeRef) -> Vec<TypeRef> {
		let Some(definition) = self.definition_of(ty) else {
			return Vec::new();
		};
		definition
			.declared_capabilities()
			.iter()
			.filter_map(|capability| capability.substitute(ty.args()))
			.collect()
	}

	/// Declared capabilities plus, transitively, the capabilities they extend.
	///
	/// Order follows declaration order, depth first; duplicates are dropped.
	pub fn capabilities_of(&self, ty: &TypeRef) -> Vec<TypeRef> {
		let mut seen = IndexSet::new();
		let mut pending: Vec<TypeRef> = self.declared_capabilities(ty).into_iter().rev().collect();
		while let Some(capability) = pending.pop() {
			if seen.insert(capability.clone()) {
				pending.extend(self.declared_capabilities(&capability).into_iter().rev());
			}
		}
		seen.into_iter().collect()
	}

	/// Whether a value of type `from` can stand in for `to`.
	pub fn is_assignable(&self, from: &TypeRef, to: &TypeRef) -> bool {
		from == to || self.capabilities_of(from).contains(to)
	}

	/// Whether `args` satisfy every constraint declared on the parameters of `id`.
	pub fn satisfies_constraints(&self, id: &DefId, args: &[TypeRef]) -> bool {
		let Some(definition) = self.definition(id) else {
			return false;
		};
		if definition.arity() != args.len() {
			return false;
		}
		definition
			.params()
			.iter()
			.zip(args)
			.all(|(param, arg)| {
				param
					.constraints()
					.iter()
					.all(|constraint| self.satisfies(constraint, arg, args))
			})
	}

	fn satisfies(&self, constraint: &Constraint, arg: &TypeRef, args: &[TypeRef]) -> bool {
		match constraint {
			Constraint::Implements(capability) => capability
				.substitute(args)
				.is_some_and(|capability| self.is_assignable(arg, &capability)),
			Constraint::Constructible => self.definition_of(arg).is_some_and(|definition| {
				definition.kind() == TypeKind::Implementation
					&& !definition.is_abstract()
					&& !arg.is_open()
					&& definition.has_constructor_for(arg.args())
			}),
		}
	}

	/// Constructor producing the closed type `ty`.
	pub fn constructor_for(&self, ty: &TypeRef) -> Option<ConstructorFn> {
		self.definition_of(ty)
			.and_then(|definition| definition.constructor_for(ty.args()))
			.cloned()
	}

	fn validate(&self, definition: &TypeDefinition) -> DiResult<()> {
		let name = definition.id();
		let arity = definition.arity();

		for capability in definition.declared_capabilities() {
			self.validate_ref(name, capability, arity)?;
			if !self.is_capability(capability) {
				return Err(DiError::invalid(
					name,
					format!("{} is not a capability", capability),
				));
			}
		}

		for param in definition.params() {
			for constraint in param.constraints() {
				if let Constraint::Implements(capability) = constraint {
					self.validate_ref(name, capability, arity)?;
					if !self.is_capability(capability) {
						return Err(DiError::invalid(
							name,
							format!(
								"constraint on {} names {}, which is not a capability",
								param.name(),
								capability
							),
						));
					}
				}
			}
		}

		if definition.kind() != TypeKind::Implementation
			&& (definition.constructor.is_some() || !definition.instantiations.is_empty())
		{
			return Err(DiError::invalid(name, "only implementations have constructors"));
		}

		for args in definition.instantiations.keys() {
			if args.len() != arity {
				return Err(DiError::ArityMismatch {
					ty: name.to_string(),
					expected: arity,
					actual: args.len(),
				});
			}
			for arg in args {
				if arg.is_open() {
					return Err(DiError::invalid(
						name,
						format!("instantiation argument {} is not closed", arg),
					));
				}
				self.validate_ref(name, arg, 0)?;
			}
		}

		Ok(())
	}

	/// Checks that every definition referenced by `ty` exists with matching arity and that
	/// parameters stay below `params`.
	fn validate_ref(&self, owner: &DefId, ty: &TypeRef, params: usize) -> DiResult<()> {
		match ty {
			TypeRef::Param(index) if *index < params => Ok(()),
			TypeRef::Param(index) => Err(DiError::invalid(
				owner,
				format!("type parameter T{} is out of range", index),
			)),
			TypeRef::Named { def, args } => {
				let referenced = self
					.definition(def)
					.ok_or_else(|| DiError::UnknownType(def.to_string()))?;
				if referenced.arity() != args.len() {
					return Err(DiError::ArityMismatch {
						ty: ty.to_string(),
						expected: referenced.arity(),
						actual: args.len(),
					});
				}
				args.iter()
					.try_for_each(|arg| self.validate_ref(owner, arg, params))
			}
		}
	}
}

/// Compile-time catalog registration.
///
/// Submitted through [`register_types!`](crate::register_types) and applied by
/// [`TypeCatalog::discover`].
pub struct TypeRegistration {
	register: fn(&mut TypeCatalogBuilder),
}

impl TypeRegistration {
	pub const fn new(register: fn(&mut TypeCatalogBuilder)) -> Self {
		Self { register }
	}

	pub fn apply(&self, builder: &mut TypeCatalogBuilder) {
		(self.register)(builder)
	}
}

inventory::collect!(TypeRegistration);

/// Submits a function that defines types into the discovered catalog.
///
/// # Example
///
/// ```ignore
/// use rewire_di::{register_types, TypeCatalogBuilder, TypeDefinition};
///
/// fn clock_types(builder: &mut TypeCatalogBuilder) {
///     builder.define(TypeDefinition::capability("Clock"));
/// }
///
/// register_types!(clock_types);
///
/// let catalog = rewire_di::TypeCatalog::discover().unwrap();
/// ```
#[macro_export]
macro_rules! register_types {
	($register:path) => {
		$crate::inventory::submit! {
			$crate::TypeRegistration::new($register)
		}
	};
}
