//! Decoration composer
//!
//! Wraps already registered bindings with decorator implementations. A decorator is an
//! implementation of some capability whose constructor takes a value of that same capability:
//! the wrapped binding's value is handed to it as a [`Seed`].
//!
//! A pass works on a snapshot of the registry. For every binding whose capability is an
//! abstract capability it looks up decorator candidates (exact capability first, generic
//! definition second), closes open-generic decorators against the capability, consults the
//! provenance table and the optional filter, then replaces the binding with one whose factory
//! produces the original value and constructs the decorator around it.

use crate::error::{ComposeError, ComposeResult};
use crate::generic::GenericResolver;
use crate::provenance::{ProvenanceTable, WrapRecord};
use crate::settings::{AmbiguityPolicy, ComposeSettings};
use indexmap::IndexMap;
use rewire_di::{
	Binding, ConstructionStrategy, DiError, Lifetime, Registry, Seed, TypeCatalog, TypeKind, TypeRef,
};

/// Predicate deciding per (capability, closed decorator) whether to decorate.
pub type DecoratorFilter<'f> = &'f dyn Fn(&TypeRef, &TypeRef) -> bool;

/// Decorator candidates indexed by the capabilities they declare.
///
/// Capabilities that mention the decorator's own parameters are indexed under their generic
/// definition; closed ones under themselves.
#[derive(Debug, Default)]
pub struct DecoratorIndex {
	entries: IndexMap<TypeRef, Vec<TypeRef>>,
}

impl DecoratorIndex {
	pub fn build(catalog: &TypeCatalog, candidates: &[TypeRef]) -> ComposeResult<Self> {
		let mut index = Self::default();
		for candidate in candidates {
			let definition = catalog
				.definition_of(candidate)
				.ok_or_else(|| DiError::UnknownType(candidate.to_string()))?;
			if definition.kind() != TypeKind::Implementation || definition.is_abstract() {
				continue;
			}
			for capability in catalog.capabilities_of(candidate) {
				let slot = match capability.generic_definition() {
					Some(generic) if capability.is_open() => generic,
					_ => capability,
				};
				let decorators = index.entries.entry(slot).or_default();
				if !decorators.contains(candidate) {
					decorators.push(candidate.clone());
				}
			}
		}
		Ok(index)
	}

	/// Candidates for `capability`: exact entry, else its generic definition's entry.
	pub fn lookup(&self, capability: &TypeRef) -> Option<&[TypeRef]> {
		self.entries
			.get(capability)
			.or_else(|| {
				capability
					.generic_definition()
					.and_then(|definition| self.entries.get(&definition))
			})
			.map(Vec::as_slice)
	}
}

/// Applies one decoration pass to a registry.
pub struct DecorationComposer<'a> {
	catalog: &'a TypeCatalog,
	settings: &'a ComposeSettings,
	resolver: GenericResolver<'a>,
}

impl<'a> DecorationComposer<'a> {
	pub fn new(catalog: &'a TypeCatalog, settings: &'a ComposeSettings) -> Self {
		Self {
			catalog,
			settings,
			resolver: GenericResolver::new(catalog),
		}
	}

	/// Decorates every eligible binding of `registry` and returns the wrap records produced.
	pub fn compose<R>(
		&self,
		registry: &mut R,
		provenance: &mut ProvenanceTable,
		candidates: &[TypeRef],
		filter: Option<DecoratorFilter<'_>>,
	) -> ComposeResult<Vec<WrapRecord>>
	where
		R: Registry + ?Sized,
	{
		let index = DecoratorIndex::build(self.catalog, candidates)?;
		let snapshot = registry.bindings().to_vec();
		let mut records = Vec::new();

		for binding in &snapshot {
			let capability = binding.capability();
			if !self.catalog.is_capability(capability) {
				continue;
			}

			let Some((first, rest)) = index.lookup(capability).and_then(<[TypeRef]>::split_first)
			else {
				self.skip(binding, "no decorator candidate");
				continue;
			};
			let candidate = self.select(capability, first, rest)?;

			let decorator = if candidate.is_open() {
				match self.resolver.resolve(candidate, capability) {
					Some(decorator) => decorator,
					None => {
						self.skip(binding, "decorator cannot be closed over the capability");
						continue;
					}
				}
			} else {
				candidate.clone()
			};

			if provenance.already_wrapped(binding.id(), &decorator) {
				self.skip(binding, "decorator already in the wrap chain");
				continue;
			}
			if binding.implementation_type() == Some(&decorator) {
				self.skip(binding, "binding is produced by the decorator itself");
				continue;
			}
			if filter.is_some_and(|filter| !filter(capability, &decorator)) {
				self.skip(binding, "rejected by filter");
				continue;
			}

			let decorated = decorate(binding, decorator.clone());
			let result = decorated.id();
			if registry.replace(binding.id(), decorated).is_none() {
				self.skip(binding, "binding left the registry during the pass");
				continue;
			}

			tracing::debug!(
				capability = %capability,
				decorator = %decorator,
				original = %binding.id(),
				result = %result,
				"binding decorated"
			);
			let record = WrapRecord {
				result,
				original: binding.id(),
				decorator,
				capability: capability.clone(),
			};
			provenance.record(record.clone());
			records.push(record);
		}

		tracing::info!(
			candidates = candidates.len(),
			bindings = snapshot.len(),
			decorated = records.len(),
			"decoration pass complete"
		);
		Ok(records)
	}

	fn select<'d>(
		&self,
		capability: &TypeRef,
		first: &'d TypeRef,
		rest: &'d [TypeRef],
	) -> ComposeResult<&'d TypeRef> {
		if rest.is_empty() {
			return Ok(first);
		}
		match self.settings.ambiguity {
			AmbiguityPolicy::FailFast => Err(ComposeError::AmbiguousDecorator {
				capability: capability.to_string(),
				candidates: std::iter::once(first)
					.chain(rest)
					.map(ToString::to_string)
					.collect(),
			}),
			AmbiguityPolicy::PickFirst => {
				tracing::warn!(
					capability = %capability,
					kept = %first,
					discarded = ?rest.iter().map(ToString::to_string).collect::<Vec<_>>(),
					"ambiguous decorators, keeping the first"
				);
				Ok(first)
			}
		}
	}

	fn skip(&self, binding: &Binding, reason: &str) {
		if self.settings.trace_skips {
			tracing::debug!(
				capability = %binding.capability(),
				binding = %binding.id(),
				reason,
				"binding not decorated"
			);
		}
	}
}

/// Replacement for `original` that constructs `decorator` around the original value.
///
/// Keeps the key and the lifetime, except that instance bindings become shared.
fn decorate(original: &Binding, decorator: TypeRef) -> Binding {
	let lifetime = match original.strategy() {
		ConstructionStrategy::FromInstance(_) => Lifetime::Shared,
		_ => original.lifetime(),
	};
	let strategy = original.strategy().clone();
	let capability = original.capability().clone();

	Binding::from_factory(original.capability().clone(), lifetime, move |resolver, key| {
		let inner = strategy.produce(resolver, key)?;
		resolver.instantiate(&decorator, Some(Seed::new(capability.clone(), inner)))
	})
	.with_optional_key(original.key().cloned())
}
