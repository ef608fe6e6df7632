//! Scan-and-bind
//!
//! Turns a set of candidate types into bindings for one target capability. Abstract and
//! still-open candidates are ignored, as are capabilities, values and types declaring nothing
//! that matches. Each match yields one binding constructing the candidate, keyed with the
//! candidate's declared key.

use crate::error::{ComposeError, ComposeResult};
use crate::matcher::CapabilityMatcher;
use crate::settings::AmbiguityPolicy;
use indexmap::IndexMap;
use rewire_di::{Binding, DiError, Lifetime, ServiceKey, TypeCatalog, TypeDefinition, TypeKind, TypeRef};

/// Plans the bindings a scan produces. Never touches a registry.
#[derive(Debug, Clone, Copy)]
pub struct Scanner<'a> {
	catalog: &'a TypeCatalog,
	matcher: CapabilityMatcher<'a>,
}

impl<'a> Scanner<'a> {
	pub fn new(catalog: &'a TypeCatalog) -> Self {
		Self {
			catalog,
			matcher: CapabilityMatcher::new(catalog),
		}
	}

	/// One binding per (candidate, matching capability), in candidate order.
	pub fn scan(&self, capability: &TypeRef, candidates: &[TypeRef], lifetime: Lifetime) -> ComposeResult<Vec<Binding>> {
		self.check_capability(capability)?;

		let mut bindings = Vec::new();
		for candidate in candidates {
			let Some(definition) = self.scannable(candidate)? else {
				continue;
			};
			for matched in self.matcher.matching_capabilities(candidate, capability) {
				bindings.push(
					Binding::from_type(matched, candidate.clone(), lifetime)
						.with_optional_key(definition.key().cloned()),
				);
			}
		}
		Ok(bindings)
	}

	/// Like [`scan`](Self::scan), but at most one candidate may bind each capability and key.
	///
	/// With [`AmbiguityPolicy::FailFast`] the first contested pair fails the scan; with
	/// [`AmbiguityPolicy::PickFirst`] the first candidate wins and the rest are dropped.
	pub fn scan_unique(
		&self,
		capability: &TypeRef,
		candidates: &[TypeRef],
		lifetime: Lifetime,
		policy: AmbiguityPolicy,
	) -> ComposeResult<Vec<Binding>> {
		let mut groups: IndexMap<(TypeRef, Option<ServiceKey>), Vec<Binding>> = IndexMap::new();
		for binding in self.scan(capability, candidates, lifetime)? {
			groups
				.entry((binding.capability().clone(), binding.key().cloned()))
				.or_default()
				.push(binding);
		}

		let mut bindings = Vec::with_capacity(groups.len());
		for ((bound, key), mut contenders) in groups {
			if contenders.len() > 1 {
				let names: Vec<String> = contenders
					.iter()
					.filter_map(Binding::implementation_type)
					.map(ToString::to_string)
					.collect();
				match policy {
					AmbiguityPolicy::FailFast => {
						return Err(ComposeError::AmbiguousImplementation {
							capability: bound.to_string(),
							key: key.map(|key| key.to_string()),
							candidates: names,
						});
					}
					AmbiguityPolicy::PickFirst => {
						let (kept, discarded) = names.split_at(1);
						tracing::warn!(
							capability = %bound,
							kept = ?kept,
							discarded = ?discarded,
							"ambiguous implementations, keeping the first"
						);
					}
				}
			}
			contenders.truncate(1);
			bindings.append(&mut contenders);
		}
		Ok(bindings)
	}

	fn check_capability(&self, capability: &TypeRef) -> ComposeResult<()> {
		match self.catalog.kind_of(capability) {
			Some(TypeKind::Capability) => Ok(()),
			Some(_) => Err(DiError::NotConstructible {
				ty: capability.to_string(),
				reason: "scan target is not a capability".to_string(),
			}
			.into()),
			None => Err(DiError::UnknownType(capability.to_string()).into()),
		}
	}

	/// Definition of a candidate that may be bound, `None` for candidates to skip.
	fn scannable(&self, candidate: &TypeRef) -> ComposeResult<Option<&'a TypeDefinition>> {
		let definition = self
			.catalog
			.definition_of(candidate)
			.ok_or_else(|| DiError::UnknownType(candidate.to_string()))?;
		let bindable = definition.kind() == TypeKind::Implementation
			&& !definition.is_abstract()
			&& !candidate.is_open();
		Ok(bindable.then_some(definition))
	}
}
