//! Composition sessions
//!
//! A [`CompositionSession`] borrows a registry mutably for as long as composition runs, so no
//! other pass can touch the registry meanwhile. It owns the provenance table shared by all of
//! its decoration passes, and a later session over the same registry can resume from it.

use crate::decorate::DecorationComposer;
use crate::error::ComposeResult;
use crate::provenance::{ProvenanceTable, WrapRecord};
use crate::scan::Scanner;
use crate::settings::ComposeSettings;
use rewire_di::{Binding, Lifetime, NamedType, Registry, TypeCatalog, TypeRef};
use std::sync::Arc;

/// Scan and decoration passes over one registry.
///
/// # Example
///
/// ```
/// use rewire_compose::CompositionSession;
/// use rewire_di::{Instance, Lifetime, Registry, ServiceCollection, TypeCatalog, TypeDefinition, TypeRef};
///
/// let catalog = TypeCatalog::builder()
/// 	.with(TypeDefinition::capability("Clock"))
/// 	.with(
/// 		TypeDefinition::implementation("SystemClock")
/// 			.implements(TypeRef::named("Clock"))
/// 			.constructor(|_| Ok(Instance::new(0u64))),
/// 	)
/// 	.build()
/// 	.unwrap();
/// let mut services = ServiceCollection::new(catalog);
///
/// let mut session = CompositionSession::new(&mut services);
/// let bound = session
/// 	.scan_catalog(&TypeRef::named("Clock"), Lifetime::Shared)
/// 	.unwrap();
/// assert_eq!(bound.len(), 1);
/// drop(session);
///
/// assert_eq!(services.bindings().len(), 1);
/// ```
pub struct CompositionSession<'r, R: Registry + ?Sized> {
	registry: &'r mut R,
	catalog: Arc<TypeCatalog>,
	settings: ComposeSettings,
	provenance: ProvenanceTable,
}

impl<'r, R: Registry + ?Sized> CompositionSession<'r, R> {
	pub fn new(registry: &'r mut R) -> Self {
		Self::with_settings(registry, ComposeSettings::default())
	}

	pub fn with_settings(registry: &'r mut R, settings: ComposeSettings) -> Self {
		Self::resume(registry, settings, ProvenanceTable::new())
	}

	/// Continues composition over `registry` with the provenance of an earlier session.
	///
	/// `provenance` must come from [`into_provenance`](Self::into_provenance) of a session over
	/// the same registry, so decorators already in a chain are not applied twice.
	pub fn resume(
		registry: &'r mut R,
		settings: ComposeSettings,
		provenance: ProvenanceTable,
	) -> Self {
		let catalog = registry.catalog();
		Self {
			registry,
			catalog,
			settings,
			provenance,
		}
	}

	pub fn settings(&self) -> &ComposeSettings {
		&self.settings
	}

	pub fn provenance(&self) -> &ProvenanceTable {
		&self.provenance
	}

	pub fn registry(&self) -> &R {
		self.registry
	}

	/// Ends the session, handing back its provenance table.
	pub fn into_provenance(self) -> ProvenanceTable {
		self.provenance
	}

	/// Binds every candidate matching `capability`. Returns the bindings added.
	pub fn scan_and_bind(
		&mut self,
		capability: &TypeRef,
		candidates: &[TypeRef],
		lifetime: Lifetime,
	) -> ComposeResult<Vec<Binding>> {
		let bindings = Scanner::new(&self.catalog).scan(capability, candidates, lifetime)?;
		Ok(self.commit(capability, candidates.len(), bindings))
	}

	/// [`scan_and_bind`](Self::scan_and_bind) with the capability named by `C`.
	///
	/// Without a lifetime the session's default lifetime applies.
	pub fn scan_and_bind_for<C: NamedType + ?Sized>(
		&mut self,
		candidates: &[TypeRef],
		lifetime: impl Into<Option<Lifetime>>,
	) -> ComposeResult<Vec<Binding>> {
		let lifetime = self.lifetime_or_default(lifetime.into());
		self.scan_and_bind(&C::type_ref(), candidates, lifetime)
	}

	/// Scans every implementation of the catalog.
	pub fn scan_catalog(
		&mut self,
		capability: &TypeRef,
		lifetime: impl Into<Option<Lifetime>>,
	) -> ComposeResult<Vec<Binding>> {
		let lifetime = self.lifetime_or_default(lifetime.into());
		let candidates = self.catalog.implementations();
		self.scan_and_bind(capability, &candidates, lifetime)
	}

	/// Like [`scan_and_bind`](Self::scan_and_bind), but each capability and key may be bound by
	/// one candidate only. Nothing is added when the scan fails.
	pub fn scan_and_bind_unique(
		&mut self,
		capability: &TypeRef,
		candidates: &[TypeRef],
		lifetime: Lifetime,
	) -> ComposeResult<Vec<Binding>> {
		let bindings = Scanner::new(&self.catalog).scan_unique(
			capability,
			candidates,
			lifetime,
			self.settings.ambiguity,
		)?;
		Ok(self.commit(capability, candidates.len(), bindings))
	}

	/// Wraps every eligible binding with the matching decorator among `candidates`.
	pub fn apply_decorators(&mut self, candidates: &[TypeRef]) -> ComposeResult<Vec<WrapRecord>> {
		DecorationComposer::new(&self.catalog, &self.settings).compose(
			self.registry,
			&mut self.provenance,
			candidates,
			None,
		)
	}

	/// [`apply_decorators`](Self::apply_decorators), decorating only where
	/// `filter(capability, decorator)` holds.
	pub fn apply_decorators_filtered<F>(
		&mut self,
		candidates: &[TypeRef],
		filter: F,
	) -> ComposeResult<Vec<WrapRecord>>
	where
		F: Fn(&TypeRef, &TypeRef) -> bool,
	{
		DecorationComposer::new(&self.catalog, &self.settings).compose(
			self.registry,
			&mut self.provenance,
			candidates,
			Some(&filter),
		)
	}

	fn lifetime_or_default(&self, lifetime: Option<Lifetime>) -> Lifetime {
		lifetime.unwrap_or(self.settings.default_lifetime)
	}

	fn commit(&mut self, capability: &TypeRef, scanned: usize, bindings: Vec<Binding>) -> Vec<Binding> {
		for binding in &bindings {
			self.registry.add(binding.clone());
		}
		tracing::info!(
			capability = %capability,
			candidates = scanned,
			bound = bindings.len(),
			"scan pass complete"
		);
		bindings
	}
}
