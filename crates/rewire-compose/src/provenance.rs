//! Decoration provenance
//!
//! Every binding produced by decoration is linked back to the binding it replaced and the
//! decorator used. Following the links from a binding walks its wrap chain from the outermost
//! decorator inwards.

use rewire_di::{BindingId, TypeRef};
use std::collections::HashMap;

/// Link from a decorated binding to the binding it replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapRecord {
	/// Binding produced by decoration.
	pub result: BindingId,
	/// Binding that was replaced.
	pub original: BindingId,
	/// Closed decorator type applied.
	pub decorator: TypeRef,
	/// Capability of both bindings.
	pub capability: TypeRef,
}

/// Wrap records of one composition session, keyed by resulting binding.
#[derive(Debug, Clone, Default)]
pub struct ProvenanceTable {
	records: HashMap<BindingId, WrapRecord>,
}

impl ProvenanceTable {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn record(&mut self, record: WrapRecord) {
		self.records.insert(record.result, record);
	}

	pub fn get(&self, binding: BindingId) -> Option<&WrapRecord> {
		self.records.get(&binding)
	}

	/// Whether `decorator` appears anywhere along the wrap chain of `binding`.
	pub fn already_wrapped(&self, binding: BindingId, decorator: &TypeRef) -> bool {
		self.chain(binding)
			.iter()
			.any(|record| record.decorator == *decorator)
	}

	/// Wrap chain of `binding`, outermost decorator first.
	pub fn chain(&self, binding: BindingId) -> Vec<&WrapRecord> {
		let mut chain = Vec::new();
		let mut current = binding;
		while let Some(record) = self.get(current) {
			chain.push(record);
			current = record.original;
		}
		chain
	}

	/// Binding at the bottom of the wrap chain of `binding`.
	pub fn origin(&self, binding: BindingId) -> BindingId {
		self.chain(binding)
			.last()
			.map_or(binding, |record| record.original)
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	pub fn records(&self) -> impl Iterator<Item = &WrapRecord> {
		self.records.values()
	}
}
