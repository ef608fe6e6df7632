//! Instance caches backing scoped and shared lifetimes

use crate::binding::BindingId;
use crate::error::DiResult;
use crate::instance::Instance;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Cache of produced values, keyed by the binding that produced them.
#[derive(Clone, Default)]
pub struct InstanceCache {
	entries: Arc<RwLock<HashMap<BindingId, Instance>>>,
}

impl InstanceCache {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self, id: BindingId) -> Option<Instance> {
		self.entries.read().get(&id).cloned()
	}

	/// Stores `instance` unless a value is already cached, and returns the cached value.
	pub fn insert(&self, id: BindingId, instance: Instance) -> Instance {
		self.entries.write().entry(id).or_insert(instance).clone()
	}

	/// Returns the cached value or produces one.
	///
	/// No lock is held while `produce` runs, so producers may resolve other cached values.
	/// When two threads race, the first stored value wins and both get it.
	pub fn get_or_try_insert_with<F>(&self, id: BindingId, produce: F) -> DiResult<Instance>
	where
		F: FnOnce() -> DiResult<Instance>,
	{
		if let Some(instance) = self.get(id) {
			tracing::trace!(binding = %id, "instance cache hit");
			return Ok(instance);
		}
		let instance = produce()?;
		Ok(self.insert(id, instance))
	}

	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}
}
