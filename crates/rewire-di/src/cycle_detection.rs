//! Thread-local circular resolution detection
//!
//! Resolution is synchronous, so the stack of bindings currently being produced lives in a
//! thread-local. Every binding resolution enters the stack through [`begin_resolution`] and
//! leaves it when the returned [`ResolutionGuard`] drops.
//!
//! Bindings are tracked by identity rather than by capability: a decorated binding produces
//! its inner value straight from the original strategy, so decorator chains over the same
//! capability never look like cycles.

use crate::binding::BindingId;
use crate::types::TypeRef;
use std::cell::RefCell;
use std::collections::HashSet;

/// Maximum resolution depth (prevents pathological cases)
const MAX_RESOLUTION_DEPTH: usize = 100;

struct CycleDetectionState {
	/// Bindings currently being resolved
	resolution_set: HashSet<BindingId>,
	/// Resolution path (for displaying circular paths)
	resolution_path: Vec<(BindingId, TypeRef)>,
}

impl CycleDetectionState {
	fn new() -> Self {
		Self {
			resolution_set: HashSet::new(),
			resolution_path: Vec::new(),
		}
	}
}

thread_local! {
	static CYCLE_STATE: RefCell<CycleDetectionState> = RefCell::new(CycleDetectionState::new());
}

/// Record the start of a binding resolution.
///
/// Fails when the binding is already on the stack of the current thread, or when the stack
/// is deeper than [`MAX_RESOLUTION_DEPTH`].
pub fn begin_resolution(id: BindingId, capability: &TypeRef) -> Result<ResolutionGuard, CycleError> {
	CYCLE_STATE.with(|state| {
		let mut state = state.borrow_mut();

		if state.resolution_set.contains(&id) {
			return Err(CycleError::CircularDependency {
				capability: capability.to_string(),
				path: build_cycle_path(&state, id, capability),
			});
		}

		let depth = state.resolution_path.len() + 1;
		if depth > MAX_RESOLUTION_DEPTH {
			return Err(CycleError::MaxDepthExceeded(depth));
		}

		state.resolution_set.insert(id);
		state.resolution_path.push((id, capability.clone()));
		Ok(ResolutionGuard { id })
	})
}

/// Current depth of the resolution stack on this thread.
pub fn resolution_depth() -> usize {
	CYCLE_STATE.with(|state| state.borrow().resolution_path.len())
}

/// RAII guard: removes the binding from the resolution stack on drop.
#[derive(Debug)]
pub struct ResolutionGuard {
	id: BindingId,
}

impl Drop for ResolutionGuard {
	fn drop(&mut self) {
		CYCLE_STATE.with(|state| {
			let mut state = state.borrow_mut();
			state.resolution_set.remove(&self.id);
			if let Some(position) = state
				.resolution_path
				.iter()
				.rposition(|(id, _)| *id == self.id)
			{
				state.resolution_path.remove(position);
			}
		});
	}
}

fn build_cycle_path(state: &CycleDetectionState, id: BindingId, capability: &TypeRef) -> String {
	match state
		.resolution_path
		.iter()
		.position(|(entry, _)| *entry == id)
	{
		Some(start) => {
			let cycle: Vec<String> = state.resolution_path[start..]
				.iter()
				.map(|(_, ty)| ty.to_string())
				.collect();
			format!("{} -> {}", cycle.join(" -> "), capability)
		}
		None => format!("unknown cycle involving {}", capability),
	}
}

/// Circular resolution error
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
	/// A binding depends on itself, directly or through other bindings
	#[error("circular dependency detected: {capability}\n  path: {path}")]
	CircularDependency {
		/// Capability of the binding that closed the cycle
		capability: String,
		/// Circular path (format: A -> B -> C -> A)
		path: String,
	},

	/// Maximum resolution depth exceeded
	#[error("maximum resolution depth exceeded: {0}")]
	MaxDepthExceeded(usize),
}
