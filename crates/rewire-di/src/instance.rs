//! Type-erased resolved values

use crate::error::{DiError, DiResult};
use crate::types::TypeRef;
use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

/// A value produced by a binding.
///
/// Capability values are conventionally stored as `Arc<dyn Capability + Send + Sync>` so
/// that consumers can clone them out with [`Instance::get`]. The instance also remembers the
/// implementation type that produced it, when known.
///
/// ```
/// use rewire_di::{Instance, TypeRef};
///
/// let instance = Instance::new(42i64).with_implementation(TypeRef::named("Answer"));
///
/// assert_eq!(instance.get::<i64>().unwrap(), 42);
/// assert!(instance.get::<String>().is_err());
/// assert_eq!(instance.implementation(), Some(&TypeRef::named("Answer")));
/// ```
#[derive(Clone)]
pub struct Instance {
	value: Arc<dyn Any + Send + Sync>,
	implementation: Option<TypeRef>,
}

impl Instance {
	pub fn new<T: Any + Send + Sync>(value: T) -> Self {
		Self::from_arc(Arc::new(value))
	}

	pub fn from_arc(value: Arc<dyn Any + Send + Sync>) -> Self {
		Self {
			value,
			implementation: None,
		}
	}

	/// Implementation type that produced the value.
	pub fn implementation(&self) -> Option<&TypeRef> {
		self.implementation.as_ref()
	}

	pub fn with_implementation(mut self, implementation: TypeRef) -> Self {
		self.implementation = Some(implementation);
		self
	}

	pub fn is<T: Any>(&self) -> bool {
		self.value.is::<T>()
	}

	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		self.value.downcast_ref::<T>()
	}

	/// Clones the value out as `T`.
	pub fn get<T: Any + Clone>(&self) -> DiResult<T> {
		self.downcast_ref::<T>()
			.cloned()
			.ok_or_else(|| DiError::TypeMismatch {
				expected: type_name::<T>(),
				implementation: self.implementation_name(),
			})
	}

	/// Whether both instances share the same underlying value.
	pub fn ptr_eq(&self, other: &Instance) -> bool {
		Arc::ptr_eq(&self.value, &other.value)
	}

	fn implementation_name(&self) -> String {
		self.implementation
			.as_ref()
			.map_or_else(|| "<unknown>".to_string(), ToString::to_string)
	}
}

impl fmt::Debug for Instance {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Instance")
			.field("implementation", &self.implementation)
			.finish_non_exhaustive()
	}
}
