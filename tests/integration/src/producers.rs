//! Producer implementations used across scenarios

use rewire_di::{NamedType, TypeRef};
use std::marker::PhantomData;
use std::sync::Arc;

/// Generic capability under test.
pub trait Producer<T>: Send + Sync {
	fn produce(&self) -> T;

	/// Names of the implementations involved, outermost first.
	fn layers(&self) -> Vec<&'static str>;
}

impl<T: NamedType + 'static> NamedType for dyn Producer<T> {
	fn type_ref() -> TypeRef {
		crate::producer(T::type_ref())
	}
}

/// Marker naming the open `Producer<T>` definition.
pub struct AnyProducer;

impl NamedType for AnyProducer {
	fn type_ref() -> TypeRef {
		TypeRef::definition_of("Producer", 1)
	}
}

pub struct LongProducer;

impl Producer<i64> for LongProducer {
	fn produce(&self) -> i64 {
		123
	}

	fn layers(&self) -> Vec<&'static str> {
		vec!["LongProducer"]
	}
}

pub struct StringProducer;

impl Producer<String> for StringProducer {
	fn produce(&self) -> String {
		"123".to_string()
	}

	fn layers(&self) -> Vec<&'static str> {
		vec!["StringProducer"]
	}
}

/// Argument type satisfying the constructible constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Widget {
	pub label: String,
}

impl NamedType for Widget {
	fn type_ref() -> TypeRef {
		crate::widget()
	}
}

/// Produces a fresh `K` on every call.
pub struct ParamProducer<K> {
	_marker: PhantomData<fn() -> K>,
}

impl<K> ParamProducer<K> {
	pub fn new() -> Self {
		Self {
			_marker: PhantomData,
		}
	}
}

impl<K> Default for ParamProducer<K> {
	fn default() -> Self {
		Self::new()
	}
}

impl<K: Default> Producer<K> for ParamProducer<K> {
	fn produce(&self) -> K {
		K::default()
	}

	fn layers(&self) -> Vec<&'static str> {
		vec!["ParamProducer"]
	}
}

/// First decorator: forwards to the wrapped producer.
pub struct ProxyProducer<T> {
	inner: Arc<dyn Producer<T>>,
}

impl<T> ProxyProducer<T> {
	pub fn new(inner: Arc<dyn Producer<T>>) -> Self {
		Self { inner }
	}
}

impl<T> Producer<T> for ProxyProducer<T> {
	fn produce(&self) -> T {
		self.inner.produce()
	}

	fn layers(&self) -> Vec<&'static str> {
		let mut layers = vec!["ProxyProducer"];
		layers.extend(self.inner.layers());
		layers
	}
}

/// Second decorator, stacked over the first.
pub struct SecondProxyProducer<T> {
	inner: Arc<dyn Producer<T>>,
}

impl<T> SecondProxyProducer<T> {
	pub fn new(inner: Arc<dyn Producer<T>>) -> Self {
		Self { inner }
	}
}

impl<T> Producer<T> for SecondProxyProducer<T> {
	fn produce(&self) -> T {
		self.inner.produce()
	}

	fn layers(&self) -> Vec<&'static str> {
		let mut layers = vec!["SecondProxyProducer"];
		layers.extend(self.inner.layers());
		layers
	}
}
