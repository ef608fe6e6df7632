//! Integration test utilities for Rewire
//!
//! Shared fixtures for the composition scenarios: a generic `Producer<T>` capability with
//! plain, keyed, constrained and abstract implementations plus two decorators.

pub mod catalog;
pub mod producers;

pub use catalog::{
	SPECIAL_KEY, abstract_producer, catalog, long, param_producer, producer, proxy, second_proxy,
	string, widget,
};
pub use producers::{
	AnyProducer, LongProducer, ParamProducer, Producer, ProxyProducer, SecondProxyProducer,
	StringProducer, Widget,
};
