//! Keyed and unkeyed bindings of one capability are decorated independently

use rewire_compose::CompositionSession;
use rewire_di::{
	Binding, Instance, Lifetime, Resolver, ServiceCollection, ServiceKey, ServiceProvider, TypeRef,
};
use rewire_integration_tests::{
	Producer, ProxyProducer, SPECIAL_KEY, StringProducer, catalog, producer, proxy, second_proxy,
	string,
};
use rstest::rstest;
use std::sync::Arc;

fn special() -> ServiceKey {
	ServiceKey::from(SPECIAL_KEY)
}

fn string_producer() -> TypeRef {
	TypeRef::named("StringProducer")
}

fn unkeyed_string() -> Binding {
	Binding::from_instance(
		producer(string()),
		Instance::new(Arc::new(StringProducer) as Arc<dyn Producer<String>>),
	)
}

/// Unkeyed binding whose instance is already the decorator around `StringProducer`.
fn prewrapped_string() -> Binding {
	let wrapped: Arc<dyn Producer<String>> =
		Arc::new(ProxyProducer::new(Arc::new(StringProducer)));
	Binding::from_instance(
		producer(string()),
		Instance::new(wrapped).with_implementation(proxy_of_string()),
	)
}

fn proxy_of_string() -> TypeRef {
	TypeRef::generic("ProxyProducer", [string()])
}

fn layers(provider: &ServiceProvider, key: Option<&ServiceKey>) -> Vec<&'static str> {
	provider
		.try_resolve(&producer(string()), key)
		.unwrap()
		.unwrap()
		.get::<Arc<dyn Producer<String>>>()
		.unwrap()
		.layers()
}

#[rstest]
fn test_keyed_decoration_leaves_unkeyed_binding_alone() {
	// Arrange
	let mut services = ServiceCollection::new(catalog());
	let unkeyed = services.push(prewrapped_string());
	let mut session = CompositionSession::new(&mut services);
	session
		.scan_and_bind(&producer(string()), &[string_producer()], Lifetime::Ephemeral)
		.unwrap();

	// Act
	let records = session.apply_decorators(&[proxy()]).unwrap();
	let provenance = session.into_provenance();

	// Assert
	assert_eq!(records.len(), 1);
	assert_eq!(provenance.len(), 1);
	assert_ne!(records[0].original, unkeyed);
	let decorated = services.get(records[0].result).unwrap();
	assert_eq!(decorated.key(), Some(&special()));

	let untouched = services.get(unkeyed).unwrap();
	assert_eq!(untouched.key(), None);
	assert_eq!(untouched.lifetime(), Lifetime::Shared);
	assert_eq!(untouched.implementation_type(), Some(&proxy_of_string()));
	assert!(provenance.chain(unkeyed).is_empty());

	let ids: Vec<_> = services.iter().map(|binding| binding.id()).collect();
	assert_eq!(ids, vec![unkeyed, records[0].result]);

	let provider = services.build_provider();
	assert_eq!(layers(&provider, Some(&special())), vec!["ProxyProducer", "StringProducer"]);
	assert_eq!(layers(&provider, None), vec!["ProxyProducer", "StringProducer"]);
}

#[rstest]
fn test_keyed_and_unkeyed_chains_stay_separate() {
	// Arrange
	let mut services = ServiceCollection::new(catalog());
	let unkeyed = services.push(unkeyed_string());
	let mut session = CompositionSession::new(&mut services);
	session
		.scan_and_bind(&producer(string()), &[string_producer()], Lifetime::Ephemeral)
		.unwrap();

	// Act
	let first = session.apply_decorators(&[proxy()]).unwrap();
	let second = session.apply_decorators(&[second_proxy()]).unwrap();
	let provenance = session.into_provenance();

	// Assert
	assert_eq!(first.len(), 2);
	assert_eq!(second.len(), 2);
	let origins: Vec<_> = second
		.iter()
		.map(|record| provenance.origin(record.result))
		.collect();
	assert_eq!(origins[0], unkeyed);
	assert_ne!(origins[1], unkeyed);

	let keys: Vec<_> = services.iter().map(|binding| binding.key().cloned()).collect();
	assert_eq!(keys, vec![None, Some(special())]);

	let provider = services.build_provider();
	assert_eq!(
		layers(&provider, None),
		vec!["SecondProxyProducer", "ProxyProducer", "StringProducer"]
	);
	assert_eq!(
		layers(&provider, Some(&special())),
		vec!["SecondProxyProducer", "ProxyProducer", "StringProducer"]
	);
	assert_eq!(provider.resolve_all(&producer(string()), None).unwrap().len(), 1);
}
