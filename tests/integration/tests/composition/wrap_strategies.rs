//! Wrapping bindings of every construction strategy

use rewire_compose::CompositionSession;
use rewire_di::{
	Binding, Instance, Lifetime, Resolver, ServiceCollection, ServiceKey, TypeRef,
};
use rewire_integration_tests::{LongProducer, Producer, catalog, long, producer, proxy};
use rstest::rstest;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn long_producer() -> Arc<dyn Producer<i64>> {
	Arc::new(LongProducer)
}

fn decorate(services: &mut ServiceCollection) -> usize {
	let mut session = CompositionSession::new(services);
	session.apply_decorators(&[proxy()]).unwrap().len()
}

#[rstest]
fn test_wrap_type_binding() {
	// Arrange
	let mut services = ServiceCollection::new(catalog());
	services.add_type(producer(long()), TypeRef::named("LongProducer"), Lifetime::Scoped);

	// Act
	let decorated = decorate(&mut services);

	// Assert
	assert_eq!(decorated, 1);
	let binding = services.iter().next().unwrap();
	assert_eq!(binding.lifetime(), Lifetime::Scoped);
	assert_eq!(binding.implementation_type(), None);
	let value = services
		.build_provider()
		.resolve_as::<Arc<dyn Producer<i64>>>(&producer(long()))
		.unwrap();
	assert_eq!(value.layers(), vec!["ProxyProducer", "LongProducer"]);
}

#[rstest]
fn test_wrap_instance_binding_is_shared() {
	// Arrange
	let mut services = ServiceCollection::new(catalog());
	services.push(Binding::from_instance(
		producer(long()),
		Instance::new(long_producer()),
	));

	// Act
	let decorated = decorate(&mut services);

	// Assert
	assert_eq!(decorated, 1);
	assert_eq!(services.iter().next().unwrap().lifetime(), Lifetime::Shared);
	let provider = services.build_provider();
	let first = provider.resolve(&producer(long())).unwrap();
	let second = provider.create_scope().resolve(&producer(long())).unwrap();
	assert!(first.ptr_eq(&second));
	assert_eq!(
		first.get::<Arc<dyn Producer<i64>>>().unwrap().layers(),
		vec!["ProxyProducer", "LongProducer"]
	);
}

#[rstest]
#[case(Lifetime::Ephemeral, 2)]
#[case(Lifetime::Shared, 1)]
fn test_wrap_factory_binding(#[case] lifetime: Lifetime, #[case] expected_calls: usize) {
	// Arrange
	let calls = Arc::new(AtomicUsize::new(0));
	let counter = Arc::clone(&calls);
	let mut services = ServiceCollection::new(catalog());
	services.push(Binding::from_factory(producer(long()), lifetime, move |_, _| {
		counter.fetch_add(1, Ordering::SeqCst);
		Ok(Instance::new(long_producer()))
	}));

	// Act
	decorate(&mut services);
	let provider = services.build_provider();
	let first = provider
		.resolve_as::<Arc<dyn Producer<i64>>>(&producer(long()))
		.unwrap();
	provider.resolve(&producer(long())).unwrap();

	// Assert
	assert_eq!(first.layers(), vec!["ProxyProducer", "LongProducer"]);
	assert_eq!(first.produce(), 123);
	assert_eq!(calls.load(Ordering::SeqCst), expected_calls);
}

#[rstest]
fn test_wrapped_keyed_factory_still_receives_key() {
	// Arrange
	let key = ServiceKey::from("primary");
	let seen = Arc::new(Mutex::new(None::<String>));
	let recorder = Arc::clone(&seen);
	let mut services = ServiceCollection::new(catalog());
	services.push(
		Binding::from_factory(producer(long()), Lifetime::Ephemeral, move |_, key| {
			*recorder.lock().unwrap() = key.map(ToString::to_string);
			Ok(Instance::new(long_producer()))
		})
		.with_key(key.clone()),
	);

	// Act
	decorate(&mut services);
	let value = services
		.build_provider()
		.resolve_keyed(&producer(long()), &key)
		.unwrap();

	// Assert
	assert_eq!(services.iter().next().unwrap().key(), Some(&key));
	assert_eq!(seen.lock().unwrap().take(), Some("primary".to_string()));
	assert_eq!(
		value.get::<Arc<dyn Producer<i64>>>().unwrap().layers(),
		vec!["ProxyProducer", "LongProducer"]
	);
}
