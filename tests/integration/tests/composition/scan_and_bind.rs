//! Scan-and-bind over the producer catalog

use rewire_compose::{CompositionSession, GenericResolver};
use rewire_di::{Lifetime, NamedType, Resolver, ServiceCollection, ServiceKey, TypeCatalog, TypeRef};
use rewire_integration_tests::{
	AnyProducer, Producer, SPECIAL_KEY, Widget, abstract_producer, catalog, long, param_producer,
	producer, string, widget,
};
use rstest::{fixture, rstest};
use std::sync::Arc;

#[fixture]
fn services() -> ServiceCollection {
	ServiceCollection::new(catalog())
}

fn long_producer() -> TypeRef {
	TypeRef::named("LongProducer")
}

fn string_producer() -> TypeRef {
	TypeRef::named("StringProducer")
}

#[rstest]
#[case(Lifetime::Ephemeral)]
#[case(Lifetime::Scoped)]
fn test_one_binding_per_matching_candidate(mut services: ServiceCollection, #[case] lifetime: Lifetime) {
	// Arrange
	let mut session = CompositionSession::new(&mut services);

	// Act
	let bound = session
		.scan_and_bind(&producer(long()), &[long_producer(), string_producer()], lifetime)
		.unwrap();
	drop(session);

	// Assert
	assert_eq!(bound.len(), 1);
	assert_eq!(bound[0].capability(), &producer(long()));
	assert_eq!(bound[0].implementation_type(), Some(&long_producer()));
	assert_eq!(bound[0].lifetime(), lifetime);
	assert_eq!(services.len(), 1);
}

#[rstest]
fn test_open_capability_binds_each_closed_usage(mut services: ServiceCollection) {
	// Arrange
	let mut session = CompositionSession::new(&mut services);

	// Act
	session
		.scan_and_bind_for::<AnyProducer>(&[long_producer(), string_producer()], Lifetime::Ephemeral)
		.unwrap();
	drop(session);

	// Assert
	let provider = services.build_provider();
	let long_value = provider
		.resolve_as::<Arc<dyn Producer<i64>>>(&producer(long()))
		.unwrap();
	assert_eq!(long_value.produce(), 123);

	let key = ServiceKey::from(SPECIAL_KEY);
	let string_value = provider.resolve_keyed(&producer(string()), &key).unwrap();
	assert_eq!(string_value.implementation(), Some(&string_producer()));
	assert_eq!(
		string_value
			.get::<Arc<dyn Producer<String>>>()
			.unwrap()
			.produce(),
		"123"
	);
	assert!(provider.try_resolve(&producer(string()), None).unwrap().is_none());
}

#[rstest]
fn test_typed_scan_matches_explicit_capability(mut services: ServiceCollection) {
	// Arrange
	let mut session = CompositionSession::new(&mut services);

	// Act
	let typed = session
		.scan_and_bind_for::<dyn Producer<i64>>(&[long_producer(), string_producer()], None)
		.unwrap();

	// Assert
	assert_eq!(typed.len(), 1);
	assert_eq!(typed[0].capability(), &producer(long()));
	assert_eq!(typed[0].lifetime(), Lifetime::Ephemeral);
}

#[rstest]
fn test_catalog_scan_skips_abstract_and_open_candidates(mut services: ServiceCollection) {
	// Arrange
	let mut session = CompositionSession::new(&mut services);

	// Act
	let bound = session
		.scan_catalog(&AnyProducer::type_ref(), Lifetime::Shared)
		.unwrap();

	// Assert
	let implementations: Vec<_> = bound
		.iter()
		.filter_map(|binding| binding.implementation_type().cloned())
		.collect();
	assert_eq!(implementations, vec![long_producer(), string_producer()]);
	assert!(!implementations.contains(&abstract_producer()));
	assert!(!implementations.contains(&param_producer()));
}

#[rstest]
fn test_closed_generic_candidate_is_bound(mut services: ServiceCollection) {
	// Arrange
	let closed = TypeRef::generic("ParamProducer", [widget()]);
	let mut session = CompositionSession::new(&mut services);

	// Act
	let bound = session
		.scan_and_bind(
			&TypeRef::definition_of("Producer", 1),
			&[closed.clone(), param_producer()],
			Lifetime::Ephemeral,
		)
		.unwrap();
	drop(session);

	// Assert
	assert_eq!(bound.len(), 1);
	assert_eq!(bound[0].capability(), &producer(widget()));
	let value = services
		.build_provider()
		.resolve_as::<Arc<dyn Producer<Widget>>>(&producer(widget()))
		.unwrap();
	assert_eq!(value.produce(), Widget::default());
}

#[rstest]
#[case(producer(widget()), Some(TypeRef::generic("ParamProducer", [widget()])))]
#[case(producer(long()), None)]
#[case(producer(string()), None)]
fn test_constructible_constraint_guards_closing(#[case] capability: TypeRef, #[case] expected: Option<TypeRef>) {
	// Arrange
	let catalog: TypeCatalog = catalog();
	let resolver = GenericResolver::new(&catalog);

	// Act
	let closed = resolver.resolve(&param_producer(), &capability);

	// Assert
	assert_eq!(closed, expected);
}
