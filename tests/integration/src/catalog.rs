//! Type catalog describing the producer fixtures

use crate::producers::{
	LongProducer, ParamProducer, Producer, ProxyProducer, SecondProxyProducer, StringProducer,
	Widget,
};
use rewire_di::{
	Activation, Constraint, DiResult, Instance, NamedType, TypeCatalog, TypeDefinition, TypeRef,
};
use std::sync::Arc;

/// Key declared by [`StringProducer`].
pub const SPECIAL_KEY: &str = "special-keyed-service";

pub fn long() -> TypeRef {
	i64::type_ref()
}

pub fn string() -> TypeRef {
	String::type_ref()
}

pub fn widget() -> TypeRef {
	TypeRef::named("Widget")
}

pub fn producer(arg: TypeRef) -> TypeRef {
	TypeRef::generic("Producer", [arg])
}

pub fn param_producer() -> TypeRef {
	TypeRef::definition_of("ParamProducer", 1)
}

pub fn abstract_producer() -> TypeRef {
	TypeRef::definition_of("AbstractProducer", 1)
}

pub fn proxy() -> TypeRef {
	TypeRef::definition_of("ProxyProducer", 1)
}

pub fn second_proxy() -> TypeRef {
	TypeRef::definition_of("SecondProxyProducer", 1)
}

fn param_ctor<K>(_: &mut Activation<'_>) -> DiResult<Instance>
where
	K: Default + Send + Sync + 'static,
{
	Ok(Instance::new(
		Arc::new(ParamProducer::<K>::new()) as Arc<dyn Producer<K>>
	))
}

fn inner<T: NamedType + 'static>(activation: &mut Activation<'_>) -> DiResult<Arc<dyn Producer<T>>> {
	activation.parameter_as::<Arc<dyn Producer<T>>>(&producer(T::type_ref()))
}

fn proxy_ctor<T: NamedType + 'static>(activation: &mut Activation<'_>) -> DiResult<Instance> {
	let inner = inner::<T>(activation)?;
	Ok(Instance::new(
		Arc::new(ProxyProducer::new(inner)) as Arc<dyn Producer<T>>
	))
}

fn second_proxy_ctor<T: NamedType + 'static>(activation: &mut Activation<'_>) -> DiResult<Instance> {
	let inner = inner::<T>(activation)?;
	Ok(Instance::new(
		Arc::new(SecondProxyProducer::new(inner)) as Arc<dyn Producer<T>>
	))
}

/// Catalog shared by every composition scenario.
pub fn catalog() -> TypeCatalog {
	let open = producer(TypeRef::Param(0));

	TypeCatalog::builder()
		.with(TypeDefinition::value("i64"))
		.with(TypeDefinition::value("String"))
		.with(TypeDefinition::capability("Producer").param("T"))
		.with(
			TypeDefinition::implementation("Widget").constructor(|_| Ok(Instance::new(Widget::default()))),
		)
		.with(
			TypeDefinition::implementation("LongProducer")
				.implements(producer(long()))
				.constructor(|_| {
					Ok(Instance::new(
						Arc::new(LongProducer) as Arc<dyn Producer<i64>>
					))
				}),
		)
		.with(
			TypeDefinition::implementation("StringProducer")
				.implements(producer(string()))
				.keyed(SPECIAL_KEY)
				.constructor(|_| {
					Ok(Instance::new(
						Arc::new(StringProducer) as Arc<dyn Producer<String>>
					))
				}),
		)
		.with(
			TypeDefinition::implementation("ParamProducer")
				.param_with("K", [Constraint::Constructible])
				.implements(open.clone())
				.instantiation([widget()], param_ctor::<Widget>),
		)
		.with(
			TypeDefinition::implementation("AbstractProducer")
				.param("K")
				.implements(open.clone())
				.abstract_type(),
		)
		.with(
			TypeDefinition::implementation("ProxyProducer")
				.param("T")
				.implements(open.clone())
				.instantiation([long()], proxy_ctor::<i64>)
				.instantiation([string()], proxy_ctor::<String>)
				.instantiation([widget()], proxy_ctor::<Widget>),
		)
		.with(
			TypeDefinition::implementation("SecondProxyProducer")
				.param("T")
				.implements(open)
				.instantiation([long()], second_proxy_ctor::<i64>)
				.instantiation([string()], second_proxy_ctor::<String>)
				.instantiation([widget()], second_proxy_ctor::<Widget>),
		)
		.build()
		.expect("producer catalog is well formed")
}
