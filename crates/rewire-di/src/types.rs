//! Type descriptors
//!
//! Rust has no runtime reflection, so every type that takes part in registration is
//! described explicitly by a [`TypeRef`]: a definition name applied to zero or more type
//! arguments. Type parameters of the enclosing definition appear as [`TypeRef::Param`].
//!
//! ```
//! use rewire_di::TypeRef;
//!
//! let open = TypeRef::definition_of("Repository", 1);
//! let closed = TypeRef::generic("Repository", [TypeRef::named("i64")]);
//!
//! assert!(open.is_generic_definition());
//! assert!(!closed.is_open());
//! assert_eq!(closed.generic_definition(), Some(open));
//! assert_eq!(closed.to_string(), "Repository<i64>");
//! ```

use std::fmt;
use std::sync::Arc;

/// Name of a type definition registered in a [`TypeCatalog`](crate::TypeCatalog).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefId(Arc<str>);

impl DefId {
	pub fn new(name: impl AsRef<str>) -> Self {
		Self(Arc::from(name.as_ref()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for DefId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for DefId {
	fn from(name: &str) -> Self {
		Self::new(name)
	}
}

impl From<String> for DefId {
	fn from(name: String) -> Self {
		Self(Arc::from(name))
	}
}

impl From<&DefId> for DefId {
	fn from(id: &DefId) -> Self {
		id.clone()
	}
}

/// A type expression.
///
/// Two type references are equal when they name the same definition with the same
/// arguments, so a closed type (`Repository<i64>`) and a generic definition
/// (`Repository<T0>`) never compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeRef {
	/// The n-th type parameter of the enclosing definition.
	Param(usize),
	/// A definition applied to its type arguments (empty for non-generic types).
	Named { def: DefId, args: Vec<TypeRef> },
}

impl TypeRef {
	/// A non-generic type.
	pub fn named(def: impl Into<DefId>) -> Self {
		Self::Named {
			def: def.into(),
			args: Vec::new(),
		}
	}

	/// A generic type applied to `args`.
	pub fn generic<I>(def: impl Into<DefId>, args: I) -> Self
	where
		I: IntoIterator<Item = TypeRef>,
	{
		Self::Named {
			def: def.into(),
			args: args.into_iter().collect(),
		}
	}

	/// A reference to the n-th type parameter of the enclosing definition.
	pub const fn param(index: usize) -> Self {
		Self::Param(index)
	}

	/// The generic definition of `def`: the definition applied to its own parameters in order.
	///
	/// With `arity == 0` this is the same as [`TypeRef::named`].
	pub fn definition_of(def: impl Into<DefId>, arity: usize) -> Self {
		Self::generic(def, (0..arity).map(TypeRef::Param))
	}

	/// The definition this type refers to, `None` for a type parameter.
	pub fn def(&self) -> Option<&DefId> {
		match self {
			TypeRef::Param(_) => None,
			TypeRef::Named { def, .. } => Some(def),
		}
	}

	/// Type arguments, in order.
	pub fn args(&self) -> &[TypeRef] {
		match self {
			TypeRef::Param(_) => &[],
			TypeRef::Named { args, .. } => args,
		}
	}

	pub fn is_param(&self) -> bool {
		matches!(self, TypeRef::Param(_))
	}

	/// Whether the type carries type arguments (open or closed).
	pub fn is_generic(&self) -> bool {
		!self.args().is_empty()
	}

	/// Whether a type parameter appears anywhere in the expression.
	pub fn is_open(&self) -> bool {
		match self {
			TypeRef::Param(_) => true,
			TypeRef::Named { args, .. } => args.iter().any(TypeRef::is_open),
		}
	}

	/// Whether this is exactly a generic definition (`Def<T0, .., Tn>`).
	pub fn is_generic_definition(&self) -> bool {
		self.is_generic()
			&& self
				.args()
				.iter()
				.enumerate()
				.all(|(index, arg)| *arg == TypeRef::Param(index))
	}

	/// The generic definition this type is an instance of, `None` for non-generic types.
	pub fn generic_definition(&self) -> Option<TypeRef> {
		match self {
			TypeRef::Named { def, args } if !args.is_empty() => {
				Some(Self::definition_of(def.clone(), args.len()))
			}
			_ => None,
		}
	}

	/// Replaces every [`TypeRef::Param`] with the argument at its index.
	///
	/// Returns `None` when a parameter index has no corresponding argument.
	pub fn substitute(&self, args: &[TypeRef]) -> Option<TypeRef> {
		match self {
			TypeRef::Param(index) => args.get(*index).cloned(),
			TypeRef::Named { def, args: own } => own
				.iter()
				.map(|arg| arg.substitute(args))
				.collect::<Option<Vec<_>>>()
				.map(|args| TypeRef::Named {
					def: def.clone(),
					args,
				}),
		}
	}
}

impl fmt::Display for TypeRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TypeRef::Param(index) => write!(f, "T{}", index),
			TypeRef::Named { def, args } => {
				write!(f, "{}", def)?;
				if !args.is_empty() {
					f.write_str("<")?;
					for (position, arg) in args.iter().enumerate() {
						if position > 0 {
							f.write_str(", ")?;
						}
						write!(f, "{}", arg)?;
					}
					f.write_str(">")?;
				}
				Ok(())
			}
		}
	}
}

/// Key distinguishing keyed bindings of the same capability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceKey(Arc<str>);

impl ServiceKey {
	pub fn new(key: impl AsRef<str>) -> Self {
		Self(Arc::from(key.as_ref()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ServiceKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for ServiceKey {
	fn from(key: &str) -> Self {
		Self::new(key)
	}
}

impl From<String> for ServiceKey {
	fn from(key: String) -> Self {
		Self(Arc::from(key))
	}
}

/// Rust types that stand for a registered type descriptor.
///
/// Implemented by marker types so that typed entry points such as
/// `scan_and_bind_for::<C>()` can name a capability without spelling out its [`TypeRef`].
pub trait NamedType {
	fn type_ref() -> TypeRef;
}

macro_rules! impl_named_type {
	($($ty:ty => $name:literal),* $(,)?) => {
		$(
			impl NamedType for $ty {
				fn type_ref() -> TypeRef {
					TypeRef::named($name)
				}
			}
		)*
	};
}

// Primitives are described under their Rust names
impl_named_type! {
	bool => "bool",
	i32 => "i32",
	i64 => "i64",
	u32 => "u32",
	u64 => "u64",
	usize => "usize",
	f64 => "f64",
	String => "String",
}
