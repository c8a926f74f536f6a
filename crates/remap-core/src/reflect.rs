//! Type descriptors
//!
//! Rust has no runtime reflection, so every type that takes part in a mapping
//! describes itself through [`Reflect::describe`]. The engine calls it once per
//! type and caches the resulting [`TypeDescriptor`].
//!
//! # Descriptor kinds
//!
//! - `Scalar` - leaf values (`String`, numbers, user enums via [`impl_scalar!`])
//! - `Struct` - members and constructors, see [`StructSchema`]
//! - `Sequence` - homogeneous sequences (`Vec<T>`, `Box<[T]>`, `[T; N]`)
//! - `Optional` - `Option<T>`, where `None` is the absent value
//!
//! [`impl_scalar!`]: crate::impl_scalar

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{Error, Result};
use crate::schema::StructSchema;
use crate::value::Value;

/// A type that can be the source or destination of a mapping
pub trait Reflect: Any + Clone + Send + Sync {
    /// Describe the shape of this type
    fn describe() -> TypeDescriptor;
}

/// Runtime identity of a [`Reflect`] type
///
/// Equality and hashing only consider the [`TypeId`].
#[derive(Clone, Copy)]
pub struct TypeRef {
    id: TypeId,
    name: &'static str,
    describe: fn() -> TypeDescriptor,
}

impl TypeRef {
    /// Identity of `T`
    pub fn of<T: Reflect>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            describe: T::describe,
        }
    }

    /// The underlying [`TypeId`]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Build a fresh descriptor for this type (uncached)
    pub fn describe(&self) -> TypeDescriptor {
        (self.describe)()
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Ordered (source, destination) pair identifying a mapping context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypePair {
    /// Source type
    pub source: TypeRef,
    /// Destination type
    pub destination: TypeRef,
}

impl TypePair {
    /// Pair two type identities
    pub fn new(source: TypeRef, destination: TypeRef) -> Self {
        Self {
            source,
            destination,
        }
    }

    /// Pair of `S` and `D`
    pub fn of<S: Reflect, D: Reflect>() -> Self {
        Self::new(TypeRef::of::<S>(), TypeRef::of::<D>())
    }
}

impl fmt::Display for TypePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.destination)
    }
}

/// Shape of a [`Reflect`] type
#[derive(Debug, Clone)]
pub enum TypeDescriptor {
    /// Leaf value without members
    Scalar,
    /// Record type with members and constructors
    Struct(StructSchema),
    /// Homogeneous sequence
    Sequence(SequenceSchema),
    /// Optional value; `None` is absent
    Optional(OptionalSchema),
}

impl TypeDescriptor {
    /// Struct schema, if this is a struct
    pub fn as_struct(&self) -> Option<&StructSchema> {
        match self {
            Self::Struct(schema) => Some(schema),
            _ => None,
        }
    }

    /// Sequence schema, if this is a sequence
    pub fn as_sequence(&self) -> Option<&SequenceSchema> {
        match self {
            Self::Sequence(schema) => Some(schema),
            _ => None,
        }
    }

    /// Optional schema, if this is an `Option`
    pub fn as_optional(&self) -> Option<&OptionalSchema> {
        match self {
            Self::Optional(schema) => Some(schema),
            _ => None,
        }
    }
}

/// Whether a sequence can change length after construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceKind {
    /// List-like (`Vec<T>`)
    Growable,
    /// Array-like (`Box<[T]>`, `[T; N]`)
    Fixed,
}

/// Element access for a homogeneous sequence type
#[derive(Clone)]
pub struct SequenceSchema {
    ty: TypeRef,
    kind: SequenceKind,
    element: TypeRef,
    elements: fn(&Value) -> Option<Vec<Value>>,
    collect: fn(Vec<Value>) -> Result<Value>,
}

impl SequenceSchema {
    /// Growable or fixed
    pub fn kind(&self) -> SequenceKind {
        self.kind
    }

    /// Element type
    pub fn element(&self) -> TypeRef {
        self.element
    }

    /// Clone every element of `sequence`, in order
    pub fn elements(&self, sequence: &Value) -> Result<Vec<Value>> {
        (self.elements)(sequence)
            .ok_or_else(|| Error::unsupported(sequence.type_name(), self.ty.name()))
    }

    /// Build a sequence of this type from element values
    pub fn collect(&self, elements: Vec<Value>) -> Result<Value> {
        (self.collect)(elements)
    }
}

impl fmt::Debug for SequenceSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceSchema")
            .field("type", &self.ty)
            .field("kind", &self.kind)
            .field("element", &self.element)
            .finish()
    }
}

/// Wrapping and unwrapping for `Option<T>`
#[derive(Clone)]
pub struct OptionalSchema {
    ty: TypeRef,
    inner: TypeRef,
    unwrap: fn(&Value) -> Option<Option<Value>>,
    wrap: fn(Option<Value>) -> Result<Value>,
}

impl OptionalSchema {
    /// The `T` of `Option<T>`
    pub fn inner(&self) -> TypeRef {
        self.inner
    }

    /// `Some(inner)` for a present value, `None` for an absent one
    pub fn unwrap(&self, value: &Value) -> Result<Option<Value>> {
        (self.unwrap)(value).ok_or_else(|| Error::unsupported(value.type_name(), self.ty.name()))
    }

    /// Wrap an inner value (or absence) into the optional type
    pub fn wrap(&self, value: Option<Value>) -> Result<Value> {
        (self.wrap)(value)
    }
}

impl fmt::Debug for OptionalSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionalSchema")
            .field("type", &self.ty)
            .field("inner", &self.inner)
            .finish()
    }
}

/// Implement [`Reflect`] for leaf types
///
/// ```rust,ignore
/// #[derive(Clone, Debug, PartialEq)]
/// enum Genre { Fiction, Poetry }
///
/// remap_core::impl_scalar!(Genre);
/// ```
#[macro_export]
macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::Reflect for $ty {
                fn describe() -> $crate::TypeDescriptor {
                    $crate::TypeDescriptor::Scalar
                }
            }
        )*
    };
}

impl_scalar!(
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    String,
    &'static str,
    (),
);

impl<T: Reflect> Reflect for Option<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Optional(OptionalSchema {
            ty: TypeRef::of::<Self>(),
            inner: TypeRef::of::<T>(),
            unwrap: |value| value.downcast_ref::<Option<T>>().map(|o| o.clone().map(Value::new)),
            wrap: |value| match value {
                Some(inner) => inner.downcast::<T>().map(|t| Value::new(Some(t))),
                None => Ok(Value::new(None::<T>)),
            },
        })
    }
}

fn collect_vec<T: Reflect>(elements: Vec<Value>) -> Result<Vec<T>> {
    elements.into_iter().map(Value::downcast::<T>).collect()
}

impl<T: Reflect> Reflect for Vec<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Sequence(SequenceSchema {
            ty: TypeRef::of::<Self>(),
            kind: SequenceKind::Growable,
            element: TypeRef::of::<T>(),
            elements: |value| {
                value
                    .downcast_ref::<Vec<T>>()
                    .map(|items| items.iter().cloned().map(Value::new).collect())
            },
            collect: |elements| collect_vec::<T>(elements).map(Value::new),
        })
    }
}

impl<T: Reflect> Reflect for Box<[T]> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Sequence(SequenceSchema {
            ty: TypeRef::of::<Self>(),
            kind: SequenceKind::Fixed,
            element: TypeRef::of::<T>(),
            elements: |value| {
                value
                    .downcast_ref::<Box<[T]>>()
                    .map(|items| items.iter().cloned().map(Value::new).collect())
            },
            collect: |elements| {
                collect_vec::<T>(elements).map(|items| Value::new(items.into_boxed_slice()))
            },
        })
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Sequence(SequenceSchema {
            ty: TypeRef::of::<Self>(),
            kind: SequenceKind::Fixed,
            element: TypeRef::of::<T>(),
            elements: |value| {
                value
                    .downcast_ref::<[T; N]>()
                    .map(|items| items.iter().cloned().map(Value::new).collect())
            },
            collect: |elements| {
                let items = collect_vec::<T>(elements)?;
                <[T; N]>::try_from(items)
                    .map(Value::new)
                    .map_err(|_| Error::unsupported(type_name::<Vec<T>>(), type_name::<[T; N]>()))
            },
        })
    }
}
