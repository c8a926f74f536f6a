//! Mapper contract and custom strategies
//!
//! [`Mapper`] is the object-safe contract every engine implements; typed
//! entry points come from the blanket [`MapperExt`]. [`CustomTypeMapper`] is
//! the extension point for type pairs the generic algorithm cannot express.

use std::any::type_name;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::reflect::{Reflect, TypeDescriptor, TypeRef};
use crate::value::Value;

/// Produces destination instances from source values
pub trait Mapper {
    /// Map `source` into a new instance of `destination`
    ///
    /// `None` stands for an absent source and fails with
    /// [`Error::InvalidArgument`].
    fn map_value(&self, destination: &TypeRef, source: Option<&Value>) -> Result<Value>;

    /// Descriptor of `ty`, as cached by the mapper
    fn descriptor(&self, ty: &TypeRef) -> Arc<TypeDescriptor>;
}

/// Typed helpers available on every [`Mapper`]
pub trait MapperExt: Mapper {
    /// Map `source` into a `D`
    ///
    /// The whole source graph is cloned into a [`Value`] first; use
    /// [`map_owned`](Self::map_owned) when the source is no longer needed.
    fn map<D: Reflect>(&self, source: &impl Reflect) -> Result<D> {
        self.map_owned(source.clone())
    }

    /// Map `source` into a `D`, consuming it
    fn map_owned<D: Reflect>(&self, source: impl Reflect) -> Result<D> {
        let source = Value::new(source);
        self.map_value(&TypeRef::of::<D>(), Some(&source))?
            .downcast::<D>()
    }

    /// Map an `S` into a `D`, naming both types
    fn map_from<D: Reflect, S: Reflect>(&self, source: &S) -> Result<D> {
        self.map::<D>(source)
    }

    /// Map a possibly absent source into a `D`
    fn map_option<D: Reflect, S: Reflect>(&self, source: Option<&S>) -> Result<D> {
        match source {
            Some(source) => self.map::<D>(source),
            None => Err(Error::InvalidArgument {
                message: format!(
                    "source '{}' for '{}' is absent",
                    type_name::<S>(),
                    type_name::<D>()
                ),
            }),
        }
    }
}

impl<M: Mapper + ?Sized> MapperExt for M {}

/// A conversion routine that owns specific type pairs
///
/// Strategies are queried in registration order and the first one whose
/// [`can_map`](Self::can_map) returns `true` handles the pair completely.
/// Nested values go back through the `mapper` handed to
/// [`map`](Self::map), so they see the same configuration and strategies.
pub trait CustomTypeMapper: Send + Sync {
    /// Name used in logs and errors
    fn name(&self) -> &str;

    /// Whether this strategy handles `source -> destination`
    fn can_map(&self, source: &TypeRef, destination: &TypeRef) -> bool;

    /// Produce a `destination` instance from `source`
    fn map(&self, mapper: &dyn Mapper, destination: &TypeRef, source: &Value) -> Result<Value>;
}
