//! Mapping actions
//!
//! A [`MappingAction`] says what happens to one destination member.

use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::reflect::{Reflect, TypeRef};
use crate::value::Value;

type ProjectionFn = Arc<dyn Fn(&Value) -> Result<Value> + Send + Sync>;

/// What to do for a configured destination member
#[derive(Debug, Clone)]
pub enum MappingAction {
    /// Leave the member at its post-construction value
    Ignore,
    /// Compute the member from the whole source instance
    Map(Projection),
}

/// A typed `Fn(&S) -> M` behind a type-erased interface
#[derive(Clone)]
pub struct Projection {
    source: TypeRef,
    output: TypeRef,
    func: ProjectionFn,
}

impl Projection {
    /// Erase a typed projection
    pub fn new<S, M, F>(projection: F) -> Self
    where
        S: Reflect,
        M: Reflect,
        F: Fn(&S) -> M + Send + Sync + 'static,
    {
        Self {
            source: TypeRef::of::<S>(),
            output: TypeRef::of::<M>(),
            func: Arc::new(move |source: &Value| {
                source
                    .downcast_ref::<S>()
                    .map(|s| Value::new(projection(s)))
                    .ok_or_else(|| Error::unsupported(source.type_name(), type_name::<S>()))
            }),
        }
    }

    /// Source type the projection reads
    pub fn source_type(&self) -> TypeRef {
        self.source
    }

    /// Type the projection produces
    pub fn output_type(&self) -> TypeRef {
        self.output
    }

    /// Run the projection against a source instance
    pub fn invoke(&self, source: &Value) -> Result<Value> {
        (self.func)(source)
    }
}

impl fmt::Debug for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Projection({} -> {})", self.source, self.output)
    }
}
