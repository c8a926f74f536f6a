//! Type-erased values
//!
//! The engine moves instances of arbitrary [`Reflect`] types around as
//! [`Value`]s. A `Value` owns its instance, can be cloned, and knows its
//! runtime [`TypeRef`], which is what the engine dispatches on.

use std::any::{Any, type_name};
use std::fmt;

use crate::error::{Error, Result};
use crate::reflect::{Reflect, TypeRef};

/// Object-safe view of a [`Reflect`] instance
///
/// Implemented for every `Reflect` type; there is no reason to implement it by hand.
pub trait Object: Any + Send + Sync {
    /// Runtime type of the instance
    fn type_ref(&self) -> TypeRef;

    /// Clone the instance behind the trait object
    fn clone_object(&self) -> Box<dyn Object>;

    /// Borrow as [`Any`]
    fn as_any(&self) -> &dyn Any;

    /// Mutably borrow as [`Any`]
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Convert into a boxed [`Any`]
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Reflect> Object for T {
    fn type_ref(&self) -> TypeRef {
        TypeRef::of::<T>()
    }

    fn clone_object(&self) -> Box<dyn Object> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// An owned instance of some [`Reflect`] type
pub struct Value(Box<dyn Object>);

impl Value {
    /// Wrap a concrete instance
    pub fn new<T: Reflect>(value: T) -> Self {
        Self(Box::new(value))
    }

    /// Runtime type of the wrapped instance
    pub fn type_ref(&self) -> TypeRef {
        self.0.type_ref()
    }

    /// Name of the runtime type
    pub fn type_name(&self) -> &'static str {
        self.type_ref().name()
    }

    /// Whether the wrapped instance is a `T`
    pub fn is<T: Any>(&self) -> bool {
        self.0.as_any().is::<T>()
    }

    /// Borrow the instance as a `T`
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    /// Mutably borrow the instance as a `T`
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.0.as_any_mut().downcast_mut::<T>()
    }

    /// Take the instance out as a `T`
    ///
    /// Fails with [`Error::UnsupportedConversion`] when the runtime type is not `T`.
    pub fn downcast<T: Any>(self) -> Result<T> {
        let from = self.type_name();
        self.0
            .into_any()
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| Error::unsupported(from, type_name::<T>()))
    }
}

impl Clone for Value {
    fn clone(&self) -> Self {
        Self(self.0.clone_object())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Value").field(&self.type_name()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_reports_runtime_type() {
        let value = Value::new(42_i32);
        assert_eq!(value.type_ref(), TypeRef::of::<i32>());
        assert!(value.is::<i32>());
        assert!(!value.is::<i64>());
    }

    #[test]
    fn test_downcast_success() {
        let value = Value::new(String::from("hello"));
        assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("hello"));
        assert_eq!(value.downcast::<String>().unwrap(), "hello");
    }

    #[test]
    fn test_downcast_mismatch_is_unsupported_conversion() {
        let err = Value::new(1_u8).downcast::<String>().unwrap_err();
        match err {
            Error::UnsupportedConversion { from, to } => {
                assert_eq!(from, "u8");
                assert_eq!(to, "alloc::string::String");
            }
            other => panic!("Expected UnsupportedConversion, got {other:?}"),
        }
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original = Value::new(vec![1_i32, 2]);
        let copy = original.clone();
        original.downcast_mut::<Vec<i32>>().unwrap().push(3);
        assert_eq!(copy.downcast::<Vec<i32>>().unwrap(), vec![1, 2]);
        assert_eq!(original.downcast::<Vec<i32>>().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_debug_shows_type_name() {
        let debug = format!("{:?}", Value::new(true));
        assert!(debug.contains("bool"));
    }
}
