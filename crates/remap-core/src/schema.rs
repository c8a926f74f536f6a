//! Struct schemas
//!
//! A [`StructSchema`] lists a type's members and constructors in declaration
//! order. Member order is the order destination members are populated in, and
//! constructor order is the order candidates are tried in.
//!
//! # Example
//!
//! ```rust,ignore
//! impl Reflect for BookDto {
//!     fn describe() -> TypeDescriptor {
//!         StructSchema::builder::<Self>()
//!             .constructor(|ctor| {
//!                 ctor.param::<String>("author")
//!                     .param::<String>("name")
//!                     .param_or("page_count", 0_u32)
//!                     .build(|args| Ok(BookDto::new(args.take()?, args.take()?, args.take()?)))
//!             })
//!             .getter("author", |b: &BookDto| b.author.clone())
//!             .field("publish_house", |b| b.publish_house.clone(), |b, v| b.publish_house = v)
//!             .build()
//!     }
//! }
//! ```

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::reflect::{Reflect, TypeDescriptor, TypeRef};
use crate::value::Value;

type Reader = Arc<dyn Fn(&Value) -> Result<Value> + Send + Sync>;
type Writer = Arc<dyn Fn(&mut Value, Value) -> Result<()> + Send + Sync>;
type Invoker = Arc<dyn Fn(&mut Arguments) -> Result<Value> + Send + Sync>;
type DefaultValue = Arc<dyn Fn() -> Value + Send + Sync>;

/// Members and constructors of a record type
#[derive(Debug, Clone)]
pub struct StructSchema {
    ty: TypeRef,
    members: Vec<MemberSchema>,
    constructors: Vec<ConstructorSchema>,
}

impl StructSchema {
    /// Start describing `T`
    pub fn builder<T: Reflect>() -> StructSchemaBuilder<T> {
        StructSchemaBuilder {
            members: Vec::new(),
            constructors: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// The described type
    pub fn type_ref(&self) -> TypeRef {
        self.ty
    }

    /// Members in declaration order
    pub fn members(&self) -> &[MemberSchema] {
        &self.members
    }

    /// Constructors in declaration order
    pub fn constructors(&self) -> &[ConstructorSchema] {
        &self.constructors
    }

    /// Position of the first readable member called `name`
    pub fn readable_member(&self, name: &str) -> Option<usize> {
        self.members
            .iter()
            .position(|m| m.name == name && m.is_readable())
    }
}

/// A named member with an optional reader and writer
#[derive(Clone)]
pub struct MemberSchema {
    name: &'static str,
    ty: TypeRef,
    reader: Option<Reader>,
    writer: Option<Writer>,
}

impl MemberSchema {
    /// Member name (matched case-sensitively)
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared member type
    pub fn type_ref(&self) -> TypeRef {
        self.ty
    }

    /// Whether the member can be read
    pub fn is_readable(&self) -> bool {
        self.reader.is_some()
    }

    /// Whether the member can be assigned
    pub fn is_writable(&self) -> bool {
        self.writer.is_some()
    }

    /// Read the member from `instance`
    pub fn read(&self, instance: &Value) -> Result<Value> {
        match &self.reader {
            Some(reader) => reader(instance),
            None => Err(Error::InvalidArgument {
                message: format!("member '{}' is not readable", self.name),
            }),
        }
    }

    /// Assign `value` to the member of `instance`
    pub fn write(&self, instance: &mut Value, value: Value) -> Result<()> {
        match &self.writer {
            Some(writer) => writer(instance, value),
            None => Err(Error::InvalidArgument {
                message: format!("member '{}' is not writable", self.name),
            }),
        }
    }
}

impl fmt::Debug for MemberSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberSchema")
            .field("name", &self.name)
            .field("type", &self.ty)
            .field("readable", &self.is_readable())
            .field("writable", &self.is_writable())
            .finish()
    }
}

/// A constructor parameter
#[derive(Clone)]
pub struct ParamSchema {
    name: &'static str,
    ty: TypeRef,
    default: Option<DefaultValue>,
}

impl ParamSchema {
    /// Parameter name, matched against source member names
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared parameter type
    pub fn type_ref(&self) -> TypeRef {
        self.ty
    }

    /// Whether the parameter declares a default
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// A fresh copy of the declared default
    pub fn default_value(&self) -> Option<Value> {
        self.default.as_ref().map(|default| default())
    }
}

impl fmt::Debug for ParamSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamSchema")
            .field("name", &self.name)
            .field("type", &self.ty)
            .field("has_default", &self.has_default())
            .finish()
    }
}

/// One way of creating an instance
#[derive(Clone)]
pub struct ConstructorSchema {
    ty: TypeRef,
    params: Vec<ParamSchema>,
    invoke: Invoker,
}

impl ConstructorSchema {
    /// Parameters in declaration order
    pub fn params(&self) -> &[ParamSchema] {
        &self.params
    }

    /// Call the constructor with one argument per parameter, in order
    pub fn invoke(&self, arguments: Vec<Value>) -> Result<Value> {
        let mut arguments = Arguments {
            type_name: self.ty.name(),
            names: self.params.iter().map(|p| p.name).collect(),
            values: arguments.into_iter(),
            position: 0,
        };
        (self.invoke)(&mut arguments)
    }
}

impl fmt::Debug for ConstructorSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorSchema")
            .field("type", &self.ty)
            .field("params", &self.params)
            .finish()
    }
}

/// Arguments handed to a constructor body, consumed in parameter order
pub struct Arguments {
    type_name: &'static str,
    names: Vec<&'static str>,
    values: std::vec::IntoIter<Value>,
    position: usize,
}

impl Arguments {
    /// Take the next argument as an `M`
    ///
    /// Fails with [`Error::UnresolvedParameter`] when no argument is left.
    pub fn take<M: Reflect>(&mut self) -> Result<M> {
        let parameter = self
            .names
            .get(self.position)
            .copied()
            .unwrap_or("<extra>");
        self.position += 1;
        let value = self.values.next().ok_or_else(|| Error::UnresolvedParameter {
            type_name: self.type_name,
            parameter: parameter.to_string(),
        })?;
        value.downcast::<M>()
    }
}

/// Builder returned by [`StructSchema::builder`]
pub struct StructSchemaBuilder<T> {
    members: Vec<MemberSchema>,
    constructors: Vec<ConstructorSchema>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Reflect> StructSchemaBuilder<T> {
    /// A readable and writable member
    pub fn field<M, G, S>(self, name: &'static str, get: G, set: S) -> Self
    where
        M: Reflect,
        G: Fn(&T) -> M + Send + Sync + 'static,
        S: Fn(&mut T, M) + Send + Sync + 'static,
    {
        self.member::<M>(name, Some(reader(get)), Some(writer(set)))
    }

    /// A read-only member
    pub fn getter<M, G>(self, name: &'static str, get: G) -> Self
    where
        M: Reflect,
        G: Fn(&T) -> M + Send + Sync + 'static,
    {
        self.member::<M>(name, Some(reader(get)), None)
    }

    /// A write-only member
    pub fn setter<M, S>(self, name: &'static str, set: S) -> Self
    where
        M: Reflect,
        S: Fn(&mut T, M) + Send + Sync + 'static,
    {
        self.member::<M>(name, None, Some(writer(set)))
    }

    fn member<M: Reflect>(
        mut self,
        name: &'static str,
        reader: Option<Reader>,
        writer: Option<Writer>,
    ) -> Self {
        self.members.push(MemberSchema {
            name,
            ty: TypeRef::of::<M>(),
            reader,
            writer,
        });
        self
    }

    /// A parameterless constructor using [`Default`]
    pub fn default_constructor(self) -> Self
    where
        T: Default,
    {
        self.constructor(|ctor| ctor.build(|_| Ok(T::default())))
    }

    /// A parameterized constructor
    pub fn constructor<F>(mut self, define: F) -> Self
    where
        F: FnOnce(ConstructorBuilder<T>) -> ConstructorSchema,
    {
        let constructor = define(ConstructorBuilder {
            params: Vec::new(),
            _marker: PhantomData,
        });
        self.constructors.push(constructor);
        self
    }

    /// Finish the description
    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor::Struct(StructSchema {
            ty: TypeRef::of::<T>(),
            members: self.members,
            constructors: self.constructors,
        })
    }
}

/// Builder handed to [`StructSchemaBuilder::constructor`]
pub struct ConstructorBuilder<T> {
    params: Vec<ParamSchema>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Reflect> ConstructorBuilder<T> {
    /// A required parameter
    pub fn param<M: Reflect>(mut self, name: &'static str) -> Self {
        self.params.push(ParamSchema {
            name,
            ty: TypeRef::of::<M>(),
            default: None,
        });
        self
    }

    /// A parameter that falls back to `default` when the source has no such member
    pub fn param_or<M: Reflect>(mut self, name: &'static str, default: M) -> Self {
        self.params.push(ParamSchema {
            name,
            ty: TypeRef::of::<M>(),
            default: Some(Arc::new(move || Value::new(default.clone()))),
        });
        self
    }

    /// Finish with the constructor body
    pub fn build<F>(self, construct: F) -> ConstructorSchema
    where
        F: Fn(&mut Arguments) -> Result<T> + Send + Sync + 'static,
    {
        ConstructorSchema {
            ty: TypeRef::of::<T>(),
            params: self.params,
            invoke: Arc::new(move |args: &mut Arguments| construct(args).map(Value::new)),
        }
    }
}

fn reader<T, M, G>(get: G) -> Reader
where
    T: Reflect,
    M: Reflect,
    G: Fn(&T) -> M + Send + Sync + 'static,
{
    Arc::new(move |instance: &Value| {
        instance
            .downcast_ref::<T>()
            .map(|target| Value::new(get(target)))
            .ok_or_else(|| Error::unsupported(instance.type_name(), type_name::<T>()))
    })
}

fn writer<T, M, S>(set: S) -> Writer
where
    T: Reflect,
    M: Reflect,
    S: Fn(&mut T, M) + Send + Sync + 'static,
{
    Arc::new(move |instance: &mut Value, value: Value| {
        let from = instance.type_name();
        let value = value.downcast::<M>()?;
        let target = instance
            .downcast_mut::<T>()
            .ok_or_else(|| Error::unsupported(from, type_name::<T>()))?;
        set(target, value);
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    impl Reflect for Point {
        fn describe() -> TypeDescriptor {
            StructSchema::builder::<Self>()
                .default_constructor()
                .constructor(|ctor| {
                    ctor.param::<i32>("x")
                        .param_or("y", 10_i32)
                        .build(|args| {
                            Ok(Point {
                                x: args.take()?,
                                y: args.take()?,
                            })
                        })
                })
                .field("x", |p: &Point| p.x, |p, v| p.x = v)
                .field("y", |p: &Point| p.y, |p, v| p.y = v)
                .getter("norm", |p: &Point| p.x.abs() + p.y.abs())
                .build()
        }
    }

    fn schema() -> StructSchema {
        match Point::describe() {
            TypeDescriptor::Struct(schema) => schema,
            other => panic!("Expected struct descriptor, got {other:?}"),
        }
    }

    #[test]
    fn test_members_keep_declaration_order() {
        let schema = schema();
        let names: Vec<_> = schema.members().iter().map(MemberSchema::name).collect();
        assert_eq!(names, vec!["x", "y", "norm"]);
        assert_eq!(schema.type_ref(), TypeRef::of::<Point>());
    }

    #[test]
    fn test_read_only_member() {
        let schema = schema();
        let norm = &schema.members()[2];
        assert!(norm.is_readable());
        assert!(!norm.is_writable());

        let value = Value::new(Point { x: -2, y: 3 });
        assert_eq!(norm.read(&value).unwrap().downcast::<i32>().unwrap(), 5);
        let mut target = value.clone();
        assert!(norm.write(&mut target, Value::new(1_i32)).is_err());
    }

    #[test]
    fn test_write_member() {
        let schema = schema();
        let mut value = Value::new(Point::default());
        schema.members()[0].write(&mut value, Value::new(4_i32)).unwrap();
        assert_eq!(value.downcast::<Point>().unwrap(), Point { x: 4, y: 0 });
    }

    #[test]
    fn test_write_wrong_type_is_rejected() {
        let schema = schema();
        let mut value = Value::new(Point::default());
        let err = schema.members()[0]
            .write(&mut value, Value::new("four"))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedConversion { .. }));
    }

    #[test]
    fn test_readable_member_lookup_is_case_sensitive() {
        let schema = schema();
        assert_eq!(schema.readable_member("y"), Some(1));
        assert_eq!(schema.readable_member("Y"), None);
    }

    #[test]
    fn test_constructor_params_and_defaults() {
        let schema = schema();
        assert_eq!(schema.constructors().len(), 2);
        assert!(schema.constructors()[0].params().is_empty());

        let params = schema.constructors()[1].params();
        assert_eq!(params[0].name(), "x");
        assert!(!params[0].has_default());
        assert!(params[1].has_default());
        let default = params[1].default_value().unwrap();
        assert_eq!(default.downcast::<i32>().unwrap(), 10);
    }

    #[test]
    fn test_invoke_constructor() {
        let schema = schema();
        let point = schema.constructors()[1]
            .invoke(vec![Value::new(1_i32), Value::new(2_i32)])
            .unwrap();
        assert_eq!(point.downcast::<Point>().unwrap(), Point { x: 1, y: 2 });
    }

    #[test]
    fn test_invoke_with_missing_argument() {
        let schema = schema();
        let err = schema.constructors()[1]
            .invoke(vec![Value::new(1_i32)])
            .unwrap_err();
        match err {
            Error::UnresolvedParameter { parameter, .. } => assert_eq!(parameter, "y"),
            other => panic!("Expected UnresolvedParameter, got {other:?}"),
        }
    }
}
