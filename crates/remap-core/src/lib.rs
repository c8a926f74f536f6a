//! remap Core Library
//!
//! This crate provides the building blocks of the remap object mapper:
//! - Type descriptors that stand in for runtime reflection
//! - The mapping configuration model and its fluent builder
//! - The [`Mapper`] contract and the [`CustomTypeMapper`] extension point
//! - Engine options and error types
//!
//! The engine itself lives in `remap-runtime`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Builder   │────▶│   Mapper    │────▶│   Engine    │
//! │  (fluent)   │     │   Config    │     │  (runtime)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                ▲
//!                     ┌─────────────┐            │
//!                     │ Descriptors │────────────┘
//!                     │  (Reflect)  │
//!                     └─────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use remap_core::MapperConfigurationBuilder;
//!
//! let mut builder = MapperConfigurationBuilder::new();
//! builder
//!     .create_map::<Person, PersonDto>()
//!     .for_member("full_name", |m| {
//!         m.map(|p: &Person| format!("{} {}", p.first_name, p.last_name))
//!     });
//! let configuration = builder.build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod action;
pub mod builder;
pub mod config;
pub mod error;
pub mod mapper;
pub mod options;
pub mod reflect;
pub mod schema;
pub mod value;

pub use action::{MappingAction, Projection};
pub use builder::{MapperConfigurationBuilder, MemberMappingBuilder, TypeMappingBuilder};
pub use config::{MapperConfiguration, MemberMappingConfiguration, TypeMappingConfiguration};
pub use error::{Error, Result};
pub use mapper::{CustomTypeMapper, Mapper, MapperExt};
pub use options::{DuplicateMapPolicy, MapperOptions};
pub use reflect::{
    OptionalSchema, Reflect, SequenceKind, SequenceSchema, TypeDescriptor, TypePair, TypeRef,
};
pub use schema::{
    Arguments, ConstructorBuilder, ConstructorSchema, MemberSchema, ParamSchema, StructSchema,
    StructSchemaBuilder,
};
pub use value::{Object, Value};
