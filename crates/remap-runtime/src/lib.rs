//! Remap Runtime
//!
//! This crate provides the mapping engine for remap configurations.
//!
//! # Features
//!
//! - Name-based construction and population of destination structs
//! - Per-type-pair plan memoization, safe for concurrent use
//! - Built-in sequence strategies (list to array, sequence to list)
//!
//! # Usage
//!
//! ```rust,ignore
//! use remap_core::{MapperConfigurationBuilder, MapperExt};
//! use remap_runtime::MappingEngine;
//!
//! let mut builder = MapperConfigurationBuilder::new();
//! builder.create_map::<Person, PersonDto>();
//!
//! let engine = MappingEngine::with_default_strategies(builder.build()?);
//! let dto: PersonDto = engine.map(&person)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod engine;
mod plan;
pub mod strategies;

pub use engine::{MappingEngine, MappingEngineBuilder};
pub use strategies::{SequenceToArray, SequenceToList};
