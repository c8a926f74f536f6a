//! Built-in custom type mappers
//!
//! Sequences have no members to copy, so the name-based algorithm cannot
//! handle them. These strategies map them element by element through the
//! engine that invoked them.

pub mod array;
pub mod list;

use std::sync::Arc;

use remap_core::{CustomTypeMapper, Mapper, Result, SequenceSchema, Value};

pub use array::SequenceToArray;
pub use list::SequenceToList;

/// The strategies [`MappingEngine::with_default_strategies`] registers, in order
///
/// [`MappingEngine::with_default_strategies`]: crate::MappingEngine::with_default_strategies
pub fn defaults() -> Vec<Arc<dyn CustomTypeMapper>> {
    vec![Arc::new(SequenceToArray), Arc::new(SequenceToList)]
}

/// Map every element of `source` into the destination element type, in order
fn map_elements(
    mapper: &dyn Mapper,
    source: &SequenceSchema,
    destination: &SequenceSchema,
    value: &Value,
) -> Result<Vec<Value>> {
    let element = destination.element();
    source
        .elements(value)?
        .iter()
        .map(|item| mapper.map_value(&element, Some(item)))
        .collect()
}
