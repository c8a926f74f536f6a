//! Sequence to list mapping

use remap_core::{
    CustomTypeMapper, Error, Mapper, Result, SequenceKind, SequenceSchema, TypeDescriptor,
    TypeRef, Value,
};

use super::map_elements;

/// Maps any sequence into a growable sequence (`Vec<U>`) of a different type
///
/// Identical sequence types are left to the engine's identity path.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceToList;

impl SequenceToList {
    fn schemas<'a>(
        source: &'a TypeDescriptor,
        destination: &'a TypeDescriptor,
    ) -> Option<(&'a SequenceSchema, &'a SequenceSchema)> {
        let source = source.as_sequence()?;
        let destination = destination.as_sequence()?;
        (destination.kind() == SequenceKind::Growable).then_some((source, destination))
    }
}

impl CustomTypeMapper for SequenceToList {
    fn name(&self) -> &str {
        "sequence_to_list"
    }

    fn can_map(&self, source: &TypeRef, destination: &TypeRef) -> bool {
        source != destination
            && Self::schemas(&source.describe(), &destination.describe()).is_some()
    }

    fn map(&self, mapper: &dyn Mapper, destination: &TypeRef, source: &Value) -> Result<Value> {
        let source_descriptor = mapper.descriptor(&source.type_ref());
        let destination_descriptor = mapper.descriptor(destination);
        let (from, to) = Self::schemas(&source_descriptor, &destination_descriptor)
            .ok_or_else(|| Error::unsupported(source.type_name(), destination.name()))?;
        to.collect(map_elements(mapper, from, to, source)?)
    }
}
