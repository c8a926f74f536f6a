//! List to array mapping

use remap_core::{
    CustomTypeMapper, Error, Mapper, Result, SequenceKind, SequenceSchema, TypeDescriptor,
    TypeRef, Value,
};

use super::map_elements;

/// Maps a growable sequence (`Vec<T>`) into a fixed one (`Box<[U]>`, `[U; N]`)
///
/// The result has exactly as many elements as the source. A `[U; N]`
/// destination whose `N` differs from the source length fails with
/// [`Error::UnsupportedConversion`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceToArray;

impl SequenceToArray {
    fn schemas<'a>(
        source: &'a TypeDescriptor,
        destination: &'a TypeDescriptor,
    ) -> Option<(&'a SequenceSchema, &'a SequenceSchema)> {
        let source = source.as_sequence()?;
        let destination = destination.as_sequence()?;
        (source.kind() == SequenceKind::Growable && destination.kind() == SequenceKind::Fixed)
            .then_some((source, destination))
    }
}

impl CustomTypeMapper for SequenceToArray {
    fn name(&self) -> &str {
        "sequence_to_array"
    }

    fn can_map(&self, source: &TypeRef, destination: &TypeRef) -> bool {
        Self::schemas(&source.describe(), &destination.describe()).is_some()
    }

    fn map(&self, mapper: &dyn Mapper, destination: &TypeRef, source: &Value) -> Result<Value> {
        let source_descriptor = mapper.descriptor(&source.type_ref());
        let destination_descriptor = mapper.descriptor(destination);
        let (from, to) = Self::schemas(&source_descriptor, &destination_descriptor)
            .ok_or_else(|| Error::unsupported(source.type_name(), destination.name()))?;
        let elements = map_elements(mapper, from, to, source)?;
        tracing::trace!(
            "Mapped {} element(s) from {} into {}",
            elements.len(),
            source.type_name(),
            destination
        );
        to.collect(elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MappingEngine;
    use remap_core::{MapperConfiguration, MapperExt};
    use rstest::rstest;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn engine() -> MappingEngine {
        MappingEngine::builder(MapperConfiguration::default())
            .strategy(SequenceToArray)
            .build()
    }

    #[rstest]
    #[case::vec_to_boxed_slice(TypeRef::of::<Vec<u8>>(), TypeRef::of::<Box<[u8]>>(), true)]
    #[case::vec_to_array(TypeRef::of::<Vec<u8>>(), TypeRef::of::<[u8; 2]>(), true)]
    #[case::array_to_vec(TypeRef::of::<[u8; 2]>(), TypeRef::of::<Vec<u8>>(), false)]
    #[case::vec_to_vec(TypeRef::of::<Vec<u8>>(), TypeRef::of::<Vec<u8>>(), false)]
    #[case::scalar(TypeRef::of::<u8>(), TypeRef::of::<Box<[u8]>>(), false)]
    fn test_can_map(#[case] source: TypeRef, #[case] destination: TypeRef, #[case] expected: bool) {
        assert_eq!(SequenceToArray.can_map(&source, &destination), expected);
    }

    #[test]
    fn test_preserves_length_and_order() {
        let mapped: Box<[String]> = engine()
            .map::<Box<[String]>>(&vec!["c".to_string(), "a".to_string(), "b".to_string()])
            .unwrap();
        assert_eq!(&*mapped, &["c", "a", "b"]);
    }

    #[test]
    fn test_empty_source() {
        let mapped: Box<[u32]> = engine().map::<Box<[u32]>>(&Vec::<u32>::new()).unwrap();
        assert!(mapped.is_empty());
    }

    #[test]
    fn test_fixed_array_length_must_match() {
        let mapped: [u8; 3] = engine().map::<[u8; 3]>(&vec![1_u8, 2, 3]).unwrap();
        assert_eq!(mapped, [1, 2, 3]);

        let err = engine().map::<[u8; 2]>(&vec![1_u8, 2, 3]).unwrap_err();
        assert!(matches!(err, Error::UnsupportedConversion { .. }));
    }

    #[test]
    fn test_element_failure_propagates() {
        let err = engine().map::<Box<[u8]>>(&vec!["x".to_string()]).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedConversion { from, .. } if from.contains("String")
        ));
    }

    /// Delegates to an engine and counts descriptor lookups
    struct CountingMapper {
        engine: MappingEngine,
        lookups: AtomicUsize,
    }

    impl Mapper for CountingMapper {
        fn map_value(&self, destination: &TypeRef, source: Option<&Value>) -> Result<Value> {
            self.engine.map_value(destination, source)
        }

        fn descriptor(&self, ty: &TypeRef) -> Arc<TypeDescriptor> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.engine.descriptor(ty)
        }
    }

    #[test]
    fn test_map_reads_descriptors_through_mapper() {
        let mapper = CountingMapper {
            engine: engine(),
            lookups: AtomicUsize::new(0),
        };
        let destination = TypeRef::of::<Box<[u8]>>();

        let mapped = SequenceToArray
            .map(&mapper, &destination, &Value::new(vec![7_u8, 8]))
            .unwrap();

        assert_eq!(&*mapped.downcast::<Box<[u8]>>().unwrap(), &[7, 8]);
        assert_eq!(mapper.lookups.load(Ordering::SeqCst), 2);
    }
}
