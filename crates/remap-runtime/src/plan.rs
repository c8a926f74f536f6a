//! Mapping plans
//!
//! Everything the engine decides for a type pair (which strategy, which
//! constructor, where each member comes from) depends only on the two types,
//! so it is resolved once into a [`MappingPlan`] and reused.

use std::sync::Arc;

use remap_core::{
    ConstructorSchema, CustomTypeMapper, Error, MapperConfiguration, MappingAction, MemberSchema,
    OptionalSchema, ParamSchema, Projection, Result, StructSchema, TypeDescriptor, TypePair,
    TypeRef,
};

/// How one type pair is mapped
#[derive(Debug)]
pub(crate) enum MappingPlan {
    /// Hand the value to the custom strategy at this index
    Custom(usize),
    /// Same non-struct type on both sides; clone the value
    Identity,
    /// Destination is optional; map into the inner type and wrap
    Wrap(OptionalSchema),
    /// Source is optional; unwrap and map the inner value
    Unwrap(OptionalSchema),
    /// Construct and populate a struct
    Object(ObjectPlan),
}

/// Construction and population steps for a struct destination
#[derive(Debug)]
pub(crate) struct ObjectPlan {
    pub(crate) destination: TypeRef,
    pub(crate) constructor: ConstructorSchema,
    pub(crate) arguments: Vec<ArgumentPlan>,
    pub(crate) members: Vec<MemberPlan>,
}

/// Where a constructor argument comes from
#[derive(Debug)]
pub(crate) enum ArgumentPlan {
    /// Same-named source member
    FromSource {
        param: ParamSchema,
        source: MemberSchema,
    },
    /// Declared default
    Default { param: ParamSchema },
}

impl ArgumentPlan {
    fn bound_member(&self) -> Option<&'static str> {
        match self {
            Self::FromSource { param, .. } => Some(param.name()),
            Self::Default { .. } => None,
        }
    }
}

/// One destination member assignment
#[derive(Debug)]
pub(crate) struct MemberPlan {
    pub(crate) target: MemberSchema,
    pub(crate) source: MemberSource,
}

/// Where a destination member's value comes from
#[derive(Debug)]
pub(crate) enum MemberSource {
    /// Configured projection over the whole source
    Projection(Projection),
    /// Same-named source member
    Member(MemberSchema),
}

/// Resolve how `pair` is mapped
pub(crate) fn compile(
    pair: TypePair,
    source: &TypeDescriptor,
    destination: &TypeDescriptor,
    configuration: &MapperConfiguration,
    strategies: &[Arc<dyn CustomTypeMapper>],
) -> Result<MappingPlan> {
    if let Some(index) = strategies
        .iter()
        .position(|s| s.can_map(&pair.source, &pair.destination))
    {
        tracing::debug!(
            "Custom mapper '{}' selected for {}",
            strategies[index].name(),
            pair
        );
        return Ok(MappingPlan::Custom(index));
    }

    match (source, destination) {
        (_, TypeDescriptor::Struct(schema)) if source.as_optional().is_none() => {
            compile_object(pair, source.as_struct(), schema, configuration).map(MappingPlan::Object)
        }
        _ if pair.source == pair.destination => Ok(MappingPlan::Identity),
        (_, TypeDescriptor::Optional(optional)) => Ok(MappingPlan::Wrap(optional.clone())),
        (TypeDescriptor::Optional(optional), _) => Ok(MappingPlan::Unwrap(optional.clone())),
        _ => Err(Error::unsupported(pair.source.name(), pair.destination.name())),
    }
}

fn compile_object(
    pair: TypePair,
    source: Option<&StructSchema>,
    destination: &StructSchema,
    configuration: &MapperConfiguration,
) -> Result<ObjectPlan> {
    let source_member = |name: &str| {
        source.and_then(|schema| {
            schema
                .readable_member(name)
                .map(|index| schema.members()[index].clone())
        })
    };

    let (constructor, arguments) = destination
        .constructors()
        .iter()
        .find_map(|constructor| {
            constructor
                .params()
                .iter()
                .map(|param| match source_member(param.name()) {
                    Some(member) => Some(ArgumentPlan::FromSource {
                        param: param.clone(),
                        source: member,
                    }),
                    None if param.has_default() => Some(ArgumentPlan::Default {
                        param: param.clone(),
                    }),
                    None => None,
                })
                .collect::<Option<Vec<_>>>()
                .map(|arguments| (constructor.clone(), arguments))
        })
        .ok_or_else(|| Error::ConstructionError {
            type_name: pair.destination.name(),
            message: if destination.constructors().is_empty() {
                "no constructors are declared".to_string()
            } else {
                format!(
                    "no constructor has all parameters resolvable from '{}'",
                    pair.source.name()
                )
            },
        })?;

    let bound: Vec<&str> = arguments.iter().filter_map(ArgumentPlan::bound_member).collect();
    let type_mapping = configuration.find(&pair);

    let mut members = Vec::new();
    for target in destination.members() {
        if !target.is_writable() || bound.contains(&target.name()) {
            continue;
        }

        let configured = type_mapping
            .and_then(|mapping| mapping.member(target.name()))
            .map(|member| member.action());
        let source = match configured {
            Some(MappingAction::Ignore) => continue,
            Some(MappingAction::Map(projection)) => MemberSource::Projection(projection.clone()),
            None => match source_member(target.name()) {
                Some(member) => MemberSource::Member(member),
                None => continue,
            },
        };
        members.push(MemberPlan {
            target: target.clone(),
            source,
        });
    }

    tracing::debug!(
        "Compiled plan for {}: constructor with {} parameter(s), {} member step(s)",
        pair,
        arguments.len(),
        members.len()
    );

    Ok(ObjectPlan {
        destination: pair.destination,
        constructor,
        arguments,
        members,
    })
}
