//! Fluent configuration builder
//!
//! # Example
//!
//! ```rust,ignore
//! let mut builder = MapperConfigurationBuilder::new();
//! builder
//!     .create_map::<Person, PersonDto>()
//!     .for_member("full_name", |m| {
//!         m.map(|p: &Person| format!("{} {}", p.first_name, p.last_name))
//!     })
//!     .for_member("address", |m| m.ignore());
//!
//! let configuration = builder.build()?;
//! ```

use std::collections::HashSet;
use std::marker::PhantomData;

use crate::action::{MappingAction, Projection};
use crate::config::{MapperConfiguration, MemberMappingConfiguration, TypeMappingConfiguration};
use crate::error::{Error, Result};
use crate::options::{DuplicateMapPolicy, MapperOptions};
use crate::reflect::{Reflect, TypePair};

/// Accumulates type mappings and produces [`MapperConfiguration`] snapshots
#[derive(Debug, Default)]
pub struct MapperConfigurationBuilder {
    drafts: Vec<TypeMappingConfiguration>,
    options: MapperOptions,
}

impl MapperConfigurationBuilder {
    /// Builder with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder with explicit options
    pub fn with_options(options: MapperOptions) -> Self {
        Self {
            drafts: Vec::new(),
            options,
        }
    }

    /// Start a type mapping from `S` to `D`
    ///
    /// Every call registers a separate mapping, even for a pair that is
    /// already registered.
    pub fn create_map<S: Reflect, D: Reflect>(&mut self) -> TypeMappingBuilder<'_, S, D> {
        self.drafts
            .push(TypeMappingConfiguration::new(TypePair::of::<S, D>(), Vec::new()));
        let index = self.drafts.len() - 1;
        TypeMappingBuilder {
            draft: &mut self.drafts[index],
            _types: PhantomData,
        }
    }

    /// Snapshot everything registered so far, in registration order
    ///
    /// Fails with [`Error::DuplicateTypeMap`] when a pair was registered twice
    /// and the options use [`DuplicateMapPolicy::Reject`].
    pub fn build(&self) -> Result<MapperConfiguration> {
        let mut seen = HashSet::new();
        for draft in &self.drafts {
            let pair = draft.pair();
            if seen.insert(pair) {
                continue;
            }
            match self.options.duplicate_type_maps {
                DuplicateMapPolicy::Reject => {
                    return Err(Error::DuplicateTypeMap {
                        source_type: pair.source.name(),
                        destination_type: pair.destination.name(),
                    });
                }
                DuplicateMapPolicy::FirstWins => {
                    tracing::warn!(
                        "Type map {} registered more than once; later registrations are shadowed",
                        pair
                    );
                }
            }
        }

        Ok(MapperConfiguration::new(
            self.drafts.clone(),
            self.options.clone(),
        ))
    }
}

/// Member configuration for one type pair
pub struct TypeMappingBuilder<'a, S, D> {
    draft: &'a mut TypeMappingConfiguration,
    _types: PhantomData<fn(&S) -> D>,
}

impl<S: Reflect, D: Reflect> TypeMappingBuilder<'_, S, D> {
    /// Configure the destination member called `member_name`
    ///
    /// When `configure` sets no action nothing is recorded and the member keeps
    /// the default name-based copy.
    pub fn for_member<F>(self, member_name: impl Into<String>, configure: F) -> Self
    where
        F: FnOnce(&mut MemberMappingBuilder<S>),
    {
        let mut member = MemberMappingBuilder {
            action: None,
            _source: PhantomData,
        };
        configure(&mut member);
        if let Some(action) = member.action {
            self.draft
                .push_member(MemberMappingConfiguration::new(member_name, action));
        }
        self
    }
}

/// Options for one destination member
///
/// The last call wins when both [`ignore`](Self::ignore) and
/// [`map`](Self::map) are used.
pub struct MemberMappingBuilder<S> {
    action: Option<MappingAction>,
    _source: PhantomData<fn(&S)>,
}

impl<S: Reflect> MemberMappingBuilder<S> {
    /// Skip the member
    pub fn ignore(&mut self) {
        self.action = Some(MappingAction::Ignore);
    }

    /// Compute the member from the whole source instance
    pub fn map<M, F>(&mut self, projection: F)
    where
        M: Reflect,
        F: Fn(&S) -> M + Send + Sync + 'static,
    {
        self.action = Some(MappingAction::Map(Projection::new(projection)));
    }
}
