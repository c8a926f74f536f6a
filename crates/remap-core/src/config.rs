//! Mapping configuration
//!
//! The immutable result of [`MapperConfigurationBuilder::build`]: which
//! destination members of which type pairs are overridden, and how.
//!
//! [`MapperConfigurationBuilder::build`]: crate::builder::MapperConfigurationBuilder::build

use crate::action::MappingAction;
use crate::options::MapperOptions;
use crate::reflect::TypePair;

/// Override for one destination member
#[derive(Debug, Clone)]
pub struct MemberMappingConfiguration {
    member_name: String,
    action: MappingAction,
}

impl MemberMappingConfiguration {
    /// Bind an action to a destination member name
    pub fn new(member_name: impl Into<String>, action: MappingAction) -> Self {
        Self {
            member_name: member_name.into(),
            action,
        }
    }

    /// Destination member name (case-sensitive)
    pub fn member_name(&self) -> &str {
        &self.member_name
    }

    /// The configured action
    pub fn action(&self) -> &MappingAction {
        &self.action
    }
}

/// Member overrides for one (source, destination) pair
#[derive(Debug, Clone)]
pub struct TypeMappingConfiguration {
    pair: TypePair,
    members: Vec<MemberMappingConfiguration>,
}

impl TypeMappingConfiguration {
    /// Configuration for `pair` with the given member overrides
    pub fn new(pair: TypePair, members: Vec<MemberMappingConfiguration>) -> Self {
        Self { pair, members }
    }

    /// The configured type pair
    pub fn pair(&self) -> TypePair {
        self.pair
    }

    /// Member overrides in registration order
    pub fn members(&self) -> &[MemberMappingConfiguration] {
        &self.members
    }

    pub(crate) fn push_member(&mut self, member: MemberMappingConfiguration) {
        self.members.push(member);
    }

    /// First override registered for `member_name`
    pub fn member(&self, member_name: &str) -> Option<&MemberMappingConfiguration> {
        self.members.iter().find(|m| m.member_name == member_name)
    }
}

/// Immutable set of type mapping configurations
#[derive(Debug, Clone, Default)]
pub struct MapperConfiguration {
    type_mappings: Vec<TypeMappingConfiguration>,
    options: MapperOptions,
}

impl MapperConfiguration {
    /// Assemble a configuration
    pub fn new(type_mappings: Vec<TypeMappingConfiguration>, options: MapperOptions) -> Self {
        Self {
            type_mappings,
            options,
        }
    }

    /// All type mappings in registration order
    pub fn type_mappings(&self) -> &[TypeMappingConfiguration] {
        &self.type_mappings
    }

    /// Options the configuration was built with
    pub fn options(&self) -> &MapperOptions {
        &self.options
    }

    /// First type mapping registered for exactly `pair`
    pub fn find(&self, pair: &TypePair) -> Option<&TypeMappingConfiguration> {
        self.type_mappings.iter().find(|t| t.pair == *pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Projection;

    fn projection_config(name: &str, text: &'static str) -> MemberMappingConfiguration {
        MemberMappingConfiguration::new(
            name,
            MappingAction::Map(Projection::new(move |_: &i32| text.to_string())),
        )
    }

    #[test]
    fn test_find_matches_exact_pair_only() {
        let config = MapperConfiguration::new(
            vec![TypeMappingConfiguration::new(TypePair::of::<i32, String>(), vec![])],
            MapperOptions::default(),
        );
        assert!(config.find(&TypePair::of::<i32, String>()).is_some());
        assert!(config.find(&TypePair::of::<String, i32>()).is_none());
        assert!(config.find(&TypePair::of::<i64, String>()).is_none());
    }

    #[test]
    fn test_find_returns_first_registration() {
        let pair = TypePair::of::<i32, String>();
        let config = MapperConfiguration::new(
            vec![
                TypeMappingConfiguration::new(pair, vec![projection_config("first", "a")]),
                TypeMappingConfiguration::new(pair, vec![projection_config("second", "b")]),
            ],
            MapperOptions::default(),
        );
        let found = config.find(&pair).unwrap();
        assert!(found.member("first").is_some());
        assert!(found.member("second").is_none());
    }

    #[test]
    fn test_member_lookup_is_exact() {
        let mapping = TypeMappingConfiguration::new(
            TypePair::of::<i32, String>(),
            vec![
                MemberMappingConfiguration::new("full_name", MappingAction::Ignore),
                projection_config("full_name", "shadowed"),
            ],
        );
        assert!(matches!(
            mapping.member("full_name").unwrap().action(),
            MappingAction::Ignore
        ));
        assert!(mapping.member("Full_Name").is_none());
        assert_eq!(mapping.members().len(), 2);
    }
}
