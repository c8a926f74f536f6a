//! Mapping engine

use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;

use remap_core::{
    CustomTypeMapper, Error, Mapper, MapperConfiguration, ParamSchema, Result, TypeDescriptor,
    TypePair, TypeRef, Value,
};

use crate::plan::{self, ArgumentPlan, MappingPlan, MemberSource, ObjectPlan};
use crate::strategies;

/// Maps source values into destination types using a [`MapperConfiguration`]
/// and an ordered set of [`CustomTypeMapper`]s
///
/// Resolved plans and type descriptors are memoized per engine. The engine is
/// `Send + Sync` and can be shared across threads; concurrent first calls for
/// the same pair may compile the plan twice, but only one copy is kept.
pub struct MappingEngine {
    configuration: Arc<MapperConfiguration>,
    strategies: Vec<Arc<dyn CustomTypeMapper>>,
    descriptors: DashMap<TypeRef, Arc<TypeDescriptor>>,
    plans: DashMap<TypePair, Arc<MappingPlan>>,
}

impl MappingEngine {
    /// Create an engine with an explicit strategy list
    pub fn new(
        configuration: MapperConfiguration,
        strategies: Vec<Arc<dyn CustomTypeMapper>>,
    ) -> Self {
        Self {
            configuration: Arc::new(configuration),
            strategies,
            descriptors: DashMap::new(),
            plans: DashMap::new(),
        }
    }

    /// Create an engine with the built-in sequence strategies
    pub fn with_default_strategies(configuration: MapperConfiguration) -> Self {
        Self::new(configuration, strategies::defaults())
    }

    /// Start building an engine
    pub fn builder(configuration: MapperConfiguration) -> MappingEngineBuilder {
        MappingEngineBuilder {
            configuration,
            strategies: Vec::new(),
        }
    }

    /// The configuration this engine maps with
    pub fn configuration(&self) -> &MapperConfiguration {
        &self.configuration
    }

    /// Registered strategies, in dispatch order
    pub fn strategies(&self) -> &[Arc<dyn CustomTypeMapper>] {
        &self.strategies
    }

    /// Number of type pairs with a memoized plan
    pub fn cached_plans(&self) -> usize {
        self.plans.len()
    }

    fn plan(&self, pair: TypePair) -> Result<Arc<MappingPlan>> {
        let cache = self.configuration.options().cache_plans;
        if cache {
            if let Some(plan) = self.plans.get(&pair) {
                tracing::trace!("Plan cache hit for {}", pair);
                return Ok(Arc::clone(plan.value()));
            }
        }

        let source = self.descriptor(&pair.source);
        let destination = self.descriptor(&pair.destination);
        let plan = Arc::new(plan::compile(
            pair,
            &source,
            &destination,
            &self.configuration,
            &self.strategies,
        )?);

        if !cache {
            return Ok(plan);
        }
        Ok(Arc::clone(self.plans.entry(pair).or_insert(plan).value()))
    }

    fn map_at(&self, destination: &TypeRef, source: Option<&Value>, depth: usize) -> Result<Value> {
        let source = source.ok_or_else(|| Error::InvalidArgument {
            message: format!("cannot map an absent source into '{}'", destination.name()),
        })?;

        if let Some(limit) = self.configuration.options().max_depth {
            if depth > limit {
                return Err(Error::DepthLimitExceeded {
                    limit,
                    type_name: destination.name(),
                });
            }
        }

        let plan = self.plan(TypePair::new(source.type_ref(), *destination))?;
        match plan.as_ref() {
            MappingPlan::Custom(index) => {
                let scope = Scope {
                    engine: self,
                    depth: depth + 1,
                };
                self.strategies[*index].map(&scope, destination, source)
            }
            MappingPlan::Identity => Ok(source.clone()),
            MappingPlan::Wrap(optional) => {
                let inner = match self.present(source.clone())? {
                    Some(value) => Some(self.convert(value, optional.inner(), depth)?),
                    None => None,
                };
                optional.wrap(inner)
            }
            MappingPlan::Unwrap(optional) => match optional
                .unwrap(source)?
                .map(|inner| self.present(inner))
                .transpose()?
                .flatten()
            {
                Some(value) => self.convert(value, *destination, depth),
                None => Err(Error::InvalidArgument {
                    message: format!(
                        "cannot map an absent '{}' into '{}'",
                        source.type_name(),
                        destination.name()
                    ),
                }),
            },
            MappingPlan::Object(object) => self.populate(object, source, depth),
        }
    }

    fn populate(&self, plan: &ObjectPlan, source: &Value, depth: usize) -> Result<Value> {
        let mut arguments = Vec::with_capacity(plan.arguments.len());
        for argument in &plan.arguments {
            let value = match argument {
                ArgumentPlan::FromSource {
                    param,
                    source: member,
                } => match self.present(member.read(source)?)? {
                    Some(value) => self.convert(value, param.type_ref(), depth)?,
                    None => self.absent_argument(plan.destination, param)?,
                },
                ArgumentPlan::Default { param } => self.absent_argument(plan.destination, param)?,
            };
            arguments.push(value);
        }

        let mut instance = plan.constructor.invoke(arguments)?;

        for step in &plan.members {
            let target = step.target.type_ref();
            let value = match &step.source {
                MemberSource::Projection(projection) => self
                    .present(projection.invoke(source)?)?
                    .map(|value| self.fit(value, target))
                    .transpose()?,
                MemberSource::Member(member) => self
                    .present(member.read(source)?)?
                    .map(|value| self.convert(value, target, depth))
                    .transpose()?,
            };
            let value = match value {
                Some(value) => Some(value),
                None => self.absent_member(target)?,
            };
            if let Some(value) = value {
                step.target.write(&mut instance, value)?;
            }
        }

        Ok(instance)
    }

    /// Strip `Option` layers; `None` means the value is absent
    fn present(&self, value: Value) -> Result<Option<Value>> {
        let mut current = value;
        loop {
            let descriptor = self.descriptor(&current.type_ref());
            match descriptor.as_optional() {
                Some(optional) => match optional.unwrap(&current)? {
                    Some(inner) => current = inner,
                    None => return Ok(None),
                },
                None => return Ok(Some(current)),
            }
        }
    }

    /// Make `value` an instance of `target`, mapping recursively when the types differ
    fn convert(&self, value: Value, target: TypeRef, depth: usize) -> Result<Value> {
        if value.type_ref() == target {
            return Ok(value);
        }
        let descriptor = self.descriptor(&target);
        if let Some(optional) = descriptor.as_optional() {
            let inner = self.convert(value, optional.inner(), depth)?;
            return optional.wrap(Some(inner));
        }
        self.map_at(&target, Some(&value), depth + 1)
    }

    /// Like [`convert`](Self::convert) but only wraps into `Option`, never maps
    fn fit(&self, value: Value, target: TypeRef) -> Result<Value> {
        if value.type_ref() == target {
            return Ok(value);
        }
        let descriptor = self.descriptor(&target);
        match descriptor.as_optional() {
            Some(optional) => {
                let inner = self.fit(value, optional.inner())?;
                optional.wrap(Some(inner))
            }
            None => Err(Error::unsupported(value.type_name(), target.name())),
        }
    }

    /// `None` of an optional member type; other types cannot hold absence
    fn absent_member(&self, target: TypeRef) -> Result<Option<Value>> {
        match self.descriptor(&target).as_optional() {
            Some(optional) => optional.wrap(None).map(Some),
            None => Ok(None),
        }
    }

    fn absent_argument(&self, destination: TypeRef, param: &ParamSchema) -> Result<Value> {
        if let Some(default) = param.default_value() {
            return Ok(default);
        }
        let descriptor = self.descriptor(&param.type_ref());
        match descriptor.as_optional() {
            Some(optional) => optional.wrap(None),
            None => Err(Error::UnresolvedParameter {
                type_name: destination.name(),
                parameter: param.name().to_string(),
            }),
        }
    }
}

impl Mapper for MappingEngine {
    fn map_value(&self, destination: &TypeRef, source: Option<&Value>) -> Result<Value> {
        self.map_at(destination, source, 0)
    }

    fn descriptor(&self, ty: &TypeRef) -> Arc<TypeDescriptor> {
        if let Some(descriptor) = self.descriptors.get(ty) {
            return Arc::clone(descriptor.value());
        }
        let descriptor = Arc::new(ty.describe());
        Arc::clone(self.descriptors.entry(*ty).or_insert(descriptor).value())
    }
}

impl fmt::Debug for MappingEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strategies: Vec<_> = self.strategies.iter().map(|s| s.name()).collect();
        f.debug_struct("MappingEngine")
            .field("type_mappings", &self.configuration.type_mappings().len())
            .field("strategies", &strategies)
            .field("cached_plans", &self.plans.len())
            .finish()
    }
}

/// Engine handle given to custom strategies; nested calls keep the depth count
struct Scope<'a> {
    engine: &'a MappingEngine,
    depth: usize,
}

impl Mapper for Scope<'_> {
    fn map_value(&self, destination: &TypeRef, source: Option<&Value>) -> Result<Value> {
        self.engine.map_at(destination, source, self.depth)
    }

    fn descriptor(&self, ty: &TypeRef) -> Arc<TypeDescriptor> {
        self.engine.descriptor(ty)
    }
}

/// Builder returned by [`MappingEngine::builder`]
pub struct MappingEngineBuilder {
    configuration: MapperConfiguration,
    strategies: Vec<Arc<dyn CustomTypeMapper>>,
}

impl MappingEngineBuilder {
    /// Append a strategy; earlier strategies take precedence
    pub fn strategy(mut self, strategy: impl CustomTypeMapper + 'static) -> Self {
        self.strategies.push(Arc::new(strategy));
        self
    }

    /// Append the built-in sequence strategies
    pub fn default_strategies(mut self) -> Self {
        self.strategies.extend(strategies::defaults());
        self
    }

    /// Finish the engine
    pub fn build(self) -> MappingEngine {
        MappingEngine::new(self.configuration, self.strategies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remap_core::{MapperConfigurationBuilder, MapperExt, MapperOptions, Reflect, StructSchema};

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Celsius {
        degrees: f64,
    }

    impl Reflect for Celsius {
        fn describe() -> TypeDescriptor {
            StructSchema::builder::<Self>()
                .default_constructor()
                .field("degrees", |c: &Celsius| c.degrees, |c, v| c.degrees = v)
                .build()
        }
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Reading {
        degrees: f64,
        label: Option<String>,
    }

    impl Reflect for Reading {
        fn describe() -> TypeDescriptor {
            StructSchema::builder::<Self>()
                .default_constructor()
                .field("degrees", |r: &Reading| r.degrees, |r, v| r.degrees = v)
                .field("label", |r: &Reading| r.label.clone(), |r, v| r.label = v)
                .build()
        }
    }

    struct Fahrenheit;

    impl CustomTypeMapper for Fahrenheit {
        fn name(&self) -> &str {
            "fahrenheit"
        }

        fn can_map(&self, source: &TypeRef, destination: &TypeRef) -> bool {
            *source == TypeRef::of::<Celsius>() && *destination == TypeRef::of::<f64>()
        }

        fn map(
            &self,
            _mapper: &dyn Mapper,
            _destination: &TypeRef,
            source: &Value,
        ) -> Result<Value> {
            let celsius = source
                .downcast_ref::<Celsius>()
                .ok_or_else(|| Error::Custom {
                    strategy: self.name().to_string(),
                    message: "expected Celsius".to_string(),
                })?;
            Ok(Value::new(celsius.degrees * 9.0 / 5.0 + 32.0))
        }
    }

    fn engine() -> MappingEngine {
        MappingEngine::new(MapperConfiguration::default(), Vec::new())
    }

    #[test]
    fn test_absent_source_is_invalid_argument() {
        let err = engine()
            .map_value(&TypeRef::of::<Reading>(), None)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[test]
    fn test_plans_are_memoized_per_pair() {
        let engine = engine();
        let celsius = Celsius { degrees: 20.5 };
        engine.map::<Reading>(&celsius).unwrap();
        engine.map::<Reading>(&celsius).unwrap();
        assert_eq!(engine.cached_plans(), 1);
        engine.map::<Celsius>(&celsius).unwrap();
        assert_eq!(engine.cached_plans(), 2);
    }

    #[test]
    fn test_plan_cache_can_be_disabled() {
        let options = MapperOptions {
            cache_plans: false,
            ..MapperOptions::default()
        };
        let configuration = MapperConfigurationBuilder::with_options(options).build().unwrap();
        let engine = MappingEngine::new(configuration, Vec::new());
        let reading = engine.map::<Reading>(&Celsius { degrees: 1.0 }).unwrap();
        assert_eq!(reading.degrees, 1.0);
        assert_eq!(engine.cached_plans(), 0);
    }

    #[test]
    fn test_custom_strategy_takes_precedence() {
        let engine = MappingEngine::builder(MapperConfiguration::default())
            .strategy(Fahrenheit)
            .build();
        let fahrenheit: f64 = engine.map::<f64>(&Celsius { degrees: 100.0 }).unwrap();
        assert_eq!(fahrenheit, 212.0);
    }

    #[test]
    fn test_projection_into_optional_member_is_wrapped() {
        let mut builder = MapperConfigurationBuilder::new();
        builder
            .create_map::<Celsius, Reading>()
            .for_member("label", |m| m.map(|c: &Celsius| format!("{:.1}C", c.degrees)));
        let engine = MappingEngine::new(builder.build().unwrap(), Vec::new());

        let reading = engine.map::<Reading>(&Celsius { degrees: 3.0 }).unwrap();
        assert_eq!(reading.label.as_deref(), Some("3.0C"));
    }

    #[test]
    fn test_projection_of_wrong_type_is_unsupported() {
        let mut builder = MapperConfigurationBuilder::new();
        builder
            .create_map::<Celsius, Reading>()
            .for_member("degrees", |m| m.map(|c: &Celsius| c.degrees as i64));
        let engine = MappingEngine::new(builder.build().unwrap(), Vec::new());

        let err = engine.map::<Reading>(&Celsius { degrees: 3.0 }).unwrap_err();
        assert!(matches!(err, Error::UnsupportedConversion { from: "i64", to: "f64" }));
    }

    #[test]
    fn test_optional_top_level_values() {
        let engine = engine();
        let wrapped: Option<Reading> = engine
            .map::<Option<Reading>>(&Celsius { degrees: 2.0 })
            .unwrap();
        assert_eq!(wrapped.map(|r| r.degrees), Some(2.0));

        let unwrapped: Reading = engine
            .map::<Reading>(&Some(Celsius { degrees: 4.0 }))
            .unwrap();
        assert_eq!(unwrapped.degrees, 4.0);

        let err = engine.map::<Reading>(&None::<Celsius>).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));

        let none: Option<Reading> = engine.map::<Option<Reading>>(&None::<Celsius>).unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn test_identity_for_scalars() {
        let engine = engine();
        assert_eq!(engine.map::<String>(&"same".to_string()).unwrap(), "same");
        let err = engine.map::<String>(&5_u8).unwrap_err();
        assert!(matches!(err, Error::UnsupportedConversion { .. }));
    }

    #[test]
    fn test_debug_lists_strategies() {
        let engine = MappingEngine::with_default_strategies(MapperConfiguration::default());
        let debug = format!("{engine:?}");
        assert!(debug.contains("sequence_to_array"));
        assert!(debug.contains("sequence_to_list"));
    }
}
