//! Creating lights by name and committing them.
//!
//! A [`LightRegistry`] maps type names to factories. The
//! process-wide registry behind [`make_light`] is filled once by
//! [`lights_init`] (plus any [`register_light`] calls) during startup
//! and only read afterwards.

// std
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
// others
use lazy_static::lazy_static;
use log::{debug, info, warn};
use rayon::prelude::*;
use strum::IntoEnumIterator;
// lights
use crate::core::light::{Light, LightError};
use crate::core::paramset::ParamSet;
use crate::device::Device;
use crate::lights::LightKind;

/// Builds a light holding its defaults, with its device equivalent
/// allocated on the given device.
pub type LightFactory = fn(&Device) -> Result<Box<dyn Light>, LightError>;

#[derive(Default, Clone)]
pub struct LightRegistry {
    factories: HashMap<String, LightFactory>,
}

impl LightRegistry {
    pub fn new() -> Self {
        LightRegistry::default()
    }
    /// A registry knowing every [`LightKind`] and its aliases.
    pub fn with_builtin_lights() -> Self {
        let mut registry = LightRegistry::new();
        registry.register_builtin_lights();
        registry
    }
    fn register_builtin_lights(&mut self) {
        for kind in LightKind::iter() {
            self.factories.insert(kind.to_string(), kind.factory());
            for alias in kind.aliases() {
                self.factories.insert(String::from(*alias), kind.factory());
            }
        }
    }
    /// Register `factory` under `name`, returning the factory it
    /// replaces.
    pub fn register(&mut self, name: &str, factory: LightFactory) -> Option<LightFactory> {
        let previous = self.factories.insert(String::from(name), factory);
        if previous.is_some() {
            warn!("light type \"{}\" registered again, replacing it", name);
        }
        previous
    }
    pub fn is_registered(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
    /// Registered names in alphabetical order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }
    /// Create a light of type `name`. Nothing is allocated on the
    /// device if the name is unknown.
    pub fn create(&self, name: &str, device: &Device) -> Result<Box<dyn Light>, LightError> {
        match self.factories.get(name) {
            Some(factory) => {
                let light = factory(device)?;
                debug!("created \"{}\" light {}", name, light.device_id());
                Ok(light)
            }
            None => Err(LightError::UnknownVariant(String::from(name))),
        }
    }
}

lazy_static! {
    static ref LIGHT_REGISTRY: RwLock<LightRegistry> = RwLock::new(LightRegistry::new());
}

/// Register the built-in lights with the process-wide registry. Call
/// once before scene setup; calling it again changes nothing.
pub fn lights_init() {
    let mut registry = LIGHT_REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    registry.register_builtin_lights();
    info!("{} light type names registered", registry.factories.len());
}

/// Make an additional light type available to [`make_light`].
pub fn register_light(name: &str, factory: LightFactory) -> Option<LightFactory> {
    LIGHT_REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(name, factory)
}

/// Create a light through the process-wide registry.
pub fn make_light(name: &str, device: &Device) -> Result<Box<dyn Light>, LightError> {
    LIGHT_REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .create(name, device)
}

/// Commit each light with the parameter set at the same index, in
/// parallel. The lights are distinct objects, so their commits don't
/// interact. Surplus lights or parameter sets are left alone.
pub fn commit_lights(
    lights: &mut [Box<dyn Light>],
    params: &[ParamSet],
) -> Vec<Result<(), LightError>> {
    lights
        .par_iter_mut()
        .zip(params.par_iter())
        .map(|(light, params)| {
            let result = light.commit(params);
            params.report_unused();
            result
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::geometry::Point3f;
    use crate::core::pbrt::Spectrum;
    use crate::device::lights::{AmbientLightEquivalent, PointLightEquivalent};
    use crate::device::DeviceConfig;
    use crate::lights::ambient::AmbientLight;
    use std::sync::Arc;

    fn ambient_equivalent(light: &dyn Light) -> AmbientLightEquivalent {
        light
            .device_handle()
            .downcast_ref::<AmbientLightEquivalent>()
            .unwrap()
            .clone()
    }

    #[test]
    fn unknown_type_allocates_nothing() {
        let device = Device::default();
        let registry = LightRegistry::with_builtin_lights();
        match registry.create("nonexistent", &device) {
            Err(LightError::UnknownVariant(name)) => assert_eq!(name, "nonexistent"),
            Err(e) => panic!("unexpected {:?}", e),
            Ok(_) => panic!("created a nonexistent light"),
        }
        assert_eq!(device.total_allocated(), 0);
        assert_eq!(device.live_equivalents(), 0);
    }

    #[test]
    fn aliases_create_the_same_kind() {
        let device = Device::default();
        let registry = LightRegistry::with_builtin_lights();
        for name in &["ambient", "AmbientLight"] {
            assert_eq!(registry.create(name, &device).unwrap().type_name(), "ambient");
        }
        for name in &["distant", "directional", "DirectionalLight"] {
            assert_eq!(registry.create(name, &device).unwrap().type_name(), "distant");
        }
        assert_eq!(registry.create("hdri", &device).unwrap().type_name(), "infinite");
        assert_eq!(registry.create("sphere", &device).unwrap().type_name(), "point");
        assert!(registry.names().contains(&"quad"));
    }

    #[test]
    fn registration_order_does_not_matter() {
        let mut forward = LightRegistry::new();
        forward.register("ambient", AmbientLight::create);
        forward.register("studio", crate::lights::point::PointLight::create);
        let mut backward = LightRegistry::new();
        backward.register("studio", crate::lights::point::PointLight::create);
        backward.register("ambient", AmbientLight::create);
        assert_eq!(forward.names(), backward.names());
        let device = Device::default();
        for name in forward.names() {
            assert_eq!(
                forward.create(name, &device).unwrap().type_name(),
                backward.create(name, &device).unwrap().type_name()
            );
        }
    }

    #[test]
    fn reregistering_replaces() {
        let mut registry = LightRegistry::with_builtin_lights();
        assert!(registry
            .register("ambient", crate::lights::point::PointLight::create)
            .is_some());
        let device = Device::default();
        assert_eq!(registry.create("ambient", &device).unwrap().type_name(), "point");
    }

    #[test]
    fn device_failure_is_propagated() {
        let device = Device::new(DeviceConfig {
            label: String::from("full"),
            max_lights: Some(0),
        });
        let registry = LightRegistry::with_builtin_lights();
        match registry.create("point", &device) {
            Err(LightError::DeviceInitFailure { kind, .. }) => assert_eq!(kind, "point"),
            Err(e) => panic!("unexpected {:?}", e),
            Ok(_) => panic!("allocated beyond capacity"),
        }
    }

    #[test]
    fn global_registry_after_init() {
        lights_init();
        lights_init();
        let device = Device::default();
        assert_eq!(make_light("spot", &device).unwrap().type_name(), "spot");
        assert!(make_light("nonexistent", &device).is_err());
        register_light("testing_ambient", AmbientLight::create);
        assert_eq!(
            make_light("testing_ambient", &device).unwrap().type_name(),
            "ambient"
        );
    }

    #[test]
    fn empty_commit_yields_defaults_for_every_kind() {
        let device = Device::default();
        let registry = LightRegistry::with_builtin_lights();
        for kind in LightKind::iter() {
            let mut light = registry.create(&kind.to_string(), &device).unwrap();
            let before = format!("{:?}", light.device_handle());
            light.commit(&ParamSet::default()).unwrap();
            assert_eq!(format!("{:?}", light.device_handle()), before);
            assert!(light.commit_state().is_committed());
        }
    }

    #[test]
    fn commit_is_idempotent() {
        let device = Device::default();
        let mut light = AmbientLight::create(&device).unwrap();
        let mut params = ParamSet::default();
        params.add_rgb_spectrum("color", Spectrum::rgb(0.2, 0.4, 0.8));
        params.add_float("intensity", 3.0);
        light.commit(&params).unwrap();
        let first = ambient_equivalent(light.as_ref());
        light.commit(&params).unwrap();
        assert_eq!(ambient_equivalent(light.as_ref()), first);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let device = Device::default();
        let mut with_extra = AmbientLight::create(&device).unwrap();
        let mut without_extra = AmbientLight::create(&device).unwrap();
        let mut params = ParamSet::default();
        params.add_float("intensity", 0.5);
        without_extra.commit(&params).unwrap();
        params.add_string("flavor", String::from("vanilla"));
        params.add_point3f("position", Point3f::new(1.0, 1.0, 1.0));
        with_extra.commit(&params).unwrap();
        assert_eq!(
            ambient_equivalent(with_extra.as_ref()),
            ambient_equivalent(without_extra.as_ref())
        );
    }

    #[test]
    fn committing_one_light_leaves_others_alone() {
        let device = Device::default();
        let mut a = AmbientLight::create(&device).unwrap();
        let mut b = AmbientLight::create(&device).unwrap();
        let mut params = ParamSet::default();
        params.add_float("intensity", 7.0);
        b.commit(&params).unwrap();
        let b_before = ambient_equivalent(b.as_ref());
        params.add_float("intensity", 9.0);
        a.commit(&params).unwrap();
        assert_eq!(ambient_equivalent(b.as_ref()), b_before);
        assert_eq!(ambient_equivalent(a.as_ref()).intensity, 9.0);
        assert_ne!(a.device_id(), b.device_id());
    }

    #[test]
    fn parallel_commits_of_distinct_lights() {
        let device = Device::default();
        let registry = LightRegistry::with_builtin_lights();
        let mut lights: Vec<Box<dyn Light>> = Vec::new();
        let mut params: Vec<ParamSet> = Vec::new();
        for i in 0..64 {
            lights.push(registry.create("point", &device).unwrap());
            let mut p = ParamSet::default();
            p.add_float("intensity", i as f32);
            if i == 13 {
                p.add_string("radius", String::from("oops"));
            }
            params.push(p);
        }
        let results = commit_lights(&mut lights, &params);
        assert_eq!(results.len(), 64);
        for (i, (light, result)) in lights.iter().zip(results.iter()).enumerate() {
            let equivalent = light
                .device_handle()
                .downcast_ref::<PointLightEquivalent>()
                .unwrap();
            if i == 13 {
                assert!(result.is_err());
                assert!(!light.commit_state().is_committed());
                assert_eq!(equivalent.intensity, 1.0);
            } else {
                assert!(result.is_ok());
                assert_eq!(equivalent.intensity, i as f32);
            }
        }
    }

    #[test]
    fn concurrent_reads_after_commit() {
        let device = Device::default();
        let registry = LightRegistry::with_builtin_lights();
        let mut lights: Vec<Box<dyn Light>> = vec![
            registry.create("ambient", &device).unwrap(),
            registry.create("ambient", &device).unwrap(),
        ];
        let mut params = ParamSet::default();
        params.add_rgb_spectrum("color", Spectrum::rgb(0.0, 1.0, 0.0));
        params.add_float("intensity", 2.0);
        let results = commit_lights(&mut lights, &[params.clone(), params]);
        assert!(results.iter().all(|r| r.is_ok()));
        // commit phase over, the rendering path only reads
        let lights = Arc::new(lights);
        crossbeam::scope(|scope| {
            for _ in 0..4 {
                let lights = lights.clone();
                scope.spawn(move |_| {
                    for light in lights.iter() {
                        let equivalent = ambient_equivalent(light.as_ref());
                        assert_eq!(equivalent.radiance, Spectrum::rgb(0.0, 2.0, 0.0));
                    }
                });
            }
        })
        .unwrap();
    }
}
