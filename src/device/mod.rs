//! The device side of lights.
//!
//! A [`Device`] stands in for the computation backend which evaluates
//! light contributions. Each host light owns exactly one device
//! equivalent, allocated through [`Device::create`] when the light is
//! constructed and released when its [`DeviceHandle`] is dropped.
//! Device equivalents are plain data: they are written by the owning
//! light's commit and read by the rendering path.
//!
//! The backend can be configured with a capacity. Allocations beyond
//! it fail with [`LightError::DeviceInitFailure`].

// std
use std::any::Any;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
// others
use log::trace;
use serde::Deserialize;
use thiserror::Error;
// lights
use crate::core::light::LightError;

pub mod lights;

/// What the rendering path gets to see of a light.
pub trait DeviceLight: fmt::Debug + Send + Sync + 'static {
    /// Name of the device-side type.
    fn kind(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
}

impl dyn DeviceLight {
    pub fn downcast_ref<T: DeviceLight>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(u64);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Backend settings, usually read from a TOML file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Shows up in diagnostics.
    pub label: String,
    /// Maximum number of device equivalents alive at the same time.
    pub max_lights: Option<usize>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig {
            label: String::from("cpu"),
            max_lights: None,
        }
    }
}

impl DeviceConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
        DeviceConfig::from_toml_str(&contents)
    }
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Debug)]
struct DeviceState {
    config: DeviceConfig,
    live: AtomicUsize,
    total: AtomicU64,
}

/// Cheap to clone; all clones share the same backend.
#[derive(Debug, Clone)]
pub struct Device {
    state: Arc<DeviceState>,
}

impl Device {
    pub fn new(config: DeviceConfig) -> Self {
        Device {
            state: Arc::new(DeviceState {
                config,
                live: AtomicUsize::new(0),
                total: AtomicU64::new(0),
            }),
        }
    }
    pub fn config(&self) -> &DeviceConfig {
        &self.state.config
    }
    /// Allocate a device equivalent holding `init` for a light of the
    /// given kind.
    pub fn create<T: DeviceLight>(&self, kind: &str, init: T) -> Result<DeviceHandle<T>, LightError> {
        let mut live: usize = self.state.live.load(Ordering::Acquire);
        loop {
            if let Some(max_lights) = self.state.config.max_lights {
                if live >= max_lights {
                    return Err(LightError::DeviceInitFailure {
                        kind: String::from(kind),
                        reason: format!(
                            "device \"{}\" is limited to {} light(s)",
                            self.state.config.label, max_lights
                        ),
                    });
                }
            }
            match self.state.live.compare_exchange_weak(
                live,
                live + 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => break,
                Err(current) => live = current,
            }
        }
        let id = DeviceId(self.state.total.fetch_add(1, Ordering::Relaxed));
        trace!(
            "allocated {} {} for \"{}\" light on device \"{}\"",
            init.kind(),
            id,
            kind,
            self.state.config.label
        );
        Ok(DeviceHandle {
            id,
            data: Box::new(init),
            device: self.state.clone(),
        })
    }
    /// Number of device equivalents currently alive.
    pub fn live_equivalents(&self) -> usize {
        self.state.live.load(Ordering::Acquire)
    }
    /// Number of device equivalents ever allocated.
    pub fn total_allocated(&self) -> u64 {
        self.state.total.load(Ordering::Relaxed)
    }
}

impl Default for Device {
    fn default() -> Self {
        Device::new(DeviceConfig::default())
    }
}

/// Exclusive ownership of one device equivalent. Not `Clone`; the
/// backend slot is given back when the handle is dropped.
pub struct DeviceHandle<T: DeviceLight> {
    id: DeviceId,
    data: Box<T>,
    device: Arc<DeviceState>,
}

impl<T: DeviceLight> DeviceHandle<T> {
    pub fn id(&self) -> DeviceId {
        self.id
    }
    pub fn get(&self) -> &T {
        &self.data
    }
    /// Only the owner of the handle can write, which for lights means
    /// their commit.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.data
    }
}

impl<T: DeviceLight> fmt::Debug for DeviceHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("id", &self.id)
            .field("data", &self.data)
            .finish()
    }
}

impl<T: DeviceLight> Drop for DeviceHandle<T> {
    fn drop(&mut self) {
        self.device.live.fetch_sub(1, Ordering::AcqRel);
        trace!("released {} {}", self.data.kind(), self.id);
    }
}

#[cfg(test)]
mod test {
    use super::lights::AmbientLightEquivalent;
    use super::*;

    #[test]
    fn handles_release_their_slot() {
        let device = Device::default();
        let a = device
            .create("ambient", AmbientLightEquivalent::default())
            .unwrap();
        let b = device
            .create("ambient", AmbientLightEquivalent::default())
            .unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(device.live_equivalents(), 2);
        drop(a);
        assert_eq!(device.live_equivalents(), 1);
        drop(b);
        assert_eq!(device.live_equivalents(), 0);
        assert_eq!(device.total_allocated(), 2);
    }

    #[test]
    fn capacity_is_enforced() {
        let device = Device::new(DeviceConfig {
            label: String::from("tiny"),
            max_lights: Some(1),
        });
        let first = device
            .create("ambient", AmbientLightEquivalent::default())
            .unwrap();
        match device.create("ambient", AmbientLightEquivalent::default()) {
            Err(LightError::DeviceInitFailure { kind, reason }) => {
                assert_eq!(kind, "ambient");
                assert!(reason.contains("tiny"));
            }
            other => panic!("unexpected {:?}", other),
        }
        drop(first);
        assert!(device
            .create("ambient", AmbientLightEquivalent::default())
            .is_ok());
    }

    #[test]
    fn downcast_through_trait_object() {
        let device = Device::default();
        let handle = device
            .create("ambient", AmbientLightEquivalent::default())
            .unwrap();
        let opaque: &dyn DeviceLight = handle.get();
        assert_eq!(opaque.kind(), "AmbientLight");
        assert!(opaque.downcast_ref::<AmbientLightEquivalent>().is_some());
    }

    #[test]
    fn config_from_toml() {
        let config = DeviceConfig::from_toml_str("label = \"gpu0\"\nmax_lights = 8\n").unwrap();
        assert_eq!(config.label, "gpu0");
        assert_eq!(config.max_lights, Some(8));
        let config = DeviceConfig::from_toml_str("").unwrap();
        assert_eq!(config, DeviceConfig::default());
        assert!(DeviceConfig::from_toml_str("max_lights = \"many\"").is_err());
    }
}
