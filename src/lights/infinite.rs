// others
use log::debug;
// lights
use crate::core::geometry::{vec3_cross_vec3, vec3_normalize, Vector3f};
use crate::core::light::{check_color, check_direction, check_emission, check_non_negative};
use crate::core::light::{CommitState, Light, LightError, LightFlags};
use crate::core::paramset::ParamSet;
use crate::core::pbrt::{Float, Spectrum};
use crate::device::lights::HdriLightEquivalent;
use crate::device::{Device, DeviceHandle, DeviceId, DeviceLight};
use crate::lights::ambient::{DEFAULT_COLOR, DEFAULT_INTENSITY};
use crate::lights::distant::DEFAULT_DIRECTION;

pub const DEFAULT_UP: Vector3f = Vector3f {
    x: 0.0,
    y: 1.0,
    z: 0.0,
};

/// An infinitely far away light source that surrounds the entire
/// scene, optionally textured with an environment map (HDRI). `up`
/// and `dir` orient the map.
///
/// Only the file name of the map is handed to the device; loading
/// texels is up to the backend.
pub struct InfiniteAreaLight {
    up: Vector3f,
    dir: Vector3f,
    color: Spectrum,
    intensity: Float,
    map: String,
    state: CommitState,
    equivalent: DeviceHandle<HdriLightEquivalent>,
}

impl InfiniteAreaLight {
    pub fn new(device: &Device) -> Result<Self, LightError> {
        let mut equivalent = device.create("infinite", HdriLightEquivalent::default())?;
        equivalent.get_mut().set(
            &DEFAULT_UP,
            &DEFAULT_DIRECTION,
            &DEFAULT_COLOR,
            DEFAULT_INTENSITY,
            "",
        );
        Ok(InfiniteAreaLight {
            up: DEFAULT_UP,
            dir: DEFAULT_DIRECTION,
            color: DEFAULT_COLOR,
            intensity: DEFAULT_INTENSITY,
            map: String::new(),
            state: CommitState::Uncommitted,
            equivalent,
        })
    }
    pub fn create(device: &Device) -> Result<Box<dyn Light>, LightError> {
        Ok(Box::new(InfiniteAreaLight::new(device)?))
    }
    pub fn up(&self) -> Vector3f {
        self.up
    }
    pub fn dir(&self) -> Vector3f {
        self.dir
    }
    pub fn map(&self) -> &str {
        &self.map
    }
    pub fn equivalent(&self) -> &HdriLightEquivalent {
        self.equivalent.get()
    }
}

impl Light for InfiniteAreaLight {
    fn type_name(&self) -> &'static str {
        "infinite"
    }
    fn commit(&mut self, params: &ParamSet) -> Result<(), LightError> {
        let up: Vector3f = check_direction("up", params.get_vec3("up", DEFAULT_UP)?)?;
        let dir: Vector3f = check_direction("dir", params.get_vec3("dir", DEFAULT_DIRECTION)?)?;
        let x: Vector3f = vec3_cross_vec3(&vec3_normalize(&up), &vec3_normalize(&dir));
        if !vec3_normalize(&x).is_finite() {
            return Err(LightError::invalid_parameter(
                "up",
                "must not be parallel to \"dir\"",
            ));
        }
        let color: Spectrum = check_color("color", params.get_spectrum("color", DEFAULT_COLOR)?)?;
        let intensity: Float =
            check_non_negative("intensity", params.get_float("intensity", DEFAULT_INTENSITY)?)?;
        check_emission(&color, intensity)?;
        let map: String = params.get_string("map", "")?;
        self.up = up;
        self.dir = dir;
        self.color = color;
        self.intensity = intensity;
        self.map = map;
        self.equivalent.get_mut().set(
            &self.up,
            &self.dir,
            &self.color,
            self.intensity,
            &self.map,
        );
        self.state = self.state.advance();
        debug!(
            "committed infinite light {}: map {:?}",
            self.equivalent.id(),
            self.map
        );
        Ok(())
    }
    fn device_handle(&self) -> &dyn DeviceLight {
        self.equivalent.get()
    }
    fn device_id(&self) -> DeviceId {
        self.equivalent.id()
    }
    fn commit_state(&self) -> CommitState {
        self.state
    }
    fn get_flags(&self) -> u8 {
        LightFlags::Infinite as u8
    }
}
