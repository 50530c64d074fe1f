// others
use log::debug;
// lights
use crate::core::geometry::Vector3f;
use crate::core::light::{
    check_angle, check_color, check_direction, check_emission, check_non_negative,
};
use crate::core::light::{CommitState, Light, LightError, LightFlags};
use crate::core::paramset::ParamSet;
use crate::core::pbrt::{Float, Spectrum};
use crate::device::lights::DirectionalLightEquivalent;
use crate::device::{Device, DeviceHandle, DeviceId, DeviceLight};
use crate::lights::ambient::{DEFAULT_COLOR, DEFAULT_INTENSITY};

pub const DEFAULT_DIRECTION: Vector3f = Vector3f {
    x: 0.0,
    y: 0.0,
    z: 1.0,
};

/// A distant light, also known as directional light, describes an
/// emitter that deposits illumination from the same direction at
/// every point in space. With a non-zero `angularDiameter` it
/// models a disk in the sky, like the sun.
pub struct DistantLight {
    direction: Vector3f,
    color: Spectrum,
    intensity: Float,
    angular_diameter: Float,
    state: CommitState,
    equivalent: DeviceHandle<DirectionalLightEquivalent>,
}

impl DistantLight {
    pub fn new(device: &Device) -> Result<Self, LightError> {
        let mut equivalent = device.create("distant", DirectionalLightEquivalent::default())?;
        equivalent
            .get_mut()
            .set(&DEFAULT_DIRECTION, &DEFAULT_COLOR, DEFAULT_INTENSITY, 0.0);
        Ok(DistantLight {
            direction: DEFAULT_DIRECTION,
            color: DEFAULT_COLOR,
            intensity: DEFAULT_INTENSITY,
            angular_diameter: 0.0,
            state: CommitState::Uncommitted,
            equivalent,
        })
    }
    pub fn create(device: &Device) -> Result<Box<dyn Light>, LightError> {
        Ok(Box::new(DistantLight::new(device)?))
    }
    pub fn direction(&self) -> Vector3f {
        self.direction
    }
    pub fn color(&self) -> Spectrum {
        self.color
    }
    pub fn intensity(&self) -> Float {
        self.intensity
    }
    pub fn angular_diameter(&self) -> Float {
        self.angular_diameter
    }
    pub fn equivalent(&self) -> &DirectionalLightEquivalent {
        self.equivalent.get()
    }
}

impl Light for DistantLight {
    fn type_name(&self) -> &'static str {
        "distant"
    }
    fn commit(&mut self, params: &ParamSet) -> Result<(), LightError> {
        let direction: Vector3f =
            check_direction("direction", params.get_vec3("direction", DEFAULT_DIRECTION)?)?;
        let color: Spectrum = check_color("color", params.get_spectrum("color", DEFAULT_COLOR)?)?;
        let intensity: Float =
            check_non_negative("intensity", params.get_float("intensity", DEFAULT_INTENSITY)?)?;
        check_emission(&color, intensity)?;
        let angular_diameter: Float = check_angle(
            "angularDiameter",
            params.get_float("angularDiameter", 0.0)?,
            180.0,
        )?;
        self.direction = direction;
        self.color = color;
        self.intensity = intensity;
        self.angular_diameter = angular_diameter;
        self.equivalent.get_mut().set(
            &self.direction,
            &self.color,
            self.intensity,
            self.angular_diameter,
        );
        self.state = self.state.advance();
        debug!(
            "committed distant light {}: direction {:?}",
            self.equivalent.id(),
            self.direction
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
        LightFlags::DeltaDirection as u8
    }
}
