// others
use log::debug;
// lights
use crate::core::geometry::{Point3f, Vector3f};
use crate::core::light::{
    check_angle, check_color, check_direction, check_emission, check_non_negative, check_point,
};
use crate::core::light::{CommitState, Light, LightError, LightFlags};
use crate::core::paramset::ParamSet;
use crate::core::pbrt::{Float, Spectrum};
use crate::device::lights::SpotLightEquivalent;
use crate::device::{Device, DeviceHandle, DeviceId, DeviceLight};
use crate::lights::ambient::{DEFAULT_COLOR, DEFAULT_INTENSITY};
use crate::lights::distant::DEFAULT_DIRECTION;

pub const DEFAULT_OPENING_ANGLE: Float = 180.0;
pub const DEFAULT_PENUMBRA_ANGLE: Float = 5.0;

/// Spotlights emit light in a cone of directions from their
/// position. Angles are given in degrees; the penumbra is the band
/// at the rim of the cone where emission falls off.
pub struct SpotLight {
    position: Point3f,
    direction: Vector3f,
    color: Spectrum,
    intensity: Float,
    opening_angle: Float,
    penumbra_angle: Float,
    state: CommitState,
    equivalent: DeviceHandle<SpotLightEquivalent>,
}

impl SpotLight {
    pub fn new(device: &Device) -> Result<Self, LightError> {
        let position: Point3f = Point3f::default();
        let mut equivalent = device.create("spot", SpotLightEquivalent::default())?;
        equivalent.get_mut().set(
            &position,
            &DEFAULT_DIRECTION,
            &DEFAULT_COLOR,
            DEFAULT_INTENSITY,
            DEFAULT_OPENING_ANGLE,
            DEFAULT_PENUMBRA_ANGLE,
        );
        Ok(SpotLight {
            position,
            direction: DEFAULT_DIRECTION,
            color: DEFAULT_COLOR,
            intensity: DEFAULT_INTENSITY,
            opening_angle: DEFAULT_OPENING_ANGLE,
            penumbra_angle: DEFAULT_PENUMBRA_ANGLE,
            state: CommitState::Uncommitted,
            equivalent,
        })
    }
    pub fn create(device: &Device) -> Result<Box<dyn Light>, LightError> {
        Ok(Box::new(SpotLight::new(device)?))
    }
    pub fn position(&self) -> Point3f {
        self.position
    }
    pub fn direction(&self) -> Vector3f {
        self.direction
    }
    pub fn opening_angle(&self) -> Float {
        self.opening_angle
    }
    pub fn penumbra_angle(&self) -> Float {
        self.penumbra_angle
    }
    pub fn equivalent(&self) -> &SpotLightEquivalent {
        self.equivalent.get()
    }
}

impl Light for SpotLight {
    fn type_name(&self) -> &'static str {
        "spot"
    }
    fn commit(&mut self, params: &ParamSet) -> Result<(), LightError> {
        let position: Point3f =
            check_point("position", params.get_point3("position", Point3f::default())?)?;
        let direction: Vector3f =
            check_direction("direction", params.get_vec3("direction", DEFAULT_DIRECTION)?)?;
        let color: Spectrum = check_color("color", params.get_spectrum("color", DEFAULT_COLOR)?)?;
        let intensity: Float =
            check_non_negative("intensity", params.get_float("intensity", DEFAULT_INTENSITY)?)?;
        check_emission(&color, intensity)?;
        let opening_angle: Float = check_angle(
            "openingAngle",
            params.get_float("openingAngle", DEFAULT_OPENING_ANGLE)?,
            180.0,
        )?;
        let penumbra_angle: Float = check_non_negative(
            "penumbraAngle",
            params.get_float("penumbraAngle", DEFAULT_PENUMBRA_ANGLE)?,
        )?;
        self.position = position;
        self.direction = direction;
        self.color = color;
        self.intensity = intensity;
        self.opening_angle = opening_angle;
        self.penumbra_angle = penumbra_angle;
        self.equivalent.get_mut().set(
            &self.position,
            &self.direction,
            &self.color,
            self.intensity,
            self.opening_angle,
            self.penumbra_angle,
        );
        self.state = self.state.advance();
        debug!(
            "committed spot light {}: opening {}, penumbra {}",
            self.equivalent.id(),
            self.opening_angle,
            self.penumbra_angle
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
        LightFlags::DeltaPosition as u8
    }
}
