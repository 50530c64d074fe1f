// others
use log::debug;
// lights
use crate::core::geometry::Point3f;
use crate::core::light::{check_color, check_emission, check_non_negative, check_point};
use crate::core::light::{CommitState, Light, LightError, LightFlags};
use crate::core::paramset::ParamSet;
use crate::core::pbrt::{Float, Spectrum};
use crate::device::lights::PointLightEquivalent;
use crate::device::{Device, DeviceHandle, DeviceId, DeviceLight};
use crate::lights::ambient::{DEFAULT_COLOR, DEFAULT_INTENSITY};

/// Isotropic point light source that emits the same amount of light
/// in all directions. A non-zero `radius` turns it into a sphere
/// light.
pub struct PointLight {
    position: Point3f,
    color: Spectrum,
    intensity: Float,
    radius: Float,
    state: CommitState,
    equivalent: DeviceHandle<PointLightEquivalent>,
}

impl PointLight {
    pub fn new(device: &Device) -> Result<Self, LightError> {
        let position: Point3f = Point3f::default();
        let mut equivalent = device.create("point", PointLightEquivalent::default())?;
        equivalent
            .get_mut()
            .set(&position, &DEFAULT_COLOR, DEFAULT_INTENSITY, 0.0);
        Ok(PointLight {
            position,
            color: DEFAULT_COLOR,
            intensity: DEFAULT_INTENSITY,
            radius: 0.0,
            state: CommitState::Uncommitted,
            equivalent,
        })
    }
    pub fn create(device: &Device) -> Result<Box<dyn Light>, LightError> {
        Ok(Box::new(PointLight::new(device)?))
    }
    pub fn position(&self) -> Point3f {
        self.position
    }
    pub fn color(&self) -> Spectrum {
        self.color
    }
    pub fn intensity(&self) -> Float {
        self.intensity
    }
    pub fn radius(&self) -> Float {
        self.radius
    }
    pub fn equivalent(&self) -> &PointLightEquivalent {
        self.equivalent.get()
    }
}

impl Light for PointLight {
    fn type_name(&self) -> &'static str {
        "point"
    }
    fn commit(&mut self, params: &ParamSet) -> Result<(), LightError> {
        let position: Point3f =
            check_point("position", params.get_point3("position", Point3f::default())?)?;
        let color: Spectrum = check_color("color", params.get_spectrum("color", DEFAULT_COLOR)?)?;
        let intensity: Float =
            check_non_negative("intensity", params.get_float("intensity", DEFAULT_INTENSITY)?)?;
        check_emission(&color, intensity)?;
        let radius: Float = check_non_negative("radius", params.get_float("radius", 0.0)?)?;
        self.position = position;
        self.color = color;
        self.intensity = intensity;
        self.radius = radius;
        self.equivalent
            .get_mut()
            .set(&self.position, &self.color, self.intensity, self.radius);
        self.state = self.state.advance();
        debug!(
            "committed point light {}: position {:?}, radius {}",
            self.equivalent.id(),
            self.position,
            self.radius
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

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn position_and_power() {
        let device = Device::default();
        let mut light = PointLight::new(&device).unwrap();
        let mut params = ParamSet::default();
        params.add_point3f("position", Point3f::new(1.0, 2.0, 3.0));
        params.add_rgb_spectrum("color", Spectrum::rgb(1.0, 0.5, 0.0));
        params.add_int("intensity", 4);
        params.add_float("radius", 0.25);
        light.commit(&params).unwrap();
        assert_eq!(light.position(), Point3f::new(1.0, 2.0, 3.0));
        assert_eq!(light.intensity(), 4.0);
        assert_eq!(light.radius(), 0.25);
        assert_eq!(light.equivalent().power, Spectrum::rgb(4.0, 2.0, 0.0));
        assert_eq!(light.get_flags(), LightFlags::DeltaPosition as u8);
    }

    #[test]
    fn malformed_radius_rejects_whole_commit() {
        let device = Device::default();
        let mut light = PointLight::new(&device).unwrap();
        let mut params = ParamSet::default();
        params.add_point3f("position", Point3f::new(5.0, 5.0, 5.0));
        params.add_string("radius", String::from("large"));
        assert!(light.commit(&params).is_err());
        assert_eq!(light.position(), Point3f::default());
        assert_eq!(light.equivalent().position, Point3f::default());
    }
}
