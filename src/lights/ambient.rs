// others
use log::debug;
// lights
use crate::core::light::{check_color, check_emission, check_non_negative};
use crate::core::light::{CommitState, Light, LightError, LightFlags};
use crate::core::paramset::ParamSet;
use crate::core::pbrt::{Float, Spectrum};
use crate::device::lights::AmbientLightEquivalent;
use crate::device::{Device, DeviceHandle, DeviceId, DeviceLight};

pub const DEFAULT_COLOR: Spectrum = Spectrum { c: [1.0, 1.0, 1.0] };
pub const DEFAULT_INTENSITY: Float = 1.0;

/// Light arriving from every direction with the same radiance.
pub struct AmbientLight {
    color: Spectrum,
    intensity: Float,
    state: CommitState,
    equivalent: DeviceHandle<AmbientLightEquivalent>,
}

impl AmbientLight {
    pub fn new(device: &Device) -> Result<Self, LightError> {
        let mut equivalent = device.create("ambient", AmbientLightEquivalent::default())?;
        equivalent.get_mut().set(&DEFAULT_COLOR, DEFAULT_INTENSITY);
        Ok(AmbientLight {
            color: DEFAULT_COLOR,
            intensity: DEFAULT_INTENSITY,
            state: CommitState::Uncommitted,
            equivalent,
        })
    }
    pub fn create(device: &Device) -> Result<Box<dyn Light>, LightError> {
        Ok(Box::new(AmbientLight::new(device)?))
    }
    pub fn color(&self) -> Spectrum {
        self.color
    }
    pub fn intensity(&self) -> Float {
        self.intensity
    }
    pub fn equivalent(&self) -> &AmbientLightEquivalent {
        self.equivalent.get()
    }
}

impl Light for AmbientLight {
    fn type_name(&self) -> &'static str {
        "ambient"
    }
    fn commit(&mut self, params: &ParamSet) -> Result<(), LightError> {
        let color: Spectrum = check_color("color", params.get_spectrum("color", DEFAULT_COLOR)?)?;
        let intensity: Float =
            check_non_negative("intensity", params.get_float("intensity", DEFAULT_INTENSITY)?)?;
        check_emission(&color, intensity)?;
        self.color = color;
        self.intensity = intensity;
        self.equivalent.get_mut().set(&self.color, self.intensity);
        self.state = self.state.advance();
        debug!(
            "committed ambient light {}: color {:?}, intensity {}",
            self.equivalent.id(),
            self.color.c,
            self.intensity
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
