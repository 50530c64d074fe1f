// others
use log::debug;
// lights
use crate::core::geometry::{vec3_cross_vec3, vec3_normalize, Point3f, Vector3f};
use crate::core::light::{
    check_color, check_direction, check_emission, check_non_negative, check_point,
};
use crate::core::light::{CommitState, Light, LightError, LightFlags};
use crate::core::paramset::ParamSet;
use crate::core::pbrt::{Float, Spectrum};
use crate::device::lights::QuadLightEquivalent;
use crate::device::{Device, DeviceHandle, DeviceId, DeviceLight};
use crate::lights::ambient::{DEFAULT_COLOR, DEFAULT_INTENSITY};

pub const DEFAULT_EDGE1: Vector3f = Vector3f {
    x: 1.0,
    y: 0.0,
    z: 0.0,
};
pub const DEFAULT_EDGE2: Vector3f = Vector3f {
    x: 0.0,
    y: 1.0,
    z: 0.0,
};

/// The edges have to span a parallelogram with a finite, non-zero
/// area and a well defined normal.
fn check_span(edge1: &Vector3f, edge2: &Vector3f) -> Result<(), LightError> {
    let n: Vector3f = vec3_cross_vec3(edge1, edge2);
    if n.is_finite() && n.length().is_finite() && vec3_normalize(&n).is_finite() {
        Ok(())
    } else {
        Err(LightError::invalid_parameter(
            "edge2",
            "must not be parallel to \"edge1\" and has to span a finite area",
        ))
    }
}

/// Area light with a uniform spatial and directional radiance
/// distribution, emitted from the parallelogram spanned by `edge1`
/// and `edge2` at `position`. It only emits on the side the normal
/// `edge1 x edge2` points to, unless `twoSided` is set.
pub struct DiffuseAreaLight {
    position: Point3f,
    edge1: Vector3f,
    edge2: Vector3f,
    color: Spectrum,
    intensity: Float,
    two_sided: bool,
    n_samples: i32,
    state: CommitState,
    equivalent: DeviceHandle<QuadLightEquivalent>,
}

impl DiffuseAreaLight {
    pub fn new(device: &Device) -> Result<Self, LightError> {
        let position: Point3f = Point3f::default();
        let mut equivalent = device.create("quad", QuadLightEquivalent::default())?;
        equivalent.get_mut().set(
            &position,
            &DEFAULT_EDGE1,
            &DEFAULT_EDGE2,
            &DEFAULT_COLOR,
            DEFAULT_INTENSITY,
            false,
            1_i32,
        );
        Ok(DiffuseAreaLight {
            position,
            edge1: DEFAULT_EDGE1,
            edge2: DEFAULT_EDGE2,
            color: DEFAULT_COLOR,
            intensity: DEFAULT_INTENSITY,
            two_sided: false,
            n_samples: 1_i32,
            state: CommitState::Uncommitted,
            equivalent,
        })
    }
    pub fn create(device: &Device) -> Result<Box<dyn Light>, LightError> {
        Ok(Box::new(DiffuseAreaLight::new(device)?))
    }
    pub fn two_sided(&self) -> bool {
        self.two_sided
    }
    pub fn equivalent(&self) -> &QuadLightEquivalent {
        self.equivalent.get()
    }
}

impl Light for DiffuseAreaLight {
    fn type_name(&self) -> &'static str {
        "quad"
    }
    fn commit(&mut self, params: &ParamSet) -> Result<(), LightError> {
        let position: Point3f =
            check_point("position", params.get_point3("position", Point3f::default())?)?;
        let edge1: Vector3f = check_direction("edge1", params.get_vec3("edge1", DEFAULT_EDGE1)?)?;
        let edge2: Vector3f = check_direction("edge2", params.get_vec3("edge2", DEFAULT_EDGE2)?)?;
        check_span(&edge1, &edge2)?;
        let color: Spectrum = check_color("color", params.get_spectrum("color", DEFAULT_COLOR)?)?;
        let intensity: Float =
            check_non_negative("intensity", params.get_float("intensity", DEFAULT_INTENSITY)?)?;
        check_emission(&color, intensity)?;
        let two_sided: bool = params.get_bool("twoSided", false)?;
        let n_samples: i32 = params.get_int("samples", 1_i32)?;
        if n_samples < 1_i32 {
            return Err(LightError::invalid_parameter(
                "samples",
                format!("expected at least 1, found {}", n_samples),
            ));
        }
        self.position = position;
        self.edge1 = edge1;
        self.edge2 = edge2;
        self.color = color;
        self.intensity = intensity;
        self.two_sided = two_sided;
        self.n_samples = n_samples;
        self.equivalent.get_mut().set(
            &self.position,
            &self.edge1,
            &self.edge2,
            &self.color,
            self.intensity,
            self.two_sided,
            self.n_samples,
        );
        self.state = self.state.advance();
        debug!(
            "committed quad light {}: area {}, two sided {}",
            self.equivalent.id(),
            self.equivalent.get().area,
            self.two_sided
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
        LightFlags::Area as u8
    }
    fn get_n_samples(&self) -> i32 {
        self.n_samples
    }
}
