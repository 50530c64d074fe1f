//! Device equivalents of the host lights.
//!
//! Each one is written through a single `set` call carrying the
//! already validated host fields, and derives whatever the evaluation
//! kernels want precomputed (radiance, normalized frames, cosines).

// std
use std::any::Any;
// lights
use crate::core::geometry::{vec3_cross_vec3, vec3_normalize, Point3f, Vector3f};
use crate::core::pbrt::{clamp_t, radians, Float, Spectrum};
use crate::device::DeviceLight;

macro_rules! device_light {
    ($t:ty, $kind:expr) => {
        impl DeviceLight for $t {
            fn kind(&self) -> &'static str {
                $kind
            }
            fn as_any(&self) -> &dyn Any {
                self
            }
        }
    };
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct AmbientLightEquivalent {
    pub color: Spectrum,
    pub intensity: Float,
    pub radiance: Spectrum,
}

impl AmbientLightEquivalent {
    pub fn set(&mut self, color: &Spectrum, intensity: Float) {
        self.color = *color;
        self.intensity = intensity;
        self.radiance = *color * intensity;
    }
}

device_light!(AmbientLightEquivalent, "AmbientLight");

#[derive(Debug, Default, Clone, PartialEq)]
pub struct PointLightEquivalent {
    pub position: Point3f,
    pub color: Spectrum,
    pub intensity: Float,
    pub radius: Float,
    pub power: Spectrum,
}

impl PointLightEquivalent {
    pub fn set(&mut self, position: &Point3f, color: &Spectrum, intensity: Float, radius: Float) {
        self.position = *position;
        self.color = *color;
        self.intensity = intensity;
        self.radius = radius;
        self.power = *color * intensity;
    }
}

device_light!(PointLightEquivalent, "PointLight");

#[derive(Debug, Default, Clone, PartialEq)]
pub struct DirectionalLightEquivalent {
    /// Normalized, pointing away from the light.
    pub direction: Vector3f,
    pub color: Spectrum,
    pub intensity: Float,
    pub radiance: Spectrum,
    /// Cosine of half the angular diameter; 1 for a delta light.
    pub cos_angle: Float,
}

impl DirectionalLightEquivalent {
    pub fn set(
        &mut self,
        direction: &Vector3f,
        color: &Spectrum,
        intensity: Float,
        angular_diameter: Float,
    ) {
        self.direction = vec3_normalize(direction);
        self.color = *color;
        self.intensity = intensity;
        self.radiance = *color * intensity;
        self.cos_angle = radians(0.5 * clamp_t(angular_diameter, 0.0, 180.0)).cos();
    }
}

device_light!(DirectionalLightEquivalent, "DirectionalLight");

#[derive(Debug, Default, Clone, PartialEq)]
pub struct SpotLightEquivalent {
    pub position: Point3f,
    pub direction: Vector3f,
    pub color: Spectrum,
    pub intensity: Float,
    pub power: Spectrum,
    /// Outside of this cone there is no emission.
    pub cos_angle_max: Float,
    /// Inside of this cone emission is not attenuated.
    pub cos_angle_min: Float,
}

impl SpotLightEquivalent {
    pub fn set(
        &mut self,
        position: &Point3f,
        direction: &Vector3f,
        color: &Spectrum,
        intensity: Float,
        opening_angle: Float,
        penumbra_angle: Float,
    ) {
        let half_opening: Float = 0.5 * clamp_t(opening_angle, 0.0, 180.0);
        let penumbra: Float = clamp_t(penumbra_angle, 0.0, half_opening);
        self.position = *position;
        self.direction = vec3_normalize(direction);
        self.color = *color;
        self.intensity = intensity;
        self.power = *color * intensity;
        self.cos_angle_max = radians(half_opening).cos();
        self.cos_angle_min = radians(half_opening - penumbra).cos();
    }
}

device_light!(SpotLightEquivalent, "SpotLight");

#[derive(Debug, Default, Clone, PartialEq)]
pub struct HdriLightEquivalent {
    /// Light to world frame: x, y (up) and z (dir) axes.
    pub frame: [Vector3f; 3],
    pub color: Spectrum,
    pub intensity: Float,
    pub radiance_scale: Spectrum,
    /// Environment map, empty for a constant environment.
    pub map: String,
}

impl HdriLightEquivalent {
    /// `up` and `dir` must not be parallel.
    pub fn set(
        &mut self,
        up: &Vector3f,
        dir: &Vector3f,
        color: &Spectrum,
        intensity: Float,
        map: &str,
    ) {
        let z: Vector3f = vec3_normalize(dir);
        let x: Vector3f = vec3_normalize(&vec3_cross_vec3(&vec3_normalize(up), &z));
        let y: Vector3f = vec3_cross_vec3(&z, &x);
        self.frame = [x, y, z];
        self.color = *color;
        self.intensity = intensity;
        self.radiance_scale = *color * intensity;
        self.map = String::from(map);
    }
}

device_light!(HdriLightEquivalent, "HDRILight");

#[derive(Debug, Default, Clone, PartialEq)]
pub struct QuadLightEquivalent {
    pub position: Point3f,
    pub edge1: Vector3f,
    pub edge2: Vector3f,
    /// Normalized `edge1 x edge2`; emission is on this side.
    pub normal: Vector3f,
    pub area: Float,
    pub color: Spectrum,
    pub intensity: Float,
    pub radiance: Spectrum,
    pub two_sided: bool,
    pub n_samples: i32,
}

impl QuadLightEquivalent {
    /// The edges must span a non-zero area.
    #[allow(clippy::too_many_arguments)]
    pub fn set(
        &mut self,
        position: &Point3f,
        edge1: &Vector3f,
        edge2: &Vector3f,
        color: &Spectrum,
        intensity: Float,
        two_sided: bool,
        n_samples: i32,
    ) {
        let n: Vector3f = vec3_cross_vec3(edge1, edge2);
        self.position = *position;
        self.edge1 = *edge1;
        self.edge2 = *edge2;
        self.area = n.length();
        self.normal = vec3_normalize(&n);
        self.color = *color;
        self.intensity = intensity;
        self.radiance = *color * intensity;
        self.two_sided = two_sided;
        self.n_samples = n_samples;
    }
}

device_light!(QuadLightEquivalent, "QuadLight");

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ambient_radiance_is_scaled_color() {
        let mut ambient = AmbientLightEquivalent::default();
        ambient.set(&Spectrum::rgb(0.0, 1.0, 0.0), 2.0);
        assert_eq!(ambient.radiance, Spectrum::rgb(0.0, 2.0, 0.0));
    }

    #[test]
    fn spot_penumbra_is_limited_by_opening() {
        let mut spot = SpotLightEquivalent::default();
        spot.set(
            &Point3f::default(),
            &Vector3f::new(0.0, 0.0, 2.0),
            &Spectrum::new(1.0),
            1.0,
            90.0,
            60.0,
        );
        assert_relative_eq!(spot.direction.z, 1.0);
        assert_relative_eq!(spot.cos_angle_max, radians(45.0).cos());
        // penumbra clamped to half the opening angle
        assert_relative_eq!(spot.cos_angle_min, 1.0);
    }

    #[test]
    fn delta_directional_light() {
        let mut distant = DirectionalLightEquivalent::default();
        distant.set(&Vector3f::new(0.0, -3.0, 0.0), &Spectrum::new(1.0), 1.0, 0.0);
        assert_relative_eq!(distant.cos_angle, 1.0);
        assert_relative_eq!(distant.direction.y, -1.0);
    }

    #[test]
    fn hdri_frame_is_orthonormal() {
        let mut hdri = HdriLightEquivalent::default();
        hdri.set(
            &Vector3f::new(0.0, 1.0, 0.0),
            &Vector3f::new(0.0, 0.0, 1.0),
            &Spectrum::new(1.0),
            1.0,
            "sky.exr",
        );
        assert_eq!(hdri.frame[0], Vector3f::new(1.0, 0.0, 0.0));
        assert_eq!(hdri.frame[1], Vector3f::new(0.0, 1.0, 0.0));
        assert_eq!(hdri.frame[2], Vector3f::new(0.0, 0.0, 1.0));
        assert_eq!(hdri.map, "sky.exr");
    }

    #[test]
    fn quad_area_and_normal() {
        let mut quad = QuadLightEquivalent::default();
        quad.set(
            &Point3f::default(),
            &Vector3f::new(2.0, 0.0, 0.0),
            &Vector3f::new(0.0, 3.0, 0.0),
            &Spectrum::new(1.0),
            4.0,
            false,
            1,
        );
        assert_relative_eq!(quad.area, 6.0);
        assert_eq!(quad.normal, Vector3f::new(0.0, 0.0, 1.0));
        assert_eq!(quad.radiance, Spectrum::new(4.0));
    }
}
