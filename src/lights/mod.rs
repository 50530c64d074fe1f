//! In order for objects in a scene to be visible, there must be a
//! source of illumination so that some light is reflected from them
//! to the camera sensor.
//!
//! - AmbientLight
//! - DiffuseAreaLight
//! - DistantLight
//! - InfiniteAreaLight
//! - PointLight
//! - SpotLight
//!
//! Every light reads its parameters during commit. All of them
//! understand `color` (default white) and `intensity` (default 1).
//!
//! ## Ambient Lights
//!
//! Constant radiance from every direction.
//!
//! ```rust
//! use rs_lights::core::light::Light;
//! use rs_lights::core::paramset::ParamSet;
//! use rs_lights::core::pbrt::Spectrum;
//! use rs_lights::device::Device;
//! use rs_lights::lights::ambient::AmbientLight;
//!
//! let device = Device::default();
//! let mut ambient = AmbientLight::new(&device).unwrap();
//! let mut params = ParamSet::default();
//! params.add_rgb_spectrum("color", Spectrum::rgb(0.0, 1.0, 0.0));
//! params.add_float("intensity", 2.0);
//! ambient.commit(&params).unwrap();
//! assert_eq!(ambient.equivalent().radiance, Spectrum::rgb(0.0, 2.0, 0.0));
//! ```
//!
//! ## Diffuse Area Lights
//!
//! A parallelogram (`position`, `edge1`, `edge2`) emitting on one
//! side, or both with `twoSided`.
//!
//! ## Distant Lights
//!
//! Illumination from the same `direction` at every point in space.
//!
//! ## Infinite Area Lights
//!
//! An enormous sphere around the scene, optionally textured by an
//! environment `map` oriented by `up` and `dir`.
//!
//! ## Point Lights
//!
//! Isotropic emission from `position`, optionally with a `radius`.
//!
//! ## Spotlights
//!
//! A cone of light at `position` around `direction`, described by
//! `openingAngle` and `penumbraAngle` (degrees).

// others
use strum_macros::{Display, EnumIter};
// lights
use crate::core::api::LightFactory;

pub mod ambient;
pub mod diffuse;
pub mod distant;
pub mod infinite;
pub mod point;
pub mod spot;

/// The light types which come with the crate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum LightKind {
    #[strum(serialize = "ambient")]
    Ambient,
    #[strum(serialize = "point")]
    Point,
    #[strum(serialize = "distant")]
    Distant,
    #[strum(serialize = "spot")]
    Spot,
    #[strum(serialize = "infinite")]
    Infinite,
    #[strum(serialize = "quad")]
    Quad,
}

impl LightKind {
    /// Further names the kind is registered under.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            LightKind::Ambient => &["AmbientLight"],
            LightKind::Point => &["sphere", "PointLight", "SphereLight"],
            LightKind::Distant => &["directional", "DirectionalLight"],
            LightKind::Spot => &["SpotLight"],
            LightKind::Infinite => &["hdri", "HDRILight"],
            LightKind::Quad => &["diffuse", "QuadLight"],
        }
    }
    pub fn factory(&self) -> LightFactory {
        match self {
            LightKind::Ambient => ambient::AmbientLight::create,
            LightKind::Point => point::PointLight::create,
            LightKind::Distant => distant::DistantLight::create,
            LightKind::Spot => spot::SpotLight::create,
            LightKind::Infinite => infinite::InfiniteAreaLight::create,
            LightKind::Quad => diffuse::DiffuseAreaLight::create,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::device::Device;
    use strum::IntoEnumIterator;

    #[test]
    fn factories_report_their_kind() {
        let device = Device::default();
        for kind in LightKind::iter() {
            let light = (kind.factory())(&device).unwrap();
            assert_eq!(light.type_name(), kind.to_string());
        }
        assert_eq!(device.live_equivalents(), 0);
        assert_eq!(device.total_allocated(), 6);
    }
}
