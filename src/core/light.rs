//! In order for objects in a scene to be visible, there must be a
//! source of illumination so that some light is reflected from them
//! to the camera sensor.
//!
//! Every light lives on two sides. The host side is the object the
//! scene talks to: it is created by type name, receives named
//! parameters and resolves them into typed fields during
//! [`Light::commit`]. The device side is an opaque
//! [`DeviceLight`](crate::device::DeviceLight) owned by the light,
//! which the rendering path reads without ever looking at named
//! parameters again.
//!
//! A commit either applies completely (typed fields and device
//! equivalent describe the new parameters) or fails with
//! [`LightError::InvalidParameter`] and leaves the light exactly as it
//! was.

// others
use thiserror::Error;
// lights
use crate::core::geometry::{vec3_normalize, Point3f, Vector3f};
use crate::core::paramset::ParamSet;
use crate::core::pbrt::{Float, Spectrum};
use crate::device::{DeviceId, DeviceLight};

#[repr(u8)]
pub enum LightFlags {
    DeltaPosition = 1,
    DeltaDirection = 2,
    Area = 4,
    Infinite = 8,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LightError {
    /// No factory is registered under the requested type name.
    #[error("unknown light type \"{0}\"")]
    UnknownVariant(String),
    /// A supplied value can't be used as the parameter's declared type.
    #[error("invalid parameter \"{name}\": {reason}")]
    InvalidParameter { name: String, reason: String },
    /// The backend could not allocate the device equivalent.
    #[error("could not create device equivalent for \"{kind}\" light: {reason}")]
    DeviceInitFailure { kind: String, reason: String },
}

impl LightError {
    pub fn invalid_parameter<S: Into<String>>(name: &str, reason: S) -> Self {
        LightError::InvalidParameter {
            name: String::from(name),
            reason: reason.into(),
        }
    }
}

/// Where a light is in its lifecycle. Dropping a light releases its
/// device equivalent, so there is no explicit destroyed state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CommitState {
    /// Constructed, holding defaults only.
    Uncommitted,
    /// At least one commit went through.
    Committed { commits: u64 },
}

impl CommitState {
    pub fn advance(self) -> CommitState {
        match self {
            CommitState::Uncommitted => CommitState::Committed { commits: 1 },
            CommitState::Committed { commits } => CommitState::Committed {
                commits: commits + 1,
            },
        }
    }
    pub fn is_committed(&self) -> bool {
        matches!(self, CommitState::Committed { .. })
    }
}

impl Default for CommitState {
    fn default() -> Self {
        CommitState::Uncommitted
    }
}

pub trait Light: Send + Sync {
    /// Canonical name of the variant.
    fn type_name(&self) -> &'static str;
    /// Read every recognized parameter (falling back to its default),
    /// store the typed values and push them into the device
    /// equivalent. Unrecognized names are ignored.
    fn commit(&mut self, params: &ParamSet) -> Result<(), LightError>;
    /// The device equivalent handed to the rendering path. Valid from
    /// construction until the light is dropped.
    fn device_handle(&self) -> &dyn DeviceLight;
    fn device_id(&self) -> DeviceId;
    fn commit_state(&self) -> CommitState;
    fn get_flags(&self) -> u8;
    fn get_n_samples(&self) -> i32 {
        1_i32
    }
}

/// Intensities, radii and angles have to be finite and must not be
/// negative.
pub fn check_non_negative(name: &str, value: Float) -> Result<Float, LightError> {
    if !value.is_finite() {
        Err(LightError::invalid_parameter(
            name,
            format!("expected a finite value, found {}", value),
        ))
    } else if value < 0.0 as Float {
        Err(LightError::invalid_parameter(
            name,
            format!("expected a non-negative value, found {}", value),
        ))
    } else {
        Ok(value)
    }
}

/// Angles in degrees, between zero and `max`.
pub fn check_angle(name: &str, value: Float, max: Float) -> Result<Float, LightError> {
    let value: Float = check_non_negative(name, value)?;
    if value > max {
        Err(LightError::invalid_parameter(
            name,
            format!("expected at most {} degrees, found {}", max, value),
        ))
    } else {
        Ok(value)
    }
}

pub fn check_color(name: &str, color: Spectrum) -> Result<Spectrum, LightError> {
    if !color.is_finite() || color.c.iter().any(|v| *v < 0.0 as Float) {
        Err(LightError::invalid_parameter(
            name,
            format!(
                "expected a finite, non-negative color, found [{} {} {}]",
                color[0], color[1], color[2]
            ),
        ))
    } else {
        Ok(color)
    }
}

pub fn check_point(name: &str, p: Point3f) -> Result<Point3f, LightError> {
    if p.is_finite() {
        Ok(p)
    } else {
        Err(LightError::invalid_parameter(
            name,
            format!("expected a finite point, found [{} {} {}]", p.x, p.y, p.z),
        ))
    }
}

/// Color and intensity are checked on their own; their product is
/// what the device stores and has to stay finite as well.
pub fn check_emission(color: &Spectrum, intensity: Float) -> Result<(), LightError> {
    if (*color * intensity).is_finite() {
        Ok(())
    } else {
        Err(LightError::invalid_parameter(
            "intensity",
            format!(
                "{} times [{} {} {}] is not finite",
                intensity, color[0], color[1], color[2]
            ),
        ))
    }
}

/// Directions and edges must be finite and normalize to a finite unit
/// vector.
pub fn check_direction(name: &str, v: Vector3f) -> Result<Vector3f, LightError> {
    if v.is_finite() && vec3_normalize(&v).is_finite() {
        Ok(v)
    } else {
        Err(LightError::invalid_parameter(
            name,
            format!("expected a non-degenerate vector, found [{} {} {}]", v.x, v.y, v.z),
        ))
    }
}
