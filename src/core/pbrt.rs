//! Type definitions of Float and Spectrum, otherwise constants and
//! functions which can be used almost everywhere else in the code.

// std
use std::f32::consts::PI;
// lights
use crate::core::spectrum::RGBSpectrum;

pub type Spectrum = RGBSpectrum;

pub type Float = f32;

/// Clamp the given value *val* to lie between the values *low* and
/// *high*.
pub fn clamp_t<T>(val: T, low: T, high: T) -> T
where
    T: PartialOrd,
{
    if val < low {
        low
    } else if val > high {
        high
    } else {
        val
    }
}

/// Convert from angles expressed in degrees to radians.
pub fn radians(deg: Float) -> Float {
    (PI / 180.0) * deg
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn clamp_t_keeps_values_in_range() {
        assert_eq!(clamp_t(-1.0 as Float, 0.0, 1.0), 0.0);
        assert_eq!(clamp_t(0.25 as Float, 0.0, 1.0), 0.25);
        assert_eq!(clamp_t(7_i32, 0, 5), 5);
    }

    #[test]
    fn degrees_to_radians() {
        assert_relative_eq!(radians(180.0), PI);
        assert_relative_eq!(radians(90.0), PI / 2.0);
    }
}
