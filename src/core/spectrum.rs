//! Light emission is described by RGB triples. A full spectral
//! representation is not needed to hand colors over to the device.

// std
use std::ops::{Index, Mul};
// lights
use crate::core::pbrt::Float;

#[derive(Debug, Default, Copy, Clone)]
pub struct RGBSpectrum {
    pub c: [Float; 3],
}

impl RGBSpectrum {
    pub fn new(v: Float) -> Self {
        RGBSpectrum { c: [v, v, v] }
    }
    pub fn rgb(r: Float, g: Float, b: Float) -> RGBSpectrum {
        RGBSpectrum { c: [r, g, b] }
    }
    pub fn from_rgb(rgb: &[Float; 3]) -> RGBSpectrum {
        RGBSpectrum { c: *rgb }
    }
    pub fn is_finite(&self) -> bool {
        self.c.iter().all(|v| v.is_finite())
    }
}

impl PartialEq for RGBSpectrum {
    fn eq(&self, rhs: &RGBSpectrum) -> bool {
        self.c == rhs.c
    }
}

impl Mul<Float> for RGBSpectrum {
    type Output = RGBSpectrum;
    fn mul(self, rhs: Float) -> RGBSpectrum {
        RGBSpectrum {
            c: [self.c[0] * rhs, self.c[1] * rhs, self.c[2] * rhs],
        }
    }
}

impl Index<usize> for RGBSpectrum {
    type Output = Float;
    fn index(&self, index: usize) -> &Float {
        match index {
            0 => &self.c[0],
            1 => &self.c[1],
            2 => &self.c[2],
            _ => panic!("Check failed: i >= 0 && i <= 2"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn scaling_by_intensity() {
        let s = RGBSpectrum::rgb(0.0, 1.0, 0.5) * 2.0;
        assert_eq!(s, RGBSpectrum::rgb(0.0, 2.0, 1.0));
        assert_eq!(s[1], 2.0);
    }

    #[test]
    fn nan_and_overflow_are_not_finite() {
        assert!(!RGBSpectrum::rgb(Float::NAN, 0.0, 0.0).is_finite());
        assert!(!RGBSpectrum::rgb(Float::INFINITY, 0.0, 0.0).is_finite());
        assert!(!(RGBSpectrum::new(1e30) * 1e30).is_finite());
    }
}
