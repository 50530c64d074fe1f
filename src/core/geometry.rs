//! Almost all nontrivial graphics programs are built on a foundation
//! of geometric classes. Lights only need points, vectors and normals
//! in 3D.

// lights
use crate::core::pbrt::Float;

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Vector3f {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

impl Vector3f {
    pub fn new(x: Float, y: Float, z: Float) -> Self {
        Vector3f { x, y, z }
    }
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
    /// Accumulated in f64; only overflows if the result does not fit
    /// into a Float.
    pub fn length(&self) -> Float {
        let x: f64 = self.x as f64;
        let y: f64 = self.y as f64;
        let z: f64 = self.z as f64;
        (x * x + y * y + z * z).sqrt() as Float
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point3f {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

impl Point3f {
    pub fn new(x: Float, y: Float, z: Float) -> Self {
        Point3f { x, y, z }
    }
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Normal3f {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

/// Given two vectors in 3D, the cross product is a vector that is
/// perpendicular to both of them.
pub fn vec3_cross_vec3(v1: &Vector3f, v2: &Vector3f) -> Vector3f {
    let v1x: f64 = v1.x as f64;
    let v1y: f64 = v1.y as f64;
    let v1z: f64 = v1.z as f64;
    let v2x: f64 = v2.x as f64;
    let v2y: f64 = v2.y as f64;
    let v2z: f64 = v2.z as f64;
    Vector3f {
        x: ((v1y * v2z) - (v1z * v2y)) as Float,
        y: ((v1z * v2x) - (v1x * v2z)) as Float,
        z: ((v1x * v2y) - (v1y * v2x)) as Float,
    }
}

/// Compute a new vector pointing in the same direction but with unit
/// length. Any finite, non-zero vector normalizes; the zero vector
/// gives NaNs.
pub fn vec3_normalize(v: &Vector3f) -> Vector3f {
    let x: f64 = v.x as f64;
    let y: f64 = v.y as f64;
    let z: f64 = v.z as f64;
    let len: f64 = (x * x + y * y + z * z).sqrt();
    Vector3f {
        x: (x / len) as Float,
        y: (y / len) as Float,
        z: (z / len) as Float,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cross_product_of_axes() {
        let x = Vector3f::new(1.0, 0.0, 0.0);
        let y = Vector3f::new(0.0, 1.0, 0.0);
        assert_eq!(vec3_cross_vec3(&x, &y), Vector3f::new(0.0, 0.0, 1.0));
        assert_eq!(vec3_cross_vec3(&x, &x), Vector3f::default());
    }

    #[test]
    fn normalize_gives_unit_length() {
        let v = vec3_normalize(&Vector3f::new(3.0, 0.0, 4.0));
        assert_relative_eq!(v.length(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(v.x, 0.6, epsilon = 1e-6);
    }

    #[test]
    fn huge_and_tiny_vectors_normalize() {
        let v = vec3_normalize(&Vector3f::new(1e20, 0.0, 0.0));
        assert_relative_eq!(v.x, 1.0, epsilon = 1e-6);
        assert_eq!(v.y, 0.0);
        let v = vec3_normalize(&Vector3f::new(0.0, 0.0, -1e-40));
        assert_relative_eq!(v.z, -1.0, epsilon = 1e-6);
        assert_relative_eq!(
            Vector3f::new(1e20, 0.0, 0.0).length(),
            1e20,
            max_relative = 1e-6
        );
        assert!(!vec3_normalize(&Vector3f::default()).is_finite());
    }

    #[test]
    fn overflowing_length_is_infinite() {
        let v = Vector3f::new(3e38, 3e38, 0.0);
        assert!(v.is_finite());
        assert!(!v.length().is_finite());
    }
}
