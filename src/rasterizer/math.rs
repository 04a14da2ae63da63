//! Vector and matrix math for the fixed-function pipeline
//!
//! Homogeneous 4-component vectors and row-major 4x4 matrices. Matrices
//! compose by left-multiplication: `a * b` applies `b` first, then `a`.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// Homogeneous vector, used as a point (w = 1) or a direction (w = 0).
///
/// Length and dot product run over all four components, so directions must
/// carry w = 0 to behave like 3D vectors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vector4 {
    pub const ZERO: Vector4 = Vector4 { x: 0.0, y: 0.0, z: 0.0, w: 0.0 };

    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub fn point(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, w: 1.0 }
    }

    pub fn direction(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, w: 0.0 }
    }

    pub fn dot(self, other: Vector4) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// 3D cross product of the xyz parts; w of the result is always 0.
    pub fn cross(self, other: Vector4) -> Vector4 {
        Vector4 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
            w: 0.0,
        }
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Divide all four components by the length. Zero vectors are left as is.
    pub fn normalize(&mut self) {
        let l = self.len();
        if l == 0.0 {
            return;
        }
        *self = *self / l;
    }

    pub fn normalized(mut self) -> Vector4 {
        self.normalize();
        self
    }

    /// Linear interpolation, not clamped: `t` outside [0, 1] extrapolates.
    /// Exact at both ends.
    pub fn lerp(self, other: Vector4, t: f32) -> Vector4 {
        self * (1.0 - t) + other * t
    }

    pub fn scale(self, s: f32) -> Vector4 {
        Vector4 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
            w: self.w * s,
        }
    }
}

impl Add for Vector4 {
    type Output = Vector4;
    fn add(self, other: Vector4) -> Vector4 {
        Vector4 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
            w: self.w + other.w,
        }
    }
}

impl AddAssign for Vector4 {
    fn add_assign(&mut self, other: Vector4) {
        *self = *self + other;
    }
}

impl Sub for Vector4 {
    type Output = Vector4;
    fn sub(self, other: Vector4) -> Vector4 {
        Vector4 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
            w: self.w - other.w,
        }
    }
}

impl Neg for Vector4 {
    type Output = Vector4;
    fn neg(self) -> Vector4 {
        self.scale(-1.0)
    }
}

impl Mul<f32> for Vector4 {
    type Output = Vector4;
    fn mul(self, s: f32) -> Vector4 {
        self.scale(s)
    }
}

/// Component-wise product
impl Mul<Vector4> for Vector4 {
    type Output = Vector4;
    fn mul(self, other: Vector4) -> Vector4 {
        Vector4 {
            x: self.x * other.x,
            y: self.y * other.y,
            z: self.z * other.z,
            w: self.w * other.w,
        }
    }
}

impl Div<f32> for Vector4 {
    type Output = Vector4;
    fn div(self, s: f32) -> Vector4 {
        Vector4 {
            x: self.x / s,
            y: self.y / s,
            z: self.z / s,
            w: self.w / s,
        }
    }
}

/// Row-major 4x4 matrix. `m[row][col]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix4 {
    pub m: [[f32; 4]; 4],
}

impl Matrix4 {
    pub const IDENTITY: Matrix4 = Matrix4 {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn new(m: [[f32; 4]; 4]) -> Self {
        Self { m }
    }

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        Self::new([
            [1.0, 0.0, 0.0, x],
            [0.0, 1.0, 0.0, y],
            [0.0, 0.0, 1.0, z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn scale(x: f32, y: f32, z: f32) -> Self {
        Self::new([
            [x, 0.0, 0.0, 0.0],
            [0.0, y, 0.0, 0.0],
            [0.0, 0.0, z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Combined rotation `Rz * Ry * Rx` (radians). Every angle is negated
    /// before use: the matrix turns the world toward the viewer.
    pub fn rotation(rx: f32, ry: f32, rz: f32) -> Self {
        let (sx, cx) = (-rx).sin_cos();
        let (sy, cy) = (-ry).sin_cos();
        let (sz, cz) = (-rz).sin_cos();

        let rot_x = Self::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, cx, -sx, 0.0],
            [0.0, sx, cx, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let rot_y = Self::new([
            [cy, 0.0, sy, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-sy, 0.0, cy, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let rot_z = Self::new([
            [cz, -sz, 0.0, 0.0],
            [sz, cz, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);

        rot_z * rot_y * rot_x
    }

    /// Matrix times column vector
    pub fn transform(&self, v: Vector4) -> Vector4 {
        let m = &self.m;
        Vector4 {
            x: m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z + m[0][3] * v.w,
            y: m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z + m[1][3] * v.w,
            z: m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z + m[2][3] * v.w,
            w: m[3][0] * v.x + m[3][1] * v.y + m[3][2] * v.z + m[3][3] * v.w,
        }
    }

    fn zip_with(self, other: Matrix4, f: impl Fn(f32, f32) -> f32) -> Matrix4 {
        let mut out = [[0.0; 4]; 4];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = f(self.m[r][c], other.m[r][c]);
            }
        }
        Matrix4::new(out)
    }
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Matrix4 {
    type Output = Matrix4;
    fn mul(self, rhs: Matrix4) -> Matrix4 {
        let mut out = [[0.0; 4]; 4];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.m[r][k] * rhs.m[k][c]).sum();
            }
        }
        Matrix4::new(out)
    }
}

impl Mul<f32> for Matrix4 {
    type Output = Matrix4;
    fn mul(self, s: f32) -> Matrix4 {
        self.zip_with(Matrix4::IDENTITY, |a, _| a * s)
    }
}

impl Add for Matrix4 {
    type Output = Matrix4;
    fn add(self, rhs: Matrix4) -> Matrix4 {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl Sub for Matrix4 {
    type Output = Matrix4;
    fn sub(self, rhs: Matrix4) -> Matrix4 {
        self.zip_with(rhs, |a, b| a - b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < EPS
    }

    fn approx_mat(a: &Matrix4, b: &Matrix4) -> bool {
        (0..4).all(|r| (0..4).all(|c| approx(a.m[r][c], b.m[r][c])))
    }

    fn sample_matrix(seed: f32) -> Matrix4 {
        Matrix4::rotation(0.3 * seed, -0.7, 1.1 * seed)
            * Matrix4::translation(seed, 2.0, -3.0 * seed)
            * Matrix4::scale(1.5, seed, 0.5)
    }

    #[test]
    fn test_vector_dot() {
        let a = Vector4::new(1.0, 2.0, 3.0, 4.0);
        let b = Vector4::new(5.0, 6.0, 7.0, 8.0);
        assert!(approx(a.dot(b), 70.0));
    }

    #[test]
    fn test_normalize_unit_length_and_direction() {
        let v = Vector4::direction(3.0, -4.0, 12.0);
        let n = v.normalized();
        assert!(approx(n.len(), 1.0));
        assert!(approx(n.x, 3.0 / 13.0));
        assert!(approx(n.y, -4.0 / 13.0));
        assert!(approx(n.z, 12.0 / 13.0));
    }

    #[test]
    fn test_normalize_includes_w() {
        let n = Vector4::new(0.0, 0.0, 1.0, 1.0).normalized();
        assert!(approx(n.z, n.w));
        assert!(approx(n.len(), 1.0));
    }

    #[test]
    fn test_normalize_zero_is_guarded() {
        let mut v = Vector4::ZERO;
        v.normalize();
        assert_eq!(v, Vector4::ZERO);
    }

    #[test]
    fn test_cross_orthogonal_and_anticommutative() {
        let a = Vector4::new(1.0, 2.0, 3.0, 7.0);
        let b = Vector4::new(-2.0, 0.5, 4.0, 9.0);
        let c = a.cross(b);
        assert_eq!(c.w, 0.0);
        let a3 = Vector4::direction(a.x, a.y, a.z);
        let b3 = Vector4::direction(b.x, b.y, b.z);
        assert!(approx(c.dot(a3), 0.0));
        assert!(approx(c.dot(b3), 0.0));
        assert_eq!(c, -b.cross(a));
    }

    #[test]
    fn test_lerp_endpoints_and_extrapolation() {
        let a = Vector4::point(0.1, 0.2, 0.3);
        let b = Vector4::point(0.7, -1.9, 5.3);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        let beyond = Vector4::point(0.0, 0.0, 0.0).lerp(Vector4::point(1.0, 0.0, 0.0), 2.0);
        assert!(approx(beyond.x, 2.0));
    }

    #[test]
    fn test_identity_multiplication() {
        let m = sample_matrix(1.3);
        assert_eq!(Matrix4::identity() * m, m);
        assert_eq!(m * Matrix4::identity(), m);
    }

    #[test]
    fn test_matrix_associativity() {
        let a = sample_matrix(0.4);
        let b = sample_matrix(1.7);
        let c = sample_matrix(-2.2);
        assert!(approx_mat(&((a * b) * c), &(a * (b * c))));
    }

    #[test]
    fn test_translation_round_trip_exact() {
        let p = Vector4::point(3.25, -7.5, 11.0);
        let there = Matrix4::translation(10.0, -4.0, 25.0).transform(p);
        let back = Matrix4::translation(-10.0, 4.0, -25.0).transform(there);
        assert_eq!(back, p);
    }

    #[test]
    fn test_rotation_negates_angles() {
        // Rotating by +90 degrees about Z moves +X onto -Y because the
        // angle is applied negated.
        let r = Matrix4::rotation(0.0, 0.0, std::f32::consts::FRAC_PI_2);
        let v = r.transform(Vector4::direction(1.0, 0.0, 0.0));
        assert!(approx(v.x, 0.0));
        assert!(approx(v.y, -1.0));
    }

    #[test]
    fn test_add_sub_scale() {
        let a = sample_matrix(0.9);
        let b = sample_matrix(2.0);
        assert!(approx_mat(&((a + b) - b), &a));
        assert!(approx_mat(&(a * 2.0), &(a + a)));
    }
}
