use super::geometry::{Vector3f, Point3f};
use super::matrix::Matrix4x4;
use super::types::{Float, radians};
use std::ops::Mul;

/// An affine transform stored with its inverse.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub m: Matrix4x4,
    pub m_inv: Matrix4x4,
}

impl Transform {
    /// Create a Transform from a matrix, returning `None` if the matrix can not be inverted.
    pub fn from_matrix(m: Matrix4x4) -> Option<Transform> {
        m.inverse().map(|m_inv| Transform { m, m_inv })
    }

    /// Return the inverse of this Transform.
    pub fn inverse(&self) -> Transform {
        Transform{
            m: self.m_inv,
            m_inv: self.m
        }
    }

    /// Create a Transform representing a translation.
    pub fn translate(delta: &Vector3f) -> Transform {
        Transform{
            m: Matrix4x4::new(1.0, 0.0, 0.0, delta.x,
                0.0, 1.0, 0.0, delta.y,
                0.0, 0.0, 1.0, delta.z,
                0.0, 0.0, 0.0, 1.0
                ),
            m_inv: Matrix4x4::new(1.0, 0.0, 0.0, -delta.x,
                0.0, 1.0, 0.0, -delta.y,
                0.0, 0.0, 1.0, -delta.z,
                0.0, 0.0, 0.0, 1.0
                )
        }
    }

    /// Create a Transform of a rotation around the Y axis in degrees.
    pub fn rotate_y(theta: Float) -> Transform {
        let theta = radians(theta);
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();
        let m = Matrix4x4::new(
            cos_theta, 0.0, sin_theta, 0.0,
            0.0, 1.0, 0.0, 0.0,
            -sin_theta, 0.0, cos_theta, 0.0,
            0.0, 0.0, 0.0, 1.0
        );
        Transform{
            m,
            m_inv: m.transpose()
        }
    }

    /// Create a Transform of a rotation around the Z axis in degrees.
    pub fn rotate_z(theta: Float) -> Transform {
        let theta = radians(theta);
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();
        let m = Matrix4x4::new(
            cos_theta, -sin_theta, 0.0, 0.0,
            sin_theta, cos_theta, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0
        );
        Transform{
            m,
            m_inv: m.transpose()
        }
    }

    /// The translation column, i.e. where this Transform places the origin.
    pub fn origin(&self) -> Point3f {
        self.transform_point(&Point3f::zero())
    }

    /// Transform a given Point3f.
    pub fn transform_point(&self, p: &Point3f) -> Point3f {
        let x = self.m.m[0][0] * p.x + self.m.m[0][1] * p.y + self.m.m[0][2] * p.z + self.m.m[0][3];
        let y = self.m.m[1][0] * p.x + self.m.m[1][1] * p.y + self.m.m[1][2] * p.z + self.m.m[1][3];
        let z = self.m.m[2][0] * p.x + self.m.m[2][1] * p.y + self.m.m[2][2] * p.z + self.m.m[2][3];
        let w = self.m.m[3][0] * p.x + self.m.m[3][1] * p.y + self.m.m[3][2] * p.z + self.m.m[3][3];
        if w == 1.0 {
            Point3f::new(x, y, z)
        }
        else {
            Point3f::new(x / w, y / w, z / w)
        }
    }

    /// Transform a given Vector3f.
    pub fn transform_vector(&self, v: &Vector3f) -> Vector3f {
        Vector3f{
            x: self.m.m[0][0] * v.x + self.m.m[0][1] * v.y + self.m.m[0][2] * v.z,
            y: self.m.m[1][0] * v.x + self.m.m[1][1] * v.y + self.m.m[1][2] * v.z,
            z: self.m.m[2][0] * v.x + self.m.m[2][1] * v.y + self.m.m[2][2] * v.z
        }
    }
}

impl Default for Transform {
    fn default() -> Transform {
        Transform {
            m: Matrix4x4::default(),
            m_inv: Matrix4x4::default()
        }
    }
}

impl Mul<Transform> for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        Transform {
            m: self.m.mul(&rhs.m),
            m_inv: rhs.m_inv.mul(&self.m_inv)
        }
    }
}
