use std::ops::*;
use std::fmt;
use super::super::types::Float;

pub type Vector3f = Vector3<Float>;

/// Representation of a 3D Vector.
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd)]
#[repr(C)]
pub struct Vector3<T> {
    pub x: T,
    pub y: T,
    pub z: T
}

impl<T> Vector3<T> {
    #[inline]
    pub fn new(x: T, y: T, z: T) -> Vector3<T> {
        Vector3::<T>{x, y, z}
    }

    #[inline]
    pub fn zero() -> Vector3<T>
    where
    T: num::Zero
    {
        Vector3::<T>{x: T::zero(), y: T::zero(), z: T::zero()}
    }

    /// Calculate the squared length of the Vector3.
    #[inline]
    pub fn length_squared(&self) -> T
    where
    T: Copy + Add<T, Output = T> + Mul<T, Output = T>
    {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Calculate the length of the Vector3.
    #[inline]
    pub fn length(&self) -> T
    where
    T: num::Float
    {
        self.length_squared().sqrt()
    }
}

componentwise_op!(Vector3, {x, y, z}, Add, add, +);
componentwise_op!(Vector3, {x, y, z}, Sub, sub, -);

impl<T> Neg for Vector3<T>
where
T: Neg<Output = T>
{
    type Output = Self;

    fn neg(self) -> Vector3<T> {
        Vector3::<T>{
            x: -self.x,
            y: -self.y,
            z: -self.z
        }
    }
}

impl<T> Mul<T> for Vector3<T>
where
T: Copy + Mul<T, Output = T>
{
    type Output = Self;
    #[inline]
    fn mul(self, rhs: T) -> Self {
        Vector3::<T>{
            x: self.x * rhs,
            y: self.y * rhs,
            z: self.z * rhs
        }
    }
}

impl Div<Float> for Vector3<Float>
{
    type Output = Self;
    #[inline]
    fn div(self, rhs: Float) -> Self {
        let inv = 1.0 / rhs;
        Vector3::<Float>{
            x: self.x * inv,
            y: self.y * inv,
            z: self.z * inv
        }
    }
}

reverse_mul!(Vector3, {x, y, z}, f32);
reverse_mul!(Vector3, {x, y, z}, f64);

impl<T> fmt::Display for Vector3<T>
where
T: fmt::Display
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ {}, {}, {} ]", self.x, self.y, self.z)
    }
}
