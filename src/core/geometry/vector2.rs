use std::ops::*;
use std::fmt;
use super::super::types::Float;

pub type Vector2f = Vector2<Float>;

/// Representation of a 2D Vector.
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd)]
#[repr(C)]
pub struct Vector2<T> {
    pub x: T,
    pub y: T
}

impl<T> Vector2<T> {
    #[inline]
    pub fn new(x: T, y: T) -> Vector2<T> {
        Vector2::<T>{x, y}
    }

    /// Calculate the squared length of the Vector2.
    #[inline]
    pub fn length_squared(&self) -> T
    where
    T: Copy + Add<T, Output = T> + Mul<T, Output = T>
    {
        self.x * self.x + self.y * self.y
    }

    /// Calculate the length of the Vector2.
    #[inline]
    pub fn length(&self) -> T
    where
    T: num::Float
    {
        self.length_squared().sqrt()
    }
}

componentwise_op!(Vector2, {x, y}, Add, add, +);
componentwise_op!(Vector2, {x, y}, Sub, sub, -);

impl<T> Neg for Vector2<T>
where
T: Neg<Output = T>
{
    type Output = Self;

    fn neg(self) -> Vector2<T> {
        Vector2::<T>{
            x: -self.x,
            y: -self.y
        }
    }
}

impl<T> Mul<T> for Vector2<T>
where
T: Copy + Mul<T, Output = T>
{
    type Output = Self;
    #[inline]
    fn mul(self, rhs: T) -> Self {
        Vector2::<T>{
            x: self.x * rhs,
            y: self.y * rhs
        }
    }
}

reverse_mul!(Vector2, {x, y}, f32);
reverse_mul!(Vector2, {x, y}, f64);

impl<T> fmt::Display for Vector2<T>
where
T: fmt::Display
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ {}, {} ]", self.x, self.y)
    }
}
