use std::ops::*;
use std::fmt;
use super::super::types::Float;
use super::Vector2;

pub type Point2f = Point2<Float>;

/// A 2D Point.
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd)]
#[repr(C)]
pub struct Point2<T> {
    pub x: T,
    pub y: T
}

impl<T> Point2<T> {
    pub fn new(x: T, y: T) -> Point2<T> {
        Point2::<T>{x, y}
    }

    /// Create a new Point2 with both components 0.
    pub fn zero() -> Point2<T>
    where
    T: num::Zero
    {
        Point2::<T>{
            x: T::zero(),
            y: T::zero()
        }
    }

    /// Calculate the squared distance between two Point2.
    #[inline]
    pub fn distance_squared(&self, o: &Point2<T>) -> T
    where
    T: Copy + Sub<T, Output = T> + Mul<T, Output = T> + Add<Output = T>
    {
        (*self - *o).length_squared()
    }

    /// Calculate the distance between two Point2.
    #[inline]
    pub fn distance(&self, o: &Point2<T>) -> T
    where
    T: num::Float
    {
        (*self - *o).length()
    }
}

impl<T> Add<Vector2<T>> for Point2<T>
where
T: Add<T, Output = T>
{
    type Output = Point2<T>;
    #[inline]
    fn add(self, rhs: Vector2<T>) -> Point2<T> {
        Point2::<T>{
            x: self.x + rhs.x,
            y: self.y + rhs.y
        }
    }
}

impl<T> Sub<Vector2<T>> for Point2<T>
where
T: Sub<T, Output = T>
{
    type Output = Point2<T>;
    #[inline]
    fn sub(self, rhs: Vector2<T>) -> Point2<T> {
        Point2::<T>{
            x: self.x - rhs.x,
            y: self.y - rhs.y
        }
    }
}

impl<T> Sub<Point2<T>> for Point2<T>
where
T: Sub<T, Output = T>
{
    type Output = Vector2<T>;
    #[inline]
    fn sub(self, rhs: Point2<T>) -> Vector2<T> {
        Vector2::<T>{
            x: self.x - rhs.x,
            y: self.y - rhs.y
        }
    }
}

impl<T> Mul<T> for Point2<T>
where
T: Copy + Mul<T, Output = T>
{
    type Output = Self;
    #[inline]
    fn mul(self, rhs: T) -> Self {
        Point2::<T>{
            x: self.x * rhs,
            y: self.y * rhs
        }
    }
}

reverse_mul!(Point2, {x, y}, f32);
reverse_mul!(Point2, {x, y}, f64);

impl<T> fmt::Display for Point2<T>
where
T: fmt::Display
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ {}, {} ]", self.x, self.y)
    }
}
