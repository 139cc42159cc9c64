use std::ops::*;
use std::fmt;
use super::super::types::Float;
use super::Vector3;

pub type Point3f = Point3<Float>;

/// A 3D Point.
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd)]
#[repr(C)]
pub struct Point3<T> {
    pub x: T,
    pub y: T,
    pub z: T
}

impl<T> Point3<T> {
    #[inline]
    pub fn new(x: T, y: T, z: T) -> Point3<T> {
        Point3::<T>{x, y, z}
    }

    /// Create a new Point3 at the origin.
    #[inline]
    pub fn zero() -> Point3<T>
    where
    T: num::Zero
    {
        Point3::<T>{x: T::zero(), y: T::zero(), z: T::zero()}
    }

    /// Calculate the squared distance between two Point3.
    #[inline]
    pub fn distance_squared(&self, o: &Point3<T>) -> T
    where
    T: Copy + Sub<T, Output = T> + Mul<T, Output = T> + Add<Output = T>
    {
        (*self - *o).length_squared()
    }

    /// Calculate the distance between two Point3.
    #[inline]
    pub fn distance(&self, o: &Point3<T>) -> T
    where
    T: num::Float
    {
        (*self - *o).length()
    }
}

impl<T> Add<Vector3<T>> for Point3<T>
where
T: Add<T, Output = T>
{
    type Output = Point3<T>;
    #[inline]
    fn add(self, rhs: Vector3<T>) -> Point3<T> {
        Point3::<T>{
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z
        }
    }
}

impl<T> Sub<Point3<T>> for Point3<T>
where
T: Sub<T, Output = T>
{
    type Output = Vector3<T>;
    #[inline]
    fn sub(self, rhs: Point3<T>) -> Vector3<T> {
        Vector3::<T>{
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z
        }
    }
}

impl<T> From<Point3<T>> for Vector3<T> {
    fn from(p: Point3<T>) -> Vector3<T> {
        Vector3::<T>{x: p.x, y: p.y, z: p.z}
    }
}

impl<T> fmt::Display for Point3<T>
where
T: fmt::Display
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ {}, {}, {} ]", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::Vector3f;

    #[test]
    fn point3_should_subtract_to_vector() {
        let a = Point3f::new(1.0, 2.0, 3.0);
        let b = Point3f::new(0.0, 2.0, -1.0);
        assert_eq!(a - b, Vector3f::new(1.0, 0.0, 4.0));
        assert_eq!(b + (a - b), a);
    }

    #[test]
    fn point3_should_measure_distance() {
        let a = Point3f::new(0.0, 3.0, 0.0);
        let b = Point3f::new(4.0, 0.0, 0.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-6);
        assert!((a.distance_squared(&b) - 25.0).abs() < 1e-4);
    }
}
