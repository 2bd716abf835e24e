use nalgebra::{Point3, Point4};

use crate::misc::FloatingPoint;

/// A control point of a curve
/// `weight` only matters for rational curves and defaults to 1
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlPoint<T: FloatingPoint> {
    position: Point3<T>,
    weight: T,
}

impl<T: FloatingPoint> ControlPoint<T> {
    pub fn new(position: Point3<T>) -> Self {
        Self {
            position,
            weight: T::one(),
        }
    }

    pub fn with_weight(position: Point3<T>, weight: T) -> Self {
        Self { position, weight }
    }

    pub fn from_xyz(x: T, y: T, z: T) -> Self {
        Self::new(Point3::new(x, y, z))
    }

    pub fn position(&self) -> &Point3<T> {
        &self.position
    }

    pub fn set_position(&mut self, position: Point3<T>) {
        self.position = position;
    }

    pub fn weight(&self) -> T {
        self.weight
    }

    pub fn set_weight(&mut self, weight: T) {
        self.weight = weight;
    }

    /// Homogeneous coordinates `[x * w, y * w, z * w, w]` with the given weight
    pub fn homogeneous(&self, weight: T) -> Point4<T> {
        let p = self.position.coords * weight;
        Point4::new(p.x, p.y, p.z, weight)
    }
}

impl<T: FloatingPoint> From<Point3<T>> for ControlPoint<T> {
    fn from(position: Point3<T>) -> Self {
        Self::new(position)
    }
}
