use nalgebra::Point3;

use super::FloatingPoint;

/// Positions at both ends of the parameter range.
pub trait EndPoints<T: FloatingPoint> {
    fn first_point(&self) -> anyhow::Result<Point3<T>>;
    fn end_point(&self) -> anyhow::Result<Point3<T>>;
    fn end_points(&self) -> anyhow::Result<(Point3<T>, Point3<T>)> {
        Ok((self.first_point()?, self.end_point()?))
    }
}
