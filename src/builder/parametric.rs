use std::{fmt, sync::Arc};

use nalgebra::Point3;

use crate::misc::FloatingPoint;

use super::helper::check_parameter;

/// Closed-form curve function of the parameter in [0, 1]
pub type ParametricFn<T> = Arc<dyn Fn(T) -> Point3<T> + Send + Sync>;

/// Builder evaluating a closed-form function
/// Control points are ignored.
#[derive(Clone)]
pub struct ParametricBuilder<T: FloatingPoint> {
    function: ParametricFn<T>,
}

impl<T: FloatingPoint> ParametricBuilder<T> {
    /// # Example
    /// ```
    /// use spline_core::prelude::*;
    /// use nalgebra::Point3;
    /// let helix = ParametricBuilder::new(|t: f64| {
    ///     let a = t * std::f64::consts::TAU;
    ///     Point3::new(a.cos(), a.sin(), t)
    /// });
    /// assert_eq!(helix.point_at(1.).unwrap().z, 1.);
    /// ```
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(T) -> Point3<T> + Send + Sync + 'static,
    {
        Self {
            function: Arc::new(function),
        }
    }

    pub fn function(&self) -> &ParametricFn<T> {
        &self.function
    }

    pub fn point_at(&self, t: T) -> anyhow::Result<Point3<T>> {
        check_parameter(t)?;
        Ok((self.function)(t))
    }
}

impl<T: FloatingPoint> fmt::Debug for ParametricBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParametricBuilder").finish_non_exhaustive()
    }
}
