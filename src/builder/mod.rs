pub mod bezier;
pub mod bspline;
pub mod curve_kind;
mod helper;
pub mod linear_interpolation;
pub mod parametric;
pub mod parametrization;
pub mod rational_bezier;
pub mod rational_bspline;
pub mod rebuild_report;

pub use bezier::*;
pub use bspline::BSplineBuilder;
pub use curve_kind::*;
pub use linear_interpolation::*;
pub use parametric::*;
pub use parametrization::*;
pub use rational_bezier::*;
pub use rational_bspline::*;
pub use rebuild_report::*;

use nalgebra::{Point3, Vector3};

use crate::{knot::KnotVector, misc::FloatingPoint, point::ControlPoint};

/// The curve families a [crate::curve::Curve] can be evaluated with
/// Exactly one builder is active per curve; switching families migrates no data.
#[derive(Clone, Debug)]
pub enum CurveBuilder<T: FloatingPoint> {
    Parametric(ParametricBuilder<T>),
    LinearInterpolation(LinearInterpolationBuilder<T>),
    Bezier(BezierBuilder<T>),
    RationalBezier(RationalBezierBuilder<T>),
    BSpline(BSplineBuilder<T>),
    RationalBSpline(RationalBSplineBuilder<T>),
}

impl<T: FloatingPoint> Default for CurveBuilder<T> {
    fn default() -> Self {
        Self::linear()
    }
}

impl<T: FloatingPoint> CurveBuilder<T> {
    pub fn parametric<F>(function: F) -> Self
    where
        F: Fn(T) -> Point3<T> + Send + Sync + 'static,
    {
        Self::Parametric(ParametricBuilder::new(function))
    }

    /// Polyline with uniform parametrization
    pub fn linear() -> Self {
        Self::LinearInterpolation(LinearInterpolationBuilder::new(Parametrization::Uniform))
    }

    pub fn bezier() -> Self {
        Self::Bezier(BezierBuilder::new(BezierEvaluation::DeCasteljau))
    }

    pub fn rational_bezier(weights: Vec<T>) -> Self {
        Self::RationalBezier(RationalBezierBuilder::new(weights))
    }

    /// B-spline with an open uniform knot vector
    pub fn bspline(degree: usize) -> Self {
        Self::BSpline(BSplineBuilder::new(degree))
    }

    pub fn bspline_with_knots(degree: usize, knots: KnotVector<T>) -> Self {
        Self::BSpline(BSplineBuilder::with_knots(degree, knots))
    }

    pub fn rational_bspline(degree: usize, knots: KnotVector<T>, weights: Vec<T>) -> Self {
        Self::RationalBSpline(RationalBSplineBuilder::with_knots_and_weights(
            degree, knots, weights,
        ))
    }

    pub fn kind(&self) -> CurveKind {
        match self {
            CurveBuilder::Parametric(_) => CurveKind::Parametric,
            CurveBuilder::LinearInterpolation(_) => CurveKind::LinearInterpolation,
            CurveBuilder::Bezier(_) => CurveKind::Bezier,
            CurveBuilder::RationalBezier(_) => CurveKind::RationalBezier,
            CurveBuilder::BSpline(_) => CurveKind::BSpline,
            CurveBuilder::RationalBSpline(_) => CurveKind::RationalBSpline,
        }
    }

    /// Polynomial degree, 1 for polylines and 0 for closed-form curves
    pub fn degree(&self) -> usize {
        match self {
            CurveBuilder::Parametric(_) => 0,
            CurveBuilder::LinearInterpolation(_) => 1,
            CurveBuilder::Bezier(b) => b.degree(),
            CurveBuilder::RationalBezier(b) => b.degree(),
            CurveBuilder::BSpline(b) => b.degree(),
            CurveBuilder::RationalBSpline(b) => b.degree(),
        }
    }

    /// Number of control points required before the curve can be evaluated
    pub fn min_control_points(&self) -> usize {
        match self {
            CurveBuilder::Parametric(_) => 0,
            _ => 2,
        }
    }

    /// Knot vector of the B-spline families
    pub fn knots(&self) -> Option<&KnotVector<T>> {
        match self {
            CurveBuilder::BSpline(b) => Some(b.knots()),
            CurveBuilder::RationalBSpline(b) => Some(b.knots()),
            _ => None,
        }
    }

    /// Weights of the rational families
    pub fn weights(&self) -> Option<&[T]> {
        match self {
            CurveBuilder::RationalBezier(b) => Some(b.weights()),
            CurveBuilder::RationalBSpline(b) => Some(b.weights()),
            _ => None,
        }
    }

    /// Recompute everything cached from the control points
    /// Must run after the control points changed and before evaluating.
    pub fn rebuild(&mut self, points: &[ControlPoint<T>]) -> anyhow::Result<RebuildReport> {
        match self {
            CurveBuilder::Parametric(_) => Ok(RebuildReport::new()),
            CurveBuilder::LinearInterpolation(b) => b.rebuild(points),
            CurveBuilder::Bezier(b) => b.rebuild(points),
            CurveBuilder::RationalBezier(b) => b.rebuild(points),
            CurveBuilder::BSpline(b) => b.rebuild(points),
            CurveBuilder::RationalBSpline(b) => b.rebuild(points),
        }
    }

    /// Evaluate the curve at `t` in [0, 1]
    pub fn point_at(&self, t: T) -> anyhow::Result<Point3<T>> {
        match self {
            CurveBuilder::Parametric(b) => b.point_at(t),
            CurveBuilder::LinearInterpolation(b) => b.point_at(t),
            CurveBuilder::Bezier(b) => b.point_at(t),
            CurveBuilder::RationalBezier(b) => b.point_at(t),
            CurveBuilder::BSpline(b) => b.point_at(t),
            CurveBuilder::RationalBSpline(b) => b.point_at(t),
        }
    }

    /// The point (as a vector) followed by derivatives up to `min(order, degree)`
    /// Empty for the families without derivative support.
    pub fn derivatives_at(&self, t: T, order: usize) -> anyhow::Result<Vec<Vector3<T>>> {
        match self {
            CurveBuilder::BSpline(b) => b.derivatives_at(t, order),
            CurveBuilder::RationalBSpline(b) => b.derivatives_at(t, order),
            _ => Ok(vec![]),
        }
    }

    /// Unit tangent at `t`, `None` when no derivative is available or it vanishes
    pub fn tangent_at(&self, t: T) -> anyhow::Result<Option<Vector3<T>>> {
        let ders = self.derivatives_at(t, 1)?;
        Ok(ders.get(1).and_then(|d| d.try_normalize(T::default_epsilon())))
    }
}

impl<T: FloatingPoint> From<ParametricBuilder<T>> for CurveBuilder<T> {
    fn from(builder: ParametricBuilder<T>) -> Self {
        Self::Parametric(builder)
    }
}

impl<T: FloatingPoint> From<LinearInterpolationBuilder<T>> for CurveBuilder<T> {
    fn from(builder: LinearInterpolationBuilder<T>) -> Self {
        Self::LinearInterpolation(builder)
    }
}

impl<T: FloatingPoint> From<BezierBuilder<T>> for CurveBuilder<T> {
    fn from(builder: BezierBuilder<T>) -> Self {
        Self::Bezier(builder)
    }
}

impl<T: FloatingPoint> From<RationalBezierBuilder<T>> for CurveBuilder<T> {
    fn from(builder: RationalBezierBuilder<T>) -> Self {
        Self::RationalBezier(builder)
    }
}

impl<T: FloatingPoint> From<BSplineBuilder<T>> for CurveBuilder<T> {
    fn from(builder: BSplineBuilder<T>) -> Self {
        Self::BSpline(builder)
    }
}

impl<T: FloatingPoint> From<RationalBSplineBuilder<T>> for CurveBuilder<T> {
    fn from(builder: RationalBSplineBuilder<T>) -> Self {
        Self::RationalBSpline(builder)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    use super::{CurveBuilder, CurveKind};
    use crate::{knot::KnotVector, point::ControlPoint};

    fn arch() -> Vec<ControlPoint<f64>> {
        vec![
            ControlPoint::from_xyz(0., 0., 0.),
            ControlPoint::from_xyz(1., 1., 0.),
            ControlPoint::from_xyz(2., 0., 0.),
        ]
    }

    #[test]
    fn dispatch_by_family() {
        let builders = [
            CurveBuilder::linear(),
            CurveBuilder::bezier(),
            CurveBuilder::rational_bezier(vec![1.; 3]),
            CurveBuilder::bspline(2),
            CurveBuilder::rational_bspline(2, KnotVector::new(vec![]), vec![]),
        ];
        for mut builder in builders {
            builder.rebuild(&arch()).unwrap();
            let mid = builder.point_at(0.5).unwrap();
            match builder.kind() {
                CurveKind::LinearInterpolation => assert_eq!(mid, Point3::new(1., 1., 0.)),
                _ => assert_relative_eq!(mid, Point3::new(1., 0.5, 0.), epsilon = 1e-12),
            }
        }
    }

    #[test]
    fn derivatives_only_for_bsplines() {
        let mut bezier = CurveBuilder::bezier();
        bezier.rebuild(&arch()).unwrap();
        assert!(bezier.derivatives_at(0.5, 2).unwrap().is_empty());
        assert!(bezier.tangent_at(0.5).unwrap().is_none());

        let mut bspline = CurveBuilder::bspline(2);
        bspline.rebuild(&arch()).unwrap();
        assert_eq!(bspline.derivatives_at(0.5, 2).unwrap().len(), 3);
        let tangent = bspline.tangent_at(0.5).unwrap().unwrap();
        assert_relative_eq!(tangent, nalgebra::Vector3::x(), epsilon = 1e-12);
    }

    #[test]
    fn rebuild_is_idempotent() {
        for mut builder in [
            CurveBuilder::linear(),
            CurveBuilder::bezier(),
            CurveBuilder::rational_bezier(vec![]),
            CurveBuilder::bspline(3),
            CurveBuilder::rational_bspline(3, KnotVector::new(vec![]), vec![]),
        ] {
            builder.rebuild(&arch()).unwrap();
            let first: Vec<_> = (0..=8).map(|i| builder.point_at(i as f64 / 8.).unwrap()).collect();
            let report = builder.rebuild(&arch()).unwrap();
            assert!(report.is_clean());
            let second: Vec<_> = (0..=8).map(|i| builder.point_at(i as f64 / 8.).unwrap()).collect();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn clone_does_not_alias() {
        let mut original = CurveBuilder::bspline(2);
        original.rebuild(&arch()).unwrap();
        let copy = original.clone();
        let mut moved = arch();
        moved[1].set_position(Point3::new(1., 5., 0.));
        original.rebuild(&moved).unwrap();
        assert_relative_eq!(copy.point_at(0.5).unwrap(), Point3::new(1., 0.5, 0.), epsilon = 1e-12);
        assert_relative_eq!(original.point_at(0.5).unwrap(), Point3::new(1., 2.5, 0.), epsilon = 1e-12);
    }
}
