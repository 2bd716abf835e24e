use nalgebra::Point3;

use crate::{
    builder::{CurveBuilder, CurveKind},
    knot::KnotVector,
    misc::{CurveError, FloatingPoint},
    point::ControlPoint,
};

use super::Curve;

/// Plain persistence record of a curve
/// The encoding on disk is up to the caller (e.g. through the `serde` feature).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurveRecord<T> {
    pub kind: CurveKind,
    pub degree: usize,
    /// empty for families without knots
    pub knots: Vec<T>,
    /// empty for non-rational families
    pub weights: Vec<T>,
    pub points: Vec<[T; 3]>,
}

impl<T: FloatingPoint> Curve<T> {
    /// Export the curve's family, parameters and control points
    /// # Failures
    /// - closed-form curves have no record representation
    pub fn to_record(&self) -> anyhow::Result<CurveRecord<T>> {
        let builder = self.builder();
        if builder.kind() == CurveKind::Parametric {
            return Err(CurveError::NotRepresentable(
                "closed-form function cannot be stored".to_string(),
            )
            .into());
        }

        Ok(CurveRecord {
            kind: builder.kind(),
            degree: builder.degree(),
            knots: builder.knots().map(|k| k.to_vec()).unwrap_or_default(),
            weights: builder.weights().map(|w| w.to_vec()).unwrap_or_default(),
            points: self
                .control_points()
                .iter()
                .map(|p| {
                    let p = p.position();
                    [p.x, p.y, p.z]
                })
                .collect(),
        })
    }

    /// Rebuild a curve from a record
    /// knots and weights that do not fit the points are defaulted like any other rebuild
    ///
    /// # Example
    /// ```
    /// use spline_core::prelude::*;
    ///
    /// let record = CurveRecord {
    ///     kind: CurveKind::BSpline,
    ///     degree: 2,
    ///     knots: vec![0., 0., 0., 1., 1., 1.],
    ///     weights: vec![],
    ///     points: vec![[0., 0., 0.], [1., 1., 0.], [2., 0., 0.]],
    /// };
    /// let curve = Curve::try_from_record(&record).unwrap();
    /// assert!(curve.last_report().is_clean());
    /// assert_eq!(curve.to_record().unwrap(), record);
    /// ```
    pub fn try_from_record(record: &CurveRecord<T>) -> anyhow::Result<Self> {
        let knots = KnotVector::new(record.knots.clone());
        let weights = record.weights.clone();
        let builder = match record.kind {
            CurveKind::Parametric => {
                return Err(CurveError::NotRepresentable(
                    "closed-form function cannot be restored".to_string(),
                )
                .into())
            }
            CurveKind::LinearInterpolation => CurveBuilder::linear(),
            CurveKind::Bezier => CurveBuilder::bezier(),
            CurveKind::RationalBezier => CurveBuilder::rational_bezier(weights),
            CurveKind::BSpline => CurveBuilder::bspline_with_knots(record.degree, knots),
            CurveKind::RationalBSpline => {
                CurveBuilder::rational_bspline(record.degree, knots, weights)
            }
        };

        let points = record.points.iter().enumerate().map(|(i, [x, y, z])| {
            let position = Point3::new(*x, *y, *z);
            match record.weights.get(i) {
                Some(w) if record.kind.is_rational() => ControlPoint::with_weight(position, *w),
                _ => ControlPoint::new(position),
            }
        });

        Curve::try_new(builder, points)
    }
}

impl<T: FloatingPoint> TryFrom<&CurveRecord<T>> for Curve<T> {
    type Error = anyhow::Error;

    fn try_from(record: &CurveRecord<T>) -> Result<Self, Self::Error> {
        Curve::try_from_record(record)
    }
}
