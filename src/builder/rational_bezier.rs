use nalgebra::{Point3, Vector4};

use crate::{misc::FloatingPoint, point::ControlPoint};

use super::{
    helper::{check_parameter, de_casteljau, dehomogenize, ensure_point_count},
    Defaulting, RebuildReport,
};

/// Rational Bezier curve
/// evaluated by de Casteljau on homogeneous points `[P * w, w]`
///
/// The control points own the weights. `weights` mirrors them after every rebuild;
/// weights given here are copied onto the points when a curve adopts this builder.
#[derive(Clone, Debug, Default)]
pub struct RationalBezierBuilder<T: FloatingPoint> {
    weights: Vec<T>,
    homogeneous: Vec<Vector4<T>>,
    /// weights were set and not yet checked against the control points
    stale: bool,
}

impl<T: FloatingPoint> RationalBezierBuilder<T> {
    pub fn new(weights: Vec<T>) -> Self {
        Self {
            weights,
            homogeneous: vec![],
            stale: true,
        }
    }

    pub fn degree(&self) -> usize {
        self.homogeneous.len().saturating_sub(1)
    }

    pub fn weights(&self) -> &[T] {
        &self.weights
    }

    /// Checked on the next rebuild; a curve copies these onto its control points in `configure_builder`
    pub fn set_weights(&mut self, weights: Vec<T>) {
        self.weights = weights;
        self.stale = true;
    }

    /// Cache homogeneous points from the control points and their weights
    /// weights set on the builder that do not match the number of points are reported and discarded
    pub fn rebuild(&mut self, points: &[ControlPoint<T>]) -> anyhow::Result<RebuildReport> {
        let mut report = RebuildReport::new();
        let n = points.len();
        if self.stale && self.weights.len() != n {
            report.push(Defaulting::WeightsReset {
                expected: n,
                found: self.weights.len(),
            });
        }

        self.weights = points.iter().map(|p| p.weight()).collect();
        self.homogeneous = points
            .iter()
            .map(|p| p.homogeneous(p.weight()).coords)
            .collect();
        self.stale = false;
        Ok(report)
    }

    pub fn point_at(&self, t: T) -> anyhow::Result<Point3<T>> {
        check_parameter(t)?;
        ensure_point_count(self.homogeneous.len(), 2)?;
        let h = de_casteljau(&self.homogeneous, t)
            .ok_or_else(|| anyhow::anyhow!("Empty control polygon"))?;
        dehomogenize(&h)
    }
}
