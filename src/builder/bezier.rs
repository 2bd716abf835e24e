use nalgebra::{Point3, Vector3};

use crate::{
    misc::{binomial, FloatingPoint},
    point::ControlPoint,
};

use super::{
    helper::{check_parameter, de_casteljau, ensure_point_count},
    RebuildReport,
};

/// Strategy used to evaluate a Bezier curve
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BezierEvaluation {
    /// repeated linear blending of the control polygon
    #[default]
    DeCasteljau,
    /// Bernstein polynomial weights dotted with the control points
    Bernstein,
}

/// Bezier curve whose degree is `# of control points - 1`
#[derive(Clone, Debug, Default)]
pub struct BezierBuilder<T: FloatingPoint> {
    evaluation: BezierEvaluation,
    positions: Vec<Vector3<T>>,
}

/// Bernstein basis of `degree` at `t`
pub(crate) fn bernstein_polynomials<T: FloatingPoint>(degree: usize, t: T) -> Vec<T> {
    let s = T::one() - t;
    (0..=degree)
        .map(|i| {
            binomial::<T>(degree, i) * t.powi(i as i32) * s.powi((degree - i) as i32)
        })
        .collect()
}

impl<T: FloatingPoint> BezierBuilder<T> {
    pub fn new(evaluation: BezierEvaluation) -> Self {
        Self {
            evaluation,
            positions: vec![],
        }
    }

    pub fn evaluation(&self) -> BezierEvaluation {
        self.evaluation
    }

    pub fn set_evaluation(&mut self, evaluation: BezierEvaluation) {
        self.evaluation = evaluation;
    }

    pub fn degree(&self) -> usize {
        self.positions.len().saturating_sub(1)
    }

    pub fn rebuild(&mut self, points: &[ControlPoint<T>]) -> anyhow::Result<RebuildReport> {
        self.positions = points.iter().map(|p| p.position().coords).collect();
        Ok(RebuildReport::new())
    }

    pub fn point_at(&self, t: T) -> anyhow::Result<Point3<T>> {
        match self.evaluation {
            BezierEvaluation::DeCasteljau => self.point_at_de_casteljau(t),
            BezierEvaluation::Bernstein => self.point_at_bernstein(t),
        }
    }

    pub fn point_at_de_casteljau(&self, t: T) -> anyhow::Result<Point3<T>> {
        check_parameter(t)?;
        ensure_point_count(self.positions.len(), 2)?;
        de_casteljau(&self.positions, t)
            .map(Point3::from)
            .ok_or_else(|| anyhow::anyhow!("Empty control polygon"))
    }

    pub fn point_at_bernstein(&self, t: T) -> anyhow::Result<Point3<T>> {
        check_parameter(t)?;
        ensure_point_count(self.positions.len(), 2)?;
        let basis = bernstein_polynomials(self.degree(), t);
        let coords = self
            .positions
            .iter()
            .zip(basis)
            .fold(Vector3::zeros(), |acc, (p, b)| acc + p * b);
        Ok(Point3::from(coords))
    }
}
