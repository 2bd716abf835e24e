use nalgebra::{Point3, Point4, Vector3, Vector4};

use crate::{
    knot::KnotVector,
    misc::{Binomial, FloatingPoint},
    point::ControlPoint,
};

use super::{
    bspline::{domain_scales, ensure_rebuilt, fit_degree_and_knots},
    helper::{check_parameter, ensure_point_count, map_to_domain},
    Defaulting, RebuildReport,
};

/// Rational B-spline (NURBS) curve
///
/// The control points own the weights. `weights` mirrors them after every rebuild;
/// weights given here are copied onto the points when a curve adopts this builder.
#[derive(Clone, Debug)]
pub struct RationalBSplineBuilder<T: FloatingPoint> {
    degree: usize,
    knots: KnotVector<T>,
    weights: Vec<T>,
    /// control points with homogeneous coordinates
    /// the last element of the vector is the `weight`
    homogeneous: Vec<Point4<T>>,
    stale: bool,
}

impl<T: FloatingPoint> RationalBSplineBuilder<T> {
    /// Knots and weights are generated on rebuild
    pub fn new(degree: usize) -> Self {
        Self::with_knots_and_weights(degree, KnotVector::new(vec![]), vec![])
    }

    /// Knots are kept if they fit the control points on rebuild, regenerated otherwise
    pub fn with_knots_and_weights(degree: usize, knots: KnotVector<T>, weights: Vec<T>) -> Self {
        Self {
            degree,
            knots,
            weights,
            homogeneous: vec![],
            stale: true,
        }
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn set_degree(&mut self, degree: usize) {
        self.degree = degree;
        self.stale = true;
    }

    pub fn knots(&self) -> &KnotVector<T> {
        &self.knots
    }

    pub fn set_knots(&mut self, knots: KnotVector<T>) {
        self.knots = knots;
        self.stale = true;
    }

    pub fn weights(&self) -> &[T] {
        &self.weights
    }

    pub fn set_weights(&mut self, weights: Vec<T>) {
        self.weights = weights;
        self.stale = true;
    }

    pub fn knots_domain(&self) -> (T, T) {
        self.knots.domain(self.degree)
    }

    /// Validate degree and knots and cache the homogeneous control points
    /// weights set on the builder that do not match the number of points are reported and discarded,
    /// the control points' own weights are used either way
    pub fn rebuild(&mut self, points: &[ControlPoint<T>]) -> anyhow::Result<RebuildReport> {
        let mut report = RebuildReport::new();
        let n = points.len();
        let configured = self.stale;
        fit_degree_and_knots(&mut self.degree, &mut self.knots, n, &mut report);

        if configured && self.weights.len() != n {
            report.push(Defaulting::WeightsReset {
                expected: n,
                found: self.weights.len(),
            });
        }

        self.weights = points.iter().map(|p| p.weight()).collect();
        self.homogeneous = points
            .iter()
            .map(|p| p.homogeneous(p.weight()))
            .collect();
        self.stale = false;
        Ok(report)
    }

    /// Evaluated through the derivative routine at order 0
    pub fn point_at(&self, t: T) -> anyhow::Result<Point3<T>> {
        let ders = self.rational_derivatives(t, 0)?;
        Ok(Point3::from(ders[0]))
    }

    /// Evaluate the point and its derivatives by `t` up to `min(order, degree)`
    pub fn derivatives_at(&self, t: T, order: usize) -> anyhow::Result<Vec<Vector3<T>>> {
        self.rational_derivatives(t, order.min(self.degree))
    }

    /// Evaluate the rational derivatives at a given parameter
    /// `A(k)` and `w(k)` are the derivatives of the homogeneous numerator and the weight,
    /// `C(k) = (A(k) - sum_{i=1..k} binom(k, i) w(i) C(k - i)) / w(0)`
    fn rational_derivatives(&self, t: T, derivs: usize) -> anyhow::Result<Vec<Vector3<T>>> {
        let ders = self.derivatives(t, derivs)?;
        let a_ders: Vec<_> = ders.iter().map(|d| d.xyz()).collect();
        let w_ders: Vec<_> = ders.iter().map(|d| d.w).collect();
        anyhow::ensure!(
            w_ders[0] != T::zero(),
            "Homogeneous weight vanished during evaluation"
        );

        let mut ck: Vec<Vector3<T>> = Vec::with_capacity(derivs + 1);
        let mut binom = Binomial::<T>::new();
        for k in 0..=derivs {
            let mut v = a_ders[k];

            for i in 1..=k {
                let coef = binom.get(k, i) * w_ders[i];
                v -= ck[k - i] * coef;
            }

            ck.push(v / w_ders[0]);
        }
        Ok(ck)
    }

    /// Derivatives of the homogeneous curve by `t`
    fn derivatives(&self, t: T, derivs: usize) -> anyhow::Result<Vec<Vector4<T>>> {
        check_parameter(t)?;
        ensure_point_count(self.homogeneous.len(), 2)?;
        ensure_rebuilt(self.stale)?;

        let domain = self.knots_domain();
        let u = map_to_domain(t, domain);
        let n = self.homogeneous.len() - 1;
        let du = derivs.min(self.degree);

        let knot_span_index = self.knots.find_knot_span_index(n, self.degree, u)?;
        let nders = self
            .knots
            .derivative_basis_functions(knot_span_index, u, self.degree, du);
        let scales = domain_scales(domain, du);

        let mut derivatives = vec![Vector4::<T>::zeros(); derivs + 1];
        for k in 0..=du {
            for j in 0..=self.degree {
                derivatives[k] += self.homogeneous[knot_span_index - self.degree + j].coords
                    * (nders[k][j] * scales[k]);
            }
        }

        Ok(derivatives)
    }
}
