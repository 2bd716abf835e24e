use nalgebra::{Point3, Vector3};

use crate::{knot::KnotVector, misc::FloatingPoint, point::ControlPoint};

use super::{
    helper::{check_parameter, ensure_point_count, map_to_domain},
    Defaulting, RebuildReport,
};

/// Non-rational B-spline curve
#[derive(Clone, Debug)]
pub struct BSplineBuilder<T: FloatingPoint> {
    degree: usize,
    /// the length of the knot vector is equal to the `# of control points + degree + 1`
    knots: KnotVector<T>,
    positions: Vec<Vector3<T>>,
    /// degree or knots changed since the last rebuild
    stale: bool,
}

/// Lower the degree and regenerate the knot vector when they do not fit `point_count`
/// The degree is never raised.
pub(crate) fn fit_degree_and_knots<T: FloatingPoint>(
    degree: &mut usize,
    knots: &mut KnotVector<T>,
    point_count: usize,
    report: &mut RebuildReport,
) {
    if point_count == 0 {
        return;
    }

    if point_count < *degree + 1 {
        report.push(Defaulting::DegreeLowered {
            requested: *degree,
            applied: point_count - 1,
        });
        *degree = point_count - 1;
    }

    if !knots.is_valid_for(point_count, *degree) {
        report.push(Defaulting::KnotsRegenerated {
            expected: point_count + *degree + 1,
            found: knots.len(),
        });
        *knots = KnotVector::open_uniform(point_count, *degree);
    }
}

pub(crate) fn ensure_rebuilt(stale: bool) -> anyhow::Result<()> {
    anyhow::ensure!(!stale, "Degree or knot vector changed, rebuild required");
    Ok(())
}

/// Chain rule factors `(end - start)^k` turning knot derivatives into derivatives by `t`
pub(crate) fn domain_scales<T: FloatingPoint>((start, end): (T, T), order: usize) -> Vec<T> {
    let s = end - start;
    (0..=order)
        .scan(T::one(), |acc, _| {
            let current = *acc;
            *acc *= s;
            Some(current)
        })
        .collect()
}

impl<T: FloatingPoint> BSplineBuilder<T> {
    /// The knot vector is generated on rebuild
    pub fn new(degree: usize) -> Self {
        Self::with_knots(degree, KnotVector::new(vec![]))
    }

    /// The knot vector is kept if it fits the control points on rebuild, regenerated otherwise
    pub fn with_knots(degree: usize, knots: KnotVector<T>) -> Self {
        Self {
            degree,
            knots,
            positions: vec![],
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

    pub fn knots_domain(&self) -> (T, T) {
        self.knots.domain(self.degree)
    }

    pub fn rebuild(&mut self, points: &[ControlPoint<T>]) -> anyhow::Result<RebuildReport> {
        let mut report = RebuildReport::new();
        fit_degree_and_knots(&mut self.degree, &mut self.knots, points.len(), &mut report);
        self.positions = points.iter().map(|p| p.position().coords).collect();
        self.stale = false;
        Ok(report)
    }

    pub fn point_at(&self, t: T) -> anyhow::Result<Point3<T>> {
        check_parameter(t)?;
        ensure_point_count(self.positions.len(), 2)?;
        ensure_rebuilt(self.stale)?;
        let u = map_to_domain(t, self.knots_domain());
        let n = self.positions.len() - 1;
        let knot_span_index = self.knots.find_knot_span_index(n, self.degree, u)?;
        let basis = self.knots.basis_functions(knot_span_index, u, self.degree);
        let mut position = Vector3::zeros();
        for i in 0..=self.degree {
            position += self.positions[knot_span_index - self.degree + i] * basis[i];
        }
        Ok(Point3::from(position))
    }

    /// Evaluate the point and its derivatives by `t` up to `min(order, degree)`
    pub fn derivatives_at(&self, t: T, order: usize) -> anyhow::Result<Vec<Vector3<T>>> {
        check_parameter(t)?;
        ensure_point_count(self.positions.len(), 2)?;
        ensure_rebuilt(self.stale)?;
        let domain = self.knots_domain();
        let u = map_to_domain(t, domain);
        let n = self.positions.len() - 1;
        let du = order.min(self.degree);

        let knot_span_index = self.knots.find_knot_span_index(n, self.degree, u)?;
        let nders = self
            .knots
            .derivative_basis_functions(knot_span_index, u, self.degree, du);
        let scales = domain_scales(domain, du);

        let derivatives = (0..=du)
            .map(|k| {
                let mut d = Vector3::zeros();
                for j in 0..=self.degree {
                    d += self.positions[knot_span_index - self.degree + j] * nders[k][j];
                }
                d * scales[k]
            })
            .collect();
        Ok(derivatives)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::{Point3, Vector3};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::BSplineBuilder;
    use crate::{builder::Defaulting, knot::KnotVector, point::ControlPoint};

    fn random_points(rng: &mut StdRng, count: usize) -> Vec<ControlPoint<f64>> {
        (0..count)
            .map(|_| {
                ControlPoint::from_xyz(
                    rng.random_range(-5.0..5.0),
                    rng.random_range(-5.0..5.0),
                    rng.random_range(-5.0..5.0),
                )
            })
            .collect()
    }

    #[test]
    fn quadratic_arch() {
        let points = vec![
            ControlPoint::from_xyz(0., 0., 0.),
            ControlPoint::from_xyz(1., 1., 0.),
            ControlPoint::from_xyz(2., 0., 0.),
        ];
        let mut builder = BSplineBuilder::new(2);
        builder.rebuild(&points).unwrap();
        assert_eq!(builder.knots().to_vec(), vec![0., 0., 0., 1., 1., 1.]);
        assert_relative_eq!(builder.point_at(0.5).unwrap(), Point3::new(1., 0.5, 0.));
    }

    #[test]
    fn clamped_curves_interpolate_end_points() {
        let mut rng = StdRng::seed_from_u64(11);
        for degree in 1..=5 {
            for count in degree + 1..degree + 5 {
                let points = random_points(&mut rng, count);
                let mut builder = BSplineBuilder::new(degree);
                builder.rebuild(&points).unwrap();
                assert_relative_eq!(
                    builder.point_at(0.).unwrap(),
                    *points[0].position(),
                    epsilon = 1e-12
                );
                assert_relative_eq!(
                    builder.point_at(1.).unwrap(),
                    *points[count - 1].position(),
                    epsilon = 1e-12
                );
            }
        }
    }

    #[test]
    fn degree_is_lowered_not_raised() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut builder = BSplineBuilder::new(4);
        let report = builder.rebuild(&random_points(&mut rng, 3)).unwrap();
        assert_eq!(builder.degree(), 2);
        assert!(report.degree_lowered());
        assert!(report.knots_regenerated());
        assert_eq!(
            report.defaultings()[0],
            Defaulting::DegreeLowered {
                requested: 4,
                applied: 2
            }
        );

        let report = builder.rebuild(&random_points(&mut rng, 8)).unwrap();
        assert_eq!(builder.degree(), 2);
        assert!(!report.degree_lowered());
        assert!(report.knots_regenerated());
        assert_eq!(builder.knots().len(), 8 + 2 + 1);
    }

    #[test]
    fn valid_knots_are_kept() {
        let knots = KnotVector::new(vec![0., 0., 0., 0.2, 1., 1., 1.]);
        let mut builder = BSplineBuilder::with_knots(2, knots.clone());
        let report = builder
            .rebuild(&random_points(&mut StdRng::seed_from_u64(1), 4))
            .unwrap();
        assert!(report.is_clean());
        assert_eq!(builder.knots(), &knots);
    }

    #[test]
    fn evaluation_requires_rebuild_after_reconfiguration() {
        let mut builder = BSplineBuilder::new(2);
        builder
            .rebuild(&random_points(&mut StdRng::seed_from_u64(2), 5))
            .unwrap();
        assert!(builder.point_at(0.5).is_ok());
        builder.set_degree(3);
        assert!(builder.point_at(0.5).is_err());
        let report = builder
            .rebuild(&random_points(&mut StdRng::seed_from_u64(2), 5))
            .unwrap();
        assert!(report.knots_regenerated());
        assert!(builder.point_at(0.5).is_ok());
    }

    #[test]
    fn derivatives_match_finite_differences() {
        let mut rng = StdRng::seed_from_u64(23);
        let points = random_points(&mut rng, 7);
        let mut builder = BSplineBuilder::new(3);
        builder.rebuild(&points).unwrap();
        let h = 1e-6;
        for t in [0.1, 0.27, 0.45, 0.63, 0.81, 0.93] {
            let ders = builder.derivatives_at(t, 1).unwrap();
            assert_eq!(ders.len(), 2);
            assert_relative_eq!(
                Point3::from(ders[0]),
                builder.point_at(t).unwrap(),
                epsilon = 1e-12
            );
            let numeric =
                (builder.point_at(t + h).unwrap() - builder.point_at(t - h).unwrap()) / (2. * h);
            assert_relative_eq!(ders[1], numeric, epsilon = 1e-4);
        }
    }

    #[test]
    fn derivative_order_is_capped_by_degree() {
        let points = vec![
            ControlPoint::from_xyz(0., 0., 0.),
            ControlPoint::from_xyz(1., 1., 0.),
            ControlPoint::from_xyz(2., 0., 0.),
        ];
        let mut builder = BSplineBuilder::new(2);
        builder.rebuild(&points).unwrap();
        let ders = builder.derivatives_at(0.5, 5).unwrap();
        assert_eq!(ders.len(), 3);
        // C(t) = (2t, 2t(1 - t), 0)
        assert_relative_eq!(ders[1], Vector3::new(2., 0., 0.), epsilon = 1e-12);
        assert_relative_eq!(ders[2], Vector3::new(0., -4., 0.), epsilon = 1e-12);
    }

    #[test]
    fn custom_domain_is_mapped_to_unit_interval() {
        let points = vec![
            ControlPoint::from_xyz(0., 0., 0.),
            ControlPoint::from_xyz(1., 1., 0.),
            ControlPoint::from_xyz(2., 0., 0.),
        ];
        let mut unit = BSplineBuilder::new(2);
        unit.rebuild(&points).unwrap();
        let mut scaled = BSplineBuilder::with_knots(2, KnotVector::new(vec![2., 2., 2., 6., 6., 6.]));
        scaled.rebuild(&points).unwrap();
        for t in [0., 0.3, 0.5, 1.] {
            assert_relative_eq!(
                unit.point_at(t).unwrap(),
                scaled.point_at(t).unwrap(),
                epsilon = 1e-12
            );
            let a = unit.derivatives_at(t, 2).unwrap();
            let b = scaled.derivatives_at(t, 2).unwrap();
            for (a, b) in a.iter().zip(b.iter()) {
                assert_relative_eq!(a, b, epsilon = 1e-9);
            }
        }
    }
}
