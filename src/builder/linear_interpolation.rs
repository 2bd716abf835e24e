use nalgebra::Point3;

use crate::{
    misc::{CurveError, FloatingPoint},
    point::ControlPoint,
};

use super::{
    helper::{check_parameter, ensure_point_count},
    Parametrization, RebuildReport,
};

/// Polyline through the control points
#[derive(Clone, Debug, Default)]
pub struct LinearInterpolationBuilder<T: FloatingPoint> {
    parametrization: Parametrization,
    /// parameter of each control point, increasing from 0 to 1
    parameters: Vec<T>,
    positions: Vec<Point3<T>>,
}

impl<T: FloatingPoint> LinearInterpolationBuilder<T> {
    pub fn new(parametrization: Parametrization) -> Self {
        Self {
            parametrization,
            parameters: vec![],
            positions: vec![],
        }
    }

    pub fn parametrization(&self) -> Parametrization {
        self.parametrization
    }

    /// Takes effect on the next rebuild
    pub fn set_parametrization(&mut self, parametrization: Parametrization) {
        self.parametrization = parametrization;
    }

    pub fn parameters(&self) -> &[T] {
        &self.parameters
    }

    /// Recompute the parameter array
    /// # Failures
    /// - the parametrization is not implemented; the parameter cache is cleared so nothing stale is evaluated
    pub fn rebuild(&mut self, points: &[ControlPoint<T>]) -> anyhow::Result<RebuildReport> {
        self.positions = points.iter().map(|p| *p.position()).collect();
        match self.parametrization.parameterize(points.len()) {
            Ok(parameters) => {
                self.parameters = parameters;
                Ok(RebuildReport::new())
            }
            Err(e) => {
                self.parameters.clear();
                Err(e)
            }
        }
    }

    pub fn point_at(&self, t: T) -> anyhow::Result<Point3<T>> {
        check_parameter(t)?;
        let n = self.positions.len();
        ensure_point_count(n, 2)?;
        if self.parameters.len() != n {
            return Err(CurveError::UnsupportedParametrization(self.parametrization).into());
        }

        // last segment whose start parameter is <= t
        let j = self
            .parameters
            .partition_point(|u| *u <= t)
            .saturating_sub(1)
            .min(n - 2);
        let (t0, t1) = (self.parameters[j], self.parameters[j + 1]);
        let omega = (t - t0) / (t1 - t0);
        let (p0, p1) = (&self.positions[j], &self.positions[j + 1]);
        Ok(Point3::from(p0.coords * (T::one() - omega) + p1.coords * omega))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    use super::LinearInterpolationBuilder;
    use crate::{builder::Parametrization, misc::CurveError, point::ControlPoint};

    fn zigzag() -> Vec<ControlPoint<f64>> {
        vec![
            ControlPoint::from_xyz(0., 0., 0.),
            ControlPoint::from_xyz(1., 1., 0.),
            ControlPoint::from_xyz(2., 0., 0.),
            ControlPoint::from_xyz(3., 1., 0.),
        ]
    }

    #[test]
    fn uniform_zigzag() {
        let mut builder = LinearInterpolationBuilder::new(Parametrization::Uniform);
        builder.rebuild(&zigzag()).unwrap();
        assert_eq!(builder.parameters(), &[0., 1. / 3., 2. / 3., 1.]);
        assert_eq!(builder.point_at(1. / 3.).unwrap(), Point3::new(1., 1., 0.));
        assert_relative_eq!(builder.point_at(1. / 6.).unwrap(), Point3::new(0.5, 0.5, 0.));
        assert_eq!(builder.point_at(0.).unwrap(), Point3::new(0., 0., 0.));
        assert_eq!(builder.point_at(1.).unwrap(), Point3::new(3., 1., 0.));
    }

    #[test]
    fn out_of_range_is_an_error() {
        let mut builder = LinearInterpolationBuilder::new(Parametrization::Uniform);
        builder.rebuild(&zigzag()).unwrap();
        for t in [-0.5, 1.000001, 7.] {
            let err = builder.point_at(t).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<CurveError>(),
                Some(CurveError::ParameterOutOfRange { .. })
            ));
        }
    }

    #[test]
    fn unsupported_parametrization_clears_cache() {
        let mut builder = LinearInterpolationBuilder::new(Parametrization::Uniform);
        builder.rebuild(&zigzag()).unwrap();
        builder.set_parametrization(Parametrization::Chordal);
        let err = builder.rebuild(&zigzag()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CurveError>(),
            Some(&CurveError::UnsupportedParametrization(Parametrization::Chordal))
        );
        assert!(builder.parameters().is_empty());
        assert!(builder.point_at(0.5).is_err());
    }

    #[test]
    fn single_point_is_insufficient() {
        let mut builder = LinearInterpolationBuilder::default();
        builder.rebuild(&zigzag()[..1]).unwrap();
        let err = builder.point_at(0.5).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CurveError>(),
            Some(&CurveError::InsufficientControlPoints {
                actual: 1,
                required: 2
            })
        );
    }
}
