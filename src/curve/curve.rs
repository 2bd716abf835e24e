use nalgebra::{Matrix4, Point3, Vector3};

use crate::{
    builder::{CurveBuilder, CurveKind, RebuildReport},
    misc::{EndPoints, FloatingPoint, Invertible, Transformable},
    point::{ControlPoint, ControlPoints, PointHandle},
};

/// Default resolution of the sample cache
pub const DEFAULT_INTERPOLATED_POINT_COUNT: usize = 100;

/// Whether the cached samples reflect the current control points and builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveState {
    Idle,
    /// a mutation happened and the last rebuild failed or has not run yet
    Dirty,
}

/// A curve entity
/// owns the control points, the active builder and a cache of sampled points.
/// Every mutation rebuilds the builder and resamples immediately.
#[derive(Clone, Debug)]
pub struct Curve<T: FloatingPoint> {
    control_points: ControlPoints<T>,
    builder: CurveBuilder<T>,
    interpolated_point_count: usize,
    samples: Vec<Point3<T>>,
    state: CurveState,
    last_report: RebuildReport,
}

impl<T: FloatingPoint> Curve<T> {
    /// Create a curve and compute its samples
    /// # Failures
    /// - the builder cannot be rebuilt from the points (e.g. unsupported parametrization)
    ///
    /// # Example
    /// ```
    /// use spline_core::prelude::*;
    ///
    /// let curve = Curve::<f64>::try_new(
    ///     CurveBuilder::bspline(2),
    ///     vec![
    ///         ControlPoint::from_xyz(0., 0., 0.),
    ///         ControlPoint::from_xyz(1., 1., 0.),
    ///         ControlPoint::from_xyz(2., 0., 0.),
    ///     ],
    /// )
    /// .unwrap();
    /// assert_eq!(curve.samples().len(), 100);
    /// let p = curve.point_at(0.5).unwrap();
    /// assert!((p.y - 0.5).abs() < 1e-12);
    /// ```
    pub fn try_new(
        builder: CurveBuilder<T>,
        points: impl IntoIterator<Item = ControlPoint<T>>,
    ) -> anyhow::Result<Self> {
        let mut curve = Self {
            control_points: points.into_iter().collect(),
            builder,
            interpolated_point_count: DEFAULT_INTERPOLATED_POINT_COUNT,
            samples: vec![],
            state: CurveState::Dirty,
            last_report: RebuildReport::new(),
        };
        curve.seed_point_weights();
        curve.refresh()?;
        Ok(curve)
    }

    pub fn control_points(&self) -> &ControlPoints<T> {
        &self.control_points
    }

    pub fn builder(&self) -> &CurveBuilder<T> {
        &self.builder
    }

    pub fn kind(&self) -> CurveKind {
        self.builder.kind()
    }

    pub fn degree(&self) -> usize {
        self.builder.degree()
    }

    pub fn state(&self) -> CurveState {
        self.state
    }

    /// Repairs applied by the last successful rebuild
    pub fn last_report(&self) -> &RebuildReport {
        &self.last_report
    }

    pub fn interpolated_point_count(&self) -> usize {
        self.interpolated_point_count
    }

    /// Sampled points, `interpolated_point_count` of them while there is something to sample
    pub fn samples(&self) -> &[Point3<T>] {
        &self.samples
    }

    pub fn set_interpolated_point_count(&mut self, count: usize) -> anyhow::Result<RebuildReport> {
        self.interpolated_point_count = count;
        self.refresh()
    }

    /// Append a control point
    /// the point is taken back out if the curve cannot be rebuilt with it
    pub fn add_point(&mut self, point: ControlPoint<T>) -> anyhow::Result<PointHandle> {
        let handle = self.control_points.push(point);
        self.refresh_or_withdraw(handle)?;
        Ok(handle)
    }

    /// Insert a control point at `index` in curve order
    /// the point is taken back out if the curve cannot be rebuilt with it
    pub fn insert_point(
        &mut self,
        index: usize,
        point: ControlPoint<T>,
    ) -> anyhow::Result<PointHandle> {
        let handle = self.control_points.insert(index, point)?;
        self.refresh_or_withdraw(handle)?;
        Ok(handle)
    }

    fn refresh_or_withdraw(&mut self, handle: PointHandle) -> anyhow::Result<()> {
        if let Err(e) = self.refresh() {
            self.control_points.remove(handle)?;
            self.refresh_or_mark_dirty();
            return Err(e);
        }
        Ok(())
    }

    pub fn remove_point(&mut self, handle: PointHandle) -> anyhow::Result<ControlPoint<T>> {
        let point = self.control_points.remove(handle)?;
        self.refresh()?;
        Ok(point)
    }

    pub fn set_point(&mut self, handle: PointHandle, position: Point3<T>) -> anyhow::Result<()> {
        self.control_points.set_position(handle, position)?;
        self.refresh()?;
        Ok(())
    }

    pub fn set_point_weight(&mut self, handle: PointHandle, weight: T) -> anyhow::Result<()> {
        self.control_points.set_weight(handle, weight)?;
        self.refresh()?;
        Ok(())
    }

    /// Replace every control point, previous handles become invalid
    pub fn set_points(
        &mut self,
        points: impl IntoIterator<Item = ControlPoint<T>>,
    ) -> anyhow::Result<Vec<PointHandle>> {
        self.control_points.clear();
        let handles = points
            .into_iter()
            .map(|p| self.control_points.push(p))
            .collect();
        self.refresh()?;
        Ok(handles)
    }

    /// Switch the curve family, nothing is carried over from the previous builder
    /// weights of a rational builder are copied onto the control points if there is one per point
    pub fn set_builder(&mut self, builder: CurveBuilder<T>) -> anyhow::Result<RebuildReport> {
        self.builder = builder;
        self.seed_point_weights();
        self.refresh()
    }

    /// Change the active builder's parameters in place
    ///
    /// # Example
    /// ```
    /// use spline_core::prelude::*;
    ///
    /// let points = (0..5).map(|i| ControlPoint::from_xyz(i as f64, (i % 2) as f64, 0.));
    /// let mut curve = Curve::try_new(CurveBuilder::bspline(3), points).unwrap();
    /// curve
    ///     .configure_builder(|builder| {
    ///         if let CurveBuilder::BSpline(b) = builder {
    ///             b.set_degree(2);
    ///         }
    ///     })
    ///     .unwrap();
    /// assert_eq!(curve.degree(), 2);
    /// ```
    pub fn configure_builder<F>(&mut self, configure: F) -> anyhow::Result<RebuildReport>
    where
        F: FnOnce(&mut CurveBuilder<T>),
    {
        configure(&mut self.builder);
        self.seed_point_weights();
        self.refresh()
    }

    /// Copy the builder's weights onto the control points when there is one per point
    /// the points own the weights from then on
    fn seed_point_weights(&mut self) {
        let Some(weights) = self.builder.weights().map(|w| w.to_vec()) else {
            return;
        };
        if weights.len() != self.control_points.len() {
            return;
        }
        let handles = self.control_points.handles().to_vec();
        for (handle, weight) in handles.into_iter().zip(weights) {
            if let Some(point) = self.control_points.get_mut(handle) {
                point.set_weight(weight);
            }
        }
    }

    /// Rebuild the builder from the control points and resample
    /// The curve stays `Dirty` with an empty cache if the rebuild fails.
    pub fn refresh(&mut self) -> anyhow::Result<RebuildReport> {
        self.state = CurveState::Dirty;
        self.samples.clear();

        let points = self.control_points.to_vec();
        let report = self.builder.rebuild(&points)?;
        self.samples = self.resample(points.len())?;

        #[cfg(feature = "log")]
        log::trace!(
            "rebuilt {} curve with {} control points into {} samples",
            self.builder.kind(),
            points.len(),
            self.samples.len()
        );

        self.state = CurveState::Idle;
        self.last_report = report.clone();
        Ok(report)
    }

    fn resample(&self, point_count: usize) -> anyhow::Result<Vec<Point3<T>>> {
        let n = self.interpolated_point_count;
        if n < 2 || point_count < self.builder.min_control_points() {
            return Ok(vec![]);
        }

        let last = T::from_usize(n - 1).unwrap();
        (0..n)
            .map(|i| self.builder.point_at(T::from_usize(i).unwrap() / last))
            .collect()
    }

    fn ensure_idle(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.state == CurveState::Idle,
            "Curve was mutated but could not be rebuilt"
        );
        Ok(())
    }

    /// Evaluate the curve at `t` in [0, 1]
    pub fn point_at(&self, t: T) -> anyhow::Result<Point3<T>> {
        self.ensure_idle()?;
        self.builder.point_at(t)
    }

    /// The point (as a vector) followed by derivatives up to `min(order, degree)`
    /// Empty for families without derivative support.
    pub fn derivatives_at(&self, t: T, order: usize) -> anyhow::Result<Vec<Vector3<T>>> {
        self.ensure_idle()?;
        self.builder.derivatives_at(t, order)
    }

    pub fn tangent_at(&self, t: T) -> anyhow::Result<Option<Vector3<T>>> {
        self.ensure_idle()?;
        self.builder.tangent_at(t)
    }

    /// Refresh after a mutation that cannot report failure
    fn refresh_or_mark_dirty(&mut self) {
        if let Err(_e) = self.refresh() {
            #[cfg(feature = "log")]
            log::warn!("curve left dirty: {}", _e);
        }
    }
}

impl<T: FloatingPoint> EndPoints<T> for Curve<T> {
    fn first_point(&self) -> anyhow::Result<Point3<T>> {
        self.point_at(T::zero())
    }

    fn end_point(&self) -> anyhow::Result<Point3<T>> {
        self.point_at(T::one())
    }
}

impl<'a, T: FloatingPoint> Transformable<&'a Matrix4<T>> for Curve<T> {
    /// Apply a homogeneous transform to every control point and rebuild
    /// the curve is left `Dirty` if the rebuild fails
    fn transform(&mut self, transform: &'a Matrix4<T>) {
        let handles = self.control_points.handles().to_vec();
        for handle in handles {
            if let Some(point) = self.control_points.get_mut(handle) {
                let transformed = transform.transform_point(point.position());
                point.set_position(transformed);
            }
        }
        self.refresh_or_mark_dirty();
    }
}

impl<T: FloatingPoint> Invertible for CurveBuilder<T> {
    /// Reverse knots and weights so the family matches reversed control points
    fn invert(&mut self) {
        match self {
            CurveBuilder::RationalBezier(b) => {
                let mut weights = b.weights().to_vec();
                weights.reverse();
                b.set_weights(weights);
            }
            CurveBuilder::BSpline(b) => {
                let knots = b.knots().inverse();
                b.set_knots(knots);
            }
            CurveBuilder::RationalBSpline(b) => {
                let knots = b.knots().inverse();
                let mut weights = b.weights().to_vec();
                weights.reverse();
                b.set_knots(knots);
                b.set_weights(weights);
            }
            CurveBuilder::Parametric(_)
            | CurveBuilder::LinearInterpolation(_)
            | CurveBuilder::Bezier(_) => {}
        }
    }
}

impl<T: FloatingPoint> Invertible for Curve<T> {
    /// Reverse the direction of the curve
    /// closed-form curves are not affected
    fn invert(&mut self) {
        if self.builder.kind() == CurveKind::Parametric {
            return;
        }
        self.control_points.reverse();
        self.builder.invert();
        self.refresh_or_mark_dirty();
    }
}
