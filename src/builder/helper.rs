use std::ops::{Add, Mul};

use nalgebra::{Point3, Vector4};

use crate::misc::{CurveError, FloatingPoint};

/// Fail unless `t` lies in [0, 1]
pub(crate) fn check_parameter<T: FloatingPoint>(t: T) -> anyhow::Result<()> {
    if t >= T::zero() && t <= T::one() {
        Ok(())
    } else {
        Err(CurveError::out_of_range(t, T::zero(), T::one()).into())
    }
}

pub(crate) fn ensure_point_count(actual: usize, required: usize) -> anyhow::Result<()> {
    if actual < required {
        Err(CurveError::InsufficientControlPoints { actual, required }.into())
    } else {
        Ok(())
    }
}

/// Map `t` in [0, 1] onto the knot domain `(start, end)`
pub(crate) fn map_to_domain<T: FloatingPoint>(t: T, (start, end): (T, T)) -> T {
    (start + t * (end - start)).clamp(start, end)
}

/// Collapse the control polygon by repeated linear blending
pub(crate) fn de_casteljau<T, V>(points: &[V], t: T) -> Option<V>
where
    T: FloatingPoint,
    V: Copy + Add<Output = V> + Mul<T, Output = V>,
{
    let mut p = points.to_vec();
    let n = p.len();
    for i in 1..n {
        for j in 0..n - i {
            p[j] = p[j] * (T::one() - t) + p[j + 1] * t;
        }
    }
    p.first().copied()
}

/// Dehomogenize a point, dividing every axis by the weight
pub(crate) fn dehomogenize<T: FloatingPoint>(v: &Vector4<T>) -> anyhow::Result<Point3<T>> {
    let w = v.w;
    anyhow::ensure!(w != T::zero(), "Homogeneous weight vanished during evaluation");
    Ok(Point3::new(v.x / w, v.y / w, v.z / w))
}
