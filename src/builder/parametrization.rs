use crate::misc::{CurveError, FloatingPoint};

/// Parameter assignment for the points of an interpolating curve
/// https://en.wikipedia.org/wiki/Centripetal_Catmull%E2%80%93Rom_spline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Parametrization {
    #[default]
    Uniform,
    Chordal,
    Centripetal,
}

impl Parametrization {
    /// Parameters for `count` points, increasing from 0 to 1
    /// Only the uniform parametrization is available.
    pub fn parameterize<T: FloatingPoint>(&self, count: usize) -> anyhow::Result<Vec<T>> {
        match self {
            Parametrization::Uniform => {
                if count < 2 {
                    return Ok(vec![T::zero(); count]);
                }
                let last = T::from_usize(count - 1).unwrap();
                Ok((0..count)
                    .map(|i| T::from_usize(i).unwrap() / last)
                    .collect())
            }
            Parametrization::Chordal | Parametrization::Centripetal => {
                Err(CurveError::UnsupportedParametrization(*self).into())
            }
        }
    }
}
