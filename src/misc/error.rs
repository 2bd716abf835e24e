//! Error types for curve evaluation

use thiserror::Error;

use crate::builder::Parametrization;

/// Failures a caller has to handle.
/// Returned wrapped in `anyhow::Error`; use `downcast_ref::<CurveError>()` to match on the kind.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    #[error("Parametrization {0:?} is not implemented")]
    UnsupportedParametrization(Parametrization),

    #[error("Parameter {parameter} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: f64,
        min: f64,
        max: f64,
    },

    #[error("Insufficient control points: got {actual}, required {required}")]
    InsufficientControlPoints { actual: usize, required: usize },

    #[error("Control point handle does not belong to this curve")]
    InvalidPointHandle,

    #[error("Curve cannot be represented as a record: {0}")]
    NotRepresentable(String),
}

impl CurveError {
    pub(crate) fn out_of_range<T: num_traits::ToPrimitive>(parameter: T, min: T, max: T) -> Self {
        CurveError::ParameterOutOfRange {
            parameter: parameter.to_f64().unwrap_or(f64::NAN),
            min: min.to_f64().unwrap_or(f64::NAN),
            max: max.to_f64().unwrap_or(f64::NAN),
        }
    }
}
