use std::fmt;

/// A recoverable repair applied to a builder's configuration during rebuild
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Defaulting {
    /// requested degree needs more control points than available
    DegreeLowered { requested: usize, applied: usize },
    /// knot vector did not fit the control points and was regenerated as open uniform
    KnotsRegenerated { expected: usize, found: usize },
    /// weights set on a rational builder did not match the control points,
    /// the control points' own weights were used
    WeightsReset { expected: usize, found: usize },
}

impl fmt::Display for Defaulting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Defaulting::DegreeLowered { requested, applied } => {
                write!(f, "degree {} lowered to {}", requested, applied)
            }
            Defaulting::KnotsRegenerated { expected, found } => write!(
                f,
                "knot vector regenerated, expected {} knots, found {}",
                expected, found
            ),
            Defaulting::WeightsReset { expected, found } => write!(
                f,
                "weights reset, expected {} weights, found {}",
                expected, found
            ),
        }
    }
}

/// Everything a rebuild had to repair
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebuildReport {
    defaultings: Vec<Defaulting>,
}

impl RebuildReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a repair and emit a warning
    pub(crate) fn push(&mut self, defaulting: Defaulting) {
        #[cfg(feature = "log")]
        log::warn!("{}", defaulting);
        self.defaultings.push(defaulting);
    }

    /// `true` if the configuration was used as given
    pub fn is_clean(&self) -> bool {
        self.defaultings.is_empty()
    }

    pub fn defaultings(&self) -> &[Defaulting] {
        &self.defaultings
    }

    pub fn degree_lowered(&self) -> bool {
        self.defaultings
            .iter()
            .any(|d| matches!(d, Defaulting::DegreeLowered { .. }))
    }

    pub fn knots_regenerated(&self) -> bool {
        self.defaultings
            .iter()
            .any(|d| matches!(d, Defaulting::KnotsRegenerated { .. }))
    }

    pub fn weights_defaulted(&self) -> bool {
        self.defaultings
            .iter()
            .any(|d| matches!(d, Defaulting::WeightsReset { .. }))
    }
}
