use std::{fmt, str::FromStr};

/// Family tag of a curve builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CurveKind {
    Parametric,
    LinearInterpolation,
    Bezier,
    RationalBezier,
    BSpline,
    RationalBSpline,
}

impl CurveKind {
    pub const ALL: [CurveKind; 6] = [
        CurveKind::Parametric,
        CurveKind::LinearInterpolation,
        CurveKind::Bezier,
        CurveKind::RationalBezier,
        CurveKind::BSpline,
        CurveKind::RationalBSpline,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CurveKind::Parametric => "parametric",
            CurveKind::LinearInterpolation => "linear_interpolation",
            CurveKind::Bezier => "bezier",
            CurveKind::RationalBezier => "rational_bezier",
            CurveKind::BSpline => "b_spline",
            CurveKind::RationalBSpline => "rational_b_spline",
        }
    }

    pub fn is_rational(&self) -> bool {
        matches!(self, CurveKind::RationalBezier | CurveKind::RationalBSpline)
    }
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurveKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CurveKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown curve kind: {}", s))
    }
}
