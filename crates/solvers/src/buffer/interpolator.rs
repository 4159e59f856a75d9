use std::fmt;

use marcher_core::StatePoint;

/// How an [`InterpolationBuffer`](super::InterpolationBuffer) fills in
/// states between stored nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Interpolator {
    /// Linear in both `x` and `ẋ`.
    #[default]
    Linear,

    /// Cubic Hermite in `x` using the stored derivatives, with `ẋ` taken
    /// from the cubic's derivative.
    Hermite,
}

impl Interpolator {
    /// Every interpolator, in the order of [`Interpolator::NAMES`].
    pub const ALL: [Self; 2] = [Self::Linear, Self::Hermite];

    /// Configuration names accepted by [`Interpolator::from_name`].
    pub const NAMES: [&'static str; 2] = ["Linear Interpolator", "Hermite Interpolator"];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => Self::NAMES[0],
            Self::Hermite => Self::NAMES[1],
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|interp| interp.name() == name)
    }

    /// Interpolates between `left` and `right` at `t`.
    ///
    /// Expects `left.t < right.t` and `t` within `[left.t, right.t]`.
    #[must_use]
    pub fn interpolate(self, left: &StatePoint, right: &StatePoint, t: f64) -> StatePoint {
        let h = right.t - left.t;
        let s = (t - left.t) / h;

        match self {
            Self::Linear => {
                let x = &left.x + (&right.x - &left.x) * s;
                let x_dot = &left.x_dot + (&right.x_dot - &left.x_dot) * s;
                StatePoint::new(t, x, x_dot)
            }
            Self::Hermite => {
                let (s2, s3) = (s * s, s * s * s);

                let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
                let h10 = s3 - 2.0 * s2 + s;
                let h01 = -2.0 * s3 + 3.0 * s2;
                let h11 = s3 - s2;
                let x = &left.x * h00
                    + &left.x_dot * (h10 * h)
                    + &right.x * h01
                    + &right.x_dot * (h11 * h);

                let d00 = (6.0 * s2 - 6.0 * s) / h;
                let d10 = 3.0 * s2 - 4.0 * s + 1.0;
                let d11 = 3.0 * s2 - 2.0 * s;
                let x_dot = (&left.x - &right.x) * d00 + &left.x_dot * d10 + &right.x_dot * d11;

                StatePoint::new(t, x, x_dot)
            }
        }
    }
}

impl fmt::Display for Interpolator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
