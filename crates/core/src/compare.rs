//! Tolerant element-wise comparison of coefficient sequences.
//!
//! Two sequences `a` and `b` compare equal when they have the same length and
//! every pair of coefficients satisfies
//!
//! ```text
//! |a[i] - b[i]| <= abs_tol + rel_tol * max(|a[i]|, |b[i]|)
//! ```
//!
//! The absolute term keeps values near zero from failing spuriously while the
//! relative term scales with the magnitude of the operands. Setting both
//! tolerances to zero reduces the check to exact equality.
//!
//! The scan is aggregate: every failing index is recorded, and the
//! [`Comparison`] report renders each failure followed by both sequences.
//! A length mismatch is reported immediately without comparing elements.
//! Because the check is `err > tol`, a NaN error never counts as a failure.

use std::fmt;

use num_traits::Float;
use thiserror::Error;

/// Errors that can occur when constructing a [`Tolerance`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ToleranceError {
    #[error("relative tolerance must be finite and non-negative")]
    Rel,

    #[error("absolute tolerance must be finite and non-negative")]
    Abs,
}

/// Relative and absolute tolerances for [`compare`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance<T> {
    rel: T,
    abs: T,
}

impl<T: Float> Tolerance<T> {
    /// Creates a new tolerance pair.
    ///
    /// # Errors
    ///
    /// Returns an error if either tolerance is negative or non-finite.
    pub fn new(rel: T, abs: T) -> Result<Self, ToleranceError> {
        if !rel.is_finite() || rel < T::zero() {
            return Err(ToleranceError::Rel);
        }
        if !abs.is_finite() || abs < T::zero() {
            return Err(ToleranceError::Abs);
        }
        Ok(Self { rel, abs })
    }

    /// Returns tolerances that demand exact equality.
    #[must_use]
    pub fn exact() -> Self {
        Self {
            rel: T::zero(),
            abs: T::zero(),
        }
    }

    #[must_use]
    pub fn rel(&self) -> T {
        self.rel
    }

    #[must_use]
    pub fn abs(&self) -> T {
        self.abs
    }

    /// Returns the allowed error for the pair `(a, b)`.
    #[must_use]
    pub fn bound(&self, a: T, b: T) -> T {
        self.abs + self.rel * a.abs().max(b.abs())
    }
}

/// A single coefficient pair that exceeded its tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mismatch<T> {
    pub index: usize,
    pub a: T,
    pub b: T,
    pub err: T,
    pub tol: T,
}

/// The verdict of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// Same length and every coefficient within tolerance.
    Passed,

    /// The sequences have different lengths; no elements were compared.
    SizeMismatch { a_len: usize, b_len: usize },

    /// One or more coefficients exceeded their tolerance.
    Failed(Vec<Mismatch<T>>),
}

/// The result of [`compare`], renderable as a diagnostic report.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison<T> {
    a_name: String,
    b_name: String,
    a: Vec<T>,
    b: Vec<T>,
    outcome: Outcome<T>,
}

impl<T> Comparison<T> {
    /// Returns true if the comparison succeeded.
    #[must_use]
    pub fn passed(&self) -> bool {
        matches!(self.outcome, Outcome::Passed)
    }

    #[must_use]
    pub fn outcome(&self) -> &Outcome<T> {
        &self.outcome
    }

    /// Returns the failing coefficients, empty unless the outcome is
    /// [`Outcome::Failed`].
    #[must_use]
    pub fn failures(&self) -> &[Mismatch<T>] {
        match &self.outcome {
            Outcome::Failed(failures) => failures,
            Outcome::Passed | Outcome::SizeMismatch { .. } => &[],
        }
    }
}

/// Compares two coefficient sequences element by element.
///
/// `a_name` and `b_name` label the sequences in the report.
pub fn compare<T: Float>(
    a: &[T],
    a_name: &str,
    b: &[T],
    b_name: &str,
    tol: &Tolerance<T>,
) -> Comparison<T> {
    let outcome = if a.len() == b.len() {
        let failures: Vec<_> = a
            .iter()
            .zip(b)
            .enumerate()
            .filter_map(|(index, (&a, &b))| {
                let err = (a - b).abs();
                let tol = tol.bound(a, b);
                (err > tol).then_some(Mismatch {
                    index,
                    a,
                    b,
                    err,
                    tol,
                })
            })
            .collect();

        if failures.is_empty() {
            Outcome::Passed
        } else {
            Outcome::Failed(failures)
        }
    } else {
        Outcome::SizeMismatch {
            a_len: a.len(),
            b_len: b.len(),
        }
    };

    Comparison {
        a_name: a_name.to_owned(),
        b_name: b_name.to_owned(),
        a: a.to_vec(),
        b: b.to_vec(),
        outcome,
    }
}

impl<T: fmt::Display> fmt::Display for Comparison<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (a_name, b_name) = (&self.a_name, &self.b_name);
        write!(f, "Comparing {a_name} == {b_name} ... ")?;

        match &self.outcome {
            Outcome::Passed => write!(f, "passed"),
            Outcome::SizeMismatch { a_len, b_len } => write!(
                f,
                "\nError, {a_name}.size() = {a_len} == {b_name}.size() = {b_len} : failed!"
            ),
            Outcome::Failed(failures) => {
                for Mismatch {
                    index,
                    a,
                    b,
                    err,
                    tol,
                } in failures
                {
                    write!(
                        f,
                        "\nError, relErr({a_name}[{index}],{b_name}[{index}]) = \
                         relErr({a},{b}) = {err} <= tol = {tol}: failed!"
                    )?;
                }
                write!(
                    f,
                    "\n{a_name} = {}\n{b_name} = {}",
                    Coeffs(&self.a),
                    Coeffs(&self.b)
                )
            }
        }
    }
}

/// Formats a coefficient slice as `[ c0 c1 ... ]`.
pub struct Coeffs<'a, T>(pub &'a [T]);

impl<T: fmt::Display> fmt::Display for Coeffs<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for value in self.0 {
            write!(f, " {value}")?;
        }
        f.write_str(" ]")
    }
}

/// Types that expose their coefficients as a contiguous slice.
///
/// Used by [`assert_all_close!`](crate::assert_all_close) to accept vectors,
/// arrays, and slices alike.
pub trait Coefficients {
    type Value;

    fn coefficients(&self) -> &[Self::Value];
}

impl<T> Coefficients for [T] {
    type Value = T;

    fn coefficients(&self) -> &[T] {
        self
    }
}

impl<T, const N: usize> Coefficients for [T; N] {
    type Value = T;

    fn coefficients(&self) -> &[T] {
        self
    }
}

impl<T> Coefficients for Vec<T> {
    type Value = T;

    fn coefficients(&self) -> &[T] {
        self
    }
}

impl<T: nalgebra::Scalar> Coefficients for nalgebra::DVector<T> {
    type Value = T;

    fn coefficients(&self) -> &[T] {
        self.as_slice()
    }
}

/// Asserts that two coefficient sequences agree within a [`Tolerance`].
///
/// On failure, panics with the full [`Comparison`] report.
///
/// ```
/// use marcher_core::{assert_all_close, compare::Tolerance};
///
/// let tol = Tolerance::new(1e-4, 1e-5).unwrap();
/// assert_all_close!(vec![0.1, 0.2], [0.1, 0.2], tol);
/// ```
#[macro_export]
macro_rules! assert_all_close {
    ($a:expr, $b:expr, $tol:expr $(,)?) => {{
        let comparison = $crate::compare::compare(
            $crate::compare::Coefficients::coefficients(&$a),
            stringify!($a),
            $crate::compare::Coefficients::coefficients(&$b),
            stringify!($b),
            &$tol,
        );
        assert!(comparison.passed(), "{comparison}");
    }};
}
