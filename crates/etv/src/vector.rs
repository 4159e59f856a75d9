use std::fmt;
use std::ops::{AddAssign, DivAssign, Index, IndexMut, MulAssign, SubAssign};

use marcher_core::compare::{Coeffs, Coefficients};
use num_traits::Float;

use crate::expr::{Expr, IntoExpr, SizeMismatch, combine_sizes};

/// A vector of ensemble coefficients.
///
/// A vector of size 1 is a constant: it broadcasts against vectors of any
/// size in expressions, and [`Vector::coeff`] returns its value for every
/// index. A default-constructed vector has size 0.
///
/// Arithmetic on `&Vector` builds lazy expressions (see [`Expr`]); the
/// result is materialized by [`Vector::from_expr`], [`Expr::eval`], or
/// [`Vector::assign`], which resize the target as needed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vector<T> {
    coeffs: Vec<T>,
}

impl<T: Float> Vector<T> {
    /// Creates a vector of `n` zeros.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            coeffs: vec![T::zero(); n],
        }
    }

    /// Creates a constant (size-1) vector.
    #[must_use]
    pub fn constant(value: T) -> Self {
        Self {
            coeffs: vec![value],
        }
    }

    #[must_use]
    pub fn from_vec(coeffs: Vec<T>) -> Self {
        Self { coeffs }
    }

    /// Resizes to `n` coefficients, all zero.
    pub fn reset(&mut self, n: usize) {
        self.coeffs.clear();
        self.coeffs.resize(n, T::zero());
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.coeffs.len()
    }

    /// Returns true for a size-1 vector.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.coeffs.len() == 1
    }

    /// Returns coefficient `i`, broadcasting a constant vector.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of bounds for a non-constant vector.
    #[must_use]
    pub fn coeff(&self, i: usize) -> T {
        if self.is_constant() {
            self.coeffs[0]
        } else {
            self.coeffs[i]
        }
    }

    /// Returns coefficient `i` without broadcasting.
    #[must_use]
    pub fn fast_access_coeff(&self, i: usize) -> T {
        self.coeffs[i]
    }

    pub fn fast_access_coeff_mut(&mut self, i: usize) -> &mut T {
        &mut self.coeffs[i]
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.coeffs
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.coeffs.iter()
    }

    /// Evaluates an expression into a new vector.
    ///
    /// # Panics
    ///
    /// Panics if operand sizes in `expr` do not agree.
    #[must_use]
    pub fn from_expr<E: IntoExpr<Value = T>>(expr: E) -> Self {
        match Self::try_from_expr(expr) {
            Ok(vector) => vector,
            Err(err) => panic!("cannot evaluate expression: {err}"),
        }
    }

    /// Evaluates an expression into a new vector.
    ///
    /// # Errors
    ///
    /// Returns [`SizeMismatch`] if operand sizes in `expr` do not agree.
    pub fn try_from_expr<E: IntoExpr<Value = T>>(expr: E) -> Result<Self, SizeMismatch> {
        let expr = expr.into_expr();
        let n = expr.check_size()?;
        Ok(Self {
            coeffs: (0..n).map(|i| expr.coeff(i)).collect(),
        })
    }

    /// Replaces the contents with an evaluated expression, resizing to the
    /// expression's size.
    ///
    /// # Panics
    ///
    /// Panics if operand sizes in `expr` do not agree.
    pub fn assign<E: IntoExpr<Value = T>>(&mut self, expr: E) {
        *self = Self::from_expr(expr);
    }

    /// Replaces the contents with an evaluated expression.
    ///
    /// # Errors
    ///
    /// Returns [`SizeMismatch`] and leaves the vector unchanged if operand
    /// sizes in `expr` do not agree.
    pub fn try_assign<E: IntoExpr<Value = T>>(&mut self, expr: E) -> Result<(), SizeMismatch> {
        *self = Self::try_from_expr(expr)?;
        Ok(())
    }

    /// Applies `f(self[i], rhs[i])` in place.
    ///
    /// A size-0 vector acts as the constant zero and a size-1 vector as its
    /// constant, so both grow to the right-hand side's size.
    fn update<E: Expr<Value = T>>(&mut self, rhs: E, f: impl Fn(T, T) -> T) {
        let left = match self.size() {
            0 => 1,
            n => n,
        };
        let n = match rhs.check_size().and_then(|right| combine_sizes(left, right)) {
            Ok(n) => n,
            Err(err) => panic!("cannot apply compound assignment: {err}"),
        };

        if self.size() != n {
            let fill = self.coeffs.first().copied().unwrap_or_else(T::zero);
            self.coeffs = vec![fill; n];
        }
        for (i, c) in self.coeffs.iter_mut().enumerate() {
            *c = f(*c, rhs.coeff(i));
        }
    }
}

impl<T: Float> Expr for Vector<T> {
    type Value = T;

    fn size(&self) -> usize {
        self.coeffs.len()
    }

    fn coeff(&self, i: usize) -> T {
        Vector::coeff(self, i)
    }

    fn check_size(&self) -> Result<usize, SizeMismatch> {
        Ok(self.coeffs.len())
    }

    fn eval(self) -> Self {
        self
    }
}

macro_rules! compound_assign {
    ($($Trait:ident :: $method:ident => $op:tt;)*) => {$(
        /// Compound assignment from an expression or scalar.
        ///
        /// # Panics
        ///
        /// Panics if the sizes of `self` and `rhs` do not agree.
        impl<T: Float, R: IntoExpr<Value = T>> $Trait<R> for Vector<T> {
            fn $method(&mut self, rhs: R) {
                self.update(rhs.into_expr(), |a, b| a $op b);
            }
        }
    )*};
}

compound_assign! {
    AddAssign::add_assign => +;
    SubAssign::sub_assign => -;
    MulAssign::mul_assign => *;
    DivAssign::div_assign => /;
}

impl<T> Index<usize> for Vector<T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        &self.coeffs[i]
    }
}

impl<T> IndexMut<usize> for Vector<T> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.coeffs[i]
    }
}

impl<T> From<Vec<T>> for Vector<T> {
    fn from(coeffs: Vec<T>) -> Self {
        Self { coeffs }
    }
}

impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            coeffs: iter.into_iter().collect(),
        }
    }
}

impl<T> Coefficients for Vector<T> {
    type Value = T;

    fn coefficients(&self) -> &[T] {
        &self.coeffs
    }
}

/// Formats as `[ c0 c1 ... ]`.
impl<T: fmt::Display> fmt::Display for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Coeffs(&self.coeffs), f)
    }
}
