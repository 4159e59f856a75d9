use std::marker::PhantomData;

use num_traits::Float;
use thiserror::Error;

use crate::{
    Vector,
    op::{BinaryOp, UnaryOp},
};

/// Two operands of an expression have incompatible sizes.
///
/// Sizes are compatible when they are equal or one of them is 1.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("operand sizes {left} and {right} do not agree")]
pub struct SizeMismatch {
    pub left: usize,
    pub right: usize,
}

/// Combines the sizes of two operands, broadcasting size 1.
pub(crate) fn combine_sizes(left: usize, right: usize) -> Result<usize, SizeMismatch> {
    match (left, right) {
        (l, r) if l == r => Ok(l),
        (1, r) => Ok(r),
        (l, 1) => Ok(l),
        _ => Err(SizeMismatch { left, right }),
    }
}

/// A lazily evaluated vector expression.
///
/// Nothing is computed until the expression is evaluated into a [`Vector`]
/// with [`Expr::eval`], [`Vector::from_expr`], or [`Vector::assign`]. Then
/// each coefficient is computed in a single pass, without temporaries for
/// intermediate results.
pub trait Expr: Sized {
    type Value: Float;

    /// Returns the size of the result, assuming the operands agree.
    fn size(&self) -> usize;

    /// Returns coefficient `i` of the result.
    ///
    /// Size-1 operands broadcast, returning their single value for any `i`.
    fn coeff(&self, i: usize) -> Self::Value;

    /// Returns the size of the result, checking that every pair of operands
    /// agrees.
    ///
    /// # Errors
    ///
    /// Returns [`SizeMismatch`] for the first pair of incompatible operands.
    fn check_size(&self) -> Result<usize, SizeMismatch>;

    /// Evaluates the expression into a new vector.
    ///
    /// # Panics
    ///
    /// Panics if operand sizes do not agree. Use [`Expr::try_eval`] to
    /// handle the mismatch instead.
    fn eval(self) -> Vector<Self::Value> {
        Vector::from_expr(self)
    }

    /// Evaluates the expression into a new vector.
    ///
    /// # Errors
    ///
    /// Returns [`SizeMismatch`] if operand sizes do not agree.
    fn try_eval(self) -> Result<Vector<Self::Value>, SizeMismatch> {
        Vector::try_from_expr(self)
    }
}

/// Values usable as an expression operand.
///
/// Every [`Expr`] converts to itself, and plain `f64`/`f32` values become
/// broadcasting [`Scalar`]s.
pub trait IntoExpr {
    type Value: Float;
    type Expr: Expr<Value = Self::Value>;

    fn into_expr(self) -> Self::Expr;
}

impl<E: Expr> IntoExpr for E {
    type Value = E::Value;
    type Expr = E;

    fn into_expr(self) -> E {
        self
    }
}

macro_rules! scalar_into_expr {
    ($($t:ty),*) => {$(
        impl IntoExpr for $t {
            type Value = $t;
            type Expr = Scalar<$t>;

            fn into_expr(self) -> Scalar<$t> {
                Scalar(self)
            }
        }
    )*};
}

scalar_into_expr!(f64, f32);

/// A scalar operand, broadcast to every coefficient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scalar<T>(pub T);

impl<T: Float> Expr for Scalar<T> {
    type Value = T;

    fn size(&self) -> usize {
        1
    }

    fn coeff(&self, _i: usize) -> T {
        self.0
    }

    fn check_size(&self) -> Result<usize, SizeMismatch> {
        Ok(1)
    }
}

impl<T: Float> Expr for &Vector<T> {
    type Value = T;

    fn size(&self) -> usize {
        Vector::size(self)
    }

    fn coeff(&self, i: usize) -> T {
        Vector::coeff(self, i)
    }

    fn check_size(&self) -> Result<usize, SizeMismatch> {
        Ok(Vector::size(self))
    }
}

/// A unary operation applied to every coefficient of an expression.
#[derive(Debug, Clone, Copy)]
pub struct Unary<E, Op> {
    expr: E,
    op: PhantomData<Op>,
}

impl<E, Op> Unary<E, Op> {
    pub(crate) fn new(expr: E) -> Self {
        Self {
            expr,
            op: PhantomData,
        }
    }
}

impl<E: Expr, Op: UnaryOp> Expr for Unary<E, Op> {
    type Value = E::Value;

    fn size(&self) -> usize {
        self.expr.size()
    }

    fn coeff(&self, i: usize) -> E::Value {
        Op::apply(self.expr.coeff(i))
    }

    fn check_size(&self) -> Result<usize, SizeMismatch> {
        self.expr.check_size()
    }
}

/// A binary operation applied coefficient-wise to two expressions.
#[derive(Debug, Clone, Copy)]
pub struct Binary<L, R, Op> {
    left: L,
    right: R,
    op: PhantomData<Op>,
}

impl<L, R, Op> Binary<L, R, Op> {
    pub(crate) fn new(left: L, right: R) -> Self {
        Self {
            left,
            right,
            op: PhantomData,
        }
    }
}

impl<L, R, Op> Expr for Binary<L, R, Op>
where
    L: Expr,
    R: Expr<Value = L::Value>,
    Op: BinaryOp,
{
    type Value = L::Value;

    fn size(&self) -> usize {
        let (left, right) = (self.left.size(), self.right.size());
        combine_sizes(left, right).unwrap_or(left.max(right))
    }

    fn coeff(&self, i: usize) -> L::Value {
        Op::apply(self.left.coeff(i), self.right.coeff(i))
    }

    fn check_size(&self) -> Result<usize, SizeMismatch> {
        combine_sizes(self.left.check_size()?, self.right.check_size()?)
    }
}
