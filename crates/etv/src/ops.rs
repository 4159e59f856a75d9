//! Arithmetic operators that build expression nodes.
//!
//! Every operand type (`&Vector`, `Vector`, [`Scalar`], [`Unary`], and
//! [`Binary`]) accepts any [`IntoExpr`] right-hand side with the same value
//! type. Plain `f64`/`f32` values also work on the left.

use num_traits::Float;

use crate::{
    Vector,
    expr::{Binary, Expr, IntoExpr, Scalar, Unary},
    op::{self, BinaryOp, UnaryOp},
};

macro_rules! expr_operators {
    (@binary [$($gen:tt)*] $lhs:ty, $value:ty, $Trait:ident :: $method:ident, $Op:ty) => {
        impl<$($gen)*, R: IntoExpr<Value = $value>> std::ops::$Trait<R> for $lhs {
            type Output = Binary<$lhs, R::Expr, $Op>;

            fn $method(self, rhs: R) -> Self::Output {
                Binary::new(self, rhs.into_expr())
            }
        }
    };
    ($([$($gen:tt)*] $lhs:ty => $value:ty;)*) => {$(
        expr_operators!(@binary [$($gen)*] $lhs, $value, Add::add, op::Add);
        expr_operators!(@binary [$($gen)*] $lhs, $value, Sub::sub, op::Sub);
        expr_operators!(@binary [$($gen)*] $lhs, $value, Mul::mul, op::Mul);
        expr_operators!(@binary [$($gen)*] $lhs, $value, Div::div, op::Div);

        impl<$($gen)*> std::ops::Neg for $lhs {
            type Output = Unary<$lhs, op::Neg>;

            fn neg(self) -> Self::Output {
                Unary::new(self)
            }
        }
    )*};
}

expr_operators! {
    ['a, T: Float] &'a Vector<T> => T;
    [T: Float] Vector<T> => T;
    [T: Float] Scalar<T> => T;
    [E: Expr, U: UnaryOp] Unary<E, U> => E::Value;
    [A: Expr, B: Expr<Value = A::Value>, O: BinaryOp] Binary<A, B, O> => A::Value;
}

macro_rules! scalar_lhs_operators {
    (@binary $t:ty, [$($gen:tt)*] $rhs:ty, $Trait:ident :: $method:ident, $Op:ty) => {
        impl<$($gen)*> std::ops::$Trait<$rhs> for $t {
            type Output = Binary<Scalar<$t>, $rhs, $Op>;

            fn $method(self, rhs: $rhs) -> Self::Output {
                Binary::new(Scalar(self), rhs)
            }
        }
    };
    (@rhs $t:ty, [$($gen:tt)*] $rhs:ty) => {
        scalar_lhs_operators!(@binary $t, [$($gen)*] $rhs, Add::add, op::Add);
        scalar_lhs_operators!(@binary $t, [$($gen)*] $rhs, Sub::sub, op::Sub);
        scalar_lhs_operators!(@binary $t, [$($gen)*] $rhs, Mul::mul, op::Mul);
        scalar_lhs_operators!(@binary $t, [$($gen)*] $rhs, Div::div, op::Div);
    };
    ($($t:ty),*) => {$(
        scalar_lhs_operators!(@rhs $t, ['a] &'a Vector<$t>);
        scalar_lhs_operators!(@rhs $t, [] Vector<$t>);
        scalar_lhs_operators!(@rhs $t, [E: Expr<Value = $t>, U: UnaryOp] Unary<E, U>);
        scalar_lhs_operators!(
            @rhs $t,
            [A: Expr<Value = $t>, B: Expr<Value = $t>, O: BinaryOp] Binary<A, B, O>
        );
    )*};
}

scalar_lhs_operators!(f64, f32);
