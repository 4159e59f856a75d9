//! Element-wise math functions on expressions.
//!
//! Each function accepts any [`IntoExpr`] operand, so vectors, scalars, and
//! unevaluated expressions mix freely:
//!
//! ```
//! use marcher_etv::{Expr, Vector, math};
//!
//! let x: Vector<f64> = Vector::from_vec(vec![0.0, 1.0]);
//! let y = math::exp(-&x).eval();
//! assert_eq!(y[0], 1.0);
//! ```

use crate::{
    expr::{Binary, IntoExpr, Unary},
    op,
};

macro_rules! unary_functions {
    ($($(#[$doc:meta])* $name:ident => $Op:ident;)*) => {$(
        $(#[$doc])*
        pub fn $name<E: IntoExpr>(x: E) -> Unary<E::Expr, op::$Op> {
            Unary::new(x.into_expr())
        }
    )*};
}

macro_rules! binary_functions {
    ($($(#[$doc:meta])* $name:ident => $Op:ident;)*) => {$(
        $(#[$doc])*
        pub fn $name<L, R>(a: L, b: R) -> Binary<L::Expr, R::Expr, op::$Op>
        where
            L: IntoExpr,
            R: IntoExpr<Value = L::Value>,
        {
            Binary::new(a.into_expr(), b.into_expr())
        }
    )*};
}

unary_functions! {
    exp => Exp;
    /// Natural logarithm.
    log => Log;
    log10 => Log10;
    sqrt => Sqrt;
    sin => Sin;
    cos => Cos;
    tan => Tan;
    sinh => Sinh;
    cosh => Cosh;
    tanh => Tanh;
    asin => ASin;
    acos => ACos;
    atan => ATan;
    asinh => ASinh;
    acosh => ACosh;
    atanh => ATanh;
}

binary_functions! {
    /// `a` raised to the power `b`.
    pow => Pow;
    /// Four-quadrant arctangent of `a / b`.
    atan2 => Atan2;
    max => Max;
    min => Min;
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::{Expr, Vector};

    #[test]
    fn unary_functions_apply_per_coefficient() {
        let x = Vector::from_vec(vec![0.25_f64, 0.5, 0.75]);
        let y = (sqrt(&x) + log(&x) * tanh(&x)).eval();
        for i in 0..3 {
            assert_relative_eq!(y[i], x[i].sqrt() + x[i].ln() * x[i].tanh());
        }
    }

    #[test]
    fn binary_functions_mix_scalars_and_vectors() {
        let x = Vector::from_vec(vec![1.0_f64, 2.0, 3.0]);
        assert_eq!(pow(&x, 2.0).eval().as_slice(), &[1.0, 4.0, 9.0]);
        assert_eq!(pow(2.0, &x).eval().as_slice(), &[2.0, 4.0, 8.0]);
        assert_eq!(max(&x, 2.0).eval().as_slice(), &[2.0, 2.0, 3.0]);
        assert_eq!(min(Vector::constant(1.5), &x).eval().as_slice(), &[1.0, 1.5, 1.5]);
        assert_relative_eq!(atan2(&x, 1.0).eval()[0], std::f64::consts::FRAC_PI_4);
    }
}
