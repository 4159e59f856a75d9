//! Coefficient-wise operations carried by expression nodes.
//!
//! Each operation is a zero-sized marker type; the node's type records which
//! operation to apply, so an expression tree costs no dispatch at runtime.

use num_traits::Float;

/// An operation on one coefficient.
pub trait UnaryOp {
    fn apply<T: Float>(x: T) -> T;
}

/// An operation on a pair of coefficients.
pub trait BinaryOp {
    fn apply<T: Float>(a: T, b: T) -> T;
}

macro_rules! unary_ops {
    ($($(#[$doc:meta])* $name:ident => |$x:ident| $body:expr;)*) => {$(
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name;

        impl UnaryOp for $name {
            fn apply<T: Float>($x: T) -> T {
                $body
            }
        }
    )*};
}

macro_rules! binary_ops {
    ($($(#[$doc:meta])* $name:ident => |$a:ident, $b:ident| $body:expr;)*) => {$(
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name;

        impl BinaryOp for $name {
            fn apply<T: Float>($a: T, $b: T) -> T {
                $body
            }
        }
    )*};
}

unary_ops! {
    Neg => |x| -x;
    Exp => |x| x.exp();
    /// Natural logarithm.
    Log => |x| x.ln();
    Log10 => |x| x.log10();
    Sqrt => |x| x.sqrt();
    Sin => |x| x.sin();
    Cos => |x| x.cos();
    Tan => |x| x.tan();
    Sinh => |x| x.sinh();
    Cosh => |x| x.cosh();
    Tanh => |x| x.tanh();
    ASin => |x| x.asin();
    ACos => |x| x.acos();
    ATan => |x| x.atan();
    ASinh => |x| x.asinh();
    ACosh => |x| x.acosh();
    ATanh => |x| x.atanh();
}

binary_ops! {
    Add => |a, b| a + b;
    Sub => |a, b| a - b;
    Mul => |a, b| a * b;
    Div => |a, b| a / b;
    Pow => |a, b| a.powf(b);
    Atan2 => |a, b| a.atan2(b);
    /// Larger of the two, ignoring a NaN operand.
    Max => |a, b| a.max(b);
    /// Smaller of the two, ignoring a NaN operand.
    Min => |a, b| a.min(b);
}
