//! Expression-template ensemble vectors.
//!
//! A [`Vector`] holds the coefficients of an ensemble quantity. Arithmetic
//! on vector references and scalars builds a lazy expression tree that is
//! evaluated coefficient by coefficient when assigned, so compound
//! expressions allocate only their result:
//!
//! ```
//! use marcher_etv::{Expr, Vector, math};
//!
//! let x: Vector<f64> = Vector::from_vec(vec![1.0, 2.0, 3.0]);
//! let y: Vector<f64> = Vector::constant(0.5);
//!
//! let z = (2.0 * &x + math::sin(&y)).eval();
//! assert_eq!(z.size(), 3);
//! ```
//!
//! Size-1 vectors are constants and broadcast against any size.

mod compare;
mod expr;
mod ops;
mod vector;

pub mod math;
pub mod op;

pub use compare::compare_vecs;
pub use expr::{Binary, Expr, IntoExpr, Scalar, SizeMismatch, Unary};
pub use vector::Vector;
