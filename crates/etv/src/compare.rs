use marcher_core::compare::{self, Comparison, Tolerance, ToleranceError};
use num_traits::Float;

use crate::Vector;

/// Compares two ensemble vectors coefficient by coefficient.
///
/// Constants are not broadcast here: a size-1 vector only matches another
/// size-1 vector.
///
/// # Errors
///
/// Returns [`ToleranceError`] if either tolerance is negative or non-finite.
pub fn compare_vecs<T: Float>(
    a: &Vector<T>,
    a_name: &str,
    b: &Vector<T>,
    b_name: &str,
    rel: T,
    abs: T,
) -> Result<Comparison<T>, ToleranceError> {
    let tol = Tolerance::new(rel, abs)?;
    Ok(compare::compare(
        a.as_slice(),
        a_name,
        b.as_slice(),
        b_name,
        &tol,
    ))
}
