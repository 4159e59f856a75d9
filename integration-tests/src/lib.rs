//! Hand-rolled reference solutions shared by the integration tests.
//!
//! These loops deliberately avoid the solver crate so that results from
//! steppers, integrators, and adjoints can be checked against an independent
//! implementation.

use marcher_core::{DMatrix, DVector};

/// Right-hand side of the Van der Pol oscillator.
pub fn vdp_rhs(eps: f64, x: &DVector) -> DVector {
    DVector::from_vec(vec![x[1], eps * (1.0 - x[0] * x[0]) * x[1] - x[0]])
}

/// Jacobian `∂f/∂x` of the Van der Pol right-hand side.
pub fn vdp_rhs_jacobian(eps: f64, x: &DVector) -> DMatrix {
    DMatrix::from_row_slice(
        2,
        2,
        &[
            0.0,
            1.0,
            -2.0 * eps * x[0] * x[1] - 1.0,
            eps * (1.0 - x[0] * x[0]),
        ],
    )
}

/// Backward Euler for the Van der Pol oscillator, with each step solved by
/// Newton iteration to round-off.
///
/// Returns the states at every step, starting with `x0`.
///
/// # Panics
///
/// Panics if a Newton iteration meets a singular Jacobian or fails to
/// converge.
pub fn vdp_backward_euler(eps: f64, x0: &DVector, dt: f64, steps: usize) -> Vec<DVector> {
    let mut states = vec![x0.clone()];
    for _ in 0..steps {
        let prev = states[states.len() - 1].clone();
        let mut x = prev.clone();
        let mut converged = false;
        for _ in 0..50 {
            let g = &x - &prev - vdp_rhs(eps, &x) * dt;
            let jac = DMatrix::identity(2, 2) - vdp_rhs_jacobian(eps, &x) * dt;
            let dx = jac.lu().solve(&(-g)).expect("nonsingular Newton matrix");
            x += &dx;
            if dx.norm() < 1e-15 * (1.0 + x.norm()) {
                converged = true;
                break;
            }
        }
        assert!(converged, "reference Newton iteration did not converge");
        states.push(x);
    }
    states
}

/// Backward Euler for `λ̇ = M(τ) λ`, where `m(k)` gives `M` at the end of
/// step `k` (1-based).
///
/// Returns the states at every step, starting with `lambda0`.
///
/// # Panics
///
/// Panics if `I / dt - M` is singular for some step.
pub fn linear_backward_euler(
    lambda0: &DVector,
    dt: f64,
    steps: usize,
    m: impl Fn(usize) -> DMatrix,
) -> Vec<DVector> {
    let n = lambda0.len();
    let mut states = vec![lambda0.clone()];
    for k in 1..=steps {
        let lhs = DMatrix::identity(n, n) / dt - m(k);
        let rhs = &states[k - 1] / dt;
        states.push(lhs.lu().solve(&rhs).expect("nonsingular step matrix"));
    }
    states
}
