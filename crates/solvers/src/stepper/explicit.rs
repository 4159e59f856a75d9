use marcher_core::{DVector, InArgs, Model, StatePoint};

use super::Error;

/// Evaluates the right-hand side `f(x, t)` of an explicit model.
pub(super) fn rhs<M: Model>(
    model: &M,
    t: f64,
    x: &DVector,
    p: Option<&DVector>,
) -> Result<DVector, Error> {
    let args = InArgs {
        t,
        x: Some(x.clone()),
        x_dot: None,
        p: p.cloned(),
    };
    model.residual(&args).map_err(Error::model)
}

/// One forward Euler step; `current.x_dot` already holds `f(x_n, t_n)`.
pub(super) fn forward_euler<M: Model>(
    model: &M,
    p: Option<&DVector>,
    current: &StatePoint,
    t_next: f64,
    dt: f64,
) -> Result<StatePoint, Error> {
    let x = &current.x + &current.x_dot * dt;
    let x_dot = rhs(model, t_next, &x, p)?;
    Ok(StatePoint::new(t_next, x, x_dot))
}

/// One step of the classic fourth-order Runge–Kutta scheme.
pub(super) fn rk4<M: Model>(
    model: &M,
    p: Option<&DVector>,
    current: &StatePoint,
    t_next: f64,
    dt: f64,
) -> Result<StatePoint, Error> {
    let (t, x) = (current.t, &current.x);
    let half = 0.5 * dt;

    let k1 = &current.x_dot;
    let k2 = rhs(model, t + half, &(x + k1 * half), p)?;
    let k3 = rhs(model, t + half, &(x + &k2 * half), p)?;
    let k4 = rhs(model, t_next, &(x + &k3 * dt), p)?;

    let x_next = x + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0);
    let x_dot = rhs(model, t_next, &x_next, p)?;
    Ok(StatePoint::new(t_next, x_next, x_dot))
}
