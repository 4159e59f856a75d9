//! Interactive plots of Marcher integrations.
//!
//! # Usage
//!
//! ```text
//! cargo run --example plot --features plot -- vdp
//! cargo run --example plot --features plot -- sincos 0.2
//! ```
//!
//! # Modes
//!
//! - **vdp [dt]** — Integrate the Van der Pol oscillator with backward Euler
//!   over 10 seconds and plot both state components.
//!
//! - **sincos [dt]** — Integrate the linear oscillator with backward Euler and
//!   overlay the exact solution. Backward Euler damps the amplitude; larger
//!   step sizes damp it faster. Try `0.05` (default), `0.2`, `0.5`.

use std::error::Error;

use marcher_core::Model;
use marcher_models::{SinCos, VanDerPol};
use marcher_observers::{Recorder, ShowConfig};
use marcher_solvers::{
    integrator::{self, Integrator},
    nonlinear::newton,
    stepper::{Stepper, StepperAlgorithm},
};

fn main() -> Result<(), Box<dyn Error>> {
    let mode = std::env::args().nth(1).unwrap_or_else(|| "vdp".into());
    let dt = std::env::args()
        .nth(2)
        .as_deref()
        .map(str::parse::<f64>)
        .transpose()
        .unwrap_or_else(|_| {
            eprintln!("Invalid step size — expected a number, e.g. 0.1");
            std::process::exit(1);
        })
        .unwrap_or(0.05);

    match mode.as_str() {
        "vdp" => vdp(dt),
        "sincos" => sincos(dt),
        other => {
            eprintln!("Unknown mode: {other}");
            eprintln!("Usage: plot [vdp|sincos] [dt]");
            std::process::exit(1);
        }
    }
}

fn integrate<M: Model>(
    model: M,
    final_time: f64,
    dt: f64,
    mut record: impl FnMut(&integrator::Event),
) -> Result<(), Box<dyn Error>> {
    let ic = model.nominal_values();
    let solver = newton::Solver::new(newton::Config::new(1e-10, 20)?);
    let stepper = Stepper::new(StepperAlgorithm::BackwardEuler, model, solver, &ic)?;
    let mut integ = Integrator::new(stepper, final_time, integrator::Config::fixed_dt(dt)?, None)?;

    integ.integrate(|event: &integrator::Event| {
        record(event);
        None
    })?;
    Ok(())
}

fn vdp(dt: f64) -> Result<(), Box<dyn Error>> {
    let mut recorder = Recorder::<2>::new(["x_0", "x_1"]);
    integrate(VanDerPol::default(), 10.0, dt, |event| {
        let x = &event.point.x;
        recorder.record(event.point.t, [Some(x[0]), Some(x[1])]);
    })?;

    recorder.show(ShowConfig::new().title("Van der Pol").x_label("t").legend())?;
    Ok(())
}

fn sincos(dt: f64) -> Result<(), Box<dyn Error>> {
    let model = SinCos::default();
    let exact = model.clone();

    let mut recorder = Recorder::<2>::new(["Backward Euler", "Exact"]);
    integrate(model, 10.0, dt, |event| {
        let t = event.point.t;
        recorder.record(t, [Some(event.point.x[0]), Some(exact.exact_solution(t).x[0])]);
    })?;

    recorder.show(ShowConfig::new().title("SinCos").x_label("t").legend())?;
    Ok(())
}
