//! Time integration over a range, with state lookup at arbitrary times.
//!
//! An [`Integrator`] drives a [`Stepper`] from the start of its time range to
//! the final time. Step sizes come from the [`IntegrationControl`] in its
//! [`Config`]. Accepted states can be kept in a trailing
//! [`InterpolationBuffer`], which later serves lookups at arbitrary times and
//! is the forward solution an adjoint model is evaluated against.
//!
//! # Lookup
//!
//! [`Integrator::get_fwd_x_and_x_dot`] integrates forward only as far as the
//! requested time, then interpolates. Without a trailing buffer only the last
//! step is available, so lookups must move forward in time.
//!
//! # Observer Events
//!
//! [`Integrator::integrate`] emits one [`Event`] for the initial state and
//! one per accepted step. Observers can return [`Action::StopEarly`] to halt
//! with the state reached so far.

mod action;
mod config;
mod error;
mod event;
mod solution;

pub use action::Action;
pub use config::{Config, ConfigError, IntegrationControl, SimpleControl};
pub use error::Error;
pub use event::Event;
pub use solution::{Solution, Status};

use marcher_core::{DVector, Model, Observer, StatePoint, TimeRange};

use crate::{
    buffer::{InterpolationBuffer, Interpolator},
    nonlinear::NonlinearSolver,
    stepper::{Stepper, StepperAlgorithm},
};

/// Drives a stepper across a time range.
#[derive(Debug, Clone)]
pub struct Integrator<M, S> {
    stepper: Stepper<M, S>,
    initial: StatePoint,
    range: TimeRange,
    config: Config,
    trailing: Option<InterpolationBuffer>,
    previous: Option<StatePoint>,
    steps: usize,
}

impl<M: Model, S: NonlinearSolver> Integrator<M, S> {
    /// Creates an integrator from the stepper's current state to `final_time`.
    ///
    /// The trailing buffer, if given, is cleared and seeded with the
    /// initial state.
    ///
    /// # Errors
    ///
    /// Returns an error if `final_time` is non-finite or before the
    /// stepper's current time.
    pub fn new(
        stepper: Stepper<M, S>,
        final_time: f64,
        config: Config,
        trailing: Option<InterpolationBuffer>,
    ) -> Result<Self, Error> {
        let initial = stepper.current().clone();
        let range = TimeRange::new(initial.t, final_time)?;

        let mut integrator = Self {
            stepper,
            initial,
            range,
            config,
            trailing,
            previous: None,
            steps: 0,
        };
        integrator.reset_history()?;
        Ok(integrator)
    }

    /// Returns the forward time range.
    pub fn fwd_time_range(&self) -> TimeRange {
        self.range
    }

    /// Returns the state and its time derivative at `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if `t` is outside the time range, the state at `t`
    /// has been discarded, or a step fails.
    pub fn get_fwd_x_and_x_dot(&mut self, t: f64) -> Result<(DVector, DVector), Error> {
        let point = self.get_fwd_point(t)?;
        Ok((point.x, point.x_dot))
    }

    /// Returns the state point at `t`, integrating forward if needed.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Integrator::get_fwd_x_and_x_dot`].
    pub fn get_fwd_point(&mut self, t: f64) -> Result<StatePoint, Error> {
        if !self.range.contains(t) {
            return Err(Error::OutOfRange {
                t,
                lower: self.range.lower(),
                upper: self.range.upper(),
            });
        }

        while self.stepper.time() < t && !self.reached_final_time() {
            self.take_step()?;
        }
        self.lookup(t)
    }

    /// Returns the state points at each of `times`.
    ///
    /// # Errors
    ///
    /// Returns the first error from [`Integrator::get_fwd_point`].
    pub fn get_fwd_points(&mut self, times: &[f64]) -> Result<Vec<StatePoint>, Error> {
        times.iter().map(|&t| self.get_fwd_point(t)).collect()
    }

    /// Integrates to the final time.
    ///
    /// # Errors
    ///
    /// Returns an error if a step fails or the step limit is exceeded.
    pub fn integrate<Obs>(&mut self, mut observer: Obs) -> Result<Solution, Error>
    where
        Obs: Observer<Event, Action>,
    {
        if self.steps == 0 {
            let event = Event {
                step: 0,
                dt: 0.0,
                point: self.stepper.current().clone(),
            };
            if let Some(Action::StopEarly) = observer.observe(&event) {
                return Ok(self.solution(Status::StoppedByObserver));
            }
        }

        while !self.reached_final_time() {
            let t_prev = self.stepper.time();
            let point = self.take_step()?.clone();

            let event = Event {
                step: self.steps,
                dt: point.t - t_prev,
                point,
            };
            if let Some(Action::StopEarly) = observer.observe(&event) {
                return Ok(self.solution(Status::StoppedByObserver));
            }
        }

        Ok(self.solution(Status::Complete))
    }

    /// Integrates to the final time without observation.
    ///
    /// # Errors
    ///
    /// Returns an error if a step fails or the step limit is exceeded.
    pub fn integrate_unobserved(&mut self) -> Result<Solution, Error> {
        self.integrate(())
    }

    /// Restarts from the initial state with a new algorithm and final time.
    ///
    /// The stored history is discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if the algorithm cannot step the model or
    /// `final_time` is invalid. On error the integrator is unchanged.
    pub fn set_stepper_algorithm(
        &mut self,
        algorithm: StepperAlgorithm,
        final_time: f64,
    ) -> Result<(), Error> {
        let range = TimeRange::new(self.initial.t, final_time)?;
        self.stepper.set_algorithm(algorithm)?;

        let ic = self.initial.to_args(self.stepper.parameters());
        self.stepper.set_initial_condition(&ic)?;
        self.range = range;
        self.reset_history()
    }

    /// Takes one step, as sized by the integration control.
    fn take_step(&mut self) -> Result<&StatePoint, Error> {
        let t = self.stepper.time();
        if self.steps >= self.config.max_steps() {
            return Err(Error::MaxStepsExceeded {
                max_steps: self.config.max_steps(),
                t,
            });
        }

        let upper = self.range.upper();
        let remaining = upper - t;
        let dt = self.config.control().step_size(&self.range, remaining);

        let previous = self.stepper.current().clone();
        let landing = self.config.land_on_final_time() && dt >= remaining - time_eps(upper);
        let point = if landing {
            self.stepper.take_step_to(upper)?
        } else {
            self.stepper.take_step(dt)?
        };

        if let Some(buffer) = &mut self.trailing {
            buffer.push(point.clone())?;
        }
        self.previous = Some(previous);
        self.steps += 1;
        Ok(self.stepper.current())
    }

    fn reached_final_time(&self) -> bool {
        let upper = self.range.upper();
        self.stepper.time() >= upper - time_eps(upper)
    }

    fn reset_history(&mut self) -> Result<(), Error> {
        if let Some(buffer) = &mut self.trailing {
            buffer.clear();
            buffer.push(self.initial.clone())?;
        }
        self.previous = None;
        self.steps = 0;
        Ok(())
    }

    fn lookup(&self, t: f64) -> Result<StatePoint, Error> {
        let current = self.stepper.current();
        // Without landing, the last step may stop a round-off short of `t`.
        let t = if (t - current.t).abs() <= time_eps(t) {
            current.t
        } else {
            t
        };

        if let Some(buffer) = &self.trailing {
            if buffer.time_range().is_some_and(|(lo, hi)| lo <= t && t <= hi) {
                return Ok(buffer.interpolate(t)?);
            }
        }

        if t == current.t {
            return Ok(current.clone());
        }
        match &self.previous {
            Some(previous) if previous.t <= t && t < current.t => {
                Ok(self.interpolator().interpolate(previous, current, t))
            }
            _ => Err(Error::Unavailable { t }),
        }
    }

    fn solution(&self, status: Status) -> Solution {
        Solution {
            status,
            point: self.stepper.current().clone(),
            steps: self.steps,
        }
    }
}

impl<M, S> Integrator<M, S> {
    pub fn stepper(&self) -> &Stepper<M, S> {
        &self.stepper
    }

    /// Returns the buffer of accepted states, if one is kept.
    pub fn trailing_buffer(&self) -> Option<&InterpolationBuffer> {
        self.trailing.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the number of steps taken since creation or the last reset.
    pub fn steps_taken(&self) -> usize {
        self.steps
    }

    fn interpolator(&self) -> Interpolator {
        self.trailing
            .as_ref()
            .map_or(Interpolator::default(), InterpolationBuffer::interpolator)
    }
}

/// Tolerance for treating two times as equal.
fn time_eps(t: f64) -> f64 {
    1e-12 * t.abs().max(1.0)
}
