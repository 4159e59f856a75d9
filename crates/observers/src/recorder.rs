use marcher_core::Observer;

/// Extracts traceable data from a solver event.
///
/// Implement this on your event type to use [`Recorder`] directly as a
/// solver observer (the "direct path"). Return `None` from
/// [`x`][Traceable::x] to skip the event entirely; return `None` in a trace
/// slot to skip that trace for the event.
///
/// For the Newton and integrator event types, use the closure path via
/// [`Recorder::record`] instead, which lets the caller pick which state
/// components to trace.
///
/// # Example — direct path with a local event type
///
/// ```ignore
/// impl Traceable<2> for MyEvent {
///     fn x(&self) -> Option<f64> {
///         Some(self.iteration as f64)
///     }
///
///     fn traces(&self) -> [Option<f64>; 2] {
///         [Some(self.residual), self.step_size]
///     }
/// }
///
/// let mut recorder = Recorder::<2>::new(["Residual", "Step size"]);
/// my_solver::solve(&problem, config, &mut recorder)?;
/// ```
pub trait Traceable<const N: usize> {
    /// The x-axis value for this event, or `None` to skip recording entirely.
    fn x(&self) -> Option<f64>;

    /// The y-axis values for each trace.
    ///
    /// `None` in a slot skips that trace for this event while leaving others
    /// unaffected.
    fn traces(&self) -> [Option<f64>; N];
}

/// An observer that collects named traces of `(x, y)` points.
///
/// The const generic `N` is the number of traces. Record data by either:
///
/// - **Direct path** — Implement [`Traceable<N>`][Traceable] on your event
///   type and pass `&mut Recorder` as the observer.
/// - **Closure path** — Wrap `&mut Recorder` in a closure and call
///   [`record`][Recorder::record] manually.
///
/// # Example — closure path
///
/// ```
/// use marcher_core::Model;
/// use marcher_models::VanDerPol;
/// use marcher_observers::Recorder;
/// use marcher_solvers::{
///     integrator::{self, Integrator},
///     nonlinear::newton,
///     stepper::{Stepper, StepperAlgorithm},
/// };
///
/// let model = VanDerPol::default();
/// let ic = model.nominal_values();
/// let solver = newton::Solver::new(newton::Config::new(1e-10, 20).unwrap());
/// let stepper = Stepper::new(StepperAlgorithm::BackwardEuler, model, solver, &ic).unwrap();
/// let config = integrator::Config::fixed_dt(0.1).unwrap();
/// let mut integ = Integrator::new(stepper, 1.0, config, None).unwrap();
///
/// let mut recorder = Recorder::<2>::new(["x_0", "x_1"]);
/// integ
///     .integrate(|event: &integrator::Event| {
///         let x = &event.point.x;
///         recorder.record(event.point.t, [Some(x[0]), Some(x[1])]);
///         None
///     })
///     .unwrap();
///
/// assert_eq!(recorder.trace(0).len(), 11);
/// ```
#[derive(Debug, Clone)]
pub struct Recorder<const N: usize> {
    names: [String; N],
    data: [Vec<[f64; 2]>; N],
}

impl<const N: usize> Recorder<N> {
    /// Creates a recorder with the given trace names.
    pub fn new(names: [&str; N]) -> Self {
        Self {
            names: names.map(str::to_owned),
            data: std::array::from_fn(|_| Vec::new()),
        }
    }

    /// Records a single data point across all traces.
    ///
    /// For each trace slot, `None` skips recording for that trace while
    /// leaving other traces unaffected.
    pub fn record(&mut self, x: f64, traces: [Option<f64>; N]) {
        for (i, y) in traces.into_iter().enumerate() {
            if let Some(y) = y {
                self.data[i].push([x, y]);
            }
        }
    }

    /// Returns the trace names.
    pub fn names(&self) -> &[String; N] {
        &self.names
    }

    /// Returns the points recorded for trace `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= N`.
    pub fn trace(&self, i: usize) -> &[[f64; 2]] {
        &self.data[i]
    }

    /// Consumes the recorder, returning `(name, points)` for each trace.
    pub fn into_traces(self) -> Vec<(String, Vec<[f64; 2]>)> {
        self.names.into_iter().zip(self.data).collect()
    }
}

impl<const N: usize, E, A> Observer<E, A> for Recorder<N>
where
    E: Traceable<N>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        if let Some(x) = event.x() {
            self.record(x, event.traces());
        }
        None
    }
}

/// Allows `&mut Recorder<N>` to be passed to solvers that take an observer
/// by value, so the traces can be read after the solve completes.
impl<const N: usize, E, A> Observer<E, A> for &mut Recorder<N>
where
    E: Traceable<N>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        (*self).observe(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- Test fixtures ---

    #[derive(Clone, Copy)]
    struct Event {
        x: Option<f64>,
        a: Option<f64>,
        b: Option<f64>,
    }

    impl Traceable<2> for Event {
        fn x(&self) -> Option<f64> {
            self.x
        }

        fn traces(&self) -> [Option<f64>; 2] {
            [self.a, self.b]
        }
    }

    fn event(x: Option<f64>, a: Option<f64>, b: Option<f64>) -> Event {
        Event { x, a, b }
    }

    // Calls observe without naming the action type at each call site.
    fn feed(recorder: &mut Recorder<2>, event: Event) {
        let _: Option<()> = recorder.observe(&event);
    }

    // --- Tests ---

    #[test]
    fn records_point_when_both_x_and_y_are_some() {
        let mut recorder = Recorder::new(["a", "b"]);
        feed(&mut recorder, event(Some(1.0), Some(2.0), Some(3.0)));
        assert_eq!(recorder.trace(0), [[1.0, 2.0]]);
        assert_eq!(recorder.trace(1), [[1.0, 3.0]]);
    }

    #[test]
    fn skips_all_traces_when_x_is_none() {
        let mut recorder = Recorder::new(["a", "b"]);
        feed(&mut recorder, event(None, Some(1.0), Some(2.0)));
        assert!(recorder.trace(0).is_empty());
        assert!(recorder.trace(1).is_empty());
    }

    #[test]
    fn skips_only_affected_trace_when_y_is_none() {
        let mut recorder = Recorder::new(["a", "b"]);
        feed(&mut recorder, event(Some(1.0), None, Some(3.0)));
        assert!(recorder.trace(0).is_empty());
        assert_eq!(recorder.trace(1), [[1.0, 3.0]]);
    }

    #[test]
    fn accumulates_points_through_a_mutable_reference() {
        fn drive<O: Observer<Event, ()>>(mut observer: O, events: &[Event]) {
            for event in events {
                assert!(observer.observe(event).is_none());
            }
        }

        let mut recorder = Recorder::new(["a", "b"]);
        let events = [1.0, 2.0, 3.0].map(|x| event(Some(x), Some(10.0 * x), Some(-x)));
        drive(&mut recorder, &events);

        assert_eq!(recorder.trace(0), [[1.0, 10.0], [2.0, 20.0], [3.0, 30.0]]);

        let traces = recorder.into_traces();
        assert_eq!(traces[1].0, "b");
        assert_eq!(traces[1].1.len(), 3);
    }
}
