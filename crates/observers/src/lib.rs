//! Reusable observers for the Marcher framework.
//!
//! This crate provides [`Observer`] implementations and capability traits that
//! work across the Newton solver and the time integrator.
//!
//! # Modules
//!
//! - [`traits`] — Capability traits for cross-solver observers
//!   ([`HasTime`], [`HasResidualNorm`], [`CanStopEarly`])
//!
//! # Observers
//!
//! - [`Recorder`] — collects named traces of `(x, y)` points
//! - [`StopAtTime`] and [`StopBelowResidual`] — generic early-stopping rules
//!
//! # Features
//!
//! - `plot` — Enables [`Recorder::show`] for viewing recorded traces via egui.
//!   This feature adds dependencies on `eframe` and `egui_plot`.
//!
//! [`Observer`]: marcher_core::Observer
//! [`HasTime`]: traits::HasTime
//! [`HasResidualNorm`]: traits::HasResidualNorm
//! [`CanStopEarly`]: traits::CanStopEarly

pub mod traits;

mod recorder;
mod stop;

#[cfg(feature = "plot")]
mod plot;

pub use recorder::{Recorder, Traceable};
pub use stop::{StopAtTime, StopBelowResidual};

#[cfg(feature = "plot")]
pub use plot::ShowConfig;
