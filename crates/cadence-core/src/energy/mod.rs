//! Energy and fatigue modelling.
//!
//! `model` holds the pure energy/fatigue functions; `curve` holds the
//! sampled curves reported alongside a plan and their ASCII rendering.

pub mod curve;
pub mod model;

pub use curve::{baseline_curve, render_ascii_chart, CurvePoint};
pub use model::{
    arousal_cap, break_recovery, circadian_base, commitment_penalty, energy, fatigue,
    sleep_factor,
};
