//! Curve samples and their rendering.
//!
//! Curves are `(HH:MM, value)` sequences sampled at quantum resolution
//! across the availability window, end point included.

use serde::{Deserialize, Serialize};

use super::model;
use crate::config::PlannerConfig;
use crate::task::UserContext;
use crate::time::ClockTime;

/// One sample of an energy or fatigue curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub time: ClockTime,
    /// Value in [0, 1], rounded to 3 decimals
    pub value: f64,
}

impl CurvePoint {
    pub fn new(time: ClockTime, value: f64) -> Self {
        Self {
            time,
            value: round_to(value, 3),
        }
    }
}

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

/// Sample times from `available_from` to `available_to` inclusive.
pub fn sample_times(context: &UserContext, step_minutes: u32) -> impl Iterator<Item = ClockTime> {
    let start = context.available_from.minutes();
    let end = context.available_to.minutes();
    (start..=end)
        .step_by(step_minutes.max(1) as usize)
        .map(ClockTime::from_minutes)
}

/// Energy across the window with no fatigue at all.
///
/// This is the same baseline the scheduler scores quanta with, so it
/// previews where deep work will be drawn before any task is placed.
pub fn baseline_curve(context: &UserContext, cfg: &PlannerConfig) -> Vec<CurvePoint> {
    sample_times(context, cfg.quantum_min)
        .map(|t| {
            let e = model::energy(
                t.hour_f64(),
                context.sleep_hours,
                context.stress_level,
                context.lectures_today,
                0.0,
                context.chronotype,
                cfg,
            );
            CurvePoint::new(t, e)
        })
        .collect()
}

/// Highest sample of a curve; the earliest one wins ties.
pub fn peak(points: &[CurvePoint]) -> Option<&CurvePoint> {
    points.iter().fold(None, |best: Option<&CurvePoint>, p| match best {
        Some(b) if b.value >= p.value => Some(b),
        _ => Some(p),
    })
}

/// Render a curve as an ASCII bar chart.
pub fn render_ascii_chart(title: &str, points: &[CurvePoint]) -> String {
    let mut output = format!("\n{title}:\n");
    output.push_str(&"─".repeat(50));
    output.push('\n');

    if points.is_empty() {
        output.push_str("(no samples)\n");
    }

    for point in points {
        let bar_length = (point.value.clamp(0.0, 1.0) * 30.0) as usize;
        let bar = "█".repeat(bar_length);
        let empty = " ".repeat(30 - bar_length);

        let level = if point.value >= 0.7 {
            "●"
        } else if point.value >= 0.4 {
            "○"
        } else {
            "·"
        };

        output.push_str(&format!(
            "{} {}{}{} {:.0}%\n",
            point.time,
            bar,
            empty,
            level,
            point.value * 100.0
        ));
    }

    output.push_str(&"─".repeat(50));
    output.push_str("\n● High  ○ Medium  · Low\n");
    output
}
