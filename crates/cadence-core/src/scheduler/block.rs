//! Placed blocks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::energy::curve::round_to;
use crate::time::{ClockTime, TimeWindow};

/// Title given to every inserted recovery break.
pub const BREAK_TITLE: &str = "Recovery Break";

/// What a block holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Task,
    Break,
}

/// Why a block sits where it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Explanation {
    MorningPeak,
    AfternoonPeak,
    Midday,
    AvailableSlot,
    Recovery,
}

impl Explanation {
    /// Time-of-day band for a task starting at `start`.
    pub fn for_start(start: ClockTime) -> Self {
        let hour = start.hour_f64();
        if (8.0..=11.0).contains(&hour) {
            Explanation::MorningPeak
        } else if (14.0..=16.0).contains(&hour) {
            Explanation::AfternoonPeak
        } else if hour > 11.0 && hour < 14.0 {
            Explanation::Midday
        } else {
            Explanation::AvailableSlot
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Explanation::MorningPeak => "Peak morning energy, ideal for high-load tasks",
            Explanation::AfternoonPeak => "Afternoon peak after lunch recovery",
            Explanation::Midday => "Midday slot, moderate energy",
            Explanation::AvailableSlot => "Available slot, energy managed by breaks",
            Explanation::Recovery => "Deep work threshold reached, recovery needed",
        }
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A placed task or break. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledBlock {
    pub title: String,
    pub start: ClockTime,
    pub end: ClockTime,
    /// Effective (possibly capped) load; 0 for breaks
    pub cognitive_load: f64,
    pub energy_at_start: f64,
    pub fatigue_at_start: f64,
    pub kind: BlockKind,
    pub explanation: Explanation,
}

impl ScheduledBlock {
    /// A task block; snapshots are rounded to 2 decimals.
    pub fn task(
        title: impl Into<String>,
        span: TimeWindow,
        cognitive_load: f64,
        energy_at_start: f64,
        fatigue_at_start: f64,
    ) -> Self {
        Self {
            title: title.into(),
            start: span.start,
            end: span.end,
            cognitive_load,
            energy_at_start: round_to(energy_at_start, 2),
            fatigue_at_start: round_to(fatigue_at_start, 2),
            kind: BlockKind::Task,
            explanation: Explanation::for_start(span.start),
        }
    }

    /// A recovery break.
    pub fn recovery_break(span: TimeWindow, energy_at_start: f64, fatigue_at_start: f64) -> Self {
        Self {
            title: BREAK_TITLE.to_string(),
            start: span.start,
            end: span.end,
            cognitive_load: 0.0,
            energy_at_start: round_to(energy_at_start, 2),
            fatigue_at_start: round_to(fatigue_at_start, 2),
            kind: BlockKind::Break,
            explanation: Explanation::Recovery,
        }
    }

    pub fn is_break(&self) -> bool {
        self.kind == BlockKind::Break
    }

    pub fn span(&self) -> TimeWindow {
        TimeWindow::new(self.start, self.end)
    }

    /// Get total duration in minutes
    pub fn duration_minutes(&self) -> u32 {
        self.end.minutes_since(self.start)
    }

    pub fn contains(&self, time: ClockTime) -> bool {
        self.span().contains(time)
    }
}
