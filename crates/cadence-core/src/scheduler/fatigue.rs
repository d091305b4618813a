//! Run-scoped fatigue accumulator and break triggers.

use serde::Serialize;

use crate::config::PlannerConfig;
use crate::energy::model;

/// Fatigue above which a user past the short-break trigger gets a break.
const SHORT_BREAK_FATIGUE: f64 = 0.5;

/// Why a break is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakTrigger {
    /// Fatigue reached `fatigue_force_break`
    FatigueLimit,
    /// Consecutive deep work reached `consec_threshold_min`
    ConsecutiveLimit,
    /// Past `short_break_trigger_min` with fatigue above 0.5
    ShortBreak,
}

/// Deep-work exposure tracked while placing tasks.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FatigueAccumulator {
    pub consecutive_deep_min: u32,
    pub total_deep_min: u32,
    /// Deep blocks placed since the last break
    pub deep_block_count: u32,
    /// Current fatigue in [0, 1]
    pub fatigue: f64,
}

impl FatigueAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fatigue from the formula alone, ignoring any recovery applied since.
    pub fn formula_fatigue(&self, cfg: &PlannerConfig) -> f64 {
        model::fatigue(
            self.consecutive_deep_min as f64,
            self.total_deep_min as f64,
            cfg,
        )
    }

    /// Account for a placed task block and recompute fatigue.
    pub fn record_task(&mut self, minutes: u32, deep: bool, cfg: &PlannerConfig) {
        if deep {
            self.consecutive_deep_min += minutes;
            self.total_deep_min += minutes;
            self.deep_block_count += 1;
        } else {
            self.consecutive_deep_min = 0;
        }
        self.fatigue = self.formula_fatigue(cfg);
    }

    /// Apply break recovery and start a new deep-work cycle.
    pub fn record_break(&mut self, cfg: &PlannerConfig) {
        self.fatigue = model::break_recovery(self.fatigue, cfg.break_recovery_factor);
        self.consecutive_deep_min = 0;
        self.deep_block_count = 0;
    }

    /// The first trigger that currently holds, if any.
    pub fn break_trigger(&self, cfg: &PlannerConfig) -> Option<BreakTrigger> {
        if self.fatigue >= cfg.fatigue_force_break {
            Some(BreakTrigger::FatigueLimit)
        } else if self.consecutive_deep_min >= cfg.consec_threshold_min {
            Some(BreakTrigger::ConsecutiveLimit)
        } else if self.consecutive_deep_min >= cfg.short_break_trigger_min
            && self.fatigue > SHORT_BREAK_FATIGUE
        {
            Some(BreakTrigger::ShortBreak)
        } else {
            None
        }
    }

    /// Length of the break that would be inserted now.
    pub fn break_minutes(&self, cfg: &PlannerConfig) -> u32 {
        cfg.break_duration(self.deep_block_count)
    }
}
