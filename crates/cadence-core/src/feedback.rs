//! Post-block workload feedback and coefficient recalibration.
//!
//! Feedback follows NASA-TLX style ratings on a 1-7 scale. The scheduler
//! never reads the history; it only shapes the next config.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::PlannerConfig;
use crate::error::{Result, ValidationError};

/// Entries needed before recalibration changes anything.
pub const MIN_FEEDBACK_ENTRIES: usize = 3;
/// Most recent entries considered by recalibration.
pub const FEEDBACK_WINDOW: usize = 10;

const HIGH_DEMAND: f64 = 4.5;
const LOW_DEMAND: f64 = 2.5;
const HIGH_EFFORT: f64 = 5.0;
const LOW_EFFORT: f64 = 2.5;

const CONSEC_WEIGHT_STEP: f64 = 0.05;
const TOTAL_WEIGHT_STEP: f64 = 0.025;
const FORCE_BREAK_STEP: f64 = 0.05;

const MIN_WEIGHT: f64 = 0.1;
const MAX_WEIGHT: f64 = 1.0;
const MIN_FORCE_BREAK: f64 = 0.5;
const MAX_FORCE_BREAK: f64 = 0.95;

/// One rating of a completed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadFeedback {
    /// Index of the rated block in the plan
    pub block_index: usize,
    pub mental_demand: u8,
    pub effort: u8,
}

impl WorkloadFeedback {
    pub fn new(block_index: usize, mental_demand: u8, effort: u8) -> Self {
        Self {
            block_index,
            mental_demand,
            effort,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [("mental_demand", self.mental_demand), ("effort", self.effort)] {
            if !(1..=7).contains(&value) {
                return Err(ValidationError::out_of_range(
                    field,
                    format!("{value} is outside 1-7"),
                ));
            }
        }
        Ok(())
    }
}

impl PlannerConfig {
    /// Append a feedback entry and recalibrate.
    ///
    /// # Errors
    ///
    /// Returns a validation error when a rating is outside 1-7.
    pub fn record_feedback(&self, feedback: WorkloadFeedback) -> Result<PlannerConfig> {
        feedback.validate()?;
        let mut next = self.clone();
        next.feedback.push(feedback);
        Ok(next.recalibrate())
    }

    /// Adjust fatigue coefficients from the recent feedback history.
    ///
    /// High mental demand makes fatigue build faster; high effort makes
    /// breaks come sooner. Fewer than three entries leave the config as is.
    pub fn recalibrate(&self) -> PlannerConfig {
        let mut next = self.clone();
        if self.feedback.len() < MIN_FEEDBACK_ENTRIES {
            return next;
        }

        let recent = &self.feedback[self.feedback.len().saturating_sub(FEEDBACK_WINDOW)..];
        let n = recent.len() as f64;
        let avg_demand = recent.iter().map(|f| f.mental_demand as f64).sum::<f64>() / n;
        let avg_effort = recent.iter().map(|f| f.effort as f64).sum::<f64>() / n;

        if avg_demand > HIGH_DEMAND {
            next.fatigue_consec_weight =
                (next.fatigue_consec_weight + CONSEC_WEIGHT_STEP).min(MAX_WEIGHT);
            next.fatigue_total_weight =
                (next.fatigue_total_weight + TOTAL_WEIGHT_STEP).min(MAX_WEIGHT);
        } else if avg_demand < LOW_DEMAND {
            next.fatigue_consec_weight =
                (next.fatigue_consec_weight - CONSEC_WEIGHT_STEP).max(MIN_WEIGHT);
            next.fatigue_total_weight =
                (next.fatigue_total_weight - TOTAL_WEIGHT_STEP).max(MIN_WEIGHT);
        }

        if avg_effort > HIGH_EFFORT {
            next.fatigue_force_break =
                (next.fatigue_force_break - FORCE_BREAK_STEP).max(MIN_FORCE_BREAK);
        } else if avg_effort < LOW_EFFORT {
            next.fatigue_force_break =
                (next.fatigue_force_break + FORCE_BREAK_STEP).min(MAX_FORCE_BREAK);
        }

        if next != *self {
            info!(
                avg_demand,
                avg_effort,
                consec_weight = next.fatigue_consec_weight,
                total_weight = next.fatigue_total_weight,
                force_break = next.fatigue_force_break,
                "recalibrated fatigue coefficients"
            );
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn with_history(entries: &[(u8, u8)]) -> PlannerConfig {
        let mut cfg = PlannerConfig::default();
        cfg.feedback = entries
            .iter()
            .enumerate()
            .map(|(i, &(demand, effort))| WorkloadFeedback::new(i, demand, effort))
            .collect();
        cfg
    }

    #[test]
    fn too_little_history_changes_nothing() {
        let cfg = with_history(&[(7, 7), (7, 7)]);
        assert_eq!(cfg.recalibrate(), cfg);
    }

    #[test]
    fn high_demand_and_effort_tighten_fatigue() {
        let cfg = with_history(&[(6, 6), (6, 6), (6, 6)]);
        let next = cfg.recalibrate();
        assert!(approx(next.fatigue_consec_weight, 0.65));
        assert!(approx(next.fatigue_total_weight, 0.425));
        assert!(approx(next.fatigue_force_break, 0.75));
        assert_eq!(next.feedback, cfg.feedback);
    }

    #[test]
    fn low_demand_and_effort_relax_fatigue() {
        let cfg = with_history(&[(1, 1), (2, 2), (2, 1)]);
        let next = cfg.recalibrate();
        assert!(approx(next.fatigue_consec_weight, 0.55));
        assert!(approx(next.fatigue_total_weight, 0.375));
        assert!(approx(next.fatigue_force_break, 0.85));
    }

    #[test]
    fn moderate_ratings_leave_coefficients() {
        let cfg = with_history(&[(4, 4), (3, 4), (4, 3)]);
        assert_eq!(cfg.recalibrate(), cfg);
    }

    #[test]
    fn only_last_ten_entries_count() {
        let mut entries = vec![(7, 7); 5];
        entries.extend(vec![(4, 4); 10]);
        let cfg = with_history(&entries);
        assert_eq!(cfg.recalibrate(), cfg);
    }

    #[test]
    fn adjustments_respect_bounds() {
        let mut cfg = with_history(&[(7, 7), (7, 7), (7, 7)]);
        cfg.fatigue_consec_weight = 0.98;
        cfg.fatigue_force_break = 0.52;
        let next = cfg.recalibrate();
        assert!(approx(next.fatigue_consec_weight, 1.0));
        assert!(approx(next.fatigue_force_break, 0.5));
    }

    #[test]
    fn record_feedback_appends_and_recalibrates() {
        let cfg = with_history(&[(6, 3), (6, 3)]);
        let next = cfg.record_feedback(WorkloadFeedback::new(2, 6, 3)).unwrap();
        assert_eq!(next.feedback.len(), 3);
        assert!(approx(next.fatigue_consec_weight, 0.65));
        assert!(approx(next.fatigue_force_break, 0.8));
        // The original value is untouched.
        assert_eq!(cfg.feedback.len(), 2);
    }

    #[test]
    fn record_feedback_rejects_out_of_range_rating() {
        let cfg = PlannerConfig::default();
        assert!(cfg.record_feedback(WorkloadFeedback::new(0, 8, 3)).is_err());
        assert!(cfg.record_feedback(WorkloadFeedback::new(0, 3, 0)).is_err());
    }
}
