//! Planner coefficients.
//!
//! `PlannerConfig` is a plain value owned by the caller and passed by
//! reference into every run. Nothing in the engine mutates it; the only way
//! to change coefficients is to build a new value, e.g. with
//! `PlannerConfig::recalibrate` from the `feedback` module.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::feedback::WorkloadFeedback;

/// Every tunable coefficient of the energy model and the scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Hours of sleep that count as fully rested
    #[serde(default = "default_sleep_baseline")]
    pub sleep_baseline: f64,
    /// Weight of consecutive deep-work minutes in the fatigue formula
    #[serde(default = "default_fatigue_consec_weight")]
    pub fatigue_consec_weight: f64,
    /// Weight of total deep-work minutes in the fatigue formula
    #[serde(default = "default_fatigue_total_weight")]
    pub fatigue_total_weight: f64,
    /// Maximum consecutive deep-work minutes before a forced break
    #[serde(default = "default_consec_threshold_min")]
    pub consec_threshold_min: u32,
    /// Total deep-work minutes at which the total term saturates
    #[serde(default = "default_total_deep_threshold_min")]
    pub total_deep_threshold_min: u32,
    /// Consecutive deep minutes after which a tired user gets a short break
    #[serde(default = "default_short_break_trigger_min")]
    pub short_break_trigger_min: u32,
    #[serde(default = "default_short_break_duration")]
    pub short_break_duration: u32,
    /// Break length once three or more deep blocks ran back to back
    #[serde(default = "default_long_break_duration")]
    pub long_break_duration: u32,
    /// Fatigue at or above which a break is always attempted
    #[serde(default = "default_fatigue_force_break")]
    pub fatigue_force_break: f64,
    /// Stress level (1-5) that enables load capping
    #[serde(default = "default_stress_cap_threshold")]
    pub stress_cap_threshold: u8,
    #[serde(default = "default_max_load_under_stress")]
    pub max_load_under_stress: f64,
    /// Energy penalty per lecture/meeting attended today
    #[serde(default = "default_lecture_penalty_per")]
    pub lecture_penalty_per: f64,
    /// Fraction of fatigue removed by a break
    #[serde(default = "default_break_recovery_factor")]
    pub break_recovery_factor: f64,
    /// Scheduling quantum in minutes
    #[serde(default = "default_quantum_min")]
    pub quantum_min: u32,
    /// Cognitive load at or above which a task counts as deep work
    #[serde(default = "default_deep_work_load_threshold")]
    pub deep_work_load_threshold: f64,
    /// Append-only workload feedback history. Read-only for the scheduler.
    #[serde(default)]
    pub feedback: Vec<WorkloadFeedback>,
}

fn default_sleep_baseline() -> f64 {
    8.0
}
fn default_fatigue_consec_weight() -> f64 {
    0.6
}
fn default_fatigue_total_weight() -> f64 {
    0.4
}
fn default_consec_threshold_min() -> u32 {
    90
}
fn default_total_deep_threshold_min() -> u32 {
    180
}
fn default_short_break_trigger_min() -> u32 {
    60
}
fn default_short_break_duration() -> u32 {
    15
}
fn default_long_break_duration() -> u32 {
    25
}
fn default_fatigue_force_break() -> f64 {
    0.8
}
fn default_stress_cap_threshold() -> u8 {
    4
}
fn default_max_load_under_stress() -> f64 {
    5.0
}
fn default_lecture_penalty_per() -> f64 {
    0.02
}
fn default_break_recovery_factor() -> f64 {
    0.30
}
fn default_quantum_min() -> u32 {
    15
}
fn default_deep_work_load_threshold() -> f64 {
    7.0
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            sleep_baseline: default_sleep_baseline(),
            fatigue_consec_weight: default_fatigue_consec_weight(),
            fatigue_total_weight: default_fatigue_total_weight(),
            consec_threshold_min: default_consec_threshold_min(),
            total_deep_threshold_min: default_total_deep_threshold_min(),
            short_break_trigger_min: default_short_break_trigger_min(),
            short_break_duration: default_short_break_duration(),
            long_break_duration: default_long_break_duration(),
            fatigue_force_break: default_fatigue_force_break(),
            stress_cap_threshold: default_stress_cap_threshold(),
            max_load_under_stress: default_max_load_under_stress(),
            lecture_penalty_per: default_lecture_penalty_per(),
            break_recovery_factor: default_break_recovery_factor(),
            quantum_min: default_quantum_min(),
            deep_work_load_threshold: default_deep_work_load_threshold(),
            feedback: Vec::new(),
        }
    }
}

impl PlannerConfig {
    /// Reject coefficients the model cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive_minutes = [
            ("quantum_min", self.quantum_min),
            ("consec_threshold_min", self.consec_threshold_min),
            ("total_deep_threshold_min", self.total_deep_threshold_min),
            ("short_break_duration", self.short_break_duration),
            ("long_break_duration", self.long_break_duration),
        ];
        for (key, value) in positive_minutes {
            if value == 0 {
                return Err(ConfigError::invalid(key, "must be greater than zero"));
            }
        }

        if !(self.sleep_baseline.is_finite() && self.sleep_baseline > 0.0) {
            return Err(ConfigError::invalid("sleep_baseline", "must be a positive number"));
        }

        let unit_interval = [
            ("fatigue_consec_weight", self.fatigue_consec_weight),
            ("fatigue_total_weight", self.fatigue_total_weight),
            ("fatigue_force_break", self.fatigue_force_break),
            ("break_recovery_factor", self.break_recovery_factor),
        ];
        for (key, value) in unit_interval {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::invalid(key, format!("{value} is outside 0.0-1.0")));
            }
        }

        let load_scale = [
            ("max_load_under_stress", self.max_load_under_stress),
            ("deep_work_load_threshold", self.deep_work_load_threshold),
        ];
        for (key, value) in load_scale {
            if !(0.0..=10.0).contains(&value) {
                return Err(ConfigError::invalid(key, format!("{value} is outside 0-10")));
            }
        }

        if !(1..=5).contains(&self.stress_cap_threshold) {
            return Err(ConfigError::invalid(
                "stress_cap_threshold",
                format!("{} is outside the 1-5 stress scale", self.stress_cap_threshold),
            ));
        }

        if !(self.lecture_penalty_per.is_finite() && self.lecture_penalty_per >= 0.0) {
            return Err(ConfigError::invalid("lecture_penalty_per", "must not be negative"));
        }

        Ok(())
    }

    /// Break length for the next break given how many deep blocks ran since
    /// the last one.
    pub fn break_duration(&self, deep_block_count: u32) -> u32 {
        if deep_block_count >= 3 {
            self.long_break_duration
        } else {
            self.short_break_duration
        }
    }

    pub fn is_deep(&self, cognitive_load: f64) -> bool {
        cognitive_load >= self.deep_work_load_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let cfg = PlannerConfig::default();
        assert_eq!(cfg.sleep_baseline, 8.0);
        assert_eq!(cfg.fatigue_consec_weight, 0.6);
        assert_eq!(cfg.fatigue_total_weight, 0.4);
        assert_eq!(cfg.consec_threshold_min, 90);
        assert_eq!(cfg.total_deep_threshold_min, 180);
        assert_eq!(cfg.short_break_trigger_min, 60);
        assert_eq!(cfg.short_break_duration, 15);
        assert_eq!(cfg.long_break_duration, 25);
        assert_eq!(cfg.fatigue_force_break, 0.8);
        assert_eq!(cfg.stress_cap_threshold, 4);
        assert_eq!(cfg.max_load_under_stress, 5.0);
        assert_eq!(cfg.lecture_penalty_per, 0.02);
        assert_eq!(cfg.break_recovery_factor, 0.30);
        assert_eq!(cfg.quantum_min, 15);
        assert_eq!(cfg.deep_work_load_threshold, 7.0);
        assert!(cfg.feedback.is_empty());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: PlannerConfig = toml::from_str("quantum_min = 30\n").unwrap();
        assert_eq!(cfg.quantum_min, 30);
        assert_eq!(cfg.consec_threshold_min, 90);
    }

    #[test]
    fn validate_rejects_zero_quantum() {
        let cfg = PlannerConfig {
            quantum_min: 0,
            ..PlannerConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("quantum_min"));
    }

    #[test]
    fn validate_rejects_out_of_range_weight() {
        let cfg = PlannerConfig {
            break_recovery_factor: 1.5,
            ..PlannerConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_keeps_stress_cap_on_stress_scale() {
        for threshold in [0, 6] {
            let cfg = PlannerConfig {
                stress_cap_threshold: threshold,
                ..PlannerConfig::default()
            };
            let err = cfg.validate().unwrap_err();
            assert!(err.to_string().contains("stress_cap_threshold"));
        }
        let cfg = PlannerConfig {
            stress_cap_threshold: 5,
            ..PlannerConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn break_duration_switches_after_three_deep_blocks() {
        let cfg = PlannerConfig::default();
        assert_eq!(cfg.break_duration(0), 15);
        assert_eq!(cfg.break_duration(2), 15);
        assert_eq!(cfg.break_duration(3), 25);
    }
}
