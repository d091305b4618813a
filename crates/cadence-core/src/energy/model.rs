//! Energy and fatigue model.
//!
//! Pure functions, no state. A two-process style circadian curve scaled by
//! sleep, minus penalties for commitments, stress and accumulated fatigue.

use std::f64::consts::PI;

use crate::config::PlannerConfig;
use crate::task::Chronotype;

/// Ceiling on the commitment penalty, however many lectures were attended.
pub const MAX_COMMITMENT_PENALTY: f64 = 0.15;

/// Energy lost per stress level above 2.
pub const STRESS_PENALTY_PER_LEVEL: f64 = 0.03;

/// Fatigue above which high stress caps the usable load.
pub const AROUSAL_FATIGUE_LIMIT: f64 = 0.6;

/// Bimodal time-of-day baseline peaking near 10:00 and 15:00.
///
/// `hour` is fractional (`9.5` is 09:30). Returns a value in [0, 1].
pub fn circadian_base(hour: f64, chronotype: Chronotype) -> f64 {
    let h = hour + chronotype.shift_hours();
    let primary = 0.55 + 0.35 * (PI * (h - 6.0) / 8.0).sin();
    let secondary = 0.50 + 0.25 * (PI * (h - 11.0) / 8.0).sin();
    primary.max(secondary).clamp(0.0, 1.0)
}

/// `clip(sleep_hours / baseline, 0.5, 1.2)`
pub fn sleep_factor(sleep_hours: f64, baseline: f64) -> f64 {
    (sleep_hours / baseline).clamp(0.5, 1.2)
}

/// Light residual penalty for lectures or meetings already attended today.
pub fn commitment_penalty(lectures: u32, per_unit: f64) -> f64 {
    (lectures as f64 * per_unit).min(MAX_COMMITMENT_PENALTY)
}

fn stress_penalty(stress_level: u8) -> f64 {
    (stress_level as f64 - 2.0).max(0.0) * STRESS_PENALTY_PER_LEVEL
}

/// Fatigue accumulated from deep work, in [0, 1].
///
/// `a * consec / consec_threshold + b * total / total_threshold` where the
/// weights come from the (recalibrated) config.
pub fn fatigue(consec_deep_min: f64, total_deep_min: f64, cfg: &PlannerConfig) -> f64 {
    let raw = cfg.fatigue_consec_weight * (consec_deep_min / cfg.consec_threshold_min as f64)
        + cfg.fatigue_total_weight * (total_deep_min / cfg.total_deep_threshold_min as f64);
    raw.clamp(0.0, 1.0)
}

/// Composite energy at a given hour, in [0, 1].
pub fn energy(
    hour: f64,
    sleep_hours: f64,
    stress_level: u8,
    lectures: u32,
    fatigue: f64,
    chronotype: Chronotype,
    cfg: &PlannerConfig,
) -> f64 {
    let raw = circadian_base(hour, chronotype) * sleep_factor(sleep_hours, cfg.sleep_baseline)
        - commitment_penalty(lectures, cfg.lecture_penalty_per)
        - fatigue
        - stress_penalty(stress_level);
    raw.clamp(0.0, 1.0)
}

/// Fatigue left after a break.
pub fn break_recovery(fatigue: f64, factor: f64) -> f64 {
    fatigue * (1.0 - factor)
}

/// Yerkes-Dodson load ceiling: under high stress and high fatigue only
/// moderate tasks can be attempted at full rating.
pub fn arousal_cap(stress_level: u8, fatigue: f64, cfg: &PlannerConfig) -> Option<f64> {
    if stress_level >= cfg.stress_cap_threshold && fatigue > AROUSAL_FATIGUE_LIMIT {
        Some(cfg.max_load_under_stress)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn circadian_peaks_mid_morning() {
        let peak = circadian_base(10.0, Chronotype::Normal);
        assert!(approx(peak, 0.90));
        assert!(peak > circadian_base(7.0, Chronotype::Normal));
        assert!(peak > circadian_base(13.0, Chronotype::Normal));
    }

    #[test]
    fn chronotype_shifts_curve_by_an_hour() {
        let early_at_9 = circadian_base(9.0, Chronotype::Early);
        let normal_at_8 = circadian_base(8.0, Chronotype::Normal);
        assert!(approx(early_at_9, normal_at_8));

        let late_at_11 = circadian_base(11.0, Chronotype::Late);
        let normal_at_12 = circadian_base(12.0, Chronotype::Normal);
        assert!(approx(late_at_11, normal_at_12));
    }

    #[test]
    fn sleep_factor_is_clipped() {
        assert_eq!(sleep_factor(2.0, 8.0), 0.5);
        assert_eq!(sleep_factor(8.0, 8.0), 1.0);
        assert_eq!(sleep_factor(12.0, 8.0), 1.2);
    }

    #[test]
    fn commitment_penalty_saturates() {
        assert!(approx(commitment_penalty(2, 0.02), 0.04));
        assert_eq!(commitment_penalty(100, 0.02), MAX_COMMITMENT_PENALTY);
    }

    #[test]
    fn fatigue_weighted_sum_and_clamp() {
        let cfg = PlannerConfig::default();
        assert_eq!(fatigue(0.0, 0.0, &cfg), 0.0);
        // 0.6 * 45/90 + 0.4 * 90/180 = 0.3 + 0.2
        assert!(approx(fatigue(45.0, 90.0, &cfg), 0.5));
        assert_eq!(fatigue(500.0, 500.0, &cfg), 1.0);
    }

    #[test]
    fn energy_subtracts_penalties() {
        let cfg = PlannerConfig::default();
        let rested = energy(10.0, 8.0, 2, 0, 0.0, Chronotype::Normal, &cfg);
        assert!(approx(rested, 0.90));

        let stressed = energy(10.0, 8.0, 5, 0, 0.0, Chronotype::Normal, &cfg);
        assert!(approx(stressed, 0.90 - 0.09));

        let tired = energy(10.0, 8.0, 2, 0, 0.95, Chronotype::Normal, &cfg);
        assert_eq!(tired, 0.0);
    }

    #[test]
    fn break_recovery_removes_a_fraction() {
        assert!(approx(break_recovery(0.8, 0.3), 0.56));
        assert_eq!(break_recovery(0.0, 0.3), 0.0);
    }

    #[test]
    fn arousal_cap_needs_stress_and_fatigue() {
        let cfg = PlannerConfig::default();
        assert_eq!(arousal_cap(4, 0.7, &cfg), Some(5.0));
        assert_eq!(arousal_cap(4, 0.6, &cfg), None);
        assert_eq!(arousal_cap(3, 0.9, &cfg), None);
    }
}
