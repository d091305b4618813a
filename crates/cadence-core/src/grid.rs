//! Time grid: free intervals cut into fixed-size quanta.
//!
//! The availability window minus the fixed break windows gives the free
//! intervals. Each free interval is split into whole quanta of
//! `quantum_min` minutes; a trailing remainder shorter than a quantum is
//! dropped (lost capacity, not an error). Quanta never span a break.

use serde::Serialize;

use crate::config::PlannerConfig;
use crate::energy::model;
use crate::task::UserContext;
use crate::time::{ClockTime, TimeWindow};

/// Baseline energy at or below which a quantum is never scheduled.
pub const ENERGY_FLOOR: f64 = 0.02;

/// A fixed-length slot of the day.
#[derive(Debug, Clone, Serialize)]
pub struct Quantum {
    pub start: ClockTime,
    pub end: ClockTime,
    /// Energy at zero fatigue, used only to score placements
    pub energy: f64,
    occupied: bool,
}

impl Quantum {
    pub fn is_occupied(&self) -> bool {
        self.occupied
    }

    /// Above the energy floor.
    pub fn is_usable(&self) -> bool {
        self.energy > ENERGY_FLOOR
    }
}

/// Subtract break windows from `[from, to]`.
///
/// Breaks may be unsorted or overlapping; the result is sorted and
/// non-overlapping.
pub fn free_intervals(from: ClockTime, to: ClockTime, breaks: &[TimeWindow]) -> Vec<TimeWindow> {
    let mut sorted_breaks = breaks.to_vec();
    sorted_breaks.sort();

    let mut intervals = Vec::new();
    let mut cursor = from;

    for brk in &sorted_breaks {
        if cursor >= to {
            break;
        }
        if brk.start > cursor {
            intervals.push(TimeWindow::new(cursor, brk.start.min(to)));
        }
        if brk.end > cursor {
            cursor = brk.end;
        }
    }

    if cursor < to {
        intervals.push(TimeWindow::new(cursor, to));
    }

    intervals
}

/// Ordered sequence of quanta for one run.
#[derive(Debug, Clone)]
pub struct TimeGrid {
    quanta: Vec<Quantum>,
    quantum_min: u32,
    free_intervals: Vec<TimeWindow>,
}

impl TimeGrid {
    /// Build the grid for a context, pre-scoring each quantum at zero fatigue.
    /// A zero `quantum_min` is treated as one minute.
    pub fn build(context: &UserContext, cfg: &PlannerConfig) -> Self {
        let q = cfg.quantum_min.max(1);
        let free = free_intervals(context.available_from, context.available_to, &context.breaks_at);

        let mut quanta = Vec::new();
        for interval in &free {
            let mut t = interval.start;
            while t.add_minutes(q) <= interval.end {
                let energy = model::energy(
                    t.hour_f64(),
                    context.sleep_hours,
                    context.stress_level,
                    context.lectures_today,
                    0.0,
                    context.chronotype,
                    cfg,
                );
                quanta.push(Quantum {
                    start: t,
                    end: t.add_minutes(q),
                    energy,
                    occupied: false,
                });
                t = t.add_minutes(q);
            }
        }

        Self {
            quanta,
            quantum_min: q,
            free_intervals: free,
        }
    }

    pub fn len(&self) -> usize {
        self.quanta.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quanta.is_empty()
    }

    pub fn quanta(&self) -> &[Quantum] {
        &self.quanta
    }

    pub fn quantum_min(&self) -> u32 {
        self.quantum_min
    }

    pub fn free_intervals(&self) -> &[TimeWindow] {
        &self.free_intervals
    }

    /// Number of quanta needed to hold `minutes`.
    pub fn quanta_for(&self, minutes: u32) -> usize {
        minutes.div_ceil(self.quantum_min) as usize
    }

    /// Schedulable minutes left in the grid.
    pub fn free_minutes(&self) -> u32 {
        self.quanta.iter().filter(|q| !q.occupied).count() as u32 * self.quantum_min
    }

    /// `count` quanta from `start` exist, are unoccupied and touch end to start.
    pub fn is_free_run(&self, start: usize, count: usize) -> bool {
        if count == 0 || start + count > self.quanta.len() {
            return false;
        }
        let run = &self.quanta[start..start + count];
        run.iter().all(|q| !q.occupied) && run.windows(2).all(|w| w[0].end == w[1].start)
    }

    /// Average baseline energy of a free run whose quanta are all above the
    /// floor, or `None` if the run cannot hold work.
    pub fn run_energy(&self, start: usize, count: usize) -> Option<f64> {
        if !self.is_free_run(start, count) {
            return None;
        }
        let run = &self.quanta[start..start + count];
        if !run.iter().all(Quantum::is_usable) {
            return None;
        }
        let sum: f64 = run.iter().map(|q| q.energy).sum();
        Some(sum / count as f64)
    }

    /// Start and end time of a run. The run must be in bounds.
    pub fn span(&self, start: usize, count: usize) -> TimeWindow {
        TimeWindow::new(self.quanta[start].start, self.quanta[start + count - 1].end)
    }

    /// Mark a free run as occupied. Occupation is permanent for the run.
    pub fn occupy(&mut self, start: usize, count: usize) {
        debug_assert!(self.is_free_run(start, count), "occupying a run that is not free");
        for q in &mut self.quanta[start..start + count] {
            q.occupied = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(s: &str) -> TimeWindow {
        s.parse().unwrap()
    }

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    #[test]
    fn free_intervals_without_breaks() {
        let free = free_intervals(t("09:00"), t("12:00"), &[]);
        assert_eq!(free, vec![window("09:00-12:00")]);
    }

    #[test]
    fn free_intervals_sorts_and_merges_breaks() {
        let breaks = vec![
            window("15:00-16:00"),
            window("12:00-13:00"),
            window("12:30-13:30"),
        ];
        let free = free_intervals(t("09:00"), t("18:00"), &breaks);
        assert_eq!(
            free,
            vec![
                window("09:00-12:00"),
                window("13:30-15:00"),
                window("16:00-18:00"),
            ]
        );
    }

    #[test]
    fn breaks_outside_window_are_ignored() {
        let breaks = vec![window("07:00-08:00"), window("20:00-21:00")];
        let free = free_intervals(t("09:00"), t("12:00"), &breaks);
        assert_eq!(free, vec![window("09:00-12:00")]);
    }

    #[test]
    fn break_covering_window_leaves_nothing() {
        let free = free_intervals(t("09:00"), t("12:00"), &[window("08:00-13:00")]);
        assert!(free.is_empty());
    }

    #[test]
    fn grid_drops_short_remainders() {
        let ctx = UserContext::new("09:00", "10:10")
            .unwrap()
            .with_breaks(&["09:20-09:30"])
            .unwrap();
        let grid = TimeGrid::build(&ctx, &PlannerConfig::default());

        // 09:00-09:20 holds one quantum; 09:30-10:10 holds two.
        let starts: Vec<String> = grid.quanta().iter().map(|q| q.start.to_string()).collect();
        assert_eq!(starts, ["09:00", "09:30", "09:45"]);
        assert_eq!(grid.free_minutes(), 45);
    }

    #[test]
    fn runs_do_not_cross_break_boundaries() {
        let ctx = UserContext::new("09:00", "10:00")
            .unwrap()
            .with_breaks(&["09:30-09:45"])
            .unwrap();
        let grid = TimeGrid::build(&ctx, &PlannerConfig::default());
        assert_eq!(grid.len(), 3);
        assert!(grid.is_free_run(0, 2));
        assert!(!grid.is_free_run(1, 2));
        assert!(!grid.is_free_run(2, 2));
    }

    #[test]
    fn occupy_marks_quanta_and_run_energy_averages() {
        let ctx = UserContext::new("09:00", "10:00").unwrap();
        let mut grid = TimeGrid::build(&ctx, &PlannerConfig::default());
        let avg = grid.run_energy(0, 2).unwrap();
        let expected = (grid.quanta()[0].energy + grid.quanta()[1].energy) / 2.0;
        assert_eq!(avg, expected);

        grid.occupy(0, 2);
        assert!(grid.quanta()[0].is_occupied());
        assert!(!grid.is_free_run(1, 2));
        assert!(grid.run_energy(2, 2).is_some());
        assert_eq!(grid.span(2, 2), window("09:30-10:00"));
    }

    #[test]
    fn zero_quantum_falls_back_to_one_minute() {
        let ctx = UserContext::new("09:00", "09:05").unwrap();
        let cfg = PlannerConfig {
            quantum_min: 0,
            ..PlannerConfig::default()
        };
        let grid = TimeGrid::build(&ctx, &cfg);
        assert_eq!(grid.len(), 5);
        assert_eq!(grid.quantum_min(), 1);
        assert_eq!(grid.quanta_for(3), 3);
    }

    #[test]
    fn quanta_below_energy_floor_are_unusable() {
        // No sleep, maximum stress, many lectures: energy bottoms out in the
        // early morning trough.
        let ctx = UserContext::new("04:00", "05:00")
            .unwrap()
            .with_sleep(0.0)
            .with_stress(5)
            .with_lectures(10);
        let grid = TimeGrid::build(&ctx, &PlannerConfig::default());
        assert!(grid.quanta().iter().all(|q| !q.is_usable()));
        assert!(grid.run_energy(0, 1).is_none());
    }
}
