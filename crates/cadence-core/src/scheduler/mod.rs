//! Capacity-aware placement engine.
//!
//! Places tasks greedily, hardest first, into the quanta of a [`TimeGrid`]:
//! - Deep work goes to the highest-energy free run, light work to the
//!   lowest sufficient one so energy peaks stay available
//! - Recovery breaks are inserted before and after deep work when the
//!   fatigue accumulator says one is due
//! - Tasks that do not fit are skipped with a warning and flag overload
//!
//! Placement never backtracks: a placed block is never moved or removed.

mod block;
mod curves;
mod fatigue;

pub use block::{BlockKind, Explanation, ScheduledBlock, BREAK_TITLE};
pub use curves::{build_curves, PlanCurves};
pub use fatigue::{BreakTrigger, FatigueAccumulator};

use indexmap::IndexSet;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::PlannerConfig;
use crate::energy::{model, CurvePoint};
use crate::error::Result;
use crate::grid::TimeGrid;
use crate::task::{Task, UserContext};
use crate::time::ClockTime;

/// Added to light-work scores so the best light run never scores zero.
const LIGHT_SCORE_OFFSET: f64 = 0.01;

/// Sleep below which the plan carries a low-sleep warning.
const LOW_SLEEP_HOURS: f64 = 7.0;

pub const NO_FREE_TIME: &str = "No free time available in the given window.";
pub const WINDOW_TOO_SHORT: &str = "Available window too short for any tasks.";

/// Warnings in first-occurrence order, without duplicates.
#[derive(Debug, Clone, Default)]
pub struct WarningLog {
    entries: IndexSet<String>,
}

impl WarningLog {
    pub fn push(&mut self, warning: impl Into<String>) {
        self.entries.insert(warning.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.entries.into_iter().collect()
    }
}

impl Extend<String> for WarningLog {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

/// Result of one engine run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleOutcome {
    /// Tasks and breaks sorted by start
    pub blocks: Vec<ScheduledBlock>,
    pub energy_curve: Vec<CurvePoint>,
    pub fatigue_curve: Vec<CurvePoint>,
    /// True when at least one task could not be placed
    pub overload: bool,
    pub warnings: Vec<String>,
}

impl ScheduleOutcome {
    fn zero_capacity(reason: &str) -> Self {
        Self {
            blocks: Vec::new(),
            energy_curve: Vec::new(),
            fatigue_curve: Vec::new(),
            overload: true,
            warnings: vec![reason.to_string()],
        }
    }

    pub fn task_blocks(&self) -> impl Iterator<Item = &ScheduledBlock> {
        self.blocks.iter().filter(|b| b.kind == BlockKind::Task)
    }

    pub fn break_blocks(&self) -> impl Iterator<Item = &ScheduledBlock> {
        self.blocks.iter().filter(|b| b.kind == BlockKind::Break)
    }

    /// Whether a task with this title was placed.
    pub fn is_placed(&self, title: &str) -> bool {
        self.task_blocks().any(|b| b.title == title)
    }
}

/// Mutable state of a single run.
struct Placement {
    grid: TimeGrid,
    fatigue: FatigueAccumulator,
    blocks: Vec<ScheduledBlock>,
    overload: bool,
    warnings: WarningLog,
}

/// Greedy scheduler for one user context and one config.
pub struct PlacementEngine<'a> {
    config: &'a PlannerConfig,
    context: &'a UserContext,
}

impl<'a> PlacementEngine<'a> {
    pub fn new(config: &'a PlannerConfig, context: &'a UserContext) -> Self {
        Self { config, context }
    }

    /// Place `tasks` on the day.
    ///
    /// # Errors
    ///
    /// Returns an error when the config, the context or a task is invalid.
    /// Running out of capacity is not an error: it is reported through
    /// `overload` and `warnings`.
    pub fn schedule(&self, tasks: &[Task]) -> Result<ScheduleOutcome> {
        self.config.validate()?;
        self.context.validate()?;
        for task in tasks {
            task.validate()?;
        }

        let grid = TimeGrid::build(self.context, self.config);
        if grid.free_intervals().is_empty() {
            warn!(window = %self.context.window(), "no free time in availability window");
            return Ok(ScheduleOutcome::zero_capacity(NO_FREE_TIME));
        }
        if grid.is_empty() {
            warn!(window = %self.context.window(), "free time too short for a single quantum");
            return Ok(ScheduleOutcome::zero_capacity(WINDOW_TOO_SHORT));
        }

        let mut run = Placement {
            grid,
            fatigue: FatigueAccumulator::new(),
            blocks: Vec::new(),
            overload: false,
            warnings: WarningLog::default(),
        };
        self.context_warnings(&mut run.warnings);

        // Stable: equal loads keep their input order.
        let mut ordered: Vec<&Task> = tasks.iter().collect();
        ordered.sort_by(|a, b| b.cognitive_load.total_cmp(&a.cognitive_load));

        for task in ordered {
            self.place_task(task, &mut run);
        }

        run.blocks.sort_by_key(|b| b.start);
        let curves = build_curves(&run.blocks, self.context, self.config);

        info!(
            blocks = run.blocks.len(),
            free_minutes = run.grid.free_minutes(),
            overload = run.overload,
            "schedule built"
        );

        Ok(ScheduleOutcome {
            blocks: run.blocks,
            energy_curve: curves.energy,
            fatigue_curve: curves.fatigue,
            overload: run.overload,
            warnings: run.warnings.into_vec(),
        })
    }

    fn context_warnings(&self, warnings: &mut WarningLog) {
        let ctx = self.context;
        if ctx.sleep_hours < LOW_SLEEP_HOURS {
            warnings.push(format!(
                "Low sleep ({}h): reduced capacity, deep tasks capped at {} min blocks",
                ctx.sleep_hours, self.config.consec_threshold_min
            ));
        }
        if ctx.stress_level >= self.config.stress_cap_threshold {
            warnings.push(format!(
                "High stress (level {}): cognitive load will be capped at {:.1}",
                ctx.stress_level, self.config.max_load_under_stress
            ));
        }
    }

    fn energy_at(&self, time: ClockTime, fatigue: f64) -> f64 {
        let ctx = self.context;
        model::energy(
            time.hour_f64(),
            ctx.sleep_hours,
            ctx.stress_level,
            ctx.lectures_today,
            fatigue,
            ctx.chronotype,
            self.config,
        )
    }

    fn place_task(&self, task: &Task, run: &mut Placement) {
        let cfg = self.config;

        let mut load = task.cognitive_load;
        if let Some(cap) = model::arousal_cap(self.context.stress_level, run.fatigue.fatigue, cfg) {
            if load > cap {
                run.warnings.push(format!(
                    "Yerkes-Dodson cap: '{}' load capped from {:.1} to {:.1}",
                    task.title, task.cognitive_load, cap
                ));
                load = cap;
            }
        }
        let deep = cfg.is_deep(load);
        let needed = run.grid.quanta_for(task.duration_minutes);

        let Some(mut start) = best_run(&run.grid, needed, deep) else {
            run.overload = true;
            run.warnings.push(format!(
                "Could not schedule '{}': insufficient capacity in available time",
                task.title
            ));
            debug!(task = %task.title, needed, "no free run found");
            return;
        };

        if deep {
            if let Some(trigger) = run.fatigue.break_trigger(cfg) {
                let break_quanta = run.grid.quanta_for(run.fatigue.break_minutes(cfg));
                // The break takes the head of the chosen run; the task moves
                // past it.
                if start + break_quanta + needed <= run.grid.len()
                    && run.grid.is_free_run(start, break_quanta)
                {
                    self.insert_break(run, start, break_quanta, trigger);
                    start += break_quanta;
                } else {
                    debug!(
                        task = %task.title,
                        ?trigger,
                        "no room for a break before deep work, placing without it"
                    );
                }
            }
        }

        if !run.grid.is_free_run(start, needed) {
            run.overload = true;
            run.warnings.push(format!(
                "Could not schedule '{}' after inserting break",
                task.title
            ));
            return;
        }

        let span = run.grid.span(start, needed);
        let fatigue_now = run.fatigue.formula_fatigue(cfg);
        let energy_now = self.energy_at(span.start, fatigue_now);

        run.grid.occupy(start, needed);
        run.blocks.push(ScheduledBlock::task(
            task.title.clone(),
            span,
            load,
            energy_now,
            fatigue_now,
        ));
        debug!(task = %task.title, start = %span.start, end = %span.end, deep, "placed task");

        run.fatigue.record_task(span.duration_minutes(), deep, cfg);

        if let Some(trigger) = run.fatigue.break_trigger(cfg) {
            let after = start + needed;
            let break_quanta = run.grid.quanta_for(run.fatigue.break_minutes(cfg));
            if run.grid.is_free_run(after, break_quanta) {
                self.insert_break(run, after, break_quanta, trigger);
            } else {
                debug!(
                    task = %task.title,
                    ?trigger,
                    "no room for a break after task, continuing without it"
                );
            }
        }
    }

    fn insert_break(&self, run: &mut Placement, start: usize, count: usize, trigger: BreakTrigger) {
        let span = run.grid.span(start, count);
        let fatigue_now = run.fatigue.fatigue;
        let energy_now = self.energy_at(span.start, fatigue_now);

        run.grid.occupy(start, count);
        run.blocks
            .push(ScheduledBlock::recovery_break(span, energy_now, fatigue_now));
        debug!(start = %span.start, end = %span.end, ?trigger, "inserted recovery break");

        run.fatigue.record_break(self.config);
    }
}

/// Index of the best-scoring free run of `needed` quanta.
///
/// Deep work scores a run by its average baseline energy; light work by
/// `1 - average + 0.01`. Only a strictly better score replaces the current
/// best, so the earliest run wins ties.
fn best_run(grid: &TimeGrid, needed: usize, deep: bool) -> Option<usize> {
    if needed == 0 || needed > grid.len() {
        return None;
    }

    let mut best: Option<(usize, f64)> = None;
    for start in 0..=grid.len() - needed {
        let Some(avg) = grid.run_energy(start, needed) else {
            continue;
        };
        let score = if deep {
            avg
        } else {
            1.0 - avg + LIGHT_SCORE_OFFSET
        };
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((start, score));
        }
    }
    best.map(|(start, _)| start)
}

/// Run the placement engine once.
///
/// # Errors
///
/// See [`PlacementEngine::schedule`].
pub fn schedule(
    tasks: &[Task],
    context: &UserContext,
    config: &PlannerConfig,
) -> Result<ScheduleOutcome> {
    PlacementEngine::new(config, context).schedule(tasks)
}
