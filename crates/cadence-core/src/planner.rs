//! Day planning: schedule, rebalance on overload, score.
//!
//! The planner wraps the placement engine in a bounded retry loop. When a
//! run reports overload it rewrites the task list (capped loads, split long
//! tasks) and schedules again, at most [`MAX_REBALANCE_ATTEMPTS`] times.
//! The last result is accepted even if it is still overloaded.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::PlannerConfig;
use crate::error::Result;
use crate::gamification::{score, GamificationState};
use crate::rebalance::rebalance_tasks;
use crate::scheduler::{PlacementEngine, ScheduleOutcome, WarningLog};
use crate::task::{Task, UserContext};

pub const MAX_REBALANCE_ATTEMPTS: u32 = 2;

/// A finished plan for one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPlan {
    /// Task list of the accepted run, after any rebalancing
    pub tasks: Vec<Task>,
    /// Blocks, curves, overload and the warnings of every attempt
    #[serde(flatten)]
    pub schedule: ScheduleOutcome,
    pub gamification: GamificationState,
    pub rebalance_attempts: u32,
}

impl DayPlan {
    pub fn is_overloaded(&self) -> bool {
        self.schedule.overload
    }
}

/// Plans days for one config.
#[derive(Debug, Clone)]
pub struct Planner<'a> {
    config: &'a PlannerConfig,
    rebalance: bool,
}

impl<'a> Planner<'a> {
    pub fn new(config: &'a PlannerConfig) -> Self {
        Self {
            config,
            rebalance: true,
        }
    }

    /// Accept the first run as is, even when overloaded.
    pub fn without_rebalance(mut self) -> Self {
        self.rebalance = false;
        self
    }

    /// # Errors
    ///
    /// Returns an error when the config, the context or a task is invalid.
    pub fn plan(&self, tasks: &[Task], context: &UserContext) -> Result<DayPlan> {
        let engine = PlacementEngine::new(self.config, context);
        let mut warnings = WarningLog::default();

        let mut current = tasks.to_vec();
        let mut outcome = engine.schedule(&current)?;
        warnings.extend(std::mem::take(&mut outcome.warnings));

        let mut attempts = 0;
        while self.rebalance && outcome.overload && attempts < MAX_REBALANCE_ATTEMPTS {
            attempts += 1;
            current = rebalance_tasks(&current, context.stress_level, self.config);
            debug!(attempt = attempts, tasks = current.len(), "overloaded, rebalancing");

            outcome = engine.schedule(&current)?;
            warnings.extend(std::mem::take(&mut outcome.warnings));
        }

        if outcome.overload {
            warn!(attempts, "plan still overloaded, some tasks were not placed");
        }
        outcome.warnings = warnings.into_vec();

        let gamification = score(&outcome.blocks, self.config);
        info!(
            blocks = outcome.blocks.len(),
            xp = gamification.xp,
            level = %gamification.level,
            attempts,
            "day planned"
        );

        Ok(DayPlan {
            tasks: current,
            schedule: outcome,
            gamification,
            rebalance_attempts: attempts,
        })
    }
}

/// Plan a day with rebalancing enabled.
///
/// # Errors
///
/// See [`Planner::plan`].
pub fn plan_day(tasks: &[Task], context: &UserContext, config: &PlannerConfig) -> Result<DayPlan> {
    Planner::new(config).plan(tasks, context)
}

/// Everything needed to plan one day, as read from a TOML or JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    #[serde(flatten)]
    pub context: UserContext,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl PlanRequest {
    /// Read a request; `.json` files are parsed as JSON, anything else as
    /// TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Ok(serde_json::from_str(&raw)?)
        } else {
            Ok(toml::from_str(&raw)?)
        }
    }

    /// A commented sample request.
    pub fn example_toml() -> &'static str {
        indoc::indoc! {r#"
            # Day context
            sleep_hours = 6.5
            stress_level = 3
            chronotype = "normal"   # early | normal | late
            lectures_today = 2
            available_from = "09:00"
            available_to = "21:00"
            breaks_at = ["12:30-13:30", "18:00-18:45"]

            [[tasks]]
            title = "Thesis chapter draft"
            category = "writing"
            difficulty = 8.0
            duration_minutes = 120
            cognitive_load = 8.5

            [[tasks]]
            title = "Problem set"
            category = "study"
            duration_minutes = 75
            cognitive_load = 7.0

            [[tasks]]
            title = "Reply to emails"
            duration_minutes = 30
            cognitive_load = 2.0

            [[tasks]]
            title = "Review lecture notes"
            description = "Skim slides from today"
            duration_minutes = 45
            cognitive_load = 4.5
        "#}
    }

    /// # Errors
    ///
    /// See [`Planner::plan`].
    pub fn plan(&self, config: &PlannerConfig) -> Result<DayPlan> {
        plan_day(&self.tasks, &self.context, config)
    }
}
