//! # Cadence Core Library
//!
//! Capacity-aware daily planning. Given a list of tasks with predicted
//! cognitive load and the user's state for the day (sleep, stress,
//! chronotype, availability), the planner places tasks on a quantized time
//! grid so that hard work lands on energy peaks, recovery breaks are
//! inserted as fatigue accumulates, and overload is reported instead of
//! hidden.
//!
//! ## Architecture
//!
//! - **Energy model**: pure functions for circadian energy, sleep and
//!   commitment penalties, fatigue and the stress load cap
//! - **Time grid**: free intervals cut into fixed quanta pre-scored with
//!   baseline energy
//! - **Placement engine**: greedy, hardest-first placement with break
//!   insertion and reporting curves
//! - **Planner**: rebalancing retry loop and gamification scoring
//! - **Storage**: TOML config with workload-feedback recalibration
//!
//! ## Key Components
//!
//! - [`plan_day`]: one-call planning entry point
//! - [`PlacementEngine`]: a single scheduling run
//! - [`PlannerConfig`]: coefficients, persisted by the storage layer
//!
//! Nothing here does I/O except [`storage`] and [`PlanRequest::from_path`].

pub mod config;
pub mod energy;
pub mod error;
pub mod feedback;
pub mod gamification;
pub mod grid;
pub mod planner;
pub mod rebalance;
pub mod scheduler;
pub mod storage;
pub mod task;
pub mod time;

pub use config::PlannerConfig;
pub use energy::CurvePoint;
pub use error::{ConfigError, CoreError, Result, ValidationError};
pub use feedback::WorkloadFeedback;
pub use gamification::{Badge, GamificationState, Level};
pub use grid::TimeGrid;
pub use planner::{plan_day, DayPlan, PlanRequest, Planner};
pub use rebalance::rebalance_tasks;
pub use scheduler::{
    schedule, BlockKind, Explanation, PlacementEngine, ScheduleOutcome, ScheduledBlock,
};
pub use storage::data_dir;
pub use task::{Chronotype, Task, UserContext};
pub use time::{ClockTime, TimeWindow};
