//! Scheduler inputs: tasks and the user's context for the day.
//!
//! Both are produced by collaborators outside this crate (task extraction,
//! load prediction, the caller's form). The engine only validates them.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::time::{ClockTime, TimeWindow};

/// A unit of work to place on the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_category")]
    pub category: String,
    /// Self-reported difficulty (1-10)
    #[serde(default = "default_difficulty")]
    pub difficulty: f64,
    /// Duration in minutes (at least 5)
    #[serde(default = "default_duration")]
    pub duration_minutes: u32,
    /// Externally predicted cognitive load (0-10)
    #[serde(default)]
    pub cognitive_load: f64,
}

fn default_category() -> String {
    "general".into()
}
fn default_difficulty() -> f64 {
    5.0
}
fn default_duration() -> u32 {
    60
}

impl Task {
    pub const MIN_DURATION_MINUTES: u32 = 5;

    /// Create a task with default category and difficulty.
    pub fn new(title: impl Into<String>, duration_minutes: u32, cognitive_load: f64) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            category: default_category(),
            difficulty: default_difficulty(),
            duration_minutes,
            cognitive_load,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_difficulty(mut self, difficulty: f64) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Copy of this task with a different title, duration and load.
    /// Used when splitting or capping during rebalance.
    pub(crate) fn derive(&self, title: String, duration_minutes: u32, cognitive_load: f64) -> Self {
        Self {
            title,
            description: self.description.clone(),
            category: self.category.clone(),
            difficulty: self.difficulty,
            duration_minutes,
            cognitive_load,
        }
    }

    /// Check the ranges collaborators promise to respect.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for the first field out of range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::Empty("title".into()));
        }
        if !(1.0..=10.0).contains(&self.difficulty) {
            return Err(ValidationError::out_of_range(
                "difficulty",
                format!("{} is outside 1-10 for '{}'", self.difficulty, self.title),
            ));
        }
        if self.duration_minutes < Self::MIN_DURATION_MINUTES {
            return Err(ValidationError::out_of_range(
                "duration_minutes",
                format!(
                    "{} is below the {} minute minimum for '{}'",
                    self.duration_minutes,
                    Self::MIN_DURATION_MINUTES,
                    self.title
                ),
            ));
        }
        if !(0.0..=10.0).contains(&self.cognitive_load) {
            return Err(ValidationError::out_of_range(
                "cognitive_load",
                format!("{} is outside 0-10 for '{}'", self.cognitive_load, self.title),
            ));
        }
        Ok(())
    }
}

/// Circadian preference of the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chronotype {
    Early,
    #[default]
    Normal,
    Late,
}

impl Chronotype {
    /// Hours added to the clock before evaluating the circadian curve.
    /// An early riser at 09:00 behaves like a normal sleeper at 08:00.
    pub fn shift_hours(self) -> f64 {
        match self {
            Chronotype::Early => -1.0,
            Chronotype::Normal => 0.0,
            Chronotype::Late => 1.0,
        }
    }
}

impl std::str::FromStr for Chronotype {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "early" => Ok(Chronotype::Early),
            "normal" => Ok(Chronotype::Normal),
            "late" => Ok(Chronotype::Late),
            other => Err(ValidationError::out_of_range(
                "chronotype",
                format!("'{other}' is not one of early/normal/late"),
            )),
        }
    }
}

/// Physiological state and availability for the day being planned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserContext {
    /// Hours slept last night (0-24)
    pub sleep_hours: f64,
    /// Self-reported stress (1-5)
    pub stress_level: u8,
    #[serde(default)]
    pub chronotype: Chronotype,
    /// Lectures/meetings attended today
    #[serde(default)]
    pub lectures_today: u32,
    #[serde(default = "default_available_from")]
    pub available_from: ClockTime,
    #[serde(default = "default_available_to")]
    pub available_to: ClockTime,
    /// Fixed unavailable windows, e.g. `13:00-14:00`
    #[serde(default)]
    pub breaks_at: Vec<TimeWindow>,
}

fn default_available_from() -> ClockTime {
    ClockTime::from_hm(9, 0)
}
fn default_available_to() -> ClockTime {
    ClockTime::from_hm(22, 0)
}

impl Default for UserContext {
    fn default() -> Self {
        Self {
            sleep_hours: 8.0,
            stress_level: 2,
            chronotype: Chronotype::Normal,
            lectures_today: 0,
            available_from: default_available_from(),
            available_to: default_available_to(),
            breaks_at: Vec::new(),
        }
    }
}

impl UserContext {
    /// Context for the given `HH:MM` availability window with default state.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::TimeFormat`](crate::CoreError::TimeFormat) on a
    /// malformed time.
    pub fn new(available_from: &str, available_to: &str) -> Result<Self> {
        Ok(Self {
            available_from: available_from.parse()?,
            available_to: available_to.parse()?,
            ..Self::default()
        })
    }

    /// Replace the fixed break windows with parsed `HH:MM-HH:MM` strings.
    ///
    /// # Errors
    ///
    /// Fails fast on the first malformed window.
    pub fn with_breaks(mut self, breaks: &[&str]) -> Result<Self> {
        self.breaks_at = breaks
            .iter()
            .map(|b| b.parse::<TimeWindow>())
            .collect::<Result<Vec<_>>>()?;
        Ok(self)
    }

    pub fn with_sleep(mut self, sleep_hours: f64) -> Self {
        self.sleep_hours = sleep_hours;
        self
    }

    pub fn with_stress(mut self, stress_level: u8) -> Self {
        self.stress_level = stress_level;
        self
    }

    pub fn with_chronotype(mut self, chronotype: Chronotype) -> Self {
        self.chronotype = chronotype;
        self
    }

    pub fn with_lectures(mut self, lectures_today: u32) -> Self {
        self.lectures_today = lectures_today;
        self
    }

    /// The whole availability window, breaks included.
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.available_from, self.available_to)
    }

    /// # Errors
    ///
    /// Returns a [`ValidationError`] when sleep or stress are out of range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=24.0).contains(&self.sleep_hours) {
            return Err(ValidationError::out_of_range(
                "sleep_hours",
                format!("{} is outside 0-24", self.sleep_hours),
            ));
        }
        if !(1..=5).contains(&self.stress_level) {
            return Err(ValidationError::out_of_range(
                "stress_level",
                format!("{} is outside 1-5", self.stress_level),
            ));
        }
        Ok(())
    }
}
