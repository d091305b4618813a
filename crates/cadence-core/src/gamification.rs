//! XP, levels and badges for a finished plan.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::PlannerConfig;
use crate::scheduler::{BlockKind, ScheduledBlock};
use crate::time::ClockTime;

const BREAK_XP: u32 = 20;
const TASK_BASE_XP: u32 = 10;
const XP_PER_LOAD_POINT: f64 = 5.0;
const STREAK_BONUS_XP: u32 = 15;

const EARLY_BIRD_BEFORE: ClockTime = ClockTime::from_hm(9, 0);
const NIGHT_OWL_AFTER: ClockTime = ClockTime::from_hm(21, 0);
const MARATHON_DEEP_MINUTES: u32 = 180;
const STREAK_MASTER_RUN: u32 = 3;

/// Player level, by total xp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    Student,
    Scholar,
    Genius,
    Mastermind,
}

impl Level {
    const ALL: [Level; 4] = [Level::Student, Level::Scholar, Level::Genius, Level::Mastermind];

    /// Minimum xp for this level.
    pub fn threshold(self) -> u32 {
        match self {
            Level::Student => 0,
            Level::Scholar => 200,
            Level::Genius => 600,
            Level::Mastermind => 1200,
        }
    }

    /// Highest level whose threshold `xp` reaches.
    pub fn for_xp(xp: u32) -> Self {
        Self::ALL
            .into_iter()
            .rev()
            .find(|level| xp >= level.threshold())
            .unwrap_or(Level::Student)
    }

    /// Next level up, or `None` at the top.
    pub fn next(self) -> Option<Self> {
        Self::ALL.into_iter().find(|level| *level > self)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Student => "Student",
            Level::Scholar => "Scholar",
            Level::Genius => "Genius",
            Level::Mastermind => "Mastermind",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Badge {
    #[serde(rename = "Early Bird")]
    EarlyBird,
    #[serde(rename = "Night Owl")]
    NightOwl,
    #[serde(rename = "Marathon Focus")]
    MarathonFocus,
    #[serde(rename = "Brain Recharger")]
    BrainRecharger,
    #[serde(rename = "Deep Streak Master")]
    DeepStreakMaster,
}

impl Badge {
    pub fn name(self) -> &'static str {
        match self {
            Badge::EarlyBird => "Early Bird",
            Badge::NightOwl => "Night Owl",
            Badge::MarathonFocus => "Marathon Focus",
            Badge::BrainRecharger => "Brain Recharger",
            Badge::DeepStreakMaster => "Deep Streak Master",
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Score of one plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamificationState {
    pub xp: u32,
    pub level: Level,
    /// Longest run of deep task blocks without a break or light task
    pub streak: u32,
    pub badges: Vec<Badge>,
}

impl GamificationState {
    /// XP still missing for the next level.
    pub fn xp_to_next_level(&self) -> Option<u32> {
        self.level
            .next()
            .map(|next| next.threshold().saturating_sub(self.xp))
    }
}

/// Score `blocks` in order. Blocks are expected sorted by start.
pub fn score(blocks: &[ScheduledBlock], cfg: &PlannerConfig) -> GamificationState {
    let mut xp = 0u32;
    let mut streak = 0u32;
    let mut max_streak = 0u32;
    let mut deep_minutes = 0u32;
    let mut early = false;
    let mut late = false;
    let mut took_break = false;

    for block in blocks {
        match block.kind {
            BlockKind::Break => {
                xp += BREAK_XP;
                streak = 0;
                took_break = true;
            }
            BlockKind::Task => {
                xp += TASK_BASE_XP + (block.cognitive_load * XP_PER_LOAD_POINT).floor() as u32;
                if cfg.is_deep(block.cognitive_load) {
                    streak += 1;
                    max_streak = max_streak.max(streak);
                    deep_minutes += block.duration_minutes();
                } else {
                    streak = 0;
                }
                early |= block.start < EARLY_BIRD_BEFORE;
                late |= block.end > NIGHT_OWL_AFTER;
            }
        }
    }

    xp += max_streak * STREAK_BONUS_XP;

    let badges = [
        (early, Badge::EarlyBird),
        (late, Badge::NightOwl),
        (deep_minutes >= MARATHON_DEEP_MINUTES, Badge::MarathonFocus),
        (took_break, Badge::BrainRecharger),
        (max_streak >= STREAK_MASTER_RUN, Badge::DeepStreakMaster),
    ]
    .into_iter()
    .filter_map(|(earned, badge)| earned.then_some(badge))
    .collect();

    GamificationState {
        xp,
        level: Level::for_xp(xp),
        streak: max_streak,
        badges,
    }
}
