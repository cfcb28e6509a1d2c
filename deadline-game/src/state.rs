use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    BUG_COUNT_FLOOR, INITIAL_ENERGY, INITIAL_PROGRESS, INITIAL_QUALITY, STAT_MAX, STAT_MIN,
};
use crate::data::{Choice, ChoiceKind};
use crate::result::Ending;

/// Clamp a value into `[lo, hi]`.
#[must_use]
pub fn clamp(value: i32, lo: i32, hi: i32) -> i32 {
    value.clamp(lo, hi)
}

/// Clamp a value into the shared `[0, 100]` stat range.
#[must_use]
pub fn clamp_stat(value: i32) -> i32 {
    clamp(value, STAT_MIN, STAT_MAX)
}

/// Project health counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stats {
    pub quality: i32,
    pub progress: i32,
    pub energy: i32,
    pub bug_count: i32, // 0..
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            quality: INITIAL_QUALITY,
            progress: INITIAL_PROGRESS,
            energy: INITIAL_ENERGY,
            bug_count: 0,
        }
    }
}

impl Stats {
    pub fn clamp(&mut self) {
        self.quality = clamp_stat(self.quality);
        self.progress = clamp_stat(self.progress);
        self.energy = clamp_stat(self.energy);
        self.bug_count = self.bug_count.max(BUG_COUNT_FLOOR);
    }

    #[must_use]
    pub fn clamped(mut self) -> Self {
        self.clamp();
        self
    }
}

/// Setting picked on the first day; selects description variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Genre {
    Fantasy,
    Cyberpunk,
    Postapoc,
}

impl Genre {
    pub const ALL: [Self; 3] = [Self::Fantasy, Self::Cyberpunk, Self::Postapoc];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fantasy => "fantasy",
            Self::Cyberpunk => "cyberpunk",
            Self::Postapoc => "postapoc",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Genre {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fantasy" => Ok(Self::Fantasy),
            "cyberpunk" => Ok(Self::Cyberpunk),
            "postapoc" => Ok(Self::Postapoc),
            _ => Err(()),
        }
    }
}

/// Lifecycle of a playthrough. `Complete` is terminal until reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    InProgress,
    Complete,
}

/// Aggregate root for a playthrough
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub current_day: u32,
    pub visual_degradation: i32,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub stats: Stats,
    #[serde(default)]
    pub is_complete: bool,
    #[serde(default)]
    pub ending: Option<Ending>,
    #[serde(default)]
    pub selected_genre: Option<Genre>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            current_day: 1,
            visual_degradation: 0,
            choices: Vec::new(),
            stats: Stats::default(),
            is_complete: false,
            ending: None,
            selected_genre: None,
        }
    }
}

impl GameState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn phase(&self) -> GamePhase {
        if self.is_complete {
            GamePhase::Complete
        } else {
            GamePhase::InProgress
        }
    }

    #[must_use]
    pub fn count_kind(&self, kind: ChoiceKind) -> usize {
        count_kind(&self.choices, kind)
    }

    #[must_use]
    pub fn with_genre(mut self, genre: Genre) -> Self {
        self.selected_genre = Some(genre);
        self
    }
}

/// Number of history entries tagged `kind`.
#[must_use]
pub fn count_kind(choices: &[Choice], kind: ChoiceKind) -> usize {
    choices.iter().filter(|choice| choice.kind == kind).count()
}
