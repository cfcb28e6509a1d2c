//! Ending classification and end-of-run summary
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::data::{Choice, ChoiceKind};
use crate::rules::{EndingThresholds, Rules};
use crate::state::{GameState, Stats, count_kind};

/// Terminal classification of a finished playthrough
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ending {
    /// High quality and near-complete progress with few shortcuts
    Miracle,
    /// Quit before the project got going
    Abandon,
    /// Polished forever, never shipped
    Perfectionism,
    /// Shipped something that works, mostly
    Compromise,
}

impl Ending {
    pub const ALL: [Self; 4] = [
        Self::Miracle,
        Self::Abandon,
        Self::Perfectionism,
        Self::Compromise,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Miracle => "miracle",
            Self::Abandon => "abandon",
            Self::Perfectionism => "perfectionism",
            Self::Compromise => "compromise",
        }
    }

    /// Translation key for the ending screen headline.
    #[must_use]
    pub const fn headline_key(self) -> &'static str {
        match self {
            Self::Miracle => "result.headline.miracle",
            Self::Abandon => "result.headline.abandon",
            Self::Perfectionism => "result.headline.perfectionism",
            Self::Compromise => "result.headline.compromise",
        }
    }

    /// Whether the ending screen shows a store review.
    #[must_use]
    pub const fn shipped(self) -> bool {
        matches!(self, Self::Miracle | Self::Compromise)
    }
}

impl fmt::Display for Ending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ending {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "miracle" => Ok(Self::Miracle),
            "abandon" => Ok(Self::Abandon),
            "perfectionism" => Ok(Self::Perfectionism),
            "compromise" => Ok(Self::Compromise),
            _ => Err(()),
        }
    }
}

impl EndingThresholds {
    /// Classify a run. Rules are checked in strict priority order.
    ///
    /// `final_day` is the day the player was on when the run ended, before
    /// any rollover increment.
    #[must_use]
    pub fn classify(&self, final_day: u32, stats: &Stats, choices: &[Choice]) -> Ending {
        let compromises = count_kind(choices, ChoiceKind::Compromise);
        let perfectionisms = count_kind(choices, ChoiceKind::Perfectionism);

        if stats.quality >= self.miracle_min_quality
            && stats.progress >= self.miracle_min_progress
            && compromises < self.miracle_max_compromises
        {
            return Ending::Miracle;
        }
        if final_day < self.abandon_before_day {
            return Ending::Abandon;
        }
        if perfectionisms > compromises.saturating_mul(self.perfectionism_ratio)
            || (stats.quality > self.perfectionism_quality_above
                && stats.progress < self.perfectionism_progress_below)
        {
            return Ending::Perfectionism;
        }
        Ending::Compromise
    }
}

/// Classify under the standard thresholds.
#[must_use]
pub fn classify_ending(final_day: u32, stats: &Stats, choices: &[Choice]) -> Ending {
    Rules::standard()
        .config()
        .endings
        .classify(final_day, stats, choices)
}

/// Per-kind tally of the decision history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChoiceTally {
    pub compromise: usize,
    pub perfectionism: usize,
    pub neutral: usize,
    pub skip: usize,
    pub abandon: usize,
}

impl ChoiceTally {
    #[must_use]
    pub fn from_choices(choices: &[Choice]) -> Self {
        let mut tally = Self::default();
        for choice in choices {
            match choice.kind {
                ChoiceKind::Compromise => tally.compromise += 1,
                ChoiceKind::Perfectionism => tally.perfectionism += 1,
                ChoiceKind::Neutral => tally.neutral += 1,
                ChoiceKind::Skip => tally.skip += 1,
                ChoiceKind::Abandon => tally.abandon += 1,
            }
        }
        tally
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.compromise + self.perfectionism + self.neutral + self.skip + self.abandon
    }
}

/// Summary of a finished run for the ending screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub ending: Ending,
    pub headline_key: String,
    pub days_played: u32,
    pub stats: Stats,
    pub visual_degradation: i32,
    pub tally: ChoiceTally,
    pub skipped_minigames: usize,
    pub genre: Option<String>,
}

/// Build the ending-screen summary for a completed run.
///
/// Returns `None` while the run is still in progress.
#[must_use]
pub fn result_summary(state: &GameState, rules: &Rules) -> Option<ResultSummary> {
    let ending = state.ending?;
    if !state.is_complete {
        return None;
    }
    let days_played = state.current_day.min(rules.final_day());
    let skipped_minigames = state
        .choices
        .iter()
        .filter(|choice| choice.minigame_skip)
        .count();
    Some(ResultSummary {
        ending,
        headline_key: ending.headline_key().to_string(),
        days_played,
        stats: state.stats,
        visual_degradation: state.visual_degradation,
        tally: ChoiceTally::from_choices(&state.choices),
        skipped_minigames,
        genre: state.selected_genre.map(|genre| genre.to_string()),
    })
}
