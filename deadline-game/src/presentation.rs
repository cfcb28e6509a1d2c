//! Pure presentation policy derived from game state.
//!
//! Nothing here mutates state; hosts read these values to style the
//! background, the HUD and the day text.
use serde::{Deserialize, Serialize};

use crate::constants::{
    ACT_ONE_LAST_DAY, ACT_TWO_LAST_DAY, BAND_COLLAPSING_FROM, BAND_STRAINED_FROM,
    BLUR_PX_PER_POINT, DEGRADATION_MAX, DEGRADATION_MIN, HUD_BASE_OPACITY, HUD_BUGS_AFTER_DAY,
    HUD_DEADLINE_AFTER_DAY, HUD_MAX_SCALE, HUD_OPACITY_PER_POINT, HUD_PROGRESS_AFTER_DAY,
    HUD_SCALE_PER_POINT, OPACITY_LOSS_PER_POINT, UI_CLUTTERED_ABOVE, UI_NORMAL_ABOVE,
};
use crate::numbers::i32_to_f32;
use crate::rules::Rules;
use crate::state::{GameState, clamp};

/// Coarse degradation bucket driving the day layout: `0..30`, `30..70`, `70..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegradationBand {
    Clean,
    Strained,
    Collapsing,
}

impl DegradationBand {
    #[must_use]
    pub const fn from_degradation(degradation: i32) -> Self {
        if degradation >= BAND_COLLAPSING_FROM {
            Self::Collapsing
        } else if degradation >= BAND_STRAINED_FROM {
            Self::Strained
        } else {
            Self::Clean
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiComplexity {
    Minimal,
    Normal,
    Cluttered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextVerbosity {
    Poetic,
    Concise,
    Minimal,
}

/// Background and text styling for a degradation level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualConfig {
    pub background_opacity: f32,
    /// Blur radius in pixels.
    pub background_blur: f32,
    /// Percent, 0..=100.
    pub saturation: i32,
    pub ui_complexity: UiComplexity,
    pub text_verbosity: TextVerbosity,
}

impl VisualConfig {
    #[must_use]
    pub fn from_degradation(degradation: i32) -> Self {
        let d = clamp(degradation, DEGRADATION_MIN, DEGRADATION_MAX);
        let points = i32_to_f32(d);
        let (ui_complexity, text_verbosity) = if d > UI_CLUTTERED_ABOVE {
            (UiComplexity::Cluttered, TextVerbosity::Minimal)
        } else if d > UI_NORMAL_ABOVE {
            (UiComplexity::Normal, TextVerbosity::Concise)
        } else {
            (UiComplexity::Minimal, TextVerbosity::Poetic)
        };
        Self {
            background_opacity: OPACITY_LOSS_PER_POINT.mul_add(-points, 1.0),
            background_blur: points * BLUR_PX_PER_POINT,
            saturation: DEGRADATION_MAX - d,
            ui_complexity,
            text_verbosity,
        }
    }

    #[must_use]
    pub fn for_state(state: &GameState) -> Self {
        Self::from_degradation(state.visual_degradation)
    }
}

/// Story act a day belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Act {
    Setup,
    Crunch,
    Release,
}

impl Act {
    #[must_use]
    pub const fn for_day(day: u32) -> Self {
        if day <= ACT_ONE_LAST_DAY {
            Self::Setup
        } else if day <= ACT_TWO_LAST_DAY {
            Self::Crunch
        } else {
            Self::Release
        }
    }

    /// One-based act number as used by the day script.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Setup => 1,
            Self::Crunch => 2,
            Self::Release => 3,
        }
    }
}

/// Which HUD elements are visible, plus how loudly the HUD is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HudReveal {
    pub progress_bars: bool,
    pub bug_count: bool,
    pub deadline: bool,
    pub opacity: f32,
    pub scale: f32,
}

impl HudReveal {
    #[must_use]
    pub fn for_state(state: &GameState) -> Self {
        let day = state.current_day;
        let points = i32_to_f32(clamp(
            state.visual_degradation,
            DEGRADATION_MIN,
            DEGRADATION_MAX,
        ));
        Self {
            progress_bars: day > HUD_PROGRESS_AFTER_DAY,
            bug_count: day > HUD_BUGS_AFTER_DAY,
            deadline: day > HUD_DEADLINE_AFTER_DAY,
            opacity: HUD_OPACITY_PER_POINT.mul_add(points, HUD_BASE_OPACITY).min(1.0),
            scale: HUD_SCALE_PER_POINT.mul_add(points, 1.0).min(HUD_MAX_SCALE),
        }
    }
}

/// Days left on the deadline counter, never below zero.
#[must_use]
pub fn days_remaining(state: &GameState, rules: &Rules) -> u32 {
    rules.final_day().saturating_sub(state.current_day)
}
