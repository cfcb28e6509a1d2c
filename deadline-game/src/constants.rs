//! Centralized balance and tuning constants for Deadline game logic.
//!
//! The rule values here are the defaults of `RulesConfig`; the bundled
//! `rules.json` restates them and may override them per build.

// Stat bounds ----------------------------------------------------------------
pub(crate) const STAT_MIN: i32 = 0;
pub(crate) const STAT_MAX: i32 = 100;
pub(crate) const BUG_COUNT_FLOOR: i32 = 0;
pub(crate) const DEGRADATION_MIN: i32 = 0;
pub(crate) const DEGRADATION_MAX: i32 = 100;

// Fresh game -----------------------------------------------------------------
pub(crate) const INITIAL_QUALITY: i32 = 100;
pub(crate) const INITIAL_PROGRESS: i32 = 0;
pub(crate) const INITIAL_ENERGY: i32 = 100;

// Timeline -------------------------------------------------------------------
pub(crate) const FINAL_DAY: u32 = 30;
pub(crate) const ACT_ONE_LAST_DAY: u32 = 5;
pub(crate) const ACT_TWO_LAST_DAY: u32 = 20;

// Bug rolls by choice kind (inclusive ranges) -------------------------------
pub(crate) const COMPROMISE_BUGS_MIN: i32 = 3;
pub(crate) const COMPROMISE_BUGS_MAX: i32 = 7;
pub(crate) const PERFECTIONISM_BUGS_MIN: i32 = -3;
pub(crate) const PERFECTIONISM_BUGS_MAX: i32 = -1;
pub(crate) const ROUTINE_BUGS_MIN: i32 = 0;
pub(crate) const ROUTINE_BUGS_MAX: i32 = 2;

// Fatigue tiers (pre-update energy) -----------------------------------------
pub(crate) const EXHAUSTED_ENERGY_MAX: i32 = 20;
pub(crate) const EXHAUSTED_BUGS_MIN: i32 = 3;
pub(crate) const EXHAUSTED_BUGS_MAX: i32 = 7;
pub(crate) const EXHAUSTED_QUALITY_PENALTY: i32 = -5;
pub(crate) const EXHAUSTED_DEGRADATION: i32 = 3;
pub(crate) const TIRED_ENERGY_MAX: i32 = 50;
pub(crate) const TIRED_BUGS_MIN: i32 = 1;
pub(crate) const TIRED_BUGS_MAX: i32 = 3;
pub(crate) const TIRED_QUALITY_PENALTY: i32 = -2;
pub(crate) const TIRED_DEGRADATION: i32 = 1;

// Degradation bias by choice kind -------------------------------------------
pub(crate) const COMPROMISE_DEGRADATION_BIAS: i32 = 2;
pub(crate) const PERFECTIONISM_DEGRADATION_BIAS: i32 = -1;

// Ending thresholds ----------------------------------------------------------
pub(crate) const MIRACLE_MIN_QUALITY: i32 = 80;
pub(crate) const MIRACLE_MIN_PROGRESS: i32 = 95;
pub(crate) const MIRACLE_MAX_COMPROMISES: usize = 5; // exclusive
pub(crate) const ABANDON_BEFORE_DAY: u32 = 15;
pub(crate) const PERFECTIONISM_RATIO: usize = 2;
pub(crate) const PERFECTIONISM_QUALITY_ABOVE: i32 = 70;
pub(crate) const PERFECTIONISM_PROGRESS_BELOW: i32 = 70;

// Presentation policy --------------------------------------------------------
pub(crate) const BAND_STRAINED_FROM: i32 = 30;
pub(crate) const BAND_COLLAPSING_FROM: i32 = 70;
pub(crate) const UI_NORMAL_ABOVE: i32 = 30;
pub(crate) const UI_CLUTTERED_ABOVE: i32 = 70;
pub(crate) const HUD_PROGRESS_AFTER_DAY: u32 = 3;
pub(crate) const HUD_BUGS_AFTER_DAY: u32 = 6;
pub(crate) const HUD_DEADLINE_AFTER_DAY: u32 = 10;
pub(crate) const OPACITY_LOSS_PER_POINT: f32 = 0.009;
pub(crate) const BLUR_PX_PER_POINT: f32 = 0.2;
pub(crate) const HUD_BASE_OPACITY: f32 = 0.5;
pub(crate) const HUD_OPACITY_PER_POINT: f32 = 0.006;
pub(crate) const HUD_SCALE_PER_POINT: f32 = 0.002;
pub(crate) const HUD_MAX_SCALE: f32 = 1.2;

// Stream tags ----------------------------------------------------------------
pub(crate) const RNG_DOMAIN_CHOICES: &[u8] = b"choices";

// Script text ----------------------------------------------------------------
pub(crate) const SKIP_CHOICE_DESCRIPTION: &str = "skipped";
