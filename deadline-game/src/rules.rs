//! Tunable rule set for choice application and ending classification.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;

use crate::constants::{
    ABANDON_BEFORE_DAY, COMPROMISE_BUGS_MAX, COMPROMISE_BUGS_MIN, COMPROMISE_DEGRADATION_BIAS,
    EXHAUSTED_BUGS_MAX, EXHAUSTED_BUGS_MIN, EXHAUSTED_DEGRADATION, EXHAUSTED_ENERGY_MAX,
    EXHAUSTED_QUALITY_PENALTY, FINAL_DAY, MIRACLE_MAX_COMPROMISES, MIRACLE_MIN_PROGRESS,
    MIRACLE_MIN_QUALITY, PERFECTIONISM_BUGS_MAX, PERFECTIONISM_BUGS_MIN,
    PERFECTIONISM_DEGRADATION_BIAS, PERFECTIONISM_PROGRESS_BELOW, PERFECTIONISM_QUALITY_ABOVE,
    PERFECTIONISM_RATIO, ROUTINE_BUGS_MAX, ROUTINE_BUGS_MIN, TIRED_BUGS_MAX, TIRED_BUGS_MIN,
    TIRED_DEGRADATION, TIRED_ENERGY_MAX, TIRED_QUALITY_PENALTY,
};
use crate::data::ChoiceKind;

const DEFAULT_RULES_DATA: &str = include_str!("../assets/data/rules.json");

/// Errors raised when rule configuration invariants are violated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RulesConfigError {
    #[error("{field} roll minimum {min} exceeds maximum {max}")]
    InvertedRange {
        field: &'static str,
        min: i32,
        max: i32,
    },
    #[error("exhausted energy ceiling {exhausted} must be below tired ceiling {tired}")]
    TierOrder { exhausted: i32, tired: i32 },
    #[error("{field} must be between {min} and {max} (got {value})")]
    RangeViolation {
        field: &'static str,
        min: i32,
        max: i32,
        value: i32,
    },
    #[error("final day must be at least 1")]
    FinalDay,
}

/// Inclusive integer roll range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollRange {
    pub min: i32,
    pub max: i32,
}

impl RollRange {
    #[must_use]
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Draw a uniform value from the range. Degenerate ranges never touch the rng.
    pub fn roll<R: Rng>(self, rng: &mut R) -> i32 {
        if self.min >= self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }

    #[must_use]
    pub const fn contains(self, value: i32) -> bool {
        value >= self.min && value <= self.max
    }

    fn validate(self, field: &'static str) -> Result<(), RulesConfigError> {
        if self.min > self.max {
            return Err(RulesConfigError::InvertedRange {
                field,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Bug rolls keyed by choice kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BugRollCfg {
    #[serde(default = "BugRollCfg::default_compromise")]
    pub compromise: RollRange,
    #[serde(default = "BugRollCfg::default_perfectionism")]
    pub perfectionism: RollRange,
    #[serde(default = "BugRollCfg::default_routine")]
    pub routine: RollRange,
}

impl BugRollCfg {
    const fn default_compromise() -> RollRange {
        RollRange::new(COMPROMISE_BUGS_MIN, COMPROMISE_BUGS_MAX)
    }

    const fn default_perfectionism() -> RollRange {
        RollRange::new(PERFECTIONISM_BUGS_MIN, PERFECTIONISM_BUGS_MAX)
    }

    const fn default_routine() -> RollRange {
        RollRange::new(ROUTINE_BUGS_MIN, ROUTINE_BUGS_MAX)
    }

    /// Range used for `kind`. Neutral, skip and abandon share the routine roll.
    #[must_use]
    pub const fn for_kind(&self, kind: ChoiceKind) -> RollRange {
        match kind {
            ChoiceKind::Compromise => self.compromise,
            ChoiceKind::Perfectionism => self.perfectionism,
            ChoiceKind::Skip | ChoiceKind::Neutral | ChoiceKind::Abandon => self.routine,
        }
    }
}

impl Default for BugRollCfg {
    fn default() -> Self {
        Self {
            compromise: Self::default_compromise(),
            perfectionism: Self::default_perfectionism(),
            routine: Self::default_routine(),
        }
    }
}

/// Penalties applied while pre-update energy sits at or below `max_energy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FatigueTierCfg {
    pub max_energy: i32,
    pub extra_bugs: RollRange,
    pub quality_penalty: i32,
    pub degradation: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FatigueCfg {
    #[serde(default = "FatigueCfg::default_exhausted")]
    pub exhausted: FatigueTierCfg,
    #[serde(default = "FatigueCfg::default_tired")]
    pub tired: FatigueTierCfg,
}

impl FatigueCfg {
    const fn default_exhausted() -> FatigueTierCfg {
        FatigueTierCfg {
            max_energy: EXHAUSTED_ENERGY_MAX,
            extra_bugs: RollRange::new(EXHAUSTED_BUGS_MIN, EXHAUSTED_BUGS_MAX),
            quality_penalty: EXHAUSTED_QUALITY_PENALTY,
            degradation: EXHAUSTED_DEGRADATION,
        }
    }

    const fn default_tired() -> FatigueTierCfg {
        FatigueTierCfg {
            max_energy: TIRED_ENERGY_MAX,
            extra_bugs: RollRange::new(TIRED_BUGS_MIN, TIRED_BUGS_MAX),
            quality_penalty: TIRED_QUALITY_PENALTY,
            degradation: TIRED_DEGRADATION,
        }
    }

    /// Tier for a pre-update energy reading.
    #[must_use]
    pub const fn tier(&self, energy: i32) -> EnergyTier {
        if energy <= self.exhausted.max_energy {
            EnergyTier::Exhausted
        } else if energy <= self.tired.max_energy {
            EnergyTier::Tired
        } else {
            EnergyTier::Rested
        }
    }

    #[must_use]
    pub const fn penalties(&self, tier: EnergyTier) -> Option<&FatigueTierCfg> {
        match tier {
            EnergyTier::Exhausted => Some(&self.exhausted),
            EnergyTier::Tired => Some(&self.tired),
            EnergyTier::Rested => None,
        }
    }
}

impl Default for FatigueCfg {
    fn default() -> Self {
        Self {
            exhausted: Self::default_exhausted(),
            tired: Self::default_tired(),
        }
    }
}

/// Fatigue band derived from energy before a choice lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyTier {
    Rested,
    Tired,
    Exhausted,
}

/// Extra degradation applied per choice kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegradationBiasCfg {
    #[serde(default = "DegradationBiasCfg::default_compromise")]
    pub compromise: i32,
    #[serde(default = "DegradationBiasCfg::default_perfectionism")]
    pub perfectionism: i32,
}

impl DegradationBiasCfg {
    const fn default_compromise() -> i32 {
        COMPROMISE_DEGRADATION_BIAS
    }

    const fn default_perfectionism() -> i32 {
        PERFECTIONISM_DEGRADATION_BIAS
    }

    #[must_use]
    pub const fn for_kind(&self, kind: ChoiceKind) -> i32 {
        match kind {
            ChoiceKind::Compromise => self.compromise,
            ChoiceKind::Perfectionism => self.perfectionism,
            ChoiceKind::Skip | ChoiceKind::Neutral | ChoiceKind::Abandon => 0,
        }
    }
}

impl Default for DegradationBiasCfg {
    fn default() -> Self {
        Self {
            compromise: Self::default_compromise(),
            perfectionism: Self::default_perfectionism(),
        }
    }
}

/// Thresholds for the ending classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndingThresholds {
    #[serde(default = "EndingThresholds::default_miracle_min_quality")]
    pub miracle_min_quality: i32,
    #[serde(default = "EndingThresholds::default_miracle_min_progress")]
    pub miracle_min_progress: i32,
    /// Compromise count must stay strictly below this.
    #[serde(default = "EndingThresholds::default_miracle_max_compromises")]
    pub miracle_max_compromises: usize,
    #[serde(default = "EndingThresholds::default_abandon_before_day")]
    pub abandon_before_day: u32,
    #[serde(default = "EndingThresholds::default_perfectionism_ratio")]
    pub perfectionism_ratio: usize,
    #[serde(default = "EndingThresholds::default_perfectionism_quality_above")]
    pub perfectionism_quality_above: i32,
    #[serde(default = "EndingThresholds::default_perfectionism_progress_below")]
    pub perfectionism_progress_below: i32,
}

impl EndingThresholds {
    const fn default_miracle_min_quality() -> i32 {
        MIRACLE_MIN_QUALITY
    }

    const fn default_miracle_min_progress() -> i32 {
        MIRACLE_MIN_PROGRESS
    }

    const fn default_miracle_max_compromises() -> usize {
        MIRACLE_MAX_COMPROMISES
    }

    const fn default_abandon_before_day() -> u32 {
        ABANDON_BEFORE_DAY
    }

    const fn default_perfectionism_ratio() -> usize {
        PERFECTIONISM_RATIO
    }

    const fn default_perfectionism_quality_above() -> i32 {
        PERFECTIONISM_QUALITY_ABOVE
    }

    const fn default_perfectionism_progress_below() -> i32 {
        PERFECTIONISM_PROGRESS_BELOW
    }
}

impl Default for EndingThresholds {
    fn default() -> Self {
        Self {
            miracle_min_quality: Self::default_miracle_min_quality(),
            miracle_min_progress: Self::default_miracle_min_progress(),
            miracle_max_compromises: Self::default_miracle_max_compromises(),
            abandon_before_day: Self::default_abandon_before_day(),
            perfectionism_ratio: Self::default_perfectionism_ratio(),
            perfectionism_quality_above: Self::default_perfectionism_quality_above(),
            perfectionism_progress_below: Self::default_perfectionism_progress_below(),
        }
    }
}

/// Complete rule set as stored in `rules.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default = "RulesConfig::default_final_day")]
    pub final_day: u32,
    #[serde(default)]
    pub bugs: BugRollCfg,
    #[serde(default)]
    pub fatigue: FatigueCfg,
    #[serde(default)]
    pub degradation_bias: DegradationBiasCfg,
    #[serde(default)]
    pub endings: EndingThresholds,
}

impl RulesConfig {
    const fn default_final_day() -> u32 {
        FINAL_DAY
    }

    /// Parse a rule set from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn load_from_static() -> Self {
        Self::from_json(DEFAULT_RULES_DATA).unwrap_or_default()
    }

    /// Check the invariants the engine relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), RulesConfigError> {
        if self.final_day == 0 {
            return Err(RulesConfigError::FinalDay);
        }
        self.bugs.compromise.validate("bugs.compromise")?;
        self.bugs.perfectionism.validate("bugs.perfectionism")?;
        self.bugs.routine.validate("bugs.routine")?;
        self.fatigue
            .exhausted
            .extra_bugs
            .validate("fatigue.exhausted.extra_bugs")?;
        self.fatigue
            .tired
            .extra_bugs
            .validate("fatigue.tired.extra_bugs")?;
        if self.fatigue.exhausted.max_energy >= self.fatigue.tired.max_energy {
            return Err(RulesConfigError::TierOrder {
                exhausted: self.fatigue.exhausted.max_energy,
                tired: self.fatigue.tired.max_energy,
            });
        }
        for (field, value) in [
            ("endings.miracle_min_quality", self.endings.miracle_min_quality),
            (
                "endings.miracle_min_progress",
                self.endings.miracle_min_progress,
            ),
            (
                "endings.perfectionism_quality_above",
                self.endings.perfectionism_quality_above,
            ),
            (
                "endings.perfectionism_progress_below",
                self.endings.perfectionism_progress_below,
            ),
        ] {
            if !(0..=100).contains(&value) {
                return Err(RulesConfigError::RangeViolation {
                    field,
                    min: 0,
                    max: 100,
                    value,
                });
            }
        }
        Ok(())
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            final_day: Self::default_final_day(),
            bugs: BugRollCfg::default(),
            fatigue: FatigueCfg::default(),
            degradation_bias: DegradationBiasCfg::default(),
            endings: EndingThresholds::default(),
        }
    }
}

/// Validated rule set shared by the engine entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rules {
    cfg: RulesConfig,
}

impl Rules {
    /// Wrap a configuration after checking its invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn new(cfg: RulesConfig) -> Result<Self, RulesConfigError> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    /// Rules bundled with the crate, falling back to the built-in defaults.
    #[must_use]
    pub fn standard() -> &'static Self {
        static RULES: OnceLock<Rules> = OnceLock::new();
        RULES.get_or_init(|| {
            Self::new(RulesConfig::load_from_static()).unwrap_or_else(|err| {
                log::warn!("bundled rules rejected ({err}); using defaults");
                Self {
                    cfg: RulesConfig::default(),
                }
            })
        })
    }

    #[must_use]
    pub const fn config(&self) -> &RulesConfig {
        &self.cfg
    }

    #[must_use]
    pub const fn final_day(&self) -> u32 {
        self.cfg.final_day
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::standard().clone()
    }
}
