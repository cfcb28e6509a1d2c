//! Choice application: turns one resolved decision into the next state.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{DEGRADATION_MAX, DEGRADATION_MIN};
use crate::data::Choice;
use crate::rules::{EnergyTier, Rules};
use crate::state::{GameState, Stats, clamp, clamp_stat};

/// Breakdown of the penalties rolled while applying a choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceEffect {
    pub tier: EnergyTier,
    pub bug_delta: i32,
    pub fatigue_bugs: i32,
    pub quality_penalty: i32,
    pub degradation_delta: i32,
}

impl Rules {
    /// Apply `choice` to `state` and return the successor state.
    ///
    /// Draws the kind bug roll first, then the fatigue roll when the
    /// pre-update energy lands in a fatigue tier.
    pub fn apply_choice<R: Rng>(&self, state: &GameState, choice: Choice, rng: &mut R) -> GameState {
        self.apply_choice_detailed(state, choice, rng).0
    }

    /// Same as [`Rules::apply_choice`] but also reports the rolled penalties.
    pub fn apply_choice_detailed<R: Rng>(
        &self,
        state: &GameState,
        choice: Choice,
        rng: &mut R,
    ) -> (GameState, ChoiceEffect) {
        let cfg = self.config();
        let before = state.stats;

        let bug_delta = cfg.bugs.for_kind(choice.kind).roll(rng);

        let tier = cfg.fatigue.tier(before.energy);
        let (fatigue_bugs, quality_penalty, fatigue_degradation) =
            match cfg.fatigue.penalties(tier) {
                Some(penalty) => (
                    penalty.extra_bugs.roll(rng),
                    penalty.quality_penalty,
                    penalty.degradation,
                ),
                None => (0, 0, 0),
            };

        let impact = choice.impact;
        // Sums saturate so any impact clamps instead of overflowing.
        let stats = Stats {
            quality: clamp_stat(
                before
                    .quality
                    .saturating_add(impact.quality)
                    .saturating_add(quality_penalty),
            ),
            progress: clamp_stat(before.progress.saturating_add(impact.progress)),
            energy: clamp_stat(before.energy.saturating_add(impact.energy)),
            bug_count: before
                .bug_count
                .saturating_add(bug_delta)
                .saturating_add(fatigue_bugs)
                .max(0),
        };

        let degradation_delta = impact
            .visual_degradation
            .saturating_add(cfg.degradation_bias.for_kind(choice.kind))
            .saturating_add(fatigue_degradation);
        let visual_degradation = clamp(
            state.visual_degradation.saturating_add(degradation_delta),
            DEGRADATION_MIN,
            DEGRADATION_MAX,
        );

        log::debug!(
            "day {} {} choice: quality {}→{}, progress {}→{}, energy {}→{}, bugs {}→{}, degradation {}→{} ({:?})",
            choice.day,
            choice.kind,
            before.quality,
            stats.quality,
            before.progress,
            stats.progress,
            before.energy,
            stats.energy,
            before.bug_count,
            stats.bug_count,
            state.visual_degradation,
            visual_degradation,
            tier,
        );

        let mut choices = Vec::with_capacity(state.choices.len() + 1);
        choices.extend_from_slice(&state.choices);
        choices.push(choice);

        let next = GameState {
            stats,
            visual_degradation,
            choices,
            ..state.clone()
        };
        let effect = ChoiceEffect {
            tier,
            bug_delta,
            fatigue_bugs,
            quality_penalty,
            degradation_delta,
        };
        (next, effect)
    }
}

/// Apply `choice` under the standard rules.
pub fn apply_choice<R: Rng>(state: &GameState, choice: Choice, rng: &mut R) -> GameState {
    Rules::standard().apply_choice(state, choice, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ChoiceKind, Impact};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rand::rngs::mock::StepRng;

    fn state_with_energy(energy: i32) -> GameState {
        let mut state = GameState::new();
        state.stats.energy = energy;
        state
    }

    fn choice(kind: ChoiceKind, impact: Impact) -> Choice {
        Choice::new(4, kind, "test", impact)
    }

    #[test]
    fn compromise_rolls_bugs_and_degradation_bias() {
        let mut rng = SmallRng::seed_from_u64(7);
        let state = GameState::new();
        let (next, effect) = Rules::standard().apply_choice_detailed(
            &state,
            choice(ChoiceKind::Compromise, Impact::new(5, 10, -3, -2)),
            &mut rng,
        );
        assert!((3..=7).contains(&effect.bug_delta));
        assert_eq!(effect.tier, EnergyTier::Rested);
        assert_eq!(effect.fatigue_bugs, 0);
        assert_eq!(next.stats.bug_count, effect.bug_delta);
        assert_eq!(next.stats.quality, 97);
        assert_eq!(next.stats.progress, 10);
        assert_eq!(next.stats.energy, 98);
        assert_eq!(next.visual_degradation, 7);
    }

    #[test]
    fn extreme_impacts_clamp_instead_of_overflowing() {
        let mut rng = SmallRng::seed_from_u64(41);
        let mut worn = state_with_energy(10);
        worn.stats.bug_count = i32::MAX;
        worn.visual_degradation = 100;
        let high = apply_choice(
            &worn,
            choice(ChoiceKind::Compromise, Impact::new(i32::MAX, i32::MAX, i32::MAX, i32::MAX)),
            &mut rng,
        );
        assert_eq!(high.stats.quality, 100);
        assert_eq!(high.stats.progress, 100);
        assert_eq!(high.stats.energy, 100);
        assert_eq!(high.stats.bug_count, i32::MAX);
        assert_eq!(high.visual_degradation, 100);

        let low = apply_choice(
            &GameState::new(),
            choice(ChoiceKind::Perfectionism, Impact::new(i32::MIN, i32::MIN, i32::MIN, i32::MIN)),
            &mut rng,
        );
        assert_eq!(low.stats.quality, 0);
        assert_eq!(low.stats.progress, 0);
        assert_eq!(low.stats.energy, 0);
        assert_eq!(low.stats.bug_count, 0);
        assert_eq!(low.visual_degradation, 0);
    }

    #[test]
    fn perfectionism_never_drops_bugs_below_zero() {
        let mut rng = SmallRng::seed_from_u64(3);
        let state = GameState::new();
        let next = apply_choice(
            &state,
            choice(ChoiceKind::Perfectionism, Impact::default()),
            &mut rng,
        );
        assert_eq!(next.stats.bug_count, 0);
        assert_eq!(next.visual_degradation, 0);
    }

    #[test]
    fn exhausted_energy_adds_quality_penalty_and_degradation() {
        let mut rng = SmallRng::seed_from_u64(19);
        let state = state_with_energy(20);
        let (next, effect) = Rules::standard().apply_choice_detailed(
            &state,
            choice(ChoiceKind::Neutral, Impact::default()),
            &mut rng,
        );
        assert_eq!(effect.tier, EnergyTier::Exhausted);
        assert!((3..=7).contains(&effect.fatigue_bugs));
        assert!((0..=2).contains(&effect.bug_delta));
        assert_eq!(next.stats.quality, 95);
        assert_eq!(next.visual_degradation, 3);
        assert_eq!(
            next.stats.bug_count,
            effect.bug_delta + effect.fatigue_bugs
        );
    }

    #[test]
    fn tired_energy_adds_smaller_penalty() {
        let mut rng = SmallRng::seed_from_u64(23);
        let state = state_with_energy(50);
        let (next, effect) = Rules::standard().apply_choice_detailed(
            &state,
            choice(ChoiceKind::Neutral, Impact::new(0, 0, 0, 30)),
            &mut rng,
        );
        assert_eq!(effect.tier, EnergyTier::Tired);
        assert!((1..=3).contains(&effect.fatigue_bugs));
        assert_eq!(next.stats.quality, 98);
        assert_eq!(next.stats.energy, 80);
        assert_eq!(next.visual_degradation, 1);
    }

    #[test]
    fn history_is_appended_without_touching_previous_state() {
        let mut rng = SmallRng::seed_from_u64(1);
        let first = apply_choice(
            &GameState::new(),
            choice(ChoiceKind::Neutral, Impact::default()),
            &mut rng,
        );
        let second = apply_choice(
            &first,
            choice(ChoiceKind::Compromise, Impact::default()),
            &mut rng,
        );
        assert_eq!(first.choices.len(), 1);
        assert_eq!(second.choices.len(), 2);
        assert_eq!(second.choices[0], first.choices[0]);
        assert_eq!(second.choices[1].kind, ChoiceKind::Compromise);
    }

    #[test]
    fn day_and_completion_are_untouched() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut state = GameState::new();
        state.current_day = 12;
        let next = apply_choice(
            &state,
            choice(ChoiceKind::Skip, Impact::new(0, 4, 0, 0)),
            &mut rng,
        );
        assert_eq!(next.current_day, 12);
        assert!(!next.is_complete);
        assert!(next.ending.is_none());
    }

    #[test]
    fn out_of_range_impacts_are_clamped() {
        let mut rng = SmallRng::seed_from_u64(9);
        let next = apply_choice(
            &GameState::new(),
            choice(ChoiceKind::Neutral, Impact::new(500, 400, 300, 200)),
            &mut rng,
        );
        assert_eq!(next.stats.quality, 100);
        assert_eq!(next.stats.progress, 100);
        assert_eq!(next.stats.energy, 100);
        assert_eq!(next.visual_degradation, 100);

        let drained = apply_choice(
            &next,
            choice(ChoiceKind::Neutral, Impact::new(-500, -400, -300, -200)),
            &mut rng,
        );
        assert_eq!(drained.stats.quality, 0);
        assert_eq!(drained.stats.progress, 0);
        assert_eq!(drained.stats.energy, 0);
        assert_eq!(drained.visual_degradation, 0);
    }

    #[test]
    fn pinned_rng_gives_exact_bug_counts() {
        // StepRng(0, 0) always yields zero, which maps to the low end of each range.
        let mut rng = StepRng::new(0, 0);
        let next = apply_choice(
            &state_with_energy(10),
            choice(ChoiceKind::Compromise, Impact::default()),
            &mut rng,
        );
        assert_eq!(next.stats.bug_count, 3 + 3);
        assert_eq!(next.visual_degradation, 2 + 3);
        assert_eq!(next.stats.quality, 95);
    }
}
