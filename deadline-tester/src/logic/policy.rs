use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use deadline_game::{
    ChoiceKind, DayChoice, DayContent, DayScript, Ending, GameState, Genre, Impact, Minigame,
    MinigameOutcome, Rules, Stats, clamp_stat, derive_stream_seed,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

const POLICY_STREAM: &[u8] = b"policy";

/// Decision returned by a [`PlayerPolicy`]
#[derive(Debug, Clone)]
pub struct PolicyDecision {
    pub choice_id: String,
    pub rationale: Option<String>,
}

impl PolicyDecision {
    #[must_use]
    pub fn new(choice: &DayChoice, rationale: Option<String>) -> Self {
        Self {
            choice_id: choice.id.clone(),
            rationale,
        }
    }
}

/// Policy interface for automated play strategies.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Select one of today's choices. `None` when nothing is selectable.
    fn pick_choice(&mut self, state: &GameState, day: &DayContent) -> Option<PolicyDecision>;

    /// Decide how today's minigame ends.
    fn play_minigame(&mut self, _state: &GameState, _minigame: Option<Minigame>) -> MinigameOutcome {
        MinigameOutcome::Completed
    }

    /// Genre picked on the opening day.
    fn pick_genre(&mut self) -> Genre {
        Genre::Fantasy
    }
}

/// Built-in gameplay strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameplayStrategy {
    Perfectionist,
    Compromiser,
    Balanced,
    Quitter,
    Planner,
    Random,
}

impl GameplayStrategy {
    pub const ALL: [Self; 6] = [
        Self::Perfectionist,
        Self::Compromiser,
        Self::Balanced,
        Self::Quitter,
        Self::Planner,
        Self::Random,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            GameplayStrategy::Perfectionist => "Perfectionist",
            GameplayStrategy::Compromiser => "Compromiser",
            GameplayStrategy::Balanced => "Balanced",
            GameplayStrategy::Quitter => "Quitter",
            GameplayStrategy::Planner => "Planner",
            GameplayStrategy::Random => "Random",
        }
    }

    /// Name accepted on the command line.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            GameplayStrategy::Perfectionist => "perfectionist",
            GameplayStrategy::Compromiser => "compromiser",
            GameplayStrategy::Balanced => "balanced",
            GameplayStrategy::Quitter => "quitter",
            GameplayStrategy::Planner => "planner",
            GameplayStrategy::Random => "random",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            GameplayStrategy::Perfectionist => {
                "Polishes whenever possible and never skips a minigame"
            }
            GameplayStrategy::Compromiser => "Cuts every corner and skips every minigame",
            GameplayStrategy::Balanced => "Takes the option with the best combined stat swing",
            GameplayStrategy::Quitter => "Gives up at the first chance",
            GameplayStrategy::Planner => "Searches the whole script for the best ending",
            GameplayStrategy::Random => "Uniformly random choices and minigame skips",
        }
    }

    /// Ending this strategy reaches on the bundled script, when deterministic.
    #[must_use]
    pub fn expected_ending(self) -> Option<Ending> {
        match self {
            GameplayStrategy::Perfectionist => Some(Ending::Perfectionism),
            GameplayStrategy::Compromiser | GameplayStrategy::Balanced => Some(Ending::Compromise),
            GameplayStrategy::Quitter => Some(Ending::Abandon),
            GameplayStrategy::Planner => Some(Ending::Miracle),
            GameplayStrategy::Random => None,
        }
    }

    #[must_use]
    pub fn create_policy<'a>(
        self,
        seed: u64,
        script: &'a DayScript,
        rules: &Rules,
    ) -> Box<dyn PlayerPolicy + 'a> {
        match self {
            GameplayStrategy::Perfectionist => Box::new(PreferencePolicy {
                name: "Perfectionist",
                order: &[
                    ChoiceKind::Perfectionism,
                    ChoiceKind::Neutral,
                    ChoiceKind::Compromise,
                ],
                skip_minigames: false,
            }),
            GameplayStrategy::Compromiser => Box::new(PreferencePolicy {
                name: "Compromiser",
                order: &[
                    ChoiceKind::Compromise,
                    ChoiceKind::Neutral,
                    ChoiceKind::Perfectionism,
                ],
                skip_minigames: true,
            }),
            GameplayStrategy::Quitter => Box::new(PreferencePolicy {
                name: "Quitter",
                order: &[
                    ChoiceKind::Abandon,
                    ChoiceKind::Neutral,
                    ChoiceKind::Perfectionism,
                    ChoiceKind::Compromise,
                ],
                skip_minigames: false,
            }),
            GameplayStrategy::Balanced => Box::new(BalancedPolicy),
            GameplayStrategy::Planner => Box::new(PlannerPolicy::new(script, rules.clone())),
            GameplayStrategy::Random => Box::new(RandomPolicy::new(seed)),
        }
    }
}

impl fmt::Display for GameplayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GameplayStrategy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.key().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}

fn selectable(day: &DayContent) -> impl Iterator<Item = &DayChoice> {
    day.choices
        .iter()
        .filter(|choice| choice.kind != ChoiceKind::Abandon)
}

/// First choice in script order with the highest score.
fn best_by<'c, F>(
    choices: impl Iterator<Item = &'c DayChoice>,
    mut score: F,
) -> Option<(&'c DayChoice, i32)>
where
    F: FnMut(&DayChoice) -> i32,
{
    let mut best: Option<(&DayChoice, i32)> = None;
    for choice in choices {
        let value = score(choice);
        if best.is_none_or(|(_, top)| value > top) {
            best = Some((choice, value));
        }
    }
    best
}

struct PreferencePolicy {
    name: &'static str,
    order: &'static [ChoiceKind],
    skip_minigames: bool,
}

impl PlayerPolicy for PreferencePolicy {
    fn name(&self) -> &'static str {
        self.name
    }

    fn pick_choice(&mut self, _state: &GameState, day: &DayContent) -> Option<PolicyDecision> {
        let preferred = self.order.iter().find_map(|kind| {
            day.choices
                .iter()
                .find(|choice| choice.kind == *kind)
                .map(|choice| PolicyDecision::new(choice, Some(format!("prefers {kind}"))))
        });
        preferred.or_else(|| {
            day.choices
                .first()
                .map(|choice| PolicyDecision::new(choice, Some("fallback".to_string())))
        })
    }

    fn play_minigame(&mut self, _state: &GameState, _minigame: Option<Minigame>) -> MinigameOutcome {
        if self.skip_minigames {
            MinigameOutcome::Skipped
        } else {
            MinigameOutcome::Completed
        }
    }
}

struct BalancedPolicy;

fn combined_swing(impact: &Impact) -> i32 {
    impact.progress + impact.quality + impact.energy
}

impl PlayerPolicy for BalancedPolicy {
    fn name(&self) -> &'static str {
        "Balanced"
    }

    fn pick_choice(&mut self, _state: &GameState, day: &DayContent) -> Option<PolicyDecision> {
        best_by(selectable(day), |choice| combined_swing(&choice.impact))
            .map(|(choice, swing)| PolicyDecision::new(choice, Some(format!("swing {swing}"))))
    }

    fn pick_genre(&mut self) -> Genre {
        Genre::Cyberpunk
    }
}

struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(derive_stream_seed(seed, POLICY_STREAM)),
        }
    }
}

impl PlayerPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn pick_choice(&mut self, _state: &GameState, day: &DayContent) -> Option<PolicyDecision> {
        let options: Vec<&DayChoice> = selectable(day).collect();
        if options.is_empty() {
            return None;
        }
        let idx = self.rng.gen_range(0..options.len());
        Some(PolicyDecision::new(
            options[idx],
            Some(format!("rolled {idx}")),
        ))
    }

    fn play_minigame(&mut self, _state: &GameState, _minigame: Option<Minigame>) -> MinigameOutcome {
        if self.rng.gen_bool(0.5) {
            MinigameOutcome::Skipped
        } else {
            MinigameOutcome::Completed
        }
    }

    fn pick_genre(&mut self) -> Genre {
        Genre::ALL[self.rng.gen_range(0..Genre::ALL.len())]
    }
}

/// Best reachable finish from a point in the run, ordered miracle first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Projection {
    miracle: bool,
    quality: i32,
    progress: i32,
}

type PlanKey = (u32, i32, i32, i32, usize);

/// Exhaustive lookahead over the remaining script.
///
/// Quality, progress and energy evolve deterministically, so only the bug
/// rolls are ignored. Minigames are always completed.
struct PlannerPolicy<'a> {
    script: &'a DayScript,
    rules: Rules,
    memo: HashMap<PlanKey, Projection>,
}

impl<'a> PlannerPolicy<'a> {
    fn new(script: &'a DayScript, rules: Rules) -> Self {
        Self {
            script,
            rules,
            memo: HashMap::new(),
        }
    }

    fn project(&self, stats: Stats, impact: Impact) -> Stats {
        let fatigue = &self.rules.config().fatigue;
        let penalty = fatigue
            .penalties(fatigue.tier(stats.energy))
            .map_or(0, |tier| tier.quality_penalty);
        Stats {
            quality: clamp_stat(
                stats
                    .quality
                    .saturating_add(impact.quality)
                    .saturating_add(penalty),
            ),
            progress: clamp_stat(stats.progress.saturating_add(impact.progress)),
            energy: clamp_stat(stats.energy.saturating_add(impact.energy)),
            bug_count: 0,
        }
    }

    fn finish(&self, stats: Stats, compromises: usize) -> Projection {
        let endings = &self.rules.config().endings;
        Projection {
            miracle: stats.quality >= endings.miracle_min_quality
                && stats.progress >= endings.miracle_min_progress
                && compromises < endings.miracle_max_compromises,
            quality: stats.quality,
            progress: stats.progress,
        }
    }

    fn after(&mut self, day: u32, stats: Stats, compromises: usize, choice: &DayChoice) -> Projection {
        let next = self.project(stats, choice.impact);
        let compromises = compromises + usize::from(choice.kind == ChoiceKind::Compromise);
        self.evaluate(day + 1, next, compromises)
    }

    fn evaluate(&mut self, day: u32, stats: Stats, compromises: usize) -> Projection {
        if day > self.rules.final_day() {
            return self.finish(stats, compromises);
        }
        let key = (day, stats.quality, stats.progress, stats.energy, compromises);
        if let Some(found) = self.memo.get(&key) {
            return *found;
        }
        let script = self.script;
        let result = match script.day(day) {
            None => self.finish(stats, compromises),
            Some(content) if content.choices.is_empty() => {
                self.evaluate(day + 1, stats, compromises)
            }
            Some(content) => {
                let mut best: Option<Projection> = None;
                for choice in selectable(content) {
                    let value = self.after(day, stats, compromises, choice);
                    if best.is_none_or(|top| value > top) {
                        best = Some(value);
                    }
                }
                best.unwrap_or_else(|| self.finish(stats, compromises))
            }
        };
        self.memo.insert(key, result);
        result
    }
}

impl PlayerPolicy for PlannerPolicy<'_> {
    fn name(&self) -> &'static str {
        "Planner"
    }

    fn pick_choice(&mut self, state: &GameState, day: &DayContent) -> Option<PolicyDecision> {
        let stats = Stats {
            bug_count: 0,
            ..state.stats
        };
        let compromises = state.count_kind(ChoiceKind::Compromise);
        let mut best: Option<(&DayChoice, Projection)> = None;
        for choice in selectable(day) {
            let value = self.after(state.current_day, stats, compromises, choice);
            if best.is_none_or(|(_, top)| value > top) {
                best = Some((choice, value));
            }
        }
        best.map(|(choice, projection)| {
            PolicyDecision::new(
                choice,
                Some(format!(
                    "projects quality {} progress {}{}",
                    projection.quality,
                    projection.progress,
                    if projection.miracle { " (miracle)" } else { "" }
                )),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(json: &str) -> DayContent {
        serde_json::from_str(json).unwrap()
    }

    fn sample_day() -> DayContent {
        day(r#"{
            "day": 11, "title": "Doubt", "description": "doubt",
            "choices": [
                { "id": "rest", "text": "Rest", "kind": "neutral",
                  "impact": { "quality": 2, "energy": 20 } },
                { "id": "push", "text": "Push", "kind": "perfectionism",
                  "impact": { "progress": 8, "quality": 3, "energy": -15 } },
                { "id": "giveup", "text": "Give up", "kind": "abandon" }
            ]
        }"#)
    }

    #[test]
    fn strategy_keys_round_trip() {
        for strategy in GameplayStrategy::ALL {
            assert_eq!(strategy.key().parse::<GameplayStrategy>(), Ok(strategy));
        }
        assert_eq!(" Planner ".parse::<GameplayStrategy>(), Ok(GameplayStrategy::Planner));
        assert!("speedrunner".parse::<GameplayStrategy>().is_err());
    }

    #[test]
    fn preference_policies_follow_their_order() {
        let script = DayScript::empty();
        let rules = Rules::default();
        let state = GameState::new();
        let content = sample_day();

        let mut quitter = GameplayStrategy::Quitter.create_policy(1, &script, &rules);
        assert_eq!(quitter.pick_choice(&state, &content).unwrap().choice_id, "giveup");

        let mut perfectionist = GameplayStrategy::Perfectionist.create_policy(1, &script, &rules);
        assert_eq!(
            perfectionist.pick_choice(&state, &content).unwrap().choice_id,
            "push"
        );

        let mut compromiser = GameplayStrategy::Compromiser.create_policy(1, &script, &rules);
        assert_eq!(compromiser.pick_choice(&state, &content).unwrap().choice_id, "rest");
        assert_eq!(
            compromiser.play_minigame(&state, None),
            MinigameOutcome::Skipped
        );
    }

    #[test]
    fn balanced_takes_largest_swing_and_ignores_abandon() {
        let mut policy = BalancedPolicy;
        let decision = policy
            .pick_choice(&GameState::new(), &sample_day())
            .unwrap();
        assert_eq!(decision.choice_id, "rest");
    }

    #[test]
    fn random_policy_is_seeded() {
        let content = sample_day();
        let state = GameState::new();
        let picks = |seed| {
            let mut policy = RandomPolicy::new(seed);
            (0..16)
                .map(|_| policy.pick_choice(&state, &content).unwrap().choice_id)
                .collect::<Vec<_>>()
        };
        assert_eq!(picks(5), picks(5));
        assert!(picks(5).iter().all(|id| id != "giveup"));
    }

    #[test]
    fn planner_projection_clamps_extreme_impacts() {
        let script = DayScript::empty();
        let planner = PlannerPolicy::new(&script, Rules::default());
        let start = GameState::new().stats;
        let high = planner.project(start, Impact::new(i32::MAX, i32::MAX, i32::MAX, i32::MAX));
        assert_eq!((high.quality, high.progress, high.energy), (100, 100, 100));
        let drained = Stats { energy: 0, ..start };
        let low = planner.project(drained, Impact::new(i32::MIN, i32::MIN, i32::MIN, i32::MIN));
        assert_eq!((low.quality, low.progress, low.energy), (0, 0, 0));
    }

    #[test]
    fn planner_prefers_the_miracle_path() {
        let script = DayScript::from_json(
            r#"{ "days": [
                { "day": 1, "title": "a", "description": "a", "choices": [
                    { "id": "cut", "text": "cut", "kind": "compromise",
                      "impact": { "progress": 60, "quality": -30 } },
                    { "id": "care", "text": "care", "kind": "perfectionism",
                      "impact": { "progress": 10 } } ] },
                { "day": 2, "title": "b", "description": "b", "choices": [
                    { "id": "ship", "text": "ship", "kind": "neutral",
                      "impact": { "progress": 100 } } ] }
            ] }"#,
        )
        .unwrap();
        let rules = Rules::new(deadline_game::RulesConfig {
            final_day: 2,
            ..deadline_game::RulesConfig::default()
        })
        .unwrap();
        let mut planner = PlannerPolicy::new(&script, rules);
        let state = GameState::new();
        let content = script.day(1).unwrap();
        let decision = planner.pick_choice(&state, content).unwrap();
        assert_eq!(decision.choice_id, "care");
        assert!(decision.rationale.unwrap().contains("miracle"));
    }
}
