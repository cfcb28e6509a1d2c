use deadline_game::{
    ChoiceKind, DayScript, EngineError, GameSession, GameState, ResultSummary,
    Rules, TurnOutcome, result_summary,
};
use thiserror::Error;

use crate::logic::assets::TesterAssets;
use crate::logic::policy::{GameplayStrategy, PlayerPolicy, PolicyDecision};

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("policy made no progress on day {day}")]
    Stalled { day: u32 },
    #[error("run exceeded {limit} turns")]
    TurnLimit { limit: u32 },
}

/// Snapshot of one resolved decision.
#[derive(Debug, Clone)]
pub struct DecisionRecord {
    pub day: u32,
    pub choice_id: String,
    pub kind: ChoiceKind,
    pub policy_name: &'static str,
    pub rationale: Option<String>,
}

/// Everything the tester keeps from a finished run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub strategy: GameplayStrategy,
    pub seed: u64,
    pub result: ResultSummary,
    pub final_state: GameState,
    pub decisions: Vec<DecisionRecord>,
    pub minigames_played: usize,
    pub minigames_skipped: usize,
    pub rng_draws: u64,
    pub turns: u32,
}

/// Drives a [`GameSession`] with a [`PlayerPolicy`] until the run ends.
pub struct SimulationSession<'a> {
    session: GameSession<'a>,
    policy: Box<dyn PlayerPolicy + 'a>,
    strategy: GameplayStrategy,
    decisions: Vec<DecisionRecord>,
    minigames_played: usize,
    minigames_skipped: usize,
    turns: u32,
    turn_limit: u32,
}

impl<'a> SimulationSession<'a> {
    #[must_use]
    pub fn new(script: &'a DayScript, rules: &Rules, strategy: GameplayStrategy, seed: u64) -> Self {
        let policy = strategy.create_policy(seed, script, rules);
        let session = GameSession::new(seed, script, rules.clone());
        // Each day takes at most a minigame turn and a choice turn.
        let turn_limit = rules.final_day().saturating_add(1).saturating_mul(2);
        Self {
            session,
            policy,
            strategy,
            decisions: Vec::new(),
            minigames_played: 0,
            minigames_skipped: 0,
            turns: 0,
            turn_limit,
        }
    }

    /// Play one turn: today's minigame if it is pending, otherwise a choice.
    ///
    /// # Errors
    ///
    /// Fails when the engine rejects the action or the policy cannot act.
    pub fn step(&mut self) -> Result<TurnOutcome, SimulationError> {
        self.turns += 1;
        if self.turns > self.turn_limit {
            return Err(SimulationError::TurnLimit {
                limit: self.turn_limit,
            });
        }

        let day = self.session.state().current_day;
        let content = self.session.today()?;

        if self.session.minigame_pending() {
            let minigame = content.minigame_kind();
            if minigame.is_some_and(|kind| kind.is_genre_select()) {
                let genre = self.policy.pick_genre();
                self.session.select_genre(genre)?;
            }
            let outcome = self.policy.play_minigame(self.session.state(), minigame);
            let turn = self.session.resolve_minigame(outcome)?;
            self.minigames_played += 1;
            if turn.effect.is_some() {
                self.minigames_skipped += 1;
            }
            return Ok(turn);
        }

        if content.choices.is_empty() {
            return Err(SimulationError::Stalled { day });
        }
        let Some(PolicyDecision {
            choice_id,
            rationale,
        }) = self.policy.pick_choice(self.session.state(), content)
        else {
            return Err(SimulationError::Stalled { day });
        };
        let turn = self.session.choose(&choice_id)?;
        let kind = content
            .choice(&choice_id)
            .map_or(ChoiceKind::Neutral, |choice| choice.kind);
        log::trace!(
            "{} day {day}: {choice_id} ({kind})",
            self.policy.name()
        );
        self.decisions.push(DecisionRecord {
            day,
            choice_id,
            kind,
            policy_name: self.policy.name(),
            rationale,
        });
        Ok(turn)
    }

    /// Step until the run is complete.
    ///
    /// # Errors
    ///
    /// Propagates the first failed turn.
    pub fn run(mut self) -> Result<RunSummary, SimulationError> {
        while !self.session.is_complete() {
            self.step()?;
        }
        let rules = self.session.rules().clone();
        let seed = self.session.seed();
        let rng_draws = self.session.rng_draws();
        let final_state = self.session.into_state();
        let result = result_summary(&final_state, &rules).ok_or(SimulationError::Stalled {
            day: final_state.current_day,
        })?;
        Ok(RunSummary {
            strategy: self.strategy,
            seed,
            result,
            final_state,
            decisions: self.decisions,
            minigames_played: self.minigames_played,
            minigames_skipped: self.minigames_skipped,
            rng_draws,
            turns: self.turns,
        })
    }
}

/// Play one full run of `strategy` over `assets`.
///
/// # Errors
///
/// See [`SimulationSession::run`].
pub fn run_strategy(
    assets: &TesterAssets,
    strategy: GameplayStrategy,
    seed: u64,
) -> Result<RunSummary, SimulationError> {
    SimulationSession::new(&assets.script, &assets.rules, strategy, seed).run()
}
