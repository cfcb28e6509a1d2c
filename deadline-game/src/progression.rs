//! Day progression and terminal transitions.
use thiserror::Error;

use crate::result::Ending;
use crate::rules::Rules;
use crate::state::GameState;

/// Misuse of the progression API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("game already complete on day {day}")]
    GameComplete { day: u32 },
    #[error("no script content for day {0}")]
    UnknownDay(u32),
    #[error("day {day} has no choice with id {id:?}")]
    UnknownChoice { day: u32, id: String },
    #[error("day {0} has no minigame")]
    NoMinigame(u32),
}

impl Rules {
    /// Move to the next day, finishing the run once the last day is played.
    ///
    /// The ending is classified with the day the player was on, not the
    /// rolled-over day.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::GameComplete`] if `state` is already finished.
    pub fn advance_day(&self, state: &GameState) -> Result<GameState, EngineError> {
        ensure_in_progress(state)?;
        let new_day = state.current_day.saturating_add(1);
        if new_day <= self.final_day() {
            log::debug!("advance day {} -> {}", state.current_day, new_day);
            return Ok(GameState {
                current_day: new_day,
                ..state.clone()
            });
        }

        let ending =
            self.config()
                .endings
                .classify(state.current_day, &state.stats, &state.choices);
        log::info!(
            "deadline reached after day {}: {} ending",
            state.current_day,
            ending
        );
        Ok(GameState {
            current_day: new_day,
            is_complete: true,
            ending: Some(ending),
            ..state.clone()
        })
    }

    /// Finish the run immediately with `ending`, keeping the current day.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::GameComplete`] if `state` is already finished.
    pub fn complete_game(&self, state: &GameState, ending: Ending) -> Result<GameState, EngineError> {
        ensure_in_progress(state)?;
        log::info!("run ended early on day {}: {} ending", state.current_day, ending);
        Ok(GameState {
            is_complete: true,
            ending: Some(ending),
            ..state.clone()
        })
    }
}

fn ensure_in_progress(state: &GameState) -> Result<(), EngineError> {
    if state.is_complete {
        return Err(EngineError::GameComplete {
            day: state.current_day,
        });
    }
    Ok(())
}

/// Advance under the standard rules.
///
/// # Errors
///
/// Returns [`EngineError::GameComplete`] if `state` is already finished.
pub fn advance_day(state: &GameState) -> Result<GameState, EngineError> {
    Rules::standard().advance_day(state)
}

/// Finish the run under the standard rules.
///
/// # Errors
///
/// Returns [`EngineError::GameComplete`] if `state` is already finished.
pub fn complete_game(state: &GameState, ending: Ending) -> Result<GameState, EngineError> {
    Rules::standard().complete_game(state, ending)
}

/// Fresh day-one state.
#[must_use]
pub fn reset_game() -> GameState {
    log::debug!("game reset");
    GameState::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Choice, ChoiceKind, Impact};
    use crate::rules::RulesConfig;

    #[test]
    fn advance_only_moves_the_day_before_the_deadline() {
        let mut state = GameState::new();
        state.stats.quality = 40;
        let next = advance_day(&state).unwrap();
        assert_eq!(next.current_day, 2);
        assert_eq!(next.stats, state.stats);
        assert!(!next.is_complete);
        assert!(next.ending.is_none());

        state.current_day = 29;
        let day_thirty = advance_day(&state).unwrap();
        assert_eq!(day_thirty.current_day, 30);
        assert!(!day_thirty.is_complete);
    }

    #[test]
    fn advancing_past_final_day_completes_the_run() {
        let mut state = GameState::new();
        state.current_day = 30;
        state.stats.quality = 60;
        state.stats.progress = 80;
        state.choices = vec![Choice::new(
            12,
            ChoiceKind::Compromise,
            "ship",
            Impact::default(),
        )];

        let done = advance_day(&state).unwrap();
        assert_eq!(done.current_day, 31);
        assert!(done.is_complete);
        assert_eq!(done.ending, Some(Ending::Compromise));
    }

    #[test]
    fn classification_uses_pre_increment_day() {
        let rules = Rules::new(RulesConfig {
            final_day: 14,
            ..RulesConfig::default()
        })
        .unwrap();
        let mut state = GameState::new();
        state.current_day = 14;
        state.stats.quality = 20;
        state.stats.progress = 20;

        // Day 15 would not be an abandon; day 14 is.
        let done = rules.advance_day(&state).unwrap();
        assert_eq!(done.current_day, 15);
        assert_eq!(done.ending, Some(Ending::Abandon));
    }

    #[test]
    fn completed_runs_reject_further_transitions() {
        let state = complete_game(&GameState::new(), Ending::Abandon).unwrap();
        assert_eq!(state.current_day, 1);
        assert_eq!(state.ending, Some(Ending::Abandon));

        assert_eq!(
            advance_day(&state),
            Err(EngineError::GameComplete { day: 1 })
        );
        assert!(complete_game(&state, Ending::Miracle).is_err());
    }

    #[test]
    fn reset_returns_initial_state() {
        assert_eq!(reset_game(), GameState::default());
    }
}
