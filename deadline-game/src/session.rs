use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::constants::RNG_DOMAIN_CHOICES;
use crate::data::{Choice, ChoiceKind, DayContent, DayScript};
use crate::engine::ChoiceEffect;
use crate::progression::{EngineError, reset_game};
use crate::result::Ending;
use crate::rng::CountingRng;
use crate::rules::Rules;
use crate::state::{GameState, Genre};

/// How the player left a minigame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MinigameOutcome {
    Completed,
    Skipped,
}

/// What a single player action did to the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutcome {
    /// Day the action was taken on.
    pub day: u32,
    pub effect: Option<ChoiceEffect>,
    pub advanced: bool,
    pub ending: Option<Ending>,
}

/// Single owner of a playthrough: state, rules, script and the choice stream.
#[derive(Debug, Clone)]
pub struct GameSession<'s> {
    state: GameState,
    rules: Rules,
    script: &'s DayScript,
    seed: u64,
    rng: CountingRng<SmallRng>,
    minigame_resolved: Option<u32>,
}

impl<'s> GameSession<'s> {
    /// Construct a fresh day-one session.
    #[must_use]
    pub fn new(seed: u64, script: &'s DayScript, rules: Rules) -> Self {
        Self::from_state(reset_game(), seed, script, rules)
    }

    /// Resume a session from a saved state.
    #[must_use]
    pub fn from_state(state: GameState, seed: u64, script: &'s DayScript, rules: Rules) -> Self {
        Self {
            state,
            rules,
            script,
            seed,
            rng: CountingRng::for_domain(seed, RNG_DOMAIN_CHOICES),
            minigame_resolved: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub const fn rules(&self) -> &Rules {
        &self.rules
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Draws taken from the choice stream since the last (re)seed.
    #[must_use]
    pub const fn rng_draws(&self) -> u64 {
        self.rng.draws()
    }

    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.state.is_complete
    }

    /// Script content for the current day.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownDay`] when the script has no entry for it.
    pub fn today(&self) -> Result<&'s DayContent, EngineError> {
        let day = self.state.current_day;
        self.script.day(day).ok_or(EngineError::UnknownDay(day))
    }

    /// Today's body text in the selected genre.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownDay`] when the script has no entry for it.
    pub fn description(&self) -> Result<&'s str, EngineError> {
        let genre = self.state.selected_genre;
        Ok(self.today()?.description.render(genre))
    }

    /// Whether today's minigame is still waiting to be played.
    #[must_use]
    pub fn minigame_pending(&self) -> bool {
        !self.state.is_complete
            && self.minigame_resolved != Some(self.state.current_day)
            && self.today().is_ok_and(DayContent::has_minigame)
    }

    /// Pick `choice_id` from today's options.
    ///
    /// Abandon-typed choices end the run without applying their impact.
    /// Anything else is applied and the day advances.
    ///
    /// # Errors
    ///
    /// Fails if the run is over, today has no script entry, or the id is not
    /// one of today's choices.
    pub fn choose(&mut self, choice_id: &str) -> Result<TurnOutcome, EngineError> {
        self.ensure_in_progress()?;
        let day = self.state.current_day;
        let content = self.today()?;
        let template = content
            .choice(choice_id)
            .ok_or_else(|| EngineError::UnknownChoice {
                day,
                id: choice_id.to_string(),
            })?;
        log::debug!("day {day}: chose {choice_id} ({})", template.kind);

        if template.kind == ChoiceKind::Abandon {
            self.state = self.rules.complete_game(&self.state, Ending::Abandon)?;
            return Ok(TurnOutcome {
                day,
                effect: None,
                advanced: false,
                ending: self.state.ending,
            });
        }

        let effect = self.apply(template.to_choice(day));
        self.advance(day, Some(effect))
    }

    /// Close out today's minigame.
    ///
    /// A skip records a compromise carrying the day's skip impact, when it
    /// has one. Days without choices advance right away.
    ///
    /// # Errors
    ///
    /// Fails if the run is over, today has no script entry, or today has no
    /// unresolved minigame.
    pub fn resolve_minigame(&mut self, outcome: MinigameOutcome) -> Result<TurnOutcome, EngineError> {
        self.ensure_in_progress()?;
        let day = self.state.current_day;
        let content = self.today()?;
        if !content.has_minigame() || self.minigame_resolved == Some(day) {
            return Err(EngineError::NoMinigame(day));
        }
        self.minigame_resolved = Some(day);
        log::debug!("day {day}: minigame {outcome:?}");

        let effect = match (outcome, content.minigame_skip_impact) {
            (MinigameOutcome::Skipped, Some(impact)) => {
                Some(self.apply(Choice::minigame_skip(day, impact)))
            }
            _ => None,
        };

        if content.is_minigame_only() {
            return self.advance(day, effect);
        }
        Ok(TurnOutcome {
            day,
            effect,
            advanced: false,
            ending: None,
        })
    }

    /// Record the genre chosen on the opening day.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::GameComplete`] if the run is over.
    pub fn select_genre(&mut self, genre: Genre) -> Result<(), EngineError> {
        self.ensure_in_progress()?;
        log::debug!("genre selected: {genre}");
        self.state.selected_genre = Some(genre);
        Ok(())
    }

    /// Start over from day one on a fresh stream for the current seed.
    pub fn reset(&mut self) {
        self.state = reset_game();
        self.rng = CountingRng::for_domain(self.seed, RNG_DOMAIN_CHOICES);
        self.minigame_resolved = None;
    }

    /// Deterministically reseed the choice stream, keeping the state.
    pub fn reseed(&mut self, seed: u64) {
        log::debug!("session reseeded {} -> {}", self.seed, seed);
        self.seed = seed;
        self.rng = CountingRng::for_domain(seed, RNG_DOMAIN_CHOICES);
    }

    fn apply(&mut self, choice: Choice) -> ChoiceEffect {
        let (next, effect) = self
            .rules
            .apply_choice_detailed(&self.state, choice, &mut self.rng);
        self.state = next;
        effect
    }

    fn advance(&mut self, day: u32, effect: Option<ChoiceEffect>) -> Result<TurnOutcome, EngineError> {
        self.state = self.rules.advance_day(&self.state)?;
        Ok(TurnOutcome {
            day,
            effect,
            advanced: true,
            ending: self.state.ending,
        })
    }

    fn ensure_in_progress(&self) -> Result<(), EngineError> {
        if self.state.is_complete {
            return Err(EngineError::GameComplete {
                day: self.state.current_day,
            });
        }
        Ok(())
    }
}

impl GameSession<'static> {
    /// Session over the bundled script and standard rules.
    #[must_use]
    pub fn bundled(seed: u64) -> Self {
        Self::new(seed, DayScript::bundled(), Rules::standard().clone())
    }
}
