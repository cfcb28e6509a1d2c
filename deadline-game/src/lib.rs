//! Deadline Game Engine
//!
//! Platform-agnostic core logic for Deadline, a thirty-day game about shipping
//! a game under crunch. Every decision trades quality, progress and energy,
//! and the screen itself degrades as corners get cut. This crate holds the
//! rules and the day script without UI or platform-specific dependencies.

pub mod constants;
pub mod data;
pub mod engine;
pub mod numbers;
pub mod presentation;
pub mod progression;
pub mod result;
pub mod rng;
pub mod rules;
pub mod session;
pub mod state;

use anyhow::Context;

// Re-export commonly used types
pub use data::{
    Choice, ChoiceKind, DayChoice, DayContent, DayScript, Description, Difficulty, Impact,
    Minigame,
};
pub use engine::{ChoiceEffect, apply_choice};
pub use presentation::{
    Act, DegradationBand, HudReveal, TextVerbosity, UiComplexity, VisualConfig, days_remaining,
};
pub use progression::{EngineError, advance_day, complete_game, reset_game};
pub use result::{ChoiceTally, Ending, ResultSummary, classify_ending, result_summary};
pub use rng::{CountingRng, derive_stream_seed};
pub use rules::{
    BugRollCfg, DegradationBiasCfg, EndingThresholds, EnergyTier, FatigueCfg, FatigueTierCfg,
    RollRange, Rules, RulesConfig, RulesConfigError,
};
pub use session::{GameSession, MinigameOutcome, TurnOutcome};
pub use state::{GamePhase, GameState, Genre, Stats, clamp, clamp_stat};

/// Config name under which [`GameEngine`] asks for the rule set.
pub const RULES_CONFIG_NAME: &str = "rules";

/// Trait for abstracting data loading operations
/// Platform-specific implementations should provide this
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the day script from the platform-specific source
    ///
    /// # Errors
    ///
    /// Returns an error if the script cannot be loaded.
    fn load_script(&self) -> Result<DayScript, Self::Error>;

    /// Load configuration data for a specific system
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or parsed.
    fn load_config<T>(&self, config_name: &str) -> Result<T, Self::Error>
    where
        T: serde::de::DeserializeOwned;
}

/// Loader backed by the JSON assets compiled into this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledData;

impl DataLoader for BundledData {
    type Error = serde_json::Error;

    fn load_script(&self) -> Result<DayScript, Self::Error> {
        Ok(DayScript::bundled().clone())
    }

    fn load_config<T>(&self, config_name: &str) -> Result<T, Self::Error>
    where
        T: serde::de::DeserializeOwned,
    {
        match config_name {
            RULES_CONFIG_NAME => serde_json::to_value(Rules::standard().config())
                .and_then(serde_json::from_value),
            _ => serde_json::from_str("{}"),
        }
    }
}

/// Trait for abstracting save/load operations
/// Platform-specific implementations should provide this
pub trait GameStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Save game state
    ///
    /// # Errors
    ///
    /// Returns an error if the game state cannot be saved.
    fn save_game(&self, save_name: &str, game_state: &GameState) -> Result<(), Self::Error>;

    /// Load game state
    ///
    /// # Errors
    ///
    /// Returns an error if the game state cannot be loaded.
    fn load_game(&self, save_name: &str) -> Result<Option<GameState>, Self::Error>;

    /// Delete saved game
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    fn delete_save(&self, save_name: &str) -> Result<(), Self::Error>;
}

/// Main game engine for managing game instances
pub struct GameEngine<L, S>
where
    L: DataLoader,
    S: GameStorage,
{
    data_loader: L,
    storage: S,
    script: DayScript,
    rules: Rules,
}

impl<L, S> GameEngine<L, S>
where
    L: DataLoader,
    S: GameStorage,
{
    /// Create a game engine, loading the script and rule set up front
    ///
    /// # Errors
    ///
    /// Returns an error if the script or rules cannot be loaded, or the rules
    /// fail validation.
    pub fn new(data_loader: L, storage: S) -> Result<Self, anyhow::Error> {
        let script = data_loader.load_script().context("loading day script")?;
        let cfg: RulesConfig = data_loader
            .load_config(RULES_CONFIG_NAME)
            .context("loading rules config")?;
        let rules = Rules::new(cfg).context("validating rules config")?;
        log::debug!(
            "engine ready: {} script days, final day {}",
            script.len(),
            rules.final_day()
        );
        Ok(Self {
            data_loader,
            storage,
            script,
            rules,
        })
    }

    #[must_use]
    pub const fn script(&self) -> &DayScript {
        &self.script
    }

    #[must_use]
    pub const fn rules(&self) -> &Rules {
        &self.rules
    }

    #[must_use]
    pub const fn data_loader(&self) -> &L {
        &self.data_loader
    }

    /// Create a new day-one game
    #[must_use]
    pub fn create_game(&self) -> GameState {
        reset_game()
    }

    /// Construct a new session over the loaded script and rules.
    #[must_use]
    pub fn create_session(&self, seed: u64) -> GameSession<'_> {
        GameSession::new(seed, &self.script, self.rules.clone())
    }

    /// Resume a session from a saved slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be read.
    pub fn resume_session(
        &self,
        save_name: &str,
        seed: u64,
    ) -> Result<Option<GameSession<'_>>, anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        Ok(self.load_game(save_name)?.map(|state| {
            GameSession::from_state(state, seed, &self.script, self.rules.clone())
        }))
    }

    /// Save a game state
    ///
    /// # Errors
    ///
    /// Returns an error if the game state cannot be saved.
    pub fn save_game(&self, save_name: &str, game_state: &GameState) -> Result<(), S::Error> {
        self.storage.save_game(save_name, game_state)
    }

    /// Load a game state
    ///
    /// # Errors
    ///
    /// Returns an error if the game state cannot be loaded.
    pub fn load_game(&self, save_name: &str) -> Result<Option<GameState>, anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        self.storage
            .load_game(save_name)
            .map_err(Into::<anyhow::Error>::into)
            .with_context(|| format!("loading save {save_name:?}"))
    }

    /// Delete a saved game
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    pub fn delete_save(&self, save_name: &str) -> Result<(), S::Error> {
        self.storage.delete_save(save_name)
    }
}
