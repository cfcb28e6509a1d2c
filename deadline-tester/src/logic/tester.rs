use colored::Colorize;
use deadline_game::Ending;
use deadline_game::numbers::mean;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::logic::assets::TesterAssets;
use crate::logic::policy::GameplayStrategy;
use crate::logic::simulation::{RunSummary, run_strategy};

/// Compact per-run record kept for reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub seed: u64,
    pub ending: Ending,
    pub days_played: u32,
    pub quality: i32,
    pub progress: i32,
    pub energy: i32,
    pub bug_count: i32,
    pub visual_degradation: i32,
    pub compromises: usize,
    pub skipped_minigames: usize,
    pub genre: Option<String>,
    #[serde(with = "duration_serde")]
    pub duration: Duration,
}

impl RunRecord {
    fn from_summary(summary: &RunSummary, duration: Duration) -> Self {
        let result = &summary.result;
        Self {
            seed: summary.seed,
            ending: result.ending,
            days_played: result.days_played,
            quality: result.stats.quality,
            progress: result.stats.progress,
            energy: result.stats.energy,
            bug_count: result.stats.bug_count,
            visual_degradation: result.visual_degradation,
            compromises: result.tally.compromise,
            skipped_minigames: result.skipped_minigames,
            genre: result.genre.clone(),
            duration,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyResult {
    pub strategy: GameplayStrategy,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub expected_ending: Option<Ending>,
    pub ending_counts: BTreeMap<String, usize>,
    pub mean_quality: f64,
    pub mean_progress: f64,
    pub mean_bugs: f64,
    pub mean_degradation: f64,
    pub failures: Vec<String>,
    pub runs: Vec<RunRecord>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
}

impl StrategyResult {
    fn from_runs(
        strategy: GameplayStrategy,
        expected_ending: Option<Ending>,
        iterations: usize,
        runs: Vec<RunRecord>,
        failures: Vec<String>,
    ) -> Self {
        let mut ending_counts = BTreeMap::new();
        for run in &runs {
            *ending_counts
                .entry(run.ending.as_str().to_string())
                .or_insert(0) += 1;
        }
        let total = |field: fn(&RunRecord) -> i32| -> i64 {
            runs.iter().map(|run| i64::from(field(run))).sum()
        };
        let count = runs.len();
        let average_duration = if runs.is_empty() {
            Duration::ZERO
        } else {
            runs.iter().map(|run| run.duration).sum::<Duration>()
                / u32::try_from(count).unwrap_or(u32::MAX)
        };
        Self {
            strategy,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: count,
            expected_ending,
            ending_counts,
            mean_quality: mean(total(|run| run.quality), count),
            mean_progress: mean(total(|run| run.progress), count),
            mean_bugs: mean(total(|run| run.bug_count), count),
            mean_degradation: mean(total(|run| run.visual_degradation), count),
            failures,
            runs,
            average_duration,
        }
    }
}

/// Runs each strategy over a set of seeds and checks the endings.
pub struct LogicTester<'a> {
    assets: &'a TesterAssets,
    verbose: bool,
}

impl<'a> LogicTester<'a> {
    #[must_use]
    pub const fn new(assets: &'a TesterAssets, verbose: bool) -> Self {
        Self { assets, verbose }
    }

    /// One result per seed for `strategy`.
    #[must_use]
    pub fn run_strategy(
        &self,
        strategy: GameplayStrategy,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<StrategyResult> {
        seeds
            .iter()
            .map(|&seed| {
                if self.verbose {
                    println!(
                        "🧪 Testing strategy: {} (seed: {seed})",
                        strategy.label().bright_white()
                    );
                }
                self.run_seed(strategy, seed, iterations)
            })
            .collect()
    }

    fn run_seed(&self, strategy: GameplayStrategy, seed: u64, iterations: usize) -> StrategyResult {
        // Custom scripts carry no known endings.
        let expected = strategy
            .expected_ending()
            .filter(|_| self.assets.bundled);
        let mut runs = Vec::with_capacity(iterations);
        let mut failures = Vec::new();

        for i in 0..iterations {
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));
            let start = Instant::now();
            match run_strategy(self.assets, strategy, iteration_seed) {
                Ok(summary) => {
                    log::debug!(
                        "{strategy} seed {iteration_seed}: ended day {} after {} turns, {} minigames ({} skipped), {} rng draws",
                        summary.final_state.current_day,
                        summary.turns,
                        summary.minigames_played,
                        summary.minigames_skipped,
                        summary.rng_draws
                    );
                    let record = RunRecord::from_summary(&summary, start.elapsed());
                    if let Some(expected) = expected
                        && record.ending != expected
                    {
                        failures.push(format!(
                            "Iteration {} (seed {iteration_seed}): expected {expected}, got {} | {}",
                            i + 1,
                            record.ending,
                            describe_last_decisions(&summary)
                        ));
                        if self.verbose {
                            println!(
                                "  ❌ Iteration {}/{iterations} ended in {}",
                                i + 1,
                                record.ending.as_str().red()
                            );
                        }
                    } else if self.verbose {
                        println!(
                            "  ✅ Iteration {}/{iterations} ({:?}) days:{} ending:{}",
                            i + 1,
                            record.duration,
                            record.days_played,
                            record.ending
                        );
                    }
                    runs.push(record);
                }
                Err(err) => {
                    log::warn!("{strategy} seed {iteration_seed} failed: {err}");
                    failures.push(format!(
                        "Iteration {} (seed {iteration_seed}): {err}",
                        i + 1
                    ));
                }
            }
        }

        StrategyResult::from_runs(strategy, expected, iterations, runs, failures)
    }
}

fn describe_last_decisions(summary: &RunSummary) -> String {
    if summary.decisions.is_empty() {
        return "no decisions recorded".to_string();
    }
    summary
        .decisions
        .iter()
        .rev()
        .take(3)
        .map(|entry| {
            format!(
                "day {} {} [{}] by {} ({})",
                entry.day,
                entry.choice_id,
                entry.kind,
                entry.policy_name,
                entry.rationale.as_deref().unwrap_or("-")
            )
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}
