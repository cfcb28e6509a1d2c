use anyhow::Result;
use colored::Colorize;
use deadline_game::Ending;
use deadline_game::numbers::usize_to_f64;
use std::io::Write;
use std::time::Duration;

use super::StrategyResult;

fn success_rate(passed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    usize_to_f64(passed) / usize_to_f64(total) * 100.0
}

fn ending_mix(result: &StrategyResult) -> String {
    Ending::ALL
        .iter()
        .filter_map(|ending| {
            result
                .ending_counts
                .get(ending.as_str())
                .map(|count| format!("{ending} {count}"))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn generate_console_report<W: Write>(
    out: &mut W,
    results: &[StrategyResult],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Strategy Results Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "===========================".cyan())?;

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    writeln!(out, "Total strategy runs: {total}")?;
    writeln!(out, "Passed: {}", passed.to_string().green())?;
    writeln!(out, "Failed: {}", (total - passed).to_string().red())?;
    writeln!(out, "Success rate: {:.1}%", success_rate(passed, total))?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        let seed = result.runs.first().map_or(0, |run| run.seed);
        writeln!(
            out,
            "{status} {} (seed {seed})",
            result.strategy.label().bold()
        )?;
        writeln!(
            out,
            "   Iterations: {}/{} completed",
            result.successful_iterations, result.iterations_run
        )?;
        if let Some(expected) = result.expected_ending {
            writeln!(out, "   Expected ending: {expected}")?;
        }
        writeln!(out, "   Endings: {}", ending_mix(result))?;
        writeln!(
            out,
            "   Means: quality {:.1} progress {:.1} bugs {:.1} degradation {:.1}",
            result.mean_quality, result.mean_progress, result.mean_bugs, result.mean_degradation
        )?;
        writeln!(out, "   Average time: {:?}", result.average_duration)?;
        if !result.failures.is_empty() {
            writeln!(out, "   Failures:")?;
            for failure in &result.failures {
                writeln!(out, "     • {}", failure.red())?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn generate_json_report<W: Write>(out: &mut W, results: &[StrategyResult]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, results)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report<W: Write>(out: &mut W, results: &[StrategyResult]) -> Result<()> {
    writeln!(out, "# Deadline Strategy Test Results\n")?;

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Total strategy runs**: {total}")?;
    writeln!(out, "- **Passed**: {passed}")?;
    writeln!(out, "- **Failed**: {}", total - passed)?;
    writeln!(
        out,
        "- **Success rate**: {:.1}%\n",
        success_rate(passed, total)
    )?;

    writeln!(out, "## Detailed Results\n")?;
    writeln!(
        out,
        "| Status | Strategy | Iterations | Endings | Mean quality | Mean progress |"
    )?;
    writeln!(out, "|---|---|---|---|---|---|")?;
    for result in results {
        let status = if result.passed { "✅" } else { "❌" };
        writeln!(
            out,
            "| {status} | {} | {}/{} | {} | {:.1} | {:.1} |",
            result.strategy.label(),
            result.successful_iterations,
            result.iterations_run,
            ending_mix(result),
            result.mean_quality,
            result.mean_progress
        )?;
    }

    let failures: Vec<_> = results
        .iter()
        .flat_map(|r| r.failures.iter().map(move |f| (r.strategy, f)))
        .collect();
    if !failures.is_empty() {
        writeln!(out, "\n## Failures\n")?;
        for (strategy, failure) in failures {
            writeln!(out, "- **{}**: {failure}", strategy.label())?;
        }
    }
    Ok(())
}

/// One row per simulated run.
pub fn generate_csv_report<W: Write>(out: &mut W, results: &[StrategyResult]) -> Result<()> {
    writeln!(
        out,
        "strategy,seed,ending,days_played,quality,progress,energy,bug_count,visual_degradation,compromises,skipped_minigames,genre,duration_ms"
    )?;
    for result in results {
        for run in &result.runs {
            writeln!(
                out,
                "{},{},{},{},{},{},{},{},{},{},{},{},{}",
                result.strategy.key(),
                run.seed,
                run.ending.as_str(),
                run.days_played,
                run.quality,
                run.progress,
                run.energy,
                run.bug_count,
                run.visual_degradation,
                run.compromises,
                run.skipped_minigames,
                run.genre.as_deref().unwrap_or(""),
                run.duration.as_millis()
            )?;
        }
    }
    Ok(())
}
