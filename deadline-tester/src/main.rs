mod logic;
mod util;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use logic::{GameplayStrategy, LogicTester, StrategyResult, TesterAssets, resolve_seed_inputs};
use util::split_csv;

#[derive(Debug, Parser)]
#[command(name = "deadline-tester", version)]
#[command(about = "Automated playthroughs and ending checks for the Deadline game logic")]
struct Args {
    /// Strategies to run (comma-separated, or `all`)
    #[arg(long, default_value = "all")]
    strategies: String,

    /// List all available strategies and exit
    #[arg(long)]
    list_strategies: bool,

    /// Seeds to run (comma-separated; integers, 0x hex, or A..B ranges)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per strategy and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console", "csv"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Directory holding `days.json` and optional `rules.json` to test instead
    /// of the bundled data
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_strategies(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let strategies = expand_strategies(&args.strategies)?;
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;
    let assets = load_assets(&args)?;

    let results = run_strategies(&args, &assets, &strategies, &seeds);
    write_reports(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_strategies(args: &Args) -> Result<bool> {
    if !args.list_strategies {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available strategies:")?;
    for strategy in GameplayStrategy::ALL {
        let expected = strategy
            .expected_ending()
            .map_or_else(|| "any".to_string(), |ending| ending.to_string());
        writeln!(
            output_target.writer(),
            "  {:15} - {} (expects {expected})",
            strategy.key(),
            strategy.description()
        )?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🎮 Deadline Automated Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn expand_strategies(strategies_arg: &str) -> Result<Vec<GameplayStrategy>> {
    let mut strategies = Vec::new();
    for name in split_csv(strategies_arg) {
        if name.eq_ignore_ascii_case("all") {
            strategies.extend(GameplayStrategy::ALL);
            continue;
        }
        let Ok(strategy) = name.parse::<GameplayStrategy>() else {
            bail!("Unknown strategy: {name} (try --list-strategies)");
        };
        strategies.push(strategy);
    }
    let mut seen = std::collections::HashSet::new();
    strategies.retain(|strategy| seen.insert(*strategy));
    Ok(strategies)
}

fn load_assets(args: &Args) -> Result<TesterAssets> {
    match &args.data_dir {
        Some(dir) => {
            log::info!("loading game data from {}", dir.display());
            TesterAssets::from_dir(dir)
        }
        None => Ok(TesterAssets::load_default()),
    }
}

fn run_strategies(
    args: &Args,
    assets: &TesterAssets,
    strategies: &[GameplayStrategy],
    seeds: &[u64],
) -> Vec<StrategyResult> {
    println!("{}", "🧠 Running Strategy Playthroughs".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let tester = LogicTester::new(assets, args.verbose);
    strategies
        .iter()
        .flat_map(|&strategy| tester.run_strategy(strategy, seeds, args.iterations))
        .collect()
}

fn write_reports(args: &Args, results: &[StrategyResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, results)?,
        "markdown" => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Deadline Strategy Test Results\n\n_No strategies executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        "csv" => logic::reports::generate_csv_report(&mut output_target, results)?,
        _ => {
            if results.is_empty() {
                writeln!(&mut output_target, "No strategies executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    results,
                    start_time.elapsed(),
                )?;
            }
            let duration = start_time.elapsed();
            writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
