//! Prisoner's Dilemma outcome table
//!
//! Reads a strategy table or a result matrix and prints the ranking table
//! and the payoff matrix, or the whole session report as JSON.

use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dilemma_core::{
    compute, round_to_cents, DilemmaError, Mode, Outcome, PayoffField, PayoffParameters,
    SessionReport, SortKey, Standings,
};

#[derive(Parser)]
#[command(name = "dilemma")]
#[command(about = "Expected payoffs of iterated Prisoner's Dilemma strategies", long_about = None)]
struct Cli {
    /// Table file, one player per line ("-" reads stdin)
    input: PathBuf,

    /// Kind of table in the input
    #[arg(long, value_enum, default_value_t = ModeArg::Strategies)]
    mode: ModeArg,

    /// Payoff values to start from
    #[arg(long, value_enum, default_value_t = PresetArg::Standard)]
    preset: PresetArg,

    /// Override the reward for mutual cooperation
    #[arg(long, allow_hyphen_values = true)]
    reward: Option<String>,

    /// Override the sucker's payoff
    #[arg(long, allow_hyphen_values = true)]
    sucker: Option<String>,

    /// Override the temptation to defect
    #[arg(long, allow_hyphen_values = true)]
    temptation: Option<String>,

    /// Override the punishment for mutual defection
    #[arg(long, allow_hyphen_values = true)]
    punishment: Option<String>,

    /// Ranking table column, descending
    #[arg(long, value_enum, default_value_t = SortArg::Gets)]
    sort: SortArg,

    /// Print the session report as JSON
    #[arg(long)]
    json: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Strategies,
    Results,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Strategies => Mode::Strategies,
            ModeArg::Results => Mode::ResultMatrix,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PresetArg {
    Standard,
    Traditional,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Gets,
    Gives,
    Ratio,
    Wins,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Gets => SortKey::Gets,
            SortArg::Gives => SortKey::Gives,
            SortArg::Ratio => SortKey::Ratio,
            SortArg::Wins => SortKey::Wins,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin()).context("Failed to read table from stdin")
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read table: {}", path.display()))
    }
}

fn payoffs(cli: &Cli) -> Result<PayoffParameters, DilemmaError> {
    let mut payoffs = match cli.preset {
        PresetArg::Standard => PayoffParameters::standard(),
        PresetArg::Traditional => PayoffParameters::traditional(),
    };
    let overrides = [
        (PayoffField::Reward, &cli.reward),
        (PayoffField::Sucker, &cli.sucker),
        (PayoffField::Temptation, &cli.temptation),
        (PayoffField::Punishment, &cli.punishment),
    ];
    for (field, raw) in overrides {
        if let Some(raw) = raw {
            payoffs = payoffs.with_field(field, raw)?;
        }
    }
    Ok(payoffs)
}

/// Payoffs only feed strategy sessions; a result table ignores the fields
fn session(cli: &Cli, text: &str) -> Result<Outcome, DilemmaError> {
    match Mode::from(cli.mode) {
        Mode::Strategies => compute(text, Mode::Strategies, &payoffs(cli)?),
        Mode::ResultMatrix => compute(text, Mode::ResultMatrix, &PayoffParameters::default()),
    }
}

fn cents(value: f64) -> String {
    format!("{:.2}", round_to_cents(value))
}

fn print_standings(outcome: &Outcome, key: SortKey) {
    let width = outcome.players.iter().map(|n| n.chars().count()).max().unwrap_or(0).max(6);
    println!(
        "{:>3}  {:<width$}  {:>8}  {:>8}  {:>8}  {:>4}",
        "#", "Player", "gets", "gives", "ratio", "wins"
    );
    for (rank, index) in Standings::rank_by(&outcome.aggregates, key).iter() {
        let row = &outcome.aggregates[index];
        let ratio = row.ratio.map_or_else(|| "-".to_string(), cents);
        println!(
            "{:>3}  {:<width$}  {:>8}  {:>8}  {:>8}  {:>4}",
            rank,
            row.name,
            cents(row.average_gets),
            cents(row.average_gives),
            ratio,
            row.wins,
        );
    }
}

fn print_matrix(outcome: &Outcome) {
    let width = outcome.players.iter().map(|n| n.chars().count()).max().unwrap_or(0).max(6);
    let header: Vec<String> = outcome.players.iter().map(|n| format!("{:>width$}", n)).collect();
    println!("{:<width$}  {}", "", header.join("  "));
    for (name, row) in outcome.players.iter().zip(outcome.matrix.rows()) {
        let cells: Vec<String> = row.iter().map(|v| format!("{:>width$}", cents(*v))).collect();
        println!("{:<width$}  {}", name, cells.join("  "));
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mode = Mode::from(cli.mode);
    let text = read_input(&cli.input)?;
    let result = session(&cli, &text);

    if cli.json {
        let report = SessionReport::new(mode, result);
        println!("{}", serde_json::to_string_pretty(&report)?);
        if report.faulty {
            std::process::exit(1);
        }
        return Ok(());
    }

    let outcome = result.with_context(|| format!("Rejected {}", cli.input.display()))?;
    log::info!("{} players, {} matchups", outcome.players.len(), outcome.matchups.len());

    println!("Ranking by {:?} (per-opponent averages)", SortKey::from(cli.sort));
    print_standings(&outcome, cli.sort.into());
    println!();
    println!("Payoff matrix (row player's payoff)");
    print_matrix(&outcome);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS: &str = "A, 1, 2\nB, 3, 4";

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("dilemma").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = cli(&["table.csv"]);
        assert_eq!(Mode::from(cli.mode), Mode::Strategies);
        assert_eq!(payoffs(&cli).unwrap(), PayoffParameters::standard());
        assert!(!cli.json);
    }

    #[test]
    fn test_mode_mapping() {
        let cli = cli(&["--mode", "results", "table.csv"]);
        assert_eq!(Mode::from(cli.mode), Mode::ResultMatrix);
    }

    #[test]
    fn test_overrides_apply_on_top_of_preset() {
        let cli = cli(&["--preset", "traditional", "--reward", "-1/2", "--punishment", "-4", "t"]);
        let payoffs = payoffs(&cli).unwrap();
        assert_eq!(payoffs.reward, -0.5);
        assert_eq!(payoffs.punishment, -4.0);
        // untouched fields keep the preset
        assert_eq!(payoffs.sucker, PayoffParameters::traditional().sucker);
        assert_eq!(payoffs.temptation, PayoffParameters::traditional().temptation);
    }

    #[test]
    fn test_malformed_override_fails_strategy_session() {
        let cli = cli(&["--reward", "abc", "t"]);
        let err = session(&cli, "TFT, 1, 0, 1, 0").unwrap_err();
        assert_eq!(err.faulty_block(), Mode::Strategies);
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_result_mode_ignores_payoff_fields() {
        let cli = cli(&["--mode", "results", "--reward", "abc", "--json", "t"]);
        let report = SessionReport::new(Mode::from(cli.mode), session(&cli, RESULTS));
        assert!(!report.faulty);
        assert_eq!(report.block, Mode::ResultMatrix);

        let outcome = report.outcome.unwrap();
        assert_eq!(outcome.matrix.get(1, 0), 3.0);
    }

    #[test]
    fn test_faulty_result_table_flags_result_block() {
        let cli = cli(&["--mode", "results", "t"]);
        let report = SessionReport::new(Mode::from(cli.mode), session(&cli, "A, 1, 2\nB, 3"));
        assert!(report.faulty);
        assert_eq!(report.block, Mode::ResultMatrix);
    }

    #[test]
    fn test_cents() {
        assert_eq!(cents(1.0 / 3.0), "0.33");
        assert_eq!(cents(0.125), "0.13");
    }
}
