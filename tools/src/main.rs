//! wealthquest-runner: headless player for WealthQuest.
//!
//! Usage:
//!   wealthquest-runner --capital 10000 --policy greedy --db run.db
//!   wealthquest-runner --capital 5000 --months 6 --threshold 500 --seed 7
//!   wealthquest-runner --catalog my_catalog.json --policy random
//!   wealthquest-runner --ipc-mode

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::io::{self, BufRead, Write};
use wealthquest_core::{
    analysis::LedgerAnalyst,
    catalog,
    command::PlayerCommand,
    config::{GameConfig, StartOptions},
    deck::ScenarioDeck,
    rng::{GameRng, StreamSlot},
    scenario::{parse_scenarios, Scenario},
    session::GameSession,
    source::GeneratedSource,
    state::{Directive, GameState, HistoryEntry, Phase},
    store::SessionStore,
    types::{Money, OptionId},
};

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    Start {
        capital: String,
        #[serde(default)]
        months: Option<u32>,
        #[serde(default)]
        hard_threshold: Option<Money>,
    },
    Choose {
        option_id: OptionId,
    },
    Continue,
    Reset,
    GetState,
    Analyze,
    Quit,
}

#[derive(Serialize)]
struct UiState<'a> {
    run_id: Option<&'a str>,
    phase: Phase,
    capital: Money,
    round: u32,
    month_label: String,
    month_round_index: u32,
    monthly_salary: Money,
    is_over: bool,
    is_win: bool,
    directive: Option<Directive>,
    scenario: Option<&'a Scenario>,
    history: &'a [HistoryEntry],
}

enum Policy {
    First,
    Greedy,
    Random(GameRng),
}

impl Policy {
    fn parse(name: &str, seed: u64) -> Result<Self> {
        match name {
            "first" => Ok(Self::First),
            "greedy" => Ok(Self::Greedy),
            "random" => Ok(Self::Random(GameRng::new(seed, StreamSlot::ChoicePolicy))),
            other => anyhow::bail!("unknown policy '{other}' (expected first, greedy or random)"),
        }
    }

    fn pick(&mut self, scenario: &Scenario, capital: Money) -> OptionId {
        match self {
            Self::First => scenario.options[0].id,
            Self::Greedy => scenario
                .options
                .iter()
                .max_by(|a, b| {
                    a.outcome.apply_to(capital).total_cmp(&b.outcome.apply_to(capital))
                })
                .map_or(scenario.options[0].id, |o| o.id),
            Self::Random(rng) => {
                let index = rng.next_u64_below(scenario.options.len() as u64) as usize;
                scenario.options[index].id
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let capital = find_arg(&args, "--capital").unwrap_or("10000");
    let months: Option<u32> = parse_arg(&args, "--months")?;
    let threshold: Option<Money> = parse_arg(&args, "--threshold")?;
    let seed: Option<u64> = parse_arg(&args, "--seed")?;
    let policy_name = find_arg(&args, "--policy").unwrap_or("first");
    let db = find_arg(&args, "--db").unwrap_or(":memory:");
    let data_dir = find_arg(&args, "--data-dir").unwrap_or("./data");
    let scenarios_file = find_arg(&args, "--scenarios");
    let catalog_file = find_arg(&args, "--catalog");

    let config = match find_arg(&args, "--config") {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::load_from_data_dir(data_dir)?,
    };

    let scenarios = match (scenarios_file, catalog_file) {
        (Some(_), Some(_)) => anyhow::bail!("--scenarios and --catalog are mutually exclusive"),
        (Some(path), None) => parse_scenarios(&std::fs::read_to_string(path)?)?,
        (None, Some(path)) => catalog::load_catalog(path)?,
        (None, None) => catalog::builtin_scenarios()?,
    };
    let mut deck = ScenarioDeck::new(scenarios)?;
    if let Some(seed) = seed {
        deck.shuffle(seed);
    }

    let store = if db == ":memory:" {
        SessionStore::in_memory()?
    } else {
        SessionStore::open(db)?
    };
    store.migrate()?;

    let mut session = GameSession::new(config, deck, store);
    if let Some(path) = scenarios_file {
        // Re-read the generator output each time the deck runs out.
        let path = path.to_string();
        session = session.with_source(Box::new(GeneratedSource::new(move || {
            Ok(std::fs::read_to_string(&path).map_err(anyhow::Error::from)?)
        })));
    }

    if ipc_mode {
        return run_ipc_loop(&mut session);
    }

    println!("WealthQuest runner");
    println!("  capital:   {capital}");
    println!("  policy:    {policy_name}");
    println!("  db:        {db}");
    println!();

    let mut policy = Policy::parse(policy_name, seed.unwrap_or(42))?;
    let options = StartOptions { months, hard_threshold: threshold };
    autoplay(&mut session, capital, &options, &mut policy)?;
    print_summary(&session)
}

fn autoplay(
    session: &mut GameSession,
    capital: &str,
    options: &StartOptions,
    policy: &mut Policy,
) -> Result<()> {
    session.start(capital, options)?;

    while let Some(scenario) = session.current_scenario().cloned() {
        let option_id = policy.pick(&scenario, session.state().capital);
        let directive = session.choose(option_id)?;

        let state = session.state();
        if let Some(entry) = state.history.last() {
            println!(
                "  {:>3}  {:<15} #{:<3} option {option_id}  ${:.2}",
                state.rounds_played(),
                entry.month_label,
                scenario.id,
                entry.capital_after
            );
        }
        match directive {
            Directive::MonthEnded(settlement) => {
                println!(
                    "       month closed: +${:.2} salary, -${:.2} expenses -> ${:.2}",
                    settlement.salary_credited, settlement.expenses_deducted, state.capital
                );
            }
            Directive::GameOver { win } => {
                println!();
                println!("  {} with ${:.2}", if win { "WON" } else { "LOST" }, state.capital);
                break;
            }
            Directive::Continue | Directive::ShowRoundResult => {}
        }
        session.continue_game()?;
    }
    Ok(())
}

fn run_ipc_loop(session: &mut GameSession) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        let command = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => {
                write_state(&mut stdout, session, None)?;
                continue;
            }
            IpcCommand::Analyze => {
                match session.analyze(&LedgerAnalyst) {
                    Ok(text) => writeln!(stdout, "{}", serde_json::json!({ "analysis": text }))?,
                    Err(e) => write_error(&mut stdout, &e.to_string())?,
                }
                stdout.flush()?;
                continue;
            }
            IpcCommand::Start { capital, months, hard_threshold } => {
                PlayerCommand::Start { capital, months, hard_threshold }
            }
            IpcCommand::Choose { option_id } => PlayerCommand::Choose { option_id },
            IpcCommand::Continue => PlayerCommand::Continue,
            IpcCommand::Reset => PlayerCommand::Reset,
        };

        match session.apply_command(command) {
            Ok(directive) => write_state(&mut stdout, session, directive)?,
            Err(e) => {
                log::warn!("command rejected: {e}");
                write_error(&mut stdout, &e.to_string())?;
            }
        }
    }
    Ok(())
}

fn write_state(out: &mut impl Write, session: &GameSession, directive: Option<Directive>) -> Result<()> {
    let state = build_ui_state(session, directive);
    writeln!(out, "{}", serde_json::to_string(&state)?)?;
    out.flush()?;
    Ok(())
}

fn write_error(out: &mut impl Write, message: &str) -> Result<()> {
    writeln!(out, "{}", serde_json::json!({ "error": message }))?;
    out.flush()?;
    Ok(())
}

fn build_ui_state(session: &GameSession, directive: Option<Directive>) -> UiState<'_> {
    let state: &GameState = session.state();
    UiState {
        run_id: session.run_id(),
        phase: state.phase,
        capital: state.capital,
        round: state.current_round,
        month_label: state.month_label(),
        month_round_index: state.current_month_round_index,
        monthly_salary: state.monthly_salary,
        is_over: state.is_over,
        is_win: state.is_win,
        directive,
        scenario: session.current_scenario(),
        history: &state.history,
    }
}

fn print_summary(session: &GameSession) -> Result<()> {
    let events = session.events()?;

    println!();
    println!("=== RUN SUMMARY ===");
    println!("  run_id:  {}", session.run_id().unwrap_or("-"));
    println!("  events:  {}", events.len());
    println!("  runs:    {}", session.store().run_count()?);
    println!();
    println!("{}", session.analyze(&LedgerAnalyst)?);
    Ok(())
}

fn find_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}

/// A flag that is absent is None; a flag with an unparsable value is an error.
fn parse_arg<T>(args: &[String], flag: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    find_arg(args, flag)
        .map(|v| v.parse().map_err(|e| anyhow::anyhow!("invalid value '{v}' for {flag}: {e}")))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn numeric_flags_parse_or_fail_loudly() {
        let argv = args("runner --months 6 --threshold 250.5 --seed x7");
        assert_eq!(parse_arg::<u32>(&argv, "--months").unwrap(), Some(6));
        assert_eq!(parse_arg::<Money>(&argv, "--threshold").unwrap(), Some(250.5));
        assert_eq!(parse_arg::<u32>(&argv, "--max-rounds").unwrap(), None);

        let err = parse_arg::<u64>(&argv, "--seed").unwrap_err();
        assert!(err.to_string().starts_with("invalid value 'x7' for --seed"), "{err}");
    }
}
