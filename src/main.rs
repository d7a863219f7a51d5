use anyhow::anyhow;
use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use colored::Colorize;
use gtocore::cache::equity::EquityCache;
use gtocore::cache::solution::SolutionCache;
use gtocore::cards::card::Card;
use gtocore::cards::street::Street;
use gtocore::equity::Calculator;
use gtocore::gameplay::action::Action;
use gtocore::gameplay::range::Range;
use gtocore::gameplay::spot::Spot;
use gtocore::solver::Retry;
use gtocore::solver::Solution;
use gtocore::solver::Solver;
use gtocore::Probability;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about = "GTO solving core: equity estimation and CFR spot solving")]
struct Args {
    /// root directory for the disk cache tiers
    #[arg(long, default_value = ".gtocore")]
    cache: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Monte Carlo equity of explicit hands against each other
    Equity {
        /// comma-separated hole cards, e.g. "AsAh,KdKc"
        #[arg(long)]
        hands: String,
        /// comma-separated board cards, e.g. "Ad,7c,2h"
        #[arg(long, default_value = "")]
        board: String,
        #[arg(long, default_value_t = 10_000)]
        iterations: usize,
    },
    /// near-equilibrium strategies for an abstracted spot
    Solve {
        #[arg(long)]
        street: String,
        #[arg(long)]
        pot: f32,
        #[arg(long)]
        stack: f32,
        #[arg(long, default_value_t = 0.)]
        to_call: f32,
        /// comma-separated board cards, length consistent with street
        #[arg(long, default_value = "")]
        board: String,
        #[arg(long, default_value = "BTN")]
        position: String,
        #[arg(long, default_value_t = 2)]
        players: usize,
        /// per-player range, repeatable, e.g. --range "UTG=AA;KK:0.5"
        #[arg(long)]
        range: Vec<String>,
        /// iteration budget; defaults to the built-in budget
        #[arg(long)]
        iterations: Option<usize>,
    },
    /// drop all but the newest-n entries from both disk tiers
    Trim {
        #[arg(long, default_value_t = 1_000)]
        keep: usize,
    },
}

fn main() -> Result<()> {
    logs();
    let args = Args::parse();
    let equity = Calculator::new(EquityCache::new(
        args.cache.join("equity"),
        gtocore::EQUITY_CACHE_SIZE,
    )?);
    match args.command {
        Command::Equity {
            hands,
            board,
            iterations,
        } => {
            let hands = split(&hands);
            let equities = equity.estimate(&hands, &split(&board), iterations);
            for (hand, value) in hands.iter().zip(equities) {
                println!("{:>8} {}", hand, format!("{:>6.2}%", value * 100.).bold());
            }
        }
        Command::Solve {
            street,
            pot,
            stack,
            to_call,
            board,
            position,
            players,
            range,
            iterations,
        } => {
            let solutions = SolutionCache::new(
                args.cache.join("solutions"),
                gtocore::SOLUTION_CACHE_SIZE,
            )?;
            let solver = Solver::new(solutions, equity);
            let street = Street::try_from(street.as_str()).map_err(|e| anyhow!(e))?;
            let board = split(&board)
                .iter()
                .map(|s| Card::try_from(s.as_str()).map_err(|e| anyhow!(e)))
                .collect::<Result<Vec<Card>>>()?;
            let spot = Spot::new(street, pot, stack, board, &position, players, to_call)?;
            let mut ranges = BTreeMap::new();
            for entry in &range {
                let (player, hands) = entry
                    .split_once('=')
                    .ok_or_else(|| anyhow!("range wants PLAYER=HANDS, got {:?}", entry))?;
                let parsed = Range::try_from(hands).map_err(|e| anyhow!(e))?;
                ranges.insert(player.to_string(), parsed);
            }
            let solution = Retry::default().run(|| solver.solve(&spot, &ranges, iterations))?;
            render(&solution);
        }
        Command::Trim { keep } => {
            let solutions = SolutionCache::new(
                args.cache.join("solutions"),
                gtocore::SOLUTION_CACHE_SIZE,
            )?;
            let dropped = equity.trim(keep) + solutions.trim(keep);
            println!("dropped {} cache entries", dropped);
        }
    }
    Ok(())
}

fn split(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn render(solution: &Solution) {
    println!(
        "{} iterations in {:.2}s, exploitability {:.4}{}",
        solution.iterations(),
        solution.seconds(),
        solution.exploitability(),
        if solution.converged() {
            " (converged)".green().to_string()
        } else {
            String::new()
        },
    );
    for (player, hands) in solution.strategies() {
        for (hand, strategy) in hands {
            let cells = strategy
                .weights()
                .iter()
                .map(|(action, weight)| paint(*action, *weight))
                .collect::<Vec<String>>()
                .join("  ");
            println!("{:>6} {:>6}  {}", player.bold(), hand, cells);
        }
    }
}

fn paint(action: Action, weight: Probability) -> String {
    let cell = format!("{} {:>5.1}%", action, weight * 100.);
    match action {
        Action::Fold => cell.red(),
        Action::Check => cell.cyan(),
        Action::Call => cell.yellow(),
        Action::Bet | Action::Raise => cell.green(),
        Action::AllIn => cell.magenta(),
    }
    .to_string()
}

/// terminal logger, INFO and up
fn logs() {
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    simplelog::TermLogger::init(
        log::LevelFilter::Info,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )
    .expect("initialize logger");
}
