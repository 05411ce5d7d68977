use std::io;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use xadrez::console::{Console, ConsoleOptions};
use xadrez::{Color, Setup};

/// Play a chess match in the terminal.
#[derive(Parser, Debug)]
#[command(name = "xadrez", version)]
struct Args {
    /// Starting layout: empty, demo or classic.
    #[arg(long, default_value_t = Setup::Demo)]
    setup: Setup,

    /// Let the computer play this side (white or black).
    #[arg(long, value_parser = parse_color)]
    computer: Option<Color>,

    /// Seed for the computer's moves.
    #[arg(long)]
    seed: Option<u64>,
}

fn parse_color(s: &str) -> Result<Color, String> {
    match s.to_ascii_lowercase().as_str() {
        "white" | "w" => Ok(Color::White),
        "black" | "b" => Ok(Color::Black),
        other => Err(format!("unknown color {other:?}")),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let options = ConsoleOptions {
        setup: args.setup,
        computer: args.computer,
        seed: args.seed,
    };

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout(), options)?;
    console.run()
}
