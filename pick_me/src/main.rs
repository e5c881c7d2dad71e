//! pick_me — interactive entry point.

use std::time::Duration;

use clap::Parser;
use pick_me::app::{run, AppConfig};
use pick_session::SessionConfig;
use tracing_subscriber::EnvFilter;

/// Everyone holds a finger down; one is picked at random.
#[derive(Debug, Parser)]
#[command(name = "pick_me", version, about)]
struct Cli {
    /// Fixed RNG seed, for reproducible picks.
    #[arg(long)]
    seed: Option<u64>,

    /// Ring fill tick in milliseconds.
    #[arg(long, default_value_t = 10)]
    advance_ms: u64,

    /// Completion check period in milliseconds.
    #[arg(long, default_value_t = 200)]
    evaluate_ms: u64,

    /// Play a scripted round alongside the mouse.
    #[arg(long)]
    demo: bool,
}

impl Cli {
    fn into_config(self) -> AppConfig {
        AppConfig {
            session: SessionConfig {
                advance_interval:  Duration::from_millis(self.advance_ms),
                evaluate_interval: Duration::from_millis(self.evaluate_ms),
                rng_seed:          self.seed,
                ..SessionConfig::default()
            },
            demo: self.demo,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║           Pick Me — everybody put a finger down              ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!("  Mouse: hold the left button to touch.  Keys 1–9 pin extra fingers.");
    if cli.demo {
        println!("  Demo script enabled.");
    }
    println!();

    if let Err(e) = run(cli.into_config()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
