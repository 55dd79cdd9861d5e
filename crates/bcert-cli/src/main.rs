//! # bcert CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;

/// bcert — blockchain-anchored credential verification.
///
/// Verifies that a credential document is untampered, anchored to the
/// chain it claims, unrevoked, and issued by a key that was valid when
/// the anchoring transaction was mined.
#[derive(Parser, Debug)]
#[command(name = "bcert", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Verify a credential against fixture-backed anchoring evidence.
    Verify(bcert_cli::verify::VerifyArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Verify(args) => bcert_cli::verify::run(args).await,
    }
}
