//! # Verify Subcommand
//!
//! Drives one credential through the verification pipeline, streaming
//! step transitions to stdout, and maps the verdict to the process exit.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use clap::Args;

use bcert_anchor::lookup::{ProviderChain, RetryPolicy};
use bcert_verify::{Status, StepCode, Verdict, Verifier};

use crate::fixtures;

/// Arguments for `bcert verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Path to the credential document (JSON).
    pub credential: PathBuf,

    /// Path to the transactions fixture: the anchoring evidence.
    #[arg(long)]
    pub transactions: PathBuf,

    /// Path to the issuer profile fixture.
    #[arg(long)]
    pub issuer: PathBuf,

    /// Path to the revocation list fixture, if the issuer publishes one.
    #[arg(long)]
    pub revocation: Option<PathBuf>,

    /// Only print the final verdict, not per-step progress.
    #[arg(long)]
    pub quiet: bool,
}

/// Run the verify subcommand.
///
/// Exit behavior: `Ok` for `success` and `mockSuccess` (the latter with a
/// warning on stderr), error for `failure`.
pub async fn run(args: VerifyArgs) -> anyhow::Result<()> {
    tracing::info!(credential = %args.credential.display(), "verifying credential");
    let credential = fixtures::load_json(&args.credential)?;
    let transactions = fixtures::parse_transactions(&fixtures::load_json(&args.transactions)?)?;
    let issuers = fixtures::parse_issuer(&fixtures::load_json(&args.issuer)?)?;
    let revocations = match &args.revocation {
        Some(path) => fixtures::parse_revocation(&fixtures::load_json(path)?)?,
        None => bcert_cert::memory::StaticRevocationSource::new(),
    };

    let verifier = Verifier::new(
        ProviderChain::new(vec![Arc::new(transactions)], RetryPolicy::default()),
        Arc::new(issuers),
        Arc::new(revocations),
    );

    let quiet = args.quiet;
    let sink = move |code: StepCode, message: &str, status: Status| {
        if !quiet && code != StepCode::Final {
            println!("[{status}] {code}: {message}");
        }
    };

    let report = verifier.verify(&credential, &sink).await;

    match report.verdict {
        Verdict::Success => {
            println!("VERIFIED: {}", report.final_result.message);
            Ok(())
        }
        Verdict::MockSuccess => {
            println!("VERIFIED (mock): {}", report.final_result.message);
            eprintln!("warning: anchored to a non-production network; do not treat as production-grade trust");
            Ok(())
        }
        Verdict::Failure => {
            bail!("verification failed: {}", report.final_result.message)
        }
    }
}
