//! # bcert-verify — The Verification State Machine
//!
//! Drives a normalized credential through the fixed sequence of
//! verification steps and produces one terminal verdict:
//!
//! - **Step** (`step.rs`): the closed step-code and status enumerations
//!   (stable wire names — external consumers key off them), `StepResult`,
//!   and the failure-kind taxonomy.
//!
//! - **State** (`state.rs`): the per-run, insertion-ordered step ledger and
//!   the run lifecycle Pending → Running → Completed.
//!
//! - **Progress** (`progress.rs`): the sink contract — at most two
//!   notifications per step (`starting`, then exactly one terminal status).
//!
//! - **Authenticity** (`authenticity.rs`): issuer-key validity at the
//!   anchoring transaction's timestamp.
//!
//! - **Orchestrator** (`orchestrator.rs`): the `Verifier` that sequences
//!   the steps, short-circuits dependents of failed steps, applies bounded
//!   timeouts to external calls, and fires the completion exactly once.
//!
//! ## Concurrency Model
//!
//! One `verify` call is one cooperative async sequence; it owns its entire
//! state, so concurrent calls on the same `Verifier` are independent.
//! Dropping the future at any suspension point cancels the run without
//! leaking background work.

pub mod authenticity;
pub mod orchestrator;
pub mod progress;
pub mod state;
pub mod step;

pub use orchestrator::{VerificationReport, Verifier, VerifierConfig};
pub use progress::{CollectingSink, NullSink, ProgressSink};
pub use state::{RunState, VerificationState, Verdict};
pub use step::{FailureKind, Status, StepCode, StepResult};
