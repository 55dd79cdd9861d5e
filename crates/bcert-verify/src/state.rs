//! # Per-Run Verification State
//!
//! The append-only ledger of step transitions for one verification run,
//! plus the run lifecycle.
//!
//! ## States
//!
//! Per step: Pending → Starting → (Success | Failure). Per run:
//! Pending → Running → Completed{success | mockSuccess | failure}.
//!
//! ## Security Invariant
//!
//! The aggregate verdict is `Failure` iff at least one check failed; the
//! network classification is consulted only for fully passing runs and can
//! never upgrade a failed one. Transition discipline (a step starts once
//! and terminates exactly once) is asserted — violating it is a bug in the
//! orchestrator, not a data condition.

use bcert_anchor::network::NetworkClass;
use bcert_core::RunId;

use crate::step::{Status, StepCode, StepResult};

/// The lifecycle of one verification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Created, not yet executing.
    Pending,
    /// Steps are executing.
    Running,
    /// All steps resolved; terminal.
    Completed(Verdict),
}

/// The aggregate outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Every check passed on a production network.
    Success,
    /// Every check passed, but the anchoring network is not production.
    MockSuccess,
    /// At least one required check failed.
    Failure,
}

impl Verdict {
    /// The status carried by the final notification for this verdict.
    pub fn as_status(&self) -> Status {
        match self {
            Self::Success => Status::Success,
            Self::MockSuccess => Status::MockSuccess,
            Self::Failure => Status::Failure,
        }
    }
}

/// The ordered step ledger for one run. Created fresh per `verify` call,
/// never shared across runs.
#[derive(Debug)]
pub struct VerificationState {
    run_id: RunId,
    results: Vec<StepResult>,
    run_state: RunState,
}

impl VerificationState {
    /// Create a pending run.
    pub fn new(run_id: RunId) -> Self {
        Self {
            run_id,
            results: Vec::new(),
            run_state: RunState::Pending,
        }
    }

    /// The run identifier.
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// The current run lifecycle state.
    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Mark the run as executing.
    pub fn begin_run(&mut self) {
        assert_eq!(
            self.run_state,
            RunState::Pending,
            "run started twice"
        );
        self.run_state = RunState::Running;
    }

    /// Append a step transition.
    ///
    /// # Panics
    ///
    /// Panics on transition-discipline violations: a step starting twice,
    /// terminating twice, or terminating without starting. These are
    /// orchestrator bugs.
    pub fn record(&mut self, result: StepResult) {
        let prior_starting = self
            .results
            .iter()
            .any(|r| r.code == result.code && r.status == Status::Starting);
        let prior_terminal = self
            .results
            .iter()
            .any(|r| r.code == result.code && r.status.is_terminal());

        if result.status == Status::Starting {
            assert!(
                !prior_starting,
                "step {} started twice",
                result.code
            );
        } else {
            assert!(
                prior_starting || result.code == StepCode::Final,
                "step {} terminated without starting",
                result.code
            );
            assert!(
                !prior_terminal,
                "step {} terminated twice",
                result.code
            );
        }
        self.results.push(result);
    }

    /// The full transition trace in execution order.
    pub fn results(&self) -> &[StepResult] {
        &self.results
    }

    /// The terminal result for a step, if it has one yet.
    pub fn terminal(&self, code: StepCode) -> Option<&StepResult> {
        self.results
            .iter()
            .find(|r| r.code == code && r.status.is_terminal())
    }

    /// Whether a step reached `success`.
    pub fn step_succeeded(&self, code: StepCode) -> bool {
        matches!(
            self.terminal(code),
            Some(StepResult {
                status: Status::Success,
                ..
            })
        )
    }

    /// The first check that failed, in execution order — the
    /// highest-priority reason the run fails.
    pub fn first_failure(&self) -> Option<&StepResult> {
        self.results
            .iter()
            .find(|r| r.code != StepCode::Final && r.status == Status::Failure)
    }

    /// Resolve the aggregate verdict and complete the run.
    ///
    /// `class` is the anchoring network's classification; it is consulted
    /// only when every check passed.
    pub fn resolve(&mut self, class: NetworkClass) -> Verdict {
        let verdict = if self.first_failure().is_some() {
            Verdict::Failure
        } else {
            match class {
                NetworkClass::Production => Verdict::Success,
                NetworkClass::Mock => Verdict::MockSuccess,
            }
        };
        self.complete(verdict);
        verdict
    }

    /// Complete the run with an externally decided verdict (used when a
    /// document is rejected before any step runs).
    pub fn complete(&mut self, verdict: Verdict) {
        self.run_state = RunState::Completed(verdict);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn starting(code: StepCode) -> StepResult {
        StepResult::new(code, "starting", Status::Starting)
    }

    fn success(code: StepCode) -> StepResult {
        StepResult::new(code, "ok", Status::Success)
    }

    fn failure(code: StepCode) -> StepResult {
        StepResult::new(code, "bad", Status::Failure)
    }

    #[test]
    fn test_lifecycle() {
        let mut state = VerificationState::new(RunId::new());
        assert_eq!(state.run_state(), RunState::Pending);
        state.begin_run();
        assert_eq!(state.run_state(), RunState::Running);
        state.record(starting(StepCode::CheckingFormat));
        state.record(success(StepCode::CheckingFormat));
        let verdict = state.resolve(NetworkClass::Production);
        assert_eq!(verdict, Verdict::Success);
        assert_eq!(state.run_state(), RunState::Completed(Verdict::Success));
    }

    #[test]
    fn test_mock_network_gives_mock_success() {
        let mut state = VerificationState::new(RunId::new());
        state.begin_run();
        state.record(starting(StepCode::CheckingFormat));
        state.record(success(StepCode::CheckingFormat));
        assert_eq!(state.resolve(NetworkClass::Mock), Verdict::MockSuccess);
    }

    #[test]
    fn test_any_failure_wins_over_network_class() {
        let mut state = VerificationState::new(RunId::new());
        state.begin_run();
        state.record(starting(StepCode::CheckingFormat));
        state.record(success(StepCode::CheckingFormat));
        state.record(starting(StepCode::ComputingLocalHash));
        state.record(failure(StepCode::ComputingLocalHash));
        // A mock network never upgrades a failed run.
        assert_eq!(state.resolve(NetworkClass::Mock), Verdict::Failure);
    }

    #[test]
    fn test_first_failure_is_execution_ordered() {
        let mut state = VerificationState::new(RunId::new());
        state.begin_run();
        state.record(starting(StepCode::ComputingLocalHash));
        state.record(failure(StepCode::ComputingLocalHash));
        state.record(starting(StepCode::ComparingHashes));
        state.record(failure(StepCode::ComparingHashes));
        assert_eq!(
            state.first_failure().unwrap().code,
            StepCode::ComputingLocalHash
        );
    }

    #[test]
    fn test_terminal_lookup() {
        let mut state = VerificationState::new(RunId::new());
        state.begin_run();
        state.record(starting(StepCode::CheckingFormat));
        assert!(state.terminal(StepCode::CheckingFormat).is_none());
        state.record(success(StepCode::CheckingFormat));
        assert!(state.step_succeeded(StepCode::CheckingFormat));
        assert!(!state.step_succeeded(StepCode::ComputingLocalHash));
    }

    #[test]
    #[should_panic(expected = "started twice")]
    fn test_double_start_panics() {
        let mut state = VerificationState::new(RunId::new());
        state.begin_run();
        state.record(starting(StepCode::CheckingFormat));
        state.record(starting(StepCode::CheckingFormat));
    }

    #[test]
    #[should_panic(expected = "terminated twice")]
    fn test_double_terminal_panics() {
        let mut state = VerificationState::new(RunId::new());
        state.begin_run();
        state.record(starting(StepCode::CheckingFormat));
        state.record(success(StepCode::CheckingFormat));
        state.record(failure(StepCode::CheckingFormat));
    }

    #[test]
    #[should_panic(expected = "terminated without starting")]
    fn test_terminal_without_start_panics() {
        let mut state = VerificationState::new(RunId::new());
        state.begin_run();
        state.record(success(StepCode::CheckingFormat));
    }

    #[test]
    fn test_final_may_terminate_without_starting() {
        // The summary notification has no starting transition.
        let mut state = VerificationState::new(RunId::new());
        state.begin_run();
        state.record(StepResult::new(StepCode::Final, "done", Status::Success));
        assert!(state.terminal(StepCode::Final).is_some());
    }
}
