//! Safe-mode attack simulation
//!
//! Drives a named attack scenario through one of three non-executing
//! evaluation modes. No path in this module submits a state-changing
//! transaction; the simulate path goes through a non-committing network
//! simulation endpoint behind the [`SimulationBackend`] trait.

pub mod rpc;

#[cfg(test)]
mod tests;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use solana_instruction::Instruction;

use crate::analyzer;
use crate::constants::is_expected_security_error;
use crate::errors::AuditorResult;
use crate::models::{CandidateTransaction, RiskAssessment, RiskLevel};
use crate::scenarios;

pub use self::rpc::RpcSimulationBackend;

/// Result of a dry-run or network simulation of one transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationOutcome {
    /// Error descriptor if the simulated execution failed
    pub err: Option<String>,
    /// Log lines emitted during simulation, in order
    pub logs: Vec<String>,
    /// Compute units consumed
    pub units_consumed: u64,
}

impl SimulationOutcome {
    /// Whether the simulated execution completed without error
    pub fn succeeded(&self) -> bool {
        self.err.is_none()
    }
}

/// Non-committing endpoint that evaluates a candidate transaction.
pub trait SimulationBackend {
    /// Submit the transaction for simulation and return the outcome.
    fn simulate(
        &self,
        transaction: &CandidateTransaction,
    ) -> impl std::future::Future<Output = AuditorResult<SimulationOutcome>> + Send;
}

/// Evaluation mode flags for the simulator.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Assess structurally without contacting any endpoint
    pub dry_run: bool,
    /// Dump the built instructions and stop
    pub log_only: bool,
    /// Evaluate through the simulation endpoint (real submission does not exist here)
    pub simulate_responses: bool,
    /// Emit per-step debug logging
    pub verbose_logging: bool,
    /// Append built instructions to the capture log
    pub capture_instructions: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            dry_run: true,
            log_only: false,
            simulate_responses: true,
            verbose_logging: false,
            capture_instructions: true,
        }
    }
}

/// Terminal status of an attack simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackStatus {
    /// Evaluated without network submission (dry-run and log-only paths)
    Simulated,
    /// The program rejected the transaction with an expected security error
    Blocked,
    /// Construction or simulation failed for another reason
    Failed,
    /// The simulation went through unblocked
    Success,
}

/// Outcome of [`SafeModeSimulator::simulate_attack`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackSimulationResult {
    /// Scenario name as supplied by the caller
    pub scenario: String,
    /// Terminal status
    pub status: AttackStatus,
    /// Whether the attack is predicted or observed to land
    pub would_succeed: bool,
    /// Risk level where the path derived one
    pub risk_level: Option<RiskLevel>,
    /// Structural assessment (dry-run path only)
    pub assessment: Option<RiskAssessment>,
    /// Why the simulation failed, if it did
    pub reason: Option<String>,
    /// Error the target program raised, if any
    pub expected_error: Option<String>,
    /// Simulation log lines (simulate path only)
    pub logs: Vec<String>,
    /// Compute units consumed (simulate path only)
    pub units_consumed: Option<u64>,
}

impl AttackSimulationResult {
    fn base(scenario: &str) -> Self {
        Self {
            scenario: scenario.to_string(),
            status: AttackStatus::Simulated,
            would_succeed: false,
            risk_level: None,
            assessment: None,
            reason: None,
            expected_error: None,
            logs: Vec::new(),
            units_consumed: None,
        }
    }
}

/// Caller-supplied overrides merged into the final result, last-write-wins.
#[derive(Debug, Clone, Default)]
pub struct ResultOverrides {
    pub status: Option<AttackStatus>,
    pub would_succeed: Option<bool>,
    pub risk_level: Option<RiskLevel>,
    pub reason: Option<String>,
    pub expected_error: Option<String>,
}

impl ResultOverrides {
    fn apply(self, mut result: AttackSimulationResult) -> AttackSimulationResult {
        if let Some(status) = self.status {
            result.status = status;
        }
        if let Some(would_succeed) = self.would_succeed {
            result.would_succeed = would_succeed;
        }
        if let Some(risk_level) = self.risk_level {
            result.risk_level = Some(risk_level);
        }
        if let Some(reason) = self.reason {
            result.reason = Some(reason);
        }
        if let Some(expected_error) = self.expected_error {
            result.expected_error = Some(expected_error);
        }
        result
    }
}

/// Orchestrates safe-mode evaluation of attack scenarios.
///
/// Path precedence per invocation is dry-run, then log-only, else simulate.
/// The captured-instruction list is process-scoped: append-only across
/// calls, never deduplicated, cleared only by [`clear_captured`].
///
/// [`clear_captured`]: SafeModeSimulator::clear_captured
pub struct SafeModeSimulator<B> {
    backend: B,
    config: SimulatorConfig,
    captured: Vec<Instruction>,
}

impl<B: SimulationBackend> SafeModeSimulator<B> {
    /// Create a simulator with the default (dry-run) configuration.
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, SimulatorConfig::default())
    }

    /// Create a simulator with an explicit configuration.
    pub fn with_config(backend: B, config: SimulatorConfig) -> Self {
        Self {
            backend,
            config,
            captured: Vec::new(),
        }
    }

    /// Instructions captured across all simulate calls so far, in append order.
    pub fn captured_instructions(&self) -> &[Instruction] {
        &self.captured
    }

    /// Clear the capture log.
    pub fn clear_captured(&mut self) {
        self.captured.clear();
    }

    /// Evaluate a named attack scenario.
    ///
    /// The builder assembles the candidate transaction; a builder failure is
    /// recovered locally and reported as a failed result, never propagated.
    pub async fn simulate_attack<F>(
        &mut self,
        scenario: &str,
        builder: F,
        overrides: ResultOverrides,
    ) -> AttackSimulationResult
    where
        F: FnOnce() -> anyhow::Result<CandidateTransaction>,
    {
        info!("Simulating attack scenario: {}", scenario);

        let transaction = match builder() {
            Ok(transaction) => transaction,
            Err(err) => {
                warn!("Attack builder for '{}' failed: {}", scenario, err);
                let mut result = AttackSimulationResult::base(scenario);
                result.status = AttackStatus::Failed;
                result.reason = Some(err.to_string());
                result.expected_error = Some(err.to_string());
                return overrides.apply(result);
            }
        };

        if self.config.capture_instructions {
            self.captured.extend(transaction.instructions.iter().cloned());
        }

        let result = if self.config.dry_run {
            self.dry_run(scenario, &transaction)
        } else if self.config.log_only {
            self.log_only(scenario, &transaction)
        } else {
            self.simulate(scenario, &transaction).await
        };

        overrides.apply(result)
    }

    /// Dry-run path: structural assessment plus the scenario prediction table.
    fn dry_run(
        &self,
        scenario: &str,
        transaction: &CandidateTransaction,
    ) -> AttackSimulationResult {
        let assessment = analyzer::assess(transaction);
        let required = scenarios::required_indicators_for(scenario);
        let predicted = required
            .iter()
            .all(|indicator| assessment.indicators.contains(indicator));

        if self.config.verbose_logging {
            debug!(
                "Dry run '{}': {} instruction(s), indicators {:?}, level {}, cost {}",
                scenario,
                transaction.instruction_count(),
                assessment.indicators,
                assessment.level,
                assessment.estimated_cost
            );
        }

        let mut result = AttackSimulationResult::base(scenario);
        result.would_succeed = predicted;
        result.risk_level = Some(assessment.level);
        result.assessment = Some(assessment);
        result
    }

    /// Log-only path: dump the instruction shapes as an observable side effect.
    fn log_only(
        &self,
        scenario: &str,
        transaction: &CandidateTransaction,
    ) -> AttackSimulationResult {
        for (index, instruction) in transaction.instructions.iter().enumerate() {
            info!(
                "[{}] instruction {}: program {}, {} account(s), {} payload byte(s)",
                scenario,
                index,
                instruction.program_id,
                instruction.accounts.len(),
                instruction.data.len()
            );
        }

        AttackSimulationResult::base(scenario)
    }

    /// Simulate path: run through the backend and classify the outcome.
    async fn simulate(
        &self,
        scenario: &str,
        transaction: &CandidateTransaction,
    ) -> AttackSimulationResult {
        let mut result = AttackSimulationResult::base(scenario);

        let outcome = match self.backend.simulate(transaction).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!("Simulation of '{}' failed: {}", scenario, err);
                result.status = AttackStatus::Failed;
                result.reason = Some(err.to_string());
                return result;
            }
        };

        result.logs = outcome.logs;
        result.units_consumed = Some(outcome.units_consumed);

        match outcome.err {
            Some(err) if is_expected_security_error(&err) => {
                // The program pushed back the way a defended program should.
                result.status = AttackStatus::Blocked;
                result.risk_level = Some(RiskLevel::Low);
                result.expected_error = Some(err);
            }
            Some(err) => {
                result.status = AttackStatus::Failed;
                result.reason = Some(err);
            }
            None => {
                // An unblocked state-changing simulation is the vulnerability
                // signal itself.
                result.status = AttackStatus::Success;
                result.would_succeed = true;
                result.risk_level = Some(RiskLevel::Critical);
            }
        }

        result
    }
}
