use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::Pubkey;

use crate::errors::AuditorError;
use crate::models::RiskIndicator;

enum CannedResponse {
    Outcome(SimulationOutcome),
    Transport(String),
}

struct MockBackend {
    calls: AtomicUsize,
    response: CannedResponse,
}

impl MockBackend {
    fn with_outcome(outcome: SimulationOutcome) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            response: CannedResponse::Outcome(outcome),
        }
    }

    fn unreachable() -> Self {
        Self::with_outcome(SimulationOutcome::default())
    }

    fn failing(message: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            response: CannedResponse::Transport(message.to_string()),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SimulationBackend for MockBackend {
    async fn simulate(
        &self,
        _transaction: &CandidateTransaction,
    ) -> crate::errors::AuditorResult<SimulationOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            CannedResponse::Outcome(outcome) => Ok(outcome.clone()),
            CannedResponse::Transport(message) => Err(AuditorError::Rpc(message.clone())),
        }
    }
}

fn overflow_shaped_transaction() -> CandidateTransaction {
    CandidateTransaction::new().with_instruction(Instruction {
        program_id: Pubkey::new_unique(),
        accounts: vec![AccountMeta::new_readonly(Pubkey::new_unique(), true)],
        data: vec![0xFF; 40],
    })
}

fn small_transaction() -> CandidateTransaction {
    CandidateTransaction::new().with_instruction(Instruction {
        program_id: Pubkey::new_unique(),
        accounts: vec![AccountMeta::new_readonly(Pubkey::new_unique(), true)],
        data: vec![0x01; 8],
    })
}

fn simulate_config() -> SimulatorConfig {
    SimulatorConfig {
        dry_run: false,
        log_only: false,
        ..SimulatorConfig::default()
    }
}

#[tokio::test]
async fn dry_run_never_contacts_backend_and_captures_instructions() {
    let mut simulator = SafeModeSimulator::new(MockBackend::unreachable());

    let result = simulator
        .simulate_attack(
            "overflow",
            || Ok(overflow_shaped_transaction()),
            ResultOverrides::default(),
        )
        .await;

    assert_eq!(result.status, AttackStatus::Simulated);
    assert!(result.logs.is_empty());
    assert!(result.units_consumed.is_none());
    assert_eq!(simulator.captured_instructions().len(), 1);
    assert_eq!(simulator.backend.call_count(), 0);
}

#[tokio::test]
async fn overflow_prediction_tracks_payload_size() {
    let mut simulator = SafeModeSimulator::new(MockBackend::unreachable());

    let hit = simulator
        .simulate_attack(
            "overflow",
            || Ok(overflow_shaped_transaction()),
            ResultOverrides::default(),
        )
        .await;
    assert!(hit.would_succeed);

    let miss = simulator
        .simulate_attack(
            "overflow",
            || Ok(small_transaction()),
            ResultOverrides::default(),
        )
        .await;
    assert!(!miss.would_succeed);
}

#[tokio::test]
async fn unknown_scenario_is_trivially_predicted_true() {
    let mut simulator = SafeModeSimulator::new(MockBackend::unreachable());

    let result = simulator
        .simulate_attack(
            "flash_loan",
            || Ok(small_transaction()),
            ResultOverrides::default(),
        )
        .await;

    assert_eq!(result.status, AttackStatus::Simulated);
    assert!(result.would_succeed);
}

#[tokio::test]
async fn dry_run_embeds_the_assessment() {
    let mut simulator = SafeModeSimulator::new(MockBackend::unreachable());

    let result = simulator
        .simulate_attack(
            "overflow",
            || Ok(overflow_shaped_transaction()),
            ResultOverrides::default(),
        )
        .await;

    let assessment = result.assessment.expect("dry run carries an assessment");
    assert!(assessment.indicators.contains(&RiskIndicator::LargeTransfer));
    assert_eq!(result.risk_level, Some(assessment.level));
}

#[tokio::test]
async fn log_only_reports_simulated_and_never_succeeds() {
    let config = SimulatorConfig {
        dry_run: false,
        log_only: true,
        ..SimulatorConfig::default()
    };
    let mut simulator = SafeModeSimulator::with_config(MockBackend::unreachable(), config);

    let result = simulator
        .simulate_attack(
            "overflow",
            || Ok(overflow_shaped_transaction()),
            ResultOverrides::default(),
        )
        .await;

    assert_eq!(result.status, AttackStatus::Simulated);
    assert!(!result.would_succeed);
    assert_eq!(simulator.backend.call_count(), 0);
}

#[tokio::test]
async fn security_errors_classify_as_blocked() {
    let backend = MockBackend::with_outcome(SimulationOutcome {
        err: Some("custom program error: 0x1771 Unauthorized".to_string()),
        logs: vec!["Program log: guard tripped".to_string()],
        units_consumed: 1_200,
    });
    let mut simulator = SafeModeSimulator::with_config(backend, simulate_config());

    let result = simulator
        .simulate_attack(
            "unauthorized_admin",
            || Ok(small_transaction()),
            ResultOverrides::default(),
        )
        .await;

    assert_eq!(result.status, AttackStatus::Blocked);
    assert!(!result.would_succeed);
    assert_eq!(result.risk_level, Some(RiskLevel::Low));
    assert!(result.expected_error.unwrap().contains("Unauthorized"));
    assert_eq!(result.units_consumed, Some(1_200));
}

#[tokio::test]
async fn unrecognized_errors_classify_as_failed() {
    let backend = MockBackend::with_outcome(SimulationOutcome {
        err: Some("BlockhashNotFound".to_string()),
        logs: Vec::new(),
        units_consumed: 0,
    });
    let mut simulator = SafeModeSimulator::with_config(backend, simulate_config());

    let result = simulator
        .simulate_attack(
            "overflow",
            || Ok(small_transaction()),
            ResultOverrides::default(),
        )
        .await;

    assert_eq!(result.status, AttackStatus::Failed);
    assert!(!result.would_succeed);
    assert_eq!(result.reason.as_deref(), Some("BlockhashNotFound"));
}

#[tokio::test]
async fn clean_simulation_is_the_vulnerability_signal() {
    let backend = MockBackend::with_outcome(SimulationOutcome {
        err: None,
        logs: vec!["Program log: success".to_string()],
        units_consumed: 5_000,
    });
    let mut simulator = SafeModeSimulator::with_config(backend, simulate_config());

    let result = simulator
        .simulate_attack(
            "overflow",
            || Ok(small_transaction()),
            ResultOverrides::default(),
        )
        .await;

    assert_eq!(result.status, AttackStatus::Success);
    assert!(result.would_succeed);
    assert_eq!(result.risk_level, Some(RiskLevel::Critical));
}

#[tokio::test]
async fn transport_failures_fold_into_failed_status() {
    let mut simulator =
        SafeModeSimulator::with_config(MockBackend::failing("connection refused"), simulate_config());

    let result = simulator
        .simulate_attack(
            "overflow",
            || Ok(small_transaction()),
            ResultOverrides::default(),
        )
        .await;

    assert_eq!(result.status, AttackStatus::Failed);
    assert!(result.reason.unwrap().contains("connection refused"));
}

#[tokio::test]
async fn builder_failure_is_recovered_locally() {
    let mut simulator = SafeModeSimulator::new(MockBackend::unreachable());

    let result = simulator
        .simulate_attack(
            "overflow",
            || Err(anyhow::anyhow!("missing vault account")),
            ResultOverrides::default(),
        )
        .await;

    assert_eq!(result.status, AttackStatus::Failed);
    assert!(!result.would_succeed);
    assert!(result.reason.as_deref().unwrap().contains("missing vault account"));
    assert_eq!(result.reason, result.expected_error);
    assert!(simulator.captured_instructions().is_empty());
}

#[tokio::test]
async fn overrides_win_over_computed_fields() {
    let mut simulator = SafeModeSimulator::new(MockBackend::unreachable());

    let overrides = ResultOverrides {
        status: Some(AttackStatus::Blocked),
        would_succeed: Some(false),
        risk_level: Some(RiskLevel::Critical),
        reason: Some("caller-supplied".to_string()),
        expected_error: None,
    };

    let result = simulator
        .simulate_attack("overflow", || Ok(overflow_shaped_transaction()), overrides)
        .await;

    assert_eq!(result.status, AttackStatus::Blocked);
    assert!(!result.would_succeed);
    assert_eq!(result.risk_level, Some(RiskLevel::Critical));
    assert_eq!(result.reason.as_deref(), Some("caller-supplied"));
}

#[tokio::test]
async fn capture_log_appends_across_calls_and_clears_explicitly() {
    let mut simulator = SafeModeSimulator::new(MockBackend::unreachable());

    for _ in 0..3 {
        simulator
            .simulate_attack(
                "overflow",
                || Ok(overflow_shaped_transaction()),
                ResultOverrides::default(),
            )
            .await;
    }
    assert_eq!(simulator.captured_instructions().len(), 3);

    simulator.clear_captured();
    assert!(simulator.captured_instructions().is_empty());
}

#[tokio::test]
async fn capture_can_be_disabled() {
    let config = SimulatorConfig {
        capture_instructions: false,
        ..SimulatorConfig::default()
    };
    let mut simulator = SafeModeSimulator::with_config(MockBackend::unreachable(), config);

    simulator
        .simulate_attack(
            "overflow",
            || Ok(overflow_shaped_transaction()),
            ResultOverrides::default(),
        )
        .await;

    assert!(simulator.captured_instructions().is_empty());
}
