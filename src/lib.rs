//! Security auditing toolkit for Solana programs
//!
//! This crate provides structural risk assessment of candidate transactions,
//! a safe-mode attack simulator that never submits anything on-chain, and a
//! live monitor that classifies program logs and account activity into alerts.

pub mod analyzer;
pub mod constants;
pub mod errors;
pub mod models;
pub mod monitor;
pub mod scenarios;
pub mod simulator;
pub mod testenv;

use std::sync::Arc;

use anyhow::{anyhow, Result};
use solana_client::rpc_client::RpcClient;
use solana_pubkey::Pubkey;

use crate::models::CandidateTransaction;
use crate::scenarios::AttackScenario;
use crate::simulator::{
    AttackSimulationResult, ResultOverrides, RpcSimulationBackend, SafeModeSimulator,
    SimulatorConfig,
};
use crate::testenv::TestWallet;

/// Run one named attack scenario against a program.
///
/// Builds the scenario's probe transaction with an ephemeral wallet, runs it
/// through the safe-mode simulator under the given config, and returns the
/// classified result. Nothing is ever submitted to the cluster.
pub async fn run_attack_scenario(
    program_id: &Pubkey,
    rpc_url: &str,
    scenario_name: &str,
    config: SimulatorConfig,
) -> Result<AttackSimulationResult> {
    let scenario = AttackScenario::from_name(scenario_name)
        .ok_or_else(|| anyhow!("unknown attack scenario: {}", scenario_name))?;

    let wallet = TestWallet::ephemeral();
    let backend = RpcSimulationBackend::new(rpc_url)?;
    let mut simulator = SafeModeSimulator::with_config(backend, config);

    let program_id = *program_id;
    let payer = wallet.pubkey();
    let result = simulator
        .simulate_attack(
            scenario.name(),
            move || Ok(scenarios::probe_transaction(scenario, &program_id, &payer)),
            ResultOverrides::default(),
        )
        .await;

    Ok(result)
}

/// Assess a candidate transaction without touching the network.
pub fn assess_transaction(transaction: &CandidateTransaction) -> models::RiskAssessment {
    analyzer::assess(transaction)
}

/// Summarize the recent transaction history of a program.
pub async fn analyze_program_history(
    rpc_url: &str,
    program_id: &Pubkey,
    limit: usize,
) -> Result<monitor::HistoricalAnalysis> {
    let client = Arc::new(RpcClient::new(rpc_url.to_string()));
    let analysis = monitor::analyze_historical_transactions(&client, program_id, limit).await?;
    Ok(analysis)
}

/// Version of the security auditor
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
