//! Named attack scenarios and their probe transactions
//!
//! Each scenario maps to the set of risk indicators a transaction must
//! exhibit for a dry run to predict it would land. The table is fixed;
//! report consumers key off these names.

use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::Pubkey;

use crate::models::{CandidateTransaction, RiskIndicator};

/// A recognized attack scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackScenario {
    UnauthorizedAdmin,
    Overflow,
    Reentrancy,
    DoubleSpending,
}

impl AttackScenario {
    /// All known scenarios.
    pub const ALL: &'static [AttackScenario] = &[
        AttackScenario::UnauthorizedAdmin,
        AttackScenario::Overflow,
        AttackScenario::Reentrancy,
        AttackScenario::DoubleSpending,
    ];

    /// Look up a scenario by name, case-insensitively.
    ///
    /// Unknown names return `None`; the simulator treats that as an empty
    /// requirement set.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "unauthorized_admin" => Some(AttackScenario::UnauthorizedAdmin),
            "overflow" => Some(AttackScenario::Overflow),
            "reentrancy" => Some(AttackScenario::Reentrancy),
            "double_spending" => Some(AttackScenario::DoubleSpending),
            _ => None,
        }
    }

    /// Canonical scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            AttackScenario::UnauthorizedAdmin => "unauthorized_admin",
            AttackScenario::Overflow => "overflow",
            AttackScenario::Reentrancy => "reentrancy",
            AttackScenario::DoubleSpending => "double_spending",
        }
    }

    /// Indicators a transaction must exhibit for this scenario to be
    /// predicted successful in a dry run.
    pub fn required_indicators(&self) -> &'static [RiskIndicator] {
        match self {
            AttackScenario::UnauthorizedAdmin => &[RiskIndicator::AdminOperation],
            AttackScenario::Overflow => &[RiskIndicator::LargeTransfer],
            AttackScenario::Reentrancy => &[RiskIndicator::CrossProgramInvocation],
            AttackScenario::DoubleSpending => &[
                RiskIndicator::LargeTransfer,
                RiskIndicator::CrossProgramInvocation,
            ],
        }
    }
}

/// Required indicators for a scenario name, tolerating unknown names.
pub fn required_indicators_for(name: &str) -> &'static [RiskIndicator] {
    AttackScenario::from_name(name)
        .map(|scenario| scenario.required_indicators())
        .unwrap_or(&[])
}

/// Build a candidate transaction structurally shaped to trip the scenario's
/// indicator set against the target program.
///
/// The payloads are placeholder bytes; the point is the structural shape
/// (account flags, account counts, payload sizes), not decodable semantics.
pub fn probe_transaction(
    scenario: AttackScenario,
    program_id: &Pubkey,
    payer: &Pubkey,
) -> CandidateTransaction {
    let instruction = match scenario {
        // Writable + signer authority account
        AttackScenario::UnauthorizedAdmin => Instruction {
            program_id: *program_id,
            accounts: vec![
                AccountMeta::new(*payer, true),
                AccountMeta::new_readonly(Pubkey::new_unique(), false),
            ],
            data: vec![0xFF; 8],
        },
        // Payload past the large-transfer threshold, boundary-breaking values
        AttackScenario::Overflow => Instruction {
            program_id: *program_id,
            accounts: vec![
                AccountMeta::new_readonly(*payer, true),
                AccountMeta::new(Pubkey::new_unique(), false),
            ],
            data: u64::MAX.to_le_bytes().repeat(5),
        },
        // Account fan-out past the cross-program threshold
        AttackScenario::Reentrancy => Instruction {
            program_id: *program_id,
            accounts: reentrant_account_set(payer),
            data: vec![0x01; 8],
        },
        // Both the large payload and the account fan-out
        AttackScenario::DoubleSpending => Instruction {
            program_id: *program_id,
            accounts: reentrant_account_set(payer),
            data: u64::MAX.to_le_bytes().repeat(5),
        },
    };

    CandidateTransaction::new().with_instruction(instruction)
}

fn reentrant_account_set(payer: &Pubkey) -> Vec<AccountMeta> {
    let mut accounts = vec![AccountMeta::new_readonly(*payer, true)];
    for _ in 0..4 {
        accounts.push(AccountMeta::new(Pubkey::new_unique(), false));
    }
    accounts
}
