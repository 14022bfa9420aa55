//! Structural risk analysis for candidate transactions
//!
//! The analyzer never decodes instruction payloads; it scores a transaction
//! purely from instruction shape (account flags, account counts, payload
//! sizes). It is deterministic, performs no I/O, and cannot fail.

#[cfg(test)]
mod tests;

use std::collections::BTreeSet;

use solana_instruction::Instruction;

use crate::constants::{
    COST_PER_INDICATOR, COST_PER_INSTRUCTION, CPI_ACCOUNT_THRESHOLD, LARGE_TRANSFER_PAYLOAD_BYTES,
};
use crate::models::{CandidateTransaction, RiskAssessment, RiskIndicator, RiskLevel};

/// Assess the structural risk of a candidate transaction.
///
/// Each indicator kind contributes at most once to the level regardless of
/// how many instructions triggered it. An empty transaction assesses as low
/// risk with zero cost.
pub fn assess(transaction: &CandidateTransaction) -> RiskAssessment {
    let mut indicators = BTreeSet::new();
    for instruction in &transaction.instructions {
        indicators.extend(indicators_for(instruction));
    }

    let estimated_cost = transaction.instructions.len() as u64 * COST_PER_INSTRUCTION
        + indicators.len() as u64 * COST_PER_INDICATOR;

    RiskAssessment {
        level: RiskLevel::from_indicator_count(indicators.len()),
        estimated_cost,
        indicators,
    }
}

/// Indicators matched by a single instruction.
pub fn indicators_for(instruction: &Instruction) -> BTreeSet<RiskIndicator> {
    let mut matched = BTreeSet::new();

    if instruction
        .accounts
        .iter()
        .any(|meta| meta.is_writable && meta.is_signer)
    {
        matched.insert(RiskIndicator::AdminOperation);
    }

    if instruction.data.len() > LARGE_TRANSFER_PAYLOAD_BYTES {
        matched.insert(RiskIndicator::LargeTransfer);
    }

    if instruction.accounts.len() > CPI_ACCOUNT_THRESHOLD {
        matched.insert(RiskIndicator::CrossProgramInvocation);
    }

    matched
}
