//! Risk indicators, levels, and assessments

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A structural risk signal detected on a candidate transaction.
///
/// These are purely structural heuristics over instruction shape; no payload
/// decoding is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskIndicator {
    /// An account is referenced as both writable and a required signer
    AdminOperation,
    /// Instruction payload exceeds the large-transfer size threshold
    LargeTransfer,
    /// Instruction references enough accounts to suggest cross-program calls
    CrossProgramInvocation,
}

impl fmt::Display for RiskIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RiskIndicator::AdminOperation => "admin-operation",
            RiskIndicator::LargeTransfer => "large-transfer",
            RiskIndicator::CrossProgramInvocation => "cross-program-invocation",
        };
        f.write_str(name)
    }
}

/// Ordinal risk level derived from the number of distinct indicator kinds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Map a distinct-indicator count to a level.
    ///
    /// 0 is low, 1 medium, 2 high, 3 or more critical. This table is relied
    /// on by downstream report consumers and must not drift.
    pub fn from_indicator_count(count: usize) -> Self {
        match count {
            0 => RiskLevel::Low,
            1 => RiskLevel::Medium,
            2 => RiskLevel::High,
            _ => RiskLevel::Critical,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        };
        f.write_str(name)
    }
}

/// Read-only risk view over a candidate transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Distinct indicator kinds that matched, in stable order
    pub indicators: BTreeSet<RiskIndicator>,
    /// Level derived from the indicator count
    pub level: RiskLevel,
    /// Estimated compute cost of submitting the transaction
    pub estimated_cost: u64,
}
