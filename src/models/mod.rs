//! Data models for risk assessment, attack simulation, and monitoring

pub mod alert;
pub mod assessment;
pub mod transaction;

#[cfg(test)]
mod tests;

pub use self::alert::{Alert, AlertCategory, MonitoringStats, Severity};
pub use self::assessment::{RiskAssessment, RiskIndicator, RiskLevel};
pub use self::transaction::CandidateTransaction;
