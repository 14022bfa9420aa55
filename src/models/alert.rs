//! Alerts and monitoring statistics

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use solana_pubkey::Pubkey;

/// What kind of observation raised an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertCategory {
    /// Log text matched the suspicion vocabulary
    Suspicious,
    /// A known attack keyword pattern matched
    Attack,
    /// Behavioral anomaly such as rapid account mutation
    Anomaly,
    /// A transfer above the high-value threshold
    HighValue,
}

/// Alert severity, ordered low to critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// An alert emitted when live monitoring classifies an observed event as
/// suspicious. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    /// Alert category
    pub category: AlertCategory,
    /// Alert severity
    pub severity: Severity,
    /// Program the observation originated from
    pub program_id: String,
    /// Unix timestamp in milliseconds at alert creation
    pub timestamp_ms: u64,
    /// Human-readable detail
    pub detail: String,
    /// Optional structured metadata for the reporting consumer
    pub metadata: Option<serde_json::Value>,
}

impl Alert {
    /// Create an alert stamped with the current time
    pub fn new(
        category: AlertCategory,
        severity: Severity,
        program_id: &Pubkey,
        detail: String,
    ) -> Self {
        Self {
            category,
            severity,
            program_id: program_id.to_string(),
            timestamp_ms: unix_millis(),
            detail,
            metadata: None,
        }
    }

    /// Attach structured metadata
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Process-lifetime counters for a monitoring session.
///
/// Mutated only by the live monitor on each observed event; reset on monitor
/// restart. Snapshots are cloned out to consumers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitoringStats {
    /// All observed events (log and account-change)
    pub total_events: u64,
    /// Events that produced at least one alert
    pub suspicious_events: u64,
    /// Alerts emitted in total
    pub alerts_generated: u64,
    /// Observed event count per program
    pub program_activity: HashMap<String, u64>,
    /// Error-classification counts per attack-pattern bucket
    pub attack_patterns: HashMap<String, u64>,
}

impl MonitoringStats {
    /// Record activity for a program
    pub fn record_program_activity(&mut self, program_id: &Pubkey) {
        *self
            .program_activity
            .entry(program_id.to_string())
            .or_insert(0) += 1;
    }

    /// Record a classified attack-pattern bucket
    pub fn record_attack_pattern(&mut self, bucket: &str) {
        *self.attack_patterns.entry(bucket.to_string()).or_insert(0) += 1;
    }
}

/// Current unix time in milliseconds.
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
