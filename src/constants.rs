//! Fixed tables and tuning constants for risk scoring and monitoring.
//!
//! Classification in this crate is deliberately table-driven: the decision
//! tables live here and in `monitor::classify` so they can be audited and
//! tested in isolation instead of being scattered through the logic.

/// Compute-cost estimate charged per instruction in a risk assessment.
pub const COST_PER_INSTRUCTION: u64 = 5_000;

/// Compute-cost estimate charged per distinct risk indicator kind.
pub const COST_PER_INDICATOR: u64 = 2_000;

/// Payload sizes above this many bytes flag an instruction as a large transfer.
pub const LARGE_TRANSFER_PAYLOAD_BYTES: usize = 32;

/// Instructions referencing more than this many accounts flag cross-program invocation.
pub const CPI_ACCOUNT_THRESHOLD: usize = 3;

/// Transfers above this many base units raise a high-value alert.
pub const HIGH_VALUE_THRESHOLD: u64 = 1_000_000_000;

/// Sliding window for rapid account-update detection, in milliseconds.
pub const RAPID_UPDATE_WINDOW_MS: u64 = 10_000;

/// More than this many updates inside the window is an anomaly.
pub const RAPID_UPDATE_THRESHOLD: usize = 5;

/// Period of the monitor's stats-reporting timer, in seconds.
pub const STATS_INTERVAL_SECS: u64 = 30;

/// Error substrings that indicate a program rejected an attack as designed.
///
/// A simulated attack whose error matches one of these is classified as
/// blocked rather than failed. Matching is case-insensitive.
pub const EXPECTED_SECURITY_ERRORS: &[&str] = &[
    "unauthorized",
    "access denied",
    "invalid authority",
    "program failed",
    "custom program error",
];

/// Check whether an error string matches the expected-security-error table.
pub fn is_expected_security_error(error: &str) -> bool {
    let lowered = error.to_lowercase();
    EXPECTED_SECURITY_ERRORS
        .iter()
        .any(|needle| lowered.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_security_errors_match_case_insensitively() {
        assert!(is_expected_security_error("Error: UNAUTHORIZED signer"));
        assert!(is_expected_security_error("custom program error: 0x1771"));
        assert!(is_expected_security_error("Access Denied by guard"));
        assert!(!is_expected_security_error("account not found"));
    }
}
