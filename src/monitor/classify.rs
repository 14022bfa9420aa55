//! Pattern tables for log and error classification
//!
//! The vocabulary here is shared by the live monitor and historical
//! analysis. Everything is table-driven and case-insensitive so the
//! classification can be audited and tested in isolation. These are
//! keyword heuristics over log text, not semantic vulnerability detection.

use once_cell::sync::Lazy;
use regex::Regex;

/// Suspicious-activity pattern matched against emitted log text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuspicionPattern {
    Overflow,
    Reentrancy,
    Unauthorized,
    DoubleSpend,
    ResourceExhaustion,
    MaliciousCode,
    PrivilegeBypass,
    Manipulation,
    InvalidNonce,
    ReplayAttack,
}

impl SuspicionPattern {
    /// All patterns, in table order.
    pub const ALL: &'static [SuspicionPattern] = &[
        SuspicionPattern::Overflow,
        SuspicionPattern::Reentrancy,
        SuspicionPattern::Unauthorized,
        SuspicionPattern::DoubleSpend,
        SuspicionPattern::ResourceExhaustion,
        SuspicionPattern::MaliciousCode,
        SuspicionPattern::PrivilegeBypass,
        SuspicionPattern::Manipulation,
        SuspicionPattern::InvalidNonce,
        SuspicionPattern::ReplayAttack,
    ];

    /// Stable pattern name used in alerts and reports.
    pub fn name(&self) -> &'static str {
        match self {
            SuspicionPattern::Overflow => "overflow",
            SuspicionPattern::Reentrancy => "reentrancy",
            SuspicionPattern::Unauthorized => "unauthorized",
            SuspicionPattern::DoubleSpend => "double-spend",
            SuspicionPattern::ResourceExhaustion => "resource-exhaustion",
            SuspicionPattern::MaliciousCode => "malicious-code",
            SuspicionPattern::PrivilegeBypass => "privilege-bypass",
            SuspicionPattern::Manipulation => "manipulation",
            SuspicionPattern::InvalidNonce => "invalid-nonce",
            SuspicionPattern::ReplayAttack => "replay-attack",
        }
    }

    fn regex(&self) -> &'static Regex {
        static TABLE: Lazy<Vec<Regex>> = Lazy::new(|| {
            [
                r"(?i)overflow|underflow",
                r"(?i)reentran",
                r"(?i)unauthorized|forbidden",
                r"(?i)double[\s_-]?spend",
                r"(?i)exhaustion|denial[\s_-]of[\s_-]service|\bdos\b",
                r"(?i)malicious|exploit",
                r"(?i)bypass|escalation",
                r"(?i)manipulat",
                r"(?i)invalid[\s_-]?nonce",
                r"(?i)replay[\s_-]?attack",
            ]
            .iter()
            .map(|pattern| Regex::new(pattern).unwrap())
            .collect()
        });
        &TABLE[*self as usize]
    }

    /// Whether this pattern matches the given text.
    pub fn matches(&self, text: &str) -> bool {
        self.regex().is_match(text)
    }
}

/// Patterns matching the given log text, in table order.
pub fn classify_log_text(text: &str) -> Vec<SuspicionPattern> {
    SuspicionPattern::ALL
        .iter()
        .copied()
        .filter(|pattern| pattern.matches(text))
        .collect()
}

/// Bucket for classifying program error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackPatternBucket {
    Overflow,
    Reentrancy,
    AccessControl,
    InputValidation,
}

impl AttackPatternBucket {
    /// Stable bucket name used as the stats counter key.
    pub fn name(&self) -> &'static str {
        match self {
            AttackPatternBucket::Overflow => "overflow",
            AttackPatternBucket::Reentrancy => "reentrancy",
            AttackPatternBucket::AccessControl => "access_control",
            AttackPatternBucket::InputValidation => "input_validation",
        }
    }
}

/// Classify an error descriptor into an attack-pattern bucket.
pub fn classify_error(error: &str) -> Option<AttackPatternBucket> {
    let lowered = error.to_lowercase();
    if lowered.contains("overflow") || lowered.contains("underflow") {
        Some(AttackPatternBucket::Overflow)
    } else if lowered.contains("reentran") {
        Some(AttackPatternBucket::Reentrancy)
    } else if lowered.contains("unauthorized")
        || lowered.contains("authority")
        || lowered.contains("signer")
        || lowered.contains("access")
    {
        Some(AttackPatternBucket::AccessControl)
    } else if lowered.contains("invalid") || lowered.contains("constraint") {
        Some(AttackPatternBucket::InputValidation)
    } else {
        None
    }
}

static AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:amount|lamports|value)\s*[:=]?\s*([0-9][0-9_,]*)").unwrap());

/// Extract transfer amounts mentioned in log text.
///
/// Matches `amount`/`lamports`/`value` followed by digits, tolerating
/// separator characters inside the number.
pub fn extract_amounts(text: &str) -> Vec<u64> {
    AMOUNT_RE
        .captures_iter(text)
        .filter_map(|captures| {
            let digits: String = captures[1]
                .chars()
                .filter(|c| c.is_ascii_digit())
                .collect();
            digits.parse().ok()
        })
        .collect()
}
