//! Error handling for the security auditor.
//!
//! Failure paths in this crate degrade to reported statuses wherever
//! possible: a builder that fails to assemble an attack transaction becomes
//! a failed result, and subscription teardown problems are logged rather
//! than raised. The variants here cover the places where an error still has
//! to travel across a boundary (RPC calls, subscriptions, CLI plumbing).

use thiserror::Error;

/// Main error type for the security auditor.
#[derive(Error, Debug)]
pub enum AuditorError {
    /// Errors while assembling a candidate transaction.
    #[error("Transaction build error: {0}")]
    TransactionBuild(String),

    /// Errors from the network simulation endpoint.
    #[error("Simulation error: {0}")]
    Simulation(String),

    /// Errors while registering or tearing down a subscription.
    #[error("Subscription error: {0}")]
    Subscription(String),

    /// Errors from RPC communication, such as connection failures.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Errors related to file I/O.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Fallback for errors that don't fit into the above categories.
    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Result type alias for the security auditor.
pub type AuditorResult<T> = Result<T, AuditorError>;
