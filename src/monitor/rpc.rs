//! RPC-backed event source and historical transaction analysis
//!
//! The polling source approximates push subscriptions over plain HTTP RPC:
//! one task per subscription tails new signatures (logs) or fingerprints
//! program-owned account data (account changes) and forwards events into
//! the monitor's channel.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use log::warn;
use serde::Serialize;
use sha2::{Digest, Sha256};
use solana_account::Account;
use solana_client::rpc_client::{GetConfirmedSignaturesForAddress2Config, RpcClient};
use solana_pubkey::Pubkey;
use solana_signature::Signature;
use solana_transaction_status::option_serializer::OptionSerializer;
use solana_transaction_status::UiTransactionEncoding;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::errors::{AuditorError, AuditorResult};
use crate::models::alert::unix_millis;

use super::classify::classify_log_text;
use super::{AccountChangeEvent, EventSource, MonitorEvent, ProgramLogEvent, SubscriptionId};

const SIGNATURE_BATCH_LIMIT: usize = 25;

/// Event source that polls a Solana RPC endpoint.
pub struct PollingEventSource {
    client: Arc<RpcClient>,
    poll_interval: Duration,
    next_id: SubscriptionId,
    tasks: HashMap<SubscriptionId, JoinHandle<()>>,
}

impl PollingEventSource {
    /// Create a source polling every five seconds.
    pub fn new(client: Arc<RpcClient>) -> Self {
        Self::with_poll_interval(client, Duration::from_secs(5))
    }

    /// Create a source with an explicit poll interval.
    pub fn with_poll_interval(client: Arc<RpcClient>, poll_interval: Duration) -> Self {
        Self {
            client,
            poll_interval,
            next_id: 0,
            tasks: HashMap::new(),
        }
    }

    fn register(&mut self, handle: JoinHandle<()>) -> SubscriptionId {
        self.next_id += 1;
        self.tasks.insert(self.next_id, handle);
        self.next_id
    }
}

impl Drop for PollingEventSource {
    fn drop(&mut self) {
        for handle in self.tasks.values() {
            handle.abort();
        }
    }
}

impl EventSource for PollingEventSource {
    fn subscribe_logs(
        &mut self,
        program_id: &Pubkey,
        events: UnboundedSender<MonitorEvent>,
    ) -> AuditorResult<SubscriptionId> {
        let handle = spawn_log_poller(
            Arc::clone(&self.client),
            *program_id,
            events,
            self.poll_interval,
        );
        Ok(self.register(handle))
    }

    fn subscribe_account_changes(
        &mut self,
        program_id: &Pubkey,
        events: UnboundedSender<MonitorEvent>,
    ) -> AuditorResult<SubscriptionId> {
        let handle = spawn_account_poller(
            Arc::clone(&self.client),
            *program_id,
            events,
            self.poll_interval,
        );
        Ok(self.register(handle))
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> AuditorResult<()> {
        match self.tasks.remove(&id) {
            Some(handle) => {
                handle.abort();
                Ok(())
            }
            None => Err(AuditorError::Subscription(format!(
                "unknown subscription id {}",
                id
            ))),
        }
    }
}

/// Tail new transaction signatures for a program and forward their logs.
fn spawn_log_poller(
    client: Arc<RpcClient>,
    program_id: Pubkey,
    events: UnboundedSender<MonitorEvent>,
    poll_interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut last_seen: Option<Signature> = None;
        let mut ticker = tokio::time::interval(poll_interval);

        loop {
            ticker.tick().await;

            let batch = {
                let client = Arc::clone(&client);
                let until = last_seen;
                tokio::task::spawn_blocking(move || {
                    client.get_signatures_for_address_with_config(
                        &program_id,
                        GetConfirmedSignaturesForAddress2Config {
                            before: None,
                            until,
                            limit: Some(SIGNATURE_BATCH_LIMIT),
                            commitment: None,
                        },
                    )
                })
                .await
            };

            let records = match batch {
                Ok(Ok(records)) => records,
                Ok(Err(err)) => {
                    warn!("Signature poll for {} failed: {}", program_id, err);
                    continue;
                }
                Err(err) => {
                    warn!("Signature poll task for {} panicked: {}", program_id, err);
                    continue;
                }
            };

            if records.is_empty() {
                continue;
            }
            if let Ok(signature) = Signature::from_str(&records[0].signature) {
                last_seen = Some(signature);
            }

            // Oldest first, so downstream sees submission order.
            for record in records.iter().rev() {
                let Ok(signature) = Signature::from_str(&record.signature) else {
                    continue;
                };

                let fetched = {
                    let client = Arc::clone(&client);
                    tokio::task::spawn_blocking(move || {
                        client.get_transaction(&signature, UiTransactionEncoding::Json)
                    })
                    .await
                };

                let logs = match fetched {
                    Ok(Ok(tx)) => match tx.transaction.meta {
                        Some(meta) => match meta.log_messages {
                            OptionSerializer::Some(lines) => lines,
                            _ => Vec::new(),
                        },
                        None => Vec::new(),
                    },
                    _ => Vec::new(),
                };

                let event = ProgramLogEvent {
                    program_id,
                    signature: record.signature.clone(),
                    logs,
                    err: record.err.as_ref().map(|err| format!("{:?}", err)),
                };
                if events.send(MonitorEvent::Logs(event)).is_err() {
                    return;
                }
            }
        }
    })
}

/// Fingerprint program-owned accounts and forward changes.
fn spawn_account_poller(
    client: Arc<RpcClient>,
    program_id: Pubkey,
    events: UnboundedSender<MonitorEvent>,
    poll_interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut fingerprints: HashMap<Pubkey, [u8; 32]> = HashMap::new();
        let mut ticker = tokio::time::interval(poll_interval);

        loop {
            ticker.tick().await;

            let fetched = {
                let client = Arc::clone(&client);
                tokio::task::spawn_blocking(move || {
                    let slot = client.get_slot().unwrap_or(0);
                    client
                        .get_program_accounts(&program_id)
                        .map(|accounts| (slot, accounts))
                })
                .await
            };

            let (slot, accounts): (u64, Vec<(Pubkey, Account)>) = match fetched {
                Ok(Ok(pair)) => pair,
                Ok(Err(err)) => {
                    warn!("Account poll for {} failed: {}", program_id, err);
                    continue;
                }
                Err(err) => {
                    warn!("Account poll task for {} panicked: {}", program_id, err);
                    continue;
                }
            };

            for (account, data) in accounts {
                let mut hasher = Sha256::new();
                hasher.update(&data.data);
                hasher.update(data.lamports.to_le_bytes());
                let digest: [u8; 32] = hasher.finalize().into();

                let changed = fingerprints
                    .insert(account, digest)
                    .map(|previous| previous != digest)
                    .unwrap_or(false);

                if changed {
                    let event = AccountChangeEvent {
                        program_id,
                        account,
                        slot,
                        observed_at_ms: unix_millis(),
                    };
                    if events.send(MonitorEvent::AccountChange(event)).is_err() {
                        return;
                    }
                }
            }
        }
    })
}

/// One historical signature entry for a program.
#[derive(Debug, Clone)]
pub struct SignatureRecord {
    pub signature: String,
    pub slot: u64,
    pub err: Option<String>,
    pub block_time: Option<i64>,
}

/// Summary of a historical signature scan.
#[derive(Debug, Clone, Serialize)]
pub struct HistoricalAnalysis {
    /// Signatures examined
    pub scanned: usize,
    /// How many carried an error
    pub error_count: usize,
    /// Distinct matched pattern names across erroring entries, first-seen order
    pub patterns: Vec<String>,
}

/// Fetch up to `limit` most recent signature records for a program.
pub async fn recent_signatures(
    client: &Arc<RpcClient>,
    program_id: &Pubkey,
    limit: usize,
) -> AuditorResult<Vec<SignatureRecord>> {
    let client = Arc::clone(client);
    let program_id = *program_id;

    let records = tokio::task::spawn_blocking(move || {
        client.get_signatures_for_address_with_config(
            &program_id,
            GetConfirmedSignaturesForAddress2Config {
                before: None,
                until: None,
                limit: Some(limit),
                commitment: None,
            },
        )
    })
    .await
    .map_err(|err| AuditorError::Rpc(format!("signature query task panicked: {}", err)))?
    .map_err(|err| AuditorError::Rpc(err.to_string()))?;

    Ok(records
        .into_iter()
        .map(|record| SignatureRecord {
            signature: record.signature,
            slot: record.slot,
            err: record.err.map(|err| format!("{:?}", err)),
            block_time: record.block_time,
        })
        .collect())
}

/// Summarize error counts and matched patterns over signature records.
pub fn summarize_history(records: &[SignatureRecord]) -> HistoricalAnalysis {
    let mut patterns: Vec<String> = Vec::new();
    let mut error_count = 0;

    for record in records {
        let Some(err) = &record.err else { continue };
        error_count += 1;
        for pattern in classify_log_text(err) {
            let name = pattern.name().to_string();
            if !patterns.contains(&name) {
                patterns.push(name);
            }
        }
    }

    HistoricalAnalysis {
        scanned: records.len(),
        error_count,
        patterns,
    }
}

/// Fetch and summarize the most recent transactions of a program.
pub async fn analyze_historical_transactions(
    client: &Arc<RpcClient>,
    program_id: &Pubkey,
    limit: usize,
) -> AuditorResult<HistoricalAnalysis> {
    let records = recent_signatures(client, program_id, limit).await?;
    Ok(summarize_history(&records))
}
