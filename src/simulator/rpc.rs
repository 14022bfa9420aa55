//! JSON-RPC simulation backend
//!
//! Talks to a Solana RPC node's `simulateTransaction` method directly over
//! HTTP. Signature verification is disabled in the request so candidates
//! whose signer set cannot be satisfied locally still simulate.

use std::time::Duration;

use log::debug;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use solana_hash::Hash;
use solana_keypair::Keypair;
use solana_message::Message;
use solana_signer::Signer;
use solana_transaction::Transaction;

use crate::errors::{AuditorError, AuditorResult};
use crate::models::CandidateTransaction;

use super::{SimulationBackend, SimulationOutcome};

/// RPC response for simulateTransaction
#[derive(Debug, Deserialize)]
struct SimulateResponse {
    result: SimulateResult,
}

#[derive(Debug, Deserialize)]
struct SimulateResult {
    value: SimulateValue,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SimulateValue {
    err: Option<Value>,
    logs: Option<Vec<String>>,
    units_consumed: Option<u64>,
}

/// Simulation backend over a Solana JSON-RPC endpoint.
pub struct RpcSimulationBackend {
    client: Client,
    rpc_url: String,
    /// Throwaway fee payer for simulated transactions
    payer: Keypair,
}

impl RpcSimulationBackend {
    /// Create a backend against the given RPC URL.
    pub fn new(rpc_url: &str) -> AuditorResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AuditorError::Rpc(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            rpc_url: rpc_url.to_string(),
            payer: Keypair::new(),
        })
    }

    /// Fetch the latest blockhash for transaction assembly.
    async fn latest_blockhash(&self) -> AuditorResult<Hash> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getLatestBlockhash",
            "params": [{"commitment": "confirmed"}]
        });

        let response: Value = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AuditorError::Rpc(format!("getLatestBlockhash request failed: {}", e)))?
            .json()
            .await
            .map_err(|e| AuditorError::Rpc(format!("getLatestBlockhash decode failed: {}", e)))?;

        let blockhash = response["result"]["value"]["blockhash"]
            .as_str()
            .ok_or_else(|| AuditorError::Rpc("missing blockhash in response".to_string()))?;

        let decoded = bs58::decode(blockhash)
            .into_vec()
            .map_err(|e| AuditorError::Rpc(format!("failed to decode blockhash: {}", e)))?;

        let bytes: [u8; 32] = decoded
            .as_slice()
            .try_into()
            .map_err(|_| AuditorError::Rpc("blockhash has unexpected length".to_string()))?;

        Ok(Hash::new_from_array(bytes))
    }
}

impl SimulationBackend for RpcSimulationBackend {
    async fn simulate(
        &self,
        transaction: &CandidateTransaction,
    ) -> AuditorResult<SimulationOutcome> {
        if transaction.instructions.is_empty() {
            return Err(AuditorError::Simulation(
                "candidate transaction has no instructions".to_string(),
            ));
        }

        let message = Message::new(&transaction.instructions, Some(&self.payer.pubkey()));
        let mut tx = Transaction::new_unsigned(message);

        let blockhash = self.latest_blockhash().await?;
        tx.partial_sign(&[&self.payer], blockhash);

        let serialized = bincode::serialize(&tx)
            .map_err(|e| AuditorError::Simulation(format!("failed to serialize: {}", e)))?;
        let encoded = bs58::encode(serialized).into_string();

        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "simulateTransaction",
            "params": [
                encoded,
                {
                    "sigVerify": false,
                    "commitment": "confirmed"
                }
            ]
        });

        debug!(
            "Submitting {} instruction(s) to {} for simulation",
            transaction.instruction_count(),
            self.rpc_url
        );

        let response: SimulateResponse = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AuditorError::Rpc(format!("simulateTransaction request failed: {}", e)))?
            .json()
            .await
            .map_err(|e| AuditorError::Rpc(format!("simulateTransaction decode failed: {}", e)))?;

        let value = response.result.value;
        Ok(SimulationOutcome {
            err: value.err.map(|err| match err {
                Value::String(text) => text,
                other => other.to_string(),
            }),
            logs: value.logs.unwrap_or_default(),
            units_consumed: value.units_consumed.unwrap_or(0),
        })
    }
}
