//! Ephemeral test identities for attack scenarios
//!
//! Probe transactions need throwaway wallets that never carry real value.
//! Funding is only required when a simulation endpoint enforces fee-payer
//! balances, so it is a separate, explicitly-networked step.

use std::sync::Arc;

use anyhow::{Context, Result};
use solana_client::rpc_client::RpcClient;
use solana_keypair::Keypair;
use solana_pubkey::Pubkey;
use solana_signer::Signer;

/// A throwaway wallet for driving test scenarios.
pub struct TestWallet {
    keypair: Keypair,
}

impl TestWallet {
    /// Generate a fresh, unfunded wallet.
    pub fn ephemeral() -> Self {
        Self {
            keypair: Keypair::new(),
        }
    }

    /// The wallet's public key.
    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    /// Borrow the underlying keypair for signing.
    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }
}

/// Request an airdrop for a test wallet on clusters that support it.
///
/// Returns the airdrop signature as a string. Mainnet endpoints reject
/// airdrops; callers on devnet/localnet only.
pub async fn fund_wallet(
    client: &Arc<RpcClient>,
    wallet: &TestWallet,
    lamports: u64,
) -> Result<String> {
    let client = Arc::clone(client);
    let pubkey = wallet.pubkey();
    let signature = tokio::task::spawn_blocking(move || client.request_airdrop(&pubkey, lamports))
        .await
        .context("airdrop task panicked")?
        .with_context(|| format!("airdrop of {} lamports to {} failed", lamports, pubkey))?;

    log::info!("Funded test wallet {} with {} lamports", pubkey, lamports);
    Ok(signature.to_string())
}
