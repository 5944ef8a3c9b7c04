//! RPC-backed wallet bridge.
//!
//! Provides [`RpcWallet`], a [`WalletBridge`] that signs locally with an
//! [`alloy`] `PrivateKeySigner` and talks to a JSON-RPC node for calls and
//! broadcasting.

use std::sync::Arc;

use alloy::network::{Ethereum, ReceiptResponse, TransactionBuilder};
use alloy::primitives::{Address, Bytes};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::Signer;
use alloy::signers::local::coins_bip39::English;
use alloy::signers::local::{MnemonicBuilder, PrivateKeySigner};
use async_trait::async_trait;
use tracing::{debug, info};

use super::bridge::{Confirmation, PendingTransaction, WalletBridge, WalletSigner};
use super::error::WalletError;

/// Builder for constructing an [`RpcWallet`].
///
/// Created by [`RpcWallet::builder`]. Use method chaining to configure
/// the wallet, then call [`build`](Self::build).
///
/// # Examples
///
/// ```rust,ignore
/// // From HD mnemonic
/// let wallet = RpcWallet::builder()
///     .mnemonic("abandon abandon ...")
///     .index(0)
///     .rpc_url("https://ethereum-sepolia-rpc.publicnode.com")
///     .build()
///     .await?;
///
/// // From private key
/// let wallet = RpcWallet::builder()
///     .private_key("0xabc...")
///     .rpc_url("https://ethereum-sepolia-rpc.publicnode.com")
///     .build()
///     .await?;
/// ```
#[derive(Debug, Default)]
pub struct RpcWalletBuilder {
    /// BIP39 mnemonic phrase.
    mnemonic: Option<String>,
    /// HD derivation index (default 0).
    index: u32,
    /// Raw private key hex string.
    private_key: Option<String>,
    /// JSON-RPC endpoint URL.
    rpc_url: Option<String>,
    /// Chain ID (auto-detected if not set).
    chain_id: Option<u64>,
}

impl RpcWalletBuilder {
    /// Set the BIP39 mnemonic phrase for HD key derivation.
    #[must_use]
    pub fn mnemonic(mut self, mnemonic: impl Into<String>) -> Self {
        self.mnemonic = Some(mnemonic.into());
        self
    }

    /// Set the HD derivation index (default 0).
    #[must_use]
    pub const fn index(mut self, index: u32) -> Self {
        self.index = index;
        self
    }

    /// Set the private key directly (hex string, with or without 0x prefix).
    #[must_use]
    pub fn private_key(mut self, key: impl Into<String>) -> Self {
        self.private_key = Some(key.into());
        self
    }

    /// Set the JSON-RPC endpoint URL.
    #[must_use]
    pub fn rpc_url(mut self, url: impl Into<String>) -> Self {
        self.rpc_url = Some(url.into());
        self
    }

    /// Set the chain ID explicitly (auto-detected from RPC if not set).
    #[must_use]
    pub const fn chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Build the [`RpcWallet`].
    ///
    /// Either `mnemonic` or `private_key` must be set. `rpc_url` is required.
    pub async fn build(mut self) -> Result<RpcWallet, WalletError> {
        let rpc_url = self
            .rpc_url
            .take()
            .ok_or_else(|| WalletError::Config("rpc_url is required".into()))?;

        let mut signer = if let Some(ref mnemonic) = self.mnemonic {
            self.signer_from_mnemonic(mnemonic)?
        } else if let Some(ref key) = self.private_key {
            Self::signer_from_private_key(key)?
        } else {
            return Err(WalletError::Config(
                "either mnemonic or private_key is required".into(),
            ));
        };

        if let Some(chain_id) = self.chain_id {
            signer.set_chain_id(Some(chain_id));
        }

        let address = signer.address();

        let provider: DynProvider<Ethereum> = ProviderBuilder::new()
            .wallet(signer)
            .connect(&rpc_url)
            .await
            .map_err(|e| WalletError::provider(format!("failed to connect to '{rpc_url}': {e}")))?
            .erased();

        let chain_id = if let Some(id) = self.chain_id {
            id
        } else {
            provider
                .get_chain_id()
                .await
                .map_err(|e| WalletError::provider(format!("failed to get chain ID: {e}")))?
        };

        info!(
            address = %address,
            chain_id = chain_id,
            "RPC wallet initialized",
        );

        Ok(RpcWallet {
            provider: Arc::new(provider),
            address,
            chain_id,
        })
    }

    fn signer_from_mnemonic(&self, mnemonic: &str) -> Result<PrivateKeySigner, WalletError> {
        MnemonicBuilder::<English>::default()
            .phrase(mnemonic)
            .index(self.index)
            .map_err(|e| WalletError::Derivation(format!("invalid derivation index: {e}")))?
            .build()
            .map_err(|e| WalletError::Derivation(format!("invalid mnemonic: {e}")))
    }

    fn signer_from_private_key(key: &str) -> Result<PrivateKeySigner, WalletError> {
        let key = key.strip_prefix("0x").unwrap_or(key);
        key.parse::<PrivateKeySigner>()
            .map_err(|e| WalletError::Config(format!("invalid private key: {e}")))
    }
}

/// A wallet bridge backed by a local key and a JSON-RPC node.
///
/// Account access always yields the single local account. Signing happens
/// inside the provider's wallet filler, which also fills nonce, gas and
/// chain id.
#[derive(Clone)]
pub struct RpcWallet {
    provider: Arc<DynProvider<Ethereum>>,
    address: Address,
    chain_id: u64,
}

impl std::fmt::Debug for RpcWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcWallet")
            .field("address", &self.address)
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}

impl RpcWallet {
    /// Create a builder for constructing an [`RpcWallet`].
    #[must_use]
    pub fn builder() -> RpcWalletBuilder {
        RpcWalletBuilder::default()
    }

    /// The wallet's Ethereum address.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// The chain ID this wallet is connected to.
    #[must_use]
    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }
}

#[async_trait]
impl WalletBridge for RpcWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        Ok(vec![self.address])
    }

    async fn call(&self, request: TransactionRequest) -> Result<Bytes, WalletError> {
        self.provider
            .call(request)
            .await
            .map_err(|e| WalletError::provider(format!("call failed: {e}")))
    }

    async fn signer(&self) -> Result<Arc<dyn WalletSigner>, WalletError> {
        Ok(Arc::new(RpcSigner {
            provider: Arc::clone(&self.provider),
            address: self.address,
        }))
    }
}

/// Signer half of [`RpcWallet`].
struct RpcSigner {
    provider: Arc<DynProvider<Ethereum>>,
    address: Address,
}

#[async_trait]
impl WalletSigner for RpcSigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn send_transaction(
        &self,
        request: TransactionRequest,
    ) -> Result<PendingTransaction, WalletError> {
        let pending = self
            .provider
            .send_transaction(request.with_from(self.address))
            .await
            .map_err(|e| WalletError::transaction(format!("send failed: {e}")))?;

        let tx_hash = *pending.tx_hash();
        debug!(tx_hash = %tx_hash, "transaction broadcast");

        Ok(PendingTransaction::new(tx_hash, async move {
            let receipt = pending
                .get_receipt()
                .await
                .map_err(|e| WalletError::transaction(format!("receipt failed: {e}")))?;

            if !receipt.status() {
                return Err(WalletError::Reverted(tx_hash));
            }

            Ok(Confirmation {
                tx_hash,
                block_number: receipt.block_number(),
            })
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_signer_from_private_key() {
        let signer = RpcWalletBuilder::signer_from_private_key(TEST_KEY);
        assert!(signer.is_ok());

        let without_prefix = RpcWalletBuilder::signer_from_private_key(&TEST_KEY[2..]);
        assert_eq!(
            signer.map(|s| s.address()).ok(),
            without_prefix.map(|s| s.address()).ok()
        );
    }

    #[test]
    fn test_signer_from_invalid_private_key() {
        let err = RpcWalletBuilder::signer_from_private_key("0xnothex");
        assert!(matches!(err, Err(WalletError::Config(_))));
    }

    #[test]
    fn test_signer_from_mnemonic() {
        let builder = RpcWallet::builder().index(0);
        let signer = builder.signer_from_mnemonic(
            "test test test test test test test test test test test junk",
        );
        let key_signer = RpcWalletBuilder::signer_from_private_key(TEST_KEY);
        assert_eq!(
            signer.map(|s| s.address()).ok(),
            key_signer.map(|s| s.address()).ok()
        );
    }

    #[tokio::test]
    async fn test_build_requires_rpc_url() {
        let err = RpcWallet::builder().private_key(TEST_KEY).build().await;
        assert!(matches!(err, Err(WalletError::Config(_))));
    }

    #[tokio::test]
    async fn test_build_requires_key_material() {
        let err = RpcWallet::builder()
            .rpc_url("http://127.0.0.1:8545")
            .build()
            .await;
        assert!(matches!(err, Err(WalletError::Config(_))));
    }
}
