//! Wallet error type.

use alloy::primitives::TxHash;

/// Error type for wallet bridge operations.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum WalletError {
    /// Invalid or incomplete wallet configuration.
    #[error("config: {0}")]
    Config(String),

    /// Key derivation from a mnemonic or private key failed.
    #[error("derivation: {0}")]
    Derivation(String),

    /// RPC provider failure (connection, `eth_call`, chain id lookup).
    #[error("provider: {0}")]
    Provider(String),

    /// Transaction signing or broadcasting failed.
    #[error("transaction: {0}")]
    Transaction(String),

    /// The transaction was mined but its execution reverted.
    #[error("transaction {0} reverted")]
    Reverted(TxHash),

    /// The wallet returned no accounts.
    #[error("wallet returned no accounts")]
    NoAccounts,
}

impl WalletError {
    /// Create a provider error.
    #[inline]
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Create a transaction error.
    #[inline]
    pub fn transaction(msg: impl Into<String>) -> Self {
        Self::Transaction(msg.into())
    }
}
