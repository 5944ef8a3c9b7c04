//! Wallet bridge traits.
//!
//! The bridge is the only way the rest of the crate reaches the chain. It is
//! injected into the contract proxy and the controller as a trait object, so
//! an RPC-backed wallet and an in-memory fake are interchangeable.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use alloy::primitives::{Address, Bytes, TxHash};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;

use super::error::WalletError;

/// Account access, read-only calls and signing.
#[async_trait]
pub trait WalletBridge: Send + Sync {
    /// Ask the wallet for account access.
    ///
    /// The first returned account is the one a session uses.
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError>;

    /// Execute a read-only call against the current chain state.
    async fn call(&self, request: TransactionRequest) -> Result<Bytes, WalletError>;

    /// Acquire a signer able to authorize transactions.
    async fn signer(&self) -> Result<Arc<dyn WalletSigner>, WalletError>;
}

/// A capability that signs and broadcasts transactions for one account.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// The account this signer authorizes for.
    fn address(&self) -> Address;

    /// Sign and broadcast a transaction.
    ///
    /// Returns as soon as the node accepted the transaction; use
    /// [`PendingTransaction::wait`] to await its inclusion.
    async fn send_transaction(
        &self,
        request: TransactionRequest,
    ) -> Result<PendingTransaction, WalletError>;
}

/// A mined transaction with a successful receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmation {
    /// Hash of the confirmed transaction.
    pub tx_hash: TxHash,
    /// Block the transaction was included in, when the node reports it.
    pub block_number: Option<u64>,
}

/// Handle to a broadcast transaction that has not been awaited yet.
pub struct PendingTransaction {
    tx_hash: TxHash,
    confirmation: BoxFuture<'static, Result<Confirmation, WalletError>>,
}

impl fmt::Debug for PendingTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingTransaction")
            .field("tx_hash", &self.tx_hash)
            .finish_non_exhaustive()
    }
}

impl PendingTransaction {
    /// Wrap a broadcast transaction and the future resolving its receipt.
    pub fn new<F>(tx_hash: TxHash, confirmation: F) -> Self
    where
        F: Future<Output = Result<Confirmation, WalletError>> + Send + 'static,
    {
        Self {
            tx_hash,
            confirmation: confirmation.boxed(),
        }
    }

    /// Hash of the broadcast transaction.
    #[must_use]
    pub const fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }

    /// Wait until the transaction is mined.
    ///
    /// Fails with [`WalletError::Reverted`] when the receipt reports a
    /// failed execution.
    pub async fn wait(self) -> Result<Confirmation, WalletError> {
        self.confirmation.await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pending_transaction_wait() {
        let hash = TxHash::with_last_byte(7);
        let pending = PendingTransaction::new(hash, async move {
            Ok(Confirmation {
                tx_hash: hash,
                block_number: Some(42),
            })
        });

        assert_eq!(pending.tx_hash(), hash);
        let confirmation = pending.wait().await.unwrap();
        assert_eq!(confirmation.block_number, Some(42));
    }

    #[test]
    fn test_pending_transaction_revert() {
        let hash = TxHash::with_last_byte(1);
        let pending = PendingTransaction::new(hash, async move { Err(WalletError::Reverted(hash)) });

        let err = tokio_test::block_on(pending.wait()).unwrap_err();
        assert!(matches!(err, WalletError::Reverted(h) if h == hash));
    }
}
