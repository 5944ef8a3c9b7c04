//! Wallet bridge for account access and transaction signing.
//!
//! Everything that touches the chain goes through a [`WalletBridge`]. The
//! bridge is discovered once from configuration and then injected; there is
//! no ambient global provider.
//!
//! # Architecture
//!
//! ```text
//! WalletBridge (trait)
//!   ├── request_accounts() → Vec<Address>
//!   ├── call()             → read-only eth_call
//!   └── signer()           → WalletSigner
//!                              └── send_transaction() → PendingTransaction
//!                                                         └── wait() → Confirmation
//! RpcWallet (alloy signer + alloy provider) implements WalletBridge
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use namedapp::wallet::{self, WalletBridge};
//!
//! let config = namedapp::config::load_config(None).await?;
//! match wallet::discover(&config).await? {
//!     Some(bridge) => println!("{:?}", bridge.request_accounts().await?),
//!     None => println!("Please install MetaMask!"),
//! }
//! ```

mod bridge;
mod error;
mod evm;
#[cfg(test)]
pub(crate) mod mock;

use std::sync::Arc;

use tracing::debug;

pub use bridge::{Confirmation, PendingTransaction, WalletBridge, WalletSigner};
pub use error::WalletError;
pub use evm::{RpcWallet, RpcWalletBuilder};

use crate::config::DappConfig;

/// Discover the wallet bridge described by the configuration.
///
/// Returns `Ok(None)` when no key material is configured, which the
/// controller treats as "no wallet installed". Key material without an RPC
/// endpoint, or a wallet that fails to build, is an error.
pub async fn discover(config: &DappConfig) -> Result<Option<Arc<dyn WalletBridge>>, WalletError> {
    let wallet = &config.wallet;
    if wallet.private_key.is_none() && wallet.mnemonic.is_none() {
        debug!("no wallet key material configured");
        return Ok(None);
    }

    let rpc_url = config
        .rpc_url
        .as_deref()
        .ok_or_else(|| WalletError::Config("rpc_url is required when a wallet is configured".into()))?;

    let mut builder = RpcWallet::builder().rpc_url(rpc_url).index(wallet.index);
    if let Some(ref mnemonic) = wallet.mnemonic {
        builder = builder.mnemonic(mnemonic.as_str());
    } else if let Some(ref key) = wallet.private_key {
        builder = builder.private_key(key.as_str());
    }
    if let Some(chain_id) = config.chain_id {
        builder = builder.chain_id(chain_id);
    }

    let bridge: Arc<dyn WalletBridge> = Arc::new(builder.build().await?);
    Ok(Some(bridge))
}
