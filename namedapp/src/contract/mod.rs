//! Typed proxy for the NameDapp contract.
//!
//! The contract stores an ordered list of names. Queries go through the
//! bridge's read-only `call`; mutations acquire a signer and return a
//! [`PendingTransaction`] that the caller must await before treating the
//! change as durable.
//!
//! ## Usage
//!
//! ```ignore
//! use namedapp::contract::NameContract;
//!
//! let contract = NameContract::new(bridge);
//! let names = contract.get_all_names().await?;
//!
//! let pending = contract.add_name("Carol").await?;
//! pending.wait().await?;
//! ```

pub mod addresses;

use std::fmt;
use std::sync::Arc;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol;
use alloy::sol_types::SolCall;
use tracing::debug;

pub use addresses::{NAME_DAPP_ADDRESS, explorer_url};

use crate::wallet::{PendingTransaction, WalletBridge, WalletError};

sol! {
    #[allow(missing_docs)]
    interface INameDapp {
        /// Every stored name, in storage order.
        function getAllNames() external view returns (string[] memory);

        /// The name stored at `index`. Reverts when out of range.
        function getName(uint256 index) external view returns (string memory);

        /// Append a name.
        function addName(string memory name) external;

        /// Remove the name stored at `index`. Reverts when out of range.
        function removeName(uint256 index) external;
    }
}

/// Error type for contract calls.
///
/// No structured revert reason is extracted; a revert surfaces as the
/// wallet's provider or transaction error.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum ContractError {
    /// The wallet bridge failed the call or the transaction.
    #[error(transparent)]
    Wallet(#[from] WalletError),

    /// Return data could not be decoded against the ABI.
    #[error("decode: {0}")]
    Decode(String),
}

/// NameDapp contract client bound to one deployment.
#[derive(Clone)]
pub struct NameContract {
    address: Address,
    bridge: Arc<dyn WalletBridge>,
}

impl fmt::Debug for NameContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameContract")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl NameContract {
    /// Bind to the deployed contract at [`NAME_DAPP_ADDRESS`].
    #[must_use]
    pub fn new(bridge: Arc<dyn WalletBridge>) -> Self {
        Self::at(NAME_DAPP_ADDRESS, bridge)
    }

    /// Bind to a contract at an explicit address.
    #[must_use]
    pub fn at(address: Address, bridge: Arc<dyn WalletBridge>) -> Self {
        Self { address, bridge }
    }

    /// The contract address.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Fetch every stored name.
    pub async fn get_all_names(&self) -> Result<Vec<String>, ContractError> {
        self.query(&INameDapp::getAllNamesCall {}).await
    }

    /// Fetch the name at `index`.
    pub async fn get_name(&self, index: U256) -> Result<String, ContractError> {
        self.query(&INameDapp::getNameCall { index }).await
    }

    /// Submit an `addName` transaction.
    pub async fn add_name(&self, name: &str) -> Result<PendingTransaction, ContractError> {
        self.submit(&INameDapp::addNameCall {
            name: name.to_owned(),
        })
        .await
    }

    /// Submit a `removeName` transaction.
    pub async fn remove_name(&self, index: U256) -> Result<PendingTransaction, ContractError> {
        self.submit(&INameDapp::removeNameCall { index }).await
    }

    fn request<C: SolCall>(&self, call: &C) -> TransactionRequest {
        TransactionRequest::default()
            .with_to(self.address)
            .with_input(call.abi_encode())
    }

    async fn query<C: SolCall>(&self, call: &C) -> Result<C::Return, ContractError> {
        let raw = self.bridge.call(self.request(call)).await?;
        debug!(function = C::SIGNATURE, len = raw.len(), "query returned");
        C::abi_decode_returns(&raw).map_err(|e| ContractError::Decode(e.to_string()))
    }

    async fn submit<C: SolCall>(&self, call: &C) -> Result<PendingTransaction, ContractError> {
        let signer = self.bridge.signer().await?;
        let request = self.request(call);
        debug!(
            function = C::SIGNATURE,
            from = %signer.address(),
            to = %self.address,
            "submitting transaction"
        );
        Ok(signer.send_transaction(request).await?)
    }
}
