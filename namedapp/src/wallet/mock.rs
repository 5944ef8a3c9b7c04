//! In-memory wallet bridge for tests.
//!
//! Emulates the NameDapp contract: queries read the stored list, and
//! mutations apply when their pending transaction is awaited.

#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::{SolInterface, SolValue};
use async_trait::async_trait;
use tokio::sync::Notify;

use super::{Confirmation, PendingTransaction, WalletBridge, WalletError, WalletSigner};
use crate::contract::INameDapp::INameDappCalls;

/// A contract interaction seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Recorded {
    RequestAccounts,
    GetAllNames,
    GetName(U256),
    AddName(String),
    RemoveName(U256),
}

#[derive(Default)]
struct MockChain {
    names: Mutex<Vec<String>>,
    accounts: Mutex<Vec<Address>>,
    recorded: Mutex<Vec<Recorded>>,
    corrupt: AtomicBool,
    reject_sends: AtomicBool,
    gate: Mutex<Option<Arc<Notify>>>,
    sent: AtomicU8,
}

impl MockChain {
    fn record(&self, call: Recorded) {
        self.recorded.lock().unwrap().push(call);
    }
}

/// Scriptable [`WalletBridge`] backed by an in-memory name list.
pub(crate) struct MockBridge {
    chain: Arc<MockChain>,
}

impl MockBridge {
    pub(crate) const ACCOUNT: Address = Address::with_last_byte(0xaa);

    pub(crate) fn with_names<I, S>(names: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let chain = MockChain {
            names: Mutex::new(names.into_iter().map(Into::into).collect()),
            accounts: Mutex::new(vec![Self::ACCOUNT]),
            ..MockChain::default()
        };
        Arc::new(Self {
            chain: Arc::new(chain),
        })
    }

    pub(crate) fn names(&self) -> Vec<String> {
        self.chain.names.lock().unwrap().clone()
    }

    pub(crate) fn recorded(&self) -> Vec<Recorded> {
        self.chain.recorded.lock().unwrap().clone()
    }

    /// Number of transactions broadcast so far.
    pub(crate) fn sent(&self) -> u8 {
        self.chain.sent.load(Ordering::SeqCst)
    }

    pub(crate) fn without_accounts(&self) {
        self.chain.accounts.lock().unwrap().clear();
    }

    pub(crate) fn corrupt_returns(&self) {
        self.chain.corrupt.store(true, Ordering::SeqCst);
    }

    pub(crate) fn reject_sends(&self) {
        self.chain.reject_sends.store(true, Ordering::SeqCst);
    }

    /// Hold every confirmation until the returned gate is notified.
    pub(crate) fn hold_confirmations(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.chain.gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }
}

fn calldata(request: &TransactionRequest) -> Result<INameDappCalls, WalletError> {
    let input = request
        .input
        .input()
        .ok_or_else(|| WalletError::provider("missing calldata"))?;
    INameDappCalls::abi_decode(input).map_err(|e| WalletError::provider(e.to_string()))
}

#[async_trait]
impl WalletBridge for MockBridge {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        self.chain.record(Recorded::RequestAccounts);
        Ok(self.chain.accounts.lock().unwrap().clone())
    }

    async fn call(&self, request: TransactionRequest) -> Result<Bytes, WalletError> {
        if self.chain.corrupt.load(Ordering::SeqCst) {
            return Ok(Bytes::from_static(&[0xde, 0xad]));
        }
        let names = self.chain.names.lock().unwrap().clone();
        match calldata(&request)? {
            INameDappCalls::getAllNames(_) => {
                self.chain.record(Recorded::GetAllNames);
                Ok(names.abi_encode().into())
            }
            INameDappCalls::getName(call) => {
                self.chain.record(Recorded::GetName(call.index));
                usize::try_from(call.index)
                    .ok()
                    .and_then(|i| names.get(i).cloned())
                    .map(|name| name.abi_encode().into())
                    .ok_or_else(|| WalletError::provider("execution reverted"))
            }
            _ => Err(WalletError::provider("eth_call on a mutating function")),
        }
    }

    async fn signer(&self) -> Result<Arc<dyn WalletSigner>, WalletError> {
        Ok(Arc::new(MockSigner {
            chain: Arc::clone(&self.chain),
        }))
    }
}

struct MockSigner {
    chain: Arc<MockChain>,
}

#[async_trait]
impl WalletSigner for MockSigner {
    fn address(&self) -> Address {
        MockBridge::ACCOUNT
    }

    async fn send_transaction(
        &self,
        request: TransactionRequest,
    ) -> Result<PendingTransaction, WalletError> {
        let call = calldata(&request)?;
        match &call {
            INameDappCalls::addName(c) => self.chain.record(Recorded::AddName(c.name.clone())),
            INameDappCalls::removeName(c) => self.chain.record(Recorded::RemoveName(c.index)),
            _ => return Err(WalletError::transaction("not a mutating function")),
        }
        if self.chain.reject_sends.load(Ordering::SeqCst) {
            return Err(WalletError::transaction("user rejected the request"));
        }

        let nonce = self.chain.sent.fetch_add(1, Ordering::SeqCst);
        let tx_hash = TxHash::with_last_byte(nonce.wrapping_add(1));
        let gate = self.chain.gate.lock().unwrap().clone();
        let chain = Arc::clone(&self.chain);

        Ok(PendingTransaction::new(tx_hash, async move {
            if let Some(gate) = gate {
                gate.notified().await;
            }
            let mut names = chain.names.lock().unwrap();
            match call {
                INameDappCalls::addName(c) => names.push(c.name),
                INameDappCalls::removeName(c) => {
                    let index = usize::try_from(c.index)
                        .ok()
                        .filter(|i| *i < names.len())
                        .ok_or(WalletError::Reverted(tx_hash))?;
                    names.remove(index);
                }
                _ => {}
            }
            Ok(Confirmation {
                tx_hash,
                block_number: Some(u64::from(nonce) + 1),
            })
        }))
    }
}
