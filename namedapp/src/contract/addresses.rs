//! Deployment constants for the NameDapp contract.

use alloy::primitives::{Address, address};

/// Address of the deployed NameDapp contract on Sepolia.
pub const NAME_DAPP_ADDRESS: Address = address!("0x16993AB19598182767e9a8cb8F78fF696F976Fd5");

/// Block explorer page listing a contract's transactions.
#[must_use]
pub fn explorer_url(address: Address) -> String {
    format!("https://sepolia.etherscan.io/address/{}", address.to_checksum(None))
}
