//! Unified error types for namedapp.
//!
//! This module provides the error hierarchy used across the crate:
//! - Wallet errors (provider connection, key derivation, broadcasting)
//! - Contract errors (call failures, return decoding)
//! - Configuration errors
//! - Controller errors (missing wallet, invalid input, busy actions)

use crate::controller::Action;

pub use crate::config::ConfigError;
pub use crate::contract::ContractError;
pub use crate::wallet::WalletError;

/// Result type alias for namedapp operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for namedapp.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// No wallet provider was discovered.
    #[error("no wallet provider available")]
    WalletUnavailable,

    /// Wallet bridge error.
    #[error("wallet error: {0}")]
    Wallet(#[from] WalletError),

    /// Contract call error.
    #[error("contract error: {0}")]
    Contract(#[from] ContractError),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// User input was rejected before any network call.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The same action is already waiting for confirmation.
    #[error("{action} is already waiting for confirmation")]
    Busy {
        /// The action that is in flight.
        action: Action,
    },
}

impl Error {
    /// Create an invalid input error with a message.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a busy error for an action.
    #[must_use]
    pub const fn busy(action: Action) -> Self {
        Self::Busy { action }
    }

    /// Whether the error was raised before any network interaction.
    #[must_use]
    pub const fn is_rejected_locally(&self) -> bool {
        matches!(
            self,
            Self::WalletUnavailable | Self::InvalidInput(_) | Self::Busy { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversions() {
        let err: Error = WalletError::NoAccounts.into();
        assert!(matches!(err, Error::Wallet(_)));

        let err: Error = ContractError::Decode("bad".into()).into();
        assert!(matches!(err, Error::Contract(_)));

        let err: Error = ConfigError::invalid("zero").into();
        assert!(matches!(err, Error::Config(_)));

        let err: Error = ConfigError::from(std::io::Error::other("missing")).into();
        assert!(matches!(err, Error::Config(ConfigError::Io(_))));
    }

    #[test]
    fn test_error_helpers() {
        let err = Error::busy(Action::AddName);
        assert_eq!(err.to_string(), "add name is already waiting for confirmation");
        assert!(err.is_rejected_locally());

        let err = Error::invalid_input("empty");
        assert!(err.is_rejected_locally());

        let err: Error = WalletError::Provider("down".into()).into();
        assert!(!err.is_rejected_locally());
    }
}
