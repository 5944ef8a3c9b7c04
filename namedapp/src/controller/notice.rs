//! User-facing notices.
//!
//! The controller reports every user-visible outcome as a [`Notice`] through
//! an injected [`Notifier`]. Front-ends decide how to show them.

use std::fmt;

use tokio::sync::mpsc;

/// Shown when an action needs a wallet and none was discovered.
pub const INSTALL_WALLET: &str = "Please install MetaMask!";
/// Add was triggered with an empty name.
pub const ENTER_NAME: &str = "Please enter a name!";
/// Remove was triggered with an empty index.
pub const ENTER_INDEX: &str = "Please enter an index!";
/// Remove was triggered with an index that is not an unsigned integer.
pub const ENTER_VALID_INDEX: &str = "Please enter a valid index!";
/// Shown while a mutating action waits for its transaction to be mined.
pub const WAITING_FOR_CONFIRMATION: &str = "Waiting for confirmation...";

pub(crate) const CONNECT_FAILED: &str = "Failed to connect wallet.";
pub(crate) const GET_NAMES_FAILED: &str = "Failed to get names.";
pub(crate) const GET_NAME_FAILED: &str = "Failed to get name.";

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Informational, e.g. a confirmed transaction.
    Info,
    /// The action was rejected before reaching the chain.
    Warning,
    /// The action reached the wallet or chain and failed.
    Error,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Text shown to the user.
    pub message: String,
}

impl Notice {
    /// Create an informational notice.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// Create a warning notice.
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    /// Create an error notice.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Receives notices from the controller.
pub trait Notifier: Send + Sync {
    /// Deliver a notice. Must not block.
    fn notify(&self, notice: Notice);
}

/// Forwards notices into an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notice>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiving end of its channel.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notice: Notice) {
        // Receiver gone means the front-end shut down.
        let _ = self.tx.send(notice);
    }
}

/// Drops every notice.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _notice: Notice) {}
}
