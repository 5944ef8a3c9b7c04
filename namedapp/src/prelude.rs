//! Commonly used types.

pub use crate::config::{DappConfig, RefreshPolicy, WalletConfig, load_config};
pub use crate::contract::{NAME_DAPP_ADDRESS, NameContract};
pub use crate::controller::{
    Action, ChannelNotifier, ControllerSettings, NameDappController, Notice, NoticeLevel,
    Notifier, OperationStatus, ViewState,
};
pub use crate::error::{Error, Result};
pub use crate::wallet::{self, PendingTransaction, WalletBridge, WalletError};
