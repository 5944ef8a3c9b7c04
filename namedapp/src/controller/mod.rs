//! View controller binding user actions to contract calls.
//!
//! The controller owns the UI state ([`ViewState`]) and turns each user
//! action into one contract proxy call:
//!
//! ```text
//! connect()         → WalletBridge::request_accounts
//! load_all_names()  → NameContract::get_all_names
//! load_name()       → NameContract::get_name
//! add_name()        → signer → submit → confirm → clear input → success
//! remove_name()     → signer → submit → confirm → clear input → success
//! ```
//!
//! Mutating actions move `Idle → InFlight → Succeeded → Idle` (the last
//! step on a timer) or `Idle → InFlight → Idle` on failure. A second trigger
//! while the same action is in flight is rejected with [`Error::Busy`].
//!
//! Every outcome is both returned and reported through the [`Notifier`].

mod notice;
mod state;

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, TxHash, U256};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

pub use notice::{
    ChannelNotifier, ENTER_INDEX, ENTER_NAME, ENTER_VALID_INDEX, INSTALL_WALLET, Notice,
    NoticeLevel, Notifier, NullNotifier, WAITING_FOR_CONFIRMATION,
};
pub use state::{Action, NameList, OperationStatus, ViewState};

use crate::config::{DappConfig, RefreshPolicy};
use crate::contract::{NAME_DAPP_ADDRESS, NameContract};
use crate::error::{Error, Result};
use crate::wallet::{Confirmation, WalletBridge, WalletError};

/// Behaviour knobs for the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    /// How long a success message stays visible.
    pub success_display: Duration,
    /// Cache behaviour after a confirmed mutation.
    pub refresh: RefreshPolicy,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self::from(&DappConfig::default())
    }
}

impl From<&DappConfig> for ControllerSettings {
    fn from(config: &DappConfig) -> Self {
        Self {
            success_display: config.success_display(),
            refresh: config.refresh,
        }
    }
}

/// Builder for [`NameDappController`].
#[derive(Default)]
pub struct ControllerBuilder {
    bridge: Option<Arc<dyn WalletBridge>>,
    notifier: Option<Arc<dyn Notifier>>,
    settings: ControllerSettings,
    contract_address: Option<Address>,
}

impl std::fmt::Debug for ControllerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerBuilder")
            .field("has_wallet", &self.bridge.is_some())
            .field("settings", &self.settings)
            .field("contract_address", &self.contract_address)
            .finish_non_exhaustive()
    }
}

impl ControllerBuilder {
    /// Inject the wallet bridge. Without one, wallet actions are blocked.
    #[must_use]
    pub fn wallet(mut self, bridge: Arc<dyn WalletBridge>) -> Self {
        self.bridge = Some(bridge);
        self
    }

    /// Inject an optional wallet bridge, as returned by discovery.
    #[must_use]
    pub fn maybe_wallet(mut self, bridge: Option<Arc<dyn WalletBridge>>) -> Self {
        self.bridge = bridge;
        self
    }

    /// Set the notice sink (default: [`NullNotifier`]).
    #[must_use]
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Set the controller settings.
    #[must_use]
    pub const fn settings(mut self, settings: ControllerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Bind to a contract other than [`NAME_DAPP_ADDRESS`].
    #[must_use]
    pub const fn contract_address(mut self, address: Address) -> Self {
        self.contract_address = Some(address);
        self
    }

    /// Build the controller.
    #[must_use]
    pub fn build(self) -> NameDappController {
        let address = self.contract_address.unwrap_or(NAME_DAPP_ADDRESS);
        let contract = self
            .bridge
            .as_ref()
            .map(|bridge| NameContract::at(address, Arc::clone(bridge)));

        let notifier: Arc<dyn Notifier> = match self.notifier {
            Some(notifier) => notifier,
            None => Arc::new(NullNotifier),
        };

        NameDappController {
            bridge: self.bridge,
            contract,
            notifier,
            settings: self.settings,
            state: Arc::new(RwLock::new(Inner::default())),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    view: ViewState,
    /// Bumped on every success so an older revert timer leaves a newer
    /// success alone.
    epochs: [u64; 2],
}

impl Inner {
    fn epoch_mut(&mut self, action: Action) -> &mut u64 {
        match action {
            Action::AddName => &mut self.epochs[0],
            Action::RemoveName => &mut self.epochs[1],
        }
    }
}

/// Holds UI state and binds user actions to contract calls.
pub struct NameDappController {
    bridge: Option<Arc<dyn WalletBridge>>,
    contract: Option<NameContract>,
    notifier: Arc<dyn Notifier>,
    settings: ControllerSettings,
    state: Arc<RwLock<Inner>>,
}

impl std::fmt::Debug for NameDappController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameDappController")
            .field("contract", &self.contract)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl NameDappController {
    /// Create a builder.
    #[must_use]
    pub fn builder() -> ControllerBuilder {
        ControllerBuilder::default()
    }

    /// Whether a wallet bridge was injected.
    #[must_use]
    pub const fn has_wallet(&self) -> bool {
        self.bridge.is_some()
    }

    /// The settings the controller was built with.
    #[must_use]
    pub const fn settings(&self) -> ControllerSettings {
        self.settings
    }

    /// Address of the bound contract, if a wallet is present.
    #[must_use]
    pub fn contract_address(&self) -> Option<Address> {
        self.contract.as_ref().map(NameContract::address)
    }

    /// Clone the current view state.
    pub async fn snapshot(&self) -> ViewState {
        self.state.read().await.view.clone()
    }

    /// Set the name-to-add input.
    pub async fn set_new_name(&self, value: impl Into<String>) {
        self.state.write().await.view.new_name = value.into();
    }

    /// Set the index-to-remove input.
    pub async fn set_remove_index(&self, value: impl Into<String>) {
        self.state.write().await.view.remove_index = value.into();
    }

    /// Set the index-to-read input.
    pub async fn set_get_index(&self, value: impl Into<String>) {
        self.state.write().await.view.get_index = value.into();
    }

    /// Request account access and store the first account.
    pub async fn connect(&self) -> Result<Address> {
        let bridge = self.require_bridge()?;

        let address = match bridge.request_accounts().await {
            Ok(accounts) => accounts.first().copied().ok_or(WalletError::NoAccounts),
            Err(e) => Err(e),
        };

        match address {
            Ok(address) => {
                self.state.write().await.view.wallet_address = Some(address);
                info!(address = %address, "wallet connected");
                Ok(address)
            }
            Err(e) => {
                error!(error = %e, "failed to connect wallet");
                self.notify(Notice::error(notice::CONNECT_FAILED));
                Err(e.into())
            }
        }
    }

    /// Fetch every name and show the list.
    ///
    /// The list stays visible afterwards whether or not the fetch succeeds.
    pub async fn load_all_names(&self) -> Result<Vec<String>> {
        self.state.write().await.view.names_visible = true;
        self.fetch_names().await
    }

    /// Serve the cached list when it is fresh, otherwise refetch.
    pub async fn names_or_fetch(&self) -> Result<Vec<String>> {
        {
            let inner = self.state.read().await;
            if inner.view.names.is_fresh() {
                return Ok(inner.view.names.names().to_vec());
            }
        }
        self.load_all_names().await
    }

    /// Fetch the name at the index in the get-index input.
    pub async fn load_name(&self) -> Result<String> {
        let raw_index = {
            let mut inner = self.state.write().await;
            inner.view.name_visible = true;
            inner.view.get_index.clone()
        };
        let contract = self.require_contract()?;

        let index = match parse_index(&raw_index) {
            Ok(index) => index,
            Err(reason) => {
                warn!(input = %raw_index, reason, "rejected get-name index");
                self.notify(Notice::error(notice::GET_NAME_FAILED));
                return Err(Error::invalid_input(reason));
            }
        };

        match contract.get_name(index).await {
            Ok(name) => {
                debug!(index = %index, name = %name, "name on contract");
                self.state.write().await.view.name.clone_from(&name);
                Ok(name)
            }
            Err(e) => {
                error!(index = %index, error = %e, "failed to get name");
                self.notify(Notice::error(notice::GET_NAME_FAILED));
                Err(e.into())
            }
        }
    }

    /// Submit the name in the new-name input and wait for confirmation.
    pub async fn add_name(&self) -> Result<TxHash> {
        let name = self.state.read().await.view.new_name.clone();
        if name.is_empty() {
            return Err(self.reject(ENTER_NAME));
        }
        let contract = self.require_contract()?;

        let guard = self.begin(Action::AddName).await?;
        let outcome = async {
            let pending = contract.add_name(&name).await?;
            info!(tx_hash = %pending.tx_hash(), name = %name, "addName submitted");
            Ok::<_, Error>(pending.wait().await?)
        }
        .await;
        self.finish(guard, outcome).await
    }

    /// Submit removal of the index in the remove-index input and wait for
    /// confirmation.
    pub async fn remove_name(&self) -> Result<TxHash> {
        let raw_index = self.state.read().await.view.remove_index.clone();
        if raw_index.is_empty() {
            return Err(self.reject(ENTER_INDEX));
        }
        let index = match parse_index(&raw_index) {
            Ok(index) => index,
            Err(_) => return Err(self.reject(ENTER_VALID_INDEX)),
        };
        let contract = self.require_contract()?;

        let guard = self.begin(Action::RemoveName).await?;
        let outcome = async {
            let pending = contract.remove_name(index).await?;
            info!(tx_hash = %pending.tx_hash(), index = %index, "removeName submitted");
            Ok::<_, Error>(pending.wait().await?)
        }
        .await;
        self.finish(guard, outcome).await
    }

    fn notify(&self, notice: Notice) {
        self.notifier.notify(notice);
    }

    /// Reject an action before any network call.
    fn reject(&self, message: &'static str) -> Error {
        warn!(notice = message, "input rejected");
        self.notify(Notice::warning(message));
        Error::invalid_input(message)
    }

    fn require_bridge(&self) -> Result<&Arc<dyn WalletBridge>> {
        self.bridge.as_ref().ok_or_else(|| {
            warn!("no wallet provider available");
            self.notify(Notice::warning(INSTALL_WALLET));
            Error::WalletUnavailable
        })
    }

    fn require_contract(&self) -> Result<&NameContract> {
        self.require_bridge()?;
        self.contract.as_ref().ok_or(Error::WalletUnavailable)
    }

    async fn fetch_names(&self) -> Result<Vec<String>> {
        let contract = self.require_contract()?;
        match contract.get_all_names().await {
            Ok(names) => {
                debug!(?names, "names on contract");
                self.state.write().await.view.names.replace(names.clone());
                Ok(names)
            }
            Err(e) => {
                error!(error = %e, "failed to get names");
                self.notify(Notice::error(notice::GET_NAMES_FAILED));
                Err(e.into())
            }
        }
    }

    /// Check-and-set the in-flight guard.
    async fn begin(&self, action: Action) -> Result<InFlightGuard> {
        let mut inner = self.state.write().await;
        if inner.view.status(action) == OperationStatus::InFlight {
            warn!(%action, "rejected: already waiting for confirmation");
            self.notify(Notice::warning(WAITING_FOR_CONFIRMATION));
            return Err(Error::busy(action));
        }
        inner.view.set_status(action, OperationStatus::InFlight);
        debug!(%action, "in flight");
        Ok(InFlightGuard {
            state: Arc::clone(&self.state),
            action,
            armed: true,
        })
    }

    async fn finish(&self, guard: InFlightGuard, outcome: Result<Confirmation>) -> Result<TxHash> {
        let action = guard.action;
        let confirmation = match outcome {
            Ok(confirmation) => confirmation,
            Err(e) => {
                error!(%action, error = %e, "transaction failed");
                self.state
                    .write()
                    .await
                    .view
                    .set_status(action, OperationStatus::Idle);
                guard.disarm();
                self.notify(Notice::error(action.failure_message()));
                return Err(e);
            }
        };

        info!(
            %action,
            tx_hash = %confirmation.tx_hash,
            block = ?confirmation.block_number,
            "transaction confirmed"
        );

        let epoch = {
            let mut inner = self.state.write().await;
            inner.view.clear_input(action);
            inner.view.set_status(action, OperationStatus::Succeeded);
            inner.view.names.invalidate();
            guard.disarm();
            let epoch = inner.epoch_mut(action);
            *epoch += 1;
            *epoch
        };
        self.schedule_revert(action, epoch);
        self.notify(Notice::info(action.success_message(self.settings.refresh)));

        if self.settings.refresh == RefreshPolicy::AfterMutation {
            // A failed refetch already raised its own notice.
            let _ = self.fetch_names().await;
        }

        Ok(confirmation.tx_hash)
    }

    /// Revert `Succeeded` to `Idle` after the display timeout.
    fn schedule_revert(&self, action: Action, epoch: u64) {
        let state = Arc::clone(&self.state);
        let delay = self.settings.success_display;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut inner = state.write().await;
            if *inner.epoch_mut(action) == epoch
                && inner.view.status(action) == OperationStatus::Succeeded
            {
                inner.view.set_status(action, OperationStatus::Idle);
                debug!(%action, "success message hidden");
            }
        });
    }
}

/// Resets an action to `Idle` when its mutation is dropped before `finish`
/// records the outcome.
struct InFlightGuard {
    state: Arc<RwLock<Inner>>,
    action: Action,
    armed: bool,
}

impl InFlightGuard {
    fn disarm(mut self) {
        self.armed = false;
    }
}

fn release(inner: &mut Inner, action: Action) {
    if inner.view.status(action) == OperationStatus::InFlight {
        inner.view.set_status(action, OperationStatus::Idle);
        warn!(%action, "abandoned before confirmation");
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let action = self.action;
        if let Ok(mut inner) = self.state.try_write() {
            release(&mut inner, action);
            return;
        }
        // Lock contended: release once it frees up.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let state = Arc::clone(&self.state);
            handle.spawn(async move {
                release(&mut *state.write().await, action);
            });
        }
    }
}

/// Parse an index input as an unsigned 256-bit integer.
fn parse_index(raw: &str) -> std::result::Result<U256, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("index is empty");
    }
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err("index is not an unsigned integer");
    }
    raw.parse::<U256>().map_err(|_| "index is out of range")
}
