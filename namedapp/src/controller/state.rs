//! View state held by the controller.

use std::fmt;

use alloy::primitives::Address;

use super::notice::WAITING_FOR_CONFIRMATION;
use crate::config::RefreshPolicy;

/// A mutating action with its own status and in-flight guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// `addName(name)`.
    AddName,
    /// `removeName(index)`.
    RemoveName,
}

impl Action {
    const fn slot(self) -> usize {
        match self {
            Self::AddName => 0,
            Self::RemoveName => 1,
        }
    }

    /// Notice shown when the action fails.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::AddName => "Failed to update name.",
            Self::RemoveName => "Failed to remove name.",
        }
    }

    /// Message shown while the action's status is `Succeeded`.
    #[must_use]
    pub const fn success_message(self, refresh: RefreshPolicy) -> &'static str {
        match (self, refresh) {
            (Self::AddName, RefreshPolicy::Manual) => {
                "Name added to array! Run Get All Names again to see the updated array!"
            }
            (Self::RemoveName, RefreshPolicy::Manual) => {
                "Name removed from array! Run Get All Names again to see the updated array!"
            }
            (Self::AddName, RefreshPolicy::AfterMutation) => "Name added to array!",
            (Self::RemoveName, RefreshPolicy::AfterMutation) => "Name removed from array!",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddName => f.write_str("add name"),
            Self::RemoveName => f.write_str("remove name"),
        }
    }
}

/// Status of one mutating action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OperationStatus {
    /// Nothing pending.
    #[default]
    Idle,
    /// Submitted and waiting for confirmation.
    InFlight,
    /// Recently confirmed; reverts to `Idle` after the display timeout.
    Succeeded,
}

/// Names fetched from the contract.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameList {
    names: Vec<String>,
    fetched: bool,
    stale: bool,
}

impl NameList {
    /// The names from the last successful fetch.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Whether a fetch has ever succeeded.
    #[must_use]
    pub const fn is_fetched(&self) -> bool {
        self.fetched
    }

    /// Whether a mutation was confirmed after the last fetch.
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        self.stale
    }

    /// Whether the cached list may be served without refetching.
    #[must_use]
    pub const fn is_fresh(&self) -> bool {
        self.fetched && !self.stale
    }

    /// Names joined for display, e.g. `Alice, Bob`.
    #[must_use]
    pub fn display(&self) -> String {
        self.names.join(", ")
    }

    pub(crate) fn replace(&mut self, names: Vec<String>) {
        self.names = names;
        self.fetched = true;
        self.stale = false;
    }

    pub(crate) const fn invalidate(&mut self) {
        self.stale = true;
    }
}

/// Snapshot of everything a front-end renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Connected account, set by `connect`.
    pub wallet_address: Option<Address>,
    /// Result of `getAllNames`.
    pub names: NameList,
    /// Result of the last `getName`.
    pub name: String,
    /// Input: name to add.
    pub new_name: String,
    /// Input: index to remove.
    pub remove_index: String,
    /// Input: index to read.
    pub get_index: String,
    /// The names output has been requested at least once.
    pub names_visible: bool,
    /// The single-name output has been requested at least once.
    pub name_visible: bool,
    statuses: [OperationStatus; 2],
}

impl ViewState {
    /// Whether a wallet account is connected.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.wallet_address.is_some()
    }

    /// Current status of an action.
    #[must_use]
    pub const fn status(&self, action: Action) -> OperationStatus {
        self.statuses[action.slot()]
    }

    pub(crate) const fn set_status(&mut self, action: Action, status: OperationStatus) {
        self.statuses[action.slot()] = status;
    }

    /// Whether the action is waiting for confirmation.
    #[must_use]
    pub const fn is_loading(&self, action: Action) -> bool {
        matches!(self.status(action), OperationStatus::InFlight)
    }

    /// Line shown next to an action, if any.
    #[must_use]
    pub const fn status_line(&self, action: Action, refresh: RefreshPolicy) -> Option<&'static str> {
        match self.status(action) {
            OperationStatus::Idle => None,
            OperationStatus::InFlight => Some(WAITING_FOR_CONFIRMATION),
            OperationStatus::Succeeded => Some(action.success_message(refresh)),
        }
    }

    pub(crate) fn clear_input(&mut self, action: Action) {
        match action {
            Action::AddName => self.new_name.clear(),
            Action::RemoveName => self.remove_index.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_list_display() {
        let mut list = NameList::default();
        assert_eq!(list.display(), "");
        assert!(!list.is_fresh());

        list.replace(vec!["Alice".into(), "Bob".into()]);
        assert_eq!(list.display(), "Alice, Bob");
        assert!(list.is_fresh());

        list.invalidate();
        assert!(list.is_stale());
        assert!(!list.is_fresh());
        assert_eq!(list.names().len(), 2);
    }

    #[test]
    fn test_status_line() {
        let mut view = ViewState::default();
        assert_eq!(view.status_line(Action::AddName, RefreshPolicy::Manual), None);

        view.set_status(Action::AddName, OperationStatus::InFlight);
        assert!(view.is_loading(Action::AddName));
        assert!(!view.is_loading(Action::RemoveName));
        assert_eq!(
            view.status_line(Action::AddName, RefreshPolicy::Manual),
            Some("Waiting for confirmation...")
        );

        view.set_status(Action::RemoveName, OperationStatus::Succeeded);
        assert_eq!(
            view.status_line(Action::RemoveName, RefreshPolicy::AfterMutation),
            Some("Name removed from array!")
        );
    }

    #[test]
    fn test_clear_input() {
        let mut view = ViewState {
            new_name: "Carol".into(),
            remove_index: "1".into(),
            ..ViewState::default()
        };
        view.clear_input(Action::RemoveName);
        assert_eq!(view.new_name, "Carol");
        assert!(view.remove_index.is_empty());
    }
}
