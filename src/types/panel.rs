//! Panel state and rendered views.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use super::CallParameters;

/// Prompt shown in place of the panel while no wallet is connected.
pub const CONNECT_PROMPT: &str = "Please connect your wallet.";

/// Wallet connection as seen by the panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    pub connected: bool,
    pub account: Option<Address>,
}

impl Session {
    pub fn connected(account: Address) -> Self {
        Self { connected: true, account: Some(account) }
    }

    pub fn disconnected() -> Self {
        Self::default()
    }

    /// The account requests should be issued for, if any.
    pub fn active_account(&self) -> Option<Address> {
        if self.connected {
            self.account
        } else {
            None
        }
    }
}

/// Raw user input. Stored verbatim; validation happens at derivation time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub token_address: String,
    pub amount_text: String,
}

/// Lifecycle of the latest submission for one action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// Nothing submitted since the last input change.
    #[default]
    Idle,
    /// Handed to the write gateway; not yet mined.
    Pending,
    /// Mined successfully.
    Confirmed { tx_hash: String },
    /// Simulation, signing, broadcast or execution failed.
    Failed { reason: String },
}

impl SubmissionStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, SubmissionStatus::Pending)
    }
}

/// One action button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionView {
    pub enabled: bool,
    /// Call the button would submit, when computable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<CallParameters>,
    /// Why the dry run of `request` was rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preparation_error: Option<String>,
    pub status: SubmissionStatus,
}

/// Inputs, actions and balance, shown only while connected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormView {
    pub token_address: String,
    pub amount: String,
    /// Decimal scale applied to `amount`.
    pub decimals: Option<u8>,
    pub deposit: ActionView,
    pub withdraw: ActionView,
    /// Raw smallest-unit balance, `"0"` until a value arrives.
    pub balance: String,
}

/// Full panel rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelView {
    pub title: String,
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<FormView>,
}
