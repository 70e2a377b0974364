//! Wallet action panel.
//!
//! Holds the session and form state, derives contract call requests from them,
//! keeps the balance watch in sync with the current query, and hands write
//! requests to the write gateway.
//!
//! Every derivation is a pure function of the current state. Mutations re-arm
//! both actions, drop their dry-run results and reconcile the balance watch.

use std::{collections::HashMap, sync::Arc, time::Duration};

use alloy::primitives::{Address, U256};
use tokio::sync::watch;

use super::{
    balance_watch::BalanceWatch,
    gateway::{ContractReader, ContractWriter},
};
use crate::{
    config::{Config, DecimalsSource},
    error::AppError,
    types::{
        parse_units, ActionView, BalanceQuery, FormState, FormView, PanelView, Session,
        SubmissionStatus, WalletAction, WriteRequest, CONNECT_PROMPT,
    },
};

/// Title shown at the top of the panel.
pub const PANEL_TITLE: &str = "Simple Token Wallet";

/// Immutable settings the panel is built with.
#[derive(Debug, Clone)]
pub struct PanelSettings {
    /// Token-wallet contract every request targets.
    pub wallet_contract: Address,
    pub decimals: DecimalsSource,
    pub balance_poll_interval: Duration,
}

impl From<&Config> for PanelSettings {
    fn from(config: &Config) -> Self {
        Self {
            wallet_contract: config.wallet_contract,
            decimals: config.decimals,
            balance_poll_interval: config.balance_poll_interval,
        }
    }
}

/// Outcome of the latest dry run for an action.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Preparation {
    Unprepared,
    Ready(WriteRequest),
    Rejected { request: WriteRequest, reason: String },
}

impl Preparation {
    fn request(&self) -> Option<&WriteRequest> {
        match self {
            Preparation::Unprepared => None,
            Preparation::Ready(request) | Preparation::Rejected { request, .. } => Some(request),
        }
    }
}

/// Per-action trigger state.
#[derive(Debug)]
struct ActionSlot {
    /// Cleared by a submission, set again by any input or session change.
    armed: bool,
    preparation: Preparation,
    /// Status of the latest submission.
    status: watch::Receiver<SubmissionStatus>,
}

impl Default for ActionSlot {
    fn default() -> Self {
        let (_, status) = watch::channel(SubmissionStatus::Idle);
        Self { armed: true, preparation: Preparation::Unprepared, status }
    }
}

/// The deposit/withdraw panel.
pub struct WalletActionPanel {
    settings: PanelSettings,
    reader: Arc<dyn ContractReader>,
    writer: Arc<dyn ContractWriter>,
    session: Session,
    form: FormState,
    /// Decimals resolved on-chain for the current token.
    token_decimals: Option<(Address, u8)>,
    balance: Option<BalanceWatch>,
    actions: HashMap<WalletAction, ActionSlot>,
}

impl WalletActionPanel {
    pub fn new(
        settings: PanelSettings,
        reader: Arc<dyn ContractReader>,
        writer: Arc<dyn ContractWriter>,
    ) -> Self {
        let actions = [WalletAction::Deposit, WalletAction::Withdraw]
            .into_iter()
            .map(|action| (action, ActionSlot::default()))
            .collect();

        Self {
            settings,
            reader,
            writer,
            session: Session::disconnected(),
            form: FormState::default(),
            token_decimals: None,
            balance: None,
            actions,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    // ------------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------------

    /// Apply a session change from the wallet provider.
    pub fn set_session(&mut self, session: Session) {
        if self.session == session {
            return;
        }
        tracing::info!(connected = session.connected, account = ?session.account, "Session changed");
        self.session = session;
        self.after_mutation();
    }

    /// Store the token address input. Re-entering the same text is a no-op.
    pub fn on_token_address_change(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.form.token_address == text {
            return;
        }
        self.form.token_address = text;
        self.after_mutation();
    }

    /// Store the amount input. Re-entering the same text is a no-op.
    pub fn on_amount_change(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.form.amount_text == text {
            return;
        }
        self.form.amount_text = text;
        self.after_mutation();
    }

    fn after_mutation(&mut self) {
        for slot in self.actions.values_mut() {
            slot.armed = true;
            slot.preparation = Preparation::Unprepared;
        }
        self.sync_balance_watch();
    }

    /// Start, replace or stop the balance watch so it matches `balance_query()`.
    fn sync_balance_watch(&mut self) {
        let wanted = self.balance_query();
        let current = self.balance.as_ref().map(|w| *w.query());

        if current == wanted {
            return;
        }

        // Dropping the previous watch aborts it before the new one starts.
        self.balance = None;
        if let Some(query) = wanted {
            self.balance = Some(BalanceWatch::spawn(
                self.reader.clone(),
                query,
                self.settings.balance_poll_interval,
            ));
        }
    }

    // ------------------------------------------------------------------------
    // Derivations
    // ------------------------------------------------------------------------

    /// Token address if the input holds a well-formed one.
    fn token(&self) -> Option<Address> {
        parse_token_address(&self.form.token_address)
    }

    /// `balanceOf` request, or `None` while the read is gated off.
    pub fn balance_query(&self) -> Option<BalanceQuery> {
        let user = self.session.active_account()?;
        let token = self.token()?;
        Some(BalanceQuery { contract: self.settings.wallet_contract, user, token })
    }

    /// Decimal scale for amounts of `token`, if known.
    pub fn amount_decimals(&self, token: Address) -> Option<u8> {
        match self.settings.decimals {
            DecimalsSource::Fixed(decimals) => Some(decimals),
            DecimalsSource::OnChain { .. } => self
                .token_decimals
                .filter(|(resolved, _)| *resolved == token)
                .map(|(_, decimals)| decimals),
        }
    }

    /// Request for `action`, or `None` while it is unavailable.
    pub fn write_request(&self, action: WalletAction) -> Option<WriteRequest> {
        self.session.active_account()?;
        let token = self.token()?;
        let decimals = self.amount_decimals(token)?;
        let amount = parse_units(&self.form.amount_text, decimals).ok()?;

        Some(WriteRequest { contract: self.settings.wallet_contract, action, token, amount })
    }

    pub fn deposit_request(&self) -> Option<WriteRequest> {
        self.write_request(WalletAction::Deposit)
    }

    pub fn withdraw_request(&self) -> Option<WriteRequest> {
        self.write_request(WalletAction::Withdraw)
    }

    /// Whether the trigger for `action` can be pressed.
    ///
    /// Requires the current request to have passed its dry run.
    pub fn is_enabled(&self, action: WalletAction) -> bool {
        let Some(request) = self.write_request(action) else {
            return false;
        };
        let slot = &self.actions[&action];
        slot.armed
            && !slot.status.borrow().is_pending()
            && slot.preparation == Preparation::Ready(request)
    }

    // ------------------------------------------------------------------------
    // Preparation
    // ------------------------------------------------------------------------

    /// Current requests with no recorded dry run.
    pub fn preparations_needed(&self) -> Vec<WriteRequest> {
        [WalletAction::Deposit, WalletAction::Withdraw]
            .into_iter()
            .filter_map(|action| {
                let request = self.write_request(action)?;
                let prepared = self.actions[&action].preparation.request();
                (prepared != Some(&request)).then_some(request)
            })
            .collect()
    }

    /// Record a dry-run outcome. Ignored if the request is no longer current.
    pub fn record_preparation(
        &mut self,
        request: WriteRequest,
        outcome: Result<(), AppError>,
    ) -> bool {
        if self.write_request(request.action) != Some(request) {
            tracing::debug!(action = %request.action, "Discarding preparation for stale request");
            return false;
        }

        let preparation = match outcome {
            Ok(()) => Preparation::Ready(request),
            Err(e) => {
                tracing::info!(
                    action = %request.action,
                    token = %request.token,
                    amount = %request.amount,
                    error = %e,
                    "Wallet call would revert"
                );
                Preparation::Rejected { request, reason: e.to_string() }
            }
        };
        if let Some(slot) = self.actions.get_mut(&request.action) {
            slot.preparation = preparation;
        }
        true
    }

    // ------------------------------------------------------------------------
    // Token decimals
    // ------------------------------------------------------------------------

    /// Token whose decimals must be fetched before amounts can be scaled.
    pub fn decimals_lookup_needed(&self) -> Option<Address> {
        if !matches!(self.settings.decimals, DecimalsSource::OnChain { .. }) {
            return None;
        }
        let token = self.token()?;
        self.amount_decimals(token).is_none().then_some(token)
    }

    /// Record a decimals lookup result. Ignored if the token input has moved on.
    pub fn record_token_decimals(&mut self, token: Address, decimals: Option<u8>) -> bool {
        if self.token() != Some(token) {
            tracing::debug!(token = %token, "Discarding decimals for stale token");
            return false;
        }
        let decimals = decimals.unwrap_or_else(|| self.settings.decimals.fallback());
        self.token_decimals = Some((token, decimals));
        true
    }

    // ------------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------------

    /// Hand the current request for `action` to the write gateway.
    ///
    /// Returns the submitted request, or `None` if the action was disabled.
    /// The gateway runs on its own task; its outcome shows up in the action's
    /// status.
    pub fn submit(&mut self, action: WalletAction) -> Option<WriteRequest> {
        if !self.is_enabled(action) {
            tracing::debug!(action = %action, "Submission ignored: action disabled");
            return None;
        }
        let request = self.write_request(action)?;

        let (tx, status) = watch::channel(SubmissionStatus::Pending);
        if let Some(slot) = self.actions.get_mut(&action) {
            slot.armed = false;
            slot.status = status;
        }

        tracing::info!(
            action = %action,
            token = %request.token,
            amount = %request.amount,
            "Submitting wallet call"
        );

        let writer = self.writer.clone();
        tokio::spawn(async move {
            let outcome = match writer.submit(&request).await {
                Ok(tx_hash) => SubmissionStatus::Confirmed { tx_hash: format!("{tx_hash:?}") },
                Err(e) => {
                    tracing::warn!(action = %request.action, error = %e, "Wallet call failed");
                    SubmissionStatus::Failed { reason: e.to_string() }
                }
            };
            let _ = tx.send(outcome);
        });

        Some(request)
    }

    pub fn submit_deposit(&mut self) -> Option<WriteRequest> {
        self.submit(WalletAction::Deposit)
    }

    pub fn submit_withdraw(&mut self) -> Option<WriteRequest> {
        self.submit(WalletAction::Withdraw)
    }

    /// Receiver for the latest submission status of `action`.
    pub fn submission_updates(&self, action: WalletAction) -> watch::Receiver<SubmissionStatus> {
        self.actions[&action].status.clone()
    }

    // ------------------------------------------------------------------------
    // Balance
    // ------------------------------------------------------------------------

    /// Last fetched balance for the current query.
    pub fn balance(&self) -> Option<U256> {
        self.balance.as_ref().and_then(BalanceWatch::latest)
    }

    /// Receiver for balance updates of the current query, if one is active.
    pub fn balance_updates(&self) -> Option<watch::Receiver<Option<U256>>> {
        self.balance.as_ref().map(BalanceWatch::subscribe)
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    pub fn render(&self) -> PanelView {
        let title = PANEL_TITLE.to_string();

        let Some(account) = self.session.active_account() else {
            return PanelView {
                title,
                connected: false,
                account: None,
                message: Some(CONNECT_PROMPT.to_string()),
                form: None,
            };
        };

        let action_view = |action: WalletAction| {
            let request = self.write_request(action);
            let slot = &self.actions[&action];
            let preparation_error = match &slot.preparation {
                Preparation::Rejected { request: rejected, reason }
                    if Some(*rejected) == request =>
                {
                    Some(reason.clone())
                }
                _ => None,
            };

            ActionView {
                enabled: self.is_enabled(action),
                request: request.map(|r| r.parameters()),
                preparation_error,
                status: slot.status.borrow().clone(),
            }
        };

        let form = FormView {
            token_address: self.form.token_address.clone(),
            amount: self.form.amount_text.clone(),
            decimals: self.token().and_then(|token| self.amount_decimals(token)),
            deposit: action_view(WalletAction::Deposit),
            withdraw: action_view(WalletAction::Withdraw),
            balance: self.balance().map(|b| b.to_string()).unwrap_or_else(|| "0".to_string()),
        };

        PanelView {
            title,
            connected: true,
            account: Some(format!("{account:?}")),
            message: None,
            form: Some(form),
        }
    }
}

/// Parse a token address typed by the user.
///
/// Only `0x` followed by 40 hex characters is accepted; anything else keeps
/// the dependent requests gated off.
fn parse_token_address(s: &str) -> Option<Address> {
    let trimmed = s.trim();

    if !trimmed.starts_with("0x") && !trimmed.starts_with("0X") {
        return None;
    }
    if trimmed.len() != 42 {
        return None;
    }

    trimmed.parse::<Address>().ok()
}
