//! Ethereum network constants.
//!
//! Contains defaults for the token-wallet panel.

use std::time::Duration;

// ============================================================================
// Panel Defaults
// ============================================================================

/// Decimal scale applied to amounts when nothing else is configured.
pub const DEFAULT_AMOUNT_DECIMALS: u8 = 18;

/// Default period of the balance watch.
pub const DEFAULT_BALANCE_POLL_INTERVAL: Duration = Duration::from_millis(4_000);
