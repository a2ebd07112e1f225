//! Account mode flags reported by the exchange.

use serde::{Deserialize, Serialize};

/// Margin-mode capabilities of the authenticated account.
///
/// The two flags are independent: an account may report either, both or
/// neither. They are read fresh on each call that depends on them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountCapabilities {
    unified_margin: bool,
    unified_trading_account: bool,
}

impl AccountCapabilities {
    pub fn new(unified_margin: bool, unified_trading_account: bool) -> Self {
        Self {
            unified_margin,
            unified_trading_account,
        }
    }

    /// A classic (non-unified) derivatives account.
    pub fn classic() -> Self {
        Self::default()
    }

    pub fn unified_margin(&self) -> bool {
        self.unified_margin
    }

    pub fn unified_trading_account(&self) -> bool {
        self.unified_trading_account
    }
}
