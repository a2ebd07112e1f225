//! Defines the data models for tradable derivatives markets.
//!
//! This module contains the `Market` record published by an exchange's
//! market catalog and `MarketIndex`, the in-memory lookup built from it.

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a contract is margined and settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractType {
    /// Quoted and settled in the quote currency (e.g. BTCUSDT).
    Linear,
    /// Quoted in USD, settled in the base coin (e.g. BTCUSD).
    Inverse,
    Option,
}

impl ContractType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractType::Linear => "linear",
            ContractType::Inverse => "inverse",
            ContractType::Option => "option",
        }
    }
}

/// A tradable instrument as listed by the exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    /// Exchange-side identifier sent on the wire (e.g. "BTCUSDT").
    id: String,

    /// Unified symbol (e.g. "BTC/USDT:USDT").
    symbol: String,

    base: String,
    quote: String,

    /// Currency the contract settles in (e.g. "USDT", "USDC", "BTC").
    settle: String,

    contract_type: ContractType,
}

impl Market {
    /// Creates a new Market.
    ///
    /// # Arguments
    ///
    /// * `id` - The exchange-side identifier.
    /// * `symbol` - The unified symbol.
    /// * `base` - The base currency.
    /// * `quote` - The quote currency.
    /// * `settle` - The settlement currency.
    /// * `contract_type` - Linear, inverse or option.
    pub fn new(
        id: impl Into<String>,
        symbol: impl Into<String>,
        base: impl Into<String>,
        quote: impl Into<String>,
        settle: impl Into<String>,
        contract_type: ContractType,
    ) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            base: base.into(),
            quote: quote.into(),
            settle: settle.into(),
            contract_type,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn quote(&self) -> &str {
        &self.quote
    }

    pub fn settle(&self) -> &str {
        &self.settle
    }

    pub fn contract_type(&self) -> ContractType {
        self.contract_type
    }

    pub fn is_linear(&self) -> bool {
        self.contract_type == ContractType::Linear
    }

    pub fn is_inverse(&self) -> bool {
        self.contract_type == ContractType::Inverse
    }

    pub fn is_option(&self) -> bool {
        self.contract_type == ContractType::Option
    }

    /// Case-insensitive check of the settlement currency.
    pub fn settles_in(&self, currency: &str) -> bool {
        self.settle.eq_ignore_ascii_case(currency)
    }
}

/// Markets indexed by unified symbol, with a secondary index on exchange id.
#[derive(Debug, Clone, Default)]
pub struct MarketIndex {
    by_symbol: HashMap<String, Market>,
    symbol_by_id: HashMap<String, String>,
}

impl MarketIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a market. The first market registered under a symbol wins.
    ///
    /// Returns `false` when the symbol was already taken.
    pub fn insert(&mut self, market: Market) -> bool {
        if self.by_symbol.contains_key(market.symbol()) {
            warn!(
                "Duplicate market symbol {} (id {}), keeping the first listing",
                market.symbol(),
                market.id()
            );
            return false;
        }
        self.symbol_by_id
            .entry(market.id().to_string())
            .or_insert_with(|| market.symbol().to_string());
        self.by_symbol.insert(market.symbol().to_string(), market);
        true
    }

    /// Resolves a unified symbol first, then an exchange id.
    pub fn get(&self, symbol_or_id: &str) -> Option<&Market> {
        self.by_symbol.get(symbol_or_id).or_else(|| {
            self.symbol_by_id
                .get(symbol_or_id)
                .and_then(|symbol| self.by_symbol.get(symbol))
        })
    }

    pub fn len(&self) -> usize {
        self.by_symbol.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Market> {
        self.by_symbol.values()
    }
}

impl FromIterator<Market> for MarketIndex {
    fn from_iter<I: IntoIterator<Item = Market>>(iter: I) -> Self {
        let mut index = MarketIndex::new();
        for market in iter {
            index.insert(market);
        }
        index
    }
}
