//! Decoding of Bybit response bodies into trading models.

use log::debug;
use serde::Deserialize;
use serde_json::Value;
use trading::{AccountCapabilities, ContractType, ExchangeError, Market, Params, Result};

/// Instrument categories listed by `/v5/market/instruments-info`.
pub const CATEGORIES: [&str; 3] = ["linear", "inverse", "option"];

/// Option underlyings. Without `baseCoin` the listing only returns BTC options.
pub const OPTION_BASE_COINS: [&str; 3] = ["BTC", "ETH", "SOL"];

/// One instrument listing query per category, and per base coin for options.
pub fn listing_queries() -> Vec<(&'static str, Params)> {
    let mut queries = Vec::new();
    for category in CATEGORIES {
        if category == "option" {
            for coin in OPTION_BASE_COINS {
                queries.push((
                    category,
                    Params::new().with("category", category).with("baseCoin", coin),
                ));
            }
        } else {
            queries.push((category, Params::new().with("category", category)));
        }
    }
    queries
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInstrument {
    symbol: String,
    base_coin: String,
    quote_coin: String,
    settle_coin: String,
    #[serde(default)]
    contract_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InstrumentPage {
    #[serde(default)]
    pub list: Vec<Value>,
    #[serde(default)]
    pub next_page_cursor: Option<String>,
}

/// Extracts the `result` object of a v5 response.
pub(crate) fn result(body: &Value) -> Result<&Value> {
    body.get("result")
        .filter(|r| r.is_object())
        .ok_or_else(|| ExchangeError::MalformedResponse("missing 'result' object".to_string()))
}

pub(crate) fn parse_instrument_page(body: &Value) -> Result<InstrumentPage> {
    Ok(InstrumentPage::deserialize(result(body)?)?)
}

/// Converts one instrument listing into a `Market`.
///
/// Perpetuals get a unified `BASE/QUOTE:SETTLE` symbol; dated futures and
/// options keep their exchange id as symbol. Returns `None` for entries that
/// cannot be decoded.
pub fn parse_market(category: &str, item: &Value) -> Option<Market> {
    let raw = match RawInstrument::deserialize(item) {
        Ok(raw) => raw,
        Err(e) => {
            debug!("Skipping undecodable {} instrument: {}", category, e);
            return None;
        }
    };

    let contract_type = match category {
        "linear" => ContractType::Linear,
        "inverse" => ContractType::Inverse,
        "option" => ContractType::Option,
        _ => return None,
    };

    let is_perpetual = raw
        .contract_type
        .as_deref()
        .is_some_and(|t| t.ends_with("Perpetual"));

    let symbol = if is_perpetual {
        format!("{}/{}:{}", raw.base_coin, raw.quote_coin, raw.settle_coin)
    } else {
        raw.symbol.clone()
    };

    Some(Market::new(
        raw.symbol,
        symbol,
        raw.base_coin,
        raw.quote_coin,
        raw.settle_coin,
        contract_type,
    ))
}

/// Reads the account mode flags from a `/v5/user/query-api` response.
///
/// Both flags are reported as `1` when enabled.
pub fn parse_capabilities(body: &Value) -> Result<AccountCapabilities> {
    let result = result(body)?;
    let flag = |key: &str| match result.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(v) => v.as_i64() == Some(1) || v.as_str() == Some("1"),
        None => false,
    };
    Ok(AccountCapabilities::new(flag("unified"), flag("uta")))
}
