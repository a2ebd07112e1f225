//! In-memory Bybit client for exercising request routing without a network.

use super::endpoint::Endpoint;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use trading::{
    AccountCapabilities, AccountProbe, EndpointInvoker, ExchangeError, Market, MarketCatalog,
    MarketIndex, Params, Result,
};

/// Serves a fixed market list and account mode, and records every invoked
/// endpoint instead of sending it.
pub struct MockBybit {
    markets: MarketIndex,
    capabilities: AccountCapabilities,
    response: Value,
    rejection: Option<(i64, String)>,
    loads: AtomicUsize,
    calls: Mutex<Vec<(Endpoint, Params)>>,
}

impl MockBybit {
    pub fn new(capabilities: AccountCapabilities) -> Self {
        Self {
            markets: MarketIndex::new(),
            capabilities,
            response: json!({"retCode": 0, "retMsg": "OK", "result": {}}),
            rejection: None,
            loads: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_market(mut self, market: Market) -> Self {
        self.markets.insert(market);
        self
    }

    /// Body returned by every invocation.
    pub fn with_response(mut self, response: Value) -> Self {
        self.response = response;
        self
    }

    /// Makes every invocation fail with an exchange error code.
    pub fn with_exchange_error(mut self, code: i64, message: impl Into<String>) -> Self {
        self.rejection = Some((code, message.into()));
        self
    }

    pub fn calls(&self) -> Vec<(Endpoint, Params)> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketCatalog for MockBybit {
    async fn load_markets(&self, _reload: bool) -> Result<usize> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.markets.len())
    }

    fn market(&self, symbol: &str) -> Result<Market> {
        if self.load_count() == 0 {
            return Err(ExchangeError::MarketsNotLoaded);
        }
        self.markets
            .get(symbol)
            .cloned()
            .ok_or_else(|| ExchangeError::MarketNotFound(symbol.to_string()))
    }
}

#[async_trait]
impl AccountProbe for MockBybit {
    async fn capabilities(&self) -> Result<AccountCapabilities> {
        Ok(self.capabilities)
    }
}

#[async_trait]
impl EndpointInvoker for MockBybit {
    type Endpoint = Endpoint;

    async fn invoke(&self, endpoint: Endpoint, params: Params) -> Result<Value> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((endpoint, params));

        match &self.rejection {
            Some((code, message)) => Err(ExchangeError::Exchange {
                code: *code,
                message: message.clone(),
            }),
            None => Ok(self.response.clone()),
        }
    }
}
