//! Authenticated Bybit REST client.
//!
//! Implements the three collaborator traits the leverage extension relies
//! on: the market catalog, the account probe and the endpoint invoker.

use super::endpoint::{Endpoint, MAINNET_URL, TESTNET_URL};
use super::{parser, signing};
use crate::config::{ApiCredentials, BybitSettings};
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use reqwest::Method;
use serde_json::Value;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;
use trading::{
    AccountCapabilities, AccountProbe, EndpointInvoker, ExchangeError, Market, MarketCatalog,
    MarketIndex, Params, Result,
};

/// Page size requested from the instrument listing.
const INSTRUMENTS_PAGE_LIMIT: u32 = 1000;

pub struct BybitRest {
    http: reqwest::Client,
    credentials: Option<ApiCredentials>,
    base_url: String,
    recv_window: u64,
    markets: RwLock<Option<MarketIndex>>,
}

impl BybitRest {
    /// Creates a client. Without credentials only public endpoints work.
    pub fn new(settings: &BybitSettings, credentials: Option<ApiCredentials>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs()))
            .build()
            .map_err(ExchangeError::transport)?;

        let mut client = Self {
            http,
            credentials,
            base_url: MAINNET_URL.to_string(),
            recv_window: settings.recv_window(),
            markets: RwLock::new(None),
        };
        client.set_sandbox_mode(settings.sandbox());
        Ok(client)
    }

    /// Switches between testnet and mainnet. A `url` in the credentials
    /// takes precedence over both.
    pub fn set_sandbox_mode(&mut self, enabled: bool) {
        self.base_url = match self.credentials.as_ref().and_then(ApiCredentials::url) {
            Some(url) => url.trim_end_matches('/').to_string(),
            None if enabled => TESTNET_URL.to_string(),
            None => MAINNET_URL.to_string(),
        };
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Snapshot of the loaded markets, empty before `load_markets`.
    pub fn markets(&self) -> Vec<Market> {
        let guard = self.markets.read().unwrap_or_else(PoisonError::into_inner);
        guard
            .as_ref()
            .map(|index| index.iter().cloned().collect())
            .unwrap_or_default()
    }

    async fn request(&self, endpoint: Endpoint, params: &Params) -> Result<Value> {
        let method = endpoint.method();
        let url = format!("{}{}", self.base_url, endpoint.path());

        // GET signs the query string, POST signs the JSON body.
        let (payload, builder) = if method == Method::GET {
            let query = query_string(params);
            let full_url = if query.is_empty() {
                url
            } else {
                format!("{url}?{query}")
            };
            (query, self.http.get(full_url))
        } else {
            let body = serde_json::to_string(params)?;
            (body.clone(), self.http.post(url).body(body))
        };

        let builder = if endpoint.is_private() {
            let credentials = self
                .credentials
                .as_ref()
                .ok_or_else(|| ExchangeError::MissingCredentials(endpoint.to_string()))?;
            let headers = signing::auth_headers(
                credentials.api_key(),
                credentials.secret_key(),
                Utc::now().timestamp_millis(),
                self.recv_window,
                &payload,
            )
            .map_err(ExchangeError::transport)?;
            builder.headers(headers)
        } else {
            builder
        };

        debug!("Sending {} {}", endpoint, payload);
        let response = builder.send().await.map_err(ExchangeError::transport)?;
        let status = response.status();
        let text = response.text().await.map_err(ExchangeError::transport)?;

        let body: Value = match serde_json::from_str(&text) {
            Ok(body) => body,
            Err(_) if !status.is_success() => {
                return Err(ExchangeError::Exchange {
                    code: i64::from(status.as_u16()),
                    message: text,
                });
            }
            Err(e) => return Err(e.into()),
        };

        check_ret_code(&body)?;
        if !status.is_success() {
            return Err(ExchangeError::Exchange {
                code: i64::from(status.as_u16()),
                message: text,
            });
        }
        Ok(body)
    }

    /// Walks every page of one instrument listing query.
    async fn fetch_listing(&self, category: &str, query: &Params) -> Result<Vec<Market>> {
        let mut markets = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut params = query.clone().with("limit", INSTRUMENTS_PAGE_LIMIT);
            if let Some(cursor) = cursor.take() {
                params.insert("cursor", cursor);
            }

            let body = self.request(Endpoint::MarketInstrumentsInfo, &params).await?;
            let page = parser::parse_instrument_page(&body)?;
            markets.extend(
                page.list
                    .iter()
                    .filter_map(|item| parser::parse_market(category, item)),
            );

            match page.next_page_cursor.filter(|c| !c.is_empty()) {
                Some(next) if !page.list.is_empty() => cursor = Some(next),
                _ => break,
            }
        }

        debug!("Fetched {} markets for {:?}", markets.len(), query);
        Ok(markets)
    }
}

/// `key=value` pairs joined by `&`, in key order. Values are sent as given;
/// cursors returned by the exchange are already percent-encoded.
fn query_string(params: &Params) -> String {
    let mut pairs: Vec<String> = params
        .iter()
        .map(|(key, value)| match value {
            Value::String(s) => format!("{key}={s}"),
            other => format!("{key}={other}"),
        })
        .collect();
    pairs.sort();
    pairs.join("&")
}

/// Fails on a non-zero `retCode` (v3/v5) or `ret_code` (v1).
fn check_ret_code(body: &Value) -> Result<()> {
    let code = body
        .get("retCode")
        .or_else(|| body.get("ret_code"))
        .and_then(Value::as_i64);

    match code {
        Some(code) if code != 0 => {
            let message = body
                .get("retMsg")
                .or_else(|| body.get("ret_msg"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            warn!("Bybit returned error {}: {}", code, message);
            Err(ExchangeError::Exchange { code, message })
        }
        _ => Ok(()),
    }
}

#[async_trait]
impl EndpointInvoker for BybitRest {
    type Endpoint = Endpoint;

    async fn invoke(&self, endpoint: Endpoint, params: Params) -> Result<Value> {
        self.request(endpoint, &params).await
    }
}

#[async_trait]
impl AccountProbe for BybitRest {
    async fn capabilities(&self) -> Result<AccountCapabilities> {
        let body = self.request(Endpoint::UserQueryApi, &Params::new()).await?;
        parser::parse_capabilities(&body)
    }
}

#[async_trait]
impl MarketCatalog for BybitRest {
    async fn load_markets(&self, reload: bool) -> Result<usize> {
        if !reload {
            let guard = self.markets.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(index) = guard.as_ref() {
                return Ok(index.len());
            }
        }

        info!("Loading Bybit markets from {} (reload: {})", self.base_url, reload);
        let mut index = MarketIndex::new();
        for (category, query) in parser::listing_queries() {
            for market in self.fetch_listing(category, &query).await? {
                index.insert(market);
            }
        }

        let count = index.len();
        *self.markets.write().unwrap_or_else(PoisonError::into_inner) = Some(index);
        info!("Loaded {} Bybit markets", count);
        Ok(count)
    }

    fn market(&self, symbol: &str) -> Result<Market> {
        let guard = self.markets.read().unwrap_or_else(PoisonError::into_inner);
        let index = guard.as_ref().ok_or(ExchangeError::MarketsNotLoaded)?;
        index
            .get(symbol)
            .cloned()
            .ok_or_else(|| ExchangeError::MarketNotFound(symbol.to_string()))
    }
}
