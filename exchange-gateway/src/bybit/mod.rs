//! Bybit client extension adding asymmetric buy/sell leverage.

use log::info;
use serde_json::Value;
use trading::{
    AccountProbe, EndpointInvoker, ExchangeError, Leverage, LeveragePair, MarketCatalog, Params,
    Result,
};

pub mod endpoint;
pub mod mock;
pub mod parser;
pub mod rest;
pub mod router;
pub mod signing;

pub use endpoint::Endpoint;
pub use rest::BybitRest;
pub use router::{Category, LeverageRoute};

#[cfg(test)]
mod tests;

const SET_LEVERAGE: &str = "set_buy_and_sell_leverage";

/// Wraps a Bybit client and adds `set_buy_and_sell_leverage`.
///
/// The wrapped client supplies the market catalog, the account mode probe
/// and the signed transport; this type only decides where the request goes
/// and what it contains.
pub struct BybitExtend<C> {
    client: C,
    default_symbol: Option<String>,
}

impl<C> BybitExtend<C>
where
    C: MarketCatalog + AccountProbe + EndpointInvoker<Endpoint = Endpoint>,
{
    pub fn new(client: C) -> Self {
        Self {
            client,
            default_symbol: None,
        }
    }

    /// Market used when a call passes no symbol.
    pub fn with_default_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.default_symbol = Some(symbol.into());
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Sets separate leverage for the buy and sell side of a market.
    ///
    /// WARNING: raising leverage moves the liquidation price of open isolated
    /// positions closer to the mark price.
    ///
    /// # Arguments
    ///
    /// * `buy_leverage` - Leverage for long positions.
    /// * `sell_leverage` - Leverage for short positions.
    /// * `symbol` - Unified symbol or exchange id; falls back to the default market.
    /// * `params` - Extra fields merged over the computed request, winning on collision.
    ///
    /// # Returns
    ///
    /// * `Value` - The exchange response, unmodified.
    pub async fn set_buy_and_sell_leverage(
        &self,
        buy_leverage: Leverage,
        sell_leverage: Leverage,
        symbol: Option<&str>,
        params: Params,
    ) -> Result<Value> {
        let symbol = self.required_symbol(symbol)?;

        self.client.load_markets(false).await?;
        let market = self.client.market(symbol)?;
        let capabilities = self.client.capabilities().await?;

        let route = LeverageRoute::resolve(&market, capabilities)?;
        let request = route
            .request(&market, LeveragePair::new(buy_leverage, sell_leverage))?
            .extend(params);

        info!(
            "Setting leverage on {} via {}: buy {} sell {}",
            market.id(),
            route.endpoint(),
            buy_leverage,
            sell_leverage
        );
        self.client.invoke(route.endpoint(), request).await
    }

    fn required_symbol<'a>(&'a self, symbol: Option<&'a str>) -> Result<&'a str> {
        symbol
            .or(self.default_symbol.as_deref())
            .ok_or(ExchangeError::MissingSymbol {
                operation: SET_LEVERAGE,
            })
    }
}
