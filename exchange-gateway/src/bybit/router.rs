//! Routing of buy/sell leverage requests.
//!
//! Bybit exposes four leverage endpoints. Which one applies depends on the
//! account mode and on how the market settles; sending to the wrong one
//! either fails or changes leverage in the wrong subsystem.

use super::endpoint::Endpoint;
use log::debug;
use trading::{AccountCapabilities, ExchangeError, LeveragePair, Market, Params, Result};

/// Settlement currency served by the legacy USDC perpetual API.
pub const USDC: &str = "USDC";

/// `category` field of the unified endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Linear,
    Option,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Linear => "linear",
            Category::Option => "option",
        }
    }
}

/// One of the four mutually exclusive leverage request paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeverageRoute {
    /// Unified trading account, linear contracts only.
    UnifiedAccount,
    /// Unified margin account, linear or option contracts.
    UnifiedMargin(Category),
    /// Classic derivatives account, any market not settled in USDC.
    Contract,
    /// USDC-settled perpetual on a classic account.
    UsdcPerpetual,
}

impl LeverageRoute {
    /// Picks the route for `market` under `capabilities`. The first matching
    /// rule wins: unified account, then unified margin, then settlement.
    pub fn resolve(market: &Market, capabilities: AccountCapabilities) -> Result<Self> {
        let route = if capabilities.unified_trading_account() {
            if !market.is_linear() {
                return Err(ExchangeError::NotSupported(format!(
                    "bybit leverage in a unified account supports linear markets only, {} is {}",
                    market.symbol(),
                    market.contract_type().as_str()
                )));
            }
            LeverageRoute::UnifiedAccount
        } else if capabilities.unified_margin() {
            if market.is_option() {
                LeverageRoute::UnifiedMargin(Category::Option)
            } else if market.is_linear() {
                LeverageRoute::UnifiedMargin(Category::Linear)
            } else {
                return Err(ExchangeError::NotSupported(format!(
                    "bybit leverage in unified margin does not support inverse market {}",
                    market.symbol()
                )));
            }
        } else if !market.settles_in(USDC) {
            LeverageRoute::Contract
        } else {
            LeverageRoute::UsdcPerpetual
        };

        debug!(
            "Leverage route for {} ({:?}): {:?}",
            market.symbol(),
            capabilities,
            route
        );
        Ok(route)
    }

    pub fn endpoint(&self) -> Endpoint {
        match self {
            LeverageRoute::UnifiedAccount => Endpoint::PositionSetLeverageV5,
            LeverageRoute::UnifiedMargin(_) => Endpoint::UnifiedPositionSetLeverageV3,
            LeverageRoute::Contract => Endpoint::ContractPositionSetLeverageV3,
            LeverageRoute::UsdcPerpetual => Endpoint::UsdcPerpetualLeverageSave,
        }
    }

    /// Builds the request body for `market`.
    ///
    /// The USDC perpetual path has a single `leverage` field, so differing
    /// buy and sell values are rejected there.
    pub fn request(&self, market: &Market, leverage: LeveragePair) -> Result<Params> {
        let buy = leverage.buy().to_wire_string();
        let sell = leverage.sell().to_wire_string();

        let request = match self {
            LeverageRoute::UnifiedAccount => {
                asymmetric_body(market, buy, sell).with("category", Category::Linear.as_str())
            }
            LeverageRoute::UnifiedMargin(category) => {
                asymmetric_body(market, buy, sell).with("category", category.as_str())
            }
            LeverageRoute::Contract => asymmetric_body(market, buy, sell),
            LeverageRoute::UsdcPerpetual => {
                if !leverage.is_symmetric() {
                    return Err(ExchangeError::AsymmetricLeverage {
                        endpoint: self.endpoint().path().to_string(),
                        buy,
                        sell,
                    });
                }
                Params::new()
                    .with("symbol", market.id())
                    .with("leverage", buy)
            }
        };
        Ok(request)
    }
}

fn asymmetric_body(market: &Market, buy: String, sell: String) -> Params {
    Params::new()
        .with("symbol", market.id())
        .with("buyLeverage", buy)
        .with("sellLeverage", sell)
}
