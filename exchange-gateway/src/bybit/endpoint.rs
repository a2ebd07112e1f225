//! Bybit REST endpoints reachable through `BybitRest`.

use reqwest::Method;
use std::fmt;

pub const MAINNET_URL: &str = "https://api.bybit.com";
pub const TESTNET_URL: &str = "https://api-testnet.bybit.com";

/// Typed endpoint identifiers. Each variant maps to one HTTP method and path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Unified trading account leverage (v5).
    PositionSetLeverageV5,
    /// Unified margin leverage (v3).
    UnifiedPositionSetLeverageV3,
    /// Classic derivatives account leverage (contract v3).
    ContractPositionSetLeverageV3,
    /// USDC perpetual leverage (openapi v1).
    UsdcPerpetualLeverageSave,
    /// Instrument listing per category.
    MarketInstrumentsInfo,
    /// API key information, including account mode flags.
    UserQueryApi,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::PositionSetLeverageV5 => "/v5/position/set-leverage",
            Endpoint::UnifiedPositionSetLeverageV3 => "/unified/v3/private/position/set-leverage",
            Endpoint::ContractPositionSetLeverageV3 => "/contract/v3/private/position/set-leverage",
            Endpoint::UsdcPerpetualLeverageSave => {
                "/perpetual/usdc/openapi/private/v1/position/leverage/save"
            }
            Endpoint::MarketInstrumentsInfo => "/v5/market/instruments-info",
            Endpoint::UserQueryApi => "/v5/user/query-api",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Endpoint::MarketInstrumentsInfo | Endpoint::UserQueryApi => Method::GET,
            _ => Method::POST,
        }
    }

    /// Private endpoints are signed with the account's API key.
    pub fn is_private(&self) -> bool {
        !matches!(self, Endpoint::MarketInstrumentsInfo)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}
