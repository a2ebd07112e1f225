//! Exchange-facing models and collaborator traits shared by the gateway crates.
//!
//! The types here describe what an exchange client must provide (a market
//! catalog, an account probe and an authenticated endpoint invoker) without
//! tying callers to a particular transport.

pub mod error;
pub mod model;
pub mod traits;

pub use error::{ExchangeError, Result};
pub use model::account::AccountCapabilities;
pub use model::leverage::{Leverage, LeveragePair};
pub use model::market::{ContractType, Market, MarketIndex};
pub use model::params::Params;
pub use traits::account_probe::AccountProbe;
pub use traits::endpoint_invoker::EndpointInvoker;
pub use traits::market_catalog::MarketCatalog;

pub mod prelude {
    pub use crate::error::{ExchangeError, Result};
    pub use crate::model::{AccountCapabilities, Leverage, LeveragePair, Market, Params};
    pub use crate::traits::{AccountProbe, EndpointInvoker, MarketCatalog};
}
