//! Exchange gateway: a Bybit client extended with buy/sell leverage routing,
//! plus the configuration used by the manual test harness.

pub mod bybit;
pub mod config;

pub use bybit::{BybitExtend, BybitRest, Endpoint, LeverageRoute};
pub use config::{ApiCredentials, BybitSettings, HarnessConfig};
