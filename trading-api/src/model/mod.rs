pub mod account;
pub mod leverage;
pub mod market;
pub mod params;

pub use account::AccountCapabilities;
pub use leverage::{Leverage, LeveragePair};
pub use market::{ContractType, Market, MarketIndex};
pub use params::Params;
