pub mod account_probe;
pub mod endpoint_invoker;
pub mod market_catalog;

pub use account_probe::AccountProbe;
pub use endpoint_invoker::EndpointInvoker;
pub use market_catalog::MarketCatalog;
