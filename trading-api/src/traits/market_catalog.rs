//! Defines the `MarketCatalog` trait for resolving unified symbols.

use crate::error::Result;
use crate::model::market::Market;
use async_trait::async_trait;

/// A source of market definitions.
///
/// Implementors fetch the exchange's instrument listing once and answer
/// lookups from memory afterwards.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use trading::{ExchangeError, Market, MarketCatalog, MarketIndex, Result};
///
/// struct StaticCatalog(MarketIndex);
///
/// #[async_trait]
/// impl MarketCatalog for StaticCatalog {
///     async fn load_markets(&self, _reload: bool) -> Result<usize> {
///         Ok(self.0.len())
///     }
///
///     fn market(&self, symbol: &str) -> Result<Market> {
///         self.0
///             .get(symbol)
///             .cloned()
///             .ok_or_else(|| ExchangeError::MarketNotFound(symbol.to_string()))
///     }
/// }
/// ```
#[async_trait]
pub trait MarketCatalog: Send + Sync {
    /// Loads the market listing, or returns immediately when it is already
    /// loaded and `reload` is false.
    ///
    /// # Returns
    ///
    /// * `usize` - The number of markets available after the call.
    async fn load_markets(&self, reload: bool) -> Result<usize>;

    /// Resolves a unified symbol or exchange id.
    ///
    /// Fails with `MarketsNotLoaded` before the first `load_markets`, and
    /// with `MarketNotFound` when nothing matches.
    fn market(&self, symbol: &str) -> Result<Market>;
}
