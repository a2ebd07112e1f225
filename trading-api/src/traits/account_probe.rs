use crate::error::Result;
use crate::model::account::AccountCapabilities;
use async_trait::async_trait;

/// Reports the margin mode of the authenticated account.
#[async_trait]
pub trait AccountProbe: Send + Sync {
    /// Queries the exchange. Results are not cached between calls.
    async fn capabilities(&self) -> Result<AccountCapabilities>;
}
