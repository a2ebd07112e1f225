//! Error type shared by exchange clients.

use thiserror::Error;

/// Errors raised while building or sending an exchange request.
///
/// Validation variants are produced before anything touches the network.
/// Transport and exchange variants carry whatever the remote side reported.
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// No symbol was passed and no default market is configured.
    #[error("{operation}() requires a symbol argument")]
    MissingSymbol { operation: &'static str },

    /// The symbol does not resolve to any loaded market.
    #[error("market {0} not found")]
    MarketNotFound(String),

    /// A market lookup happened before the catalog was loaded.
    #[error("markets not loaded, call load_markets() first")]
    MarketsNotLoaded,

    /// The account mode or market type cannot serve this request.
    #[error("{0}")]
    NotSupported(String),

    #[error("invalid leverage {0}: expected a finite number greater than zero")]
    InvalidLeverage(String),

    /// The endpoint carries a single leverage field but buy and sell differ.
    #[error("{endpoint} takes a single leverage value, got buy {buy} and sell {sell}")]
    AsymmetricLeverage {
        endpoint: String,
        buy: String,
        sell: String,
    },

    /// A private endpoint was called without API credentials.
    #[error("{0} requires API credentials")]
    MissingCredentials(String),

    /// The exchange rejected the request with a business error code.
    #[error("exchange error {code}: {message}")]
    Exchange { code: i64, message: String },

    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl ExchangeError {
    /// Wraps an error raised by the HTTP layer.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Box::new(err))
    }

    /// True for errors raised locally, before any request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingSymbol { .. }
                | Self::MarketNotFound(_)
                | Self::MarketsNotLoaded
                | Self::NotSupported(_)
                | Self::InvalidLeverage(_)
                | Self::AsymmetricLeverage { .. }
                | Self::MissingCredentials(_)
        )
    }
}

/// A specialized Result type for exchange operations.
pub type Result<T> = std::result::Result<T, ExchangeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_classification() {
        assert!(ExchangeError::MissingSymbol { operation: "x" }.is_validation());
        assert!(ExchangeError::NotSupported("nope".into()).is_validation());
        assert!(
            !ExchangeError::Exchange {
                code: 10001,
                message: "params error".into()
            }
            .is_validation()
        );
    }

    #[test]
    fn test_missing_symbol_message() {
        let err = ExchangeError::MissingSymbol {
            operation: "set_buy_and_sell_leverage",
        };
        assert_eq!(
            err.to_string(),
            "set_buy_and_sell_leverage() requires a symbol argument"
        );
    }
}
