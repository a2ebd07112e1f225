use super::mock::MockBybit;
use super::*;
use serde_json::json;
use trading::{AccountCapabilities, ContractType, Market};

fn eth_usdt() -> Market {
    Market::new(
        "ETHUSDT",
        "ETH/USDT:USDT",
        "ETH",
        "USDT",
        "USDT",
        ContractType::Linear,
    )
}

fn btc_usd_inverse() -> Market {
    Market::new(
        "BTCUSD",
        "BTC/USD:BTC",
        "BTC",
        "USD",
        "BTC",
        ContractType::Inverse,
    )
}

fn btc_option() -> Market {
    Market::new(
        "BTC-30JUN23-30000-C",
        "BTC-30JUN23-30000-C",
        "BTC",
        "USD",
        "USDC",
        ContractType::Option,
    )
}

fn btc_perp_usdc() -> Market {
    Market::new(
        "BTCPERP",
        "BTC/USDC:USDC",
        "BTC",
        "USDC",
        "USDC",
        ContractType::Linear,
    )
}

fn exchange(unified_margin: bool, unified_account: bool) -> BybitExtend<MockBybit> {
    let mock = MockBybit::new(AccountCapabilities::new(unified_margin, unified_account))
        .with_market(eth_usdt())
        .with_market(btc_usd_inverse())
        .with_market(btc_option())
        .with_market(btc_perp_usdc());
    BybitExtend::new(mock)
}

fn lev(value: i64) -> Leverage {
    Leverage::try_from(value).unwrap()
}

fn sorted_keys(params: &Params) -> Vec<&str> {
    let mut keys: Vec<&str> = params.keys().collect();
    keys.sort();
    keys
}

const ALL_MODES: [(bool, bool); 4] = [(false, false), (true, false), (false, true), (true, true)];

#[tokio::test]
async fn test_unified_account_linear_goes_to_v5() {
    let exchange = exchange(false, true);

    exchange
        .set_buy_and_sell_leverage(lev(30), lev(20), Some("ETHUSDT"), Params::new())
        .await
        .unwrap();

    let calls = exchange.client().calls();
    assert_eq!(calls.len(), 1);
    let (endpoint, request) = &calls[0];
    assert_eq!(*endpoint, Endpoint::PositionSetLeverageV5);
    assert_eq!(
        sorted_keys(request),
        vec!["buyLeverage", "category", "sellLeverage", "symbol"]
    );
    assert_eq!(request.get_str("category"), Some("linear"));
    assert_eq!(request.get_str("buyLeverage"), Some("30"));
    assert_eq!(request.get_str("sellLeverage"), Some("20"));
}

#[tokio::test]
async fn test_unified_account_rejects_inverse_and_option() {
    for flags in [(false, true), (true, true)] {
        let exchange = exchange(flags.0, flags.1);

        for symbol in ["BTCUSD", "BTC-30JUN23-30000-C"] {
            let err = exchange
                .set_buy_and_sell_leverage(lev(10), lev(10), Some(symbol), Params::new())
                .await
                .unwrap_err();
            assert!(matches!(err, ExchangeError::NotSupported(_)), "{symbol}");
        }
        assert!(exchange.client().calls().is_empty());
    }
}

#[tokio::test]
async fn test_unified_margin_categories() {
    let exchange = exchange(true, false);

    exchange
        .set_buy_and_sell_leverage(lev(5), lev(3), Some("BTC-30JUN23-30000-C"), Params::new())
        .await
        .unwrap();
    exchange
        .set_buy_and_sell_leverage(lev(5), lev(3), Some("ETH/USDT:USDT"), Params::new())
        .await
        .unwrap();

    let calls = exchange.client().calls();
    assert_eq!(calls.len(), 2);
    assert!(calls
        .iter()
        .all(|(endpoint, _)| *endpoint == Endpoint::UnifiedPositionSetLeverageV3));
    assert_eq!(calls[0].1.get_str("category"), Some("option"));
    assert_eq!(calls[0].1.get_str("symbol"), Some("BTC-30JUN23-30000-C"));
    assert_eq!(calls[1].1.get_str("category"), Some("linear"));
    assert_eq!(calls[1].1.get_str("symbol"), Some("ETHUSDT"));
}

#[tokio::test]
async fn test_unified_margin_rejects_inverse() {
    let exchange = exchange(true, false);

    let err = exchange
        .set_buy_and_sell_leverage(lev(5), lev(5), Some("BTCUSD"), Params::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ExchangeError::NotSupported(_)));
    assert!(exchange.client().calls().is_empty());
}

#[tokio::test]
async fn test_classic_account_uses_contract_endpoint() {
    let exchange = exchange(false, false);

    for symbol in ["ETHUSDT", "BTCUSD"] {
        exchange
            .set_buy_and_sell_leverage(lev(30), lev(20), Some(symbol), Params::new())
            .await
            .unwrap();
    }

    for (endpoint, request) in exchange.client().calls() {
        assert_eq!(endpoint, Endpoint::ContractPositionSetLeverageV3);
        assert_eq!(
            sorted_keys(&request),
            vec!["buyLeverage", "sellLeverage", "symbol"]
        );
    }
}

#[tokio::test]
async fn test_classic_usdc_perpetual_uses_legacy_endpoint() {
    let exchange = exchange(false, false);

    exchange
        .set_buy_and_sell_leverage(lev(25), lev(25), Some("BTCPERP"), Params::new())
        .await
        .unwrap();

    let calls = exchange.client().calls();
    assert_eq!(calls.len(), 1);
    let (endpoint, request) = &calls[0];
    assert_eq!(*endpoint, Endpoint::UsdcPerpetualLeverageSave);
    assert_eq!(sorted_keys(request), vec!["leverage", "symbol"]);
    assert_eq!(request.get_str("leverage"), Some("25"));
    assert_eq!(request.get_str("symbol"), Some("BTCPERP"));
}

#[tokio::test]
async fn test_legacy_endpoint_rejects_asymmetric_leverage() {
    let exchange = exchange(false, false);

    let err = exchange
        .set_buy_and_sell_leverage(lev(25), lev(10), Some("BTCPERP"), Params::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ExchangeError::AsymmetricLeverage { .. }));
    assert!(exchange.client().calls().is_empty());
}

#[tokio::test]
async fn test_integer_and_float_leverage_send_same_string() {
    let exchange = exchange(false, true);

    exchange
        .set_buy_and_sell_leverage(
            Leverage::try_from(30_i64).unwrap(),
            Leverage::try_from(30.0_f64).unwrap(),
            Some("ETHUSDT"),
            Params::new(),
        )
        .await
        .unwrap();

    let calls = exchange.client().calls();
    let request = &calls[0].1;
    assert_eq!(request.get_str("buyLeverage"), Some("30"));
    assert_eq!(request.get_str("buyLeverage"), request.get_str("sellLeverage"));
}

#[tokio::test]
async fn test_missing_symbol_fails_before_any_request() {
    for (unified_margin, unified_account) in ALL_MODES {
        let exchange = exchange(unified_margin, unified_account);

        let err = exchange
            .set_buy_and_sell_leverage(lev(10), lev(10), None, Params::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ExchangeError::MissingSymbol { .. }));
        assert_eq!(exchange.client().load_count(), 0);
        assert!(exchange.client().calls().is_empty());
    }
}

#[tokio::test]
async fn test_default_symbol_fills_in() {
    let exchange = exchange(false, false).with_default_symbol("ETHUSDT");

    exchange
        .set_buy_and_sell_leverage(lev(10), lev(5), None, Params::new())
        .await
        .unwrap();

    let calls = exchange.client().calls();
    assert_eq!(calls[0].1.get_str("symbol"), Some("ETHUSDT"));
}

#[tokio::test]
async fn test_unknown_symbol() {
    let exchange = exchange(false, true);

    let err = exchange
        .set_buy_and_sell_leverage(lev(10), lev(10), Some("DOGEUSDT"), Params::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ExchangeError::MarketNotFound(ref s) if s == "DOGEUSDT"));
    assert_eq!(exchange.client().load_count(), 1);
    assert!(exchange.client().calls().is_empty());
}

#[tokio::test]
async fn test_caller_params_override_computed_fields() {
    let exchange = exchange(false, true);
    let params = Params::new()
        .with("category", "option")
        .with("positionIdx", 1);

    exchange
        .set_buy_and_sell_leverage(lev(30), lev(20), Some("ETHUSDT"), params)
        .await
        .unwrap();

    let calls = exchange.client().calls();
    let request = &calls[0].1;
    assert_eq!(request.get_str("category"), Some("option"));
    assert_eq!(request.get("positionIdx"), Some(&json!(1)));
    assert_eq!(request.get_str("buyLeverage"), Some("30"));
}

#[tokio::test]
async fn test_response_returned_unmodified() {
    let body = json!({"retCode": 0, "retMsg": "OK", "result": {}, "time": 1681000000000_i64});
    let mock = MockBybit::new(AccountCapabilities::classic())
        .with_market(eth_usdt())
        .with_response(body.clone());
    let exchange = BybitExtend::new(mock);

    let response = exchange
        .set_buy_and_sell_leverage(lev(2), lev(2), Some("ETHUSDT"), Params::new())
        .await
        .unwrap();

    assert_eq!(response, body);
}

#[tokio::test]
async fn test_exchange_error_passes_through() {
    let mock = MockBybit::new(AccountCapabilities::new(false, true))
        .with_market(eth_usdt())
        .with_exchange_error(110043, "leverage not modified");
    let exchange = BybitExtend::new(mock);

    let err = exchange
        .set_buy_and_sell_leverage(lev(30), lev(20), Some("ETHUSDT"), Params::new())
        .await
        .unwrap_err();
    assert!(!err.is_validation());

    match err {
        ExchangeError::Exchange { code, message } => {
            assert_eq!(code, 110043);
            assert_eq!(message, "leverage not modified");
        }
        other => panic!("expected exchange error, got {:?}", other),
    }

    let calls = exchange.client().calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, Endpoint::PositionSetLeverageV5);
}
