mod args;

use anyhow::{Context, Result};
use args::{Args, Command};
use clap::Parser;
use exchange_gateway::{BybitExtend, BybitRest, HarnessConfig};
use log::info;
use trading::{AccountProbe, MarketCatalog, Params};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = HarnessConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(sandbox) = args.sandbox_override() {
        let settings = config.bybit().clone().with_sandbox(sandbox);
        *config.bybit_mut() = settings;
    }

    let credentials = config.bybit_api().ok().cloned();
    let rest = BybitRest::new(config.bybit(), credentials)?;
    info!("Using Bybit REST host {}", rest.base_url());

    match args.command {
        Command::SetLeverage {
            buy,
            sell,
            symbol,
            params,
        } => {
            let mut exchange = BybitExtend::new(rest);
            if let Some(default_symbol) = config.bybit().default_symbol() {
                exchange = exchange.with_default_symbol(default_symbol);
            }
            let params: Params = params.into_iter().collect();

            let response = exchange
                .set_buy_and_sell_leverage(buy, sell, symbol.as_deref(), params)
                .await
                .map_err(|e| {
                    let stage = if e.is_validation() {
                        "rejected before sending"
                    } else {
                        "failed at the exchange"
                    };
                    anyhow::Error::new(e).context(format!("set-leverage {}", stage))
                })?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Markets { settle } => {
            rest.load_markets(false).await?;
            let mut markets = rest.markets();
            if let Some(settle) = settle.as_deref() {
                markets.retain(|m| m.settles_in(settle));
            }
            markets.sort_by(|a, b| a.symbol().cmp(b.symbol()));
            for market in &markets {
                println!(
                    "{:<28} {:<24} {:<8} {:<6} {:<6} {}",
                    market.symbol(),
                    market.id(),
                    market.contract_type().as_str(),
                    market.base(),
                    market.quote(),
                    market.settle()
                );
            }
            info!("{} markets listed", markets.len());
        }
        Command::Capabilities => {
            let capabilities = rest.capabilities().await?;
            println!("{}", serde_json::to_string_pretty(&capabilities)?);
        }
    }

    Ok(())
}
