use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use trading::Leverage;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Harness configuration file (YAML or TOML)
    #[arg(long, default_value = "config.yaml")]
    pub config: PathBuf,

    /// Force the testnet host regardless of configuration
    #[arg(long, conflicts_with = "mainnet")]
    pub sandbox: bool,

    /// Force the mainnet host regardless of configuration
    #[arg(long)]
    pub mainnet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Host selection from the flags, if any was given.
    pub fn sandbox_override(&self) -> Option<bool> {
        match (self.sandbox, self.mainnet) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Set buy and sell leverage on a Bybit market
    SetLeverage {
        /// Leverage for long positions
        #[arg(long)]
        buy: Leverage,

        /// Leverage for short positions
        #[arg(long)]
        sell: Leverage,

        /// Unified symbol or exchange id; defaults to bybit.default_symbol
        #[arg(long)]
        symbol: Option<String>,

        /// Extra request field as key=value, repeatable. Values are parsed as
        /// JSON when possible, otherwise sent as strings.
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, Value)>,
    },

    /// List loaded Bybit markets
    Markets {
        /// Only show markets settled in this currency
        #[arg(long)]
        settle: Option<String>,
    },

    /// Show the account's unified margin / unified trading account flags
    Capabilities,
}

pub fn parse_param(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_param() {
        assert_eq!(
            parse_param("category=linear").unwrap(),
            ("category".to_string(), json!("linear"))
        );
        assert_eq!(
            parse_param("positionIdx=1").unwrap(),
            ("positionIdx".to_string(), json!(1))
        );
        assert!(parse_param("novalue").is_err());
        assert!(parse_param("=x").is_err());
    }

    #[test]
    fn test_set_leverage_args() {
        let args = Args::try_parse_from([
            "exchange-harness",
            "--sandbox",
            "set-leverage",
            "--buy",
            "30",
            "--sell",
            "20.0",
            "--symbol",
            "ETHUSDT",
            "--param",
            "positionIdx=1",
        ])
        .unwrap();

        assert_eq!(args.sandbox_override(), Some(true));
        match args.command {
            Command::SetLeverage {
                buy,
                sell,
                symbol,
                params,
            } => {
                assert_eq!(buy.to_wire_string(), "30");
                assert_eq!(sell.to_wire_string(), "20");
                assert_eq!(symbol.as_deref(), Some("ETHUSDT"));
                assert_eq!(params.len(), 1);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_rejects_non_positive_leverage() {
        let parsed = Args::try_parse_from([
            "exchange-harness",
            "set-leverage",
            "--buy",
            "0",
            "--sell",
            "10",
        ]);
        assert!(parsed.is_err());
    }
}
