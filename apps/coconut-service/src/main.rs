//! # Delivery Quote CLI
//!
//! Quotes one order against the stored rules and prints the result as JSON.
//!
//! ## Usage
//! ```bash
//! # Delivery date and fee, submitted now
//! cargo run -p coconut-service --bin coconut-quote -- --quantity 150 --zone "Zone A - Miami Beach"
//!
//! # Priced order at a fixed submission time
//! cargo run -p coconut-service --bin coconut-quote -- \
//!     --quantity 250 --zone "Zone B - Downtown" --unit unit \
//!     --customer "Hilton Hotel Miami" --at 2026-03-02T13:30:00-05:00
//! ```
//!
//! Failures are printed as an `ErrorResponse` and exit with status 1.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use tracing::error;

use coconut_core::UnitType;
use coconut_service::{
    init_tracing, AppConfig, ConfigError, DeliveryService, ErrorResponse, ServiceError,
    ServiceResult,
};

const USAGE: &str = "\
Coconut Admin Delivery Quote

Usage: coconut-quote --quantity <N> --zone <NAME> [OPTIONS]

Options:
  -q, --quantity <N>       Order quantity
  -z, --zone <NAME>        Delivery zone name
      --at <RFC3339>       Submission time (default: now)
      --unit <case|unit>   Price the order in this unit
      --customer <NAME>    Customer for negotiated prices (needs --unit)
  -c, --config <PATH>      Config file (default: ./coconut.toml if present)
  -d, --db <PATH>          Database file, overrides the config
  -h, --help               Show this help message";

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    db: Option<PathBuf>,
    quantity: Option<u32>,
    zone: Option<String>,
    at: Option<DateTime<FixedOffset>>,
    unit: Option<UnitType>,
    customer: Option<String>,
    help: bool,
}

fn invalid(message: String) -> ServiceError {
    ServiceError::Config(ConfigError::Invalid(message))
}

fn parse_args(raw: &[String]) -> ServiceResult<Args> {
    let mut args = Args::default();
    let mut iter = raw.iter().skip(1);

    while let Some(flag) = iter.next() {
        if matches!(flag.as_str(), "--help" | "-h") {
            args.help = true;
            continue;
        }

        let value = iter
            .next()
            .ok_or_else(|| invalid(format!("missing value for {}", flag)))?;

        match flag.as_str() {
            "--config" | "-c" => args.config = Some(PathBuf::from(value)),
            "--db" | "-d" => args.db = Some(PathBuf::from(value)),
            "--quantity" | "-q" => {
                let quantity = value
                    .parse()
                    .map_err(|_| invalid(format!("quantity must be a whole number: {}", value)))?;
                args.quantity = Some(quantity);
            }
            "--zone" | "-z" => args.zone = Some(value.clone()),
            "--at" => {
                let at = DateTime::parse_from_rfc3339(value)
                    .map_err(|e| invalid(format!("invalid --at timestamp '{}': {}", value, e)))?;
                args.at = Some(at);
            }
            "--unit" => {
                args.unit = Some(match value.to_ascii_lowercase().as_str() {
                    "case" => UnitType::Case,
                    "unit" => UnitType::Unit,
                    _ => return Err(invalid(format!("unknown unit type: {}", value))),
                });
            }
            "--customer" => args.customer = Some(value.clone()),
            _ => return Err(invalid(format!("unknown option: {}", flag))),
        }
    }

    Ok(args)
}

#[derive(Serialize)]
#[serde(untagged)]
enum Output {
    Delivery(coconut_core::DeliveryQuote),
    Order(coconut_service::OrderQuote),
}

async fn run(args: Args) -> ServiceResult<Output> {
    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(db) = args.db {
        config.database.path = db;
    }

    init_tracing(&config.logging);

    let quantity = args
        .quantity
        .ok_or_else(|| invalid("--quantity is required".to_string()))?;
    let zone = args
        .zone
        .ok_or_else(|| invalid("--zone is required".to_string()))?;
    let submitted_at = args.at.unwrap_or_else(|| Utc::now().fixed_offset());

    let service = DeliveryService::from_config(&config).await?;

    let output = match args.unit {
        Some(unit) => Output::Order(
            service
                .quote_order(quantity, &zone, unit, args.customer.as_deref(), &submitted_at)
                .await?,
        ),
        None => Output::Delivery(service.quote(quantity, &zone, &submitted_at).await?),
    };

    service.database().close().await;
    Ok(output)
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("Failed to serialize output: {}", e),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let raw: Vec<String> = env::args().collect();

    let result = match parse_args(&raw) {
        Ok(args) if args.help => {
            println!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
        Ok(args) => run(args).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(output) => {
            print_json(&output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            print_json(&ErrorResponse::from(&e));
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("coconut-quote")
            .chain(args.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_parse_full_args() {
        let args = parse_args(&argv(&[
            "-q", "250", "--zone", "Zone B - Downtown", "--unit", "Case",
            "--at", "2026-03-02T13:30:00-05:00", "--db", "test.db",
        ]))
        .unwrap();

        assert_eq!(args.quantity, Some(250));
        assert_eq!(args.zone.as_deref(), Some("Zone B - Downtown"));
        assert_eq!(args.unit, Some(UnitType::Case));
        assert_eq!(args.db, Some(PathBuf::from("test.db")));
        assert_eq!(args.at.unwrap().offset().local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        assert!(parse_args(&argv(&["--quantity", "-3"])).is_err());
        assert!(parse_args(&argv(&["--at", "yesterday"])).is_err());
        assert!(parse_args(&argv(&["--unit", "pallet"])).is_err());
        assert!(parse_args(&argv(&["--zone"])).is_err());
        assert!(parse_args(&argv(&["--verbose", "1"])).is_err());
    }

    #[test]
    fn test_help_flag() {
        assert!(parse_args(&argv(&["--help"])).unwrap().help);
    }
}
