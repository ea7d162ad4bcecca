//! Application configuration loaded from environment variables.
//!
//! Every variable is optional:
//! - `MEVSHIELD_CONTRACT_ADDRESS`: address of the deployed trade contract
//! - `MEVSHIELD_WALLET_ADDRESS`: account the simulated wallet connects as
//! - `MEVSHIELD_SIM_LATENCY_MS`: simulated delay per remote call
//! - `MEVSHIELD_SIM_REJECT_SIGNATURES`: `true` makes every signature request fail
//! - `MEVSHIELD_LOG_FILE`: where `tracing` output is written
//! - `MEVSHIELD_TICK_MS`: UI tick interval

use std::path::PathBuf;
use std::time::Duration;

use crate::MevShieldError;
use crate::models::Address;
use crate::simulation::SimulationConfig;

/// Local development deployment address of the trade contract.
const DEFAULT_CONTRACT_ADDRESS: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

/// First local development account.
const DEFAULT_WALLET_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

const DEFAULT_LATENCY_MS: u64 = 400;
const DEFAULT_TICK_MS: u64 = 100;
const DEFAULT_LOG_FILE: &str = "mevshield.log";

/// Top-level application configuration.
#[derive(Debug)]
pub struct AppConfig {
    pub contract_address: Address,
    pub wallet_address: Address,
    pub simulation: SimulationConfig,
    pub log_file: PathBuf,
    pub tick_rate: Duration,
}

/// Loads the application configuration from environment variables.
///
/// # Errors
///
/// Returns [`MevShieldError::Config`] if an address is malformed or a
/// numeric or boolean value cannot be parsed.
pub fn fetch_config() -> crate::Result<AppConfig> {
    let contract_address = address_var("MEVSHIELD_CONTRACT_ADDRESS", DEFAULT_CONTRACT_ADDRESS)?;
    let wallet_address = address_var("MEVSHIELD_WALLET_ADDRESS", DEFAULT_WALLET_ADDRESS)?;

    let latency = millis_var("MEVSHIELD_SIM_LATENCY_MS", DEFAULT_LATENCY_MS)?;
    let tick_rate = millis_var("MEVSHIELD_TICK_MS", DEFAULT_TICK_MS)?;
    if tick_rate.is_zero() {
        return Err(MevShieldError::Config(
            "MEVSHIELD_TICK_MS must be greater than zero".to_string(),
        ));
    }

    let reject_signatures = match non_empty_var("MEVSHIELD_SIM_REJECT_SIGNATURES") {
        None => false,
        Some(v) => parse_bool(&v).ok_or_else(|| {
            MevShieldError::Config(format!(
                "MEVSHIELD_SIM_REJECT_SIGNATURES must be true or false, got {v:?}"
            ))
        })?,
    };

    let log_file = non_empty_var("MEVSHIELD_LOG_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

    Ok(AppConfig {
        contract_address,
        wallet_address,
        simulation: SimulationConfig {
            latency,
            reject_signatures,
            ..SimulationConfig::default()
        },
        log_file,
        tick_rate,
    })
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn address_var(name: &str, default: &str) -> crate::Result<Address> {
    match non_empty_var(name) {
        None => Ok(Address::new(default)),
        Some(raw) => Address::parse(&raw).map_err(|e| MevShieldError::Config(format!("{name}: {e}"))),
    }
}

fn millis_var(name: &str, default: u64) -> crate::Result<Duration> {
    let millis = match non_empty_var(name) {
        None => default,
        Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
            MevShieldError::Config(format!("{name} must be a whole number of milliseconds: {e}"))
        })?,
    };
    Ok(Duration::from_millis(millis))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
