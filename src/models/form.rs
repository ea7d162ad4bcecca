//! The staged trade-creation form.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TradeSide;

/// Trading pairs offered in the creation form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pair {
    #[default]
    #[serde(rename = "ETH/USDT")]
    EthUsdt,
    #[serde(rename = "BTC/USDT")]
    BtcUsdt,
    #[serde(rename = "SOL/USDT")]
    SolUsdt,
}

impl Pair {
    /// Every selectable pair, in display order.
    pub const ALL: [Pair; 3] = [Pair::EthUsdt, Pair::BtcUsdt, Pair::SolUsdt];

    /// Returns the symbol stored on-chain as the record name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Pair::EthUsdt => "ETH/USDT",
            Pair::BtcUsdt => "BTC/USDT",
            Pair::SolUsdt => "SOL/USDT",
        }
    }

    /// Returns the next pair, wrapping around.
    pub fn next(&self) -> Pair {
        let idx = Self::ALL.iter().position(|p| p == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pair {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown trading pair {s:?}"))
    }
}

/// Values typed into the creation modal.
///
/// Amount and price are kept as the raw text the user entered; they are
/// parsed only when the trade is submitted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TradeForm {
    pub pair: Pair,
    pub side: TradeSide,
    pub amount: String,
    pub price: String,
}

impl TradeForm {
    /// Both numeric fields have been filled in.
    pub fn is_complete(&self) -> bool {
        !self.amount.trim().is_empty() && !self.price.trim().is_empty()
    }

    /// Amount as submitted (encrypted) to the contract.
    pub fn amount_value(&self) -> u64 {
        parse_leading_int(&self.amount)
    }

    /// Price as submitted (public) to the contract.
    pub fn price_value(&self) -> u64 {
        parse_leading_int(&self.price)
    }

    /// Contract label describing the order, e.g. `"BUY Order - FHE Protected"`.
    pub fn label(&self) -> String {
        format!("{} Order - FHE Protected", self.side.label())
    }

    /// Restores the defaults after a successful submission.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Client-generated trade id, `trade-<unix millis>`.
pub fn new_trade_id(now: DateTime<Utc>) -> String {
    format!("trade-{}", now.timestamp_millis())
}

/// Parses the leading decimal digits of `input`.
///
/// Leading whitespace is skipped and anything after the first non-digit is
/// ignored. Input with no leading digits, or a value that does not fit in a
/// `u64`, yields zero.
fn parse_leading_int(input: &str) -> u64 {
    let trimmed = input.trim_start();
    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..digits_end].parse().unwrap_or(0)
}
