//! Trade records as stored by the contract and as shown by the UI.

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

use super::Address;

/// Trade direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    #[default]
    Buy,
    Sell,
}

impl TradeSide {
    /// Lowercase wire/display name: `"buy"` or `"sell"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Buy => "buy",
            TradeSide::Sell => "sell",
        }
    }

    /// Uppercase label used in lists and contract labels.
    pub fn label(&self) -> &'static str {
        match self {
            TradeSide::Buy => "BUY",
            TradeSide::Sell => "SELL",
        }
    }

    /// Switches between buy and sell.
    pub fn toggle(&mut self) {
        *self = match self {
            TradeSide::Buy => TradeSide::Sell,
            TradeSide::Sell => TradeSide::Buy,
        };
    }
}

/// Local display annotation; never written to the contract.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    Pending,
    #[default]
    Executed,
    Failed,
}

/// A business record as returned by the contract's `getBusinessData` view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessData {
    /// Trading pair symbol chosen at creation.
    pub name: String,
    /// Trade amount, mirrored publicly.
    pub public_value1: u64,
    /// Trade price.
    pub public_value2: u64,
    /// Inclusion time, seconds since the epoch.
    pub timestamp: i64,
    pub creator: Address,
    /// Cleartext amount; zero until `is_verified`.
    pub decrypted_value: u64,
    pub is_verified: bool,
}

/// A trade as projected for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeData {
    pub id: String,
    pub pair: String,
    pub amount: u64,
    pub price: u64,
    /// Seconds since the epoch, assigned on-chain.
    pub timestamp: i64,
    pub creator: Address,
    /// Decrypted amount. Only meaningful when `is_verified` is true.
    pub encrypted_amount: u64,
    pub is_verified: bool,
    #[serde(rename = "type")]
    pub side: TradeSide,
    pub status: TradeStatus,
}

impl TradeData {
    /// Projects a contract record into the display shape.
    ///
    /// The side is derived from the sign of the first public value: any
    /// positive amount is shown as a buy. This mirrors what the contract
    /// exposes and does not recover the side chosen in the creation form.
    pub fn from_record(id: impl Into<String>, record: BusinessData) -> Self {
        let side = if record.public_value1 > 0 {
            TradeSide::Buy
        } else {
            TradeSide::Sell
        };

        Self {
            id: id.into(),
            pair: record.name,
            amount: record.public_value1,
            price: record.public_value2,
            timestamp: record.timestamp,
            creator: record.creator,
            encrypted_amount: record.decrypted_value,
            is_verified: record.is_verified,
            side,
            status: TradeStatus::Executed,
        }
    }

    /// Returns the decrypted amount once it has been verified on-chain.
    pub fn decrypted_amount(&self) -> Option<u64> {
        self.is_verified.then_some(self.encrypted_amount)
    }

    /// Returns the inclusion time in the local timezone, if representable.
    pub fn local_time(&self) -> Option<DateTime<Local>> {
        Local.timestamp_opt(self.timestamp, 0).single()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(public_value1: u64, is_verified: bool) -> BusinessData {
        BusinessData {
            name: "ETH/USDT".to_string(),
            public_value1,
            public_value2: 2900,
            timestamp: 1_700_000_000,
            creator: Address::new("0x00000000000000000000000000000000000000aa"),
            decrypted_value: if is_verified { public_value1 } else { 0 },
            is_verified,
        }
    }

    #[test]
    fn projection_maps_record_fields() {
        let trade = TradeData::from_record("trade-1", record(5, false));
        assert_eq!(trade.id, "trade-1");
        assert_eq!(trade.pair, "ETH/USDT");
        assert_eq!(trade.amount, 5);
        assert_eq!(trade.price, 2900);
        assert_eq!(trade.side, TradeSide::Buy);
        assert_eq!(trade.status, TradeStatus::Executed);
        assert_eq!(trade.decrypted_amount(), None);
    }

    #[test]
    fn zero_amount_is_shown_as_sell() {
        let trade = TradeData::from_record("trade-2", record(0, false));
        assert_eq!(trade.side, TradeSide::Sell);
    }

    #[test]
    fn decrypted_amount_requires_verification() {
        let trade = TradeData::from_record("trade-3", record(42, true));
        assert_eq!(trade.decrypted_amount(), Some(42));
    }

    #[test]
    fn serializes_with_ui_field_names() {
        let trade = TradeData::from_record("trade-4", record(7, false));
        let json = serde_json::to_value(&trade).unwrap();
        assert_eq!(json["type"], "buy");
        assert_eq!(json["isVerified"], false);
        assert_eq!(json["encryptedAmount"], 0);
    }
}
