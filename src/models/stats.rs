//! Market overview statistics derived from the loaded trades.

use rust_decimal::Decimal;
use serde::Serialize;

use super::TradeData;

/// Average price shown when no trades are loaded.
pub const FALLBACK_AVG_PRICE: Decimal = Decimal::from_parts(2850, 0, 0, false, 0);

/// 24h change figure. A fixed placeholder, not computed from data.
pub const PLACEHOLDER_PRICE_CHANGE: Decimal = Decimal::from_parts(25, 0, 0, false, 1);

/// Aggregate figures for the market overview cards.
///
/// Recomputed in full from every reload; never updated incrementally.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketStats {
    /// Sum of all trade amounts.
    pub total_volume: u64,
    /// Number of loaded trades.
    pub active_trades: usize,
    /// Mean trade price, or [`FALLBACK_AVG_PRICE`] when there are no trades.
    pub avg_price: Decimal,
    pub price_change: Decimal,
}

impl MarketStats {
    /// Computes the statistics for a trade collection.
    pub fn from_trades(trades: &[TradeData]) -> Self {
        let total_volume = trades
            .iter()
            .fold(0u64, |sum, trade| sum.saturating_add(trade.amount));

        let avg_price = if trades.is_empty() {
            FALLBACK_AVG_PRICE
        } else {
            let price_sum: Decimal = trades.iter().map(|t| Decimal::from(t.price)).sum();
            price_sum / Decimal::from(trades.len())
        };

        Self {
            total_volume,
            active_trades: trades.len(),
            avg_price,
            price_change: PLACEHOLDER_PRICE_CHANGE,
        }
    }
}

impl Default for MarketStats {
    fn default() -> Self {
        Self::from_trades(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Address, BusinessData};
    use rust_decimal_macros::dec;

    fn trade(amount: u64, price: u64) -> TradeData {
        TradeData::from_record(
            format!("trade-{amount}-{price}"),
            BusinessData {
                name: "BTC/USDT".to_string(),
                public_value1: amount,
                public_value2: price,
                timestamp: 0,
                creator: Address::new("0x0000000000000000000000000000000000000001"),
                decrypted_value: 0,
                is_verified: false,
            },
        )
    }

    #[test]
    fn two_trades_scenario() {
        let stats = MarketStats::from_trades(&[trade(5, 100), trade(15, 300)]);
        assert_eq!(stats.total_volume, 20);
        assert_eq!(stats.active_trades, 2);
        assert_eq!(stats.avg_price, dec!(200));
        assert_eq!(stats.price_change, dec!(2.5));
    }

    #[test]
    fn empty_collection_uses_fallback_price() {
        let stats = MarketStats::from_trades(&[]);
        assert_eq!(stats.total_volume, 0);
        assert_eq!(stats.active_trades, 0);
        assert_eq!(stats.avg_price, dec!(2850));
        assert_eq!(stats, MarketStats::default());
    }

    #[test]
    fn fractional_mean_is_kept() {
        let stats = MarketStats::from_trades(&[trade(1, 1), trade(1, 2)]);
        assert_eq!(stats.avg_price, dec!(1.5));
    }
}
