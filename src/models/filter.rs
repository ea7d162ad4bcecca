//! Search and side filtering over the loaded trades.

use super::{Address, TradeData, TradeSide};

/// Number of entries shown in the connected user's history panel.
pub const USER_HISTORY_LIMIT: usize = 5;

/// Which trade sides the list shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SideFilter {
    #[default]
    All,
    Buy,
    Sell,
}

impl SideFilter {
    /// Returns whether a trade side passes this filter.
    pub fn matches(&self, side: TradeSide) -> bool {
        match self {
            SideFilter::All => true,
            SideFilter::Buy => side == TradeSide::Buy,
            SideFilter::Sell => side == TradeSide::Sell,
        }
    }

    /// Cycles all → buy → sell → all.
    pub fn cycle(&mut self) {
        *self = match self {
            SideFilter::All => SideFilter::Buy,
            SideFilter::Buy => SideFilter::Sell,
            SideFilter::Sell => SideFilter::All,
        };
    }

    /// Returns the display label.
    pub fn label(&self) -> &'static str {
        match self {
            SideFilter::All => "All Trades",
            SideFilter::Buy => "Buy Orders",
            SideFilter::Sell => "Sell Orders",
        }
    }
}

/// Search term plus side filter applied to the trade list.
#[derive(Clone, Debug, Default)]
pub struct TradeFilter {
    /// Matched case-insensitively against the pair and the creator address.
    pub search: String,
    pub side: SideFilter,
}

impl TradeFilter {
    /// Returns whether a single trade passes both the search and the side filter.
    pub fn matches(&self, trade: &TradeData) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = trade.pair.to_lowercase().contains(&needle)
            || trade.creator.contains_ignore_case(&needle);
        matches_search && self.side.matches(trade.side)
    }

    /// Returns the matching trades in their original order.
    pub fn apply<'a>(&self, trades: &'a [TradeData]) -> Vec<&'a TradeData> {
        trades.iter().filter(|t| self.matches(t)).collect()
    }
}

/// Returns up to `limit` trades created by `address`, in collection order.
pub fn user_history<'a>(
    trades: &'a [TradeData],
    address: &Address,
    limit: usize,
) -> Vec<&'a TradeData> {
    trades
        .iter()
        .filter(|t| &t.creator == address)
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BusinessData;

    const ALICE: &str = "0xA11cE00000000000000000000000000000000001";
    const BOB: &str = "0xb0b0000000000000000000000000000000000002";

    fn trade(id: &str, pair: &str, amount: u64, creator: &str) -> TradeData {
        TradeData::from_record(
            id,
            BusinessData {
                name: pair.to_string(),
                public_value1: amount,
                public_value2: 100,
                timestamp: 0,
                creator: Address::new(creator),
                decrypted_value: 0,
                is_verified: false,
            },
        )
    }

    fn sample() -> Vec<TradeData> {
        vec![
            trade("t1", "ETH/USDT", 5, ALICE),
            trade("t2", "BTC/USDT", 0, BOB),
            trade("t3", "SOL/USDT", 3, BOB),
        ]
    }

    fn ids(trades: Vec<&TradeData>) -> Vec<&str> {
        trades.into_iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn empty_search_and_all_returns_everything() {
        let trades = sample();
        assert_eq!(ids(TradeFilter::default().apply(&trades)), ["t1", "t2", "t3"]);
    }

    #[test]
    fn search_matches_pair_case_insensitively() {
        let trades = sample();
        let filter = TradeFilter {
            search: "eth".to_string(),
            side: SideFilter::All,
        };
        assert_eq!(ids(filter.apply(&trades)), ["t1"]);
    }

    #[test]
    fn search_matches_creator_case_insensitively() {
        let trades = sample();
        let filter = TradeFilter {
            search: "B0B0".to_string(),
            side: SideFilter::All,
        };
        assert_eq!(ids(filter.apply(&trades)), ["t2", "t3"]);
    }

    #[test]
    fn side_filter_combines_with_search() {
        let trades = sample();
        let filter = TradeFilter {
            search: "usdt".to_string(),
            side: SideFilter::Sell,
        };
        assert_eq!(ids(filter.apply(&trades)), ["t2"]);

        let filter = TradeFilter {
            search: "0xb0b".to_string(),
            side: SideFilter::Buy,
        };
        assert_eq!(ids(filter.apply(&trades)), ["t3"]);
    }

    #[test]
    fn side_filter_cycles() {
        let mut side = SideFilter::default();
        side.cycle();
        assert_eq!(side, SideFilter::Buy);
        side.cycle();
        assert_eq!(side, SideFilter::Sell);
        side.cycle();
        assert_eq!(side, SideFilter::All);
    }

    #[test]
    fn user_history_compares_addresses_case_insensitively() {
        let trades = sample();
        let me = Address::new(BOB.to_uppercase().replace("0X", "0x"));
        assert_eq!(ids(user_history(&trades, &me, USER_HISTORY_LIMIT)), ["t2", "t3"]);
        assert_eq!(ids(user_history(&trades, &me, 1)), ["t2"]);
    }
}
