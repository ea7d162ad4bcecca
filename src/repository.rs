//! Bulk loading of trade records from the contract.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, warn};

use crate::client::ContractReader;
use crate::error::TradeError;
use crate::models::{MarketStats, TradeData};

/// A full trade collection plus the statistics derived from it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TradeSnapshot {
    pub trades: Vec<TradeData>,
    pub stats: MarketStats,
}

/// Stateless reader that projects every contract record into a [`TradeData`].
#[derive(Clone)]
pub struct TradeRepository {
    reader: Arc<dyn ContractReader>,
}

impl TradeRepository {
    pub fn new(reader: Arc<dyn ContractReader>) -> Self {
        Self { reader }
    }

    /// Loads every trade record, in the order the contract lists their ids.
    ///
    /// A record that fails to load is logged and left out; only a failure
    /// to list the ids fails the whole call. Each call returns a complete
    /// replacement collection.
    ///
    /// # Errors
    ///
    /// Returns [`TradeError::LoadFailure`] if the id listing fails.
    pub async fn load_trades(&self) -> Result<TradeSnapshot, TradeError> {
        let ids = self.reader.get_all_business_ids().await.map_err(|e| {
            error!(error = %e, "failed to list trade ids");
            TradeError::LoadFailure(e.message().to_string())
        })?;

        let mut trades = Vec::with_capacity(ids.len());
        for id in ids {
            match self.reader.get_business_data(&id).await {
                Ok(record) => trades.push(TradeData::from_record(id, record)),
                Err(e) => warn!(trade_id = %id, error = %e, "skipping trade that failed to load"),
            }
        }

        let stats = MarketStats::from_trades(&trades);
        debug!(count = trades.len(), "loaded trades");

        Ok(TradeSnapshot { trades, stats })
    }
}
