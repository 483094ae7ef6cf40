use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::decimal_serde::*;

/// A discrete acquisition of units at a specific unit cost, tracked for
/// FIFO cost-basis matching. A lot with negative units marks a position
/// that went short through an oversold redemption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    #[serde(with = "decimal_serde")]
    pub units: Decimal,
    #[serde(with = "decimal_serde")]
    pub unit_cost: Decimal,
}

/// Aggregate position state for one scheme-folio, maintained by the
/// ledger as it replays the transaction history.
///
/// `invested_amount` and `realized_pnl` are rounded to 2 decimal places
/// half-up at every update; `average_cost` to 4. The incremental
/// rounding is load-bearing: it reproduces the exact cumulative figures
/// of the account statements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerState {
    #[serde(with = "decimal_serde")]
    pub balance_units: Decimal,
    #[serde(with = "decimal_serde")]
    pub invested_amount: Decimal,
    #[serde(with = "decimal_serde")]
    pub realized_pnl: Decimal,
    #[serde(with = "decimal_serde")]
    pub average_cost: Decimal,
}

/// Ledger state captured right after one transaction was applied. Feeds
/// the daily scheme value series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedTransaction {
    pub date: NaiveDate,
    #[serde(with = "decimal_serde")]
    pub invested: Decimal,
    #[serde(with = "decimal_serde")]
    pub average: Decimal,
    #[serde(with = "decimal_serde")]
    pub balance: Decimal,
}
