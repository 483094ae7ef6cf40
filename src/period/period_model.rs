use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::decimal_serde::*;

/// Invested amount for one calendar period. `month` is `None` for
/// yearly summaries; `cumulative` is the running total up to and
/// including this period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummary {
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(with = "decimal_serde")]
    pub amount: Decimal,
    #[serde(with = "decimal_serde")]
    pub cumulative: Decimal,
}
