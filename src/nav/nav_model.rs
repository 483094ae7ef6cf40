use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::decimal_serde::*;

/// One published net-asset-value point for a scheme, supplied by the
/// external NAV store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavEntry {
    pub scheme_id: u64,
    pub date: NaiveDate,
    #[serde(with = "decimal_serde")]
    pub value: Decimal,
}
