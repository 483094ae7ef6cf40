use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};
use crate::transactions::TransactionRecord;
use crate::utils::decimal_serde::*;

/// Full transaction history of one scheme-folio, as handed over by
/// ingestion. Records must be in ascending date order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeTransactions {
    pub scheme_id: u64,
    pub scheme_name: String,
    pub folio_number: String,
    pub transactions: Vec<TransactionRecord>,
}

/// Point-in-time valuation of one scheme-folio. `return_rate` is a
/// fraction (0.12 means 12%); rendering multiplies by 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationSnapshot {
    pub scheme_name: String,
    pub folio_number: String,
    pub as_of: String,
    #[serde(with = "decimal_serde")]
    pub total_value: Decimal,
    #[serde(with = "decimal_serde")]
    pub return_rate: Decimal,
}

impl ValuationSnapshot {
    /// Builds a snapshot, rejecting blank identity fields before any of
    /// the numbers are trusted.
    pub fn new(
        scheme_name: String,
        folio_number: String,
        as_of: String,
        total_value: Decimal,
        return_rate: Decimal,
    ) -> Result<Self> {
        for (field, value) in [
            ("schemeName", &scheme_name),
            ("folioNumber", &folio_number),
            ("asOf", &as_of),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField(field.to_string()).into());
            }
        }
        Ok(ValuationSnapshot {
            scheme_name,
            folio_number,
            as_of,
            total_value,
            return_rate,
        })
    }
}

/// Valuation of a whole portfolio: one snapshot per scheme-folio plus
/// the summed total.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioValuation {
    pub as_of: NaiveDate,
    #[serde(with = "decimal_serde")]
    pub total_portfolio_value: Decimal,
    pub snapshots: Vec<ValuationSnapshot>,
}

/// One day of a scheme's derived value series: ledger projection carried
/// forward and marked to that day's NAV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeValue {
    pub date: NaiveDate,
    #[serde(with = "decimal_serde")]
    pub invested: Decimal,
    #[serde(with = "decimal_serde")]
    pub value: Decimal,
    #[serde(with = "decimal_serde")]
    pub nav: Decimal,
    #[serde(with = "decimal_serde")]
    pub balance: Decimal,
    #[serde(with = "decimal_serde")]
    pub average_nav: Decimal,
}
