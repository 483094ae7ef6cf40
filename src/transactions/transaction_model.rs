use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ValidationError;
use crate::utils::decimal_serde::*;

/// Transaction kinds as they appear in consolidated account statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Purchase,
    PurchaseSip,
    Redemption,
    SwitchIn,
    SwitchInMerger,
    SwitchOut,
    SwitchOutMerger,
    DividendPayout,
    DividendReinvestment,
    Segregation,
    StampDutyTax,
    TdsTax,
    SttTax,
    Reversal,
    Misc,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Purchase => "PURCHASE",
            TransactionType::PurchaseSip => "PURCHASE_SIP",
            TransactionType::Redemption => "REDEMPTION",
            TransactionType::SwitchIn => "SWITCH_IN",
            TransactionType::SwitchInMerger => "SWITCH_IN_MERGER",
            TransactionType::SwitchOut => "SWITCH_OUT",
            TransactionType::SwitchOutMerger => "SWITCH_OUT_MERGER",
            TransactionType::DividendPayout => "DIVIDEND_PAYOUT",
            TransactionType::DividendReinvestment => "DIVIDEND_REINVESTMENT",
            TransactionType::Segregation => "SEGREGATION",
            TransactionType::StampDutyTax => "STAMP_DUTY_TAX",
            TransactionType::TdsTax => "TDS_TAX",
            TransactionType::SttTax => "STT_TAX",
            TransactionType::Reversal => "REVERSAL",
            TransactionType::Misc => "MISC",
        }
    }

    /// Tax lines deducted alongside trades. They never change the unit
    /// position and are excluded from invested-amount aggregates.
    pub fn is_tax(&self) -> bool {
        matches!(
            self,
            TransactionType::StampDutyTax | TransactionType::TdsTax | TransactionType::SttTax
        )
    }

    /// Kinds representing money coming back out of a scheme.
    pub fn is_redemption(&self) -> bool {
        matches!(
            self,
            TransactionType::Redemption
                | TransactionType::SwitchOut
                | TransactionType::SwitchOutMerger
        )
    }

    /// Kinds that do not belong in a money-weighted cash-flow series.
    pub fn excluded_from_cash_flows(&self) -> bool {
        self.is_tax() || matches!(self, TransactionType::Misc)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PURCHASE" => Ok(TransactionType::Purchase),
            "PURCHASE_SIP" => Ok(TransactionType::PurchaseSip),
            "REDEMPTION" => Ok(TransactionType::Redemption),
            "SWITCH_IN" => Ok(TransactionType::SwitchIn),
            "SWITCH_IN_MERGER" => Ok(TransactionType::SwitchInMerger),
            "SWITCH_OUT" => Ok(TransactionType::SwitchOut),
            "SWITCH_OUT_MERGER" => Ok(TransactionType::SwitchOutMerger),
            "DIVIDEND_PAYOUT" => Ok(TransactionType::DividendPayout),
            "DIVIDEND_REINVESTMENT" => Ok(TransactionType::DividendReinvestment),
            "SEGREGATION" => Ok(TransactionType::Segregation),
            "STAMP_DUTY_TAX" => Ok(TransactionType::StampDutyTax),
            "TDS_TAX" => Ok(TransactionType::TdsTax),
            "STT_TAX" => Ok(TransactionType::SttTax),
            "REVERSAL" => Ok(TransactionType::Reversal),
            "MISC" => Ok(TransactionType::Misc),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown transaction type: {}",
                other
            ))),
        }
    }
}

/// One statement line for a scheme-folio, already parsed and validated by
/// ingestion. Consumed read-only by the ledger and the aggregators.
///
/// `amount` is the signed cash effect (positive for money going in),
/// `units` and `nav` may be absent for cash-only lines, and `balance` is
/// the statement's own running unit balance, carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub txn_type: TransactionType,
    #[serde(with = "decimal_serde_option", default)]
    pub amount: Option<Decimal>,
    #[serde(with = "decimal_serde_option", default)]
    pub units: Option<Decimal>,
    #[serde(with = "decimal_serde_option", default)]
    pub nav: Option<Decimal>,
    #[serde(with = "decimal_serde_option", default)]
    pub balance: Option<Decimal>,
}
