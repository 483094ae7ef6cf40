use chrono::Datelike;
use log::debug;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::errors::Result;
use crate::period::PeriodSummary;
use crate::transactions::TransactionRecord;

/// Access to an investor's full transaction history across all
/// scheme-folios, keyed by the investor identifier ingestion uses.
pub trait TransactionRepositoryTrait: Send + Sync {
    fn transactions_for(&self, investor_key: &str) -> Result<Vec<TransactionRecord>>;
}

pub trait PeriodServiceTrait: Send + Sync {
    /// Invested amount per calendar month, ascending, with running
    /// cumulative totals.
    fn monthly_investments(&self, investor_key: &str) -> Result<Vec<PeriodSummary>>;

    /// Invested amount per calendar year, ascending, with running
    /// cumulative totals.
    fn yearly_investments(&self, investor_key: &str) -> Result<Vec<PeriodSummary>>;
}

/// Aggregates money put into schemes by calendar period. Only positive
/// amounts count, and tax lines are excluded even when positive, so the
/// totals reflect contributions rather than gross statement traffic.
pub struct PeriodService {
    repository: Arc<dyn TransactionRepositoryTrait>,
}

impl PeriodService {
    pub fn new(repository: Arc<dyn TransactionRepositoryTrait>) -> Self {
        PeriodService { repository }
    }

    fn aggregate(
        &self,
        investor_key: &str,
        key_of: fn(&TransactionRecord) -> (i32, Option<u32>),
    ) -> Result<Vec<PeriodSummary>> {
        let transactions = self.repository.transactions_for(investor_key)?;
        debug!(
            "Aggregating {} transactions for investor {}",
            transactions.len(),
            investor_key
        );

        let mut by_period: BTreeMap<(i32, Option<u32>), Decimal> = BTreeMap::new();
        for record in &transactions {
            let Some(amount) = record.amount else {
                continue;
            };
            if amount <= Decimal::ZERO || record.txn_type.is_tax() {
                continue;
            }
            *by_period.entry(key_of(record)).or_default() += amount;
        }

        let mut cumulative = Decimal::ZERO;
        Ok(by_period
            .into_iter()
            .map(|((year, month), amount)| {
                cumulative += amount;
                PeriodSummary {
                    year,
                    month,
                    amount,
                    cumulative,
                }
            })
            .collect())
    }
}

impl PeriodServiceTrait for PeriodService {
    fn monthly_investments(&self, investor_key: &str) -> Result<Vec<PeriodSummary>> {
        self.aggregate(investor_key, |record| {
            (record.date.year(), Some(record.date.month()))
        })
    }

    fn yearly_investments(&self, investor_key: &str) -> Result<Vec<PeriodSummary>> {
        self.aggregate(investor_key, |record| (record.date.year(), None))
    }
}
