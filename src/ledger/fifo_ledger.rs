use std::collections::VecDeque;

use log::{debug, warn};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::{AVERAGE_COST_PRECISION, BALANCE_THRESHOLD, MONEY_PRECISION};
use crate::ledger::{LedgerState, Lot, ProcessedTransaction};
use crate::transactions::{TransactionRecord, TransactionType};

fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_PRECISION, RoundingStrategy::MidpointAwayFromZero)
}

/// FIFO lot-matching ledger for a single scheme-folio.
///
/// Replays a chronologically ordered transaction stream into running
/// balance, invested cost, realized P&L and average cost. Callers must
/// apply records in ascending date order; the ledger does not enforce
/// the ordering itself. It is a pure in-memory state machine with no
/// thread-safety guarantees; independent scheme-folios get independent
/// ledgers and may be replayed in parallel.
///
/// Data anomalies (missing amounts, redemptions exceeding the held
/// units) are absorbed into the numeric state, never raised as errors.
#[derive(Debug, Default)]
pub struct FifoLedger {
    state: LedgerState,
    lots: VecDeque<Lot>,
}

impl FifoLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    /// Remaining open lots, oldest first.
    pub fn lots(&self) -> impl Iterator<Item = &Lot> {
        self.lots.iter()
    }

    /// Applies one statement line.
    ///
    /// Records without an amount are skipped (certain corporate actions
    /// carry no cash effect). A positive amount is a buy unless it is an
    /// STT tax line; a negative amount is a sell; anything else leaves
    /// the position untouched.
    pub fn apply(&mut self, record: &TransactionRecord) {
        let units = record.units.unwrap_or(Decimal::ZERO);
        let nav = record.nav.unwrap_or(Decimal::ZERO);

        match record.amount {
            None => {
                debug!(
                    "Skipping {} on {}: no cash effect",
                    record.txn_type, record.date
                );
            }
            Some(amount)
                if amount > Decimal::ZERO && record.txn_type != TransactionType::SttTax =>
            {
                self.buy(units, nav, amount);
            }
            Some(amount) if amount < Decimal::ZERO => {
                self.sell(units, nav);
            }
            Some(_) => {
                // Zero amounts and positive STT lines do not change the position.
            }
        }
    }

    /// Applies records in order, capturing the ledger state after each
    /// one. The captured series feeds the daily scheme value series.
    pub fn replay(&mut self, records: &[TransactionRecord]) -> Vec<ProcessedTransaction> {
        let mut processed = Vec::with_capacity(records.len());
        for record in records {
            self.apply(record);
            processed.push(ProcessedTransaction {
                date: record.date,
                invested: self.state.invested_amount,
                average: self.state.average_cost,
                balance: self.state.balance_units,
            });
        }
        processed
    }

    fn buy(&mut self, units: Decimal, nav: Decimal, amount: Decimal) {
        self.state.balance_units += units;
        self.state.invested_amount = round_money(self.state.invested_amount + amount);
        self.lots.push_back(Lot {
            units,
            unit_cost: nav,
        });
        self.recompute_average();
    }

    fn sell(&mut self, units: Decimal, nav: Decimal) {
        let qty = units.abs();
        let mut pending = qty;
        let mut cost_removed = Decimal::ZERO;

        while pending > Decimal::ZERO {
            let Some(lot) = self.lots.pop_front() else {
                // Sold more than was ever bought. The shortfall becomes a
                // negative lot priced at the transaction NAV so that the
                // remaining lots still sum to the unit balance and a later
                // buy nets against it.
                warn!(
                    "Oversold position: {} units unmatched, recording short lot at nav {}",
                    pending, nav
                );
                cost_removed += pending * nav;
                self.lots.push_front(Lot {
                    units: -pending,
                    unit_cost: nav,
                });
                break;
            };

            if lot.units <= pending {
                cost_removed += lot.units * lot.unit_cost;
                pending -= lot.units;
            } else {
                cost_removed += pending * lot.unit_cost;
                self.lots.push_front(Lot {
                    units: lot.units - pending,
                    unit_cost: lot.unit_cost,
                });
                pending = Decimal::ZERO;
            }
        }

        self.state.invested_amount = round_money(self.state.invested_amount - cost_removed);
        self.state.balance_units -= qty;
        self.state.realized_pnl =
            round_money(self.state.realized_pnl + qty * nav - cost_removed);
        self.recompute_average();
    }

    /// Average cost is only meaningful while units are held; near-zero
    /// balances would blow up the division, so the last value is retained.
    fn recompute_average(&mut self) {
        if self.state.balance_units.abs() > BALANCE_THRESHOLD {
            self.state.average_cost = (self.state.invested_amount / self.state.balance_units)
                .round_dp_with_strategy(
                    AVERAGE_COST_PRECISION,
                    RoundingStrategy::MidpointAwayFromZero,
                );
        }
    }
}
