use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::constants::VALUE_PRECISION;
use crate::errors::{Result, ValidationError};
use crate::ledger::FifoLedger;
use crate::nav::NavResolverTrait;
use crate::transactions::TransactionRecord;
use crate::valuation::xirr::xirr;
use crate::valuation::{PortfolioValuation, SchemeTransactions, ValuationSnapshot};

pub trait ValuationServiceTrait: Send + Sync {
    /// Values every scheme-folio as of the given date and sums the
    /// portfolio total. Any scheme whose NAV cannot be resolved fails
    /// the whole valuation; there are no partial results.
    fn value_as_of(
        &self,
        portfolios: &[SchemeTransactions],
        as_of: NaiveDate,
    ) -> Result<PortfolioValuation>;
}

/// Valuation aggregator: replays each scheme-folio's ledger, marks the
/// resulting balance to the resolved NAV, and computes the
/// money-weighted return over the full cash-flow history.
pub struct ValuationService {
    nav_resolver: Arc<dyn NavResolverTrait>,
}

impl ValuationService {
    pub fn new(nav_resolver: Arc<dyn NavResolverTrait>) -> Self {
        ValuationService { nav_resolver }
    }

    fn value_scheme(
        &self,
        scheme: &SchemeTransactions,
        as_of: NaiveDate,
    ) -> Result<ValuationSnapshot> {
        let mut ledger = FifoLedger::new();
        for record in &scheme.transactions {
            ledger.apply(record);
        }
        let state = ledger.state();

        let entry = self.nav_resolver.resolve_on(scheme.scheme_id, as_of)?;
        let total_value = (state.balance_units * entry.value).round_dp_with_strategy(
            VALUE_PRECISION,
            RoundingStrategy::MidpointAwayFromZero,
        );
        debug!(
            "Scheme {} folio {}: {} units at {} on {} = {}",
            scheme.scheme_id,
            scheme.folio_number,
            state.balance_units,
            entry.value,
            entry.date,
            total_value
        );

        let return_rate = return_rate(&scheme.transactions, entry.date, total_value);

        ValuationSnapshot::new(
            scheme.scheme_name.clone(),
            scheme.folio_number.clone(),
            entry.date.to_string(),
            total_value,
            return_rate,
        )
    }
}

impl ValuationServiceTrait for ValuationService {
    fn value_as_of(
        &self,
        portfolios: &[SchemeTransactions],
        as_of: NaiveDate,
    ) -> Result<PortfolioValuation> {
        for scheme in portfolios {
            validate_identity(scheme)?;
        }

        let mut snapshots = Vec::with_capacity(portfolios.len());
        let mut total_portfolio_value = Decimal::ZERO;
        for scheme in portfolios {
            let snapshot = self.value_scheme(scheme, as_of)?;
            total_portfolio_value += snapshot.total_value;
            snapshots.push(snapshot);
        }

        Ok(PortfolioValuation {
            as_of,
            total_portfolio_value,
            snapshots,
        })
    }
}

fn validate_identity(scheme: &SchemeTransactions) -> Result<()> {
    if scheme.scheme_name.trim().is_empty() {
        return Err(ValidationError::MissingField("schemeName".to_string()).into());
    }
    if scheme.folio_number.trim().is_empty() {
        return Err(ValidationError::MissingField("folioNumber".to_string()).into());
    }
    Ok(())
}

/// Money-weighted return of one scheme-folio. Investments enter the
/// series negated (money out of pocket), so redemptions, whose statement
/// amounts are negative, come out positive; the terminal valuation is
/// added as a final inflow on the resolved NAV date. A series the solver
/// cannot price yields rate zero rather than failing the valuation.
fn return_rate(
    transactions: &[TransactionRecord],
    terminal_date: NaiveDate,
    terminal_value: Decimal,
) -> Decimal {
    let mut flows: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for record in transactions {
        if record.txn_type.excluded_from_cash_flows() {
            continue;
        }
        if let Some(amount) = record.amount {
            *flows.entry(record.date).or_default() += -amount;
        }
    }
    *flows.entry(terminal_date).or_default() += terminal_value;

    match xirr(&flows) {
        Ok(rate) => rate,
        Err(err) => {
            warn!("Return rate unsolvable, reporting zero: {err}");
            Decimal::ZERO
        }
    }
}
