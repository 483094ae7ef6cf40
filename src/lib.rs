pub mod constants;
pub mod errors;
pub mod ledger;
pub mod nav;
pub mod period;
pub mod transactions;
pub mod utils;
pub mod valuation;

pub use errors::{Error, Result};
pub use ledger::{FifoLedger, LedgerState, Lot, ProcessedTransaction};
pub use nav::{NavEntry, NavError, NavResolver, NavResolverTrait, NavStoreTrait, RetryPolicy};
pub use period::{PeriodService, PeriodServiceTrait, PeriodSummary, TransactionRepositoryTrait};
pub use transactions::{TransactionRecord, TransactionType};
pub use valuation::{
    scheme_value_series, xirr, PortfolioValuation, SchemeTransactions, SchemeValue,
    ValuationService, ValuationServiceTrait, ValuationSnapshot,
};
