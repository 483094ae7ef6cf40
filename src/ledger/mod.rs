pub mod fifo_ledger;
pub mod ledger_model;

pub use fifo_ledger::FifoLedger;
pub use ledger_model::{LedgerState, Lot, ProcessedTransaction};
