pub mod period_model;
pub mod period_service;

pub use period_model::PeriodSummary;
pub use period_service::{PeriodService, PeriodServiceTrait, TransactionRepositoryTrait};
