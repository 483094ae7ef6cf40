pub mod series;
pub mod valuation_model;
pub mod valuation_service;
pub mod xirr;

pub use series::scheme_value_series;
pub use valuation_model::{PortfolioValuation, SchemeTransactions, SchemeValue, ValuationSnapshot};
pub use valuation_service::{ValuationService, ValuationServiceTrait};
pub use xirr::xirr;
