use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Decimal precision for monetary amounts (invested, realized P&L)
pub const MONEY_PRECISION: u32 = 2;

/// Decimal precision for the average cost per unit
pub const AVERAGE_COST_PRECISION: u32 = 4;

/// Decimal precision for scheme valuations (balance x NAV)
pub const VALUE_PRECISION: u32 = 4;

/// Decimal precision used when serializing decimal fields
pub const DECIMAL_PRECISION: u32 = 6;

/// Unit balances at or below this magnitude are treated as flat when
/// recomputing the average cost
pub const BALANCE_THRESHOLD: Decimal = dec!(0.01);

/// Default number of backward retries before a NAV lookup gives up
pub const MAX_NAV_RETRIES: u32 = 4;

/// How many calendar days the daily value series looks back for a NAV
pub const SERIES_NAV_LOOKBACK_DAYS: u32 = 10;
