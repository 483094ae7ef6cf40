use chrono::NaiveDate;
use log::debug;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

use crate::errors::{CalculatorError, Result};

const DAYS_PER_YEAR: Decimal = dec!(365.2425);
const NEWTON_MAX_ITERATIONS: u32 = 100;
const NEWTON_STEP_TOLERANCE: Decimal = dec!(0.000001);
const BISECTION_MAX_ITERATIONS: u32 = 200;
const BISECTION_TOLERANCE: Decimal = dec!(0.00000001);
const BRACKET_LOW: Decimal = dec!(-0.999999);
const BRACKET_HIGH: Decimal = dec!(10);

/// Money-weighted return of a dated cash-flow series: the rate at which
/// the discounted sum of all flows is zero. Outflows (investments) are
/// negative, inflows (redemptions, terminal valuation) positive.
///
/// Newton-Raphson from a flat guess, falling back to bisection over a
/// wide bracket when the iteration diverges or leaves the domain.
pub fn xirr(flows: &BTreeMap<NaiveDate, Decimal>) -> Result<Decimal> {
    if flows.is_empty() {
        return Err(
            CalculatorError::Calculation("Cash flow series is empty".to_string()).into(),
        );
    }
    let has_outflow = flows.values().any(|value| value < &Decimal::ZERO);
    let has_inflow = flows.values().any(|value| value > &Decimal::ZERO);
    if !has_outflow || !has_inflow {
        return Err(CalculatorError::Calculation(
            "Cash flows must contain both an outflow and an inflow".to_string(),
        )
        .into());
    }

    newton_raphson(flows).or_else(|err| {
        debug!("Newton-Raphson failed ({err}), falling back to bisection");
        bisection(flows)
    })
}

fn year_fraction(t0: NaiveDate, date: NaiveDate) -> Decimal {
    Decimal::from((date - t0).num_days()) / DAYS_PER_YEAR
}

/// Stand-in for a discounted term whose magnitude exceeds the `Decimal`
/// range. Rates near -100% collapse the denominator toward zero, so the
/// term keeps its sign and saturates rather than overflowing.
fn saturate(value: Decimal) -> Decimal {
    if value.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}

/// Net present value of the series at `rate`. `None` when the rate is
/// outside the domain (at or below -100%).
fn xnpv(flows: &BTreeMap<NaiveDate, Decimal>, rate: Decimal) -> Option<Decimal> {
    if rate <= dec!(-1) {
        return None;
    }
    let t0 = *flows.keys().next()?;
    let base = Decimal::ONE + rate;
    let mut sum = Decimal::ZERO;
    for (date, value) in flows {
        match base.checked_powd(year_fraction(t0, *date)) {
            Some(denominator) if !denominator.is_zero() => {
                let term = value
                    .checked_div(denominator)
                    .unwrap_or_else(|| saturate(*value));
                sum = sum.saturating_add(term);
            }
            // Overflowing denominators discount the flow to nothing.
            _ => {}
        }
    }
    Some(sum)
}

fn xnpv_derivative(flows: &BTreeMap<NaiveDate, Decimal>, rate: Decimal) -> Option<Decimal> {
    if rate <= dec!(-1) {
        return None;
    }
    let t0 = *flows.keys().next()?;
    let base = Decimal::ONE + rate;
    let mut sum = Decimal::ZERO;
    for (date, value) in flows {
        let t = year_fraction(t0, *date);
        match base.checked_powd(t + Decimal::ONE) {
            Some(denominator) if !denominator.is_zero() => {
                let numerator = value.checked_mul(t).unwrap_or_else(|| saturate(*value));
                let term = numerator
                    .checked_div(denominator)
                    .unwrap_or_else(|| saturate(numerator));
                sum = sum.saturating_sub(term);
            }
            _ => {}
        }
    }
    Some(sum)
}

fn newton_raphson(flows: &BTreeMap<NaiveDate, Decimal>) -> Result<Decimal> {
    let domain_err =
        || CalculatorError::Calculation("Rate left the solver domain".to_string());

    let mut guess = dec!(0.1);
    for _ in 0..NEWTON_MAX_ITERATIONS {
        let value = xnpv(flows, guess).ok_or_else(domain_err)?;
        let derivative = xnpv_derivative(flows, guess).ok_or_else(domain_err)?;
        if derivative.is_zero() {
            return Err(CalculatorError::Calculation("Derivative is zero".to_string()).into());
        }
        let step = value.checked_div(derivative).ok_or_else(|| {
            CalculatorError::Calculation("Solver step overflowed".to_string())
        })?;
        if step.abs() < NEWTON_STEP_TOLERANCE {
            return Ok(guess - step);
        }
        guess = guess.saturating_sub(step);
    }
    Err(CalculatorError::Calculation("Newton-Raphson did not converge".to_string()).into())
}

fn bisection(flows: &BTreeMap<NaiveDate, Decimal>) -> Result<Decimal> {
    let mut low = BRACKET_LOW;
    let mut high = BRACKET_HIGH;
    let mut f_low = xnpv(flows, low)
        .ok_or_else(|| CalculatorError::Calculation("NPV undefined at bracket".to_string()))?;
    let f_high = xnpv(flows, high)
        .ok_or_else(|| CalculatorError::Calculation("NPV undefined at bracket".to_string()))?;

    // Sign comparison, not a product: bracket values can sit at the
    // saturation limits where multiplying them would overflow.
    if f_low.is_sign_positive() == f_high.is_sign_positive() {
        return Err(CalculatorError::Calculation(
            "Cash flow series has no root in the bracket".to_string(),
        )
        .into());
    }

    let mut mid = (low + high) / dec!(2);
    for _ in 0..BISECTION_MAX_ITERATIONS {
        mid = (low + high) / dec!(2);
        let f_mid = match xnpv(flows, mid) {
            Some(value) => value,
            None => break,
        };
        if f_mid.abs() < BISECTION_TOLERANCE {
            return Ok(mid);
        }
        if f_low.is_sign_positive() != f_mid.is_sign_positive() {
            high = mid;
        } else {
            low = mid;
            f_low = f_mid;
        }
    }
    // The interval is tight enough after the iteration cap.
    Ok(mid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn series(flows: &[(NaiveDate, Decimal)]) -> BTreeMap<NaiveDate, Decimal> {
        flows.iter().copied().collect()
    }

    #[test]
    fn doubling_over_a_year_is_about_hundred_percent() {
        let flows = series(&[
            (d(2022, 1, 1), dec!(-1000)),
            (d(2023, 1, 1), dec!(2000)),
        ]);
        let rate = xirr(&flows).unwrap();
        assert!((rate - Decimal::ONE).abs() < dec!(0.01), "rate = {rate}");
    }

    #[test]
    fn ten_percent_gain_over_a_year() {
        let flows = series(&[
            (d(2022, 1, 1), dec!(-1000)),
            (d(2023, 1, 1), dec!(1100)),
        ]);
        let rate = xirr(&flows).unwrap();
        assert!((rate - dec!(0.10)).abs() < dec!(0.005), "rate = {rate}");
    }

    #[test]
    fn losing_money_gives_negative_rate() {
        let flows = series(&[
            (d(2022, 1, 1), dec!(-1000)),
            (d(2023, 1, 1), dec!(800)),
        ]);
        let rate = xirr(&flows).unwrap();
        assert!(rate < Decimal::ZERO, "rate = {rate}");
        assert!((rate + dec!(0.20)).abs() < dec!(0.005), "rate = {rate}");
    }

    #[test]
    fn staggered_contributions_converge() {
        let flows = series(&[
            (d(2022, 1, 1), dec!(-1000)),
            (d(2022, 7, 1), dec!(-1000)),
            (d(2023, 1, 1), dec!(2200)),
        ]);
        let rate = xirr(&flows).unwrap();
        assert!(rate > Decimal::ZERO && rate < dec!(0.30), "rate = {rate}");
    }

    #[test]
    fn near_total_loss_over_years_converges_without_overflow() {
        // Newton overshoots below -100% on this series and the fallback
        // bracket starts at -0.999999, where large flows dated years
        // after the first push the discounted terms past Decimal range.
        let flows = series(&[
            (d(2018, 1, 1), dec!(-1000000000)),
            (d(2022, 1, 1), dec!(1000000)),
        ]);
        let rate = xirr(&flows).unwrap();
        // (1e6 / 1e9)^(1/4) - 1
        assert!((rate + dec!(0.8222)).abs() < dec!(0.01), "rate = {rate}");
    }

    #[test]
    fn empty_series_is_rejected() {
        assert!(xirr(&BTreeMap::new()).is_err());
    }

    #[test]
    fn one_sided_series_is_rejected() {
        let flows = series(&[
            (d(2022, 1, 1), dec!(-1000)),
            (d(2022, 6, 1), dec!(-500)),
        ]);
        assert!(xirr(&flows).is_err());
    }
}
