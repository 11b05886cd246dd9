//! Level-payment annuity math shared by the amortization and affordability
//! modules. All arithmetic in `rust_decimal::Decimal`.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::HomeFinanceError;
use crate::types::{Money, Rate};
use crate::HomeFinanceResult;

/// Monthly payment that fully amortizes `principal` at `monthly_rate` over
/// `num_payments` months. Straight-line when the rate is zero.
pub fn level_payment(
    principal: Money,
    monthly_rate: Rate,
    num_payments: u32,
) -> HomeFinanceResult<Money> {
    if num_payments == 0 {
        return Err(HomeFinanceError::InvalidInput {
            field: "num_payments".into(),
            reason: "Number of payments must be greater than zero".into(),
        });
    }

    if monthly_rate.is_zero() {
        return Ok(principal / Decimal::from(num_payments));
    }

    let growth = compound_factor(monthly_rate, num_payments)?;
    let annuity_factor = growth - Decimal::ONE;
    if annuity_factor.is_zero() {
        return Err(HomeFinanceError::NumericError {
            context: "level payment annuity factor".into(),
        });
    }

    Ok(principal * monthly_rate * growth / annuity_factor)
}

/// Loan principal whose level payment equals `payment` at `monthly_rate`
/// over `num_payments` months. Inverse of [`level_payment`].
pub fn principal_for_payment(
    payment: Money,
    monthly_rate: Rate,
    num_payments: u32,
) -> HomeFinanceResult<Money> {
    if num_payments == 0 {
        return Err(HomeFinanceError::InvalidInput {
            field: "num_payments".into(),
            reason: "Number of payments must be greater than zero".into(),
        });
    }

    if monthly_rate.is_zero() {
        return Ok(payment * Decimal::from(num_payments));
    }

    let growth = compound_factor(monthly_rate, num_payments)?;
    let denominator = monthly_rate * growth;
    if denominator.is_zero() {
        return Err(HomeFinanceError::NumericError {
            context: "principal inversion annuity factor".into(),
        });
    }

    Ok(payment * (growth - Decimal::ONE) / denominator)
}

/// (1 + rate)^periods, with overflow reported as a numeric error instead of
/// a panic.
fn compound_factor(monthly_rate: Rate, num_payments: u32) -> HomeFinanceResult<Decimal> {
    let base = Decimal::ONE + monthly_rate;
    base.checked_powd(Decimal::from(num_payments))
        .ok_or_else(|| HomeFinanceError::NumericError {
            context: format!("compound factor (1 + {monthly_rate})^{num_payments}"),
        })
}
