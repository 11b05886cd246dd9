//! Fixed-rate mortgage amortization: payment breakdown and monthly ledger.
//!
//! Computes the level principal-and-interest payment, escrow add-ons
//! (property tax, homeowner's insurance, PMI), loan lifetime totals, and a
//! complete month-by-month amortization schedule. All math in
//! `rust_decimal::Decimal`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::annuity;
use crate::error::HomeFinanceError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::HomeFinanceResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Annual PMI rate applied to the loan amount (0.7%). Flat policy
/// assumption; not derived from credit data.
const PMI_ANNUAL_RATE: Decimal = dec!(0.007);

/// Down-payment fraction at or above which PMI is waived.
const PMI_WAIVER_FRACTION: Decimal = dec!(0.20);

/// Loan terms offered by the product, in years.
pub const SUPPORTED_TERM_YEARS: [u32; 5] = [10, 15, 20, 25, 30];

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Loan parameters for a fixed-rate mortgage quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInputs {
    /// Purchase price of the home.
    pub home_price: Money,
    /// Cash down payment. Must be less than the home price.
    pub down_payment: Money,
    /// Annual note rate in percent (6.5 = 6.5%).
    pub annual_interest_rate_pct: Percent,
    /// Loan term in years. One of [`SUPPORTED_TERM_YEARS`].
    pub term_years: u32,
    /// Annual property tax in percent of the home price.
    pub annual_property_tax_rate_pct: Percent,
    /// Annual homeowner's insurance premium.
    pub annual_insurance_premium: Money,
    /// Include private mortgage insurance when the down payment is below 20%.
    pub include_pmi: bool,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Monthly payment components and loan lifetime totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentBreakdown {
    /// Amount financed (home price minus down payment).
    pub loan_amount: Money,
    /// Level monthly principal-and-interest payment.
    pub principal_and_interest: Money,
    /// Monthly property tax escrow.
    pub monthly_property_tax: Money,
    /// Monthly insurance escrow.
    pub monthly_insurance: Money,
    /// Monthly PMI. Zero when waived or not requested.
    pub monthly_pmi: Money,
    /// Sum of the four monthly components.
    pub total_monthly_payment: Money,
    /// Interest paid over the full term.
    pub total_interest_over_term: Money,
    /// All payments (including escrow) over the full term.
    pub total_cost_over_term: Money,
}

/// One month of the amortization ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// Month number (1-indexed).
    pub month: u32,
    /// Principal-and-interest payment for this month.
    pub payment_amount: Money,
    /// Portion of the payment applied to principal.
    pub principal_portion: Money,
    /// Portion of the payment applied to interest.
    pub interest_portion: Money,
    /// Loan balance after this month's payment.
    pub remaining_balance: Money,
}

/// Full amortization result: breakdown plus the complete monthly schedule.
///
/// The schedule carries every month; display layers thin it with
/// [`sample_schedule`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationOutput {
    pub breakdown: PaymentBreakdown,
    pub schedule: Vec<AmortizationRow>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the payment breakdown and month-by-month amortization schedule
/// for a fixed-rate loan.
pub fn compute_schedule(
    input: &LoanInputs,
) -> HomeFinanceResult<ComputationOutput<AmortizationOutput>> {
    let start = Instant::now();

    let (output, warnings) = build_schedule(input)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-Rate Mortgage Amortization (Level Annuity)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// True for the months the payment-table display reports: the entire first
/// year, each fifth anniversary, and the final payment.
pub fn is_report_month(month: u32, num_payments: u32) -> bool {
    month <= 12 || month % 60 == 0 || month == num_payments
}

/// Thin a full schedule down to the report months.
pub fn sample_schedule(schedule: &[AmortizationRow], num_payments: u32) -> Vec<AmortizationRow> {
    schedule
        .iter()
        .filter(|row| is_report_month(row.month, num_payments))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Schedule construction
// ---------------------------------------------------------------------------

fn build_schedule(input: &LoanInputs) -> HomeFinanceResult<(AmortizationOutput, Vec<String>)> {
    let mut warnings: Vec<String> = Vec::new();
    validate_inputs(input)?;

    let principal = input.home_price - input.down_payment;
    let monthly_rate = input.annual_interest_rate_pct / dec!(100) / dec!(12);
    let num_payments = input.term_years * 12;

    let monthly_pi = annuity::level_payment(principal, monthly_rate, num_payments)?;
    if monthly_rate.is_zero() {
        warnings.push("Zero interest rate — straight-line amortization applied".into());
    }

    let monthly_tax =
        input.home_price * (input.annual_property_tax_rate_pct / dec!(100)) / dec!(12);
    let monthly_insurance = input.annual_insurance_premium / dec!(12);

    // home_price > 0 is validated above, so the fraction is well-defined.
    let down_payment_fraction = input.down_payment / input.home_price;
    let monthly_pmi = if input.include_pmi && down_payment_fraction < PMI_WAIVER_FRACTION {
        principal * PMI_ANNUAL_RATE / dec!(12)
    } else {
        Decimal::ZERO
    };

    let total_monthly_payment = monthly_pi + monthly_tax + monthly_insurance + monthly_pmi;
    let n = Decimal::from(num_payments);
    let total_interest_over_term = monthly_pi * n - principal;
    let total_cost_over_term = total_monthly_payment * n;

    let mut schedule = Vec::with_capacity(num_payments as usize);
    let mut balance = principal;

    for month in 1..=num_payments {
        let interest_portion = balance * monthly_rate;
        let principal_portion = monthly_pi - interest_portion;

        balance -= principal_portion;
        if balance < Decimal::ZERO {
            balance = Decimal::ZERO;
        }

        schedule.push(AmortizationRow {
            month,
            payment_amount: monthly_pi,
            principal_portion,
            interest_portion,
            remaining_balance: balance,
        });
    }

    Ok((
        AmortizationOutput {
            breakdown: PaymentBreakdown {
                loan_amount: principal,
                principal_and_interest: monthly_pi,
                monthly_property_tax: monthly_tax,
                monthly_insurance,
                monthly_pmi,
                total_monthly_payment,
                total_interest_over_term,
                total_cost_over_term,
            },
            schedule,
        },
        warnings,
    ))
}

fn validate_inputs(input: &LoanInputs) -> HomeFinanceResult<()> {
    if input.home_price <= Decimal::ZERO {
        return Err(HomeFinanceError::InvalidInput {
            field: "home_price".into(),
            reason: "Home price must be positive".into(),
        });
    }
    if input.down_payment < Decimal::ZERO {
        return Err(HomeFinanceError::InvalidInput {
            field: "down_payment".into(),
            reason: "Down payment cannot be negative".into(),
        });
    }
    if input.down_payment >= input.home_price {
        return Err(HomeFinanceError::InvalidInput {
            field: "down_payment".into(),
            reason: "Down payment must be less than the home price".into(),
        });
    }
    if input.annual_interest_rate_pct < Decimal::ZERO {
        return Err(HomeFinanceError::InvalidInput {
            field: "annual_interest_rate_pct".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }
    if !SUPPORTED_TERM_YEARS.contains(&input.term_years) {
        return Err(HomeFinanceError::InvalidInput {
            field: "term_years".into(),
            reason: format!("Term must be one of {SUPPORTED_TERM_YEARS:?} years"),
        });
    }
    if input.annual_property_tax_rate_pct < Decimal::ZERO {
        return Err(HomeFinanceError::InvalidInput {
            field: "annual_property_tax_rate_pct".into(),
            reason: "Property tax rate cannot be negative".into(),
        });
    }
    if input.annual_insurance_premium < Decimal::ZERO {
        return Err(HomeFinanceError::InvalidInput {
            field: "annual_insurance_premium".into(),
            reason: "Insurance premium cannot be negative".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const CENT: Decimal = dec!(0.01);

    fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tol,
            "{}: expected ~{}, got {} (diff = {})",
            msg,
            expected,
            actual,
            diff
        );
    }

    fn standard_loan_input() -> LoanInputs {
        LoanInputs {
            home_price: dec!(450_000),
            down_payment: dec!(90_000),
            annual_interest_rate_pct: dec!(6.5),
            term_years: 30,
            annual_property_tax_rate_pct: dec!(1.2),
            annual_insurance_premium: dec!(1_800),
            include_pmi: true,
        }
    }

    fn run_schedule(input: &LoanInputs) -> AmortizationOutput {
        compute_schedule(input).unwrap().result
    }

    // -----------------------------------------------------------------------
    // 1. Known-value check: 450k home, 90k down, 6.5% over 30 years
    // -----------------------------------------------------------------------
    #[test]
    fn test_known_value_breakdown() {
        let out = run_schedule(&standard_loan_input());
        let b = &out.breakdown;

        assert_eq!(b.loan_amount, dec!(360_000));
        assert_close(
            b.principal_and_interest,
            dec!(2275),
            dec!(2),
            "Monthly P&I for 360k at 6.5%/30y",
        );
        assert_eq!(b.monthly_property_tax, dec!(450));
        assert_eq!(b.monthly_insurance, dec!(150));
        // Down payment is exactly 20%, so PMI is waived even when requested.
        assert_eq!(b.monthly_pmi, Decimal::ZERO);
        assert_close(
            b.total_monthly_payment,
            b.principal_and_interest + dec!(600),
            CENT,
            "Total payment is P&I plus escrow",
        );
    }

    // -----------------------------------------------------------------------
    // 2. Principal portions sum to the amount financed
    // -----------------------------------------------------------------------
    #[test]
    fn test_principal_sums_to_loan_amount() {
        let out = run_schedule(&standard_loan_input());

        let principal_paid: Decimal = out.schedule.iter().map(|r| r.principal_portion).sum();
        assert_close(
            principal_paid,
            dec!(360_000),
            CENT,
            "Sum of principal portions",
        );
    }

    // -----------------------------------------------------------------------
    // 3. Balance is non-increasing and ends at zero
    // -----------------------------------------------------------------------
    #[test]
    fn test_balance_monotonic_and_exhausted() {
        let out = run_schedule(&standard_loan_input());

        assert_eq!(out.schedule.len(), 360);
        let mut prev = dec!(360_000);
        for row in &out.schedule {
            assert!(
                row.remaining_balance <= prev + CENT,
                "Balance rose at month {}: {} -> {}",
                row.month,
                prev,
                row.remaining_balance
            );
            prev = row.remaining_balance;
        }
        assert_close(
            out.schedule.last().unwrap().remaining_balance,
            Decimal::ZERO,
            CENT,
            "Final balance",
        );
    }

    // -----------------------------------------------------------------------
    // 4. Each row splits the payment exactly into principal and interest
    // -----------------------------------------------------------------------
    #[test]
    fn test_row_payment_composition() {
        let out = run_schedule(&standard_loan_input());

        for row in &out.schedule {
            assert_close(
                row.principal_portion + row.interest_portion,
                row.payment_amount,
                CENT,
                &format!("Month {} payment composition", row.month),
            );
        }
    }

    // -----------------------------------------------------------------------
    // 5. Zero-rate fallback: straight-line principal, no interest
    // -----------------------------------------------------------------------
    #[test]
    fn test_zero_rate_straight_line() {
        let input = LoanInputs {
            annual_interest_rate_pct: Decimal::ZERO,
            ..standard_loan_input()
        };
        let envelope = compute_schedule(&input).unwrap();
        let out = envelope.result;

        assert_eq!(out.breakdown.principal_and_interest, dec!(1000));
        assert_eq!(out.breakdown.total_interest_over_term, Decimal::ZERO);
        for row in &out.schedule {
            assert_eq!(row.interest_portion, Decimal::ZERO);
        }
        assert!(
            !envelope.warnings.is_empty(),
            "Zero-rate loans should carry a warning"
        );
    }

    // -----------------------------------------------------------------------
    // 6. PMI gating on the 20% down-payment threshold
    // -----------------------------------------------------------------------
    #[test]
    fn test_pmi_below_threshold() {
        let input = LoanInputs {
            down_payment: dec!(45_000), // 10% down
            ..standard_loan_input()
        };
        let out = run_schedule(&input);

        // 405k loan at 0.7% annually = 236.25 per month
        assert_close(
            out.breakdown.monthly_pmi,
            dec!(236.25),
            CENT,
            "PMI on a 10%-down loan",
        );
    }

    #[test]
    fn test_pmi_waived_at_threshold() {
        // Exactly 20% down: waived regardless of include_pmi.
        let out = run_schedule(&standard_loan_input());
        assert_eq!(out.breakdown.monthly_pmi, Decimal::ZERO);
    }

    #[test]
    fn test_pmi_not_requested() {
        let input = LoanInputs {
            down_payment: dec!(45_000),
            include_pmi: false,
            ..standard_loan_input()
        };
        let out = run_schedule(&input);
        assert_eq!(out.breakdown.monthly_pmi, Decimal::ZERO);
    }

    // -----------------------------------------------------------------------
    // 7. Lifetime totals
    // -----------------------------------------------------------------------
    #[test]
    fn test_lifetime_totals() {
        let out = run_schedule(&standard_loan_input());
        let b = &out.breakdown;

        assert_close(
            b.total_interest_over_term,
            b.principal_and_interest * dec!(360) - dec!(360_000),
            CENT,
            "Total interest identity",
        );
        assert_close(
            b.total_cost_over_term,
            b.total_monthly_payment * dec!(360),
            CENT,
            "Total cost identity",
        );

        let interest_paid: Decimal = out.schedule.iter().map(|r| r.interest_portion).sum();
        assert_close(
            interest_paid,
            b.total_interest_over_term,
            CENT,
            "Ledger interest matches the breakdown total",
        );
    }

    // -----------------------------------------------------------------------
    // 8. Input validation
    // -----------------------------------------------------------------------
    #[test]
    fn test_invalid_inputs_rejected() {
        let zero_price = LoanInputs {
            home_price: Decimal::ZERO,
            down_payment: Decimal::ZERO,
            ..standard_loan_input()
        };
        assert!(matches!(
            compute_schedule(&zero_price),
            Err(HomeFinanceError::InvalidInput { .. })
        ));

        let down_exceeds_price = LoanInputs {
            down_payment: dec!(450_000),
            ..standard_loan_input()
        };
        assert!(compute_schedule(&down_exceeds_price).is_err());

        let negative_rate = LoanInputs {
            annual_interest_rate_pct: dec!(-1),
            ..standard_loan_input()
        };
        assert!(compute_schedule(&negative_rate).is_err());

        let odd_term = LoanInputs {
            term_years: 17,
            ..standard_loan_input()
        };
        assert!(compute_schedule(&odd_term).is_err());
    }

    // -----------------------------------------------------------------------
    // 9. Report-month sampling
    // -----------------------------------------------------------------------
    #[test]
    fn test_report_month_policy() {
        assert!(is_report_month(1, 360));
        assert!(is_report_month(12, 360));
        assert!(!is_report_month(13, 360));
        assert!(is_report_month(60, 360));
        assert!(!is_report_month(119, 360));
        assert!(is_report_month(300, 360));
        assert!(is_report_month(360, 360));
        // Final month is always reported, even off-anniversary.
        assert!(is_report_month(120, 120));
    }

    #[test]
    fn test_sample_schedule_row_count() {
        let out = run_schedule(&standard_loan_input());
        let sampled = sample_schedule(&out.schedule, 360);

        // Months 1-12 plus 60/120/180/240/300/360.
        assert_eq!(sampled.len(), 18);
        assert_eq!(sampled.last().unwrap().month, 360);
    }
}
