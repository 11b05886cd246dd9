//! Pre-qualification affordability estimator.
//!
//! Solves for the maximum purchase price a borrower qualifies for from
//! income, existing debt, credit standing, and available cash, then derives
//! the implied loan, payment, DTI ratio, qualification tier, and the
//! program/recommendation notes shown on the results panel. Single
//! deterministic pass over fixed policy tables; no external rate lookup.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::annuity;
use crate::error::HomeFinanceError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::HomeFinanceResult;

// ---------------------------------------------------------------------------
// Policy constants
// ---------------------------------------------------------------------------

/// Solver term in months (30-year fixed).
const SOLVER_TERM_MONTHS: u32 = 360;

/// Haircut on the income-derived loan, leaving room for taxes, insurance
/// and PMI that this pass does not model explicitly.
const PAYMENT_SAFETY_FACTOR: Decimal = dec!(0.80);

/// Share of the purchase price reserved for closing costs when sizing the
/// cash-limited price.
const CLOSING_COST_RESERVE: Decimal = dec!(0.03);

/// DTI percent above which a debt-reduction note is emitted.
const DTI_WARNING_PCT: Decimal = dec!(43);

/// Exclusive DTI percent ceiling for the Strong tier.
const STRONG_TIER_DTI_PCT: Decimal = dec!(36);

/// Exclusive DTI percent ceiling for the Moderate tier.
const MODERATE_TIER_DTI_PCT: Decimal = dec!(45);

/// Purchase price must clear this floor for the Strong tier and for
/// overall qualification.
const QUALIFYING_PRICE_FLOOR: Decimal = dec!(100_000);

/// DTI percent at or above which the estimate is flagged non-qualifying.
const DISQUALIFYING_DTI_PCT: Decimal = dec!(50);

/// Down-payment percent at which PMI no longer applies.
const PMI_AVOIDANCE_PCT: Decimal = dec!(20);

/// Reserves below this share of the purchase price trigger a savings note.
const RESERVE_TARGET_FRACTION: Decimal = dec!(0.06);

/// Base annual rate by credit tier, in percent.
fn base_rate_pct(tier: CreditTier) -> Percent {
    match tier {
        CreditTier::Excellent => dec!(6.25),
        CreditTier::Good => dec!(6.75),
        CreditTier::Fair => dec!(7.50),
        CreditTier::Poor => dec!(8.50),
    }
}

/// Rate adjustment by loan program, in percent.
fn program_rate_adjustment_pct(program: LoanProgram) -> Percent {
    match program {
        LoanProgram::Conventional | LoanProgram::Usda => Decimal::ZERO,
        LoanProgram::Fha => dec!(0.25),
        LoanProgram::Va => dec!(-0.25),
    }
}

/// Maximum share of gross monthly income toward debt plus housing.
fn max_dti_fraction(program: LoanProgram) -> Decimal {
    match program {
        LoanProgram::Fha => dec!(0.50),
        LoanProgram::Va => dec!(0.55),
        LoanProgram::Conventional | LoanProgram::Usda => dec!(0.45),
    }
}

/// Minimum down payment required by each program, in percent.
fn min_down_payment_pct(program: LoanProgram) -> Percent {
    match program {
        LoanProgram::Conventional => dec!(3),
        LoanProgram::Fha => dec!(3.5),
        LoanProgram::Va | LoanProgram::Usda => Decimal::ZERO,
    }
}

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Borrower credit standing, as self-reported on the pre-qualification form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreditTier {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl std::fmt::Display for CreditTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreditTier::Excellent => write!(f, "Excellent"),
            CreditTier::Good => write!(f, "Good"),
            CreditTier::Fair => write!(f, "Fair"),
            CreditTier::Poor => write!(f, "Poor"),
        }
    }
}

/// Loan program the borrower is qualifying against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanProgram {
    Conventional,
    Fha,
    Va,
    Usda,
}

impl std::fmt::Display for LoanProgram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoanProgram::Conventional => write!(f, "Conventional"),
            LoanProgram::Fha => write!(f, "FHA"),
            LoanProgram::Va => write!(f, "VA"),
            LoanProgram::Usda => write!(f, "USDA"),
        }
    }
}

/// Pre-qualification form fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityInputs {
    /// Gross annual income.
    pub annual_income: Money,
    /// Additional annual income (co-borrower, rental, commissions).
    pub additional_annual_income: Money,
    /// Total monthly debt payments (cards, autos, student loans).
    pub monthly_debt_payments: Money,
    /// Self-reported credit standing.
    pub credit_tier: CreditTier,
    /// Liquid savings available at closing.
    pub liquid_savings: Money,
    /// Gift funds available at closing.
    pub gift_funds: Money,
    /// Loan program to qualify against.
    pub loan_program: LoanProgram,
    /// Desired down payment in percent of the purchase price.
    pub desired_down_payment_pct: Percent,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Qualification strength bucket shown on the results panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualificationTier {
    Strong,
    Moderate,
    Weak,
}

impl std::fmt::Display for QualificationTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QualificationTier::Strong => write!(f, "Strong"),
            QualificationTier::Moderate => write!(f, "Moderate"),
            QualificationTier::Weak => write!(f, "Weak"),
        }
    }
}

/// Affordability estimate for the borrower.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityResult {
    /// Maximum qualifying purchase price.
    pub max_purchase_price: Money,
    /// Loan amount implied by the price and effective down payment.
    pub max_loan_amount: Money,
    /// Level monthly payment on that loan.
    pub estimated_monthly_payment: Money,
    /// Annual rate used by the solver, in percent.
    pub estimated_rate_pct: Percent,
    /// Debt-to-income ratio at the estimated payment, in percent.
    pub debt_to_income_ratio_pct: Percent,
    /// Qualification strength bucket.
    pub qualification_tier: QualificationTier,
    /// False when the price or DTI falls outside the qualification floors.
    pub is_qualified: bool,
    /// Program notes, in display order.
    pub eligible_programs: Vec<String>,
    /// Improvement suggestions, in display order.
    pub recommendations: Vec<String>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Estimate the maximum qualifying purchase price and qualification
/// strength for a borrower.
pub fn estimate_affordability(
    input: &AffordabilityInputs,
) -> HomeFinanceResult<ComputationOutput<AffordabilityResult>> {
    let start = Instant::now();

    let (result, warnings) = run_estimate(input)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Pre-Qualification Affordability Estimate (DTI and Cash Constraints)",
        input,
        warnings,
        elapsed,
        result,
    ))
}

/// Qualification tier from the price, DTI and credit policy cutoffs.
///
/// Exposed separately so the tier boundaries can be exercised in isolation
/// from the solver arithmetic.
pub fn derive_qualification_tier(
    max_purchase_price: Money,
    dti_pct: Percent,
    credit_tier: CreditTier,
) -> QualificationTier {
    if max_purchase_price > QUALIFYING_PRICE_FLOOR
        && dti_pct < STRONG_TIER_DTI_PCT
        && credit_tier != CreditTier::Poor
    {
        QualificationTier::Strong
    } else if dti_pct < MODERATE_TIER_DTI_PCT {
        QualificationTier::Moderate
    } else {
        QualificationTier::Weak
    }
}

// ---------------------------------------------------------------------------
// Estimation pass
// ---------------------------------------------------------------------------

fn run_estimate(
    input: &AffordabilityInputs,
) -> HomeFinanceResult<(AffordabilityResult, Vec<String>)> {
    let mut warnings: Vec<String> = Vec::new();
    validate_inputs(input)?;

    let rate_pct =
        base_rate_pct(input.credit_tier) + program_rate_adjustment_pct(input.loan_program);
    let monthly_rate = rate_pct / dec!(100) / dec!(12);

    let monthly_income = (input.annual_income + input.additional_annual_income) / dec!(12);
    let max_housing_payment =
        monthly_income * max_dti_fraction(input.loan_program) - input.monthly_debt_payments;

    // A consumed housing budget sizes the loan to zero rather than failing.
    let income_limited_loan = if max_housing_payment > Decimal::ZERO {
        annuity::principal_for_payment(max_housing_payment, monthly_rate, SOLVER_TERM_MONTHS)?
            * PAYMENT_SAFETY_FACTOR
    } else {
        warnings.push("Existing debt consumes the full housing budget".into());
        Decimal::ZERO
    };

    let effective_down_pct = input
        .desired_down_payment_pct
        .max(min_down_payment_pct(input.loan_program));
    // effective_down_pct < 100 is validated, so the financed share is positive.
    let financed_fraction = Decimal::ONE - effective_down_pct / dec!(100);
    let income_limited_price = income_limited_loan / financed_fraction;

    let available_funds = input.liquid_savings + input.gift_funds;
    let cash_limited_price =
        available_funds / (effective_down_pct / dec!(100) + CLOSING_COST_RESERVE);

    let mut max_purchase_price = income_limited_price.min(cash_limited_price);
    if max_purchase_price < Decimal::ZERO {
        max_purchase_price = Decimal::ZERO;
    }

    let max_loan_amount = max_purchase_price * financed_fraction;
    let estimated_monthly_payment =
        annuity::level_payment(max_loan_amount, monthly_rate, SOLVER_TERM_MONTHS)?;

    let debt_to_income_ratio_pct = if monthly_income.is_zero() {
        warnings.push("Monthly income is zero — debt-to-income ratio reported as 0".into());
        Decimal::ZERO
    } else {
        (estimated_monthly_payment + input.monthly_debt_payments) / monthly_income * dec!(100)
    };

    let eligible_programs = collect_eligible_programs(input, debt_to_income_ratio_pct);
    let recommendations = collect_recommendations(
        input,
        debt_to_income_ratio_pct,
        effective_down_pct,
        available_funds,
        max_purchase_price,
    );

    let qualification_tier = derive_qualification_tier(
        max_purchase_price,
        debt_to_income_ratio_pct,
        input.credit_tier,
    );
    let is_qualified = max_purchase_price > QUALIFYING_PRICE_FLOOR
        && debt_to_income_ratio_pct < DISQUALIFYING_DTI_PCT;

    Ok((
        AffordabilityResult {
            max_purchase_price,
            max_loan_amount,
            estimated_monthly_payment,
            estimated_rate_pct: rate_pct,
            debt_to_income_ratio_pct,
            qualification_tier,
            is_qualified,
            eligible_programs,
            recommendations,
        },
        warnings,
    ))
}

/// Program notes for the results panel. Insertion order is display order.
fn collect_eligible_programs(input: &AffordabilityInputs, dti_pct: Percent) -> Vec<String> {
    let mut programs: Vec<String> = Vec::new();

    if input.loan_program == LoanProgram::Va {
        programs.push("VA Home Loan – 0% Down".into());
    }
    if input.loan_program == LoanProgram::Fha {
        programs.push("FHA Loan – 3.5% Down".into());
    }
    if input.loan_program == LoanProgram::Usda {
        programs.push("USDA Rural Development Loan – 0% Down".into());
    }
    if input.credit_tier == CreditTier::Excellent {
        programs.push("Qualifies for best available rates".into());
    }
    if dti_pct < STRONG_TIER_DTI_PCT {
        programs.push("Conventional Loan – competitive rates available".into());
    }

    programs
}

/// Improvement suggestions. Independent checks, insertion order preserved.
fn collect_recommendations(
    input: &AffordabilityInputs,
    dti_pct: Percent,
    effective_down_pct: Percent,
    available_funds: Money,
    max_purchase_price: Money,
) -> Vec<String> {
    let mut notes: Vec<String> = Vec::new();

    if dti_pct > DTI_WARNING_PCT {
        notes.push("Paying down existing debt would raise your price range".into());
    }
    if matches!(input.credit_tier, CreditTier::Fair | CreditTier::Poor) {
        notes.push("Improving your credit score would lower your rate".into());
    }
    if effective_down_pct < PMI_AVOIDANCE_PCT {
        notes.push("A 20% down payment avoids private mortgage insurance".into());
    }
    if available_funds < max_purchase_price * RESERVE_TARGET_FRACTION {
        notes.push("Consider building additional reserves for closing costs".into());
    }

    notes
}

fn validate_inputs(input: &AffordabilityInputs) -> HomeFinanceResult<()> {
    if input.annual_income < Decimal::ZERO {
        return Err(HomeFinanceError::InvalidInput {
            field: "annual_income".into(),
            reason: "Annual income cannot be negative".into(),
        });
    }
    if input.additional_annual_income < Decimal::ZERO {
        return Err(HomeFinanceError::InvalidInput {
            field: "additional_annual_income".into(),
            reason: "Additional income cannot be negative".into(),
        });
    }
    if input.monthly_debt_payments < Decimal::ZERO {
        return Err(HomeFinanceError::InvalidInput {
            field: "monthly_debt_payments".into(),
            reason: "Monthly debt payments cannot be negative".into(),
        });
    }
    if input.liquid_savings < Decimal::ZERO {
        return Err(HomeFinanceError::InvalidInput {
            field: "liquid_savings".into(),
            reason: "Liquid savings cannot be negative".into(),
        });
    }
    if input.gift_funds < Decimal::ZERO {
        return Err(HomeFinanceError::InvalidInput {
            field: "gift_funds".into(),
            reason: "Gift funds cannot be negative".into(),
        });
    }
    if input.desired_down_payment_pct < Decimal::ZERO
        || input.desired_down_payment_pct >= dec!(100)
    {
        return Err(HomeFinanceError::InvalidInput {
            field: "desired_down_payment_pct".into(),
            reason: "Down payment percent must be at least 0 and below 100".into(),
        });
    }
    Ok(())
}
