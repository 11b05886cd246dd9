use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use home_finance_core::affordability::estimator::{
    self, AffordabilityInputs, CreditTier, LoanProgram,
};

use crate::input;

/// Arguments for the affordability estimate
#[derive(Args)]
pub struct AffordabilityArgs {
    /// Gross annual income
    #[arg(long)]
    pub annual_income: Option<Decimal>,

    /// Additional annual income (co-borrower, rental, commissions)
    #[arg(long, default_value = "0")]
    pub additional_income: Decimal,

    /// Total monthly debt payments (cards, autos, student loans)
    #[arg(long, default_value = "0")]
    pub monthly_debts: Decimal,

    /// Self-reported credit standing
    #[arg(long, value_enum, default_value = "good")]
    pub credit_tier: CreditTierArg,

    /// Liquid savings available at closing
    #[arg(long, default_value = "0")]
    pub savings: Decimal,

    /// Gift funds available at closing
    #[arg(long, default_value = "0")]
    pub gift_funds: Decimal,

    /// Loan program to qualify against
    #[arg(long, value_enum, default_value = "conventional")]
    pub loan_program: LoanProgramArg,

    /// Desired down payment in percent of the purchase price
    #[arg(long, default_value = "10")]
    pub down_payment_pct: Decimal,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum CreditTierArg {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl From<CreditTierArg> for CreditTier {
    fn from(arg: CreditTierArg) -> Self {
        match arg {
            CreditTierArg::Excellent => CreditTier::Excellent,
            CreditTierArg::Good => CreditTier::Good,
            CreditTierArg::Fair => CreditTier::Fair,
            CreditTierArg::Poor => CreditTier::Poor,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
pub enum LoanProgramArg {
    Conventional,
    Fha,
    Va,
    Usda,
}

impl From<LoanProgramArg> for LoanProgram {
    fn from(arg: LoanProgramArg) -> Self {
        match arg {
            LoanProgramArg::Conventional => LoanProgram::Conventional,
            LoanProgramArg::Fha => LoanProgram::Fha,
            LoanProgramArg::Va => LoanProgram::Va,
            LoanProgramArg::Usda => LoanProgram::Usda,
        }
    }
}

pub fn run_affordability(args: AffordabilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let estimator_input: AffordabilityInputs = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        AffordabilityInputs {
            annual_income: args
                .annual_income
                .ok_or("--annual-income is required (or provide --input)")?,
            additional_annual_income: args.additional_income,
            monthly_debt_payments: args.monthly_debts,
            credit_tier: args.credit_tier.clone().into(),
            liquid_savings: args.savings,
            gift_funds: args.gift_funds,
            loan_program: args.loan_program.clone().into(),
            desired_down_payment_pct: args.down_payment_pct,
        }
    };

    let output = estimator::estimate_affordability(&estimator_input)?;
    Ok(serde_json::to_value(output)?)
}
