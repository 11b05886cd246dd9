use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use home_finance_core::amortization::schedule::{self, LoanInputs};

use crate::input;

/// Arguments for the amortization schedule calculation
#[derive(Args)]
pub struct AmortizeArgs {
    /// Purchase price of the home
    #[arg(long)]
    pub home_price: Option<Decimal>,

    /// Cash down payment
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 6.5)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in years (10, 15, 20, 25 or 30)
    #[arg(long, default_value = "30")]
    pub term_years: u32,

    /// Annual property tax rate in percent of the home price
    #[arg(long, default_value = "0")]
    pub tax_rate: Decimal,

    /// Annual homeowner's insurance premium
    #[arg(long, default_value = "0")]
    pub insurance: Decimal,

    /// Include private mortgage insurance when the down payment is below 20%
    #[arg(long)]
    pub include_pmi: bool,

    /// Emit every month of the schedule instead of the report-month sample
    #[arg(long)]
    pub full_schedule: bool,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_amortize(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input: LoanInputs = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        LoanInputs {
            home_price: args
                .home_price
                .ok_or("--home-price is required (or provide --input)")?,
            down_payment: args
                .down_payment
                .ok_or("--down-payment is required (or provide --input)")?,
            annual_interest_rate_pct: args.rate.unwrap_or(dec!(6.5)),
            term_years: args.term_years,
            annual_property_tax_rate_pct: args.tax_rate,
            annual_insurance_premium: args.insurance,
            include_pmi: args.include_pmi,
        }
    };

    let mut output = schedule::compute_schedule(&loan_input)?;
    if !args.full_schedule {
        let num_payments = loan_input.term_years * 12;
        output.result.schedule = schedule::sample_schedule(&output.result.schedule, num_payments);
    }
    Ok(serde_json::to_value(output)?)
}
