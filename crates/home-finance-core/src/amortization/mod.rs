pub mod schedule;

pub use schedule::{
    compute_schedule, is_report_month, sample_schedule, AmortizationOutput, AmortizationRow,
    LoanInputs, PaymentBreakdown,
};
