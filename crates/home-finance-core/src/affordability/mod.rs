pub mod estimator;

pub use estimator::{
    derive_qualification_tier, estimate_affordability, AffordabilityInputs, AffordabilityResult,
    CreditTier, LoanProgram, QualificationTier,
};
