mod calculator;
mod catalog;
mod engine;
mod format;
mod input;
mod types;

pub use calculator::{
    Calculator, CalculatorDef, Evaluation, Faq, InputField, ParsedInputs, Presentation,
    ResultLine,
};
pub use catalog::{
    COMPOUND_INTEREST, INVESTMENT_FEE_IMPACT, LOAN_PAYMENT, MORTGAGE_PAYMENT,
    SALARY_TO_HOURLY, STUDENT_LOAN_PAYOFF, catalog, find,
};
pub use engine::{
    amortized_payment, compound_interest, compute_compound_interest, compute_fee_impact,
    compute_loan_payment, compute_mortgage, compute_salary, compute_student_loan, fee_impact,
    loan_payment, monthly_rate, mortgage, salary_to_hourly, student_loan, suppress,
    validate_compound_interest, validate_fee_impact, validate_loan_payment, validate_mortgage,
    validate_salary, validate_student_loan,
};
pub use format::{format_currency, format_number, format_percent, format_years_and_months};
pub use input::{
    CrossFieldError, FieldConstraint, RawInput, ValidationError, ValidationResult,
    is_non_negative, is_positive, parse_number,
};
pub use types::{
    CompoundInterestInputs, CompoundInterestResult, FeeImpactInputs, FeeImpactResult,
    LoanPaymentInputs, LoanPaymentResult, MortgageInputs, MortgageResult, Outcome, Outputs,
    SalaryInputs, SalaryResult, StudentLoanInputs, StudentLoanResult,
};
