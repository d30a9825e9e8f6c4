use super::input::{CrossFieldError, FieldConstraint, ValidationResult};
use super::types::{
    CompoundInterestInputs, CompoundInterestResult, FeeImpactInputs, FeeImpactResult,
    LoanPaymentInputs, LoanPaymentResult, MortgageInputs, MortgageResult, Outcome, Outputs,
    SalaryInputs, SalaryResult, StudentLoanInputs, StudentLoanResult,
};

const MONTHS_PER_YEAR: f64 = 12.0;

const NON_NEGATIVE_NUMBER: &str = "Enter a non-negative number.";
const NON_NEGATIVE_AMOUNT: &str = "Enter a non-negative amount.";
const NON_NEGATIVE_RATE: &str = "Enter a non-negative rate.";
const NUMBER_ABOVE_ZERO: &str = "Enter a number greater than 0.";
const TERM_ABOVE_ZERO: &str = "Enter a term greater than 0.";

/// Annual percentage rate to a per-month fraction.
pub fn monthly_rate(annual_percent: f64) -> f64 {
    annual_percent / 100.0 / MONTHS_PER_YEAR
}

/// Computes only when every field passed; otherwise every output is zero.
/// A computation that still escapes to NaN/∞ is rejected the same way.
pub fn suppress<R: Outputs>(
    mut validation: ValidationResult,
    compute: impl FnOnce() -> R,
) -> Outcome<R> {
    if !validation.is_valid() {
        return Outcome {
            validation,
            result: R::default(),
        };
    }

    let result = compute();
    if result.is_finite() {
        Outcome { validation, result }
    } else {
        validation.reject("result", CrossFieldError::OutOfRange);
        Outcome {
            validation,
            result: R::default(),
        }
    }
}

/// ((1+i)^n - 1) / i, evaluated without cancellation for small i·n.
fn annuity_factor(rate: f64, periods: f64) -> f64 {
    (periods * rate.ln_1p()).exp_m1() / rate
}

/// Fixed payment that amortizes `principal` over `years` of monthly payments.
pub fn amortized_payment(principal: f64, annual_rate: f64, years: f64) -> f64 {
    let months = years * MONTHS_PER_YEAR;
    if annual_rate == 0.0 {
        return principal / months;
    }
    let i = monthly_rate(annual_rate);
    // 1 - (1+i)^-n
    let discount = -(-months * i.ln_1p()).exp_m1();
    principal * i / discount
}

pub fn validate_compound_interest(inputs: &CompoundInterestInputs) -> ValidationResult {
    let mut validation = ValidationResult::new();
    validation
        .check(
            "principal",
            inputs.principal,
            FieldConstraint::NonNegative,
            NON_NEGATIVE_NUMBER,
        )
        .check(
            "contribution",
            inputs.monthly_contribution,
            FieldConstraint::NonNegative,
            NON_NEGATIVE_NUMBER,
        )
        .check(
            "rate",
            inputs.annual_rate,
            FieldConstraint::NonNegative,
            NON_NEGATIVE_RATE,
        )
        .check(
            "years",
            inputs.years,
            FieldConstraint::Positive,
            NUMBER_ABOVE_ZERO,
        );
    validation
}

/// Monthly compounding with a contribution at the end of every month.
pub fn compute_compound_interest(inputs: &CompoundInterestInputs) -> CompoundInterestResult {
    let months = inputs.years * MONTHS_PER_YEAR;
    let total_contributions = inputs.principal + inputs.monthly_contribution * months;
    let future_value = if inputs.annual_rate == 0.0 {
        total_contributions
    } else {
        let i = monthly_rate(inputs.annual_rate);
        let growth = (1.0 + i).powf(months);
        inputs.principal * growth + inputs.monthly_contribution * annuity_factor(i, months)
    };

    CompoundInterestResult {
        future_value,
        total_contributions,
        interest_earned: future_value - total_contributions,
    }
}

pub fn compound_interest(inputs: &CompoundInterestInputs) -> Outcome<CompoundInterestResult> {
    suppress(validate_compound_interest(inputs), || {
        compute_compound_interest(inputs)
    })
}

pub fn validate_fee_impact(inputs: &FeeImpactInputs) -> ValidationResult {
    let mut validation = ValidationResult::new();
    validation
        .check(
            "startingBalance",
            inputs.starting_balance,
            FieldConstraint::NonNegative,
            NON_NEGATIVE_AMOUNT,
        )
        .check(
            "annualContribution",
            inputs.annual_contribution,
            FieldConstraint::NonNegative,
            NON_NEGATIVE_AMOUNT,
        )
        .check(
            "annualReturn",
            inputs.annual_return,
            FieldConstraint::NonNegative,
            "Enter a non-negative return rate.",
        )
        .check(
            "years",
            inputs.years,
            FieldConstraint::Positive,
            NUMBER_ABOVE_ZERO,
        )
        .check(
            "annualFee",
            inputs.annual_fee,
            FieldConstraint::NonNegative,
            "Enter a non-negative fee.",
        );

    // A net rate below -100% turns (1 + rate)^years into a root of a
    // negative number.
    if validation.is_valid() && net_rate(inputs) < -1.0 {
        validation.reject("annualFee", CrossFieldError::FeeExceedsReturn);
    }
    validation
}

fn net_rate(inputs: &FeeImpactInputs) -> f64 {
    inputs.annual_return / 100.0 - inputs.annual_fee / 100.0
}

/// Annual compounding with one contribution per year. Deliberately not the
/// monthly model used by compound interest.
fn annual_growth(start: f64, contribution: f64, rate: f64, years: f64) -> f64 {
    if rate == 0.0 {
        return start + contribution * years;
    }
    let factor = (1.0 + rate).powf(years);
    start * factor + contribution * ((factor - 1.0) / rate)
}

pub fn compute_fee_impact(inputs: &FeeImpactInputs) -> FeeImpactResult {
    let gross = inputs.annual_return / 100.0;
    let no_fee = annual_growth(
        inputs.starting_balance,
        inputs.annual_contribution,
        gross,
        inputs.years,
    );
    let with_fee = annual_growth(
        inputs.starting_balance,
        inputs.annual_contribution,
        net_rate(inputs),
        inputs.years,
    );

    FeeImpactResult {
        no_fee,
        with_fee,
        lost_to_fees: no_fee - with_fee,
        fee_rate: inputs.annual_fee,
    }
}

pub fn fee_impact(inputs: &FeeImpactInputs) -> Outcome<FeeImpactResult> {
    suppress(validate_fee_impact(inputs), || compute_fee_impact(inputs))
}

pub fn validate_loan_payment(inputs: &LoanPaymentInputs) -> ValidationResult {
    let mut validation = ValidationResult::new();
    validation
        .check(
            "amount",
            inputs.amount,
            FieldConstraint::Positive,
            "Enter a loan amount greater than 0.",
        )
        .check(
            "rate",
            inputs.annual_rate,
            FieldConstraint::NonNegative,
            NON_NEGATIVE_RATE,
        )
        .check(
            "years",
            inputs.years,
            FieldConstraint::Positive,
            TERM_ABOVE_ZERO,
        );
    validation
}

pub fn compute_loan_payment(inputs: &LoanPaymentInputs) -> LoanPaymentResult {
    let months = inputs.years * MONTHS_PER_YEAR;
    let payment = amortized_payment(inputs.amount, inputs.annual_rate, inputs.years);
    let total_cost = payment * months;
    LoanPaymentResult {
        payment,
        total_interest: total_cost - inputs.amount,
        total_cost,
    }
}

pub fn loan_payment(inputs: &LoanPaymentInputs) -> Outcome<LoanPaymentResult> {
    suppress(validate_loan_payment(inputs), || compute_loan_payment(inputs))
}

pub fn validate_mortgage(inputs: &MortgageInputs) -> ValidationResult {
    let mut validation = ValidationResult::new();
    validation
        .check(
            "homePrice",
            inputs.home_price,
            FieldConstraint::Positive,
            "Enter a home price greater than 0.",
        )
        .check(
            "downPayment",
            inputs.down_payment,
            FieldConstraint::NonNegative,
            "Enter a non-negative down payment.",
        )
        .check(
            "rate",
            inputs.annual_rate,
            FieldConstraint::NonNegative,
            NON_NEGATIVE_RATE,
        )
        .check(
            "years",
            inputs.years,
            FieldConstraint::Positive,
            TERM_ABOVE_ZERO,
        )
        .check(
            "taxRate",
            inputs.property_tax_rate,
            FieldConstraint::NonNegative,
            "Enter a non-negative tax rate.",
        )
        .check(
            "insurance",
            inputs.annual_insurance,
            FieldConstraint::NonNegative,
            NON_NEGATIVE_AMOUNT,
        )
        .check(
            "hoa",
            inputs.monthly_hoa,
            FieldConstraint::NonNegative,
            NON_NEGATIVE_AMOUNT,
        );

    if validation.is_valid() && inputs.loan_amount() < 0.0 {
        validation.reject("downPayment", CrossFieldError::DownPaymentExceedsPrice);
    }
    validation
}

pub fn compute_mortgage(inputs: &MortgageInputs) -> MortgageResult {
    let loan_amount = inputs.loan_amount();
    let principal_and_interest = amortized_payment(loan_amount, inputs.annual_rate, inputs.years);
    let taxes = inputs.home_price * (inputs.property_tax_rate / 100.0) / MONTHS_PER_YEAR;
    let insurance = inputs.annual_insurance / MONTHS_PER_YEAR;

    MortgageResult {
        loan_amount,
        principal_and_interest,
        taxes,
        insurance,
        hoa: inputs.monthly_hoa,
        total: principal_and_interest + taxes + insurance + inputs.monthly_hoa,
    }
}

pub fn mortgage(inputs: &MortgageInputs) -> Outcome<MortgageResult> {
    suppress(validate_mortgage(inputs), || compute_mortgage(inputs))
}

pub fn validate_student_loan(inputs: &StudentLoanInputs) -> ValidationResult {
    let mut validation = ValidationResult::new();
    validation
        .check(
            "balance",
            inputs.balance,
            FieldConstraint::Positive,
            "Enter a balance greater than 0.",
        )
        .check(
            "rate",
            inputs.annual_rate,
            FieldConstraint::NonNegative,
            NON_NEGATIVE_RATE,
        )
        .check(
            "payment",
            inputs.monthly_payment,
            FieldConstraint::Positive,
            "Enter a monthly payment greater than 0.",
        );

    let accrued = inputs.balance * monthly_rate(inputs.annual_rate);
    if validation.is_valid() && inputs.annual_rate > 0.0 && inputs.monthly_payment <= accrued {
        validation.reject("payment", CrossFieldError::PaymentTooLow);
    }
    validation
}

/// Solves the amortization formula for the number of months.
pub fn compute_student_loan(inputs: &StudentLoanInputs) -> StudentLoanResult {
    let months = if inputs.annual_rate == 0.0 {
        inputs.balance / inputs.monthly_payment
    } else {
        let i = monthly_rate(inputs.annual_rate);
        -(-i * inputs.balance / inputs.monthly_payment).ln_1p() / i.ln_1p()
    };
    let total_paid = inputs.monthly_payment * months.ceil();

    StudentLoanResult {
        months,
        total_interest: total_paid - inputs.balance,
        total_paid,
    }
}

pub fn student_loan(inputs: &StudentLoanInputs) -> Outcome<StudentLoanResult> {
    suppress(validate_student_loan(inputs), || compute_student_loan(inputs))
}

pub fn validate_salary(inputs: &SalaryInputs) -> ValidationResult {
    let mut validation = ValidationResult::new();
    validation
        .check(
            "salary",
            inputs.annual_salary,
            FieldConstraint::Positive,
            "Enter a salary greater than 0.",
        )
        .check(
            "hours",
            inputs.hours_per_week,
            FieldConstraint::Positive,
            "Enter hours greater than 0.",
        )
        .check(
            "weeks",
            inputs.weeks_per_year,
            FieldConstraint::Positive,
            "Enter weeks greater than 0.",
        );
    validation
}

/// Monthly pay is a flat twelfth of the salary, independent of weeks worked.
pub fn compute_salary(inputs: &SalaryInputs) -> SalaryResult {
    SalaryResult {
        hourly: inputs.annual_salary / (inputs.hours_per_week * inputs.weeks_per_year),
        weekly: inputs.annual_salary / inputs.weeks_per_year,
        monthly: inputs.annual_salary / MONTHS_PER_YEAR,
    }
}

pub fn salary_to_hourly(inputs: &SalaryInputs) -> Outcome<SalaryResult> {
    suppress(validate_salary(inputs), || compute_salary(inputs))
}
