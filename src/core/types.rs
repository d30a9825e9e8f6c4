use serde::Serialize;

use super::input::ValidationResult;

/// A bundle of derived numbers. `Default` is the zeroed, suppressed result.
pub trait Outputs: Default + Serialize {
    fn values(&self) -> Vec<(&'static str, f64)>;

    fn is_finite(&self) -> bool {
        self.values().iter().all(|(_, value)| value.is_finite())
    }
}

#[derive(Debug, Clone)]
pub struct Outcome<R> {
    pub validation: ValidationResult,
    pub result: R,
}

impl<R> Outcome<R> {
    pub fn is_valid(&self) -> bool {
        self.validation.is_valid()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompoundInterestInputs {
    pub principal: f64,
    pub monthly_contribution: f64,
    /// Annual rate in percent.
    pub annual_rate: f64,
    pub years: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundInterestResult {
    pub future_value: f64,
    pub total_contributions: f64,
    pub interest_earned: f64,
}

impl Outputs for CompoundInterestResult {
    fn values(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("futureValue", self.future_value),
            ("totalContributions", self.total_contributions),
            ("interestEarned", self.interest_earned),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeeImpactInputs {
    pub starting_balance: f64,
    /// Added once per year, not monthly.
    pub annual_contribution: f64,
    /// Gross annual return in percent.
    pub annual_return: f64,
    pub years: f64,
    /// Annual fee in percent of assets.
    pub annual_fee: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeImpactResult {
    pub no_fee: f64,
    pub with_fee: f64,
    pub lost_to_fees: f64,
    pub fee_rate: f64,
}

impl Outputs for FeeImpactResult {
    fn values(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("noFee", self.no_fee),
            ("withFee", self.with_fee),
            ("lostToFees", self.lost_to_fees),
            ("feeRate", self.fee_rate),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanPaymentInputs {
    pub amount: f64,
    pub annual_rate: f64,
    pub years: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanPaymentResult {
    pub payment: f64,
    pub total_interest: f64,
    pub total_cost: f64,
}

impl Outputs for LoanPaymentResult {
    fn values(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("payment", self.payment),
            ("totalInterest", self.total_interest),
            ("totalCost", self.total_cost),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MortgageInputs {
    pub home_price: f64,
    pub down_payment: f64,
    pub annual_rate: f64,
    pub years: f64,
    /// Annual property tax in percent of the home price.
    pub property_tax_rate: f64,
    pub annual_insurance: f64,
    /// Monthly HOA dues or PMI.
    pub monthly_hoa: f64,
}

impl MortgageInputs {
    pub fn loan_amount(&self) -> f64 {
        self.home_price - self.down_payment
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgageResult {
    pub loan_amount: f64,
    pub principal_and_interest: f64,
    pub taxes: f64,
    pub insurance: f64,
    pub hoa: f64,
    pub total: f64,
}

impl Outputs for MortgageResult {
    fn values(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("loanAmount", self.loan_amount),
            ("principalAndInterest", self.principal_and_interest),
            ("taxes", self.taxes),
            ("insurance", self.insurance),
            ("hoa", self.hoa),
            ("total", self.total),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StudentLoanInputs {
    pub balance: f64,
    pub annual_rate: f64,
    pub monthly_payment: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentLoanResult {
    /// Fractional months until the balance reaches zero.
    pub months: f64,
    pub total_interest: f64,
    pub total_paid: f64,
}

impl Outputs for StudentLoanResult {
    fn values(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("months", self.months),
            ("totalInterest", self.total_interest),
            ("totalPaid", self.total_paid),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalaryInputs {
    pub annual_salary: f64,
    pub hours_per_week: f64,
    pub weeks_per_year: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryResult {
    pub hourly: f64,
    pub weekly: f64,
    pub monthly: f64,
}

impl Outputs for SalaryResult {
    fn values(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("hourly", self.hourly),
            ("weekly", self.weekly),
            ("monthly", self.monthly),
        ]
    }
}
