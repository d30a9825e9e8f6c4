use super::calculator::{
    Calculator, CalculatorDef, Faq, InputField, ParsedInputs, Presentation, ResultLine,
};
use super::engine::{
    compute_compound_interest, compute_fee_impact, compute_loan_payment, compute_mortgage,
    compute_salary, compute_student_loan, validate_compound_interest, validate_fee_impact,
    validate_loan_payment, validate_mortgage, validate_salary, validate_student_loan,
};
use super::format::{format_currency, format_number, format_percent, format_years_and_months};
use super::input::is_positive;
use super::types::{
    CompoundInterestInputs, CompoundInterestResult, FeeImpactInputs, FeeImpactResult,
    LoanPaymentInputs, LoanPaymentResult, MortgageInputs, MortgageResult, SalaryInputs,
    SalaryResult, StudentLoanInputs, StudentLoanResult,
};

const fn field(
    id: &'static str,
    key: &'static str,
    label: &'static str,
    helper: &'static str,
    unit: &'static str,
    step: Option<&'static str>,
    default: &'static str,
) -> InputField {
    InputField {
        id,
        key,
        label,
        helper,
        unit,
        step,
        default,
    }
}

fn line(label: &'static str, value: String) -> ResultLine {
    ResultLine { label, value }
}

fn money(value: f64) -> String {
    format_currency(value, 2)
}

pub static COMPOUND_INTEREST: CalculatorDef<CompoundInterestInputs, CompoundInterestResult> =
    CalculatorDef {
        id: "compound-interest",
        intro: "Estimate how your savings grow with compounding and steady monthly contributions.",
        results_title: "Estimated growth",
        fields: &[
            field("principal", "principal", "Starting balance", "The amount you have saved today.", "USD", None, "5000"),
            field("contribution", "contribution", "Monthly contribution", "How much you plan to add each month.", "USD", None, "200"),
            field("rate", "rate", "Annual interest rate", "Use the expected yearly return rate.", "%", Some("0.01"), "6"),
            field("years", "years", "Years to grow", "Total time your money is invested.", "years", Some("1"), "20"),
        ],
        faqs: &[
            Faq {
                question: "What does compound interest mean?",
                answer: "Compound interest means you earn interest on your original balance and on the interest already earned.",
            },
            Faq {
                question: "How often is interest compounded here?",
                answer: "This calculator assumes monthly compounding and monthly contributions.",
            },
            Faq {
                question: "Can I set contributions to zero?",
                answer: "Yes. Enter 0 for monthly contributions to see growth from the starting balance only.",
            },
            Faq {
                question: "Does this include taxes or inflation?",
                answer: "No. Results are gross estimates before taxes or inflation effects.",
            },
        ],
        inputs: |parsed: &ParsedInputs| CompoundInterestInputs {
            principal: parsed.get("principal"),
            monthly_contribution: parsed.get("contribution"),
            annual_rate: parsed.get("rate"),
            years: parsed.get("years"),
        },
        validate: validate_compound_interest,
        compute: compute_compound_interest,
        present: |inputs: &CompoundInterestInputs, result: &CompoundInterestResult| {
            let years = if is_positive(inputs.years) { inputs.years } else { 0.0 };
            Presentation {
                lines: vec![
                    line("Future value", money(result.future_value)),
                    line("Total contributions", money(result.total_contributions)),
                    line("Interest earned", money(result.interest_earned)),
                ],
                summary: format!(
                    "Over {} years, your balance could reach {}.",
                    format_number(years, 0),
                    money(result.future_value)
                ),
            }
        },
    };

pub static INVESTMENT_FEE_IMPACT: CalculatorDef<FeeImpactInputs, FeeImpactResult> =
    CalculatorDef {
        id: "investment-fee-impact",
        intro: "Compare investment growth with and without annual fees to see the long-term impact.",
        results_title: "Fee impact summary",
        fields: &[
            field("starting-balance", "startingBalance", "Starting balance", "Amount already invested.", "USD", None, "15000"),
            field("annual-contribution", "annualContribution", "Annual contribution", "How much you invest each year.", "USD", None, "3000"),
            field("annual-return", "annualReturn", "Annual return (before fees)", "Expected average annual return.", "%", Some("0.01"), "6.5"),
            field("years", "years", "Years invested", "Total time invested.", "years", Some("1"), "20"),
            field("annual-fee", "annualFee", "Annual fee", "Expense ratio or advisory fee.", "%", Some("0.01"), "1.0"),
        ],
        faqs: &[
            Faq {
                question: "Is the fee applied annually?",
                answer: "Yes. This assumes an annual fee as a percentage of assets under management.",
            },
            Faq {
                question: "What types of fees does this model?",
                answer: "Think expense ratios, advisory fees, or platform fees expressed as annual percentages.",
            },
            Faq {
                question: "Does it include taxes?",
                answer: "No. Taxes and inflation are not included in this estimate.",
            },
            Faq {
                question: "What if my expected return is lower than the fee?",
                answer: "The model still works, but long-term growth may be reduced or flat.",
            },
        ],
        inputs: |parsed: &ParsedInputs| FeeImpactInputs {
            starting_balance: parsed.get("startingBalance"),
            annual_contribution: parsed.get("annualContribution"),
            annual_return: parsed.get("annualReturn"),
            years: parsed.get("years"),
            annual_fee: parsed.get("annualFee"),
        },
        validate: validate_fee_impact,
        compute: compute_fee_impact,
        present: |_: &FeeImpactInputs, result: &FeeImpactResult| Presentation {
            lines: vec![
                line("Balance without fees", money(result.no_fee)),
                line("Balance with fees", money(result.with_fee)),
                line("Estimated cost of fees", money(result.lost_to_fees)),
            ],
            summary: format!(
                "An annual fee of {} can noticeably reduce your ending balance over time.",
                format_percent(result.fee_rate, 2)
            ),
        },
    };

pub static LOAN_PAYMENT: CalculatorDef<LoanPaymentInputs, LoanPaymentResult> = CalculatorDef {
    id: "loan-payment",
    intro: "Estimate your monthly payment, total interest, and overall cost for a fixed-rate loan.",
    results_title: "Loan payment summary",
    fields: &[
        field("loan-amount", "amount", "Loan amount", "Total amount you plan to borrow.", "USD", None, "20000"),
        field("loan-rate", "rate", "Annual interest rate", "Interest rate before fees or discounts.", "%", Some("0.01"), "7"),
        field("loan-years", "years", "Loan term", "Length of the loan in years.", "years", Some("1"), "5"),
    ],
    faqs: &[
        Faq {
            question: "Is this for fixed-rate loans only?",
            answer: "Yes. Variable-rate loans require a schedule of rate changes to estimate accurately.",
        },
        Faq {
            question: "Does this include fees or taxes?",
            answer: "No. It only models principal and interest for a standard amortized loan.",
        },
        Faq {
            question: "Can I use this for auto loans?",
            answer: "Yes. Any fixed-rate installment loan works with this formula.",
        },
        Faq {
            question: "What if my rate is 0%?",
            answer: "The payment is simply the loan amount divided by the total number of months.",
        },
    ],
    inputs: |parsed: &ParsedInputs| LoanPaymentInputs {
        amount: parsed.get("amount"),
        annual_rate: parsed.get("rate"),
        years: parsed.get("years"),
    },
    validate: validate_loan_payment,
    compute: compute_loan_payment,
    present: |_: &LoanPaymentInputs, result: &LoanPaymentResult| Presentation {
        lines: vec![
            line("Monthly payment", money(result.payment)),
            line("Total interest", money(result.total_interest)),
            line("Total cost", money(result.total_cost)),
        ],
        summary: "This estimate assumes on-time monthly payments over the full term.".to_string(),
    },
};

pub static MORTGAGE_PAYMENT: CalculatorDef<MortgageInputs, MortgageResult> = CalculatorDef {
    id: "mortgage-payment",
    intro: "Estimate your monthly mortgage payment including taxes, insurance, and HOA fees.",
    results_title: "Monthly payment estimate",
    fields: &[
        field("home-price", "homePrice", "Home price", "Purchase price of the home.", "USD", None, "350000"),
        field("down-payment", "downPayment", "Down payment", "Cash paid upfront.", "USD", None, "70000"),
        field("mortgage-rate", "rate", "Annual interest rate", "Interest rate for the mortgage loan.", "%", Some("0.01"), "6.2"),
        field("mortgage-years", "years", "Loan term", "Total mortgage length in years.", "years", Some("1"), "30"),
        field("tax-rate", "taxRate", "Property tax rate", "Annual property tax percentage.", "%", Some("0.01"), "1.1"),
        field("insurance", "insurance", "Home insurance (annual)", "Estimated yearly insurance premium.", "USD", None, "1200"),
        field("hoa", "hoa", "HOA / PMI (monthly)", "Monthly association dues or PMI if applicable.", "USD", None, "0"),
    ],
    faqs: &[
        Faq {
            question: "Does this include PMI?",
            answer: "No. Add PMI to the HOA field if you want to include it in the estimate.",
        },
        Faq {
            question: "Are property taxes required?",
            answer: "They are optional but recommended for a realistic payment estimate.",
        },
        Faq {
            question: "Can I use this for refinancing?",
            answer: "Yes. Use your new loan balance, rate, and term to estimate the new payment.",
        },
        Faq {
            question: "Why is my payment different from a lender quote?",
            answer: "Lenders may include insurance, escrow fees, and other items not modeled here.",
        },
    ],
    inputs: |parsed: &ParsedInputs| MortgageInputs {
        home_price: parsed.get("homePrice"),
        down_payment: parsed.get("downPayment"),
        annual_rate: parsed.get("rate"),
        years: parsed.get("years"),
        property_tax_rate: parsed.get("taxRate"),
        annual_insurance: parsed.get("insurance"),
        monthly_hoa: parsed.get("hoa"),
    },
    validate: validate_mortgage,
    compute: compute_mortgage,
    present: |_: &MortgageInputs, result: &MortgageResult| Presentation {
        lines: vec![
            line("Principal & interest", money(result.principal_and_interest)),
            line("Property taxes", money(result.taxes)),
            line("Insurance", money(result.insurance)),
            line("HOA / PMI", money(result.hoa)),
            line("Total monthly payment", money(result.total)),
        ],
        summary: "This estimate assumes a fixed-rate mortgage and steady monthly costs.".to_string(),
    },
};

pub static STUDENT_LOAN_PAYOFF: CalculatorDef<StudentLoanInputs, StudentLoanResult> =
    CalculatorDef {
        id: "student-loan-payoff",
        intro: "Estimate how long it could take to pay off your student loans based on your current payment.",
        results_title: "Payoff estimate",
        fields: &[
            field("loan-balance", "balance", "Current balance", "Total remaining loan balance.", "USD", None, "28000"),
            field("student-rate", "rate", "Annual interest rate", "Interest rate for the loan.", "%", Some("0.01"), "5"),
            field("monthly-payment", "payment", "Monthly payment", "Planned monthly payment amount.", "USD", None, "350"),
        ],
        faqs: &[
            Faq {
                question: "What if I make extra payments?",
                answer: "Increase the monthly payment to see how extra payments shorten payoff time.",
            },
            Faq {
                question: "Does this include income-driven repayment plans?",
                answer: "No. This is a standard amortization estimate based on a fixed payment.",
            },
            Faq {
                question: "Why does the payment need to cover interest?",
                answer: "Payments below monthly interest will not reduce the balance and can grow the loan.",
            },
            Faq {
                question: "Can I use this for private loans?",
                answer: "Yes. Use the current balance, rate, and monthly payment for any fixed-rate loan.",
            },
        ],
        inputs: |parsed: &ParsedInputs| StudentLoanInputs {
            balance: parsed.get("balance"),
            annual_rate: parsed.get("rate"),
            monthly_payment: parsed.get("payment"),
        },
        validate: validate_student_loan,
        compute: compute_student_loan,
        present: |_: &StudentLoanInputs, result: &StudentLoanResult| Presentation {
            lines: vec![
                line("Time to pay off", format_years_and_months(result.months)),
                line("Total interest", money(result.total_interest)),
                line("Total paid", money(result.total_paid)),
            ],
            summary: format!(
                "That is roughly {} months of payments at the current rate.",
                format_number(result.months, 0)
            ),
        },
    };

pub static SALARY_TO_HOURLY: CalculatorDef<SalaryInputs, SalaryResult> = CalculatorDef {
    id: "salary-to-hourly",
    intro: "Convert an annual salary to hourly, weekly, and monthly pay based on your schedule.",
    results_title: "Pay breakdown",
    fields: &[
        field("annual-salary", "salary", "Annual salary", "Gross annual pay before taxes.", "USD", None, "72000"),
        field("hours-per-week", "hours", "Hours per week", "Average hours worked each week.", "hours", Some("0.5"), "40"),
        field("weeks-per-year", "weeks", "Weeks per year", "Typically 52, or fewer for unpaid time off.", "weeks", Some("1"), "52"),
    ],
    faqs: &[
        Faq {
            question: "Does this include overtime?",
            answer: "No. This is a straight conversion using standard weekly hours.",
        },
        Faq {
            question: "What if I take unpaid time off?",
            answer: "Reduce the weeks per year to reflect unpaid leave or shorter work years.",
        },
        Faq {
            question: "Is this before or after taxes?",
            answer: "This is a gross income conversion. Taxes and deductions are not included.",
        },
        Faq {
            question: "Why show weekly and monthly?",
            answer: "It helps compare offers with different pay schedules.",
        },
    ],
    inputs: |parsed: &ParsedInputs| SalaryInputs {
        annual_salary: parsed.get("salary"),
        hours_per_week: parsed.get("hours"),
        weeks_per_year: parsed.get("weeks"),
    },
    validate: validate_salary,
    compute: compute_salary,
    present: |_: &SalaryInputs, result: &SalaryResult| Presentation {
        lines: vec![
            line("Hourly pay", money(result.hourly)),
            line("Weekly pay", money(result.weekly)),
            line("Monthly pay", money(result.monthly)),
        ],
        summary: "Adjust hours or weeks to compare different schedules or contract roles."
            .to_string(),
    },
};

static CATALOG: [&dyn Calculator; 6] = [
    &COMPOUND_INTEREST,
    &LOAN_PAYMENT,
    &MORTGAGE_PAYMENT,
    &STUDENT_LOAN_PAYOFF,
    &INVESTMENT_FEE_IMPACT,
    &SALARY_TO_HOURLY,
];

pub fn catalog() -> &'static [&'static dyn Calculator] {
    &CATALOG
}

pub fn find(id: &str) -> Option<&'static dyn Calculator> {
    CATALOG.iter().copied().find(|calculator| calculator.id() == id)
}
