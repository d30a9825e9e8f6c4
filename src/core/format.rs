//! en-US display formatting for calculator outputs.
//!
//! Rounding follows the browser's `Intl.NumberFormat`: the exact binary
//! value of the double is rounded half away from zero, so `0.125` becomes
//! `0.13` rather than the banker's `0.12`.

/// Enough fraction digits to hold the exact expansion of any finite f64.
const EXACT_PRECISION: usize = 1_100;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Decimal {
    negative: bool,
    int_digits: String,
    frac_digits: String,
}

impl Decimal {
    fn exact(value: f64) -> Self {
        let negative = value.is_sign_negative();
        let text = format!("{:.*}", EXACT_PRECISION, value.abs());
        let (int_digits, frac_digits) = text.split_once('.').unwrap_or((text.as_str(), ""));
        Self {
            negative,
            int_digits: int_digits.to_string(),
            frac_digits: frac_digits.to_string(),
        }
    }

    /// Multiplies by 100 by moving the decimal point.
    fn shifted_two_places(mut self) -> Self {
        while self.frac_digits.len() < 2 {
            self.frac_digits.push('0');
        }
        let moved: String = self.frac_digits.drain(..2).collect();
        let int_digits = format!("{}{}", self.int_digits, moved);
        let trimmed = int_digits.trim_start_matches('0');
        self.int_digits = if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        };
        self
    }

    fn rounded(self, digits: usize) -> Self {
        let mut frac = self.frac_digits.into_bytes();
        let round_up = frac.get(digits).is_some_and(|&d| d >= b'5');
        frac.resize(digits, b'0');

        let mut all: Vec<u8> = self.int_digits.into_bytes();
        let int_len = all.len();
        all.extend_from_slice(&frac);

        let mut int_len = int_len;
        if round_up {
            let mut carry = true;
            for digit in all.iter_mut().rev() {
                if *digit == b'9' {
                    *digit = b'0';
                } else {
                    *digit += 1;
                    carry = false;
                    break;
                }
            }
            if carry {
                all.insert(0, b'1');
                int_len += 1;
            }
        }

        let frac_digits = all.split_off(int_len);
        Self {
            negative: self.negative,
            int_digits: String::from_utf8_lossy(&all).into_owned(),
            frac_digits: String::from_utf8_lossy(&frac_digits).into_owned(),
        }
    }

    fn grouped_int(&self) -> String {
        group_thousands(&self.int_digits)
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn sign(negative: bool) -> &'static str {
    if negative { "-" } else { "" }
}

fn non_finite(value: f64) -> Option<(bool, &'static str)> {
    if value.is_nan() {
        Some((false, "NaN"))
    } else if value.is_infinite() {
        Some((value < 0.0, "∞"))
    } else {
        None
    }
}

/// `$1,234.57` style, always exactly `digits` fraction digits.
pub fn format_currency(value: f64, digits: usize) -> String {
    if let Some((negative, text)) = non_finite(value) {
        return format!("{}${text}", sign(negative));
    }
    let rounded = Decimal::exact(value).rounded(digits);
    let mut out = format!("{}${}", sign(rounded.negative), rounded.grouped_int());
    if digits > 0 {
        out.push('.');
        out.push_str(&rounded.frac_digits);
    }
    out
}

/// Grouped number with at most `max_digits` fraction digits, trailing zeros
/// dropped.
pub fn format_number(value: f64, max_digits: usize) -> String {
    if let Some((negative, text)) = non_finite(value) {
        return format!("{}{text}", sign(negative));
    }
    let rounded = Decimal::exact(value).rounded(max_digits);
    let frac = rounded.frac_digits.trim_end_matches('0');
    let mut out = format!("{}{}", sign(rounded.negative), rounded.grouped_int());
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Formats a value that is already in percent units, e.g. `6.5` → `6.50%`.
/// The value goes through `/ 100` and back exactly like the browser does.
pub fn format_percent(value: f64, digits: usize) -> String {
    let fraction = value / 100.0;
    if let Some((negative, text)) = non_finite(fraction) {
        return format!("{}{text}%", sign(negative));
    }
    let rounded = Decimal::exact(fraction).shifted_two_places().rounded(digits);
    let mut out = format!("{}{}", sign(rounded.negative), rounded.grouped_int());
    if digits > 0 {
        out.push('.');
        out.push_str(&rounded.frac_digits);
    }
    out.push('%');
    out
}

/// Whole years and months, rounding the month count up.
pub fn format_years_and_months(months: f64) -> String {
    if !months.is_finite() || months <= 0.0 {
        return "0 months".to_string();
    }
    let rounded = months.ceil() as u64;
    let years = rounded / 12;
    let remaining = rounded % 12;

    let mut parts = Vec::with_capacity(2);
    if years > 0 {
        parts.push(format!("{years} year{}", if years == 1 { "" } else { "s" }));
    }
    if remaining > 0 {
        parts.push(format!(
            "{remaining} month{}",
            if remaining == 1 { "" } else { "s" }
        ));
    }
    if parts.is_empty() {
        "0 months".to_string()
    } else {
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_and_pads() {
        assert_eq!(format_currency(108_959.201_411, 2), "$108,959.20");
        assert_eq!(format_currency(6_000.0, 2), "$6,000.00");
        assert_eq!(format_currency(0.0, 2), "$0.00");
        assert_eq!(format_currency(999.5, 0), "$1,000");
        assert_eq!(format_currency(1_234_567.891, 2), "$1,234,567.89");
    }

    #[test]
    fn currency_rounds_exact_ties_away_from_zero() {
        // 0.125 and 2.5 are exact in binary.
        assert_eq!(format_currency(0.125, 2), "$0.13");
        assert_eq!(format_currency(2.5, 0), "$3");
        // 1.005 is stored slightly below the tie.
        assert_eq!(format_currency(1.005, 2), "$1.00");
    }

    #[test]
    fn currency_keeps_sign_on_negative_values() {
        assert_eq!(format_currency(-1_234.5, 2), "-$1,234.50");
        assert_eq!(format_currency(-0.001, 2), "-$0.00");
        assert_eq!(format_currency(-0.0, 2), "-$0.00");
    }

    #[test]
    fn currency_carries_through_nines() {
        assert_eq!(format_currency(99_999.999, 2), "$100,000.00");
    }

    #[test]
    fn non_finite_values_are_spelled_out() {
        assert_eq!(format_currency(f64::NAN, 2), "$NaN");
        assert_eq!(format_currency(f64::NEG_INFINITY, 2), "-$∞");
        assert_eq!(format_number(f64::INFINITY, 0), "∞");
    }

    #[test]
    fn number_drops_trailing_zeros() {
        assert_eq!(format_number(97.514, 0), "98");
        assert_eq!(format_number(20.0, 0), "20");
        assert_eq!(format_number(1_234.5, 2), "1,234.5");
        assert_eq!(format_number(1_234.0, 2), "1,234");
        assert_eq!(format_number(0.0, 0), "0");
    }

    #[test]
    fn percent_scales_back_from_fraction() {
        assert_eq!(format_percent(1.0, 2), "1.00%");
        assert_eq!(format_percent(6.5, 2), "6.50%");
        assert_eq!(format_percent(0.0, 2), "0.00%");
        assert_eq!(format_percent(12_345.678, 1), "12,345.7%");
    }

    #[test]
    fn years_and_months_rounds_up_and_omits_zero_parts() {
        assert_eq!(format_years_and_months(97.514), "8 years 2 months");
        assert_eq!(format_years_and_months(12.0), "1 year");
        assert_eq!(format_years_and_months(0.2), "1 month");
        assert_eq!(format_years_and_months(25.0), "2 years 1 month");
        assert_eq!(format_years_and_months(0.0), "0 months");
        assert_eq!(format_years_and_months(-3.0), "0 months");
        assert_eq!(format_years_and_months(f64::NAN), "0 months");
    }
}
