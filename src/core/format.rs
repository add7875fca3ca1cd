//! Currency and percentage rendering.

use super::calculator::Payslip;
use rust_decimal::Decimal;

/// Round to centavos (half to even) and group thousands: `1234567.891` ->
/// `1,234,567.89`.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let rounded = if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    };
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(plain.len() + plain.len() / 3 + 1);
    if rounded.is_sign_negative() {
        grouped.push('-');
    }
    for (idx, digit) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped.push('.');
    grouped.push_str(frac_part);
    grouped
}

/// Amount with the peso sign, e.g. `$4,500.00` or `-$30.00`.
pub fn format_mxn(amount: Decimal) -> String {
    let formatted = format_amount(amount);
    match formatted.strip_prefix('-') {
        Some(positive) => format!("-${positive}"),
        None => format!("${formatted}"),
    }
}

/// The three result lines shown after a calculation.
pub fn result_lines(payslip: &Payslip) -> [String; 3] {
    let (gross, tax, net) = payslip.headline();
    [
        format!("Perceived salary: {}", format_mxn(gross)),
        format!("Tax withheld: {}", format_mxn(tax)),
        format!("Net salary: {}", format_mxn(net)),
    ]
}

pub fn render_result(payslip: &Payslip) -> String {
    result_lines(payslip).join("\n")
}

/// Percentage with two decimals, e.g. `0.1925` -> `19.25%`.
pub fn format_rate(rate: Decimal) -> String {
    format!("{:.2}%", rate * Decimal::ONE_HUNDRED)
}
