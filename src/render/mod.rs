//! User-facing text: en-US USD currency formatting and the one-line
//! success/error messages.

use crate::client::PredictError;

/// Formats a price the way `en-US` currency formatting does: dollar sign,
/// thousands separators, two fraction digits, sign ahead of the symbol.
pub fn format_usd(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}${grouped}.{fraction:02}")
}

/// The success line shown to the user.
pub fn render_success(price: f64) -> String {
    format!("Estimated price: {}", format_usd(price))
}

/// The failure line. The taxonomy message comes straight from the error's
/// Display impl.
pub fn render_error(err: &PredictError) -> String {
    format!("Error: {err}")
}

/// Collapses a submission outcome into the rendered line.
pub fn render_outcome(outcome: &Result<f64, PredictError>) -> String {
    match outcome {
        Ok(price) => render_success(*price),
        Err(err) => render_error(err),
    }
}
