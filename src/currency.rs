//! Formatting amounts of money for display.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

/// The symbol written before every amount.
pub const CURRENCY_SYMBOL: &str = "₹";

/// Format `number` as rupees with thousands separators and exactly two
/// decimal places, e.g. `₹1,234.50` or `-₹3.00`.
pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency(CURRENCY_SYMBOL)
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(2)))
    });

    static NEGATIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency(&format!("-{CURRENCY_SYMBOL}"))
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(2)))
    });

    let formatted_string = match (positive_fmt, negative_fmt) {
        (_, Some(negative_fmt)) if number < 0.0 => negative_fmt.fmt_string(number.abs()),
        (Some(positive_fmt), _) if number > 0.0 => positive_fmt.fmt_string(number),
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        _ if number == 0.0 => return format!("{CURRENCY_SYMBOL}0.00"),
        _ if number < 0.0 => format!("-{CURRENCY_SYMBOL}{:.2}", number.abs()),
        _ => format!("{CURRENCY_SYMBOL}{number:.2}"),
    };

    pad_to_two_decimals(formatted_string)
}

/// numfmt omits trailing zeros, e.g. "12.30" is rendered as "12.3" and
/// "12.00" as "12".
fn pad_to_two_decimals(formatted_string: String) -> String {
    match formatted_string.rsplit_once('.') {
        Some((_, decimals)) if decimals.len() >= 2 => formatted_string,
        Some((_, decimals)) => format!("{formatted_string}{}", "0".repeat(2 - decimals.len())),
        None => format!("{formatted_string}.00"),
    }
}
