use crate::core::ValueKind;

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// `$` followed by the value rounded to whole dollars with thousands
/// separators, e.g. `$1,234,567`. Negative values render as `$-1,234`.
pub fn format_currency(value: f64) -> String {
    let rounded = finite_or_zero(value).round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("$-{grouped}")
    } else {
        format!("${grouped}")
    }
}

/// One decimal place and a `%` suffix.
pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", finite_or_zero(value))
}

pub fn format_number(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, finite_or_zero(value))
}

/// Format according to a metric's display kind.
pub fn format_value(kind: ValueKind, value: f64) -> String {
    match kind {
        ValueKind::Currency => format_currency(value),
        ValueKind::Percentage => format_percentage(value),
        ValueKind::Number => format_number(value, 1),
    }
}
