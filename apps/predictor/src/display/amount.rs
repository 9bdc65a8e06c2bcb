/// Rounds to `digits` decimal places with ties away from zero.
pub fn round_half_away(value: f64, digits: usize) -> f64 {
    let scale = 10f64.powi(digits as i32);
    (value * scale).round() / scale
}

/// Fixed-point text with `digits` decimals. Ties round away from zero, so
/// `12.25` prints as `12.3`, where plain `{:.1}` would print `12.2`.
pub fn to_fixed(value: f64, digits: usize) -> String {
    format!("{:.*}", digits, round_half_away(value, digits))
}

/// Formats an amount with comma thousands separators and at most three
/// fraction digits, dropping trailing zeros: `1234567.5` → `1,234,567.5`.
pub fn group_thousands(value: f64) -> String {
    let fixed = to_fixed(value.abs(), 3);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}
