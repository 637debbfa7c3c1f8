//! Dose arithmetic over display strings.
//!
//! The rule tables carry typed values, so these helpers serve text that comes
//! from outside the catalog (FFI callers, the catalog self-check).

use super::{DosingError, DosingResult};

/// Format milligrams with one decimal, rounding ties away from zero.
///
/// Plain `{:.1}` would print 11.25 as "11.2".
pub fn format_mg(value: f64) -> String {
    format!("{:.1}", (value * 10.0).round() / 10.0)
}

/// First decimal-or-integer token in `text`, wherever it appears.
///
/// "100 mg/kg/dose de piperacilina" yields 100; "4.5 mg/kg/dose" yields 4.5.
pub fn leading_number(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let start = bytes.iter().position(u8::is_ascii_digit)?;

    let mut end = start;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end + 1 < bytes.len() && bytes[end] == b'.' && bytes[end + 1].is_ascii_digit() {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }

    text[start..end].parse().ok()
}

/// Single administration for a dose rule, formatted as "<mg> mg/dose".
///
/// Returns `dose_rule` unchanged when it holds no number.
pub fn absolute_dose_mg(dose_rule: &str, weight_kg: f64) -> String {
    match leading_number(dose_rule) {
        Some(mg_per_kg) => format!("{} mg/dose", format_mg(mg_per_kg * weight_kg)),
        None => dose_rule.to_string(),
    }
}

/// mg/kg value of a dose label.
pub fn dose_mg_per_kg(dose_rule: &str) -> DosingResult<f64> {
    leading_number(dose_rule).ok_or_else(|| DosingError::UnparsableRuleToken(dose_rule.to_string()))
}

/// Hours of an interval label such as "12 horas".
pub fn interval_hours(interval: &str) -> DosingResult<u32> {
    let hours = interval
        .split_whitespace()
        .next()
        .and_then(|token| token.parse::<u32>().ok())
        .ok_or_else(|| DosingError::UnparsableRuleToken(interval.to_string()))?;
    if hours == 0 {
        return Err(DosingError::ZeroInterval(interval.to_string()));
    }
    Ok(hours)
}

/// mg/kg/dose × weight × 24 / interval.
pub fn total_daily_dose_mg(
    mg_per_kg: f64,
    weight_kg: f64,
    interval_hours: u32,
) -> DosingResult<f64> {
    if interval_hours == 0 {
        return Err(DosingError::ZeroInterval(interval_hours.to_string()));
    }
    Ok(mg_per_kg * weight_kg * 24.0 / interval_hours as f64)
}

/// Total daily dose computed from display labels. Rejects labels without a
/// usable number instead of producing NaN.
pub fn total_daily_dose_from_labels(
    dose_rule: &str,
    interval: &str,
    weight_kg: f64,
) -> DosingResult<f64> {
    let mg_per_kg = dose_mg_per_kg(dose_rule)?;
    let hours = interval_hours(interval)?;
    total_daily_dose_mg(mg_per_kg, weight_kg, hours)
}
