/// Decimal places beyond what an `f64` can carry are not rendered.
const MAX_PRECISION: u32 = 17;

/// Renders `value` rounded to `precision` decimal places, without trailing
/// zeros. Meant for showing results, not for further computation.
/// `precision` is capped at 17.
///
/// ```
/// use exprcalc::format_number;
///
/// assert_eq!(format_number(14.132646, 5), "14.13265");
/// assert_eq!(format_number(12345.0000001, 5), "12345");
/// ```
pub fn format_number(value: f64, precision: u32) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let precision = precision.min(MAX_PRECISION);
    let factor = 10f64.powi(precision as i32);
    let scaled = value * factor;
    let rounded = if scaled.is_finite() {
        scaled.round() / factor
    } else {
        value
    };

    let text = format!("{:.*}", precision as usize, rounded);
    let text = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text.as_str()
    };

    match text {
        "-0" => "0".to_string(),
        _ => text.to_string(),
    }
}
