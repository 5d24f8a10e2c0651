use crate::error::NormalizeError;

/// Parse a caption clock value (`H:MM:SS.mmm`, `MM:SS.mmm` or bare seconds)
/// into seconds.
pub fn parse_timestamp(s: &str) -> Result<f64, NormalizeError> {
    let t = s.trim();
    let parts: Vec<&str> = t.split(':').collect();

    let (hours, minutes, seconds) = match parts.as_slice() {
        [h, m, sec] => (parse_field(h, t)?, parse_field(m, t)?, *sec),
        [m, sec] => (0, parse_field(m, t)?, *sec),
        [sec] => (0, 0, *sec),
        _ => return Err(NormalizeError::malformed(t)),
    };

    let secs = parse_seconds(seconds, t)?;
    let whole = hours
        .checked_mul(3600)
        .and_then(|h| minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
        .ok_or_else(|| NormalizeError::malformed(t))?;
    Ok(whole as f64 + secs)
}

fn parse_field(field: &str, whole: &str) -> Result<u64, NormalizeError> {
    let f = field.trim();
    if f.is_empty() || !f.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NormalizeError::malformed(whole));
    }
    f.parse().map_err(|_| NormalizeError::malformed(whole))
}

fn parse_seconds(field: &str, whole: &str) -> Result<f64, NormalizeError> {
    let f = field.trim();
    // f64::from_str also accepts "inf", "NaN" and exponents; clocks never use them.
    if f.is_empty() || !f.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return Err(NormalizeError::malformed(whole));
    }
    f.parse::<f64>().map_err(|_| NormalizeError::malformed(whole))
}

/// Round to millisecond precision.
pub fn round_ms(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}
