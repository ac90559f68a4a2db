use std::time::Duration;

use super::errors::ConfigError;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Parses Go-style durations: one or more `<number><unit>` terms such as
/// `1m30s`, `1.5s` or `300us`. Units are `ns`, `us` (or `µs`), `ms`, `s`, `m`
/// and `h`. A bare integer is taken as seconds.
pub fn parse_duration(input: &str) -> Result<Duration, ConfigError> {
    let value = input.trim();
    let invalid = || ConfigError::Parse(format!("Invalid duration '{}'", input));

    if value.is_empty() {
        return Err(invalid());
    }
    if let Ok(secs) = value.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }

    let mut rest = value;
    let mut total_nanos: u128 = 0;

    while !rest.is_empty() {
        let number_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_end);

        let unit_end = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_end);

        if unit.is_empty() {
            return Err(ConfigError::Parse(format!(
                "Missing unit in duration '{}'",
                input
            )));
        }
        let scale = unit_nanos(unit).ok_or_else(|| {
            ConfigError::Parse(format!("Unknown duration unit '{}' in '{}'", unit, input))
        })?;

        let term = term_nanos(number, scale).ok_or_else(invalid)?;
        total_nanos = total_nanos.checked_add(term).ok_or_else(invalid)?;
        rest = next;
    }

    let secs = u64::try_from(total_nanos / NANOS_PER_SEC).map_err(|_| invalid())?;
    Ok(Duration::new(secs, (total_nanos % NANOS_PER_SEC) as u32))
}

fn unit_nanos(unit: &str) -> Option<u128> {
    let nanos = match unit {
        "ns" => 1,
        "us" | "µs" | "μs" => 1_000,
        "ms" => 1_000_000,
        "s" => NANOS_PER_SEC,
        "m" => 60 * NANOS_PER_SEC,
        "h" => 3_600 * NANOS_PER_SEC,
        _ => return None,
    };
    Some(nanos)
}

/// `number` is `digits`, `digits.digits`, `digits.` or `.digits`.
fn term_nanos(number: &str, scale: u128) -> Option<u128> {
    let (whole, frac) = number.split_once('.').unwrap_or((number, ""));
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }

    let whole_value: u128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut nanos = whole_value.checked_mul(scale)?;

    // Digits past nanosecond precision of the largest unit cannot matter.
    let mut frac_value: u128 = 0;
    let mut divisor: u128 = 1;
    for digit in frac.bytes().take(18) {
        frac_value = frac_value * 10 + u128::from(digit - b'0');
        divisor *= 10;
    }
    nanos = nanos.checked_add(frac_value * scale / divisor)?;

    Some(nanos)
}
