//! Duration parsing for configuration flags
//!
//! Checkpoint durations arrive as flag text in two spellings: ISO-8601
//! (`PT5M`, `PT1H30M`, `P1D`) as used by the deployment manifests, and the
//! short suffix form (`5m`, `90s`, `250ms`) used everywhere else in this
//! codebase. `parse_duration` accepts both.

use std::time::Duration;

use crate::streamjob::error::JobConfigError;

/// Parse a duration string.
///
/// ISO-8601 durations start with `P` (case-insensitive); anything else is
/// treated as a suffixed value. A bare number is a count of seconds.
///
/// Negative durations are rejected: "disabled" is expressed as zero
/// (`PT0S`, `0s`), never as a negative value.
pub fn parse_duration(input: &str) -> Result<Duration, JobConfigError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(JobConfigError::invalid_duration(input, "empty string"));
    }
    if trimmed.starts_with('-') {
        return Err(JobConfigError::invalid_duration(
            input,
            "negative durations are not allowed",
        ));
    }
    if trimmed.starts_with('P') || trimmed.starts_with('p') {
        parse_iso8601(trimmed)
    } else {
        parse_suffixed(trimmed)
    }
}

/// Parse the `PnDTnHnMn(.n)S` subset of ISO-8601 used by our flags.
///
/// Only day designators are accepted in the date position; time designators
/// must appear in H, M, S order, each at most once, and fractions are
/// accepted on the seconds component only.
fn parse_iso8601(input: &str) -> Result<Duration, JobConfigError> {
    let text = input.to_ascii_uppercase();
    // Leading 'P' is guaranteed by the caller.
    let body = &text[1..];
    let (date_part, time_part) = match body.split_once('T') {
        Some((_, "")) => {
            return Err(JobConfigError::invalid_duration(
                input,
                "'T' must introduce at least one time component",
            ));
        }
        Some((date, time)) => (date, time),
        None => (body, ""),
    };
    if date_part.is_empty() && time_part.is_empty() {
        return Err(JobConfigError::invalid_duration(
            input,
            "no duration components",
        ));
    }

    let mut millis: u128 = 0;

    if !date_part.is_empty() {
        let days_text = date_part.strip_suffix('D').ok_or_else(|| {
            JobConfigError::invalid_duration(input, "only day designators may precede 'T'")
        })?;
        let days: u64 = days_text
            .parse()
            .map_err(|_| JobConfigError::invalid_duration(input, "invalid day count"))?;
        millis += u128::from(days) * 86_400_000;
    }

    let mut number = String::new();
    let mut min_rank = 0u8;
    for ch in time_part.chars() {
        if ch.is_ascii_digit() || ch == '.' {
            number.push(ch);
            continue;
        }
        if number.is_empty() {
            return Err(JobConfigError::invalid_duration(
                input,
                format!("designator '{}' has no value", ch),
            ));
        }
        if ch != 'S' && number.contains('.') {
            return Err(JobConfigError::invalid_duration(
                input,
                "fractions are only allowed on the seconds component",
            ));
        }
        let value: f64 = number.parse().map_err(|_| {
            JobConfigError::invalid_duration(input, format!("invalid number '{}'", number))
        })?;
        let (rank, unit_millis) = match ch {
            'H' => (0u8, 3_600_000.0),
            'M' => (1, 60_000.0),
            'S' => (2, 1_000.0),
            other => {
                return Err(JobConfigError::invalid_duration(
                    input,
                    format!("unknown designator '{}'", other),
                ));
            }
        };
        if rank < min_rank {
            return Err(JobConfigError::invalid_duration(
                input,
                format!("designator '{}' is repeated or out of order", ch),
            ));
        }
        min_rank = rank + 1;
        millis = millis
            .checked_add((value * unit_millis).round() as u128)
            .ok_or_else(|| JobConfigError::invalid_duration(input, "duration overflows"))?;
        number.clear();
    }
    if !number.is_empty() {
        return Err(JobConfigError::invalid_duration(
            input,
            "trailing number without a designator",
        ));
    }

    to_duration(input, millis)
}

/// Parse a suffixed duration: ms, s, m, h, d. No suffix means seconds.
fn parse_suffixed(input: &str) -> Result<Duration, JobConfigError> {
    // "ms" must be checked before the single-letter suffixes.
    let (value_text, unit_millis) = if let Some(v) = input.strip_suffix("ms") {
        (v, 1u64)
    } else if let Some(v) = input.strip_suffix('s') {
        (v, 1_000)
    } else if let Some(v) = input.strip_suffix('m') {
        (v, 60_000)
    } else if let Some(v) = input.strip_suffix('h') {
        (v, 3_600_000)
    } else if let Some(v) = input.strip_suffix('d') {
        (v, 86_400_000)
    } else {
        (input, 1_000)
    };
    let value: u64 = value_text.trim().parse().map_err(|_| {
        JobConfigError::invalid_duration(
            input,
            "expected an integer with an optional ms/s/m/h/d suffix",
        )
    })?;
    to_duration(input, u128::from(value) * u128::from(unit_millis))
}

fn to_duration(input: &str, millis: u128) -> Result<Duration, JobConfigError> {
    let millis: u64 = millis
        .try_into()
        .map_err(|_| JobConfigError::invalid_duration(input, "duration overflows"))?;
    Ok(Duration::from_millis(millis))
}
