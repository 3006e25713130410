//! Canonical text form for durations: `[-][d.]hh:mm:ss[.fffffffff]`.
//!
//! The day component is written only when non-zero and the fraction only
//! when there are sub-second nanoseconds (trailing zeros trimmed).  Parsing
//! accepts exactly that shape, with 1 to 9 fraction digits.

use chrono::TimeDelta;

const SECS_PER_DAY: i64 = 86_400;

/// Formats `delta` in canonical duration form.
pub fn format_duration(delta: TimeDelta) -> String {
    let sign = if delta < TimeDelta::zero() { "-" } else { "" };
    let abs = delta.abs();
    let total_secs = abs.num_seconds();
    let nanos = abs.subsec_nanos();

    let days = total_secs / SECS_PER_DAY;
    let hours = (total_secs % SECS_PER_DAY) / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    let mut out = String::from(sign);
    if days != 0 {
        out.push_str(&format!("{days}."));
    }
    out.push_str(&format!("{hours:02}:{minutes:02}:{seconds:02}"));
    if nanos != 0 {
        let fraction = format!("{nanos:09}");
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }
    out
}

/// Parses canonical duration text, returning `None` on any deviation.
pub fn parse_duration(text: &str) -> Option<TimeDelta> {
    let text = text.trim();
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let mut parts = rest.split(':');
    let head = parts.next()?;
    let minutes = parse_digits(parts.next()?)?;
    let seconds_part = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let (days, hours) = match head.split_once('.') {
        Some((d, h)) => (parse_digits(d)?, parse_digits(h)?),
        None => (0, parse_digits(head)?),
    };
    let (seconds, nanos) = match seconds_part.split_once('.') {
        Some((s, f)) => (parse_digits(s)?, parse_fraction(f)?),
        None => (parse_digits(seconds_part)?, 0),
    };
    if hours > 23 || minutes > 59 || seconds > 59 {
        return None;
    }

    let total = days
        .checked_mul(SECS_PER_DAY)?
        .checked_add(hours * 3600 + minutes * 60 + seconds)?;
    let delta = TimeDelta::try_seconds(total)?.checked_add(&TimeDelta::nanoseconds(nanos))?;
    Some(if negative { -delta } else { delta })
}

fn parse_digits(s: &str) -> Option<i64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn parse_fraction(s: &str) -> Option<i64> {
    if s.len() > 9 {
        return None;
    }
    let digits = parse_digits(s)?;
    Some(digits * 10_i64.pow(9 - s.len() as u32))
}
