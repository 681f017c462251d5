use std::fmt;

use crate::{DeltaError, Result};

const TICKS_PER_MICROSECOND: i64 = 10;
const TICKS_PER_MILLISECOND: i64 = 10_000;
const TICKS_PER_SECOND: i64 = 10_000_000;
const TICKS_PER_MINUTE: i64 = 60 * TICKS_PER_SECOND;
const TICKS_PER_HOUR: i64 = 60 * TICKS_PER_MINUTE;
const TICKS_PER_DAY: i64 = 24 * TICKS_PER_HOUR;

/// A Kusto timespan scalar, carried as 100 ns ticks.
///
/// Parses both unit literals (`12h`, `45ms`, `3d`) and the constant form
/// `[d.]hh:mm:ss[.fffffff]`. Displays the most compact exact unit literal,
/// falling back to the constant form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KustoTimespan {
    ticks: i64,
}

impl KustoTimespan {
    pub fn from_ticks(ticks: i64) -> Self {
        Self { ticks }
    }

    pub fn days(days: i64) -> Self {
        Self::from_ticks(days * TICKS_PER_DAY)
    }

    pub fn hours(hours: i64) -> Self {
        Self::from_ticks(hours * TICKS_PER_HOUR)
    }

    pub fn minutes(minutes: i64) -> Self {
        Self::from_ticks(minutes * TICKS_PER_MINUTE)
    }

    pub fn seconds(seconds: i64) -> Self {
        Self::from_ticks(seconds * TICKS_PER_SECOND)
    }

    pub fn milliseconds(ms: i64) -> Self {
        Self::from_ticks(ms * TICKS_PER_MILLISECOND)
    }

    pub fn ticks(self) -> i64 {
        self.ticks
    }

    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DeltaError::parse("empty timespan literal"));
        }
        if text.contains(':') {
            return Self::parse_constant(text);
        }
        Self::parse_unit_literal(text)
    }

    fn parse_unit_literal(text: &str) -> Result<Self> {
        let split = text
            .find(|ch: char| !ch.is_ascii_digit())
            .ok_or_else(|| DeltaError::parse(format!("timespan `{text}` is missing a unit")))?;
        let (digits, unit) = text.split_at(split);
        let value: i64 = digits
            .parse()
            .map_err(|_| DeltaError::parse(format!("invalid timespan value `{text}`")))?;
        let per_unit = match unit {
            "d" => TICKS_PER_DAY,
            "h" => TICKS_PER_HOUR,
            "m" => TICKS_PER_MINUTE,
            "s" => TICKS_PER_SECOND,
            "ms" => TICKS_PER_MILLISECOND,
            "microsecond" | "microseconds" => TICKS_PER_MICROSECOND,
            "tick" | "ticks" => 1,
            _ => {
                return Err(DeltaError::parse(format!(
                    "unknown timespan unit `{unit}` in `{text}`"
                )))
            }
        };
        Ok(Self::from_ticks(value * per_unit))
    }

    // [d.]hh:mm:ss[.fffffff]
    fn parse_constant(text: &str) -> Result<Self> {
        let bad = || DeltaError::parse(format!("invalid timespan constant `{text}`"));

        let (days, rest) = match text.split_once('.') {
            // A '.' before the first ':' separates days; after, a fraction.
            Some((head, tail)) if !head.contains(':') => {
                (head.parse::<i64>().map_err(|_| bad())?, tail)
            }
            _ => (0, text),
        };

        let (clock, fraction) = match rest.split_once('.') {
            Some((clock, frac)) => (clock, Some(frac)),
            None => (rest, None),
        };

        let mut parts = clock.split(':');
        let hours: i64 = parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
        let minutes: i64 = parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
        let seconds: i64 = parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
        if parts.next().is_some() || hours >= 24 || minutes >= 60 || seconds >= 60 {
            return Err(bad());
        }

        let fraction_ticks = match fraction {
            None => 0,
            Some(frac) => {
                if frac.is_empty() || frac.len() > 7 || !frac.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(bad());
                }
                let padded: i64 = frac.parse().map_err(|_| bad())?;
                padded * 10_i64.pow(7 - frac.len() as u32)
            }
        };

        Ok(Self::from_ticks(
            days * TICKS_PER_DAY
                + hours * TICKS_PER_HOUR
                + minutes * TICKS_PER_MINUTE
                + seconds * TICKS_PER_SECOND
                + fraction_ticks,
        ))
    }

    /// The `[d.]hh:mm:ss[.fffffff]` form used inside policy payloads.
    pub fn to_constant(self) -> String {
        let mut ticks = self.ticks;
        let days = ticks / TICKS_PER_DAY;
        ticks %= TICKS_PER_DAY;
        let hours = ticks / TICKS_PER_HOUR;
        ticks %= TICKS_PER_HOUR;
        let minutes = ticks / TICKS_PER_MINUTE;
        ticks %= TICKS_PER_MINUTE;
        let seconds = ticks / TICKS_PER_SECOND;
        ticks %= TICKS_PER_SECOND;

        let mut out = String::new();
        if days > 0 {
            out.push_str(&format!("{days}."));
        }
        out.push_str(&format!("{hours:02}:{minutes:02}:{seconds:02}"));
        if ticks > 0 {
            out.push_str(&format!(".{ticks:07}"));
        }
        out
    }
}

impl fmt::Display for KustoTimespan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ticks = self.ticks;
        for (per_unit, unit) in [
            (TICKS_PER_DAY, "d"),
            (TICKS_PER_HOUR, "h"),
            (TICKS_PER_MINUTE, "m"),
            (TICKS_PER_SECOND, "s"),
            (TICKS_PER_MILLISECOND, "ms"),
        ] {
            if ticks != 0 && ticks % per_unit == 0 {
                return write!(f, "{}{}", ticks / per_unit, unit);
            }
        }
        f.write_str(&self.to_constant())
    }
}
