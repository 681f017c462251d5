use chrono::{NaiveDate, NaiveDateTime};

use crate::{DeltaError, Result};

/// A `hot_window = datetime(...) .. datetime(...)` clause of the caching
/// policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HotWindow {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
}

impl HotWindow {
    pub fn new(from: NaiveDateTime, to: NaiveDateTime) -> Self {
        Self { from, to }
    }

    pub fn parse(from: &str, to: &str) -> Result<Self> {
        Ok(Self {
            from: parse_datetime(from)?,
            to: parse_datetime(to)?,
        })
    }

    pub fn to_script(&self) -> String {
        format!(
            "datetime({}) .. datetime({})",
            format_datetime(self.from),
            format_datetime(self.to)
        )
    }

    /// Window start in the payload's datetime format.
    pub fn min_value(&self) -> String {
        format_datetime(self.from)
    }

    /// Window end in the payload's datetime format.
    pub fn max_value(&self) -> String {
        format_datetime(self.to)
    }
}

fn parse_datetime(text: &str) -> Result<NaiveDateTime> {
    let text = text.trim();
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(value) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(value);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(date.and_hms_opt(0, 0, 0).expect("midnight is valid"));
    }
    Err(DeltaError::parse(format!("invalid datetime `{text}`")))
}

fn format_datetime(value: NaiveDateTime) -> String {
    value.format("%Y-%m-%dT%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_date_and_datetime() {
        let window = HotWindow::parse("2023-01-01", "2023-02-01T12:30:00").unwrap();
        assert_eq!(
            window.to_script(),
            "datetime(2023-01-01T00:00:00) .. datetime(2023-02-01T12:30:00)"
        );
    }
}
