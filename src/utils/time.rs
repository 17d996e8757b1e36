//! Time parsing and formatting utilities

use crate::error::{QuadError, QuadResult};

/// Time parser for command-line positions and report timestamps
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeParser;

impl TimeParser {
    /// Create a new time parser
    pub fn new() -> Self {
        Self
    }

    /// Parse `90.5`, `MM:SS(.ms)` or `HH:MM:SS(.ms)` into seconds
    pub fn parse_time(&self, time_str: &str) -> QuadResult<f64> {
        let time_str = time_str.trim();
        let invalid = || QuadError::InvalidTimeFormat {
            time: time_str.to_string(),
        };

        let parts: Vec<&str> = time_str.split(':').collect();
        let seconds = match parts.as_slice() {
            [secs] => secs.parse::<f64>().map_err(|_| invalid())?,
            [mins, secs] => {
                let minutes: u32 = mins.parse().map_err(|_| invalid())?;
                if minutes >= 60 {
                    return Err(invalid());
                }
                let seconds = Self::parse_seconds_field(secs).ok_or_else(invalid)?;
                minutes as f64 * 60.0 + seconds
            }
            [hours, mins, secs] => {
                let hours: u32 = hours.parse().map_err(|_| invalid())?;
                let minutes: u32 = mins.parse().map_err(|_| invalid())?;
                if minutes >= 60 {
                    return Err(invalid());
                }
                let seconds = Self::parse_seconds_field(secs).ok_or_else(invalid)?;
                hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds
            }
            _ => return Err(invalid()),
        };

        if !seconds.is_finite() || seconds < 0.0 {
            return Err(invalid());
        }

        Ok(seconds)
    }

    fn parse_seconds_field(field: &str) -> Option<f64> {
        let seconds: f64 = field.parse().ok()?;
        (0.0..60.0).contains(&seconds).then_some(seconds)
    }

    /// Format seconds as HH:MM:SS.mmm
    pub fn format_time(&self, seconds: f64) -> String {
        let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
        let hours = total_ms / 3_600_000;
        let minutes = (total_ms % 3_600_000) / 60_000;
        let secs = (total_ms % 60_000) / 1000;
        let millis = total_ms % 1000;

        format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, millis)
    }
}

/// Shorthand for `TimeParser::new().format_time`
pub fn format_timestamp(seconds: f64) -> String {
    TimeParser::new().format_time(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formats() {
        let parser = TimeParser::new();
        assert_eq!(parser.parse_time("90.5").unwrap(), 90.5);
        assert_eq!(parser.parse_time("01:30").unwrap(), 90.0);
        assert_eq!(parser.parse_time("01:30.500").unwrap(), 90.5);
        assert_eq!(parser.parse_time("1:02:03.250").unwrap(), 3723.25);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        let parser = TimeParser::new();
        assert!(parser.parse_time("invalid").is_err());
        assert!(parser.parse_time("-5").is_err());
        assert!(parser.parse_time("01:75").is_err());
        assert!(parser.parse_time("75:00").is_err());
        assert!(parser.parse_time("60:00").is_err());
        assert!(parser.parse_time("1:60:00").is_err());
        assert!(parser.parse_time("1:2:3:4").is_err());
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "00:00:00.000");
        assert_eq!(format_timestamp(4.52), "00:00:04.520");
        assert_eq!(format_timestamp(3723.25), "01:02:03.250");
        // Rounds instead of truncating float noise
        assert_eq!(format_timestamp(4.9999999), "00:00:05.000");
    }
}
