use anyhow::Context;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

const TIMESTAMP_LEN: usize = 19;
const TIMESTAMP_FORMAT: &str = "%Y_%m_%d_%H_%M_%S";

/// What a recording's file name says about it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordingName {
    pub timestamp: DateTime<Utc>,
    /// NaN when the name carries no readable frequency.
    pub frequency_mhz: f64,
}

/// Parses `YYYY_MM_DD_HH_MM_SS_<frequency>...`.
///
/// The timestamp is mandatory. The frequency is the leading decimal number
/// after the separator, so `2026_02_06_12_00_00_5.1MHz.bin` gives 5.1.
pub fn parse_recording_name(name: &str) -> anyhow::Result<RecordingName> {
    let stamp = name
        .get(..TIMESTAMP_LEN)
        .with_context(|| format!("{} is too short to carry a timestamp", name))?;
    let naive = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT)
        .with_context(|| format!("{} does not start with {}", name, TIMESTAMP_FORMAT))?;

    let remainder = name.get(TIMESTAMP_LEN + 1..).unwrap_or("");
    Ok(RecordingName {
        timestamp: Utc.from_utc_datetime(&naive),
        frequency_mhz: leading_number(remainder).unwrap_or(f64::NAN),
    })
}

fn leading_number(text: &str) -> Option<f64> {
    let mut seen_point = false;
    let end = text
        .find(|c: char| match c {
            '0'..='9' => false,
            '.' if !seen_point => {
                seen_point = true;
                false
            }
            _ => true,
        })
        .unwrap_or(text.len());
    text[..end].trim_end_matches('.').parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_timestamp_and_frequency() {
        let parsed = parse_recording_name("2026_02_06_12_30_05_5.1MHz").unwrap();
        assert_eq!(
            parsed.timestamp,
            Utc.with_ymd_and_hms(2026, 2, 6, 12, 30, 5).unwrap()
        );
        assert_eq!(parsed.frequency_mhz, 5.1);
    }

    #[test]
    fn bare_number_and_extension_are_accepted() {
        assert_eq!(
            parse_recording_name("2026_02_06_00_00_00_7").unwrap().frequency_mhz,
            7.0
        );
        assert_eq!(
            parse_recording_name("2026_02_06_00_00_00_14.25.bin")
                .unwrap()
                .frequency_mhz,
            14.25
        );
    }

    #[test]
    fn missing_frequency_is_nan() {
        let parsed = parse_recording_name("2026_02_06_00_00_00").unwrap();
        assert!(parsed.frequency_mhz.is_nan());
        let parsed = parse_recording_name("2026_02_06_00_00_00_unknown").unwrap();
        assert!(parsed.frequency_mhz.is_nan());
    }

    #[test]
    fn bad_timestamps_are_errors() {
        assert!(parse_recording_name("no_name").is_err());
        assert!(parse_recording_name("2026_13_06_00_00_00_5.1MHz").is_err());
    }
}
