use crate::sounding::{HeightRecord, ProcessedFile};
use std::io::{self, Write};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const CSV_HEADER: &str = "timestamp,frequencies_MHz,virtual_heights_km,echo_detected";

/// Ordered collection of height records, one per processed file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    rows: Vec<HeightRecord>,
}

impl ResultTable {
    pub fn rows(&self) -> &[HeightRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn write_csv<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "{}", CSV_HEADER)?;
        for row in &self.rows {
            writeln!(
                writer,
                "{},{},{},{}",
                row.timestamp.format(TIMESTAMP_FORMAT),
                row.frequency_mhz,
                row.virtual_height_km,
                row.echo_detected
            )?;
        }
        Ok(())
    }

    /// JSON array of records; NaN fields become `null`.
    pub fn write_json<W: Write>(&self, writer: W) -> io::Result<()> {
        serde_json::to_writer_pretty(writer, &self.rows).map_err(io::Error::from)
    }

    /// Fixed-width rendering for terminals.
    pub fn render(&self) -> String {
        let mut out = format!(
            "{:<19}  {:>15}  {:>18}  {:>13}\n",
            "timestamp", "frequencies_MHz", "virtual_heights_km", "echo_detected"
        );
        for row in &self.rows {
            out.push_str(&format!(
                "{:<19}  {:>15.3}  {:>18.3}  {:>13}\n",
                row.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                row.frequency_mhz,
                row.virtual_height_km,
                row.echo_detected
            ));
        }
        out
    }
}

impl FromIterator<HeightRecord> for ResultTable {
    fn from_iter<I: IntoIterator<Item = HeightRecord>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<&'a ProcessedFile> for ResultTable {
    fn from_iter<I: IntoIterator<Item = &'a ProcessedFile>>(iter: I) -> Self {
        iter.into_iter().map(|file| file.record.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_table() -> ResultTable {
        let timestamp = Utc.with_ymd_and_hms(2026, 2, 6, 12, 30, 0).unwrap();
        vec![
            HeightRecord {
                timestamp,
                frequency_mhz: 5.1,
                virtual_height_km: 299.5,
                echo_detected: true,
            },
            HeightRecord {
                timestamp,
                frequency_mhz: 7.2,
                virtual_height_km: f64::NAN,
                echo_detected: false,
            },
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn csv_has_header_and_nan_rows() {
        let mut buffer = Vec::new();
        sample_table().write_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "2026-02-06 12:30:00,5.1,299.5,true");
        assert_eq!(lines[2], "2026-02-06 12:30:00,7.2,NaN,false");
    }

    #[test]
    fn json_uses_column_names_and_null_for_nan() {
        let mut buffer = Vec::new();
        sample_table().write_json(&mut buffer).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value[0]["frequencies_MHz"], 5.1);
        assert!(value[1]["virtual_heights_km"].is_null());
        assert_eq!(value[1]["echo_detected"], false);
    }

    #[test]
    fn render_lists_every_row() {
        let table = sample_table();
        assert_eq!(table.render().lines().count(), 3);
        assert!(!table.is_empty());
        assert!(ResultTable::default().is_empty());
    }
}
