//! CSV import
//!
//! File import of measurement logs, for bringing bench-sensor exports or
//! spreadsheet records into a session. Supports flexible column mapping
//! and multiple timestamp formats; a bad row is recorded and skipped, it
//! never aborts the rest of the file.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::path::Path;

use super::IngestError;
use crate::session::Measurement;

/// CSV file importer with configurable column mapping
pub struct CsvImporter {
    /// Column index for timestamps (0-indexed)
    timestamp_column: usize,
    /// Format string for parsing timestamps
    timestamp_format: String,
    /// Column index for the average size
    avg_size_column: usize,
    /// Optional column indices for per-sample bounds
    min_size_column: Option<usize>,
    max_size_column: Option<usize>,
    /// Optional column index for the pellet count
    pellet_count_column: Option<usize>,
    /// Whether the CSV has a header row
    has_header: bool,
}

/// Result of a CSV import operation
#[derive(Debug)]
pub struct CsvImportResult {
    /// Imported measurements, sorted by timestamp ascending
    pub measurements: Vec<Measurement>,
    pub rows_processed: usize,
    pub rows_failed: usize,
    pub errors: Vec<String>,
}

impl Default for CsvImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvImporter {
    /// Create a new CSV importer with default settings
    pub fn new() -> Self {
        Self {
            timestamp_column: 0,
            timestamp_format: "%Y-%m-%d %H:%M:%S".to_string(),
            avg_size_column: 1,
            min_size_column: None,
            max_size_column: None,
            pellet_count_column: None,
            has_header: true,
        }
    }

    /// Set the timestamp column index
    pub fn with_timestamp_column(mut self, column: usize) -> Self {
        self.timestamp_column = column;
        self
    }

    /// Set the timestamp format string
    pub fn with_timestamp_format(mut self, format: &str) -> Self {
        self.timestamp_format = format.to_string();
        self
    }

    /// Set the average-size column index
    pub fn with_avg_size_column(mut self, column: usize) -> Self {
        self.avg_size_column = column;
        self
    }

    /// Set the min/max size column indices
    pub fn with_bound_columns(mut self, min: usize, max: usize) -> Self {
        self.min_size_column = Some(min);
        self.max_size_column = Some(max);
        self
    }

    /// Set the pellet-count column index
    pub fn with_pellet_count_column(mut self, column: usize) -> Self {
        self.pellet_count_column = Some(column);
        self
    }

    /// Set whether the CSV has a header row
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Auto-detect column mapping from a header row
    ///
    /// Recognizes the usual sensor-export names: date/time/timestamp,
    /// avg/size, min, max, count/pellets.
    pub fn auto_detect_columns(&mut self, headers: &csv::StringRecord) {
        for (idx, header) in headers.iter().enumerate() {
            let header_lower = header.to_lowercase();

            if header_lower.contains("date")
                || header_lower.contains("time")
                || header_lower.contains("timestamp")
            {
                self.timestamp_column = idx;
            } else if header_lower.contains("avg") || header_lower == "size" {
                self.avg_size_column = idx;
            } else if header_lower.contains("min") {
                self.min_size_column = Some(idx);
            } else if header_lower.contains("max") {
                self.max_size_column = Some(idx);
            } else if header_lower.contains("count") || header_lower.contains("pellet") {
                self.pellet_count_column = Some(idx);
            }
        }
    }

    /// Parse a timestamp string using the configured format
    fn parse_timestamp(&self, ts_str: &str) -> Result<DateTime<Utc>, IngestError> {
        // Try the configured format first
        if let Ok(dt) = NaiveDateTime::parse_from_str(ts_str, &self.timestamp_format) {
            return Ok(dt.and_utc());
        }

        // Try as date only
        if let Ok(date) = NaiveDate::parse_from_str(ts_str, &self.timestamp_format) {
            if let Some(dt) = date.and_hms_opt(12, 0, 0) {
                return Ok(dt.and_utc());
            }
        }

        // Try common formats
        let formats = [
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%dT%H:%M:%SZ",
            "%Y-%m-%d",
            "%m/%d/%Y",
            "%d/%m/%Y",
            "%Y/%m/%d",
        ];

        for fmt in formats {
            if let Ok(dt) = NaiveDateTime::parse_from_str(ts_str, fmt) {
                return Ok(dt.and_utc());
            }
            if let Ok(date) = NaiveDate::parse_from_str(ts_str, fmt) {
                if let Some(dt) = date.and_hms_opt(12, 0, 0) {
                    return Ok(dt.and_utc());
                }
            }
        }

        // Try RFC 3339
        if let Ok(dt) = DateTime::parse_from_rfc3339(ts_str) {
            return Ok(dt.with_timezone(&Utc));
        }

        Err(IngestError::ParseError(format!(
            "Could not parse timestamp: {}",
            ts_str
        )))
    }

    /// Import measurements from a CSV file
    pub fn import(&self, path: &Path) -> Result<CsvImportResult, IngestError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(self.has_header)
            .flexible(true)
            .from_path(path)?;

        let mut importer = None;
        if self.has_header {
            let mut detected = self.clone_settings();
            detected.auto_detect_columns(reader.headers()?);
            importer = Some(detected);
        }
        let importer = importer.as_ref().unwrap_or(self);

        let mut measurements = Vec::new();
        let mut rows_processed = 0;
        let mut rows_failed = 0;
        let mut errors = Vec::new();

        for (line_num, result) in reader.records().enumerate() {
            let actual_line = if self.has_header {
                line_num + 2
            } else {
                line_num + 1
            };

            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    errors.push(format!("Line {}: {}", actual_line, e));
                    rows_failed += 1;
                    continue;
                }
            };

            match importer.parse_row(&record) {
                Ok(measurement) => {
                    measurements.push(measurement);
                    rows_processed += 1;
                }
                Err(e) => {
                    errors.push(format!("Line {}: {}", actual_line, e));
                    rows_failed += 1;
                }
            }
        }

        // The session store requires ascending timestamps
        measurements.sort_by_key(|m| m.timestamp);

        tracing::info!(
            rows_processed,
            rows_failed,
            path = %path.display(),
            "CSV import finished"
        );

        Ok(CsvImportResult {
            measurements,
            rows_processed,
            rows_failed,
            errors,
        })
    }

    /// Parse one CSV record into a measurement
    fn parse_row(&self, record: &csv::StringRecord) -> Result<Measurement, IngestError> {
        let ts_str = record
            .get(self.timestamp_column)
            .map(str::trim)
            .ok_or_else(|| IngestError::ParseError("missing timestamp column".to_string()))?;
        let timestamp = self.parse_timestamp(ts_str)?;

        let avg_size = record
            .get(self.avg_size_column)
            .map(str::trim)
            .ok_or_else(|| IngestError::ParseError("missing size column".to_string()))?
            .parse::<f64>()
            .map_err(|e| IngestError::ParseError(format!("bad size value: {}", e)))?;

        let min_size = self
            .min_size_column
            .and_then(|c| record.get(c))
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|s| s.is_finite() && *s > 0.0);
        let max_size = self
            .max_size_column
            .and_then(|c| record.get(c))
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|s| s.is_finite() && *s > 0.0);

        let pellet_count = self
            .pellet_count_column
            .and_then(|c| record.get(c))
            .and_then(|s| s.trim().parse::<u32>().ok())
            .unwrap_or(0);

        Ok(Measurement {
            timestamp,
            avg_size,
            min_size,
            max_size,
            pellet_count,
        })
    }

    fn clone_settings(&self) -> Self {
        Self {
            timestamp_column: self.timestamp_column,
            timestamp_format: self.timestamp_format.clone(),
            avg_size_column: self.avg_size_column,
            min_size_column: self.min_size_column,
            max_size_column: self.max_size_column,
            pellet_count_column: self.pellet_count_column,
            has_header: self.has_header,
        }
    }
}
