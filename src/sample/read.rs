use std::path::Path;

use csv::ReaderBuilder;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::Sample;

/// Failure to build a [`Sample`] from raw input.
#[derive(Debug, Error)]
pub enum SampleError {
    /// Underlying file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV.
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// The CSV file had a header but no records.
    #[error("CSV file contains no data records")]
    EmptyFile,

    /// Requested column is absent from the header.
    #[error("column `{0}` not found in CSV header")]
    MissingColumn(String),

    /// A cell could not be parsed as a number.
    #[error("record {record}: `{value}` is not a number")]
    NotNumeric {
        /// 1-based record number (header excluded).
        record: usize,
        /// Raw cell text.
        value: String,
    },

    /// No observations at all.
    #[error("sample contains no observations")]
    Empty,

    /// NaN or infinite observation.
    #[error("observation #{index} is not finite")]
    NonFinite {
        /// Position of the offending observation.
        index: usize,
    },

    /// Observation outside `(0, ∞)` where a positive sample is required.
    #[error("observation #{index} ({value}) is not positive")]
    NonPositive {
        /// Position of the offending observation.
        index: usize,
        /// The offending value.
        value: f64,
    },
}

impl<T> Sample<T> {
    /// Read sample data from a CSV file with headers matching struct fields
    ///
    /// # Errors
    /// I/O and CSV failures, or [`SampleError::EmptyFile`].
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, SampleError>
    where
        T: DeserializeOwned,
    {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)?;

        let mut records = Vec::new();
        for result in rdr.deserialize() {
            records.push(result?);
        }

        if records.is_empty() {
            return Err(SampleError::EmptyFile);
        }

        Ok(Self { data: records })
    }
}

impl Sample<f64> {
    /// Read a single numeric column of a headed CSV file.
    ///
    /// Surrounding whitespace is trimmed; blank cells are skipped.
    ///
    /// # Errors
    /// I/O and CSV failures, [`SampleError::MissingColumn`],
    /// [`SampleError::NotNumeric`], [`SampleError::EmptyFile`] and the
    /// validation errors of [`Sample::try_new`].
    pub fn read_column<P: AsRef<Path>>(path: P, column: &str) -> Result<Self, SampleError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let index = rdr
            .headers()?
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| SampleError::MissingColumn(column.to_owned()))?;

        let mut values = Vec::new();
        for (n, record) in rdr.records().enumerate() {
            let record = record?;
            let Some(cell) = record.get(index) else { continue };
            if cell.is_empty() {
                continue;
            }
            let value = cell.parse::<f64>().map_err(|_| SampleError::NotNumeric {
                record: n + 1,
                value: cell.to_owned(),
            })?;
            values.push(value);
        }

        if values.is_empty() {
            return Err(SampleError::EmptyFile);
        }
        Self::try_new(values)
    }
}
