//! Price series handling and history providers

use crate::error::{CycleError, Result};
use crate::granularity::Granularity;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Minimum cleaned observations for a usable daily history (one trading year)
pub const MIN_DAILY_OBSERVATIONS: usize = 252;

/// An ordered, date-indexed series of daily close prices for one instrument
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    dates: Vec<NaiveDate>,
    closes: Vec<f64>,
}

impl PriceSeries {
    /// Build a validated series.
    ///
    /// Non-finite and non-positive closes are dropped together with their
    /// dates. The remaining dates must be strictly increasing with no
    /// duplicates, and at least [`MIN_DAILY_OBSERVATIONS`] rows must
    /// survive cleaning.
    pub fn new(dates: Vec<NaiveDate>, closes: Vec<f64>) -> Result<Self> {
        if dates.len() != closes.len() {
            return Err(CycleError::Data(format!(
                "Date and close lengths differ: {} vs {}",
                dates.len(),
                closes.len()
            )));
        }

        let mut clean_dates = Vec::with_capacity(dates.len());
        let mut clean_closes = Vec::with_capacity(closes.len());
        for (date, close) in dates.into_iter().zip(closes.into_iter()) {
            if close.is_finite() && close > 0.0 {
                clean_dates.push(date);
                clean_closes.push(close);
            }
        }

        for pair in clean_dates.windows(2) {
            if pair[1] <= pair[0] {
                return Err(CycleError::Data(format!(
                    "Dates must be strictly increasing: {} follows {}",
                    pair[1], pair[0]
                )));
            }
        }

        if clean_dates.len() < MIN_DAILY_OBSERVATIONS {
            return Err(CycleError::InsufficientData {
                granularity: Granularity::Short,
                required: MIN_DAILY_OBSERVATIONS,
                actual: clean_dates.len(),
            });
        }

        Ok(Self {
            dates: clean_dates,
            closes: clean_closes,
        })
    }

    /// Get the dates
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Get the close prices
    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Date of the most recent observation
    pub fn last_date(&self) -> NaiveDate {
        *self.dates.last().expect("validated series is never empty")
    }

    /// Most recent close price
    pub fn last_close(&self) -> f64 {
        *self.closes.last().expect("validated series is never empty")
    }

    /// Natural log of the close prices
    pub fn log_price(&self) -> Vec<f64> {
        self.closes.iter().map(|c| c.ln()).collect()
    }

    /// The trailing `n` observations (the whole series when shorter)
    pub fn tail(&self, n: usize) -> PriceSeries {
        let start = self.len().saturating_sub(n);
        PriceSeries {
            dates: self.dates[start..].to_vec(),
            closes: self.closes[start..].to_vec(),
        }
    }
}

/// Source of historical daily close prices
pub trait PriceHistoryProvider {
    /// Fetch the close-price history for one instrument over a date range
    fn fetch(&self, instrument: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries>;
}

/// In-memory provider, mainly for tests and examples
#[derive(Debug, Default)]
pub struct MemoryProvider {
    histories: HashMap<String, (Vec<NaiveDate>, Vec<f64>)>,
}

impl MemoryProvider {
    /// Create an empty provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an instrument's full history
    pub fn insert(&mut self, instrument: &str, dates: Vec<NaiveDate>, closes: Vec<f64>) {
        self.histories
            .insert(instrument.to_string(), (dates, closes));
    }
}

impl PriceHistoryProvider for MemoryProvider {
    fn fetch(&self, instrument: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        let (dates, closes) = self.histories.get(instrument).ok_or_else(|| {
            CycleError::Fetch(format!("No price history available for {}", instrument))
        })?;

        let mut range_dates = Vec::new();
        let mut range_closes = Vec::new();
        for (date, close) in dates.iter().zip(closes.iter()) {
            if *date >= start && *date <= end {
                range_dates.push(*date);
                range_closes.push(*close);
            }
        }

        PriceSeries::new(range_dates, range_closes)
    }
}

/// Provider reading per-instrument CSV files from a directory.
///
/// Each instrument maps to `<dir>/<instrument>.csv` with a date column and
/// a close (or price) column; column names are detected case-insensitively.
#[derive(Debug, Clone)]
pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    /// Create a provider rooted at a directory of CSV files
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn load_csv(&self, instrument: &str) -> Result<DataFrame> {
        let path = self.dir.join(format!("{}.csv", instrument));
        let file = File::open(&path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;
        Ok(df)
    }

    fn detect_time_column(df: &DataFrame) -> Result<String> {
        let column_names = df.get_column_names();

        for name in &column_names {
            let lower_name = name.to_lowercase();
            if lower_name.contains("time")
                || lower_name.contains("date")
                || lower_name.contains("timestamp")
            {
                return Ok(name.to_string());
            }
        }

        if let Some(first_col) = df.get_columns().first() {
            if first_col.dtype().is_temporal() {
                return Ok(first_col.name().to_string());
            }
        }

        Err(CycleError::Data("No time column found in data".to_string()))
    }

    fn detect_close_column(df: &DataFrame) -> Result<String> {
        let column_names = df.get_column_names();

        for name in &column_names {
            if name.to_lowercase().contains("close") {
                return Ok(name.to_string());
            }
        }
        for name in &column_names {
            if name.to_lowercase().contains("price") {
                return Ok(name.to_string());
            }
        }

        Err(CycleError::Data(
            "No close price column found in data".to_string(),
        ))
    }

    fn column_as_f64(df: &DataFrame, column_name: &str) -> Result<Vec<f64>> {
        let col = df.column(column_name).map_err(|e| {
            CycleError::Data(format!("Column '{}' not found: {}", column_name, e))
        })?;

        match col.dtype() {
            DataType::Float64 => Ok(col.f64().unwrap().into_iter().flatten().collect()),
            DataType::Float32 => Ok(col
                .f32()
                .unwrap()
                .into_iter()
                .flatten()
                .map(|v| v as f64)
                .collect()),
            DataType::Int64 => Ok(col
                .i64()
                .unwrap()
                .into_iter()
                .flatten()
                .map(|v| v as f64)
                .collect()),
            DataType::Int32 => Ok(col
                .i32()
                .unwrap()
                .into_iter()
                .flatten()
                .map(|v| v as f64)
                .collect()),
            _ => Err(CycleError::Data(format!(
                "Column '{}' cannot be converted to f64",
                column_name
            ))),
        }
    }

    fn column_as_dates(df: &DataFrame, column_name: &str) -> Result<Vec<NaiveDate>> {
        let col = df.column(column_name).map_err(|e| {
            CycleError::Data(format!("Column '{}' not found: {}", column_name, e))
        })?;

        match col.dtype() {
            DataType::Date => Ok(col
                .date()
                .unwrap()
                .into_iter()
                .flatten()
                .filter_map(|days| {
                    NaiveDate::from_ymd_opt(1970, 1, 1)
                        .unwrap()
                        .checked_add_days(chrono::Days::new(days as u64))
                })
                .collect()),
            DataType::Utf8 => {
                let mut dates = Vec::new();
                for value in col.utf8().unwrap().into_iter().flatten() {
                    let parsed = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| {
                        CycleError::Data(format!("Cannot parse date '{}': {}", value, e))
                    })?;
                    dates.push(parsed);
                }
                Ok(dates)
            }
            _ => Err(CycleError::Data(format!(
                "Column '{}' cannot be converted to dates",
                column_name
            ))),
        }
    }
}

impl PriceHistoryProvider for CsvProvider {
    fn fetch(&self, instrument: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        let df = self.load_csv(instrument)?;

        let time_column = Self::detect_time_column(&df)?;
        let close_column = Self::detect_close_column(&df)?;

        let dates = Self::column_as_dates(&df, &time_column)?;
        let closes = Self::column_as_f64(&df, &close_column)?;

        if dates.len() != closes.len() {
            return Err(CycleError::Data(format!(
                "Column lengths differ in {}.csv: {} dates vs {} closes",
                instrument,
                dates.len(),
                closes.len()
            )));
        }

        let mut range_dates = Vec::new();
        let mut range_closes = Vec::new();
        for (date, close) in dates.into_iter().zip(closes.into_iter()) {
            if date >= start && date <= end {
                range_dates.push(date);
                range_closes.push(close);
            }
        }

        PriceSeries::new(range_dates, range_closes)
    }
}
