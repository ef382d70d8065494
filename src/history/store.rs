//! CSV persistence for the calculation history.

use crate::calculator::{Calculation, parse_timestamp};
use crate::error::{CalcError, Result};
use anyhow::Context;
use csv::StringRecord;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Header row of the history file, in column order.
pub const COLUMNS: [&str; 5] = ["operation", "operand1", "operand2", "result", "timestamp"];

/// Reads and writes the history file at a fixed path.
#[derive(Clone, Debug)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the whole history, replacing the file.
    ///
    /// An empty history still produces the header row.
    pub fn save(&self, history: &[Calculation]) -> Result<()> {
        self.write(history)
            .map_err(|err| CalcError::operation(format!("Failed to save history: {err:#}")))
    }

    /// Read the history back.
    ///
    /// A missing file yields an empty history. Any malformed row fails the
    /// whole load.
    pub fn load(&self) -> Result<Vec<Calculation>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        self.read()
            .map_err(|err| CalcError::operation(format!("Failed to load history: {err:#}")))
    }

    fn write(&self, history: &[Calculation]) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let mut writer = csv::Writer::from_path(&self.path)?;
        writer.write_record(COLUMNS)?;
        for calc in history {
            writer.write_record([
                calc.operation().to_string(),
                calc.operand1().to_string(),
                calc.operand2().to_string(),
                calc.result().to_string(),
                calc.timestamp().to_rfc3339(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    fn read(&self) -> anyhow::Result<Vec<Calculation>> {
        let mut reader = csv::Reader::from_path(&self.path)?;
        let headers = reader.headers()?.clone();
        let index = ColumnIndex::new(&headers)?;

        let mut history = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let calc = index
                .parse(&record)
                .with_context(|| format!("invalid calculation data in row {}", row + 1))?;
            history.push(calc);
        }
        Ok(history)
    }
}

/// Position of each expected column in the header row.
struct ColumnIndex([usize; 5]);

impl ColumnIndex {
    fn new(headers: &StringRecord) -> anyhow::Result<Self> {
        let mut positions = [0; 5];
        for (slot, name) in positions.iter_mut().zip(COLUMNS) {
            *slot = headers
                .iter()
                .position(|header| header.trim() == name)
                .with_context(|| format!("missing column '{name}'"))?;
        }
        Ok(Self(positions))
    }

    fn field<'r>(&self, record: &'r StringRecord, column: usize) -> anyhow::Result<&'r str> {
        record
            .get(self.0[column])
            .with_context(|| format!("missing value for '{}'", COLUMNS[column]))
    }

    fn decimal(&self, record: &StringRecord, column: usize) -> anyhow::Result<Decimal> {
        let raw = self.field(record, column)?.trim();
        Decimal::from_str(raw)
            .or_else(|_| Decimal::from_scientific(raw))
            .with_context(|| format!("invalid {} '{raw}'", COLUMNS[column]))
    }

    fn parse(&self, record: &StringRecord) -> anyhow::Result<Calculation> {
        let operation = self.field(record, 0)?.trim();
        if operation.is_empty() {
            anyhow::bail!("empty operation name");
        }
        Ok(Calculation::restore(
            operation.to_string(),
            self.decimal(record, 1)?,
            self.decimal(record, 2)?,
            self.decimal(record, 3)?,
            parse_timestamp(self.field(record, 4)?)?,
        ))
    }
}
