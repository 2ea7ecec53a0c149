//! Evaluation history and its tabular export.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::Result;
use crate::optimizer::OutputSet;
use crate::parameters::ParameterSet;

/// Column prefix for parameter values
pub const PARAM_PREFIX: &str = "param_";

/// Column prefix for observed outputs
pub const OUTPUT_PREFIX: &str = "output_";

/// Column prefix for recorded targets
pub const TARGET_PREFIX: &str = "target_";

/// One record flattened into prefixed columns
pub type HistoryRow = IndexMap<String, f64>;

/// One evaluated parameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// The evaluated parameter values
    pub parameters: ParameterSet,

    /// Outputs observed for these parameters
    pub outputs: OutputSet,

    /// Targets in force when the record was added, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_outputs: Option<OutputSet>,
}

impl HistoryRecord {
    /// Create a record from owned maps
    pub fn new(
        parameters: ParameterSet,
        outputs: OutputSet,
        target_outputs: Option<OutputSet>,
    ) -> Self {
        Self {
            parameters,
            outputs,
            target_outputs,
        }
    }

    /// Flatten the record into prefixed columns
    ///
    /// Parameters come first, then outputs, then targets when present.
    pub fn to_row(&self) -> HistoryRow {
        let targets = self.target_outputs.iter().flatten();
        self.parameters
            .iter()
            .map(|(name, &value)| (format!("{PARAM_PREFIX}{name}"), value))
            .chain(
                self.outputs
                    .iter()
                    .map(|(name, &value)| (format!("{OUTPUT_PREFIX}{name}"), value)),
            )
            .chain(targets.map(|(name, &value)| (format!("{TARGET_PREFIX}{name}"), value)))
            .collect()
    }
}

/// Column-aligned view of the history.
///
/// Columns are the union of every record's flattened keys in order of first
/// appearance. A cell is `None` when its record has no such key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryTable {
    /// Column names
    pub columns: Vec<String>,

    /// One entry per record, aligned with `columns`
    pub rows: Vec<Vec<Option<f64>>>,
}

impl HistoryTable {
    /// Build the table from records in insertion order
    pub fn from_records(records: &[HistoryRecord]) -> Self {
        let flat: Vec<HistoryRow> = records.iter().map(HistoryRecord::to_row).collect();

        let mut columns: Vec<String> = Vec::new();
        for row in &flat {
            for key in row.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = flat
            .iter()
            .map(|row| columns.iter().map(|column| row.get(column).copied()).collect())
            .collect();

        Self { columns, rows }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All cells of one column, or `None` for an unknown column
    pub fn column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let index = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| row[index]).collect())
    }

    /// Serialize the table to a JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Save records to a JSON file
pub(crate) fn save_records<P: AsRef<Path>>(records: &[HistoryRecord], path: P) -> Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, records)?;
    Ok(())
}

/// Load records from a JSON file
pub(crate) fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<HistoryRecord>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}
