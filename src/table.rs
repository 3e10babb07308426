//! Columnar result tables and their Arrow IPC serialisation.
//!
//! Tables are small (one row per timepoint), so they are built column-wise in
//! memory and written as a single zstd-compressed record batch.
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{ArrayRef, Float64Array, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::ipc::writer::{FileWriter, IpcWriteOptions};
use arrow::ipc::CompressionType;
use arrow::record_batch::RecordBatch;

/// One column of values.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    UInt32(Vec<u32>),
    Float64(Vec<f64>),
}

impl Column {
    fn len(&self) -> usize {
        match self {
            Column::UInt32(v) => v.len(),
            Column::Float64(v) => v.len(),
        }
    }

    pub fn as_f64(&self) -> Option<&[f64]> {
        match self {
            Column::Float64(v) => Some(v),
            Column::UInt32(_) => None,
        }
    }

    fn data_type(&self) -> DataType {
        match self {
            Column::UInt32(_) => DataType::UInt32,
            Column::Float64(_) => DataType::Float64,
        }
    }

    fn to_arrow(&self) -> ArrayRef {
        match self {
            Column::UInt32(v) => Arc::new(UInt32Array::from(v.clone())),
            Column::Float64(v) => Arc::new(Float64Array::from(v.clone())),
        }
    }
}

/// An ordered set of equally long, uniquely named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<(String, Column)>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column. Fails on a duplicate name or a length mismatch.
    pub fn with_column(mut self, name: &str, column: Column) -> Result<Self> {
        if self.column(name).is_some() {
            bail!("duplicate column {name:?}");
        }
        if let Some((first, existing)) = self.columns.first() {
            if existing.len() != column.len() {
                bail!(
                    "column {name:?} has {} rows but {first:?} has {}",
                    column.len(),
                    existing.len()
                );
            }
        }
        self.columns.push((name.to_string(), column));
        Ok(self)
    }

    /// Remove a column. Fails if it is not present.
    pub fn drop(mut self, name: &str) -> Result<Self> {
        let Some(idx) = self.columns.iter().position(|(n, _)| n == name) else {
            bail!("cannot drop missing column {name:?}");
        };
        self.columns.remove(idx);
        Ok(self)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, |(_, c)| c.len())
    }

    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let fields: Vec<Field> = self
            .columns
            .iter()
            .map(|(n, c)| Field::new(n.as_str(), c.data_type(), false))
            .collect();
        let arrays: Vec<ArrayRef> = self.columns.iter().map(|(_, c)| c.to_arrow()).collect();
        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?;
        Ok(batch)
    }

    /// Write the table to `path` as an Arrow IPC file with zstd compression.
    ///
    /// The file is created (or truncated) in place.
    pub fn write_ipc(&self, path: &Path) -> Result<()> {
        let batch = self.to_record_batch()?;
        let file = File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        let options = IpcWriteOptions::default()
            .try_with_compression(Some(CompressionType::ZSTD))?;
        let mut writer = FileWriter::try_new_with_options(file, &batch.schema(), options)?;
        writer.write(&batch)?;
        writer.finish()
            .with_context(|| format!("finishing {}", path.display()))?;
        Ok(())
    }
}
