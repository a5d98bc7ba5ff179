//! In-memory tables read from and written to CSV or xlsx
//!
//! The file extension picks the format: `.xlsx` is a workbook (first sheet
//! only), anything else is CSV. Cells are kept exactly as read. A
//! zero-length cell is `None`, so callers can tell a blank cell apart from
//! text.

mod workbook;

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::debug;

use crate::error::{Result, SaassError};
use crate::trace_time;

/// On-disk table encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Xlsx,
}

impl TableFormat {
    /// `.xlsx` (any case) is a workbook; every other path is CSV
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xlsx") => TableFormat::Xlsx,
            _ => TableFormat::Csv,
        }
    }
}

/// A header row plus data rows of optional cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Read a table from a CSV or xlsx file
    pub fn read_path(path: &Path) -> Result<Self> {
        let start = Instant::now();
        let file = fs::File::open(path)
            .map_err(|e| SaassError::io_operation("open", path.display(), e))?;

        let format = TableFormat::from_path(path);
        let parsed = match format {
            TableFormat::Csv => Self::from_reader(file),
            TableFormat::Xlsx => workbook::read_first_sheet(file),
        };
        let table = parsed.map_err(|e| match e {
            SaassError::MalformedTable { reason, .. } => SaassError::MalformedTable {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })?;

        debug!(
            path = %path.display(),
            ?format,
            rows = table.rows.len(),
            columns = table.headers.len(),
            "read_table"
        );
        trace_time!(start, "read_table");
        Ok(table)
    }

    /// Read a table from any CSV source
    ///
    /// Short rows are padded with blank cells, rows with every cell blank are
    /// dropped, and rows longer than the header are rejected.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let mut records = Vec::new();
        for record in rdr.records() {
            let record = record?;
            records.push(
                record
                    .iter()
                    .map(|cell| (!cell.is_empty()).then(|| cell.to_string()))
                    .collect(),
            );
        }

        Self::from_records(headers, records)
    }

    /// Build a table from a header and raw rows, with the same row rules as
    /// [`Table::from_reader`]
    fn from_records(headers: Vec<String>, records: Vec<Vec<Option<String>>>) -> Result<Self> {
        if headers.is_empty() {
            return Err(SaassError::MalformedTable {
                path: PathBuf::new(),
                reason: "missing header row".to_string(),
            });
        }

        let mut rows = Vec::with_capacity(records.len());
        for (index, mut row) in records.into_iter().enumerate() {
            if row.len() > headers.len() {
                return Err(SaassError::MalformedTable {
                    path: PathBuf::new(),
                    reason: format!(
                        "row {} has {} cells but the header has {}",
                        index + 1,
                        row.len(),
                        headers.len()
                    ),
                });
            }
            if row.iter().all(Option::is_none) {
                continue;
            }
            row.resize(headers.len(), None);
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    /// Index of the first column with exactly this header
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at `row`, `column`; `None` when blank or out of range
    #[cfg(test)]
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .and_then(|c| c.as_deref())
    }

    pub fn push_row(&mut self, row: Vec<Option<String>>) {
        self.rows.push(row);
    }

    /// Serialize the table as CSV into `writer`
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new().flexible(false).from_writer(writer);
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row.iter().map(|c| c.as_deref().unwrap_or("")))?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Write the table to `path`, replacing any existing file.
    ///
    /// The table goes to a sibling temporary file first and is renamed into
    /// place, so the destination holds either the previous content or the
    /// complete table.
    pub fn write_path(&self, path: &Path) -> Result<()> {
        let start = Instant::now();
        let tmp_path = temporary_sibling(path);
        let format = TableFormat::from_path(path);

        let written = fs::File::create(&tmp_path)
            .map_err(|e| SaassError::io_operation("create", tmp_path.display(), e))
            .and_then(|file| match format {
                TableFormat::Csv => self.to_writer(file),
                TableFormat::Xlsx => workbook::write_sheet(self, file)
                    .map_err(|e| SaassError::io_operation("write", path.display(), e)),
            });

        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(SaassError::io_operation("write", path.display(), e));
        }

        debug!(path = %path.display(), ?format, rows = self.rows.len(), "write_table");
        trace_time!(start, "write_table");
        Ok(())
    }
}

fn temporary_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}
