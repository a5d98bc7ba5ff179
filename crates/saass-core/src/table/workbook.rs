//! xlsx encoding for [`Table`]
//!
//! Only the first worksheet is read. Every cell is written as a string, so
//! text such as `1.0` or `007` reads back unchanged; numeric cells authored
//! elsewhere are read as their display text (`10`, `2.5`).

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use calamine::{Data, Reader, Xlsx};
use rust_xlsxwriter::{ColNum, RowNum, Workbook, XlsxError};

use super::Table;
use crate::error::{Result, SaassError};

pub(super) fn read_first_sheet(file: File) -> Result<Table> {
    let mut workbook: Xlsx<_> = Xlsx::new(BufReader::new(file)).map_err(malformed)?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(malformed)?,
        None => return Err(malformed("workbook has no worksheets")),
    };

    // The used range may not start at column A
    let leading_blanks = range.start().map_or(0, |(_, column)| column as usize);
    let mut rows = range.rows().map(|row| {
        let mut cells = vec![None; leading_blanks];
        cells.extend(row.iter().map(cell_text));
        cells
    });

    let headers = rows
        .next()
        .map(|header| header.into_iter().map(Option::unwrap_or_default).collect())
        .unwrap_or_default();
    Table::from_records(headers, rows.collect())
}

pub(super) fn write_sheet(table: &Table, file: File) -> std::result::Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (column, header) in table.headers.iter().enumerate() {
        sheet.write_string(0, column_number(column)?, header)?;
    }
    for (index, row) in table.rows.iter().enumerate() {
        let row_number = RowNum::try_from(index + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
        for (column, cell) in row.iter().enumerate() {
            if let Some(text) = cell {
                sheet.write_string(row_number, column_number(column)?, text)?;
            }
        }
    }

    workbook.save_to_writer(file)
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(text) if text.is_empty() => None,
        other => Some(other.to_string()),
    }
}

fn column_number(column: usize) -> std::result::Result<ColNum, XlsxError> {
    ColNum::try_from(column).map_err(|_| XlsxError::RowColumnLimitError)
}

fn malformed(reason: impl std::fmt::Display) -> SaassError {
    SaassError::MalformedTable {
        path: PathBuf::new(),
        reason: reason.to_string(),
    }
}
