use std::io::{Read, Write};
use std::str::FromStr;

use csv::{ReaderBuilder, WriterBuilder};

use crate::error::Result;

/// QCEW marks suppressed or unavailable cells with a lone space.
pub const NULL_MARKER: &str = " ";

/// A CSV response held as its header plus rows of nullable cells.
/// Columns are whatever the server sent; nothing here checks them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QcewTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>
}

impl QcewTable {
    pub fn new(headers: Vec<String>) -> QcewTable {
        QcewTable {
            headers,
            rows: Vec::new()
        }
    }

    /// Reads comma separated text with a header row. Every line after the header is a row.
    pub fn from_reader<R: Read>(reader: R) -> Result<QcewTable> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(b',')
            .quote(b'"')
            .from_reader(reader);

        let headers = reader.headers()?.iter().map(|h| h.to_owned()).collect();
        let mut table = QcewTable::new(headers);

        for record in reader.records() {
            let record = record?;
            let row = record.iter().map(|cell| {
                if cell == NULL_MARKER {
                    None
                } else {
                    Some(cell.to_owned())
                }
            }).collect();
            table.rows.push(row);
        }

        Ok(table)
    }

    pub fn from_csv_str(text: &str) -> Result<QcewTable> {
        QcewTable::from_reader(text.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    /// Cell lookup by row number and column name. `None` covers an unknown column, a short
    /// row, and a null cell alike.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)?.as_deref()
    }

    /// Typed cell lookup, e.g. `table.parse::<f64>(0, "avg_wkly_wage")`.
    pub fn parse<T: FromStr>(&self, row: usize, column: &str) -> Option<T> {
        self.get(row, column)?.parse::<T>().ok()
    }

    /// Every value of one column, top to bottom.
    pub fn column(&self, column: &str) -> Option<Vec<Option<&str>>> {
        let index = self.column_index(column)?;
        Some(self.rows.iter().map(|row| row.get(index).and_then(|c| c.as_deref())).collect())
    }

    /// Writes the table back out as CSV. Null cells are written as the null marker so the
    /// output reads back to the same table.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = WriterBuilder::new().from_writer(writer);

        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or(NULL_MARKER)))?;
        }
        writer.flush()?;

        Ok(())
    }
}
