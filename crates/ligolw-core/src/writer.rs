// ligolw - LIGO_LW tabular data interchange
//
// Copyright (c) 2025 The ligolw developers.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Streaming LIGO_LW table writer.
//!
//! A [`TableWriter`] emits one table into one document. The schema
//! (name, comment, columns, delimiter) is declared up front; the table
//! header is written lazily on the first row so an empty table still
//! produces a well-formed document at close. Floats are printed with
//! Rust's shortest round-trip formatting, so every written value reads
//! back bit-exact.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::document::{validate_delimiter, Table};
use crate::error::{LigolwError, LigolwResult};
use crate::value::{Cell, ColumnType, Value};

const PREAMBLE: &str = "<?xml version='1.0' encoding='utf-8'?>\n\
    <!DOCTYPE LIGO_LW SYSTEM \"http://ldas-sw.ligo.caltech.edu/doc/ligolwAPI/html/ligolw_dtd.txt\">\n\
    <LIGO_LW>\n";

const TRAILER: &str = "\n\t\t</Stream>\n\t</Table>\n</LIGO_LW>\n";

/// A write session producing one LIGO_LW table.
pub struct TableWriter {
    out: Box<dyn Write>,
    table: Table,
    header_written: bool,
    rows_written: u64,
    closed: bool,
}

fn write_error(e: std::io::Error) -> LigolwError {
    LigolwError::io(format!("write failure: {e}"), 0, 0)
}

impl TableWriter {
    /// Create a file and write the document preamble.
    pub fn create(path: impl AsRef<Path>) -> LigolwResult<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| {
            LigolwError::io(format!("cannot create \"{}\": {}", path.display(), e), 0, 0)
        })?;
        Self::from_output(Box::new(BufWriter::new(file)))
    }

    /// Write to an arbitrary byte sink.
    pub fn to_writer(writer: impl Write + 'static) -> LigolwResult<Self> {
        Self::from_output(Box::new(writer))
    }

    fn from_output(mut out: Box<dyn Write>) -> LigolwResult<Self> {
        out.write_all(PREAMBLE.as_bytes()).map_err(write_error)?;
        Ok(Self {
            out,
            table: Table::default(),
            header_written: false,
            rows_written: 0,
            closed: false,
        })
    }

    /// The table being written, including the pending row's cells.
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Rows written so far.
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    fn require_open_schema(&self) -> LigolwResult<()> {
        if self.closed {
            return Err(LigolwError::semantic("session is closed", 0, 0));
        }
        if self.header_written {
            return Err(LigolwError::semantic(
                "table header already written, schema is frozen",
                0,
                0,
            ));
        }
        Ok(())
    }

    // ==================== schema declaration ====================

    /// Set the table's `Name` attribute (also used for the stream).
    pub fn set_table_name(&mut self, name: impl Into<String>) -> LigolwResult<()> {
        self.require_open_schema()?;
        self.table.name = name.into();
        Ok(())
    }

    /// Set the table comment.
    pub fn set_comment(&mut self, comment: impl Into<String>) -> LigolwResult<()> {
        self.require_open_schema()?;
        self.table.comment = Some(comment.into());
        Ok(())
    }

    /// Set the stream delimiter (defaults to `,`).
    pub fn set_delimiter(&mut self, delimiter: u8) -> LigolwResult<()> {
        self.require_open_schema()?;
        self.table.stream.delimiter = validate_delimiter(delimiter, 0, 0)?;
        Ok(())
    }

    /// Append a column declaration. The pending row gains a null cell of
    /// the column's type.
    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        data_type: ColumnType,
    ) -> LigolwResult<()> {
        self.require_open_schema()?;
        self.table.push_column(name.into(), data_type);
        Ok(())
    }

    /// Adopt another table's schema: name, comment, columns, delimiter.
    /// Row data is not copied.
    pub fn copy_schema(&mut self, source: &Table) -> LigolwResult<()> {
        self.require_open_schema()?;
        self.table.clear();
        self.table.name = source.name.clone();
        self.table.comment = source.comment.clone();
        self.table.stream = source.stream.clone();
        for column in &source.columns {
            self.table.push_column(column.name.clone(), column.data_type);
        }
        Ok(())
    }

    // ==================== row assembly ====================

    /// Store a cell into the pending row.
    ///
    /// The cell's value variant must match the column's type class; a
    /// null cell is accepted for any column.
    pub fn set_cell(&mut self, index: usize, cell: Cell) -> LigolwResult<()> {
        if self.closed {
            return Err(LigolwError::semantic("session is closed", 0, 0));
        }
        let column = self.table.columns.get(index).ok_or_else(|| {
            LigolwError::semantic(
                format!(
                    "column index {index} out of range (table has {})",
                    self.table.num_columns()
                ),
                0,
                0,
            )
        })?;
        if cell.valid && !value_matches(column.data_type, &cell.value) {
            return Err(LigolwError::semantic(
                format!(
                    "value {:?} does not match column \"{}\" of type {}",
                    cell.value, column.name, column.data_type
                ),
                0,
                0,
            ));
        }
        self.table.cells[index] = cell;
        Ok(())
    }

    /// Copy a source table's current row into the pending row. The
    /// source schema must match column for column.
    pub fn copy_row(&mut self, source: &Table) -> LigolwResult<()> {
        if source.num_columns() != self.table.num_columns() {
            return Err(LigolwError::semantic(
                format!(
                    "cannot copy a {}-column row into a {}-column table",
                    source.num_columns(),
                    self.table.num_columns()
                ),
                0,
                0,
            ));
        }
        for (i, cell) in source.cells.iter().enumerate() {
            self.set_cell(i, cell.clone())?;
        }
        Ok(())
    }

    /// Write the pending row to the stream, emitting the table header
    /// first if this is the first row. Cells are left in place, so
    /// unchanged cells repeat in the next row.
    pub fn put_row(&mut self) -> LigolwResult<()> {
        if self.closed {
            return Err(LigolwError::semantic("session is closed", 0, 0));
        }
        self.write_header()?;
        let delimiter = self.table.stream.delimiter as char;
        let mut line = String::new();
        if self.rows_written > 0 {
            line.push(delimiter);
        }
        line.push_str("\n\t\t\t");
        for (i, (column, cell)) in self
            .table
            .columns
            .iter()
            .zip(&self.table.cells)
            .enumerate()
        {
            if i > 0 {
                line.push(delimiter);
            }
            line.push_str(&format_cell(
                cell,
                column.data_type,
                self.table.stream.delimiter,
            )?);
        }
        self.out.write_all(line.as_bytes()).map_err(write_error)?;
        self.rows_written += 1;
        Ok(())
    }

    // ==================== document framing ====================

    fn write_header(&mut self) -> LigolwResult<()> {
        if self.header_written {
            return Ok(());
        }
        let mut header = String::new();
        let name = escape_attribute(&self.table.name);
        let _ = write!(header, "\t<Table Name=\"{name}\">\n");
        if let Some(comment) = &self.table.comment {
            let _ = write!(
                header,
                "\t\t<Comment>{}</Comment>\n",
                escape_comment(comment)
            );
        }
        for column in &self.table.columns {
            let _ = write!(
                header,
                "\t\t<Column Name=\"{}\" Type=\"{}\"/>\n",
                escape_attribute(&column.name),
                column.data_type
            );
        }
        let _ = write!(
            header,
            "\t\t<Stream Name=\"{name}\" Type=\"Local\" Delimiter=\"{}\">",
            self.table.stream.delimiter as char
        );
        self.out.write_all(header.as_bytes()).map_err(write_error)?;
        self.header_written = true;
        Ok(())
    }

    /// Write the stream, table, and document trailers and flush.
    /// Idempotent.
    pub fn close(&mut self) -> LigolwResult<()> {
        if self.closed {
            return Ok(());
        }
        self.write_header()?;
        self.out.write_all(TRAILER.as_bytes()).map_err(write_error)?;
        self.out.flush().map_err(write_error)?;
        self.closed = true;
        Ok(())
    }
}

impl Drop for TableWriter {
    /// Best-effort close; call [`TableWriter::close`] to observe write
    /// errors.
    fn drop(&mut self) {
        if !self.closed {
            let _ = self.close();
        }
    }
}

impl std::fmt::Debug for TableWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableWriter")
            .field("table", &self.table.name)
            .field("header_written", &self.header_written)
            .field("rows_written", &self.rows_written)
            .field("closed", &self.closed)
            .finish()
    }
}

fn value_matches(data_type: ColumnType, value: &Value) -> bool {
    match value {
        Value::Int2S(_) => data_type == ColumnType::Int2S,
        Value::Int2U(_) => data_type == ColumnType::Int2U,
        Value::Int4S(_) => data_type == ColumnType::Int4S,
        Value::Int4U(_) => data_type == ColumnType::Int4U,
        Value::Int8S(_) => data_type == ColumnType::Int8S,
        Value::Int8U(_) => data_type == ColumnType::Int8U,
        Value::Real4(_) => data_type == ColumnType::Real4,
        Value::Real8(_) => data_type == ColumnType::Real8,
        Value::Complex8(..) => data_type == ColumnType::Complex8,
        Value::Complex16(..) => data_type == ColumnType::Complex16,
        Value::Lstring(_) => data_type.is_text(),
        Value::Blob(_) => data_type.is_binary(),
    }
}

/// Format one cell as stream text. A null cell formats as the empty
/// string (an absent element).
pub fn format_cell(cell: &Cell, data_type: ColumnType, delimiter: u8) -> LigolwResult<String> {
    if !cell.valid {
        return Ok(String::new());
    }
    Ok(match &cell.value {
        Value::Int2S(v) => v.to_string(),
        Value::Int2U(v) => v.to_string(),
        Value::Int4S(v) => v.to_string(),
        Value::Int4U(v) => v.to_string(),
        Value::Int8S(v) => v.to_string(),
        Value::Int8U(v) => v.to_string(),
        Value::Real4(v) => v.to_string(),
        Value::Real8(v) => v.to_string(),
        Value::Complex8(re, im) => format!("{re}+i{im}"),
        Value::Complex16(re, im) => format!("{re}+i{im}"),
        Value::Lstring(s) => format!("\"{}\"", escape_text(s, delimiter)?),
        Value::Blob(bytes) if data_type == ColumnType::IlwdCharU => {
            let mut buf = String::with_capacity(2 + bytes.len() * 4);
            buf.push('"');
            for b in bytes {
                let _ = write!(buf, "\\{b:03o}");
            }
            buf.push('"');
            buf
        }
        Value::Blob(bytes) => format!("\"{}\"", STANDARD.encode(bytes)),
    })
}

/// Escape quoted stream text: backslash escapes for the structural
/// bytes, entities for markup, control characters rejected.
fn escape_text(s: &str, delimiter: u8) -> LigolwResult<String> {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_ascii_control() {
            return Err(LigolwError::semantic(
                format!("control character {:?} in string value", c),
                0,
                0,
            ));
        }
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c if c == delimiter as char => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    Ok(out)
}

/// Escape an attribute value: only the quote, backslash and markup bytes
/// need protection.
fn escape_attribute(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            c => out.push(c),
        }
    }
    out
}

/// Escape comment text: it is terminated by `<` only, so just markup and
/// the backslash need protection.
fn escape_comment(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            c => out.push(c),
        }
    }
    out
}
