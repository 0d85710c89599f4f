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

//! The LIGO_LW document data model.
//!
//! A session holds exactly one [`Document`] with exactly one active
//! [`Table`]: the parser discovers tables sequentially and only retains
//! the one matching the requested name. Cells are stored parallel to the
//! column declarations and are reused across rows.

use crate::error::{LigolwError, LigolwResult};
use crate::value::{Cell, ColumnType};

/// One column declaration: a (possibly colon-qualified) name and a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// The declared name, e.g. `"processgroup:process:program"`.
    pub name: String,
    /// The declared data type.
    pub data_type: ColumnType,
}

/// The stream declaration of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stream {
    /// The stream's `Name` attribute.
    pub name: String,
    /// The stream's `Type` attribute (informational; defaults to `Local`).
    pub stream_type: String,
    /// The single delimiter byte separating row values.
    pub delimiter: u8,
}

impl Default for Stream {
    fn default() -> Self {
        Self {
            name: String::new(),
            stream_type: "Local".to_string(),
            delimiter: b',',
        }
    }
}

/// Delimiter bytes that would be ambiguous inside numeric literals or at
/// a tag start.
const BANNED_DELIMITERS: &[u8] = b"<\"'\\0123456789+-.Ee";

/// Validate a stream delimiter byte.
pub fn validate_delimiter(b: u8, line: usize, column: usize) -> LigolwResult<u8> {
    if b == 0 || BANNED_DELIMITERS.contains(&b) {
        return Err(LigolwError::syntax(
            format!("character '{}' is invalid as a delimiter", b as char),
            line,
            column,
        ));
    }
    Ok(b)
}

/// One table: declarations plus the current row.
///
/// `cells[i]` always belongs to `columns[i]`; the two sequences stay the
/// same length and in file declaration order. Row contents are
/// overwritten in place on each read, so a cell's data is only valid
/// until the next row is read.
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// The table's `Name` attribute.
    pub name: String,
    /// The table's comment, if any.
    pub comment: Option<String>,
    /// Column declarations, in file order.
    pub columns: Vec<Column>,
    /// The current row, parallel to `columns`.
    pub cells: Vec<Cell>,
    /// The stream declaration.
    pub stream: Stream,
}

impl Table {
    /// Number of declared columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Append a column declaration with a zeroed, absent cell.
    pub fn push_column(&mut self, name: String, data_type: ColumnType) {
        self.columns.push(Column { name, data_type });
        self.cells.push(Cell::null(data_type));
    }

    /// Drop all declarations and row data (used when a new table search
    /// starts).
    pub fn clear(&mut self) {
        self.name.clear();
        self.comment = None;
        self.columns.clear();
        self.cells.clear();
        self.stream = Stream::default();
    }
}

/// A parsed document: the outer `LIGO_LW` element and its active table.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// The document's `Name` attribute.
    pub name: String,
    /// The document-level comment, if any.
    pub comment: Option<String>,
    /// The active table.
    pub table: Table,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    // ==================== Delimiter validation tests ====================

    #[test]
    fn test_valid_delimiters() {
        assert!(validate_delimiter(b',', 1, 1).is_ok());
        assert!(validate_delimiter(b';', 1, 1).is_ok());
        assert!(validate_delimiter(b'|', 1, 1).is_ok());
        assert!(validate_delimiter(b'\t', 1, 1).is_ok());
    }

    #[test]
    fn test_banned_delimiters() {
        for b in b"<\"'\\0123456789+-.Ee\0" {
            let err = validate_delimiter(*b, 2, 5).unwrap_err();
            assert_eq!(err.kind, crate::LigolwErrorKind::Syntax);
            assert_eq!(err.line, 2);
        }
    }

    // ==================== Table invariant tests ====================

    #[test]
    fn test_push_column_keeps_cells_parallel() {
        let mut table = Table::default();
        table.push_column("id".into(), ColumnType::Int4S);
        table.push_column("name".into(), ColumnType::Lstring);
        assert_eq!(table.num_columns(), 2);
        assert_eq!(table.cells.len(), 2);
        assert!(table.cells[0].is_null());
        assert_eq!(table.cells[0].value, Value::Int4S(0));
        assert_eq!(table.cells[1].value, Value::Lstring(String::new()));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut table = Table {
            name: "x".into(),
            comment: Some("c".into()),
            ..Table::default()
        };
        table.push_column("a".into(), ColumnType::Real8);
        table.stream.delimiter = b';';
        table.clear();
        assert!(table.name.is_empty());
        assert!(table.comment.is_none());
        assert_eq!(table.num_columns(), 0);
        assert_eq!(table.cells.len(), 0);
        assert_eq!(table.stream.delimiter, b',');
    }

    #[test]
    fn test_stream_defaults() {
        let stream = Stream::default();
        assert_eq!(stream.delimiter, b',');
        assert_eq!(stream.stream_type, "Local");
        assert!(stream.name.is_empty());
    }
}
