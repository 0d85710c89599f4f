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

//! Reading and writing LIGO_LW tabular data files.
//!
//! LIGO_LW is the XML-like interchange format used by gravitational-wave
//! data analysis pipelines to move typed tables between tools. A file
//! holds one `LIGO_LW` element containing one or more `Table`s; each
//! table declares its columns up front and carries its rows as a
//! delimiter-separated `Stream`. Files are often gzipped on disk, which
//! this crate handles transparently.
//!
//! # Reading
//!
//! ```no_run
//! use ligolw::{LigolwResult, TableReader};
//!
//! fn main() -> LigolwResult<()> {
//!     let mut session = TableReader::open("H1-TRIGGERS.xml.gz")?;
//!     session.open_table(Some("sngl_burst"))?;
//!
//!     // Column lookup ignores namespace prefixes and case.
//!     let snr = ligolw::find_column(session.table(), "snr")
//!         .expect("no snr column");
//!
//!     while session.next_row()? {
//!         let cell = &session.table().cells[snr];
//!         if !cell.is_null() {
//!             println!("snr = {:?}", cell.value);
//!         }
//!     }
//!     session.close()
//! }
//! ```
//!
//! # Writing
//!
//! ```no_run
//! use ligolw::{Cell, ColumnType, LigolwResult, TableWriter, Value};
//!
//! fn main() -> LigolwResult<()> {
//!     let mut out = TableWriter::create("out.xml")?;
//!     out.set_table_name("events:table")?;
//!     out.push_column("name", ColumnType::Lstring)?;
//!     out.push_column("snr", ColumnType::Real8)?;
//!
//!     out.set_cell(0, Cell::new(Value::Lstring("chirp".into())))?;
//!     out.set_cell(1, Cell::new(Value::Real8(12.25)))?;
//!     out.put_row()?;
//!     out.close()
//! }
//! ```
//!
//! # Nulls and cell lifetime
//!
//! An element may be absent from a row (two adjacent delimiters); the
//! corresponding [`Cell`] is flagged null while keeping a zero value of
//! the column's type. Rows are parsed into the session's single
//! [`Table`], overwriting the previous row, so cell contents are valid
//! only until the next [`TableReader::next_row`] call.

pub use ligolw_core::{
    compare_cells, find_column, format_cell, resolve_column_name, table_name_matches, Cell,
    Column, ColumnType, Document, ElementOrder, LigolwError, LigolwErrorKind, LigolwResult,
    Limits, Stream, Table, TableReader, TableWriter, Value,
};

pub use ligolw_core::lex;
