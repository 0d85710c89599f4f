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

//! Core reader and writer for the LIGO_LW tabular data format.
//!
//! LIGO_LW is a constrained XML-like container for typed tabular data:
//! a `LIGO_LW` root element holding `Table` elements, each declaring its
//! `Column`s and carrying the row data in a delimiter-separated `Stream`.
//! Files are frequently gzipped; reading is transparent either way.
//!
//! This crate provides:
//!
//! - [`TableReader`]: a streaming parser that locates one table by name
//!   and delivers its rows one at a time into reusable cells
//! - [`TableWriter`]: a streaming emitter producing well-formed documents
//!   with lazy header writing
//! - [`compare_cells`]: cross-type cell comparison with width
//!   canonicalization
//! - the [`lex`] module: positioned byte input, the tokenizer and the
//!   per-type value scanners the reader is built from
//!
//! Row data is read in place: [`TableReader::next_row`] overwrites the
//! session's [`Table`] cells, so cell contents are valid only until the
//! next row is read.

pub mod compare;
mod document;
mod error;
pub mod lex;
mod limits;
mod names;
mod reader;
mod value;
mod writer;

pub use compare::{compare_cells, ElementOrder};
pub use document::{validate_delimiter, Column, Document, Stream, Table};
pub use error::{LigolwError, LigolwErrorKind, LigolwResult};
pub use limits::Limits;
pub use names::{find_column, resolve_column_name, table_name_matches};
pub use reader::TableReader;
pub use value::{Cell, ColumnType, Value};
pub use writer::{format_cell, TableWriter};
