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

//! Streaming LIGO_LW table reader.
//!
//! A [`TableReader`] parses the document header at open time, locates a
//! table by name with [`TableReader::open_table`], and then delivers rows
//! one at a time with [`TableReader::next_row`]. Row data lives in the
//! session's single [`Table`] and is overwritten in place, so cell
//! contents are valid only until the next row is read. The borrow
//! checker enforces this, since reading the table borrows the session.
//!
//! ```no_run
//! use ligolw_core::TableReader;
//!
//! # fn main() -> ligolw_core::LigolwResult<()> {
//! let mut session = TableReader::open("triggers.xml")?;
//! session.open_table(Some("sngl_burst"))?;
//! while session.next_row()? {
//!     for (column, cell) in session.table().columns.iter().zip(&session.table().cells) {
//!         println!("{}: {:?}", column.name, cell);
//!     }
//! }
//! session.close()?;
//! # Ok(())
//! # }
//! ```

use std::io::Read;
use std::path::Path;

use crate::document::{validate_delimiter, Document, Table};
use crate::error::{LigolwError, LigolwResult};
use crate::lex::scan;
use crate::lex::source::ByteReader;
use crate::lex::token::{next_token, Token};
use crate::limits::Limits;
use crate::names::table_name_matches;
use crate::value::{column_type_from_keyword, Cell, ColumnType, Value};

/// Where the parser stands in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    /// Document header parsed; no table open.
    Body,
    /// Inside a stream, positioned between rows.
    Streaming,
    /// The open table's stream is exhausted (`</Table>` consumed).
    TableDone,
    /// `</LIGO_LW>` consumed; nothing left to read.
    End,
    /// Session closed or aborted.
    Closed,
}

/// A read session over one LIGO_LW file.
#[derive(Debug)]
pub struct TableReader {
    src: ByteReader,
    /// Reused token text buffer.
    buf: Vec<u8>,
    doc: Document,
    limits: Limits,
    state: ReaderState,
    /// One token of grammar lookahead, set when header parsing reads past
    /// the document comment.
    lookahead: Option<Token>,
    rows_read: u64,
}

impl TableReader {
    /// Open a file (gzipped or plain) and parse the document header.
    pub fn open(path: impl AsRef<Path>) -> LigolwResult<Self> {
        Self::open_with_limits(path, Limits::default())
    }

    /// Open a file with explicit parser limits.
    pub fn open_with_limits(path: impl AsRef<Path>, limits: Limits) -> LigolwResult<Self> {
        Self::new(ByteReader::open(path)?, limits)
    }

    /// Read from an arbitrary byte stream (no gzip sniffing) and parse
    /// the document header.
    pub fn from_reader(reader: impl Read + 'static) -> LigolwResult<Self> {
        Self::from_reader_with_limits(reader, Limits::default())
    }

    /// Read from an arbitrary byte stream with explicit parser limits.
    pub fn from_reader_with_limits(
        reader: impl Read + 'static,
        limits: Limits,
    ) -> LigolwResult<Self> {
        Self::new(ByteReader::from_reader(reader), limits)
    }

    fn new(src: ByteReader, limits: Limits) -> LigolwResult<Self> {
        let mut session = Self {
            src,
            buf: Vec::new(),
            doc: Document::default(),
            limits,
            state: ReaderState::Body,
            lookahead: None,
            rows_read: 0,
        };
        session.parse_header()?;
        Ok(session)
    }

    /// The parsed document (header attributes plus the active table).
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// The active table. Cell contents are valid until the next call to
    /// [`next_row`](Self::next_row).
    pub fn table(&self) -> &Table {
        &self.doc.table
    }

    /// Rows delivered so far from the active table.
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    /// Find a column in the active table by resolved, case-insensitive
    /// name.
    pub fn find_column(&self, name: &str) -> Option<usize> {
        crate::names::find_column(&self.doc.table, name)
    }

    /// A column's display name (namespace prefixes stripped).
    pub fn column_name(&self, index: usize) -> Option<&str> {
        self.doc
            .table
            .columns
            .get(index)
            .map(|c| crate::names::resolve_column_name(&c.name))
    }

    // ==================== token plumbing ====================

    fn token(&mut self) -> LigolwResult<Token> {
        match self.lookahead.take() {
            Some(t) => Ok(t),
            None => next_token(&mut self.src, &mut self.buf),
        }
    }

    fn token_text(&self, token: Token) -> String {
        match token {
            Token::Unknown => String::from_utf8_lossy(&self.buf).into_owned(),
            other => other.text().to_string(),
        }
    }

    fn expect(&mut self, want: Token) -> LigolwResult<()> {
        let found = self.token()?;
        if found == want {
            Ok(())
        } else {
            Err(self.unexpected(found, want.text()))
        }
    }

    fn unexpected(&self, found: Token, wanted: &str) -> LigolwError {
        LigolwError::syntax(
            format!(
                "unexpected token \"{}\", expected \"{}\"",
                self.token_text(found),
                wanted
            ),
            self.src.line(),
            self.src.column(),
        )
    }

    fn syntax(&self, message: impl Into<String>) -> LigolwError {
        LigolwError::syntax(message, self.src.line(), self.src.column())
    }

    fn semantic(&self, message: impl Into<String>) -> LigolwError {
        LigolwError::semantic(message, self.src.line(), self.src.column())
    }

    /// Read an `= "value"` attribute payload; the attribute keyword has
    /// already been consumed.
    fn attribute_value(&mut self, delimiter: Option<u8>) -> LigolwResult<String> {
        self.expect(Token::Equals)?;
        scan::read_attribute_value(&mut self.src, delimiter, self.limits.max_value_bytes)
    }

    // ==================== document header ====================

    /// Skip any non-LIGO_LW preamble (XML declaration, doctype), then
    /// parse `<LIGO_LW Name?>` and an optional document comment.
    fn parse_header(&mut self) -> LigolwResult<()> {
        loop {
            match self.token()? {
                Token::LigoLw => break,
                Token::EndOfFile => {
                    return Err(self.syntax("no <LIGO_LW> element found"));
                }
                _ => continue,
            }
        }
        let mut name = None;
        loop {
            match self.token()? {
                Token::Name => {
                    if name.is_some() {
                        return Err(self.syntax("duplicate Name attribute in <LIGO_LW>"));
                    }
                    name = Some(self.attribute_value(None)?);
                }
                Token::Greater => break,
                other => return Err(self.unexpected(other, "Name or >")),
            }
        }
        self.doc.name = name.unwrap_or_default();

        let tok = self.token()?;
        if tok == Token::Comment {
            self.doc.comment = Some(self.parse_comment_body()?);
        } else {
            self.lookahead = Some(tok);
        }
        Ok(())
    }

    /// Parse `> text </Comment>` after a `<Comment` token.
    fn parse_comment_body(&mut self) -> LigolwResult<String> {
        self.expect(Token::Greater)?;
        let text = scan::scan_text(&mut self.src, None, None, self.limits.max_value_bytes)?;
        self.expect(Token::CloseComment)?;
        self.expect(Token::Greater)?;
        String::from_utf8(text)
            .map_err(|_| self.syntax("comment is not valid UTF-8"))
    }

    // ==================== table location ====================

    /// Locate the next table matching `name`, parse its header, and
    /// position the session at the first row.
    ///
    /// `None` (or an empty name) matches the next table in the file. The
    /// match is case-insensitive and ignores colon-delimited namespace
    /// prefixes and a trailing `:table` suffix in the stored name.
    /// Non-matching tables are skipped in their entirety. Reaching
    /// `</LIGO_LW>` without a match is an error.
    pub fn open_table(&mut self, name: Option<&str>) -> LigolwResult<()> {
        match self.state {
            ReaderState::Body | ReaderState::TableDone => {}
            ReaderState::Streaming => {
                return Err(self.semantic("a table is already being read"));
            }
            ReaderState::End | ReaderState::Closed => {
                return Err(self.semantic("no more tables in this session"));
            }
        }
        loop {
            match self.token()? {
                Token::Table => {
                    let table_name = self.parse_table_attributes()?;
                    if table_name_matches(&table_name, name) {
                        self.doc.table.clear();
                        self.doc.table.name = table_name;
                        self.parse_table_body()?;
                        self.state = ReaderState::Streaming;
                        self.rows_read = 0;
                        return Ok(());
                    }
                    self.consume_table()?;
                }
                Token::CloseLigoLw => {
                    self.expect(Token::Greater)?;
                    self.state = ReaderState::End;
                    return Err(self.semantic(match name {
                        Some(n) => format!("no table named \"{n}\" in document"),
                        None => "no further table in document".to_string(),
                    }));
                }
                Token::EndOfFile => {
                    return Err(self.syntax("premature end of file while searching for table"));
                }
                other => return Err(self.unexpected(other, "<Table or </LIGO_LW")),
            }
        }
    }

    /// Parse `Name="..."` attributes and the closing `>` of a `<Table`
    /// tag, returning the declared name.
    fn parse_table_attributes(&mut self) -> LigolwResult<String> {
        let mut name = None;
        loop {
            match self.token()? {
                Token::Name => {
                    if name.is_some() {
                        return Err(self.syntax("duplicate Name attribute in <Table>"));
                    }
                    name = Some(self.attribute_value(None)?);
                }
                Token::Greater => break,
                other => return Err(self.unexpected(other, "Name or >")),
            }
        }
        Ok(name.unwrap_or_default())
    }

    /// Parse a matched table's body up to and including the `>` of its
    /// `<Stream>` tag: optional comment, column declarations, stream
    /// attributes.
    fn parse_table_body(&mut self) -> LigolwResult<()> {
        loop {
            match self.token()? {
                Token::Comment => {
                    let text = self.parse_comment_body()?;
                    self.doc.table.comment = Some(text);
                }
                Token::Column => self.parse_column()?,
                Token::Stream => return self.parse_stream_attributes(),
                other => return Err(self.unexpected(other, "<Comment, <Column or <Stream")),
            }
        }
    }

    /// Parse `Name="..." Type="..."/>` of a `<Column` tag, in either
    /// attribute order.
    fn parse_column(&mut self) -> LigolwResult<()> {
        let mut name: Option<String> = None;
        let mut data_type: Option<ColumnType> = None;
        loop {
            match self.token()? {
                Token::Name => {
                    if name.is_some() {
                        return Err(self.syntax("duplicate Name attribute in <Column>"));
                    }
                    name = Some(self.attribute_value(None)?);
                }
                Token::Type => {
                    if data_type.is_some() {
                        return Err(self.syntax("duplicate Type attribute in <Column>"));
                    }
                    let keyword = self.attribute_value(None)?;
                    data_type = Some(column_type_from_keyword(
                        &keyword,
                        self.src.line(),
                        self.src.column(),
                    )?);
                }
                Token::Slash => {
                    self.expect(Token::Greater)?;
                    break;
                }
                other => return Err(self.unexpected(other, "Name, Type or /")),
            }
        }
        let name = name.ok_or_else(|| self.syntax("column has no Name attribute"))?;
        let data_type = data_type
            .ok_or_else(|| self.syntax(format!("column \"{name}\" has no Type attribute")))?;
        if self.doc.table.num_columns() >= self.limits.max_columns {
            return Err(LigolwError::limit(
                format!("too many columns (limit {})", self.limits.max_columns),
                self.src.line(),
                self.src.column(),
            ));
        }
        self.doc.table.push_column(name, data_type);
        Ok(())
    }

    /// Parse the attributes and closing `>` of a `<Stream` tag. All three
    /// attributes are optional and may appear in any order. Parsing
    /// suspends here: the stream content is read row by row.
    fn parse_stream_attributes(&mut self) -> LigolwResult<()> {
        let mut seen_name = false;
        let mut seen_type = false;
        let mut seen_delimiter = false;
        loop {
            let delimiter = Some(self.doc.table.stream.delimiter);
            match self.token()? {
                Token::Name => {
                    if seen_name {
                        return Err(self.syntax("duplicate Name attribute in <Stream>"));
                    }
                    seen_name = true;
                    self.doc.table.stream.name = self.attribute_value(delimiter)?;
                }
                Token::Type => {
                    if seen_type {
                        return Err(self.syntax("duplicate Type attribute in <Stream>"));
                    }
                    seen_type = true;
                    self.doc.table.stream.stream_type = self.attribute_value(delimiter)?;
                }
                Token::Delimiter => {
                    if seen_delimiter {
                        return Err(self.syntax("duplicate Delimiter attribute in <Stream>"));
                    }
                    seen_delimiter = true;
                    let value = self.attribute_value(delimiter)?;
                    let [byte] = value.as_bytes() else {
                        return Err(self.syntax("delimiter must be a single character"));
                    };
                    self.doc.table.stream.delimiter =
                        validate_delimiter(*byte, self.src.line(), self.src.column())?;
                }
                Token::Greater => return Ok(()),
                other => return Err(self.unexpected(other, "Name, Type, Delimiter or >")),
            }
        }
    }

    /// Fast-forward past a non-matching table: scan for tags and stop
    /// after `</Table>`. Stream content is not value-parsed.
    fn consume_table(&mut self) -> LigolwResult<()> {
        loop {
            loop {
                match self.src.next_byte()? {
                    Some(b'<') => {
                        self.src.unget(b'<');
                        break;
                    }
                    Some(_) => continue,
                    None => {
                        return Err(self.syntax("premature end of file while skipping table"));
                    }
                }
            }
            if next_token(&mut self.src, &mut self.buf)? == Token::CloseTable {
                self.expect(Token::Greater)?;
                return Ok(());
            }
        }
    }

    // ==================== row delivery ====================

    /// Read the next row into the table's cells.
    ///
    /// Returns `Ok(true)` when a row was read and `Ok(false)` when the
    /// stream is exhausted (the `</Stream></Table>` trailer has then been
    /// consumed). Once exhausted, further calls keep returning
    /// `Ok(false)`.
    pub fn next_row(&mut self) -> LigolwResult<bool> {
        match self.state {
            ReaderState::Streaming => {}
            ReaderState::TableDone | ReaderState::End => return Ok(false),
            ReaderState::Body => return Err(self.semantic("no table is open")),
            ReaderState::Closed => return Err(self.semantic("session is closed")),
        }

        let c = match self.src.skip_whitespace()? {
            Some(c) => c,
            None => return Err(self.syntax("premature end of file in stream")),
        };
        self.src.unget(c);
        if c == b'<' {
            self.expect(Token::CloseStream)?;
            self.expect(Token::Greater)?;
            self.expect(Token::CloseTable)?;
            self.expect(Token::Greater)?;
            self.state = ReaderState::TableDone;
            return Ok(false);
        }
        let num_columns = self.doc.table.num_columns();
        if num_columns == 0 {
            return Err(self.syntax("stream content in a table with no columns"));
        }

        let delimiter = self.doc.table.stream.delimiter;
        let max = self.limits.max_value_bytes;
        for i in 0..num_columns {
            let data_type = self.doc.table.columns[i].data_type;
            self.doc.table.cells[i] = scan_element(&mut self.src, data_type, delimiter, max)?;

            // Element separator: a delimiter is consumed; a tag start is
            // only legal after the last element and is left unconsumed.
            let c = match self.src.skip_whitespace()? {
                Some(c) => c,
                None => return Err(self.syntax("premature end of file in stream")),
            };
            if c == delimiter {
                continue;
            }
            if c == b'<' {
                self.src.unget(c);
                if i + 1 == num_columns {
                    break;
                }
                return Err(self.syntax(format!(
                    "row ended after {} of {} elements",
                    i + 1,
                    num_columns
                )));
            }
            return Err(self.syntax(format!(
                "unexpected character '{}' after row element",
                c as char
            )));
        }
        self.rows_read += 1;
        Ok(true)
    }

    // ==================== session termination ====================

    /// Finish the session gracefully: drain any open stream, verify the
    /// document trailer and that end-of-file follows it, and release the
    /// input. Idempotent.
    pub fn close(&mut self) -> LigolwResult<()> {
        match self.state {
            ReaderState::Closed => return Ok(()),
            ReaderState::End => {
                self.state = ReaderState::Closed;
                return Ok(());
            }
            ReaderState::Streaming => {
                while self.next_row()? {}
            }
            ReaderState::Body | ReaderState::TableDone => {}
        }
        // Skip any remaining tables, then require the document trailer.
        loop {
            match self.token()? {
                Token::CloseLigoLw => {
                    self.expect(Token::Greater)?;
                    break;
                }
                Token::Table => {
                    // Attributes and body are skipped wholesale.
                    self.consume_table()?;
                }
                Token::EndOfFile => {
                    self.state = ReaderState::Closed;
                    return Err(self.syntax("premature end of file, expected \"</LIGO_LW\""));
                }
                _ => continue,
            }
        }
        let trailing = self.token()?;
        self.state = ReaderState::Closed;
        if trailing != Token::EndOfFile {
            return Err(self.unexpected(trailing, "END_OF_FILE"));
        }
        Ok(())
    }

    /// Terminate the session immediately without parsing the rest of the
    /// document. Idempotent.
    pub fn abort(&mut self) {
        self.state = ReaderState::Closed;
    }
}

impl Drop for TableReader {
    fn drop(&mut self) {
        self.abort();
    }
}

/// Scan one row element of the given column type, mapping an absent
/// element to a null cell.
fn scan_element(
    src: &mut ByteReader,
    data_type: ColumnType,
    delimiter: u8,
    max: usize,
) -> LigolwResult<Cell> {
    let value = if data_type.is_text() {
        scan::scan_lstring(src, delimiter, max)?.map(Value::Lstring)
    } else if data_type == ColumnType::Blob {
        scan::scan_blob(src, delimiter, max)?.map(Value::Blob)
    } else if data_type == ColumnType::IlwdCharU {
        scan::scan_ilwd_char_u(src, delimiter, max)?.map(Value::Blob)
    } else {
        scan::scan_numeric(src, data_type, delimiter)?
    };
    Ok(match value {
        Some(v) => Cell::new(v),
        None => Cell::null(data_type),
    })
}
