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

//! Positioned byte input for the LIGO_LW tokenizer and value scanners.
//!
//! [`ByteReader`] wraps any byte stream (plain or transparently
//! gzip-decompressed) and provides the three capabilities the parser
//! needs: read one byte, push one byte back, and skip whitespace, all
//! with exact line/column bookkeeping for error reporting.

use crate::error::{LigolwError, LigolwResult};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// A source of bytes for the parser.
///
/// The two stock implementations are a plain buffered file and a
/// gzip-decompressing wrapper; which one backs a session is decided once,
/// at open time, by sniffing the gzip magic number.
pub trait ByteSource {
    /// Read the next byte, or `None` at end of input.
    fn read_byte(&mut self) -> std::io::Result<Option<u8>>;
}

impl<R: Read> ByteSource for BufReader<R> {
    fn read_byte(&mut self) -> std::io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            return match self.read(&mut byte) {
                Ok(0) => Ok(None),
                Ok(_) => Ok(Some(byte[0])),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => Err(e),
            };
        }
    }
}

/// Buffered byte reader with single-byte pushback and position tracking.
///
/// Line and column are 1-based; a newline increments the line and resets
/// the column. Pushing a byte back reverses the bookkeeping, so error
/// positions stay exact across the parser's one-byte lookahead.
pub struct ByteReader {
    src: Box<dyn ByteSource>,
    pushback: Option<u8>,
    line: usize,
    column: usize,
}

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

impl ByteReader {
    /// Open a file, transparently decompressing it if it is gzipped.
    pub fn open(path: impl AsRef<Path>) -> LigolwResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            LigolwError::io(format!("cannot open \"{}\": {}", path.display(), e), 1, 1)
        })?;
        let mut buffered = BufReader::new(file);
        let gzipped = match buffered.fill_buf() {
            Ok(head) => head.starts_with(&GZIP_MAGIC),
            Err(e) => {
                return Err(LigolwError::io(
                    format!("cannot read \"{}\": {}", path.display(), e),
                    1,
                    1,
                ))
            }
        };
        let src: Box<dyn ByteSource> = if gzipped {
            Box::new(BufReader::new(GzDecoder::new(buffered)))
        } else {
            Box::new(buffered)
        };
        Ok(Self::from_source(src))
    }

    /// Wrap an arbitrary byte stream (no gzip sniffing).
    pub fn from_reader(reader: impl Read + 'static) -> Self {
        Self::from_source(Box::new(BufReader::new(reader)))
    }

    fn from_source(src: Box<dyn ByteSource>) -> Self {
        Self {
            src,
            pushback: None,
            line: 1,
            column: 1,
        }
    }

    /// Current line number (1-based).
    pub fn line(&self) -> usize {
        self.line
    }

    /// Current column number (1-based, position of the next unread byte).
    pub fn column(&self) -> usize {
        self.column
    }

    /// Read the next byte, or `None` at end of input.
    pub fn next_byte(&mut self) -> LigolwResult<Option<u8>> {
        let byte = match self.pushback.take() {
            Some(b) => Some(b),
            None => self
                .src
                .read_byte()
                .map_err(|e| LigolwError::io(e.to_string(), self.line, self.column))?,
        };
        if let Some(b) = byte {
            if b == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        Ok(byte)
    }

    /// Push a byte back onto the stream.
    ///
    /// Only one byte of pushback is supported, matching the parser's
    /// one-byte lookahead.
    pub fn unget(&mut self, byte: u8) {
        debug_assert!(self.pushback.is_none(), "double pushback");
        self.column = self.column.saturating_sub(1);
        if byte == b'\n' {
            self.line = self.line.saturating_sub(1);
        }
        self.pushback = Some(byte);
    }

    /// Return the first non-whitespace byte, consuming it, or `None` at
    /// end of input.
    pub fn skip_whitespace(&mut self) -> LigolwResult<Option<u8>> {
        loop {
            match self.next_byte()? {
                Some(b) if b.is_ascii_whitespace() => continue,
                other => return Ok(other),
            }
        }
    }
}

impl std::fmt::Debug for ByteReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteReader")
            .field("line", &self.line)
            .field("column", &self.column)
            .field("pushback", &self.pushback)
            .finish()
    }
}
