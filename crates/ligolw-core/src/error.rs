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

//! Error types for LIGO_LW parsing and writing.

use std::fmt;
use thiserror::Error;

/// The kind of error that occurred during parsing or writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LigolwErrorKind {
    /// Failure of the underlying byte stream (open failure, premature EOF,
    /// read/write error).
    Io,
    /// Lexical or structural violation: unexpected token, unmatched quote,
    /// invalid escape or entity, bad delimiter, unknown column type.
    Syntax,
    /// The document was well formed but did not contain what was asked for
    /// (e.g. the requested table does not exist).
    Semantic,
    /// A configured resource limit was exceeded.
    Limit,
}

impl fmt::Display for LigolwErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io => write!(f, "IOError"),
            Self::Syntax => write!(f, "SyntaxError"),
            Self::Semantic => write!(f, "SemanticError"),
            Self::Limit => write!(f, "LimitError"),
        }
    }
}

/// An error raised while reading or writing a LIGO_LW document.
///
/// Every error carries the 1-based line and column at which it was
/// detected so that callers can point at the offending input. An error
/// aborts the operation that raised it; the session itself stays in a
/// consistent state and may still be closed or aborted.
#[derive(Debug, Clone, Error)]
#[error("{kind} at line {line}, column {column}: {message}")]
pub struct LigolwError {
    /// The kind of error.
    pub kind: LigolwErrorKind,
    /// Human-readable error message.
    pub message: String,
    /// Line number (1-based).
    pub line: usize,
    /// Column number (1-based).
    pub column: usize,
}

impl LigolwError {
    /// Create a new error.
    pub fn new(
        kind: LigolwErrorKind,
        message: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
            column,
        }
    }

    // Convenience constructors for each error kind

    pub fn io(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::new(LigolwErrorKind::Io, message, line, column)
    }

    pub fn syntax(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::new(LigolwErrorKind::Syntax, message, line, column)
    }

    pub fn semantic(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::new(LigolwErrorKind::Semantic, message, line, column)
    }

    pub fn limit(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::new(LigolwErrorKind::Limit, message, line, column)
    }
}

/// Result type for LIGO_LW operations.
pub type LigolwResult<T> = Result<T, LigolwError>;
