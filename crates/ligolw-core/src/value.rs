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

//! Column types and row element payloads.
//!
//! The format defines sixteen column type keywords, but only twelve
//! distinct storage classes: the three textual variants (`ilwd:char`,
//! `char_s`, `char_v`) share `lstring` storage, and `ilwd:char_u` shares
//! `blob` storage (it may contain any byte value, so it cannot use a
//! text type).

use crate::error::{LigolwError, LigolwResult};
use std::fmt;

/// A column's declared data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    IlwdChar,
    IlwdCharU,
    Int4S,
    Int4U,
    Int2S,
    Int2U,
    Int8S,
    Int8U,
    Lstring,
    Real4,
    Real8,
    CharS,
    CharV,
    Blob,
    Complex8,
    Complex16,
}

/// Type keyword spellings; the first entry is the canonical name, the
/// rest are accepted aliases. Matching is case-insensitive.
static TYPE_NAMES: [(ColumnType, &[&str]); 16] = [
    (ColumnType::IlwdChar, &["ilwd:char", "char"]),
    (ColumnType::IlwdCharU, &["ilwd:char_u", "char_u"]),
    (ColumnType::Int4S, &["int_4s", "int"]),
    (ColumnType::Int4U, &["int_4u"]),
    (ColumnType::Int2S, &["int_2s", "short"]),
    (ColumnType::Int2U, &["int_2u"]),
    (ColumnType::Int8S, &["int_8s", "long"]),
    (ColumnType::Int8U, &["int_8u"]),
    (ColumnType::Lstring, &["lstring", "string"]),
    (ColumnType::Real4, &["real_4", "float"]),
    (ColumnType::Real8, &["real_8", "double"]),
    (ColumnType::CharS, &["char_s"]),
    (ColumnType::CharV, &["char_v"]),
    (ColumnType::Blob, &["blob"]),
    (ColumnType::Complex8, &["complex_8"]),
    (ColumnType::Complex16, &["complex_16"]),
];

impl ColumnType {
    /// Match a type keyword (case-insensitive, aliases included).
    pub fn from_keyword(s: &str) -> Option<Self> {
        for (ty, names) in &TYPE_NAMES {
            for name in *names {
                if name.eq_ignore_ascii_case(s) {
                    return Some(*ty);
                }
            }
        }
        None
    }

    /// The canonical keyword for this type, as written by the writer.
    pub fn keyword(self) -> &'static str {
        for (ty, names) in &TYPE_NAMES {
            if *ty == self {
                return names[0];
            }
        }
        unreachable!("type without keyword")
    }

    /// True for the textual variants unified as lstring storage.
    pub fn is_text(self) -> bool {
        matches!(
            self,
            Self::Lstring | Self::IlwdChar | Self::CharS | Self::CharV
        )
    }

    /// True for the binary variants unified as blob storage.
    pub fn is_binary(self) -> bool {
        matches!(self, Self::Blob | Self::IlwdCharU)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A row element payload.
///
/// Exactly one variant is ever active for a given column, matching the
/// column's declared type class.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int2S(i16),
    Int2U(u16),
    Int4S(i32),
    Int4U(u32),
    Int8S(i64),
    Int8U(u64),
    Real4(f32),
    Real8(f64),
    /// Real and imaginary parts.
    Complex8(f32, f32),
    /// Real and imaginary parts.
    Complex16(f64, f64),
    /// Storage for all quoted-text column types.
    Lstring(String),
    /// Storage for all embedded-binary column types.
    Blob(Vec<u8>),
}

impl Value {
    /// The zero payload for a column type, used for absent elements.
    pub fn zero(ty: ColumnType) -> Self {
        match ty {
            ColumnType::Int2S => Self::Int2S(0),
            ColumnType::Int2U => Self::Int2U(0),
            ColumnType::Int4S => Self::Int4S(0),
            ColumnType::Int4U => Self::Int4U(0),
            ColumnType::Int8S => Self::Int8S(0),
            ColumnType::Int8U => Self::Int8U(0),
            ColumnType::Real4 => Self::Real4(0.0),
            ColumnType::Real8 => Self::Real8(0.0),
            ColumnType::Complex8 => Self::Complex8(0.0, 0.0),
            ColumnType::Complex16 => Self::Complex16(0.0, 0.0),
            ty if ty.is_text() => Self::Lstring(String::new()),
            _ => Self::Blob(Vec::new()),
        }
    }

    /// Try to get the value as text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Lstring(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the value as binary data.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Blob(b) => Some(b),
            _ => None,
        }
    }
}

/// One row element: a validity flag plus a typed payload.
///
/// Absent means "blank between two delimiters" in the stream; the payload
/// of an absent element is zeroed and must not be read as data.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// False if the element was absent from the row.
    pub valid: bool,
    /// The payload; zeroed when `valid` is false.
    pub value: Value,
}

impl Cell {
    /// A present element holding `value`.
    pub fn new(value: Value) -> Self {
        Self { valid: true, value }
    }

    /// An absent element for a column of type `ty`.
    pub fn null(ty: ColumnType) -> Self {
        Self {
            valid: false,
            value: Value::zero(ty),
        }
    }

    /// True if the element is absent.
    pub fn is_null(&self) -> bool {
        !self.valid
    }
}

/// Match a type keyword or fail with a syntax error at the given position.
pub(crate) fn column_type_from_keyword(
    s: &str,
    line: usize,
    column: usize,
) -> LigolwResult<ColumnType> {
    ColumnType::from_keyword(s).ok_or_else(|| {
        LigolwError::syntax(format!("unknown data type \"{}\"", s), line, column)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== ColumnType keyword tests ====================

    #[test]
    fn test_from_keyword_canonical() {
        assert_eq!(ColumnType::from_keyword("int_4s"), Some(ColumnType::Int4S));
        assert_eq!(ColumnType::from_keyword("real_8"), Some(ColumnType::Real8));
        assert_eq!(
            ColumnType::from_keyword("ilwd:char_u"),
            Some(ColumnType::IlwdCharU)
        );
        assert_eq!(ColumnType::from_keyword("blob"), Some(ColumnType::Blob));
        assert_eq!(
            ColumnType::from_keyword("complex_16"),
            Some(ColumnType::Complex16)
        );
    }

    #[test]
    fn test_from_keyword_aliases() {
        assert_eq!(ColumnType::from_keyword("int"), Some(ColumnType::Int4S));
        assert_eq!(ColumnType::from_keyword("short"), Some(ColumnType::Int2S));
        assert_eq!(ColumnType::from_keyword("long"), Some(ColumnType::Int8S));
        assert_eq!(ColumnType::from_keyword("float"), Some(ColumnType::Real4));
        assert_eq!(ColumnType::from_keyword("double"), Some(ColumnType::Real8));
        assert_eq!(ColumnType::from_keyword("string"), Some(ColumnType::Lstring));
        assert_eq!(ColumnType::from_keyword("char"), Some(ColumnType::IlwdChar));
    }

    #[test]
    fn test_from_keyword_case_insensitive() {
        assert_eq!(ColumnType::from_keyword("INT_4S"), Some(ColumnType::Int4S));
        assert_eq!(ColumnType::from_keyword("Lstring"), Some(ColumnType::Lstring));
        assert_eq!(ColumnType::from_keyword("REAL_8"), Some(ColumnType::Real8));
    }

    #[test]
    fn test_from_keyword_unknown() {
        assert_eq!(ColumnType::from_keyword("integer"), None);
        assert_eq!(ColumnType::from_keyword(""), None);
        assert_eq!(ColumnType::from_keyword("gps"), None);
    }

    #[test]
    fn test_keyword_roundtrip() {
        for (ty, names) in &TYPE_NAMES {
            assert_eq!(ty.keyword(), names[0]);
            assert_eq!(ColumnType::from_keyword(ty.keyword()), Some(*ty));
        }
    }

    #[test]
    fn test_type_classes() {
        assert!(ColumnType::Lstring.is_text());
        assert!(ColumnType::IlwdChar.is_text());
        assert!(ColumnType::CharS.is_text());
        assert!(ColumnType::CharV.is_text());
        assert!(!ColumnType::Blob.is_text());

        assert!(ColumnType::Blob.is_binary());
        assert!(ColumnType::IlwdCharU.is_binary());
        assert!(!ColumnType::Lstring.is_binary());
        assert!(!ColumnType::Int4S.is_binary());
    }

    // ==================== Value tests ====================

    #[test]
    fn test_zero_matches_type_class() {
        assert_eq!(Value::zero(ColumnType::Int4S), Value::Int4S(0));
        assert_eq!(Value::zero(ColumnType::Real8), Value::Real8(0.0));
        assert_eq!(
            Value::zero(ColumnType::Complex8),
            Value::Complex8(0.0, 0.0)
        );
        assert_eq!(
            Value::zero(ColumnType::CharV),
            Value::Lstring(String::new())
        );
        assert_eq!(Value::zero(ColumnType::IlwdCharU), Value::Blob(Vec::new()));
    }

    #[test]
    fn test_value_as_str() {
        assert_eq!(Value::Lstring("hi".into()).as_str(), Some("hi"));
        assert_eq!(Value::Int4S(1).as_str(), None);
    }

    #[test]
    fn test_value_as_bytes() {
        assert_eq!(Value::Blob(vec![1, 2]).as_bytes(), Some(&[1u8, 2][..]));
        assert_eq!(Value::Lstring("x".into()).as_bytes(), None);
    }

    // ==================== Cell tests ====================

    #[test]
    fn test_cell_null() {
        let cell = Cell::null(ColumnType::Int8U);
        assert!(cell.is_null());
        assert_eq!(cell.value, Value::Int8U(0));
    }

    #[test]
    fn test_cell_new_is_valid() {
        let cell = Cell::new(Value::Real4(1.5));
        assert!(!cell.is_null());
        assert!(cell.valid);
    }

    #[test]
    fn test_column_type_from_keyword_error() {
        let err = column_type_from_keyword("bogus", 3, 4).unwrap_err();
        assert_eq!(err.kind, crate::LigolwErrorKind::Syntax);
        assert!(err.message.contains("unknown data type"));
        assert_eq!(err.line, 3);
    }
}
