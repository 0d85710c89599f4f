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

//! Cross-type cell comparison.
//!
//! Cells are compared after canonicalizing to the widest representation
//! of their family, so an `INT_2S` 5 equals an `INT_8S` 5 and a `REAL_4`
//! compares against a `REAL_8` in `f64`. Cells from different families
//! (e.g. a string against an integer, or a blob against a string) are
//! [`ElementOrder::Incomparable`].

use std::cmp::Ordering;

use crate::value::{Cell, Value};

/// Outcome of comparing two cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementOrder {
    Less,
    Equal,
    Greater,
    /// The cells belong to families with no defined ordering.
    Incomparable,
}

/// Widened comparison form of a cell value.
enum Canonical<'a> {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Complex(f64, f64),
    Text(&'a [u8]),
    Blob(&'a [u8]),
}

fn canonicalize(value: &Value) -> Canonical<'_> {
    match value {
        Value::Int2S(v) => Canonical::Signed(i64::from(*v)),
        Value::Int4S(v) => Canonical::Signed(i64::from(*v)),
        Value::Int8S(v) => Canonical::Signed(*v),
        Value::Int2U(v) => Canonical::Unsigned(u64::from(*v)),
        Value::Int4U(v) => Canonical::Unsigned(u64::from(*v)),
        Value::Int8U(v) => Canonical::Unsigned(*v),
        Value::Real4(v) => Canonical::Float(f64::from(*v)),
        Value::Real8(v) => Canonical::Float(*v),
        Value::Complex8(re, im) => Canonical::Complex(f64::from(*re), f64::from(*im)),
        Value::Complex16(re, im) => Canonical::Complex(*re, *im),
        Value::Lstring(s) => Canonical::Text(s.as_bytes()),
        Value::Blob(b) => Canonical::Blob(b),
    }
}

fn from_ordering(ord: Ordering) -> ElementOrder {
    match ord {
        Ordering::Less => ElementOrder::Less,
        Ordering::Equal => ElementOrder::Equal,
        Ordering::Greater => ElementOrder::Greater,
    }
}

/// Compare two cells, nulls first.
///
/// A null cell sorts before any non-null cell; two nulls are equal.
/// Floats follow IEEE comparison, so a NaN that is neither less than nor
/// greater than its peer reports [`ElementOrder::Equal`]. Complex values
/// have no total order: unequal complex cells report
/// [`ElementOrder::Less`] regardless of operand order.
pub fn compare_cells(a: &Cell, b: &Cell) -> ElementOrder {
    match (a.valid, b.valid) {
        (false, false) => return ElementOrder::Equal,
        (false, true) => return ElementOrder::Less,
        (true, false) => return ElementOrder::Greater,
        (true, true) => {}
    }

    match (canonicalize(&a.value), canonicalize(&b.value)) {
        (Canonical::Signed(x), Canonical::Signed(y)) => from_ordering(x.cmp(&y)),
        (Canonical::Unsigned(x), Canonical::Unsigned(y)) => from_ordering(x.cmp(&y)),
        (Canonical::Float(x), Canonical::Float(y)) => {
            if x > y {
                ElementOrder::Greater
            } else if x < y {
                ElementOrder::Less
            } else {
                ElementOrder::Equal
            }
        }
        (Canonical::Complex(xr, xi), Canonical::Complex(yr, yi)) => {
            if xr == yr && xi == yi {
                ElementOrder::Equal
            } else {
                ElementOrder::Less
            }
        }
        (Canonical::Text(x), Canonical::Text(y)) => from_ordering(x.cmp(y)),
        (Canonical::Blob(x), Canonical::Blob(y)) => from_ordering(x.cmp(y)),
        _ => ElementOrder::Incomparable,
    }
}
