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

//! Column and table name resolution.
//!
//! Column and table names in LIGO_LW files carry colon-delimited
//! namespace prefixes (e.g. `"processgroup:process:program"`), and table
//! names may additionally end in a `:table` suffix. Lookup ignores the
//! prefixes and is case-insensitive throughout.

use crate::document::Table;

/// Resolve a column's display name: everything up to and including the
/// last colon is stripped.
///
/// ```
/// use ligolw_core::resolve_column_name;
/// assert_eq!(resolve_column_name("processgroup:process:program"), "program");
/// assert_eq!(resolve_column_name("program"), "program");
/// ```
pub fn resolve_column_name(name: &str) -> &str {
    match name.rfind(':') {
        Some(i) => &name[i + 1..],
        None => name,
    }
}

/// Find a column by name.
///
/// The comparison is case-insensitive and ignores any colon-delimited
/// prefixes in the declared column name. A miss is a lookup miss, not an
/// error.
pub fn find_column(table: &Table, name: &str) -> Option<usize> {
    table
        .columns
        .iter()
        .position(|col| resolve_column_name(&col.name).eq_ignore_ascii_case(name))
}

/// Test whether a stored table name matches a requested one.
///
/// An empty (or absent) request matches any table. Otherwise the stored
/// name, stripped of an optional trailing `:table` suffix, must end with
/// the requested name as a case-insensitive suffix on a colon boundary:
/// `"row"` matches `"row"`, `"row:table"`, `"x:row"` and `"x:row:table"`,
/// but not `"rowfoo"` or `"foo:rowbar"`.
pub fn table_name_matches(stored: &str, requested: Option<&str>) -> bool {
    let requested = match requested {
        None => return true,
        Some(r) if r.is_empty() => return true,
        Some(r) => r,
    };

    let stored = strip_table_suffix(stored);
    if stored.len() < requested.len() {
        return false;
    }
    let (head, tail) = stored.split_at(stored.len() - requested.len());
    tail.eq_ignore_ascii_case(requested) && (head.is_empty() || head.ends_with(':'))
}

fn strip_table_suffix(name: &str) -> &str {
    const SUFFIX: &str = ":table";
    if name.len() >= SUFFIX.len() {
        let (head, tail) = name.split_at(name.len() - SUFFIX.len());
        if tail.eq_ignore_ascii_case(SUFFIX) {
            return head;
        }
    }
    name
}
