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

//! Resource limits for LIGO_LW parsing.

/// Configurable limits for parser resources.
///
/// These bound the memory consumed while parsing a document. Exceeding a
/// limit raises a [`LigolwErrorKind::Limit`](crate::LigolwErrorKind::Limit)
/// error for the current operation.
#[derive(Debug, Clone)]
pub struct Limits {
    /// Maximum number of columns per table (default: 100).
    pub max_columns: usize,
    /// Maximum size in bytes of a single scanned value, attribute, or
    /// comment (default: 64MB).
    pub max_value_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_columns: 100,
            max_value_bytes: 64 * 1024 * 1024, // 64MB
        }
    }
}

impl Limits {
    /// Create limits with no restrictions (for testing).
    pub fn unlimited() -> Self {
        Self {
            max_columns: usize::MAX,
            max_value_bytes: usize::MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Default limits tests ====================

    #[test]
    fn test_default_max_columns() {
        let limits = Limits::default();
        assert_eq!(limits.max_columns, 100);
    }

    #[test]
    fn test_default_max_value_bytes() {
        let limits = Limits::default();
        assert_eq!(limits.max_value_bytes, 64 * 1024 * 1024); // 64MB
    }

    // ==================== Unlimited tests ====================

    #[test]
    fn test_unlimited() {
        let limits = Limits::unlimited();
        assert_eq!(limits.max_columns, usize::MAX);
        assert_eq!(limits.max_value_bytes, usize::MAX);
    }

    #[test]
    fn test_limits_clone() {
        let limits = Limits {
            max_columns: 7,
            max_value_bytes: 1024,
        };
        let cloned = limits.clone();
        assert_eq!(cloned.max_columns, 7);
        assert_eq!(cloned.max_value_bytes, 1024);
    }
}
