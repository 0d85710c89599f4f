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

//! Tokenizer for the LIGO_LW document grammar.
//!
//! The grammar has a small closed token set: the tag keywords, the
//! attribute keywords `Name`/`Type`/`Delimiter`, the punctuation `>`,
//! `=`, `/`, end-of-file, and a catch-all [`Token::Unknown`] for
//! everything else. Attribute values and row content are never tokenized
//! as keywords; the grammar layer reads them straight off the byte
//! stream.

use crate::error::{LigolwError, LigolwResult};
use crate::lex::source::ByteReader;

/// A grammar token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    CloseColumn,
    CloseComment,
    CloseLigoLw,
    CloseStream,
    CloseTable,
    Column,
    Comment,
    Delimiter,
    LigoLw,
    Name,
    Stream,
    Table,
    Type,
    Greater,
    Equals,
    Slash,
    /// Anything that is not one of the keywords above.
    Unknown,
    EndOfFile,
}

/// Keyword spellings, matched case-sensitively against accumulated token
/// text. Tag keywords include the leading `<` or `</`.
static KEYWORDS: [(&str, Token); 13] = [
    ("</Column", Token::CloseColumn),
    ("</Comment", Token::CloseComment),
    ("</LIGO_LW", Token::CloseLigoLw),
    ("</Stream", Token::CloseStream),
    ("</Table", Token::CloseTable),
    ("<Column", Token::Column),
    ("<Comment", Token::Comment),
    ("Delimiter", Token::Delimiter),
    ("<LIGO_LW", Token::LigoLw),
    ("Name", Token::Name),
    ("<Stream", Token::Stream),
    ("<Table", Token::Table),
    ("Type", Token::Type),
];

impl Token {
    /// The token's spelling, for error messages.
    pub fn text(self) -> &'static str {
        match self {
            Self::Greater => ">",
            Self::Equals => "=",
            Self::Slash => "/",
            Self::Unknown => "UNKNOWN",
            Self::EndOfFile => "END_OF_FILE",
            keyword => {
                for (text, token) in &KEYWORDS {
                    if *token == keyword {
                        return text;
                    }
                }
                unreachable!("keyword without spelling")
            }
        }
    }
}

/// Returns true if `b` is a valid token character: alphanumerics, `_`
/// and `:`.
pub fn is_token_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b':'
}

fn match_keyword(text: &[u8]) -> Token {
    for (keyword, token) in &KEYWORDS {
        if keyword.as_bytes() == text {
            return *token;
        }
    }
    Token::Unknown
}

/// Accumulate token characters into `buf` until a non-token byte is
/// found, which is pushed back.
fn read_token_string(src: &mut ByteReader, buf: &mut Vec<u8>) -> LigolwResult<()> {
    while let Some(b) = src.next_byte()? {
        if is_token_char(b) {
            buf.push(b);
        } else {
            src.unget(b);
            break;
        }
    }
    Ok(())
}

/// Read the next token, leaving its text in `buf`.
///
/// Whitespace is skipped first. A `<` pulls in the following token
/// characters to form a tag keyword; bare token characters form either an
/// attribute keyword or [`Token::Unknown`].
pub fn next_token(src: &mut ByteReader, buf: &mut Vec<u8>) -> LigolwResult<Token> {
    buf.clear();
    let b = match src.skip_whitespace()? {
        Some(b) => b,
        None => return Ok(Token::EndOfFile),
    };
    buf.push(b);
    match b {
        b'<' => {
            let b = src.skip_whitespace()?.ok_or_else(|| {
                LigolwError::syntax(
                    "failure reading tag: premature EOF",
                    src.line(),
                    src.column(),
                )
            })?;
            buf.push(b);
            read_token_string(src, buf)?;
            Ok(match_keyword(buf))
        }
        b'>' => Ok(Token::Greater),
        b'=' => Ok(Token::Equals),
        b'/' => Ok(Token::Slash),
        _ => {
            read_token_string(src, buf)?;
            Ok(match_keyword(buf))
        }
    }
}
