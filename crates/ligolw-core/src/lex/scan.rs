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

//! Value scanners for stream content and attribute values.
//!
//! Each row-element scanner follows the same contract: it peeks past
//! leading whitespace, returns `Ok(None)` without consuming anything
//! meaningful when the element is absent (next byte is the delimiter or
//! `<`), and otherwise consumes exactly the element's bytes, leaving the
//! terminating delimiter or `<` unconsumed for the caller.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::{LigolwError, LigolwResult};
use crate::lex::source::ByteReader;
use crate::value::{ColumnType, Value};

const ESCAPE: u8 = b'\\';

/// Recognized character entities and their decodings.
static ENTITIES: [(&[u8], u8); 6] = [
    (b"&gt;", b'>'),
    (b"&lt;", b'<'),
    (b"&amp;", b'&'),
    (b"&quot;", b'"'),
    (b"&apos;", b'\''),
    (b"&nbsp;", b' '),
];

/// Decode one `&name;` sequence, or `None` if it is not recognized.
fn character_entity(s: &[u8]) -> Option<u8> {
    ENTITIES
        .iter()
        .find(|(name, _)| *name == s)
        .map(|(_, decoded)| *decoded)
}

fn premature_eof(src: &ByteReader, what: &str) -> LigolwError {
    LigolwError::syntax(
        format!("failure reading {what}: premature end of file"),
        src.line(),
        src.column(),
    )
}

fn push_bounded(
    buf: &mut Vec<u8>,
    byte: u8,
    max: usize,
    src: &ByteReader,
) -> LigolwResult<()> {
    if buf.len() >= max {
        return Err(LigolwError::limit(
            "value exceeds maximum size",
            src.line(),
            src.column(),
        ));
    }
    buf.push(byte);
    Ok(())
}

/// Scan escaped text up to an unconsumed terminator.
///
/// Reading stops, without consuming the stopping byte, at an unescaped
/// `terminator` or at `<`. A backslash escapes the backslash itself, the
/// delimiter, and the terminator; any other escape is an error. `&name;`
/// entities are decoded in place. A decoded byte is not re-examined as
/// a terminator except for `&quot;` text terminated by a `"` quote,
/// where the decoded quote ends the text.
pub(crate) fn scan_text(
    src: &mut ByteReader,
    terminator: Option<u8>,
    delimiter: Option<u8>,
    max: usize,
) -> LigolwResult<Vec<u8>> {
    let mut buf = Vec::new();
    let mut in_entity = false;
    let mut entity_start = 0usize;
    let mut is_escaped = false;

    loop {
        let mut c = match src.next_byte()? {
            Some(c) => c,
            None => return Err(premature_eof(src, "text")),
        };
        if c == b'<' {
            src.unget(c);
            break;
        }
        if c == b'&' && !in_entity {
            in_entity = true;
            entity_start = buf.len();
        }
        if c == b';' && in_entity {
            in_entity = false;
            push_bounded(&mut buf, b';', max, src)?;
            match character_entity(&buf[entity_start..]) {
                Some(decoded) => {
                    buf.truncate(entity_start);
                    c = decoded;
                }
                None => {
                    let entity = String::from_utf8_lossy(&buf[entity_start..]).into_owned();
                    return Err(LigolwError::syntax(
                        format!("unrecognized character entity \"{entity}\""),
                        src.line(),
                        src.column(),
                    ));
                }
            }
        }
        if Some(c) == terminator && !is_escaped {
            src.unget(c);
            break;
        }
        if is_escaped && !in_entity {
            let escapable = c == ESCAPE || Some(c) == delimiter || Some(c) == terminator;
            if !escapable {
                return Err(LigolwError::syntax(
                    format!("unrecognized escape sequence \"\\{}\"", c as char),
                    src.line(),
                    src.column(),
                ));
            }
            buf.pop();
            push_bounded(&mut buf, c, max, src)?;
        } else {
            push_bounded(&mut buf, c, max, src)?;
        }
        is_escaped = if is_escaped { in_entity } else { c == ESCAPE };
    }
    Ok(buf)
}

fn into_string(bytes: Vec<u8>, src: &ByteReader) -> LigolwResult<String> {
    String::from_utf8(bytes)
        .map_err(|_| LigolwError::syntax("value is not valid UTF-8", src.line(), src.column()))
}

/// Read a quoted attribute value, consuming both quotes.
///
/// The value may be delimited by `"` or `'`. A missing opening quote is
/// an error and leaves the offending byte unconsumed.
pub(crate) fn read_attribute_value(
    src: &mut ByteReader,
    delimiter: Option<u8>,
    max: usize,
) -> LigolwResult<String> {
    let quote = match src.skip_whitespace()? {
        Some(c @ (b'"' | b'\'')) => c,
        Some(c) => {
            src.unget(c);
            return Err(LigolwError::syntax(
                "missing quote when reading attribute value",
                src.line(),
                src.column(),
            ));
        }
        None => return Err(premature_eof(src, "attribute value")),
    };
    let text = scan_text(src, Some(quote), delimiter, max)?;
    match src.next_byte()? {
        Some(c) if c == quote => {}
        _ => {
            return Err(LigolwError::syntax(
                "unmatched quote when reading attribute value",
                src.line(),
                src.column(),
            ))
        }
    }
    into_string(text, src)
}

/// After a quoted element, require the next significant byte to be the
/// delimiter or `<`, and leave it unconsumed.
fn require_element_end(src: &mut ByteReader, delimiter: u8, what: &str) -> LigolwResult<()> {
    match src.skip_whitespace()? {
        Some(c) if c == delimiter || c == b'<' => {
            src.unget(c);
            Ok(())
        }
        Some(_) => Err(LigolwError::syntax(
            format!("text following quote when reading {what}"),
            src.line(),
            src.column(),
        )),
        None => Err(premature_eof(src, what)),
    }
}

/// Scan one quoted string element, or `None` for an absent element.
pub(crate) fn scan_lstring(
    src: &mut ByteReader,
    delimiter: u8,
    max: usize,
) -> LigolwResult<Option<String>> {
    let c = match src.skip_whitespace()? {
        Some(c) => c,
        None => return Err(premature_eof(src, "string")),
    };
    match c {
        b'"' | b'\'' => {
            let quote = c;
            let text = scan_text(src, Some(quote), Some(delimiter), max)?;
            match src.next_byte()? {
                Some(b) if b == quote => {}
                _ => {
                    return Err(LigolwError::syntax(
                        "unmatched quote when reading string",
                        src.line(),
                        src.column(),
                    ))
                }
            }
            require_element_end(src, delimiter, "string")?;
            Ok(Some(into_string(text, src)?))
        }
        _ if c == delimiter || c == b'<' => {
            src.unget(c);
            Ok(None)
        }
        _ => {
            src.unget(c);
            Err(LigolwError::syntax(
                "missing quote when reading string",
                src.line(),
                src.column(),
            ))
        }
    }
}

/// Scan one base64 blob element, or `None` for an absent element.
pub(crate) fn scan_blob(
    src: &mut ByteReader,
    delimiter: u8,
    max: usize,
) -> LigolwResult<Option<Vec<u8>>> {
    let c = match src.skip_whitespace()? {
        Some(c) => c,
        None => return Err(premature_eof(src, "blob")),
    };
    match c {
        b'"' | b'\'' => {
            let quote = c;
            let mut encoded = Vec::new();
            loop {
                match src.next_byte()? {
                    Some(b) if b == quote => break,
                    Some(b'<') => {
                        src.unget(b'<');
                        return Err(LigolwError::syntax(
                            "unmatched quote when reading blob",
                            src.line(),
                            src.column(),
                        ));
                    }
                    Some(b) => {
                        if !b.is_ascii_whitespace() {
                            push_bounded(&mut encoded, b, max, src)?;
                        }
                    }
                    None => return Err(premature_eof(src, "blob")),
                }
            }
            require_element_end(src, delimiter, "blob")?;
            let decoded = STANDARD.decode(&encoded).map_err(|_| {
                LigolwError::syntax(
                    "failure decoding base64 blob",
                    src.line(),
                    src.column(),
                )
            })?;
            Ok(Some(decoded))
        }
        _ if c == delimiter || c == b'<' => {
            src.unget(c);
            Ok(None)
        }
        _ => {
            src.unget(c);
            Err(LigolwError::syntax(
                "missing quote when reading blob",
                src.line(),
                src.column(),
            ))
        }
    }
}

/// Scan one `ilwd:char_u` binary element, or `None` for an absent
/// element.
///
/// The payload is whitespace-insensitive: bytes come from `\NNN` octal
/// escapes, single backslash-escaped literals (backslash, delimiter,
/// space), `&name;` entities, and raw bytes. The payload proper ends at
/// the last `"` byte read before the delimiter or `<`; everything from
/// that quote on is discarded.
pub(crate) fn scan_ilwd_char_u(
    src: &mut ByteReader,
    delimiter: u8,
    max: usize,
) -> LigolwResult<Option<Vec<u8>>> {
    let c = match src.skip_whitespace()? {
        Some(c) => c,
        None => return Err(premature_eof(src, "ilwd:char_u")),
    };
    if c == delimiter || c == b'<' {
        src.unget(c);
        return Ok(None);
    }
    if c != b'"' {
        src.unget(c);
        return Err(LigolwError::syntax(
            "missing quote when reading ilwd:char_u",
            src.line(),
            src.column(),
        ));
    }

    let mut buf = Vec::new();
    loop {
        let c = match src.skip_whitespace()? {
            Some(c) => c,
            None => return Err(premature_eof(src, "ilwd:char_u")),
        };
        if c == delimiter || c == b'<' {
            src.unget(c);
            break;
        }
        let byte = match c {
            b'&' => {
                let mut entity = vec![b'&'];
                loop {
                    match src.next_byte()? {
                        Some(b';') => {
                            entity.push(b';');
                            break;
                        }
                        Some(b) if entity.len() < 7 => entity.push(b),
                        Some(_) | None => {
                            let entity = String::from_utf8_lossy(&entity).into_owned();
                            return Err(LigolwError::syntax(
                                format!("unrecognized character entity \"{entity}\""),
                                src.line(),
                                src.column(),
                            ));
                        }
                    }
                }
                match character_entity(&entity) {
                    Some(decoded) => decoded,
                    None => {
                        let entity = String::from_utf8_lossy(&entity).into_owned();
                        return Err(LigolwError::syntax(
                            format!("unrecognized character entity \"{entity}\""),
                            src.line(),
                            src.column(),
                        ));
                    }
                }
            }
            ESCAPE => {
                let next = match src.next_byte()? {
                    Some(b) => b,
                    None => return Err(premature_eof(src, "ilwd:char_u")),
                };
                if next.is_ascii_digit() {
                    src.unget(next);
                    scan_octal_escape(src)?
                } else if next == delimiter || next == ESCAPE || next == b' ' {
                    next
                } else {
                    return Err(LigolwError::syntax(
                        format!("invalid escape sequence \"\\{}\"", next as char),
                        src.line(),
                        src.column(),
                    ));
                }
            }
            other => other,
        };
        push_bounded(&mut buf, byte, max, src)?;
    }

    // The payload ends at the last quote byte read; trailing quote bytes
    // decoded from escapes are treated the same as literal quotes.
    match buf.iter().rposition(|&b| b == b'"') {
        Some(i) => {
            buf.truncate(i);
            Ok(Some(buf))
        }
        None => Err(LigolwError::syntax(
            "unmatched quote when reading ilwd:char_u",
            src.line(),
            src.column(),
        )),
    }
}

/// Read up to three octal digits after a `\` and return the byte.
fn scan_octal_escape(src: &mut ByteReader) -> LigolwResult<u8> {
    let mut value: u32 = 0;
    let mut digits = 0usize;
    while digits < 3 {
        match src.next_byte()? {
            Some(b @ b'0'..=b'7') => {
                value = value * 8 + u32::from(b - b'0');
                digits += 1;
            }
            Some(b) => {
                src.unget(b);
                break;
            }
            None => break,
        }
    }
    if digits == 0 {
        return Err(LigolwError::syntax(
            "failure parsing octal code",
            src.line(),
            src.column(),
        ));
    }
    u8::try_from(value).map_err(|_| {
        LigolwError::syntax(
            format!("octal escape \\{value:o} out of range"),
            src.line(),
            src.column(),
        )
    })
}

fn is_numeric_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'+' || b == b'-' || b == b'.'
}

fn numeric_parse_error(field: &str, src: &ByteReader) -> LigolwError {
    LigolwError::syntax(
        format!("failure parsing numeric value \"{field}\""),
        src.line(),
        src.column(),
    )
}

/// Scan one numeric element of the given type, or `None` for an absent
/// element.
///
/// Complex values are written as `re+iim` (e.g. `1.5+i-2`); the real
/// and imaginary fields each parse as an ordinary float.
pub(crate) fn scan_numeric(
    src: &mut ByteReader,
    ty: ColumnType,
    delimiter: u8,
) -> LigolwResult<Option<Value>> {
    let c = match src.skip_whitespace()? {
        Some(c) => c,
        None => return Err(premature_eof(src, "number")),
    };
    if c == delimiter || c == b'<' {
        src.unget(c);
        return Ok(None);
    }
    src.unget(c);

    let mut field = Vec::new();
    loop {
        match src.next_byte()? {
            Some(b) if b != delimiter && b != b'<' && is_numeric_byte(b) => field.push(b),
            Some(b) => {
                src.unget(b);
                break;
            }
            None => break,
        }
    }
    let field = match std::str::from_utf8(&field) {
        Ok(s) => s,
        Err(_) => return Err(numeric_parse_error(&String::from_utf8_lossy(&field), src)),
    };

    let value = match ty {
        ColumnType::Int2S => Value::Int2S(parse_field(field, src)?),
        ColumnType::Int2U => Value::Int2U(parse_field(field, src)?),
        ColumnType::Int4S => Value::Int4S(parse_field(field, src)?),
        ColumnType::Int4U => Value::Int4U(parse_field(field, src)?),
        ColumnType::Int8S => Value::Int8S(parse_field(field, src)?),
        ColumnType::Int8U => Value::Int8U(parse_field(field, src)?),
        ColumnType::Real4 => Value::Real4(parse_field(field, src)?),
        ColumnType::Real8 => Value::Real8(parse_field(field, src)?),
        ColumnType::Complex8 => {
            let (re, im) = split_complex(field, src)?;
            Value::Complex8(parse_field(re, src)?, parse_field(im, src)?)
        }
        ColumnType::Complex16 => {
            let (re, im) = split_complex(field, src)?;
            Value::Complex16(parse_field(re, src)?, parse_field(im, src)?)
        }
        _ => {
            return Err(LigolwError::semantic(
                format!("column type {ty} is not numeric"),
                src.line(),
                src.column(),
            ))
        }
    };
    Ok(Some(value))
}

fn parse_field<T: std::str::FromStr>(field: &str, src: &ByteReader) -> LigolwResult<T> {
    field
        .parse()
        .map_err(|_| numeric_parse_error(field, src))
}

fn split_complex<'a>(field: &'a str, src: &ByteReader) -> LigolwResult<(&'a str, &'a str)> {
    field
        .split_once("+i")
        .ok_or_else(|| numeric_parse_error(field, src))
}
