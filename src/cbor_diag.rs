/***************************************************************************************************
 * Copyright (c) 2021-2023 Qualcomm Innovation Center, Inc. All rights reserved.
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of this software
 * and associated documentation files (the “Software”), to deal in the Software without
 * restriction, including without limitation the rights to use, copy, modify, merge, publish,
 * distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all copies or
 * substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
 * BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
 * DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 **************************************************************************************************/
/***************************************************************************************************
 * CBOR Diagnostic Notation
 *
 * CBOR diagnostic notation is defined in RFC8949 (section 8) and extended slightly in RFC8610.
 * While it was expressly designed for CBOR, it is sufficiently expressive that it is
 * appropriate for many TLV-style binary representations.
 **************************************************************************************************/
/// # Diagnostic output
///
/// This module renders a decoded (or hand-built) document in diagnostic notation, which is the
/// format used for examples throughout RFC8949 and in CDDL specifications.
///
/// ## Format recap
///
/// - uint, int and float types are formatted in their natural programming language formats.
/// - -Infinity, Infinity and NaN are written as you might expect.
/// - true, false and null mean what you would expect.
/// - Strings are written "as a string" in double quotes.
/// - Byte strings are written as h'0123456789abcdef'.
/// - Arrays and maps are bracketed as in JSON.
use crate::ast::Value;

use std::fmt;
use std::fmt::{Display, Formatter};

/// Render one byte as a pair of lower case hex digits.
pub fn print_hex(byte: u8) -> String {
    format!("{:02x}", byte)
}

/// Adapter which displays a borrowed [`Value`] in CBOR diagnostic notation.
///
/// ## Example
/// ```
/// use rs_treecbor::debug::Diag;
/// use rs_treecbor::types::Value;
///
/// let doc = Value::Array(vec![Value::UInt(1), Value::from("a")]);
/// assert_eq!(Diag(&doc).to_string(), r#"[1, "a"]"#);
/// ```
#[derive(Debug, Copy, Clone)]
pub struct Diag<'a>(pub &'a Value);

impl<'a> Display for Diag<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        diag_value(self.0, f)
    }
}

impl Value {
    /// Borrow this value as a [`Diag`], for formatting in diagnostic notation.
    pub fn diag(&self) -> Diag<'_> {
        Diag(self)
    }
}

fn diag_value(value: &Value, f: &mut Formatter<'_>) -> fmt::Result {
    match value {
        Value::Null => f.write_str("null"),
        Value::Bool(false) => f.write_str("false"),
        Value::Bool(true) => f.write_str("true"),
        Value::UInt(v) => write!(f, "{}", v),
        Value::Int(v) => write!(f, "{}", v),
        Value::Float64(v) => diag_f64(*v, f),
        Value::Bstr(bytes) => diag_bstr(bytes, f),
        Value::Tstr(s) => diag_tstr(s, f),
        Value::Array(items) => diag_array(items, f),
        Value::Map(entries) => diag_map(entries, f),
    }
}

fn diag_f64(v: f64, f: &mut Formatter<'_>) -> fmt::Result {
    if v.is_nan() {
        f.write_str("NaN")
    } else if v.is_infinite() {
        if v.is_sign_positive() {
            f.write_str("Infinity")
        } else {
            f.write_str("-Infinity")
        }
    } else {
        // The Debug form keeps a trailing ".0" on integral values, which diagnostic notation
        // needs to keep floats apart from integers
        write!(f, "{:?}", v)
    }
}

fn diag_bstr(bytes: &[u8], f: &mut Formatter<'_>) -> fmt::Result {
    f.write_str("h'")?;
    for byte in bytes {
        f.write_str(&print_hex(*byte))?;
    }
    f.write_str("'")
}

fn diag_tstr(s: &str, f: &mut Formatter<'_>) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            c if (c as u32) < 0x20 => write!(f, "\\u{:04x}", c as u32)?,
            c => write!(f, "{}", c)?,
        }
    }
    f.write_str("\"")
}

fn diag_array(items: &[Value], f: &mut Formatter<'_>) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        diag_value(item, f)?;
    }
    f.write_str("]")
}

fn diag_map(entries: &[(String, Value)], f: &mut Formatter<'_>) -> fmt::Result {
    f.write_str("{")?;
    for (i, (key, value)) in entries.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        diag_tstr(key, f)?;
        f.write_str(": ")?;
        diag_value(value, f)?;
    }
    f.write_str("}")
}
