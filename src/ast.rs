/***************************************************************************************************
 * Copyright (c) 2020-2023 Qualcomm Innovation Center, Inc. All rights reserved.
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
 * rs_treecbor Document Tree
 *
 * A CBOR (RFC7049/RFC8949) serializer and deserializer over an owned, JSON-like document tree.
 **************************************************************************************************/
use crate::error::{CBORError, Result};

/// The data type for CBOR documents. A `Value` owns its entire subtree, so dropping a parent
/// destroys every descendant, and a tree can be handed between threads freely.
///
/// Value representations are as follows:
///
/// - Positive integers decoded from Major Type 0 are stored as `UInt`. Integers decoded from
///   Major Type 1 are stored as `Int`, which is always representable because values below
///   `i64::MIN` are rejected while decoding. The distinction is kept both ways: a non-negative
///   `Int` still serializes on Major Type 0, so re-encoding is stable, but it decodes as `UInt`.
/// - The `tstr` type is held as an owned `String`, which makes ill-formed UTF-8 text
///   unrepresentable. Fallible construction from raw bytes goes through
///   [`Value::try_tstr_from_bytes`].
/// - Floats are held as `f64` only. Half and single precision values widen on decode and the
///   encoder emits the 8 byte form.
/// - Maps are a sequence of `(key, value)` pairs in insertion order. Key order is never
///   disturbed and duplicate keys are permitted.
#[derive(PartialEq, Debug, Clone)]
pub enum Value {
    /// The null value.
    Null,
    /// `true` or `false`.
    Bool(bool),
    /// An integer decoded from (or destined for) Major Type 0.
    UInt(u64),
    /// A signed integer. Negative values serialize on Major Type 1.
    Int(i64),
    /// An IEEE-754 binary64 value. NaN and the infinities are allowed.
    Float64(f64),
    /// A byte string.
    Bstr(Vec<u8>),
    /// A UTF-8 text string.
    Tstr(String),
    /// An ordered sequence of values.
    Array(Vec<Value>),
    /// An ordered sequence of `(key, value)` pairs.
    Map(Vec<(String, Value)>),
}

impl Value {
    /// Construct a `Tstr` from raw bytes, validating that they are well-formed UTF-8.
    ///
    /// Fails with [`CBORError::BadUtf8`] carrying the offset within `bytes` at which the first
    /// invalid sequence starts.
    pub fn try_tstr_from_bytes(bytes: Vec<u8>) -> Result<Value> {
        match String::from_utf8(bytes) {
            Ok(s) => Ok(Value::Tstr(s)),
            Err(e) => Err(CBORError::BadUtf8(e.utf8_error().valid_up_to())),
        }
    }

    /// Append an item to an `Array` value, preserving order.
    ///
    /// Panics if `self` is not an `Array`. Callers are expected to have dispatched on the
    /// variant already.
    pub fn push(&mut self, item: Value) {
        match self {
            Value::Array(items) => items.push(item),
            _ => panic!("push on a value which is not an array"),
        }
    }

    /// Append a `(key, value)` entry to a `Map` value, preserving insertion order. An entry
    /// with a duplicate key is kept alongside the earlier one.
    ///
    /// Panics if `self` is not a `Map`. Callers are expected to have dispatched on the
    /// variant already.
    pub fn insert<K: Into<String>>(&mut self, key: K, value: Value) {
        match self {
            Value::Map(entries) => entries.push((key.into(), value)),
            _ => panic!("insert on a value which is not a map"),
        }
    }

    /// Return `true` if this value is `Null`.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Return the payload of a `Bool`, if this value is one.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Return the payload of a `UInt`, if this value is one.
    #[inline]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::UInt(v) => Some(*v),
            _ => None,
        }
    }

    /// Return this value as an `i64` if it is an integer of either signedness which fits.
    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::UInt(v) if *v <= i64::MAX as u64 => Some(*v as i64),
            _ => None,
        }
    }

    /// Return the payload of a `Float64`, if this value is one.
    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// Return the payload of a `Tstr`, if this value is one.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Tstr(s) => Some(s),
            _ => None,
        }
    }

    /// Return the payload of a `Bstr`, if this value is one.
    #[inline]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bstr(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Return the items of an `Array`, if this value is one.
    #[inline]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Return the entries of a `Map`, if this value is one.
    #[inline]
    pub fn as_map(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }
}

/***************************************************************************************************
 * Standard Trait Implementations: From value to Value. Always succeeds
 **************************************************************************************************/

/// Convert a bool into Value
impl From<bool> for Value {
    #[inline(always)]
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

/// Convert a u8 into Value
impl From<u8> for Value {
    #[inline(always)]
    fn from(v: u8) -> Self {
        Self::UInt(v as u64)
    }
}

/// Convert a u16 into Value
impl From<u16> for Value {
    #[inline(always)]
    fn from(v: u16) -> Self {
        Self::UInt(v as u64)
    }
}

/// Convert a u32 into Value
impl From<u32> for Value {
    #[inline(always)]
    fn from(v: u32) -> Self {
        Self::UInt(v as u64)
    }
}

/// Convert a u64 into Value
impl From<u64> for Value {
    #[inline(always)]
    fn from(v: u64) -> Self {
        Self::UInt(v)
    }
}

/// Convert an i8 into Value
impl From<i8> for Value {
    #[inline(always)]
    fn from(v: i8) -> Self {
        Self::Int(v as i64)
    }
}

/// Convert an i16 into Value
impl From<i16> for Value {
    #[inline(always)]
    fn from(v: i16) -> Self {
        Self::Int(v as i64)
    }
}

/// Convert an i32 into Value
impl From<i32> for Value {
    #[inline(always)]
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

/// Convert an i64 into Value
impl From<i64> for Value {
    #[inline(always)]
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

/// Convert an f64 into Value
impl From<f64> for Value {
    #[inline(always)]
    fn from(v: f64) -> Self {
        Self::Float64(v)
    }
}

/// Convert a borrowed str into Value
impl From<&str> for Value {
    #[inline]
    fn from(v: &str) -> Self {
        Self::Tstr(v.to_string())
    }
}

/// Convert a String into Value
impl From<String> for Value {
    #[inline(always)]
    fn from(v: String) -> Self {
        Self::Tstr(v)
    }
}

/// Convert a borrowed byte slice into Value
impl From<&[u8]> for Value {
    #[inline]
    fn from(v: &[u8]) -> Self {
        Self::Bstr(v.to_vec())
    }
}

/// Convert a byte vector into Value
impl From<Vec<u8>> for Value {
    #[inline(always)]
    fn from(v: Vec<u8>) -> Self {
        Self::Bstr(v)
    }
}

/// Convert a vector of values into an array Value
impl From<Vec<Value>> for Value {
    #[inline(always)]
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

/// Convert a vector of (key, value) pairs into a map Value
impl From<Vec<(String, Value)>> for Value {
    #[inline(always)]
    fn from(v: Vec<(String, Value)>) -> Self {
        Self::Map(v)
    }
}
