/***************************************************************************************************
 * Copyright (c) 2020-2023 Qualcomm Innovation Center, Inc. All rights reserved.
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of this software
 * and associated documentation files (the “Software”), to deal in the Software without
 * restriction, including without limitation the rights to use, copy, modify, merge, publish,
 * distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice (including the next
 * paragraph) shall be included in all copies or substantial portions of the
 * Software.
 *
 * THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
 * BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
 * DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 **************************************************************************************************/
/***************************************************************************************************
 * CBOR Document Decoder
 *
 * A CBOR (RFC7049/RFC8949) serializer and deserializer over an owned, JSON-like document tree.
 * Decoding is a recursive descent over the input slice, dispatching on the initial byte of
 * each item. Both definite and indefinite length forms are accepted.
 **************************************************************************************************/
/// # CBOR document decoding
///
/// This module contains the decoding half of the codec. CBOR input is parsed from a byte
/// slice; the usual entry point is [`decode`], which parses a single document. Input holding a
/// sequence of top level items (RFC8742) can be walked with a [`SequenceBuffer`], which is
/// constructed over a byte slice and exposes an Iterator API.
///
/// ## Example
///
/// ```
/// use rs_treecbor::decoder::decode;
/// use rs_treecbor::types::Value;
///
/// let doc = decode(&[0x83, 0x01, 0x02, 0x03]).unwrap();
/// assert_eq!(
///     doc,
///     Value::Array(vec![Value::UInt(1), Value::UInt(2), Value::UInt(3)])
/// );
/// ```
use crate::ast::Value;
use crate::constants::*;
use crate::error::{CBORError, Result};

use std::convert::TryFrom;
use std::str::from_utf8;

use half::f16;

#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

/// The nesting depth accepted by [`decode`] before it fails with `TooDeep`. Callers with a
/// different bounded-work policy can pick their own limit through [`decode_with_depth`].
pub const DEFAULT_DEPTH_LIMIT: usize = 1024;

/***************************************************************************************************
 * Public API
 **************************************************************************************************/

/// Parse one CBOR document from the start of `buf`.
///
/// Bytes after the first item are ignored; use a [`SequenceBuffer`] to walk a sequence of top
/// level items. Nesting is bounded by [`DEFAULT_DEPTH_LIMIT`]. On failure no partial document
/// is returned.
#[cfg_attr(feature = "trace", trace)]
pub fn decode(buf: &[u8]) -> Result<Value> {
    decode_with_depth(buf, DEFAULT_DEPTH_LIMIT)
}

/// Parse one CBOR document from the start of `buf`, accepting at most `depth_limit` levels of
/// array/map nesting.
///
/// A scalar item decodes at any limit; each level of containment consumes one unit of the
/// budget, so a limit of zero rejects every container.
#[cfg_attr(feature = "trace", trace)]
pub fn decode_with_depth(buf: &[u8], depth_limit: usize) -> Result<Value> {
    let (_next_index, value) = parse_item(buf, 0, Depth::new(depth_limit))?;
    Ok(value)
}

/***************************************************************************************************
 * CBOR Sequence Buffer definitions
 **************************************************************************************************/

/// A read-only view over a buffer of encoded CBOR. The buffer has lifetime `'buf`, which must
/// be longer than any borrow from the buffer itself, and in particular longer than any
/// iterator walking it.
///
/// This is the borrowing counterpart of [`PackedBuffer`]; parsing always operates on the
/// borrowed slice.
#[derive(Debug, Copy, Clone)]
pub struct SequenceBuffer<'buf> {
    /// Underlying reference to data buffer
    pub bytes: &'buf [u8],
}

impl<'buf> SequenceBuffer<'buf> {
    /// Construct a new instance of `SequenceBuffer` over a byte slice.
    ///
    /// ## Example
    /// ```
    ///# use rs_treecbor::decoder::SequenceBuffer;
    /// let b = [0x18u8, 0x18];
    /// let buf = SequenceBuffer::new(&b);
    /// ```
    #[inline]
    pub fn new(init: &'buf [u8]) -> SequenceBuffer<'buf> {
        SequenceBuffer { bytes: init }
    }
}

impl<'buf> IntoIterator for SequenceBuffer<'buf> {
    type Item = Result<Value>;
    type IntoIter = DecodeBufIterator<'buf>;

    /// Construct an Iterator adapter from a `SequenceBuffer`.
    fn into_iter(self) -> Self::IntoIter {
        DecodeBufIterator {
            buf: self.bytes,
            index: 0,
        }
    }
}

/// Iterator adapter yielding one decoded document per top level item in the underlying
/// buffer. The first failure is yielded once, after which the iterator is exhausted: the rest
/// of a broken stream cannot be framed.
#[derive(Debug, Copy, Clone)]
pub struct DecodeBufIterator<'buf> {
    /// The underlying buffer. A simple wrapper around a reference.
    pub buf: &'buf [u8],
    /// The current position in `buf`.
    pub index: usize,
}

impl<'buf> Iterator for DecodeBufIterator<'buf> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index < self.buf.len() {
            match parse_item(self.buf, self.index, Depth::new(DEFAULT_DEPTH_LIMIT)) {
                Ok((next_index, item)) => {
                    self.index = next_index;
                    Some(Ok(item))
                }
                Err(e) => {
                    self.index = self.buf.len();
                    Some(Err(e))
                }
            }
        } else {
            None
        }
    }
}

/***************************************************************************************************
 * Packed buffer
 **************************************************************************************************/

/// A value owning a buffer of encoded CBOR.
///
/// `PackedBuffer` is the owning counterpart of [`SequenceBuffer`]: it holds the bytes and
/// hands out read-only borrows for parsing, so the owner must outlive any decoder over it. It
/// is the natural holder for encoded documents read from storage or the wire.
///
/// ## Example
///
/// ```
/// use rs_treecbor::decoder::PackedBuffer;
/// use rs_treecbor::types::Value;
///
/// let packed = PackedBuffer::new(vec![0x64, 0x49, 0x45, 0x54, 0x46]);
/// assert_eq!(packed.decode().unwrap(), Value::from("IETF"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackedBuffer {
    bytes: Vec<u8>,
}

impl PackedBuffer {
    /// Take ownership of an encoded buffer.
    #[inline]
    pub fn new(bytes: Vec<u8>) -> PackedBuffer {
        PackedBuffer { bytes }
    }

    /// Borrow the owned bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The length of the owned buffer in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Return `true` if the owned buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Give the owned bytes back.
    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Borrow a [`SequenceBuffer`] view for iterating top level items.
    #[inline]
    pub fn sequence(&self) -> SequenceBuffer<'_> {
        SequenceBuffer::new(&self.bytes)
    }

    /// Parse one document from the owned buffer. See [`decode`].
    pub fn decode(&self) -> Result<Value> {
        decode(&self.bytes)
    }

    /// Parse one document from the owned buffer with a caller-chosen nesting limit. See
    /// [`decode_with_depth`].
    pub fn decode_with_depth(&self, depth_limit: usize) -> Result<Value> {
        decode_with_depth(&self.bytes, depth_limit)
    }
}

impl From<Vec<u8>> for PackedBuffer {
    #[inline]
    fn from(bytes: Vec<u8>) -> PackedBuffer {
        PackedBuffer::new(bytes)
    }
}

/***************************************************************************************************
 * Depth budget
 **************************************************************************************************/

/// Remaining nesting budget, threaded through the recursive descent. `limit` is kept only so
/// that `TooDeep` can report the configured cap.
#[derive(Debug, Copy, Clone)]
struct Depth {
    left: usize,
    limit: usize,
}

impl Depth {
    #[inline]
    fn new(limit: usize) -> Depth {
        Depth { left: limit, limit }
    }

    /// One level of containment down. Fails once the budget is used up.
    #[inline]
    fn descend(self) -> Result<Depth> {
        if self.left == 0 {
            Err(CBORError::TooDeep(self.limit))
        } else {
            Ok(Depth {
                left: self.left - 1,
                limit: self.limit,
            })
        }
    }
}

/***************************************************************************************************
 * CBOR Parser
 **************************************************************************************************/

/// Basic function for parsing a single CBOR Item from `buf` starting at `index`.
///
/// Assuming that all goes well, a pair `(usize, Value)` is returned where the `usize` value is
/// the index in `buf` of the next item - this may be outside the bounds of `buf`, and must be
/// checked before it is used. This function does bounds checking, so it is safe to use a
/// previously returned next item index as an error will be returned if it is out of bounds.
#[cfg_attr(feature = "trace", trace)]
fn parse_item(buf: &[u8], index: usize, depth: Depth) -> Result<(usize, Value)> {
    let mt_ai_byte = peek(buf, index)?;
    match mt_ai_byte {
        // Positive integers
        0x00..=0x1b => {
            let (next_index, val) = parse_unsigned(buf, index)?;
            Ok((next_index, Value::UInt(val)))
        }
        // Negative integers, -1 - n
        0x20..=0x3b => {
            let (next_index, n) = parse_unsigned(buf, index)?;
            if n > i64::MAX as u64 {
                Err(CBORError::Overflow(index))
            } else {
                Ok((next_index, Value::Int(-1 - n as i64)))
            }
        }
        // Byte strings
        0x40..=0x5b => {
            let (next_index, bytes) = parse_bytestring(buf, index)?;
            Ok((next_index, Value::Bstr(bytes.to_vec())))
        }
        // Byte strings, indefinite length
        0x5f => parse_indefinite_bytestring(buf, index),
        // UTF8 strings
        0x60..=0x7b => {
            let (next_index, raw_bytes) = parse_bytestring(buf, index)?;
            let content_index = next_index - raw_bytes.len();
            match from_utf8(raw_bytes) {
                Ok(s) => Ok((next_index, Value::Tstr(s.to_string()))),
                Err(e) => Err(CBORError::BadUtf8(content_index + e.valid_up_to())),
            }
        }
        // UTF8 strings, indefinite length
        0x7f => parse_indefinite_textstring(buf, index),
        // Arrays
        0x80..=0x9b => {
            let (items_index, n_items) = parse_unsigned(buf, index)?;
            parse_fixed_array(buf, items_index, n_items, depth.descend()?)
        }
        // Arrays, indefinite length
        0x9f => parse_indefinite_array(buf, index, depth.descend()?),
        // Maps
        0xa0..=0xbb => {
            let (pairs_index, n_pairs) = parse_unsigned(buf, index)?;
            parse_fixed_map(buf, pairs_index, n_pairs, depth.descend()?)
        }
        // Maps, indefinite length
        0xbf => parse_indefinite_map(buf, index, depth.descend()?),
        // Simple values false, true and null
        0xf4 => Ok((index + 1, Value::Bool(false))),
        0xf5 => Ok((index + 1, Value::Bool(true))),
        0xf6 => Ok((index + 1, Value::Null)),
        // Half precision floats widen to binary64. The encoder never writes them back
        0xf9 => {
            let (next_index, val) = parse_f16(buf, index)?;
            Ok((next_index, Value::Float64(f64::from(val))))
        }
        0xfa => {
            let (next_index, val) = parse_f32(buf, index)?;
            Ok((next_index, Value::Float64(f64::from(val))))
        }
        0xfb => {
            let (next_index, val) = parse_f64(buf, index)?;
            Ok((next_index, Value::Float64(val)))
        }
        // A break is only legal while an indefinite length item is being collected
        BREAK => Err(CBORError::UnexpectedBreak(index)),
        // Everything else, including tagged values (0xc0..0xdb), is outside the supported
        // subset
        _ => Err(CBORError::Unsupported(index, mt_ai_byte)),
    }
}

/***************************************************************************************************
 * Integer parser helpers
 **************************************************************************************************/

/// Parse the argument of an item: either the AI bits themselves or the big-endian extension
/// bytes which follow them.
///
/// On entry the `index` is assumed to identify an MT/AI byte within `buf`. On return we have
/// the unsigned argument value and the index within `buf` of the byte after it. The MT bits
/// are ignored here.
#[cfg_attr(feature = "trace", trace)]
fn parse_unsigned(buf: &[u8], index: usize) -> Result<(usize, u64)> {
    let ai = peek(buf, index)? & AI_MASK;
    if ai <= PAYLOAD_AI_BITS {
        Ok((index + 1, ai as u64))
    } else if ai == PAYLOAD_ONE_BYTE {
        let (next_index, bytes) = read_array::<1>(buf, index + 1)?;
        Ok((next_index, u8::from_be_bytes(bytes) as u64))
    } else if ai == PAYLOAD_TWO_BYTES {
        let (next_index, bytes) = read_array::<2>(buf, index + 1)?;
        Ok((next_index, u16::from_be_bytes(bytes) as u64))
    } else if ai == PAYLOAD_FOUR_BYTES {
        let (next_index, bytes) = read_array::<4>(buf, index + 1)?;
        Ok((next_index, u32::from_be_bytes(bytes) as u64))
    } else if ai == PAYLOAD_EIGHT_BYTES {
        let (next_index, bytes) = read_array::<8>(buf, index + 1)?;
        Ok((next_index, u64::from_be_bytes(bytes)))
    } else {
        // AI values 28..30 are reserved; 31 belongs to the indefinite length forms, which
        // never reach this function
        Err(CBORError::Unsupported(index, buf[index]))
    }
}

/***************************************************************************************************
 * Float parse helpers
 **************************************************************************************************/

/// Parse a 16 bit floating point value.
///
/// On entry the `index` is assumed to identify an MT/AI byte within `buf`. On return we have
/// an `f16` value and the index within `buf` of the next item.
fn parse_f16(buf: &[u8], index: usize) -> Result<(usize, f16)> {
    let (next_index, bytes) = read_array::<2>(buf, index + 1)?;
    Ok((next_index, f16::from_be_bytes(bytes)))
}

/// Parse a 32 bit floating point value.
fn parse_f32(buf: &[u8], index: usize) -> Result<(usize, f32)> {
    let (next_index, bytes) = read_array::<4>(buf, index + 1)?;
    Ok((next_index, f32::from_be_bytes(bytes)))
}

/// Parse a 64 bit floating point value.
fn parse_f64(buf: &[u8], index: usize) -> Result<(usize, f64)> {
    let (next_index, bytes) = read_array::<8>(buf, index + 1)?;
    Ok((next_index, f64::from_be_bytes(bytes)))
}

/***************************************************************************************************
 * Bytestring, string, array and map helpers
 **************************************************************************************************/

/// Parse a definite length string body starting at `index` in `buf`, where `index` should
/// indicate the MT/AI byte of the item. Both `bstr` and `tstr` items take this path; the
/// caller validates text.
#[cfg_attr(feature = "trace", trace)]
fn parse_bytestring(buf: &[u8], index: usize) -> Result<(usize, &[u8])> {
    let (content_index, length) = parse_unsigned(buf, index)?;
    // A length which does not fit in usize cannot be satisfied by an in-memory buffer
    let length = usize::try_from(length).map_err(|_| CBORError::Truncated(content_index))?;
    read_extent(buf, content_index, length)
}

/// Parse the chunks of an indefinite length byte string, which must themselves be definite
/// length byte strings, and concatenate them until the break.
fn parse_indefinite_bytestring(buf: &[u8], index: usize) -> Result<(usize, Value)> {
    let mut chunk_index = index + 1;
    let mut bytes = Vec::new();
    loop {
        match peek(buf, chunk_index)? {
            BREAK => return Ok((chunk_index + 1, Value::Bstr(bytes))),
            0x40..=0x5b => {
                let (next_index, chunk) = parse_bytestring(buf, chunk_index)?;
                bytes.extend_from_slice(chunk);
                chunk_index = next_index;
            }
            other => return Err(CBORError::Unsupported(chunk_index, other)),
        }
    }
}

/// Parse the chunks of an indefinite length text string. Chunks must be definite length text
/// strings. UTF8 validation runs over the concatenation, since a multi-byte sequence may not
/// be split across chunks at a character boundary; a validation failure reports the offset of
/// the item itself.
fn parse_indefinite_textstring(buf: &[u8], index: usize) -> Result<(usize, Value)> {
    let mut chunk_index = index + 1;
    let mut bytes = Vec::new();
    loop {
        match peek(buf, chunk_index)? {
            BREAK => {
                return match String::from_utf8(bytes) {
                    Ok(s) => Ok((chunk_index + 1, Value::Tstr(s))),
                    Err(_) => Err(CBORError::BadUtf8(index)),
                };
            }
            0x60..=0x7b => {
                let (next_index, chunk) = parse_bytestring(buf, chunk_index)?;
                bytes.extend_from_slice(chunk);
                chunk_index = next_index;
            }
            other => return Err(CBORError::Unsupported(chunk_index, other)),
        }
    }
}

/// Parse the body of an array of `n_items` items. An array of length N is simply a sequence
/// of N CBOR Items, some of which could themselves be arrays or maps.
fn parse_fixed_array(buf: &[u8], index: usize, n_items: u64, depth: Depth) -> Result<(usize, Value)> {
    // An item takes at least one byte, so the remaining input bounds the reservation
    let hint = n_items.min((buf.len() - index) as u64) as usize;
    let mut items = Vec::with_capacity(hint);
    let mut index = index;
    for _ in 0..n_items {
        let (next_index, item) = parse_item(buf, index, depth)?;
        items.push(item);
        index = next_index;
    }
    Ok((index, Value::Array(items)))
}

/// Parse the body of a map of `n_pairs` entries. A map of N entries is simply a sequence of
/// N*2 CBOR Items; every key must decode to a `tstr`. Entries are kept in wire order, and a
/// duplicated key keeps both entries.
fn parse_fixed_map(buf: &[u8], index: usize, n_pairs: u64, depth: Depth) -> Result<(usize, Value)> {
    // Each entry takes at least two bytes
    let hint = n_pairs.min((buf.len() - index) as u64 / 2) as usize;
    let mut entries = Vec::with_capacity(hint);
    let mut index = index;
    for _ in 0..n_pairs {
        let (value_index, key) = parse_key(buf, index, depth)?;
        let (next_index, value) = parse_item(buf, value_index, depth)?;
        entries.push((key, value));
        index = next_index;
    }
    Ok((index, Value::Map(entries)))
}

/// Parse the body of an indefinite length array. The break is tested for before each child:
/// an 0xff in item position closes the array rather than starting an item.
fn parse_indefinite_array(buf: &[u8], index: usize, depth: Depth) -> Result<(usize, Value)> {
    let mut index = index + 1;
    let mut items = Vec::new();
    loop {
        if peek(buf, index)? == BREAK {
            return Ok((index + 1, Value::Array(items)));
        }
        let (next_index, item) = parse_item(buf, index, depth)?;
        items.push(item);
        index = next_index;
    }
}

/// Parse the body of an indefinite length map. The break is tested for in key position before
/// any child is decoded.
fn parse_indefinite_map(buf: &[u8], index: usize, depth: Depth) -> Result<(usize, Value)> {
    let mut index = index + 1;
    let mut entries = Vec::new();
    loop {
        if peek(buf, index)? == BREAK {
            return Ok((index + 1, Value::Map(entries)));
        }
        let (value_index, key) = parse_key(buf, index, depth)?;
        let (next_index, value) = parse_item(buf, value_index, depth)?;
        entries.push((key, value));
        index = next_index;
    }
}

/// Parse a map key, which must decode to a `tstr`. Any other successfully decoded item is a
/// `BadKey` at the key's offset; a key which does not decode at all keeps its own error.
fn parse_key(buf: &[u8], index: usize, depth: Depth) -> Result<(usize, String)> {
    match parse_item(buf, index, depth)? {
        (next_index, Value::Tstr(key)) => Ok((next_index, key)),
        _ => Err(CBORError::BadKey(index)),
    }
}

/***************************************************************************************************
 * Other helpers
 **************************************************************************************************/

/// Return the byte at `index`, or `Truncated` if the buffer ends before it.
#[inline]
fn peek(buf: &[u8], index: usize) -> Result<u8> {
    if index < buf.len() {
        Ok(buf[index])
    } else {
        Err(CBORError::Truncated(index))
    }
}

/// Return the index of the next item to parse and a slice over `length` bytes of `buf`
/// starting at `start`. The bounds check cannot overflow.
#[inline]
fn read_extent(buf: &[u8], start: usize, length: usize) -> Result<(usize, &[u8])> {
    match start.checked_add(length) {
        Some(end) if end <= buf.len() => Ok((end, &buf[start..end])),
        _ => Err(CBORError::Truncated(start)),
    }
}

/// Read a fixed number of bytes starting at `index`, for feeding `from_be_bytes`.
#[inline]
fn read_array<const N: usize>(buf: &[u8], index: usize) -> Result<(usize, [u8; N])> {
    let (next_index, slice) = read_extent(buf, index, N)?;
    let mut bytes = [0u8; N];
    bytes.copy_from_slice(slice);
    Ok((next_index, bytes))
}
