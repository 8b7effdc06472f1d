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
 * CBOR Document Encoder
 *
 * A CBOR (RFC7049/RFC8949) serializer and deserializer over an owned, JSON-like document tree.
 * Serialization runs the same traversal twice: a first pass counts the bytes the document
 * needs, a second pass writes them into an exactly pre-reserved vector.
 **************************************************************************************************/
use crate::ast::Value;
use crate::constants::*;

#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

/***************************************************************************************************
 * Encode Sink
 **************************************************************************************************/

/// A sink absorbing the byte stream produced by the encode traversal. Instantiated twice: once
/// with [`SizeSink`], which only counts, and once with `Vec<u8>`, which appends. The traversal
/// is identical in both passes, which is what keeps the counted size exact.
pub(crate) trait EncodeSink {
    /// Absorb a single byte.
    fn put_byte(&mut self, byte: u8);
    /// Absorb a run of bytes, typically the big-endian form of a multi-byte argument or a
    /// string payload.
    fn put_bytes(&mut self, bytes: &[u8]);
}

/// Sink which counts the bytes offered to it without storing anything.
#[derive(Debug, Default)]
struct SizeSink {
    size: usize,
}

impl EncodeSink for SizeSink {
    #[inline(always)]
    fn put_byte(&mut self, _byte: u8) {
        self.size += 1;
    }

    #[inline(always)]
    fn put_bytes(&mut self, bytes: &[u8]) {
        self.size += bytes.len();
    }
}

impl EncodeSink for Vec<u8> {
    #[inline(always)]
    fn put_byte(&mut self, byte: u8) {
        self.push(byte);
    }

    #[inline(always)]
    fn put_bytes(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

/***************************************************************************************************
 * Public API
 **************************************************************************************************/

/// Return the exact number of bytes [`encode`] will produce for `value`.
///
/// This is the counting pass of the encoder: the same traversal as the byte-producing pass,
/// driven into a sink which only accumulates a size.
#[cfg_attr(feature = "trace", trace)]
pub fn calc_size(value: &Value) -> usize {
    let mut sink = SizeSink::default();
    encode_item(value, &mut sink);
    sink.size
}

/// Serialize `value` as CBOR, returning the encoded bytes.
///
/// The output vector is reserved to [`calc_size`] up front, so the write pass never
/// reallocates. Integers and lengths always use the shortest argument form which can hold
/// them; floats are always written in the 8 byte form; map entries are written in their stored
/// order.
#[cfg_attr(feature = "trace", trace)]
pub fn encode(value: &Value) -> Vec<u8> {
    let mut out = Vec::with_capacity(calc_size(value));
    encode_item(value, &mut out);
    out
}

/// Serialize `value` as CBOR, appending to `out`.
///
/// `out` is grown by exactly [`calc_size`] bytes in one reservation.
#[cfg_attr(feature = "trace", trace)]
pub fn encode_into(value: &Value, out: &mut Vec<u8>) {
    out.reserve(calc_size(value));
    encode_item(value, out);
}

/***************************************************************************************************
 * Encode traversal
 **************************************************************************************************/

/// Encode a single item, recursing into containers.
fn encode_item<S: EncodeSink>(value: &Value, sink: &mut S) {
    match value {
        Value::Null => sink.put_byte(MT_SIMPLE | SIMPLE_NULL),
        Value::Bool(false) => sink.put_byte(MT_SIMPLE | SIMPLE_FALSE),
        Value::Bool(true) => sink.put_byte(MT_SIMPLE | SIMPLE_TRUE),
        Value::UInt(v) => put_type_and_arg(sink, MT_UINT, *v),
        Value::Int(v) => {
            if *v < 0 {
                // Major Type 1 carries n where the value is -1 - n
                put_type_and_arg(sink, MT_NINT, (-1 - *v) as u64);
            } else {
                put_type_and_arg(sink, MT_UINT, *v as u64);
            }
        }
        Value::Float64(v) => {
            // Always the 8 byte form; this encoder never shortens floats
            sink.put_byte(MT_FLOAT | PAYLOAD_EIGHT_BYTES);
            sink.put_bytes(&v.to_be_bytes());
        }
        Value::Bstr(bytes) => {
            put_type_and_arg(sink, MT_BSTR, bytes.len() as u64);
            sink.put_bytes(bytes);
        }
        Value::Tstr(s) => put_tstr(sink, s),
        Value::Array(items) => {
            put_type_and_arg(sink, MT_ARRAY, items.len() as u64);
            for item in items {
                encode_item(item, sink);
            }
        }
        Value::Map(entries) => {
            put_type_and_arg(sink, MT_MAP, entries.len() as u64);
            for (key, value) in entries {
                put_tstr(sink, key);
                encode_item(value, sink);
            }
        }
    }
}

/// Encode a text string. Map keys take this path as well as `Tstr` items. The `str` type
/// guarantees well-formed UTF-8, so there is nothing to validate here.
#[inline]
fn put_tstr<S: EncodeSink>(sink: &mut S, s: &str) {
    put_type_and_arg(sink, MT_TSTR, s.len() as u64);
    sink.put_bytes(s.as_bytes());
}

/// Emit the MT/AI byte for `mt` with argument `arg`, followed by the big-endian bytes of the
/// argument where it does not fit on the AI bits.
///
/// Arguments are always emitted using the preferred (shortest) serialization as defined in
/// RFC8949.
fn put_type_and_arg<S: EncodeSink>(sink: &mut S, mt: u8, arg: u64) {
    if arg <= PAYLOAD_AI_BITS as u64 {
        // Encode on the AI bits
        sink.put_byte(mt | arg as u8);
    } else if arg <= u8::MAX as u64 {
        sink.put_byte(mt | PAYLOAD_ONE_BYTE);
        sink.put_byte(arg as u8);
    } else if arg <= u16::MAX as u64 {
        sink.put_byte(mt | PAYLOAD_TWO_BYTES);
        sink.put_bytes(&(arg as u16).to_be_bytes());
    } else if arg <= u32::MAX as u64 {
        sink.put_byte(mt | PAYLOAD_FOUR_BYTES);
        sink.put_bytes(&(arg as u32).to_be_bytes());
    } else {
        sink.put_byte(mt | PAYLOAD_EIGHT_BYTES);
        sink.put_bytes(&arg.to_be_bytes());
    }
}
