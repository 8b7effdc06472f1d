/***************************************************************************************************
 * Copyright (c) 2021-2023 Qualcomm Innovation Center, Inc. All rights reserved.
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
 * rs_treecbor CBOR Error API
 *
 * A CBOR (RFC7049/RFC8949) serializer and deserializer over an owned, JSON-like document tree.
 **************************************************************************************************/
use std::result;

use thiserror::Error;

/// An alias for Result<T, CBORError> used throughout this crate.
pub type Result<T> = result::Result<T, CBORError>;

/// `CBORError` provides information about failures decoding (or constructing) CBOR items.
///
/// Decoding errors carry a byte offset, counted from the start of the input buffer, locating
/// the problem. No error is ever recovered internally; every failure is surfaced to the caller
/// and no partial document is returned.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum CBORError {
    /// The buffer ended in the middle of an item. The offset is the position at which the
    /// failed read began.
    #[error("Buffer ended while reading at offset {0}")]
    Truncated(usize),
    /// The initial byte at this offset is not part of the supported CBOR subset.
    #[error("Unsupported initial byte 0x{1:02x} at offset {0}")]
    Unsupported(usize, u8),
    /// A tstr contains an invalid UTF8 sequence. The offset locates the start of the invalid
    /// content: within the input buffer when decoding, within the supplied bytes when
    /// constructing a text value directly.
    #[error("A tstr at offset {0} contains an invalid UTF8 sequence")]
    BadUtf8(usize),
    /// A map key did not decode to a tstr.
    #[error("Map key at offset {0} is not a tstr")]
    BadKey(usize),
    /// A break (0xff) was found outside of an indefinite length item.
    #[error("Break outside an indefinite length item at offset {0}")]
    UnexpectedBreak(usize),
    /// A negative integer does not fit in a signed 64 bit value.
    #[error("Negative integer at offset {0} underflows 64 bits")]
    Overflow(usize),
    /// Nesting of arrays and maps exceeded the depth limit carried in the payload.
    #[error("Nesting exceeds the depth limit of {0}")]
    TooDeep(usize),
}
