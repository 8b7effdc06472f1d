/***************************************************************************************************
 * Copyright (c) 2020-2023, Qualcomm Innovation Center, Inc. All rights reserved.
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
 * rs_treecbor module definition
 *
 * A CBOR (RFC7049/RFC8949) serializer and deserializer over an owned, JSON-like document tree.
 **************************************************************************************************/

#![warn(missing_docs)]

//! # RS_TREECBOR
//!
//! The `rs_treecbor` crate provides a CBOR implementation centred on an owned document tree:
//! a JSON-like [`types::Value`] which owns all of its children and can be built by hand,
//! serialized to the wire, and recovered from a byte buffer. The typical use-case is a host
//! which keeps configuration, claims sets or protocol payloads as documents and wants them in
//! and out of CBOR without describing the data shape up front.
//!
//! ## Features
//!
//! - Encoding runs in two passes over the tree: a counting pass computes the exact encoded
//!   size ([`encoder::calc_size`]), the output vector is reserved once, and a write pass fills
//!   it. The two passes share one traversal, so the count can never drift from the bytes.
//! - Preferred serialization throughout: integers and lengths always use the smallest
//!   argument encoding that holds them.
//! - Decoding accepts both definite and indefinite length strings, arrays and maps, widens
//!   half and single precision floats to `f64`, validates text strictly as UTF-8, and keeps
//!   map entries in wire order (duplicate keys included).
//! - Adversarial input is bounded by a nesting depth limit (default 1024) and every decode
//!   error carries the byte offset at which it was detected.
//!
//! Tagged values (Major Type 6) are outside the supported subset: the encoder never emits
//! them and the decoder reports them as unsupported.
//!
//! ## Encoding
//!
//! The example below builds a small claims-set document and serializes it.
//!
//! ```
//! use rs_treecbor::encoder::{calc_size, encode};
//! use rs_treecbor::types::Value;
//!
//! let mut claims = Value::Map(vec![]);
//! claims.insert("device", Value::from("tee-0"));
//! claims.insert("nonce", Value::from(&[0x94u8, 0x8f, 0x88, 0x60][..]));
//! claims.insert("secure_boot", Value::from(true));
//! claims.insert("versions", Value::Array(vec![Value::from(3u64), Value::from(1u64)]));
//!
//! let bytes = encode(&claims);
//! assert_eq!(bytes.len(), calc_size(&claims));
//! assert_eq!(bytes[0], 0xa4);
//! ```
//!
//! ## Decoding
//!
//! The example below decodes the RFC8949 example map `{"a": 1, "b": [2, 3]}` and picks it
//! apart with the accessors on [`types::Value`].
//!
//! ```
//! use rs_treecbor::decoder::decode;
//! use rs_treecbor::error::CBORError;
//! use rs_treecbor::types::Value;
//!
//! fn main() -> Result<(), CBORError> {
//!     let doc = decode(&[0xa2, 0x61, 0x61, 0x01, 0x61, 0x62, 0x82, 0x02, 0x03])?;
//!
//!     let entries = doc.as_map().unwrap();
//!     assert_eq!(entries[0].0, "a");
//!     assert_eq!(entries[0].1, Value::UInt(1));
//!     assert_eq!(entries[1].0, "b");
//!     assert_eq!(
//!         entries[1].1,
//!         Value::Array(vec![Value::UInt(2), Value::UInt(3)])
//!     );
//!     Ok(())
//! }
//! ```
//!
//! A buffer read from storage or the wire is usually wrapped in a
//! [`decoder::PackedBuffer`], which owns the bytes and hands out read-only views for
//! parsing.

pub(crate) mod ast;
pub(crate) mod cbor_diag;
pub(crate) mod constants;
pub(crate) mod decode;
pub(crate) mod encode;

/// The `error` module contains error definitions used throughout `rs_treecbor`.
pub mod error;

/// The `types` module exports the [`types::Value`] document tree which represents a decoded
/// CBOR item.
pub mod types {
    pub use super::ast::Value;
}

/// The `decoder` module exports types and functions for decoding CBOR documents from a
/// buffer.
pub mod decoder {
    pub use super::decode::{
        decode, decode_with_depth, DecodeBufIterator, PackedBuffer, SequenceBuffer,
        DEFAULT_DEPTH_LIMIT,
    };
}

/// The `encoder` module exports the functions which serialize a [`types::Value`] as CBOR.
pub mod encoder {
    pub use super::encode::{calc_size, encode, encode_into};
}

/// The `debug` module exports helpers for printing documents in CBOR diagnostic notation.
pub mod debug {
    pub use super::cbor_diag::{print_hex, Diag};
}
