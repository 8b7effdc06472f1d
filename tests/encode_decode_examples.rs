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
 * Test cases for rs_treecbor: encode/decode round trips and the buffer types
 *
 * Exercises the laws the codec promises: round trip fidelity, exact size calculation,
 * re-encode stability and definite/indefinite equivalence.
 **************************************************************************************************/

extern crate rs_treecbor;

use rs_treecbor::debug::{print_hex, Diag};
use rs_treecbor::decoder::{decode, PackedBuffer, SequenceBuffer};
use rs_treecbor::encoder::{calc_size, encode};
use rs_treecbor::error::CBORError;
use rs_treecbor::types::Value;

/// A document touching every variant, with integers kept in the form the decoder produces so
/// the round trip compares equal.
fn sample_document() -> Value {
    let mut doc = Value::Map(vec![]);
    doc.insert("null", Value::Null);
    doc.insert("flag", Value::Bool(true));
    doc.insert("count", Value::UInt(1000000));
    doc.insert("delta", Value::Int(-1000));
    doc.insert("ratio", Value::Float64(1.1));
    doc.insert("name", Value::from("\u{6c34}\u{00fc}"));
    doc.insert("nonce", Value::from(&[0x94u8, 0x8f, 0x88, 0x60][..]));
    doc.insert(
        "versions",
        Value::Array(vec![
            Value::from("3.1"),
            Value::UInt(1),
            Value::Array(vec![]),
        ]),
    );
    doc.insert("empty", Value::Map(vec![]));
    doc
}

#[test]
fn round_trip_sample_document() -> Result<(), CBORError> {
    println!("<==================== round_trip_sample_document ===================>");
    let doc = sample_document();
    let bytes = encode(&doc);
    assert_eq!(bytes.len(), calc_size(&doc));
    assert_eq!(decode(&bytes)?, doc);
    Ok(())
}

/// Re-encoding a decoded document reproduces the input bytes, including for documents that
/// were built with non-negative `Int` values (which decode as `UInt`).
#[test]
fn reencode_is_stable() -> Result<(), CBORError> {
    println!("<======================= reencode_is_stable =====================>");
    let mut doc = sample_document();
    doc.insert("widths", Value::Array(vec![Value::Int(23), Value::Int(24)]));

    let first = encode(&doc);
    let second = encode(&decode(&first)?);
    assert_eq!(first, second);
    Ok(())
}

/// A non-negative `Int` round trips to `UInt`; the wire cannot tell them apart.
#[test]
fn nonnegative_int_decodes_as_uint() -> Result<(), CBORError> {
    println!("<================= nonnegative_int_decodes_as_uint ================>");
    assert_eq!(decode(&encode(&Value::Int(5)))?, Value::UInt(5));
    assert_eq!(decode(&encode(&Value::Int(0)))?, Value::UInt(0));
    assert_eq!(decode(&encode(&Value::Int(-5)))?, Value::Int(-5));
    Ok(())
}

/// Indefinite length input carries no length information, so it must decode to the same
/// document as its definite re-encoding.
#[test]
fn indefinite_equals_definite() -> Result<(), CBORError> {
    println!("<==================== indefinite_equals_definite ===================>");
    for input in [
        // [_ 1, [2, 3], [_ 4, 5]]
        &[0x9f, 0x01, 0x82, 0x02, 0x03, 0x9f, 0x04, 0x05, 0xff, 0xff][..],
        // {_ "a": 1, "b": [_ 2, 3]}
        &[0xbf, 0x61, 0x61, 0x01, 0x61, 0x62, 0x9f, 0x02, 0x03, 0xff, 0xff],
        // (_ "strea", "ming")
        &[0x7f, 0x65, 0x73, 0x74, 0x72, 0x65, 0x61, 0x64, 0x6d, 0x69, 0x6e, 0x67, 0xff],
        // (_ h'0102', h'030405')
        &[0x5f, 0x42, 0x01, 0x02, 0x43, 0x03, 0x04, 0x05, 0xff],
    ]
    .iter()
    {
        let doc = decode(input)?;
        let definite = encode(&doc);
        assert_eq!(decode(&definite)?, doc, "input {:02x?}", input);
        // The definite form is at least as short
        assert!(definite.len() <= input.len());
    }
    Ok(())
}

/// Half and single precision input widens to binary64 and stays there on re-encode.
#[test]
fn half_precision_normalizes_to_double() -> Result<(), CBORError> {
    println!("<================ half_precision_normalizes_to_double ===============>");
    let doc = decode(&[0xf9, 0x3c, 0x00])?;
    assert_eq!(doc, Value::Float64(1.0));
    assert_eq!(
        encode(&doc),
        vec![0xfb, 0x3f, 0xf0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
    );

    let doc = decode(&[0xfa, 0x47, 0xc3, 0x50, 0x00])?;
    assert_eq!(
        encode(&doc),
        vec![0xfb, 0x40, 0xf8, 0x6a, 0x00, 0x00, 0x00, 0x00, 0x00]
    );
    Ok(())
}

#[test]
fn packed_buffer_owns_and_decodes() -> Result<(), CBORError> {
    println!("<=================== packed_buffer_owns_and_decodes ==================>");
    let doc = sample_document();
    let packed = PackedBuffer::new(encode(&doc));

    assert_eq!(packed.len(), calc_size(&doc));
    assert!(!packed.is_empty());
    assert_eq!(packed.as_bytes(), encode(&doc).as_slice());
    assert_eq!(packed.decode()?, doc);

    // A depth limit can be applied through the owner too
    assert_eq!(
        packed.decode_with_depth(1),
        Err(CBORError::TooDeep(1))
    );

    // The same bytes come back out
    let bytes = packed.clone().into_bytes();
    assert_eq!(PackedBuffer::from(bytes), packed);
    Ok(())
}

#[test]
fn sequence_buffer_iterates_top_level_items() {
    println!("<=============== sequence_buffer_iterates_top_level_items ==============>");
    let input = [0x01, 0x63, 0x61, 0x62, 0x63, 0xf6];
    let mut it = SequenceBuffer::new(&input).into_iter();
    assert_eq!(it.next(), Some(Ok(Value::UInt(1))));
    assert_eq!(it.next(), Some(Ok(Value::from("abc"))));
    assert_eq!(it.next(), Some(Ok(Value::Null)));
    assert_eq!(it.next(), None);
}

/// The iterator yields the first failure once and then stops.
#[test]
fn sequence_buffer_stops_after_error() {
    println!("<================= sequence_buffer_stops_after_error ================>");
    let input = [0x01, 0x1c, 0x02];
    let mut it = SequenceBuffer::new(&input).into_iter();
    assert_eq!(it.next(), Some(Ok(Value::UInt(1))));
    assert_eq!(it.next(), Some(Err(CBORError::Unsupported(1, 0x1c))));
    assert_eq!(it.next(), None);
}

/// Every host-facing constructor lands on the variant the wire format expects.
#[test]
fn value_conversions() {
    println!("<======================= value_conversions =====================>");
    assert_eq!(encode(&Value::from(true)), vec![0xf5]);
    assert_eq!(encode(&Value::from(10u8)), encode(&Value::from(10u64)));
    assert_eq!(encode(&Value::from(10u16)), encode(&Value::from(10u32)));
    assert_eq!(encode(&Value::from(-10i8)), vec![0x29]);
    assert_eq!(encode(&Value::from(-10i16)), encode(&Value::from(-10i32)));
    assert_eq!(encode(&Value::from(-1000i64)), vec![0x39, 0x03, 0xe7]);
    assert_eq!(
        encode(&Value::from(1.5f64)),
        vec![0xfb, 0x3f, 0xf8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
    );
    assert_eq!(
        encode(&Value::from("IETF".to_string())),
        vec![0x64, 0x49, 0x45, 0x54, 0x46]
    );
    assert_eq!(encode(&Value::from(vec![0x01u8, 0x02])), vec![0x42, 0x01, 0x02]);

    // Containers can be built up through push/insert as well as from vectors
    let mut list = Value::from(vec![Value::from(1u64)]);
    list.push(Value::from(2u64));
    list.push(Value::from(3u64));
    assert_eq!(encode(&list), vec![0x83, 0x01, 0x02, 0x03]);

    let pairs = Value::from(vec![("a".to_string(), Value::from(1u64))]);
    assert_eq!(encode(&pairs), vec![0xa1, 0x61, 0x61, 0x01]);
}

#[test]
fn tstr_from_bytes_validates() {
    println!("<===================== tstr_from_bytes_validates ====================>");
    assert_eq!(
        Value::try_tstr_from_bytes(b"IETF".to_vec()),
        Ok(Value::from("IETF"))
    );
    assert_eq!(
        Value::try_tstr_from_bytes(vec![0x49, 0x45, 0xff, 0x46]),
        Err(CBORError::BadUtf8(2))
    );
}

#[test]
fn value_accessors() -> Result<(), CBORError> {
    println!("<======================= value_accessors =====================>");
    let doc = decode(&encode(&sample_document()))?;
    let entries = doc.as_map().unwrap();

    assert!(entries[0].1.is_null());
    assert_eq!(entries[1].1.as_bool(), Some(true));
    assert_eq!(entries[2].1.as_u64(), Some(1000000));
    assert_eq!(entries[2].1.as_i64(), Some(1000000));
    assert_eq!(entries[3].1.as_i64(), Some(-1000));
    assert_eq!(entries[4].1.as_f64(), Some(1.1));
    assert_eq!(entries[5].1.as_str(), Some("\u{6c34}\u{00fc}"));
    assert_eq!(entries[6].1.as_bytes(), Some(&[0x94u8, 0x8f, 0x88, 0x60][..]));
    assert_eq!(entries[7].1.as_array().map(|a| a.len()), Some(3));

    // Mismatched accessors answer None
    assert_eq!(entries[0].1.as_bool(), None);
    assert_eq!(entries[1].1.as_u64(), None);
    Ok(())
}

#[test]
fn diagnostic_notation() -> Result<(), CBORError> {
    println!("<====================== diagnostic_notation =====================>");
    let doc = decode(&[0xa2, 0x61, 0x61, 0x01, 0x61, 0x62, 0x82, 0x02, 0x03])?;
    assert_eq!(Diag(&doc).to_string(), r#"{"a": 1, "b": [2, 3]}"#);

    assert_eq!(
        Value::Bstr(vec![0x01, 0x02, 0x03, 0x04]).diag().to_string(),
        "h'01020304'"
    );
    assert_eq!(Value::Int(-42).diag().to_string(), "-42");
    assert_eq!(Value::Float64(1.0).diag().to_string(), "1.0");
    assert_eq!(Value::Float64(1.5).diag().to_string(), "1.5");
    assert_eq!(Value::Float64(f64::NAN).diag().to_string(), "NaN");
    assert_eq!(
        Value::Float64(f64::NEG_INFINITY).diag().to_string(),
        "-Infinity"
    );
    assert_eq!(Value::Null.diag().to_string(), "null");
    // Quotes and backslashes escape; control characters render as \u escapes
    assert_eq!(
        Value::from("he said \"hi\"\n").diag().to_string(),
        "\"he said \\\"hi\\\"\\u000a\""
    );
    assert_eq!(
        Value::from("a\\b").diag().to_string(),
        "\"a\\\\b\""
    );

    assert_eq!(print_hex(0x0f), "0f");
    Ok(())
}
