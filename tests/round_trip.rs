//! End-to-end encode/decode tests through the public API.

use std::borrow::Cow;
use std::sync::Arc;
use std::thread;

use ubjsonr::{
    decode, encode, Decoder, DecoderOptions, Encoder, EncoderOptions, Int64Handling,
    OptimizeArrays, TextCodec, TypedArray, UbjsonError, UbjsonMap, UbjsonValue,
};

fn object(entries: Vec<(&str, UbjsonValue)>) -> UbjsonValue {
    UbjsonValue::Object(
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect::<UbjsonMap>(),
    )
}

fn ints(values: &[i64]) -> UbjsonValue {
    UbjsonValue::Array(values.iter().map(|&i| UbjsonValue::Int(i)).collect())
}

fn complex_document() -> UbjsonValue {
    object(vec![
        ("hello", "world".into()),
        ("from", UbjsonValue::Array(vec!["UBJSON".into()])),
        (
            "colors",
            UbjsonValue::Array(vec![
                ints(&[255, 255, 255]),
                ints(&[0, 0, 0]),
                ints(&[64, 64, 96]),
            ]),
        ),
        (
            "domains",
            object(vec![
                ("com", "commercial".into()),
                ("org", "organization".into()),
                ("net", "network".into()),
            ]),
        ),
        (
            "entries",
            UbjsonValue::Array(vec![
                object(vec![
                    ("id", 1.into()),
                    ("name", "test".into()),
                    ("content", UbjsonValue::Null),
                    ("timestamp", 1532432408.008.into()),
                    ("published", false.into()),
                ]),
                object(vec![
                    ("id", 2.into()),
                    ("name", "lorem".into()),
                    ("content", "Lorem ipsum...".into()),
                    ("timestamp", 1532432416.346.into()),
                    ("published", true.into()),
                ]),
            ]),
        ),
    ])
}

#[test]
fn complex_document_round_trips_in_every_mode() {
    let expected = complex_document();
    for options in [
        EncoderOptions::new(),
        EncoderOptions::new().optimize_arrays(true),
        EncoderOptions::new().optimize_objects(true),
        EncoderOptions::new()
            .optimize_arrays(true)
            .optimize_objects(true),
        EncoderOptions::new().optimize_arrays(OptimizeArrays::OnlyTypedArray),
    ] {
        let bytes = encode(&expected, &options).unwrap();
        let actual = decode(&bytes, &DecoderOptions::default()).unwrap();
        assert_eq!(actual, expected, "failed with {options:?}");
    }
}

#[test]
fn strongly_typed_form_shrinks_homogeneous_arrays() {
    let values: Vec<i64> = (0..100).collect();
    let value = ints(&values);
    let plain = encode(&value, &EncoderOptions::new()).unwrap();
    let optimized = encode(&value, &EncoderOptions::new().optimize_arrays(true)).unwrap();
    // `[`, 100 two-byte `i` values, `]` against `[$i#i\x64` and 100 payload bytes.
    assert_eq!(plain.len(), 202);
    assert_eq!(optimized.len(), 105);
}

#[test]
fn object_scenario_bytes() {
    let value = object(vec![("a", 1.into()), ("b", 2.into()), ("c", 3.into())]);
    let bytes = encode(&value, &EncoderOptions::default()).unwrap();
    assert_eq!(
        &bytes[..],
        &[
            b'{', b'i', 1, b'a', b'i', 1, b'i', 1, b'b', b'i', 2, b'i', 1, b'c', b'i', 3, b'}'
        ]
    );
    assert_eq!(decode(&bytes, &DecoderOptions::default()).unwrap(), value);
}

#[test]
fn typed_array_scenario() {
    let bytes = encode(&ints(&[1, 2, 3]), &EncoderOptions::new().optimize_arrays(true)).unwrap();
    assert_eq!(&bytes[..], &[b'[', b'$', b'i', b'#', b'i', 3, 1, 2, 3]);

    let typed = decode(&bytes, &DecoderOptions::new().use_typed_arrays(true)).unwrap();
    assert_eq!(typed, UbjsonValue::TypedArray(TypedArray::I8(vec![1, 2, 3])));
}

#[test]
fn typed_arrays_round_trip_when_requested() {
    let encode_opts = EncoderOptions::new().optimize_arrays(OptimizeArrays::OnlyTypedArray);
    let decode_opts = DecoderOptions::new().use_typed_arrays(true);
    for array in [
        TypedArray::I8(vec![-128, 0, 127]),
        TypedArray::U8(vec![0, 255]),
        TypedArray::I16(vec![i16::MIN, 1, i16::MAX]),
        TypedArray::I32(vec![i32::MIN, i32::MAX]),
        TypedArray::F32(vec![0.5, -1.25]),
        TypedArray::F64(vec![0.1, 1e300]),
    ] {
        let value = UbjsonValue::TypedArray(array);
        let bytes = encode(&value, &encode_opts).unwrap();
        assert_eq!(decode(&bytes, &decode_opts).unwrap(), value);
    }
}

#[test]
fn typed_arrays_decode_as_plain_arrays_by_default() {
    let value = UbjsonValue::TypedArray(TypedArray::I16(vec![1000, -1000]));
    let bytes = encode(&value, &EncoderOptions::new().optimize_arrays(true)).unwrap();
    assert_eq!(
        decode(&bytes, &DecoderOptions::default()).unwrap(),
        ints(&[1000, -1000])
    );
}

#[test]
fn large_integers_are_lossy_by_default() {
    let value = UbjsonValue::Int(1 << 40);
    let bytes = encode(&value, &EncoderOptions::default()).unwrap();
    assert_eq!(
        decode(&bytes, &DecoderOptions::default()).unwrap(),
        UbjsonValue::Float((1u64 << 40) as f64)
    );
}

#[test]
fn int64_round_trips_when_both_sides_opt_in() {
    let value = ints(&[1, i64::MAX, i64::MIN]);
    let bytes = encode(&value, &EncoderOptions::new().int64(true)).unwrap();
    assert!(matches!(
        decode(&bytes, &DecoderOptions::default()),
        Err(UbjsonError::UnsupportedWireType { tag: b'L', .. })
    ));
    let exact = DecoderOptions::new().int64_handling(Int64Handling::Integer);
    assert_eq!(decode(&bytes, &exact).unwrap(), value);
}

#[test]
fn long_strings_use_wider_lengths() {
    let long = "x".repeat(300);
    let bytes = encode(&long.as_str().into(), &EncoderOptions::default()).unwrap();
    assert_eq!(&bytes[..4], &[b'S', b'I', 0x01, 0x2C]);
    assert_eq!(
        decode(&bytes, &DecoderOptions::default()).unwrap(),
        UbjsonValue::String(long)
    );
}

#[test]
fn no_op_only_input_is_absent() {
    assert_eq!(
        decode(&[], &DecoderOptions::default()).unwrap(),
        UbjsonValue::NoOp
    );
    let bytes = encode(&UbjsonValue::NoOp, &EncoderOptions::default()).unwrap();
    assert_eq!(&bytes[..], b"N");
}

/// Upper-cases text on the way out, to prove the codec is used.
struct Shouting;

impl TextCodec for Shouting {
    fn encode<'a>(&self, text: &'a str) -> Cow<'a, [u8]> {
        Cow::Owned(text.to_uppercase().into_bytes())
    }

    fn decode(&self, bytes: &[u8]) -> Result<String, UbjsonError> {
        String::from_utf8(bytes.to_vec()).map_err(|e| UbjsonError::InvalidUtf8(e.to_string()))
    }
}

#[test]
fn injected_text_codec_handles_strings_and_keys() {
    let value = object(vec![("key", "value".into())]);
    let encoder = Encoder::with_text_codec(EncoderOptions::default(), Shouting);
    let bytes = encoder.encode(&value).unwrap();

    let decoder = Decoder::with_text_codec(DecoderOptions::default(), Shouting);
    assert_eq!(
        decoder.decode(&bytes).unwrap(),
        object(vec![("KEY", "VALUE".into())])
    );
}

#[test]
fn independent_calls_run_concurrently() {
    let encoder = Arc::new(Encoder::new(
        EncoderOptions::new()
            .optimize_arrays(true)
            .optimize_objects(true),
    ));
    let decoder = Arc::new(Decoder::new(DecoderOptions::default()));
    let handles: Vec<_> = (0..4)
        .map(|n| {
            let encoder = Arc::clone(&encoder);
            let decoder = Arc::clone(&decoder);
            thread::spawn(move || {
                let value = object(vec![("n", UbjsonValue::Int(n)), ("list", ints(&[n, n + 1]))]);
                let bytes = encoder.encode(&value).unwrap();
                assert_eq!(decoder.decode(&bytes).unwrap(), value);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn options_parse_from_strings() {
    let mode: OptimizeArrays = "onlyTypedArray".parse().unwrap();
    assert_eq!(mode, OptimizeArrays::OnlyTypedArray);
    assert!(matches!(
        "sometimes".parse::<Int64Handling>(),
        Err(UbjsonError::InvalidOption(_))
    ));
}
