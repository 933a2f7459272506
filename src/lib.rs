//! ubjsonr — A pure-Rust UBJSON (Universal Binary JSON) codec.
//!
//! UBJSON is a self-describing binary superset of JSON. Every value carries a
//! one-byte type tag, so integer widths, floats, chars and strings survive a
//! round trip without a schema.
//!
//! # Architecture
//!
//! - **`types`** — `UbjsonValue`, wire tags and the type inference rules
//! - **`wire`** — Encoder (two-pass write plan) and recursive decoder
//! - **`options`** — Encoder/decoder configuration and number handlers
//! - **`text`** — Injectable UTF-8 text codec
//!
//! # Example
//!
//! ```
//! use ubjsonr::{decode, encode, DecoderOptions, EncoderOptions, UbjsonValue};
//!
//! let value = UbjsonValue::Array(vec![1.into(), 2.into(), 3.into()]);
//! let bytes = encode(&value, &EncoderOptions::new().optimize_arrays(true))?;
//! assert_eq!(&bytes[..], b"[$i#i\x03\x01\x02\x03");
//! assert_eq!(decode(&bytes, &DecoderOptions::default())?, value);
//! # Ok::<(), ubjsonr::UbjsonError>(())
//! ```

pub mod error;
pub mod options;
pub mod text;
pub mod types;
pub mod wire;

use bytes::Bytes;

pub use error::UbjsonError;
pub use options::{
    DecoderOptions, EncoderOptions, HighPrecisionHandler, HighPrecisionHandling, Int64Handler,
    Int64Handling, OptimizeArrays,
};
pub use text::{TextCodec, Utf8};
pub use types::{classify, reduce_common_type, Tag, TypedArray, UbjsonMap, UbjsonValue};
pub use wire::{Decoder, Encoder};

/// Encodes a value to UBJSON bytes.
pub fn encode(value: &UbjsonValue, options: &EncoderOptions) -> Result<Bytes, UbjsonError> {
    Encoder::new(options.clone()).encode(value)
}

/// Decodes one value from UBJSON bytes. Empty input yields
/// [`UbjsonValue::NoOp`].
pub fn decode(buf: &[u8], options: &DecoderOptions) -> Result<UbjsonValue, UbjsonError> {
    Decoder::new(options.clone()).decode(buf)
}
