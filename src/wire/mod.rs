//! UBJSON wire encoding and decoding.
//!
//! All multi-byte numbers are big-endian. Containers come in three forms:
//! strongly typed (`$` type and `#` count header), count-only (`#` header)
//! and terminated (closing `]` or `}`).

pub mod decode;
pub mod encode;
pub mod marker;
mod plan;
mod reader;

pub use decode::Decoder;
pub use encode::Encoder;
