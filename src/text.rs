//! Text codec capability used for string payloads.

use std::borrow::Cow;

use crate::error::UbjsonError;

/// Converts between Rust strings and the UTF-8 bytes stored on the wire.
///
/// The encoder and decoder take the codec as a type parameter so callers can
/// swap in their own implementation (for example one that validates or
/// normalizes text) without any global lookup.
pub trait TextCodec {
    /// Encodes a string into the bytes written after its length prefix.
    fn encode<'a>(&self, text: &'a str) -> Cow<'a, [u8]>;

    /// Decodes string payload bytes.
    fn decode(&self, bytes: &[u8]) -> Result<String, UbjsonError>;
}

/// The standard strict UTF-8 codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8;

impl TextCodec for Utf8 {
    fn encode<'a>(&self, text: &'a str) -> Cow<'a, [u8]> {
        Cow::Borrowed(text.as_bytes())
    }

    fn decode(&self, bytes: &[u8]) -> Result<String, UbjsonError> {
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|e| UbjsonError::InvalidUtf8(e.to_string()))
    }
}

impl<T: TextCodec + ?Sized> TextCodec for &T {
    fn encode<'a>(&self, text: &'a str) -> Cow<'a, [u8]> {
        (**self).encode(text)
    }

    fn decode(&self, bytes: &[u8]) -> Result<String, UbjsonError> {
        (**self).decode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_borrows_on_encode() {
        let encoded = Utf8.encode("héllo");
        assert!(matches!(encoded, Cow::Borrowed(_)));
        assert_eq!(encoded.len(), 6);
    }

    #[test]
    fn utf8_rejects_invalid_bytes() {
        assert_eq!(Utf8.decode(b"ubjson").unwrap(), "ubjson");
        assert!(matches!(
            Utf8.decode(&[0xC3, 0x28]),
            Err(UbjsonError::InvalidUtf8(_))
        ));
    }
}
