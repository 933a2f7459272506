//! UBJSON decoding: bytes → `UbjsonValue`.

use bytes::Buf;

use super::marker;
use super::reader::Reader;
use crate::error::UbjsonError;
use crate::options::{DecoderOptions, HighPrecisionHandling, Int64Handling};
use crate::text::{TextCodec, Utf8};
use crate::types::{Tag, TypedArray, UbjsonMap, UbjsonValue};

/// Container layout announced after the opening marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Header {
    /// `$ <tag> # <count>`: untagged payloads of one type.
    Typed { tag: Tag, count: usize },
    /// `# <count>`: tagged values, no terminator.
    Counted(usize),
    /// No header: tagged values until the closing marker.
    Terminated,
}

/// Decodes UBJSON buffers with a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct Decoder<T = Utf8> {
    options: DecoderOptions,
    text: T,
}

impl Decoder<Utf8> {
    pub fn new(options: DecoderOptions) -> Self {
        Self {
            options,
            text: Utf8,
        }
    }
}

impl<T: TextCodec> Decoder<T> {
    /// Creates a decoder that reads strings through `text`.
    pub fn with_text_codec(options: DecoderOptions, text: T) -> Self {
        Self { options, text }
    }

    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// Decodes one value from `buf`.
    ///
    /// Empty input, or input holding only no-op markers, decodes to
    /// [`UbjsonValue::NoOp`]. Bytes after the first complete value are
    /// ignored.
    pub fn decode(&self, buf: &[u8]) -> Result<UbjsonValue, UbjsonError> {
        let mut r = Reader::new(buf);
        r.skip_no_ops();
        if r.is_empty() {
            return Ok(UbjsonValue::NoOp);
        }
        let value = self.read_value(&mut r, 0)?;
        r.skip_no_ops();
        if !r.is_empty() {
            tracing::debug!(
                offset = r.position(),
                trailing = r.remaining(),
                "ignoring trailing bytes after value"
            );
        }
        Ok(value)
    }

    /// Reads the next marker byte, skipping no-ops.
    fn read_marker(&self, r: &mut Reader<'_>) -> Result<u8, UbjsonError> {
        r.skip_no_ops();
        r.read_u8()
    }

    /// Reads a tag followed by its payload.
    fn read_value(&self, r: &mut Reader<'_>, depth: usize) -> Result<UbjsonValue, UbjsonError> {
        let b = self.read_marker(r)?;
        let offset = r.position() - 1;
        let tag = Tag::from_byte(b).ok_or(UbjsonError::UnsupportedWireType { tag: b, offset })?;
        self.read_payload(r, tag, depth)
    }

    /// Reads the payload for an already consumed `tag`.
    fn read_payload(
        &self,
        r: &mut Reader<'_>,
        tag: Tag,
        depth: usize,
    ) -> Result<UbjsonValue, UbjsonError> {
        match tag {
            Tag::NoOp => Ok(UbjsonValue::NoOp),
            Tag::Null => Ok(UbjsonValue::Null),
            Tag::True => Ok(UbjsonValue::Bool(true)),
            Tag::False => Ok(UbjsonValue::Bool(false)),
            Tag::Int8 | Tag::Uint8 | Tag::Int16 | Tag::Int32 => {
                Ok(UbjsonValue::Int(read_integer(r, tag)?))
            }
            Tag::Int64 => self.read_int64(r),
            Tag::Float32 => Ok(UbjsonValue::Float(f64::from(r.read_f32()?))),
            Tag::Float64 => Ok(UbjsonValue::Float(r.read_f64()?)),
            Tag::HighPrecision => self.read_high_precision(r),
            Tag::Char => {
                let offset = r.position();
                let b = r.read_u8()?;
                if !b.is_ascii() {
                    return Err(UbjsonError::InvalidUtf8(format!(
                        "char byte 0x{b:02X} at offset {offset} is not ASCII"
                    )));
                }
                Ok(UbjsonValue::String(char::from(b).to_string()))
            }
            Tag::String => Ok(UbjsonValue::String(self.read_string(r)?)),
            Tag::Array => {
                let depth = self.enter(depth)?;
                self.read_array(r, depth)
            }
            Tag::Object => {
                let depth = self.enter(depth)?;
                self.read_object(r, depth)
            }
        }
    }

    fn enter(&self, depth: usize) -> Result<usize, UbjsonError> {
        if depth >= self.options.max_depth {
            return Err(UbjsonError::DepthLimitExceeded(self.options.max_depth));
        }
        Ok(depth + 1)
    }

    fn read_int64(&self, r: &mut Reader<'_>) -> Result<UbjsonValue, UbjsonError> {
        let offset = r.position();
        let unsupported = || UbjsonError::UnsupportedWireType {
            tag: marker::INT_64,
            offset: offset - 1,
        };
        let handling = &self.options.int64_handling;
        if let Int64Handling::Error = handling {
            return Err(unsupported());
        }
        let mut raw = r.take(8)?;
        match handling {
            Int64Handling::Error => Err(unsupported()),
            Int64Handling::Skip => {
                tracing::debug!(offset, "skipping int64 value");
                Ok(UbjsonValue::NoOp)
            }
            Int64Handling::Raw => Ok(UbjsonValue::TypedArray(TypedArray::U8(raw.to_vec()))),
            Int64Handling::Integer => Ok(UbjsonValue::Int(raw.get_i64())),
            Int64Handling::Custom(handler) => handler.handle(r.buffer(), offset),
        }
    }

    fn read_high_precision(&self, r: &mut Reader<'_>) -> Result<UbjsonValue, UbjsonError> {
        let tag_offset = r.position() - 1;
        let unsupported = || UbjsonError::UnsupportedWireType {
            tag: marker::HIGH_PRECISION,
            offset: tag_offset,
        };
        let handling = &self.options.high_precision_number_handling;
        if let HighPrecisionHandling::Error = handling {
            return Err(unsupported());
        }
        let len = self.read_length(r)?;
        let offset = r.position();
        let text = r.take(len)?;
        match handling {
            HighPrecisionHandling::Error => Err(unsupported()),
            HighPrecisionHandling::Skip => {
                tracing::debug!(offset, len, "skipping high-precision number");
                Ok(UbjsonValue::NoOp)
            }
            HighPrecisionHandling::Raw => Ok(UbjsonValue::String(self.text.decode(text)?)),
            HighPrecisionHandling::Custom(handler) => handler.handle(r.buffer(), offset, len),
        }
    }

    /// Reads a length-prefixed string (also the form of object keys).
    fn read_string(&self, r: &mut Reader<'_>) -> Result<String, UbjsonError> {
        let len = self.read_length(r)?;
        let bytes = r.take(len)?;
        self.text.decode(bytes)
    }

    fn read_length(&self, r: &mut Reader<'_>) -> Result<usize, UbjsonError> {
        let b = self.read_marker(r)?;
        let offset = r.position() - 1;
        let n = match Tag::from_byte(b) {
            Some(tag) if tag.is_integer() => read_integer(r, tag)?,
            _ => return Err(UbjsonError::UnsupportedWireType { tag: b, offset }),
        };
        usize::try_from(n).map_err(|_| UbjsonError::InvalidLength(n))
    }

    fn read_count(&self, r: &mut Reader<'_>) -> Result<usize, UbjsonError> {
        let b = self.read_marker(r)?;
        let offset = r.position() - 1;
        let n = match Tag::from_byte(b) {
            Some(tag) if tag.is_integer() => read_integer(r, tag)?,
            _ => {
                return Err(UbjsonError::MalformedContainerHeader(format!(
                    "count at offset {offset} has non-integer type 0x{b:02X}"
                )));
            }
        };
        usize::try_from(n).map_err(|_| {
            UbjsonError::MalformedContainerHeader(format!("negative count {n} at offset {offset}"))
        })
    }

    /// Reads the optional `$`/`#` header after an opening marker.
    fn read_header(&self, r: &mut Reader<'_>) -> Result<Header, UbjsonError> {
        if r.next_if(marker::TYPE) {
            let offset = r.position();
            let b = r.read_u8()?;
            let tag = Tag::from_byte(b).ok_or(UbjsonError::UnsupportedWireType { tag: b, offset })?;
            if !r.next_if(marker::COUNT) {
                return Err(UbjsonError::MalformedContainerHeader(format!(
                    "type marker at offset {} is not followed by a count",
                    offset - 1
                )));
            }
            let count = self.read_count(r)?;
            tracing::trace!(%tag, count, "strongly typed container");
            Ok(Header::Typed { tag, count })
        } else if r.next_if(marker::COUNT) {
            let count = self.read_count(r)?;
            tracing::trace!(count, "counted container");
            Ok(Header::Counted(count))
        } else {
            Ok(Header::Terminated)
        }
    }

    /// Payload-free elements cost no input bytes, so their count is capped.
    fn check_zero_width(&self, tag: Tag, count: usize) -> Result<(), UbjsonError> {
        let limit = self.options.max_zero_width_elements;
        if tag.is_zero_width() && count > limit {
            return Err(UbjsonError::MalformedContainerHeader(format!(
                "{count} elements of type {tag} exceed the limit of {limit}"
            )));
        }
        Ok(())
    }

    fn read_array(&self, r: &mut Reader<'_>, depth: usize) -> Result<UbjsonValue, UbjsonError> {
        let mut items = Vec::new();
        match self.read_header(r)? {
            Header::Typed { tag: Tag::NoOp, count } => {
                tracing::debug!(count, "skipping no-op typed array");
            }
            Header::Typed { tag, count } => {
                self.check_zero_width(tag, count)?;
                if self.options.use_typed_arrays {
                    if let Some(array) = read_typed_array(r, tag, count)? {
                        return Ok(UbjsonValue::TypedArray(array));
                    }
                }
                items.reserve(count.min(r.remaining()));
                for _ in 0..count {
                    push_present(&mut items, self.read_payload(r, tag, depth)?);
                }
            }
            Header::Counted(count) => {
                items.reserve(count.min(r.remaining()));
                for _ in 0..count {
                    push_present(&mut items, self.read_value(r, depth)?);
                }
            }
            Header::Terminated => loop {
                let b = self.read_marker(r)?;
                if b == marker::ARRAY_END {
                    break;
                }
                let offset = r.position() - 1;
                let tag =
                    Tag::from_byte(b).ok_or(UbjsonError::UnsupportedWireType { tag: b, offset })?;
                push_present(&mut items, self.read_payload(r, tag, depth)?);
            },
        }
        Ok(UbjsonValue::Array(items))
    }

    fn read_object(&self, r: &mut Reader<'_>, depth: usize) -> Result<UbjsonValue, UbjsonError> {
        let mut map = UbjsonMap::new();
        match self.read_header(r)? {
            Header::Typed { tag, count } => {
                for _ in 0..count {
                    let key = self.read_string(r)?;
                    insert_present(&mut map, key, self.read_payload(r, tag, depth)?);
                }
            }
            Header::Counted(count) => {
                for _ in 0..count {
                    let key = self.read_string(r)?;
                    insert_present(&mut map, key, self.read_value(r, depth)?);
                }
            }
            Header::Terminated => loop {
                r.skip_no_ops();
                if r.next_if(marker::OBJECT_END) {
                    break;
                }
                let key = self.read_string(r)?;
                insert_present(&mut map, key, self.read_value(r, depth)?);
            },
        }
        Ok(UbjsonValue::Object(map))
    }
}

/// Reads the payload of an integer tag.
fn read_integer(r: &mut Reader<'_>, tag: Tag) -> Result<i64, UbjsonError> {
    let offset = r.position();
    match tag {
        Tag::Int8 => Ok(i64::from(r.read_i8()?)),
        Tag::Uint8 => Ok(i64::from(r.read_u8()?)),
        Tag::Int16 => Ok(i64::from(r.read_i16()?)),
        Tag::Int32 => Ok(i64::from(r.read_i32()?)),
        Tag::Int64 => r.read_i64(),
        other => Err(UbjsonError::UnsupportedWireType {
            tag: other.as_byte(),
            offset,
        }),
    }
}

/// Reads `count` fixed-width numbers into a typed array. Returns `None` for
/// tags without a typed array form, leaving the reader untouched.
fn read_typed_array(
    r: &mut Reader<'_>,
    tag: Tag,
    count: usize,
) -> Result<Option<TypedArray>, UbjsonError> {
    let width = match tag {
        Tag::Int8 | Tag::Uint8 => 1,
        Tag::Int16 => 2,
        Tag::Int32 | Tag::Float32 => 4,
        Tag::Float64 => 8,
        _ => return Ok(None),
    };
    let len = count.checked_mul(width).ok_or_else(|| {
        UbjsonError::MalformedContainerHeader(format!("count {count} overflows buffer size"))
    })?;
    let bytes = r.take(len)?;
    let mut b = bytes;
    let array = match tag {
        Tag::Int8 => TypedArray::I8((0..count).map(|_| b.get_i8()).collect()),
        Tag::Uint8 => TypedArray::U8(bytes.to_vec()),
        Tag::Int16 => TypedArray::I16((0..count).map(|_| b.get_i16()).collect()),
        Tag::Int32 => TypedArray::I32((0..count).map(|_| b.get_i32()).collect()),
        Tag::Float32 => TypedArray::F32((0..count).map(|_| b.get_f32()).collect()),
        _ => TypedArray::F64((0..count).map(|_| b.get_f64()).collect()),
    };
    Ok(Some(array))
}

/// Skipped values (no-ops, skipped extended numbers) leave no element behind.
fn push_present(items: &mut Vec<UbjsonValue>, value: UbjsonValue) {
    if !value.is_no_op() {
        items.push(value);
    }
}

fn insert_present(map: &mut UbjsonMap, key: String, value: UbjsonValue) {
    if !value.is_no_op() {
        map.insert(key, value);
    }
}
