//! Wire type tags and the type inference rules used by the encoder.

use std::fmt;

use super::UbjsonValue;
use crate::wire::marker;

/// One-byte discriminator identifying the wire shape of a value.
///
/// Structural markers (`$`, `#`, `]`, `}`) are not value tags and live in
/// [`crate::wire::marker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tag {
    Null = marker::NULL,
    NoOp = marker::NO_OP,
    True = marker::TRUE,
    False = marker::FALSE,
    Int8 = marker::INT_8,
    Uint8 = marker::UINT_8,
    Int16 = marker::INT_16,
    Int32 = marker::INT_32,
    Int64 = marker::INT_64,
    Float32 = marker::FLOAT_32,
    Float64 = marker::FLOAT_64,
    HighPrecision = marker::HIGH_PRECISION,
    Char = marker::CHAR,
    String = marker::STRING,
    Array = marker::ARRAY_START,
    Object = marker::OBJECT_START,
}

impl Tag {
    /// Returns the marker byte written for this tag.
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// Looks up the tag for a marker byte. Structural markers return `None`.
    pub const fn from_byte(b: u8) -> Option<Self> {
        Some(match b {
            marker::NULL => Self::Null,
            marker::NO_OP => Self::NoOp,
            marker::TRUE => Self::True,
            marker::FALSE => Self::False,
            marker::INT_8 => Self::Int8,
            marker::UINT_8 => Self::Uint8,
            marker::INT_16 => Self::Int16,
            marker::INT_32 => Self::Int32,
            marker::INT_64 => Self::Int64,
            marker::FLOAT_32 => Self::Float32,
            marker::FLOAT_64 => Self::Float64,
            marker::HIGH_PRECISION => Self::HighPrecision,
            marker::CHAR => Self::Char,
            marker::STRING => Self::String,
            marker::ARRAY_START => Self::Array,
            marker::OBJECT_START => Self::Object,
            _ => return None,
        })
    }

    /// Returns `true` for the integer tags usable as lengths and counts.
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::Int8 | Self::Uint8 | Self::Int16 | Self::Int32 | Self::Int64
        )
    }

    /// Returns `true` for tags whose value is the marker alone.
    pub const fn is_zero_width(self) -> bool {
        matches!(self, Self::Null | Self::NoOp | Self::True | Self::False)
    }
}

impl TryFrom<u8> for Tag {
    type Error = u8;

    fn try_from(b: u8) -> Result<Self, u8> {
        Self::from_byte(b).ok_or(b)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", char::from(self.as_byte()))
    }
}

// Widening orders: a pair from the same order reduces to whichever of the two
// comes first.
const FLOAT_ORDER: [Tag; 2] = [Tag::Float64, Tag::Float32];
const STRING_ORDER: [Tag; 2] = [Tag::String, Tag::Char];
const INTEGER_ORDER: [Tag; 4] = [Tag::Int32, Tag::Int16, Tag::Uint8, Tag::Int8];

/// Returns the tag a value is written with.
///
/// Integers take the narrowest width in the fixed order int8, uint8, int16,
/// int32. Integers outside int32 range are classified as floats, which is
/// lossy for magnitudes above 2^53.
pub fn classify(value: &UbjsonValue) -> Tag {
    match value {
        UbjsonValue::NoOp => Tag::NoOp,
        UbjsonValue::Null => Tag::Null,
        UbjsonValue::Bool(true) => Tag::True,
        UbjsonValue::Bool(false) => Tag::False,
        UbjsonValue::Int(i) => classify_int(*i).unwrap_or_else(|| classify_float(*i as f64)),
        UbjsonValue::Float(f) => classify_float(*f),
        UbjsonValue::String(s) => classify_str(s),
        UbjsonValue::TypedArray(_) | UbjsonValue::Array(_) => Tag::Array,
        UbjsonValue::Object(_) => Tag::Object,
    }
}

/// Narrowest integer tag holding `i`, or `None` beyond int32 range.
pub(crate) fn classify_int(i: i64) -> Option<Tag> {
    if (-128..=127).contains(&i) {
        Some(Tag::Int8)
    } else if (0..=255).contains(&i) {
        Some(Tag::Uint8)
    } else if i64::from(i16::MIN) <= i && i <= i64::from(i16::MAX) {
        Some(Tag::Int16)
    } else if i64::from(i32::MIN) <= i && i <= i64::from(i32::MAX) {
        Some(Tag::Int32)
    } else {
        None
    }
}

/// NaN and values that survive a round trip through f32 are float32.
fn classify_float(f: f64) -> Tag {
    if f.is_nan() || f64::from(f as f32) == f {
        Tag::Float32
    } else {
        Tag::Float64
    }
}

fn classify_str(s: &str) -> Tag {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Tag::Char,
        _ => Tag::String,
    }
}

/// Returns the more general of two tags, or `None` when they share no order.
pub fn reduce_common_type(a: Tag, b: Tag) -> Option<Tag> {
    if a == b {
        return Some(a);
    }
    [&FLOAT_ORDER[..], &STRING_ORDER[..], &INTEGER_ORDER[..]]
        .into_iter()
        .find_map(|order| {
            let x = order.iter().position(|&t| t == a)?;
            let y = order.iter().position(|&t| t == b)?;
            Some(order[x.min(y)])
        })
}

/// Finds one tag able to carry every value of a container.
///
/// Empty input has no common type. A `U` result is promoted to `I` when any
/// value is negative, since a negative int8 must not be read back unsigned.
pub(crate) fn common_type<'a, I>(entries: I) -> Option<Tag>
where
    I: IntoIterator<Item = (Tag, &'a UbjsonValue)>,
{
    let mut common = None;
    let mut any_negative = false;
    for (tag, value) in entries {
        common = match common {
            None => Some(tag),
            Some(acc) => Some(reduce_common_type(acc, tag)?),
        };
        any_negative |= matches!(value, UbjsonValue::Int(i) if *i < 0);
    }
    match common {
        Some(Tag::Uint8) if any_negative => Some(Tag::Int16),
        other => other,
    }
}
