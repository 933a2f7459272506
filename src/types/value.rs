//! UBJSON value types.

use std::fmt;

use indexmap::IndexMap;

/// Type alias for UBJSON objects. Iteration follows insertion order, which
/// is also wire order.
pub type UbjsonMap = IndexMap<String, UbjsonValue>;

/// A dynamically typed value that can be written to or read from UBJSON.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UbjsonValue {
    /// The absent value, written as the no-op marker.
    #[default]
    NoOp,
    Null,
    Bool(bool),
    /// An integer. The wire width is the narrowest one that holds it.
    Int(i64),
    /// A number written as float32 when that is exact, float64 otherwise.
    Float(f64),
    /// A string. Single ASCII characters are written with the char tag.
    String(String),
    TypedArray(TypedArray),
    Array(Vec<UbjsonValue>),
    Object(UbjsonMap),
}

/// A homogeneous array of fixed-width numbers.
///
/// Encoded as a strongly typed container when array optimization is on and
/// produced by the decoder when `use_typed_arrays` is set.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedArray {
    I8(Vec<i8>),
    U8(Vec<u8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl TypedArray {
    pub fn len(&self) -> usize {
        match self {
            Self::I8(v) => v.len(),
            Self::U8(v) => v.len(),
            Self::I16(v) => v.len(),
            Self::I32(v) => v.len(),
            Self::F32(v) => v.len(),
            Self::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Expands the array into generic values, one per element.
    pub fn to_values(&self) -> Vec<UbjsonValue> {
        match self {
            Self::I8(v) => v.iter().map(|&x| UbjsonValue::Int(i64::from(x))).collect(),
            Self::U8(v) => v.iter().map(|&x| UbjsonValue::Int(i64::from(x))).collect(),
            Self::I16(v) => v.iter().map(|&x| UbjsonValue::Int(i64::from(x))).collect(),
            Self::I32(v) => v.iter().map(|&x| UbjsonValue::Int(i64::from(x))).collect(),
            Self::F32(v) => v.iter().map(|&x| UbjsonValue::Float(f64::from(x))).collect(),
            Self::F64(v) => v.iter().map(|&x| UbjsonValue::Float(x)).collect(),
        }
    }
}

impl UbjsonValue {
    /// Returns `true` for the absent (no-op) value.
    pub fn is_no_op(&self) -> bool {
        matches!(self, Self::NoOp)
    }

    /// Returns the value as a string reference, if it is a `String` variant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as an i64, if it is an `Int` variant.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as an f64 if it is numeric.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[UbjsonValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&UbjsonMap> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }
}

// -- Convenience conversions --

impl From<bool> for UbjsonValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for UbjsonValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for UbjsonValue {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for UbjsonValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<f32> for UbjsonValue {
    fn from(f: f32) -> Self {
        Self::Float(f64::from(f))
    }
}

impl From<String> for UbjsonValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for UbjsonValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<TypedArray> for UbjsonValue {
    fn from(a: TypedArray) -> Self {
        Self::TypedArray(a)
    }
}

impl From<Vec<UbjsonValue>> for UbjsonValue {
    fn from(v: Vec<UbjsonValue>) -> Self {
        Self::Array(v)
    }
}

impl From<UbjsonMap> for UbjsonValue {
    fn from(m: UbjsonMap) -> Self {
        Self::Object(m)
    }
}

impl<T: Into<UbjsonValue>> From<Option<T>> for UbjsonValue {
    fn from(o: Option<T>) -> Self {
        o.map_or(Self::Null, Into::into)
    }
}

impl fmt::Display for UbjsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoOp => write!(f, "undefined"),
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "\"{s}\""),
            Self::TypedArray(a) => write!(f, "<typed array of {}>", a.len()),
            Self::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Object(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}
