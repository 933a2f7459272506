//! Encoder and decoder configuration.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::UbjsonError;
use crate::types::UbjsonValue;

/// Default limit on container nesting accepted by the decoder.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Default cap on the count of a strongly typed array of `Z`, `T` or `F`.
pub const DEFAULT_MAX_ZERO_WIDTH_ELEMENTS: usize = 65_536;

/// Controls when arrays are written in an optimized container form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptimizeArrays {
    /// Every array is written in terminator form.
    #[default]
    Off,
    /// Arrays get a count header, and a type header when their elements
    /// share a common type.
    On,
    /// Only typed arrays are optimized; plain arrays use terminator form.
    OnlyTypedArray,
}

impl From<bool> for OptimizeArrays {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

impl FromStr for OptimizeArrays {
    type Err = UbjsonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "false" | "off" => Ok(Self::Off),
            "true" | "on" => Ok(Self::On),
            "onlyTypedArray" | "onlyTypedArrays" => Ok(Self::OnlyTypedArray),
            other => Err(UbjsonError::InvalidOption(format!(
                "unknown optimizeArrays value: {other}"
            ))),
        }
    }
}

/// Options for [`crate::Encoder`].
#[derive(Debug, Clone, Default)]
pub struct EncoderOptions {
    pub optimize_arrays: OptimizeArrays,
    pub optimize_objects: bool,
    /// Write integers beyond int32 range with the int64 tag instead of
    /// falling back to a float. Off by default for compatibility with
    /// readers whose numbers are doubles.
    pub int64: bool,
}

impl EncoderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the array optimization mode.
    pub fn optimize_arrays(mut self, mode: impl Into<OptimizeArrays>) -> Self {
        self.optimize_arrays = mode.into();
        self
    }

    /// Enables count/type headers on objects.
    pub fn optimize_objects(mut self, on: bool) -> Self {
        self.optimize_objects = on;
        self
    }

    /// Enables exact int64 output for large integers.
    pub fn int64(mut self, on: bool) -> Self {
        self.int64 = on;
        self
    }
}

/// Replaces the payload of an int64 (`L`) value during decoding.
pub trait Int64Handler: Send + Sync {
    /// `offset` is the position of the first of the 8 payload bytes.
    fn handle(&self, buffer: &[u8], offset: usize) -> Result<UbjsonValue, UbjsonError>;
}

impl<F> Int64Handler for F
where
    F: Fn(&[u8], usize) -> Result<UbjsonValue, UbjsonError> + Send + Sync,
{
    fn handle(&self, buffer: &[u8], offset: usize) -> Result<UbjsonValue, UbjsonError> {
        self(buffer, offset)
    }
}

/// Replaces the payload of a high-precision (`H`) number during decoding.
pub trait HighPrecisionHandler: Send + Sync {
    /// `offset..offset + byte_length` holds the decimal text.
    fn handle(
        &self,
        buffer: &[u8],
        offset: usize,
        byte_length: usize,
    ) -> Result<UbjsonValue, UbjsonError>;
}

impl<F> HighPrecisionHandler for F
where
    F: Fn(&[u8], usize, usize) -> Result<UbjsonValue, UbjsonError> + Send + Sync,
{
    fn handle(
        &self,
        buffer: &[u8],
        offset: usize,
        byte_length: usize,
    ) -> Result<UbjsonValue, UbjsonError> {
        self(buffer, offset, byte_length)
    }
}

/// What the decoder does with int64 values.
#[derive(Clone, Default)]
pub enum Int64Handling {
    /// Fail with [`UbjsonError::UnsupportedWireType`].
    #[default]
    Error,
    /// Consume the payload and produce nothing.
    Skip,
    /// Produce the 8 payload bytes as a `u8` typed array.
    Raw,
    /// Produce an exact [`UbjsonValue::Int`].
    Integer,
    Custom(Arc<dyn Int64Handler>),
}

impl Int64Handling {
    pub fn custom(handler: impl Int64Handler + 'static) -> Self {
        Self::Custom(Arc::new(handler))
    }
}

impl fmt::Debug for Int64Handling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "Error"),
            Self::Skip => write!(f, "Skip"),
            Self::Raw => write!(f, "Raw"),
            Self::Integer => write!(f, "Integer"),
            Self::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl FromStr for Int64Handling {
    type Err = UbjsonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(Self::Error),
            "skip" => Ok(Self::Skip),
            "raw" => Ok(Self::Raw),
            "integer" => Ok(Self::Integer),
            other => Err(UbjsonError::InvalidOption(format!(
                "unknown int64Handling value: {other}"
            ))),
        }
    }
}

/// What the decoder does with high-precision numbers.
#[derive(Clone, Default)]
pub enum HighPrecisionHandling {
    /// Fail with [`UbjsonError::UnsupportedWireType`].
    #[default]
    Error,
    /// Consume the payload and produce nothing.
    Skip,
    /// Produce the decimal text as a [`UbjsonValue::String`].
    Raw,
    Custom(Arc<dyn HighPrecisionHandler>),
}

impl HighPrecisionHandling {
    pub fn custom(handler: impl HighPrecisionHandler + 'static) -> Self {
        Self::Custom(Arc::new(handler))
    }
}

impl fmt::Debug for HighPrecisionHandling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "Error"),
            Self::Skip => write!(f, "Skip"),
            Self::Raw => write!(f, "Raw"),
            Self::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl FromStr for HighPrecisionHandling {
    type Err = UbjsonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(Self::Error),
            "skip" => Ok(Self::Skip),
            "raw" => Ok(Self::Raw),
            other => Err(UbjsonError::InvalidOption(format!(
                "unknown highPrecisionNumberHandling value: {other}"
            ))),
        }
    }
}

/// Options for [`crate::Decoder`].
#[derive(Debug, Clone)]
pub struct DecoderOptions {
    pub int64_handling: Int64Handling,
    pub high_precision_number_handling: HighPrecisionHandling,
    /// Produce [`crate::TypedArray`] for strongly typed numeric containers.
    pub use_typed_arrays: bool,
    pub max_depth: usize,
    /// Largest count accepted for a strongly typed array whose elements
    /// carry no payload bytes.
    pub max_zero_width_elements: usize,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            int64_handling: Int64Handling::default(),
            high_precision_number_handling: HighPrecisionHandling::default(),
            use_typed_arrays: false,
            max_depth: DEFAULT_MAX_DEPTH,
            max_zero_width_elements: DEFAULT_MAX_ZERO_WIDTH_ELEMENTS,
        }
    }
}

impl DecoderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn int64_handling(mut self, handling: Int64Handling) -> Self {
        self.int64_handling = handling;
        self
    }

    pub fn high_precision_number_handling(mut self, handling: HighPrecisionHandling) -> Self {
        self.high_precision_number_handling = handling;
        self
    }

    pub fn use_typed_arrays(mut self, on: bool) -> Self {
        self.use_typed_arrays = on;
        self
    }

    /// Sets the maximum container nesting depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn max_zero_width_elements(mut self, limit: usize) -> Self {
        self.max_zero_width_elements = limit;
        self
    }
}
