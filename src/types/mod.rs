//! UBJSON value types and the wire tag vocabulary.

mod tag;
mod value;

pub use tag::{classify, reduce_common_type, Tag};
pub(crate) use tag::{classify_int, common_type};
pub use value::{TypedArray, UbjsonMap, UbjsonValue};
