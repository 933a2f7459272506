//! UBJSON marker byte constants.

// Null and no-op
pub const NULL: u8 = b'Z';
pub const NO_OP: u8 = b'N';

// Boolean
pub const TRUE: u8 = b'T';
pub const FALSE: u8 = b'F';

// Integer
pub const INT_8: u8 = b'i';
pub const UINT_8: u8 = b'U';
pub const INT_16: u8 = b'I';
pub const INT_32: u8 = b'l';
pub const INT_64: u8 = b'L';

// Float (IEEE 754)
pub const FLOAT_32: u8 = b'd';
pub const FLOAT_64: u8 = b'D';

// High-precision number: length-prefixed decimal text
pub const HIGH_PRECISION: u8 = b'H';

// Char (single ASCII byte) and string (length-prefixed UTF-8)
pub const CHAR: u8 = b'C';
pub const STRING: u8 = b'S';

// Containers
pub const ARRAY_START: u8 = b'[';
pub const ARRAY_END: u8 = b']';
pub const OBJECT_START: u8 = b'{';
pub const OBJECT_END: u8 = b'}';

// Container optimization headers
pub const TYPE: u8 = b'$';
pub const COUNT: u8 = b'#';
