//! Forward-only read cursor over an input slice.

use bytes::Buf;

use crate::error::UbjsonError;
use crate::wire::marker;

/// Owns the read position for one decode call. Multi-byte values are
/// assembled byte-wise through [`Buf`], so no alignment is assumed.
pub(crate) struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// The whole input, as handed to custom number handlers.
    pub(crate) fn buffer(&self) -> &'a [u8] {
        self.buf
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn ensure_remaining(&self, needed: usize) -> Result<(), UbjsonError> {
        if self.remaining() < needed {
            Err(UbjsonError::UnexpectedEndOfInput {
                needed,
                remaining: self.remaining(),
            })
        } else {
            Ok(())
        }
    }

    /// Consumes and returns the next `len` bytes.
    pub(crate) fn take(&mut self, len: usize) -> Result<&'a [u8], UbjsonError> {
        self.ensure_remaining(len)?;
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub(crate) fn peek_u8(&self) -> Option<u8> {
        self.buf.get(self.pos).copied()
    }

    /// Consumes the next byte if it equals `b`.
    pub(crate) fn next_if(&mut self, b: u8) -> bool {
        if self.peek_u8() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consumes any run of no-op markers.
    pub(crate) fn skip_no_ops(&mut self) {
        while self.next_if(marker::NO_OP) {}
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, UbjsonError> {
        Ok(self.take(1)?.get_u8())
    }

    pub(crate) fn read_i8(&mut self) -> Result<i8, UbjsonError> {
        Ok(self.take(1)?.get_i8())
    }

    pub(crate) fn read_i16(&mut self) -> Result<i16, UbjsonError> {
        Ok(self.take(2)?.get_i16())
    }

    pub(crate) fn read_i32(&mut self) -> Result<i32, UbjsonError> {
        Ok(self.take(4)?.get_i32())
    }

    pub(crate) fn read_i64(&mut self) -> Result<i64, UbjsonError> {
        Ok(self.take(8)?.get_i64())
    }

    pub(crate) fn read_f32(&mut self) -> Result<f32, UbjsonError> {
        Ok(self.take(4)?.get_f32())
    }

    pub(crate) fn read_f64(&mut self) -> Result<f64, UbjsonError> {
        Ok(self.take(8)?.get_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_big_endian_at_odd_offsets() {
        let data = [0x00, 0x12, 0x34, 0x56, 0x78];
        let mut r = Reader::new(&data);
        assert_eq!(r.read_u8().unwrap(), 0x00);
        assert_eq!(r.read_i32().unwrap(), 0x12345678);
        assert!(r.is_empty());
    }

    #[test]
    fn truncated_read_reports_shortfall() {
        let mut r = Reader::new(&[0x01]);
        assert_eq!(
            r.read_i16().unwrap_err(),
            UbjsonError::UnexpectedEndOfInput {
                needed: 2,
                remaining: 1
            }
        );
        // A failed read does not move the cursor.
        assert_eq!(r.position(), 0);
    }

    #[test]
    fn skips_no_op_runs() {
        let mut r = Reader::new(b"NNNZ");
        r.skip_no_ops();
        assert_eq!(r.position(), 3);
        assert!(r.next_if(b'Z'));
        assert!(!r.next_if(b'Z'));
    }
}
