//! Two-pass write plan: size everything first, then fill one buffer.

use std::borrow::Cow;

use bytes::{BufMut, Bytes, BytesMut};

/// One sized unit of output. Byte payloads may borrow from the value being
/// encoded; every other instruction owns its data.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Instruction<'a> {
    Marker(u8),
    I8(i8),
    U8(u8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Bytes(Cow<'a, [u8]>),
}

impl Instruction<'_> {
    pub(crate) fn byte_len(&self) -> usize {
        match self {
            Self::Marker(_) | Self::I8(_) | Self::U8(_) => 1,
            Self::I16(_) => 2,
            Self::I32(_) | Self::F32(_) => 4,
            Self::I64(_) | Self::F64(_) => 8,
            Self::Bytes(b) => b.len(),
        }
    }

    /// Appends the big-endian bytes of this instruction.
    fn store(&self, buf: &mut BytesMut) {
        match self {
            Self::Marker(m) => buf.put_u8(*m),
            Self::I8(v) => buf.put_i8(*v),
            Self::U8(v) => buf.put_u8(*v),
            Self::I16(v) => buf.put_i16(*v),
            Self::I32(v) => buf.put_i32(*v),
            Self::I64(v) => buf.put_i64(*v),
            Self::F32(v) => buf.put_f32(*v),
            Self::F64(v) => buf.put_f64(*v),
            Self::Bytes(b) => buf.put_slice(b),
        }
    }
}

/// An ordered list of instructions built by one encode call.
#[derive(Debug, Default)]
pub(crate) struct WritePlan<'a> {
    instructions: Vec<Instruction<'a>>,
}

impl<'a> WritePlan<'a> {
    pub(crate) fn push(&mut self, instruction: Instruction<'a>) {
        self.instructions.push(instruction);
    }

    pub(crate) fn marker(&mut self, m: u8) {
        self.push(Instruction::Marker(m));
    }

    /// Total output size in bytes.
    pub(crate) fn byte_len(&self) -> usize {
        self.instructions.iter().map(Instruction::byte_len).sum()
    }

    /// Allocates the output once and writes every instruction in order.
    pub(crate) fn execute(&self) -> Bytes {
        let size = self.byte_len();
        let mut buf = BytesMut::with_capacity(size);
        for instruction in &self.instructions {
            instruction.store(&mut buf);
        }
        debug_assert_eq!(buf.len(), size, "plan size mismatch");
        buf.freeze()
    }
}
