//! UBJSON encoding: `UbjsonValue` → bytes.

use std::borrow::Cow;

use bytes::Bytes;

use super::marker;
use super::plan::{Instruction, WritePlan};
use crate::error::UbjsonError;
use crate::options::{EncoderOptions, OptimizeArrays};
use crate::text::{TextCodec, Utf8};
use crate::types::{
    classify, classify_int, common_type, Tag, TypedArray, UbjsonMap, UbjsonValue,
};

/// A container element waiting to be planned.
struct Entry<'a> {
    key: Option<&'a str>,
    tag: Tag,
    value: &'a UbjsonValue,
}

/// Encodes value trees with a fixed set of options.
///
/// Each call walks the tree once into a write plan, then allocates the
/// output buffer at its final size and fills it in one pass.
#[derive(Debug, Clone, Default)]
pub struct Encoder<T = Utf8> {
    options: EncoderOptions,
    text: T,
}

impl Encoder<Utf8> {
    pub fn new(options: EncoderOptions) -> Self {
        Self {
            options,
            text: Utf8,
        }
    }
}

impl<T: TextCodec> Encoder<T> {
    /// Creates an encoder that writes strings through `text`.
    pub fn with_text_codec(options: EncoderOptions, text: T) -> Self {
        Self { options, text }
    }

    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    /// Encodes a value. Nothing is returned unless the whole tree encodes.
    pub fn encode(&self, value: &UbjsonValue) -> Result<Bytes, UbjsonError> {
        let mut plan = WritePlan::default();
        self.plan_value(&mut plan, value)?;
        Ok(plan.execute())
    }

    /// Tag for a value under the active options.
    fn tag_of(&self, value: &UbjsonValue) -> Tag {
        match value {
            UbjsonValue::Int(i) if self.options.int64 && classify_int(*i).is_none() => Tag::Int64,
            _ => classify(value),
        }
    }

    fn plan_value<'a>(
        &self,
        plan: &mut WritePlan<'a>,
        value: &'a UbjsonValue,
    ) -> Result<(), UbjsonError> {
        let tag = self.tag_of(value);
        plan.marker(tag.as_byte());
        self.plan_payload(plan, value, tag)
    }

    /// Plans the payload of `value` as written under `tag`, which may be wider
    /// than the value's own tag when it is a container's common type.
    fn plan_payload<'a>(
        &self,
        plan: &mut WritePlan<'a>,
        value: &'a UbjsonValue,
        tag: Tag,
    ) -> Result<(), UbjsonError> {
        match (tag, value) {
            (Tag::NoOp | Tag::Null | Tag::True | Tag::False, _) => Ok(()),
            (Tag::Char, UbjsonValue::String(s)) if s.len() == 1 => {
                plan.push(Instruction::U8(s.as_bytes()[0]));
                Ok(())
            }
            (Tag::String, UbjsonValue::String(s)) => self.plan_string(plan, s),
            (Tag::Array, UbjsonValue::Array(items)) => self.plan_array(plan, items),
            (Tag::Array, UbjsonValue::TypedArray(array)) => self.plan_typed_array(plan, array),
            (Tag::Object, UbjsonValue::Object(map)) => self.plan_object(plan, map),
            _ => {
                plan.push(number_instruction(value, tag)?);
                Ok(())
            }
        }
    }

    /// Plans a tagged integer, as used for lengths and counts.
    fn plan_int(&self, plan: &mut WritePlan<'_>, n: usize) -> Result<(), UbjsonError> {
        let value = i64::try_from(n)
            .map_err(|_| UbjsonError::UnsupportedValueKind(format!("size {n} out of range")))?;
        let tag = match classify_int(value) {
            Some(tag) => tag,
            None if self.options.int64 => Tag::Int64,
            None => {
                return Err(UbjsonError::UnsupportedValueKind(format!(
                    "size {n} exceeds int32 range"
                )));
            }
        };
        plan.marker(tag.as_byte());
        plan.push(number_instruction(&UbjsonValue::Int(value), tag)?);
        Ok(())
    }

    /// Plans a length-prefixed string without its tag. Object keys use this
    /// directly.
    fn plan_string<'a>(&self, plan: &mut WritePlan<'a>, s: &'a str) -> Result<(), UbjsonError> {
        let bytes = self.text.encode(s);
        self.plan_int(plan, bytes.len())?;
        plan.push(Instruction::Bytes(bytes));
        Ok(())
    }

    fn plan_array<'a>(
        &self,
        plan: &mut WritePlan<'a>,
        items: &'a [UbjsonValue],
    ) -> Result<(), UbjsonError> {
        let entries = items
            .iter()
            .filter(|v| !v.is_no_op())
            .map(|value| Entry {
                key: None,
                tag: self.tag_of(value),
                value,
            })
            .collect();
        let optimize = self.options.optimize_arrays == OptimizeArrays::On;
        self.plan_container(plan, entries, marker::ARRAY_END, optimize)
    }

    fn plan_object<'a>(
        &self,
        plan: &mut WritePlan<'a>,
        map: &'a UbjsonMap,
    ) -> Result<(), UbjsonError> {
        let entries = map
            .iter()
            .filter(|(_, v)| !v.is_no_op())
            .map(|(key, value)| Entry {
                key: Some(key.as_str()),
                tag: self.tag_of(value),
                value,
            })
            .collect();
        self.plan_container(plan, entries, marker::OBJECT_END, self.options.optimize_objects)
    }

    fn plan_container<'a>(
        &self,
        plan: &mut WritePlan<'a>,
        entries: Vec<Entry<'a>>,
        terminator: u8,
        optimize: bool,
    ) -> Result<(), UbjsonError> {
        let common = if optimize {
            common_type(entries.iter().map(|e| (e.tag, e.value)))
        } else {
            None
        };
        tracing::trace!(
            count = entries.len(),
            optimize,
            common_type = ?common,
            "planning container"
        );

        if optimize {
            self.plan_header(plan, common, entries.len())?;
        }
        for entry in &entries {
            if let Some(key) = entry.key {
                self.plan_string(plan, key)?;
            }
            match common {
                Some(tag) => self.plan_payload(plan, entry.value, tag)?,
                None => {
                    plan.marker(entry.tag.as_byte());
                    self.plan_payload(plan, entry.value, entry.tag)?;
                }
            }
        }
        if !optimize {
            plan.marker(terminator);
        }
        Ok(())
    }

    /// Plans `$ <tag> # <count>`, or `# <count>` without a common type.
    fn plan_header(
        &self,
        plan: &mut WritePlan<'_>,
        tag: Option<Tag>,
        count: usize,
    ) -> Result<(), UbjsonError> {
        if let Some(tag) = tag {
            plan.marker(marker::TYPE);
            plan.marker(tag.as_byte());
        }
        plan.marker(marker::COUNT);
        self.plan_int(plan, count)
    }

    /// Typed arrays skip per-element inference: with optimization on they are
    /// always strongly typed, and 8-bit arrays are copied in bulk.
    fn plan_typed_array<'a>(
        &self,
        plan: &mut WritePlan<'a>,
        array: &'a TypedArray,
    ) -> Result<(), UbjsonError> {
        if self.options.optimize_arrays == OptimizeArrays::Off {
            for value in array.to_values() {
                let tag = self.tag_of(&value);
                plan.marker(tag.as_byte());
                plan.push(number_instruction(&value, tag)?);
            }
            plan.marker(marker::ARRAY_END);
            return Ok(());
        }

        let tag = match array {
            TypedArray::I8(_) => Tag::Int8,
            TypedArray::U8(_) => Tag::Uint8,
            TypedArray::I16(_) => Tag::Int16,
            TypedArray::I32(_) => Tag::Int32,
            TypedArray::F32(_) => Tag::Float32,
            TypedArray::F64(_) => Tag::Float64,
        };
        self.plan_header(plan, Some(tag), array.len())?;
        match array {
            TypedArray::I8(v) => {
                let bytes = v.iter().map(|&x| x as u8).collect();
                plan.push(Instruction::Bytes(Cow::Owned(bytes)));
            }
            TypedArray::U8(v) => plan.push(Instruction::Bytes(Cow::Borrowed(v.as_slice()))),
            TypedArray::I16(v) => v.iter().for_each(|&x| plan.push(Instruction::I16(x))),
            TypedArray::I32(v) => v.iter().for_each(|&x| plan.push(Instruction::I32(x))),
            TypedArray::F32(v) => v.iter().for_each(|&x| plan.push(Instruction::F32(x))),
            TypedArray::F64(v) => v.iter().for_each(|&x| plan.push(Instruction::F64(x))),
        }
        Ok(())
    }
}

/// Fixed-width payload of a number written under a numeric tag.
fn number_instruction(value: &UbjsonValue, tag: Tag) -> Result<Instruction<'static>, UbjsonError> {
    let mismatch =
        || UbjsonError::UnsupportedValueKind(format!("{value} cannot be written as {tag}"));
    let instruction = match (tag, value) {
        (Tag::Int8, UbjsonValue::Int(i)) => {
            Instruction::I8(i8::try_from(*i).map_err(|_| mismatch())?)
        }
        (Tag::Uint8, UbjsonValue::Int(i)) => {
            Instruction::U8(u8::try_from(*i).map_err(|_| mismatch())?)
        }
        (Tag::Int16, UbjsonValue::Int(i)) => {
            Instruction::I16(i16::try_from(*i).map_err(|_| mismatch())?)
        }
        (Tag::Int32, UbjsonValue::Int(i)) => {
            Instruction::I32(i32::try_from(*i).map_err(|_| mismatch())?)
        }
        (Tag::Int64, UbjsonValue::Int(i)) => Instruction::I64(*i),
        (Tag::Float32, UbjsonValue::Int(i)) => Instruction::F32(*i as f32),
        (Tag::Float32, UbjsonValue::Float(f)) => Instruction::F32(*f as f32),
        (Tag::Float64, UbjsonValue::Int(i)) => Instruction::F64(*i as f64),
        (Tag::Float64, UbjsonValue::Float(f)) => Instruction::F64(*f),
        _ => return Err(mismatch()),
    };
    Ok(instruction)
}
