use std::ops::Range;

use crate::{errors::CompileError, field::FieldSpec, registry::FieldType};

/// A field with its position resolved.
///
/// `offset` is an element index into the window of `ty`, not a byte index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledField {
    pub name: String,
    pub ty: FieldType,
    pub count: usize,
    pub offset: usize,
}

impl CompiledField {
    /// Places `spec` at the first byte at or after `cursor` that is a multiple of its
    /// element width. Returns the field and the byte just past it.
    pub(crate) fn place(spec: &FieldSpec, cursor: usize) -> Result<(Self, usize), CompileError> {
        if spec.name.is_empty() {
            return Err(CompileError::InvalidFieldName);
        }
        if spec.count == 0 {
            return Err(CompileError::InvalidCount {
                field: spec.name.clone(),
            });
        }

        let width = spec.ty.width();
        let start = align_up(cursor, width).ok_or(CompileError::LayoutOverflow)?;
        let end = width
            .checked_mul(spec.count)
            .and_then(|len| start.checked_add(len))
            .ok_or(CompileError::LayoutOverflow)?;

        let field = CompiledField {
            name: spec.name.clone(),
            ty: spec.ty,
            count: spec.count,
            offset: start / width,
        };

        Ok((field, end))
    }

    pub fn is_scalar(&self) -> bool {
        self.count == 1
    }

    pub fn byte_offset(&self) -> usize {
        self.offset * self.ty.width()
    }

    pub fn byte_len(&self) -> usize {
        self.count * self.ty.width()
    }

    pub fn byte_range(&self) -> Range<usize> {
        let start = self.byte_offset();
        start..start + self.byte_len()
    }
}

/// Rounds `value` up to the next multiple of `align` (which must be non-zero).
pub(crate) fn align_up(value: usize, align: usize) -> Option<usize> {
    match value % align {
        0 => Some(value),
        rem => value.checked_add(align - rem),
    }
}
