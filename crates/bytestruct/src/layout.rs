//! StructLayout: the compiled, immutable placement of a field list.

use std::collections::HashMap;

use tracing::debug;

use crate::{
    compiled::{CompiledField, align_up},
    errors::CompileError,
    field::FieldSpec,
    registry::FieldType,
};

/// Field offsets, total size and alignment of a fixed-layout binary record.
///
/// Built once with [StructLayout::compile], then shared (usually behind an
/// [std::sync::Arc]) by every instantiate, decode and encode call.
#[derive(Debug, Clone)]
pub struct StructLayout {
    total_size: usize,
    alignment: usize,
    fields: Vec<CompiledField>,
    index: HashMap<String, usize>,
}

impl StructLayout {
    /// Compiles `fields` in declaration order, inserting padding so that every field
    /// starts on a multiple of its element width and the total size is a multiple of
    /// the largest width.
    ///
    /// An empty field list yields a zero-sized layout with alignment 1.
    pub fn compile(fields: &[FieldSpec]) -> Result<Self, CompileError> {
        let mut compiled_fields: Vec<CompiledField> = Vec::with_capacity(fields.len());
        let mut index = HashMap::with_capacity(fields.len());
        let mut cursor = 0;
        let mut alignment = 1;

        for spec in fields {
            if index.contains_key(&spec.name) {
                debug!(field = %spec.name, "rejecting duplicate field");
                return Err(CompileError::DuplicateField(spec.name.clone()));
            }

            let (compiled_field, end) = CompiledField::place(spec, cursor)?;

            cursor = end;
            alignment = alignment.max(spec.ty.width());
            index.insert(spec.name.clone(), compiled_fields.len());
            compiled_fields.push(compiled_field);
        }

        let total_size = align_up(cursor, alignment).ok_or(CompileError::LayoutOverflow)?;

        debug!(
            fields = compiled_fields.len(),
            total_size, alignment, "compiled struct layout"
        );

        Ok(Self {
            total_size,
            alignment,
            fields: compiled_fields,
            index,
        })
    }

    /// Size in bytes, padding included.
    pub fn total_size(&self) -> usize {
        self.total_size
    }

    /// Largest element width among the fields; required divisor of a buffer's start offset.
    pub fn alignment(&self) -> usize {
        self.alignment
    }

    /// Compiled fields in declaration order.
    pub fn fields(&self) -> &[CompiledField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&CompiledField> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Distinct element types used by the fields, in order of first use.
    pub fn field_types(&self) -> Vec<FieldType> {
        let mut types: Vec<FieldType> = Vec::new();

        for field in &self.fields {
            if !types.contains(&field.ty) {
                types.push(field.ty);
            }
        }

        types
    }
}

#[cfg(feature = "serde")]
impl TryFrom<crate::serde::LayoutDef> for StructLayout {
    type Error = CompileError;

    fn try_from(value: crate::serde::LayoutDef) -> Result<Self, Self::Error> {
        let fields = value
            .fields
            .into_iter()
            .map(FieldSpec::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        StructLayout::compile(&fields)
    }
}
