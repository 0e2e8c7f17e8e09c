//! Declaration-order field descriptions used to build a [crate::layout::StructLayout].

use crate::{errors::CompileError, registry::FieldType};

/// A single named field: `count` consecutive elements of type `ty`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Element type.
    pub ty: FieldType,
    /// Name used to access the field; unique within a layout.
    pub name: String,
    /// Number of elements. 1 makes a scalar field, more makes a fixed-length sequence.
    pub count: usize,
}

impl FieldSpec {
    pub fn new(ty: FieldType, name: impl Into<String>, count: usize) -> Self {
        FieldSpec {
            ty,
            name: name.into(),
            count,
        }
    }

    pub fn scalar(ty: FieldType, name: impl Into<String>) -> Self {
        Self::new(ty, name, 1)
    }

    pub fn array(ty: FieldType, name: impl Into<String>, count: usize) -> Self {
        Self::new(ty, name, count)
    }

    /// Builds a field from a textual type name. Fails with [CompileError::UnknownType].
    pub fn parse(type_name: &str, name: impl Into<String>, count: usize) -> Result<Self, CompileError> {
        Ok(Self::new(type_name.parse()?, name, count))
    }

    /// Whether this field holds a single value.
    pub fn is_scalar(&self) -> bool {
        self.count == 1
    }
}

#[cfg(feature = "serde")]
impl TryFrom<crate::serde::FieldDef> for FieldSpec {
    type Error = CompileError;

    fn try_from(value: crate::serde::FieldDef) -> Result<Self, Self::Error> {
        Self::parse(&value.ty, value.name, value.count)
    }
}
