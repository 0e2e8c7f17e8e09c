//! Error types for layout compilation, buffer validation and field writes.

use thiserror::Error;

use crate::registry::FieldType;

/// Errors produced when compiling [crate::field::FieldSpec]s into a [crate::layout::StructLayout].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// Field type name is not in the registry.
    #[error("unknown field type `{0}`")]
    UnknownType(String),
    /// Field name is empty.
    #[error("field name must not be empty")]
    InvalidFieldName,
    /// Two fields share the same name.
    #[error("duplicate field `{0}`")]
    DuplicateField(String),
    /// Element count is zero.
    #[error("field `{field}` must have a count of at least 1")]
    InvalidCount { field: String },
    /// Total size does not fit in `usize`.
    #[error("layout size overflows usize")]
    LayoutOverflow,
}

/// Errors produced when a buffer cannot hold a layout (during decode and encode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ViewError {
    /// Buffer is shorter than the layout's total size.
    #[error("insufficient space: layout needs {needed} bytes, buffer has {available}")]
    InsufficientSpace { needed: usize, available: usize },
    /// Region does not start on a multiple of the layout's alignment within its store.
    #[error("misaligned buffer: byte offset {byte_offset} is not a multiple of {alignment}")]
    MisalignedBuffer { byte_offset: usize, alignment: usize },
}

/// Errors produced when assigning values to a [crate::instance::StructInstance].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteError {
    /// No field with this name exists in the layout.
    #[error("unknown field `{0}`")]
    UnknownField(String),
    /// Value type differs from the field's element type.
    #[error("type mismatch: expected {expected}, got {found}")]
    TypeMismatch { expected: FieldType, found: FieldType },
    /// Field holds a sequence, not a single value.
    #[error("field `{0}` is not a scalar")]
    NotScalar(String),
    /// Field holds a single value, not a sequence.
    #[error("field `{0}` is not a sequence")]
    NotSequence(String),
    /// Element index is past the end of a sequence.
    #[error("index {index} out of bounds for sequence of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    /// Slice length differs from the field's element count.
    #[error("length mismatch: expected {expected} elements, got {got}")]
    LengthMismatch { expected: usize, got: usize },
    /// Number cannot be represented by the target type.
    #[error("value cannot be represented as {0}")]
    InvalidValue(FieldType),
}
