//! Live field values bound to a layout.

use std::{cell::Cell, sync::Arc};

use crate::{
    errors::WriteError, layout::StructLayout, registry::FieldType, value::Scalar, view::Window,
};

#[derive(Debug, Clone)]
enum Storage<'a> {
    Owned(Box<[Cell<u8>]>),
    Borrowed(&'a [Cell<u8>]),
}

/// A fixed-length run of elements of one type.
///
/// Elements are stored in native byte order. A sequence produced by
/// [StructLayout::decode] borrows the decoded buffer, so writes through it land
/// directly in that buffer.
#[derive(Debug, Clone)]
pub struct Sequence<'a> {
    ty: FieldType,
    storage: Storage<'a>,
}

impl<'a> Sequence<'a> {
    /// A new owned sequence of `count` zeroes.
    pub fn zeroed(ty: FieldType, count: usize) -> Sequence<'static> {
        Sequence {
            ty,
            storage: Storage::Owned(vec![Cell::new(0u8); count * ty.width()].into_boxed_slice()),
        }
    }

    /// A sequence aliasing `cells`, which must hold whole elements.
    pub(crate) fn borrowed(ty: FieldType, cells: &'a [Cell<u8>]) -> Self {
        Sequence {
            ty,
            storage: Storage::Borrowed(cells),
        }
    }

    pub(crate) fn cells(&self) -> &[Cell<u8>] {
        match &self.storage {
            Storage::Owned(cells) => &cells[..],
            Storage::Borrowed(cells) => &cells[..],
        }
    }

    fn window(&self) -> Window<'_> {
        Window::new(self.ty, self.cells())
    }

    pub fn field_type(&self) -> FieldType {
        self.ty
    }

    pub fn len(&self) -> usize {
        self.cells().len() / self.ty.width()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this sequence aliases a caller's buffer.
    pub fn is_borrowed(&self) -> bool {
        matches!(self.storage, Storage::Borrowed(_))
    }

    pub fn get(&self, index: usize) -> Option<Scalar> {
        self.window().get(index)
    }

    /// Writes one element. The value must have the sequence's element type.
    pub fn set(&self, index: usize, value: impl Into<Scalar>) -> Result<(), WriteError> {
        let value = value.into();

        if value.field_type() != self.ty {
            return Err(WriteError::TypeMismatch {
                expected: self.ty,
                found: value.field_type(),
            });
        }

        if !self.window().set(index, value) {
            return Err(WriteError::IndexOutOfBounds {
                index,
                len: self.len(),
            });
        }

        Ok(())
    }

    /// Overwrites every element. Nothing is written unless `values` has the right
    /// length and element type throughout.
    pub fn copy_from_slice(&self, values: &[Scalar]) -> Result<(), WriteError> {
        if values.len() != self.len() {
            return Err(WriteError::LengthMismatch {
                expected: self.len(),
                got: values.len(),
            });
        }

        if let Some(bad) = values.iter().find(|v| v.field_type() != self.ty) {
            return Err(WriteError::TypeMismatch {
                expected: self.ty,
                found: bad.field_type(),
            });
        }

        let window = self.window();
        for (i, value) in values.iter().enumerate() {
            window.set(i, *value);
        }

        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = Scalar> + '_ {
        let window = self.window();
        (0..self.len()).filter_map(move |i| window.get(i))
    }

    pub fn to_vec(&self) -> Vec<Scalar> {
        self.iter().collect()
    }

    /// Detaches the sequence from any borrowed buffer by copying its bytes.
    pub fn into_owned(self) -> Sequence<'static> {
        let storage = match self.storage {
            Storage::Owned(cells) => Storage::Owned(cells),
            Storage::Borrowed(cells) => Storage::Owned(cells.to_vec().into_boxed_slice()),
        };

        Sequence {
            ty: self.ty,
            storage,
        }
    }
}

impl PartialEq for Sequence<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty && self.iter().eq(other.iter())
    }
}

/// Current value of one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    /// Field with `count == 1`.
    Scalar(Scalar),
    /// Field with `count > 1`.
    Sequence(Sequence<'a>),
}

impl<'a> FieldValue<'a> {
    pub fn as_scalar(&self) -> Option<Scalar> {
        match self {
            FieldValue::Scalar(v) => Some(*v),
            FieldValue::Sequence(_) => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence<'a>> {
        match self {
            FieldValue::Sequence(seq) => Some(seq),
            FieldValue::Scalar(_) => None,
        }
    }

    pub fn into_owned(self) -> FieldValue<'static> {
        match self {
            FieldValue::Scalar(v) => FieldValue::Scalar(v),
            FieldValue::Sequence(seq) => FieldValue::Sequence(seq.into_owned()),
        }
    }
}

/// Field values paired with the layout that gives them meaning.
///
/// Created by [StructLayout::instantiate], [StructLayout::decode] or
/// [StructLayout::decode_owned]. Values are stored in the layout's declaration order.
#[derive(Debug, Clone)]
pub struct StructInstance<'a> {
    layout: Arc<StructLayout>,
    values: Vec<FieldValue<'a>>,
}

impl<'a> StructInstance<'a> {
    pub(crate) fn from_parts(layout: Arc<StructLayout>, values: Vec<FieldValue<'a>>) -> Self {
        StructInstance { layout, values }
    }

    pub fn layout(&self) -> &Arc<StructLayout> {
        &self.layout
    }

    pub(crate) fn values(&self) -> &[FieldValue<'a>] {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue<'a>> {
        self.layout.position(name).map(|i| &self.values[i])
    }

    /// Value of a scalar field.
    pub fn scalar(&self, name: &str) -> Option<Scalar> {
        self.get(name)?.as_scalar()
    }

    /// A sequence field; elements can be written through the returned reference.
    pub fn sequence(&self, name: &str) -> Option<&Sequence<'a>> {
        self.get(name)?.as_sequence()
    }

    /// Assigns a scalar field. The value must have the field's element type.
    pub fn set(&mut self, name: &str, value: impl Into<Scalar>) -> Result<(), WriteError> {
        let value = value.into();
        let i = self
            .layout
            .position(name)
            .ok_or_else(|| WriteError::UnknownField(name.to_string()))?;
        let field = &self.layout.fields()[i];

        if !field.is_scalar() {
            return Err(WriteError::NotScalar(name.to_string()));
        }
        if value.field_type() != field.ty {
            return Err(WriteError::TypeMismatch {
                expected: field.ty,
                found: value.field_type(),
            });
        }

        self.values[i] = FieldValue::Scalar(value);
        Ok(())
    }

    /// Overwrites every element of a sequence field.
    pub fn set_sequence(&mut self, name: &str, values: &[Scalar]) -> Result<(), WriteError> {
        if self.layout.position(name).is_none() {
            return Err(WriteError::UnknownField(name.to_string()));
        }

        self.sequence(name)
            .ok_or_else(|| WriteError::NotSequence(name.to_string()))?
            .copy_from_slice(values)
    }

    /// `(name, value)` pairs in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue<'a>)> {
        self.layout
            .fields()
            .iter()
            .map(|f| f.name.as_str())
            .zip(&self.values)
    }

    /// Copies any borrowed sequences so the instance no longer refers to a buffer.
    pub fn into_owned(self) -> StructInstance<'static> {
        StructInstance {
            layout: self.layout,
            values: self.values.into_iter().map(FieldValue::into_owned).collect(),
        }
    }
}

impl PartialEq for StructInstance<'_> {
    fn eq(&self, other: &Self) -> bool {
        (Arc::ptr_eq(&self.layout, &other.layout) || self.layout.fields() == other.layout.fields())
            && self.values == other.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldSpec;

    fn sample_layout() -> Arc<StructLayout> {
        Arc::new(
            StructLayout::compile(&[
                FieldSpec::scalar(FieldType::I64, "big"),
                FieldSpec::array(FieldType::U8, "smol", 3),
                FieldSpec::scalar(FieldType::F32, "float"),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn test_sequence_set_and_get() {
        let seq = Sequence::zeroed(FieldType::U16, 4);
        seq.set(2, 513u16).unwrap();

        assert_eq!(seq.len(), 4);
        assert_eq!(seq.get(2), Some(Scalar::U16(513)));
        assert_eq!(
            seq.to_vec(),
            vec![Scalar::U16(0), Scalar::U16(0), Scalar::U16(513), Scalar::U16(0)]
        );
        assert!(!seq.is_borrowed());
    }

    #[test]
    fn test_sequence_rejects_bad_writes() {
        let seq = Sequence::zeroed(FieldType::U8, 3);

        assert_eq!(
            seq.set(3, 1u8),
            Err(WriteError::IndexOutOfBounds { index: 3, len: 3 })
        );
        assert_eq!(
            seq.set(0, 1i8),
            Err(WriteError::TypeMismatch {
                expected: FieldType::U8,
                found: FieldType::I8
            })
        );
        assert_eq!(
            seq.copy_from_slice(&[Scalar::U8(1)]),
            Err(WriteError::LengthMismatch { expected: 3, got: 1 })
        );
    }

    #[test]
    fn test_copy_from_slice_is_all_or_nothing() {
        let seq = Sequence::zeroed(FieldType::U8, 3);
        let result = seq.copy_from_slice(&[Scalar::U8(1), Scalar::U8(2), Scalar::I8(3)]);

        assert!(result.is_err());
        assert_eq!(seq.to_vec(), vec![Scalar::U8(0); 3]);
    }

    #[test]
    fn test_borrowed_sequence_writes_through() {
        let mut buf = [0u8; 4];
        {
            let cells = Cell::from_mut(&mut buf[..]).as_slice_of_cells();
            let seq = Sequence::borrowed(FieldType::U8, &cells[1..4]);
            seq.set(0, 9u8).unwrap();
            assert!(seq.is_borrowed());
        }
        assert_eq!(buf, [0, 9, 0, 0]);
    }

    #[test]
    fn test_instance_set_checks_field() {
        let mut instance = sample_layout().instantiate();

        instance.set("big", 4i64).unwrap();
        assert_eq!(instance.scalar("big"), Some(Scalar::I64(4)));

        assert_eq!(
            instance.set("missing", 1i64),
            Err(WriteError::UnknownField("missing".to_string()))
        );
        assert_eq!(
            instance.set("smol", 1u8),
            Err(WriteError::NotScalar("smol".to_string()))
        );
        assert_eq!(
            instance.set("float", 1.0f64),
            Err(WriteError::TypeMismatch {
                expected: FieldType::F32,
                found: FieldType::F64
            })
        );
        assert_eq!(
            instance.set_sequence("big", &[]),
            Err(WriteError::NotSequence("big".to_string()))
        );
    }

    #[test]
    fn test_fields_in_declaration_order() {
        let instance = sample_layout().instantiate();
        let names: Vec<&str> = instance.fields().map(|(name, _)| name).collect();
        assert_eq!(names, ["big", "smol", "float"]);
    }
}
