//! Buffer regions and typed, zero-copy windows over them.
//!
//! A [Window] is an element-indexed view of one [FieldType] over a slice of
//! [Cell]s. Windows built for the same region share its bytes, so a write
//! through one window is visible through every other one.

use std::{cell::Cell, ops::Range};

use crate::{errors::ViewError, layout::StructLayout, registry::FieldType, value::Scalar};

/// A read-only byte region and its starting offset within the owning store.
#[derive(Debug, Clone, Copy)]
pub struct Region<'a> {
    bytes: &'a [u8],
    byte_offset: usize,
}

impl<'a> Region<'a> {
    /// Whole buffer, starting at offset 0.
    pub fn new(bytes: &'a [u8]) -> Self {
        Region { bytes, byte_offset: 0 }
    }

    /// Region over `bytes`, whose first byte sits `byte_offset` bytes into its store.
    pub fn with_offset(bytes: &'a [u8], byte_offset: usize) -> Self {
        Region { bytes, byte_offset }
    }

    /// Sub-view of `store` covering `range`. An out-of-range request yields an empty region.
    pub fn within(store: &'a [u8], range: Range<usize>) -> Self {
        let byte_offset = range.start;
        Region {
            bytes: store.get(range).unwrap_or_default(),
            byte_offset,
        }
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl<'a> From<&'a [u8]> for Region<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Region::new(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for Region<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Region::new(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Region<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Region::new(bytes)
    }
}

/// A writable byte region and its starting offset within the owning store.
#[derive(Debug)]
pub struct RegionMut<'a> {
    bytes: &'a mut [u8],
    byte_offset: usize,
}

impl<'a> RegionMut<'a> {
    /// Whole buffer, starting at offset 0.
    pub fn new(bytes: &'a mut [u8]) -> Self {
        RegionMut { bytes, byte_offset: 0 }
    }

    /// Sub-view of `store` covering `range`. An out-of-range request yields an empty region.
    pub fn within(store: &'a mut [u8], range: Range<usize>) -> Self {
        let byte_offset = range.start;
        RegionMut {
            bytes: store.get_mut(range).unwrap_or_default(),
            byte_offset,
        }
    }

    /// Region over `bytes`, whose first byte sits `byte_offset` bytes into its store.
    pub fn with_offset(bytes: &'a mut [u8], byte_offset: usize) -> Self {
        RegionMut { bytes, byte_offset }
    }

    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Shares the region as cells so several windows can alias it.
    pub fn into_cells(self) -> &'a [Cell<u8>] {
        Cell::from_mut(self.bytes).as_slice_of_cells()
    }
}

impl<'a> From<&'a mut [u8]> for RegionMut<'a> {
    fn from(bytes: &'a mut [u8]) -> Self {
        RegionMut::new(bytes)
    }
}

impl<'a> From<&'a mut Vec<u8>> for RegionMut<'a> {
    fn from(bytes: &'a mut Vec<u8>) -> Self {
        RegionMut::new(bytes)
    }
}

impl<'a, const N: usize> From<&'a mut [u8; N]> for RegionMut<'a> {
    fn from(bytes: &'a mut [u8; N]) -> Self {
        RegionMut::new(bytes)
    }
}

/// Checks that a region of `len` bytes starting at `byte_offset` can hold `layout`.
pub fn validate(layout: &StructLayout, len: usize, byte_offset: usize) -> Result<(), ViewError> {
    if len < layout.total_size() {
        return Err(ViewError::InsufficientSpace {
            needed: layout.total_size(),
            available: len,
        });
    }

    if byte_offset % layout.alignment() != 0 {
        return Err(ViewError::MisalignedBuffer {
            byte_offset,
            alignment: layout.alignment(),
        });
    }

    Ok(())
}

/// Element-indexed view of one numeric type over shared bytes.
#[derive(Debug, Clone, Copy)]
pub struct Window<'a> {
    ty: FieldType,
    cells: &'a [Cell<u8>],
}

impl<'a> Window<'a> {
    pub fn new(ty: FieldType, cells: &'a [Cell<u8>]) -> Self {
        Window { ty, cells }
    }

    pub fn field_type(&self) -> FieldType {
        self.ty
    }

    /// Number of whole elements in the window.
    pub fn len(&self) -> usize {
        self.cells.len() / self.ty.width()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes of elements `[index, index + count)`, or `None` if out of range.
    pub fn element_cells(&self, index: usize, count: usize) -> Option<&'a [Cell<u8>]> {
        let width = self.ty.width();
        let start = index.checked_mul(width)?;
        let end = start.checked_add(count.checked_mul(width)?)?;
        self.cells.get(start..end)
    }

    /// Reads the element at `index`.
    pub fn get(&self, index: usize) -> Option<Scalar> {
        let cells = self.element_cells(index, 1)?;
        let mut raw = [0u8; 8];

        for (dst, src) in raw.iter_mut().zip(cells) {
            *dst = src.get();
        }

        Scalar::from_ne_bytes(self.ty, &raw)
    }

    /// Writes the element at `index`. Returns `false` if the index is out of range
    /// or the value has a different type.
    pub fn set(&self, index: usize, value: Scalar) -> bool {
        if value.field_type() != self.ty {
            return false;
        }

        let Some(cells) = self.element_cells(index, 1) else {
            return false;
        };

        for (dst, src) in cells.iter().zip(value.to_ne_bytes()) {
            dst.set(src);
        }

        true
    }

    /// Copies raw element bytes into the window starting at element `index`.
    /// Returns `false` if they do not fit.
    pub fn copy_from(&self, index: usize, src: &[Cell<u8>]) -> bool {
        let width = self.ty.width();
        let Some(dst) = self.element_cells(index, src.len() / width) else {
            return false;
        };

        for (d, s) in dst.iter().zip(src) {
            d.set(s.get());
        }

        true
    }
}

/// One [Window] per distinct field type used by a layout.
#[derive(Debug, Clone)]
pub struct Views<'a> {
    windows: Vec<Window<'a>>,
}

impl<'a> Views<'a> {
    /// Window for `ty`, if the layout uses that type.
    pub fn window(&self, ty: FieldType) -> Option<&Window<'a>> {
        self.windows.iter().find(|w| w.ty == ty)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

/// Validates `cells` against `layout` and builds a window for each field type it uses.
///
/// Each window spans the whole region, not just `layout.total_size()` bytes.
pub fn build<'a>(
    layout: &StructLayout,
    cells: &'a [Cell<u8>],
    byte_offset: usize,
) -> Result<Views<'a>, ViewError> {
    validate(layout, cells.len(), byte_offset)?;

    let windows = layout
        .field_types()
        .into_iter()
        .map(|ty| Window::new(ty, cells))
        .collect();

    Ok(Views { windows })
}
