//! Instantiate, decode and encode: moving field values between a
//! [StructInstance] and a buffer laid out by a [StructLayout].

use std::sync::Arc;

use tracing::trace;

use crate::{
    compiled::CompiledField,
    errors::ViewError,
    instance::{FieldValue, Sequence, StructInstance},
    layout::StructLayout,
    view::{self, Region, RegionMut, Views},
};

impl StructLayout {
    /// Creates an instance with every field set to zero. Touches no buffer.
    pub fn instantiate(self: &Arc<Self>) -> StructInstance<'static> {
        let values = self
            .fields()
            .iter()
            .map(|field| {
                if field.is_scalar() {
                    FieldValue::Scalar(field.ty.default_value())
                } else {
                    FieldValue::Sequence(Sequence::zeroed(field.ty, field.count))
                }
            })
            .collect();

        StructInstance::from_parts(Arc::clone(self), values)
    }

    /// Decodes `region` in place.
    ///
    /// Scalar fields are read out; sequence fields alias the buffer, so writes
    /// through them are visible in `region` for as long as the instance lives.
    pub fn decode<'a>(
        self: &Arc<Self>,
        region: impl Into<RegionMut<'a>>,
    ) -> Result<StructInstance<'a>, ViewError> {
        let region = region.into();
        let (len, byte_offset) = (region.len(), region.byte_offset());
        trace!(len, byte_offset, "decoding struct");

        let views = view::build(self, region.into_cells(), byte_offset)?;

        // Validation guarantees every field lies inside its window, so a missing
        // value fails the whole decode instead of shifting later fields.
        let values = self
            .fields()
            .iter()
            .map(|field| decode_field(&views, field))
            .collect::<Option<Vec<_>>>()
            .ok_or(ViewError::InsufficientSpace {
                needed: self.total_size(),
                available: len,
            })?;

        Ok(StructInstance::from_parts(Arc::clone(self), values))
    }

    /// Decodes a read-only region by copying the struct's bytes; the result does
    /// not borrow `region`.
    pub fn decode_owned<'a>(
        self: &Arc<Self>,
        region: impl Into<Region<'a>>,
    ) -> Result<StructInstance<'static>, ViewError> {
        let region = region.into();
        view::validate(self, region.len(), region.byte_offset())?;

        let mut copy = region.bytes()[..self.total_size()].to_vec();
        let instance = self.decode(RegionMut::with_offset(&mut copy, region.byte_offset()))?;

        Ok(instance.into_owned())
    }
}

fn decode_field<'a>(views: &Views<'a>, field: &CompiledField) -> Option<FieldValue<'a>> {
    let window = views.window(field.ty)?;

    if field.is_scalar() {
        window.get(field.offset).map(FieldValue::Scalar)
    } else {
        window
            .element_cells(field.offset, field.count)
            .map(|cells| FieldValue::Sequence(Sequence::borrowed(field.ty, cells)))
    }
}

impl StructInstance<'_> {
    /// Writes every field into `region` at the offsets of the bound layout.
    ///
    /// The region is validated before the first write, so a failed encode leaves
    /// it untouched.
    pub fn encode<'b>(&self, region: impl Into<RegionMut<'b>>) -> Result<(), ViewError> {
        let layout = self.layout();
        let region = region.into();
        let byte_offset = region.byte_offset();
        trace!(len = region.len(), byte_offset, "encoding struct");

        let views = view::build(layout, region.into_cells(), byte_offset)?;

        debug_assert_eq!(self.values().len(), layout.len());

        for (field, value) in layout.fields().iter().zip(self.values()) {
            let written = views.window(field.ty).is_some_and(|window| match value {
                FieldValue::Scalar(v) if field.is_scalar() => window.set(field.offset, *v),
                FieldValue::Sequence(seq) if !field.is_scalar() => {
                    window.copy_from(field.offset, seq.cells())
                }
                _ => false,
            });
            debug_assert!(written, "field `{}` was not written", field.name);
        }

        Ok(())
    }

    /// Encodes into a fresh, zero-padded buffer of exactly `total_size` bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = vec![0u8; self.layout().total_size()];
        // A fresh buffer at offset 0 always satisfies size and alignment.
        let _ = self.encode(&mut buf);
        buf
    }
}
