use std::sync::Arc;

use bytestruct::*;
use proptest::prelude::*;

fn field_type() -> impl Strategy<Value = FieldType> {
    prop::sample::select(FieldType::all().collect::<Vec<_>>())
}

fn field_specs() -> impl Strategy<Value = Vec<FieldSpec>> {
    prop::collection::vec((field_type(), 1usize..6), 0..10).prop_map(|fields| {
        fields
            .into_iter()
            .enumerate()
            .map(|(i, (ty, count))| FieldSpec::new(ty, format!("f{i}"), count))
            .collect()
    })
}

/// Maps raw bits onto a value of `ty`, avoiding NaN so values compare equal.
fn scalar_from_bits(ty: FieldType, bits: u64) -> Scalar {
    match ty {
        FieldType::I8 => Scalar::I8(bits as i8),
        FieldType::U8 => Scalar::U8(bits as u8),
        FieldType::U8Clamped => Scalar::U8Clamped(bits as u8),
        FieldType::I16 => Scalar::I16(bits as i16),
        FieldType::U16 => Scalar::U16(bits as u16),
        FieldType::I32 => Scalar::I32(bits as i32),
        FieldType::U32 => Scalar::U32(bits as u32),
        FieldType::I64 => Scalar::I64(bits as i64),
        FieldType::U64 => Scalar::U64(bits),
        FieldType::F32 => Scalar::F32((bits as i32) as f32 / 8.0),
        FieldType::F64 => Scalar::F64((bits as i64) as f64 / 16.0),
    }
}

fn fill(instance: &mut StructInstance<'_>, bits: &[u64]) {
    let mut stream = bits.iter().copied().cycle();
    let fields: Vec<CompiledField> = instance.layout().fields().to_vec();

    for field in fields {
        let values: Vec<Scalar> = (0..field.count)
            .map(|_| scalar_from_bits(field.ty, stream.next().unwrap_or(0)))
            .collect();

        if field.is_scalar() {
            instance.set(&field.name, values[0]).unwrap();
        } else {
            instance.set_sequence(&field.name, &values).unwrap();
        }
    }
}

proptest! {
    #[test]
    fn size_is_multiple_of_alignment(fields in field_specs()) {
        let layout = StructLayout::compile(&fields).unwrap();
        let widest = fields.iter().map(|f| f.ty.width()).max().unwrap_or(1);

        prop_assert_eq!(layout.total_size() % layout.alignment(), 0);
        prop_assert_eq!(layout.alignment(), widest);

        let mut previous_end = 0;
        for field in layout.fields() {
            prop_assert!(field.byte_offset() >= previous_end);
            prop_assert_eq!(field.byte_offset() % field.ty.width(), 0);
            previous_end = field.byte_range().end;
        }
        prop_assert!(previous_end <= layout.total_size());
    }

    #[test]
    fn encode_decode_roundtrip(
        fields in field_specs(),
        bits in prop::collection::vec(any::<u64>(), 1..32),
        slack in 0usize..16,
    ) {
        let layout = Arc::new(StructLayout::compile(&fields).unwrap());
        let mut instance = layout.instantiate();
        fill(&mut instance, &bits);

        let mut buf = vec![0u8; layout.total_size() + slack];
        instance.encode(&mut buf).unwrap();

        let decoded = layout.decode(&mut buf).unwrap();
        prop_assert_eq!(&decoded, &instance);
    }

    #[test]
    fn short_buffer_is_insufficient_space(fields in field_specs(), cut in 1usize..64) {
        let layout = Arc::new(StructLayout::compile(&fields).unwrap());
        prop_assume!(layout.total_size() > 0);

        let len = layout.total_size().saturating_sub(cut);
        let mut buf = vec![0u8; len];
        let expected = ViewError::InsufficientSpace { needed: layout.total_size(), available: len };

        prop_assert_eq!(layout.decode(&mut buf).unwrap_err(), expected);
        prop_assert_eq!(layout.instantiate().encode(&mut buf).unwrap_err(), expected);
    }

    #[test]
    fn misaligned_sub_view(fields in field_specs(), offset in 1usize..64) {
        let layout = Arc::new(StructLayout::compile(&fields).unwrap());
        prop_assume!(layout.alignment() > 1 && offset % layout.alignment() != 0);

        let end = offset + layout.total_size();
        let mut store = vec![0u8; end];
        let expected = ViewError::MisalignedBuffer { byte_offset: offset, alignment: layout.alignment() };

        prop_assert_eq!(
            layout.decode(RegionMut::within(&mut store, offset..end)).unwrap_err(),
            expected
        );
        prop_assert_eq!(
            layout.instantiate().encode(RegionMut::within(&mut store, offset..end)).unwrap_err(),
            expected
        );
    }

    #[test]
    fn instantiate_is_zeroed(fields in field_specs()) {
        let layout = Arc::new(StructLayout::compile(&fields).unwrap());
        let instance = layout.instantiate();

        for (field, (_, value)) in layout.fields().iter().zip(instance.fields()) {
            match value {
                FieldValue::Scalar(v) => {
                    prop_assert!(field.is_scalar());
                    prop_assert_eq!(*v, field.ty.default_value());
                }
                FieldValue::Sequence(seq) => {
                    prop_assert_eq!(seq.len(), field.count);
                    prop_assert!(seq.iter().all(|v| v == field.ty.default_value()));
                }
            }
        }
        prop_assert!(instance.to_bytes().iter().all(|&b| b == 0));
    }
}
