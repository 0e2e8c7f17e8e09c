//! Scalar values held by struct fields.

use crate::{errors::WriteError, registry::FieldType};

/// A single numeric element, tagged with its field type.
///
/// 64-bit integers are kept as `i64`/`u64`, so they round-trip with full precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    I8(i8),
    U8(u8),
    U8Clamped(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
}

impl Scalar {
    pub fn field_type(&self) -> FieldType {
        match self {
            Scalar::I8(_) => FieldType::I8,
            Scalar::U8(_) => FieldType::U8,
            Scalar::U8Clamped(_) => FieldType::U8Clamped,
            Scalar::I16(_) => FieldType::I16,
            Scalar::U16(_) => FieldType::U16,
            Scalar::I32(_) => FieldType::I32,
            Scalar::U32(_) => FieldType::U32,
            Scalar::I64(_) => FieldType::I64,
            Scalar::U64(_) => FieldType::U64,
            Scalar::F32(_) => FieldType::F32,
            Scalar::F64(_) => FieldType::F64,
        }
    }

    /// Reads a value of type `ty` from the first `ty.width()` bytes of `bytes`, in native byte order.
    ///
    /// Returns `None` if `bytes` is too short.
    pub fn from_ne_bytes(ty: FieldType, bytes: &[u8]) -> Option<Scalar> {
        let raw = bytes.get(..ty.width())?;

        Some(match ty {
            FieldType::I8 => Scalar::I8(i8::from_ne_bytes(raw.try_into().ok()?)),
            FieldType::U8 => Scalar::U8(raw[0]),
            FieldType::U8Clamped => Scalar::U8Clamped(raw[0]),
            FieldType::I16 => Scalar::I16(i16::from_ne_bytes(raw.try_into().ok()?)),
            FieldType::U16 => Scalar::U16(u16::from_ne_bytes(raw.try_into().ok()?)),
            FieldType::I32 => Scalar::I32(i32::from_ne_bytes(raw.try_into().ok()?)),
            FieldType::U32 => Scalar::U32(u32::from_ne_bytes(raw.try_into().ok()?)),
            FieldType::I64 => Scalar::I64(i64::from_ne_bytes(raw.try_into().ok()?)),
            FieldType::U64 => Scalar::U64(u64::from_ne_bytes(raw.try_into().ok()?)),
            FieldType::F32 => Scalar::F32(f32::from_ne_bytes(raw.try_into().ok()?)),
            FieldType::F64 => Scalar::F64(f64::from_ne_bytes(raw.try_into().ok()?)),
        })
    }

    /// Native byte representation. Only the first `self.field_type().width()` bytes are meaningful.
    pub fn to_ne_bytes(&self) -> [u8; 8] {
        let mut out = [0u8; 8];

        match *self {
            Scalar::I8(v) => out[..1].copy_from_slice(&v.to_ne_bytes()),
            Scalar::U8(v) | Scalar::U8Clamped(v) => out[0] = v,
            Scalar::I16(v) => out[..2].copy_from_slice(&v.to_ne_bytes()),
            Scalar::U16(v) => out[..2].copy_from_slice(&v.to_ne_bytes()),
            Scalar::I32(v) => out[..4].copy_from_slice(&v.to_ne_bytes()),
            Scalar::U32(v) => out[..4].copy_from_slice(&v.to_ne_bytes()),
            Scalar::I64(v) => out = v.to_ne_bytes(),
            Scalar::U64(v) => out = v.to_ne_bytes(),
            Scalar::F32(v) => out[..4].copy_from_slice(&v.to_ne_bytes()),
            Scalar::F64(v) => out = v.to_ne_bytes(),
        }

        out
    }

    /// Converts a floating-point number into a value of type `ty`.
    ///
    /// Integer targets require a finite, integral number within range. `U8Clamped`
    /// saturates instead: NaN becomes 0, the value is clamped to 0..=255 and rounded
    /// half to even.
    pub fn from_f64(ty: FieldType, v: f64) -> Result<Scalar, WriteError> {
        match ty {
            FieldType::F32 => return Ok(Scalar::F32(v as f32)),
            FieldType::F64 => return Ok(Scalar::F64(v)),
            FieldType::U8Clamped => {
                let clamped = if v.is_nan() { 0.0 } else { v.clamp(0.0, 255.0) };
                return Ok(Scalar::U8Clamped(clamped.round_ties_even() as u8));
            }
            _ => {}
        }

        if !v.is_finite() || v.fract() != 0.0 {
            return Err(WriteError::InvalidValue(ty));
        }

        // 2^64 and -2^63 are exactly representable; anything in range fits an i128.
        if v >= 18_446_744_073_709_551_616.0 || v < -9_223_372_036_854_775_808.0 {
            return Err(WriteError::InvalidValue(ty));
        }

        Self::from_i128(ty, v as i128)
    }

    /// Converts a signed integer into a value of type `ty`, rejecting out-of-range values.
    pub fn from_i64(ty: FieldType, v: i64) -> Result<Scalar, WriteError> {
        Self::from_i128(ty, v as i128)
    }

    /// Converts an unsigned integer into a value of type `ty`, rejecting out-of-range values.
    pub fn from_u64(ty: FieldType, v: u64) -> Result<Scalar, WriteError> {
        Self::from_i128(ty, v as i128)
    }

    fn from_i128(ty: FieldType, v: i128) -> Result<Scalar, WriteError> {
        let invalid = |_| WriteError::InvalidValue(ty);

        Ok(match ty {
            FieldType::I8 => Scalar::I8(v.try_into().map_err(invalid)?),
            FieldType::U8 => Scalar::U8(v.try_into().map_err(invalid)?),
            FieldType::U8Clamped => Scalar::U8Clamped(v.clamp(0, 255) as u8),
            FieldType::I16 => Scalar::I16(v.try_into().map_err(invalid)?),
            FieldType::U16 => Scalar::U16(v.try_into().map_err(invalid)?),
            FieldType::I32 => Scalar::I32(v.try_into().map_err(invalid)?),
            FieldType::U32 => Scalar::U32(v.try_into().map_err(invalid)?),
            FieldType::I64 => Scalar::I64(v.try_into().map_err(invalid)?),
            FieldType::U64 => Scalar::U64(v.try_into().map_err(invalid)?),
            FieldType::F32 => Scalar::F32(v as f32),
            FieldType::F64 => Scalar::F64(v as f64),
        })
    }

    /// Value as `f64`. 64-bit integers beyond 2^53 lose precision.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Scalar::I8(v) => v as f64,
            Scalar::U8(v) | Scalar::U8Clamped(v) => v as f64,
            Scalar::I16(v) => v as f64,
            Scalar::U16(v) => v as f64,
            Scalar::I32(v) => v as f64,
            Scalar::U32(v) => v as f64,
            Scalar::I64(v) => v as f64,
            Scalar::U64(v) => v as f64,
            Scalar::F32(v) => v as f64,
            Scalar::F64(v) => v,
        }
    }

    /// Value as `i64`, if it is an integer that fits.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Scalar::I8(v) => Some(v.into()),
            Scalar::U8(v) | Scalar::U8Clamped(v) => Some(v.into()),
            Scalar::I16(v) => Some(v.into()),
            Scalar::U16(v) => Some(v.into()),
            Scalar::I32(v) => Some(v.into()),
            Scalar::U32(v) => Some(v.into()),
            Scalar::I64(v) => Some(v),
            Scalar::U64(v) => v.try_into().ok(),
            Scalar::F32(_) | Scalar::F64(_) => None,
        }
    }

    /// Value as `u64`, if it is a non-negative integer.
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Scalar::U64(v) => Some(v),
            Scalar::F32(_) | Scalar::F64(_) => None,
            _ => self.as_i64().and_then(|v| v.try_into().ok()),
        }
    }
}

macro_rules! impl_from_native {
    ($($native:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$native> for Scalar {
                fn from(v: $native) -> Self {
                    Scalar::$variant(v)
                }
            }
        )*
    };
}

impl_from_native! {
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f32 => F32,
    f64 => F64,
}
