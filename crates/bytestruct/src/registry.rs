//! The closed catalog of numeric field types.
//!
//! Every type has a fixed element width and a neutral value. Both live in one
//! immutable table: widths are declared in [REGISTRY], while neutral values are
//! derived once by reading element 0 of a zero-filled window, so adding a type
//! only requires a new registry row.

use std::{cell::Cell, fmt, str::FromStr, sync::LazyLock};

use crate::{errors::CompileError, value::Scalar, view::Window};

/// Numeric element type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldType {
    I8,
    U8,
    /// Unsigned 8-bit value that saturates to 0..=255 on conversion.
    U8Clamped,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
}

/// Registry entry for a [FieldType].
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    pub ty: FieldType,
    /// Canonical name, used for display.
    pub name: &'static str,
    /// Element width in bytes.
    pub width: usize,
    /// Alternative names accepted when parsing.
    pub aliases: &'static [&'static str],
}

/// All supported types, indexed by `FieldType as usize`.
pub static REGISTRY: [TypeInfo; 11] = [
    TypeInfo { ty: FieldType::I8, name: "i8", width: 1, aliases: &["int8"] },
    TypeInfo { ty: FieldType::U8, name: "u8", width: 1, aliases: &["uint8"] },
    TypeInfo {
        ty: FieldType::U8Clamped,
        name: "u8_clamped",
        width: 1,
        aliases: &["uint8clamped", "uint8_clamped"],
    },
    TypeInfo { ty: FieldType::I16, name: "i16", width: 2, aliases: &["int16"] },
    TypeInfo { ty: FieldType::U16, name: "u16", width: 2, aliases: &["uint16"] },
    TypeInfo { ty: FieldType::I32, name: "i32", width: 4, aliases: &["int32"] },
    TypeInfo { ty: FieldType::U32, name: "u32", width: 4, aliases: &["uint32"] },
    TypeInfo { ty: FieldType::I64, name: "i64", width: 8, aliases: &["int64", "bigint64"] },
    TypeInfo { ty: FieldType::U64, name: "u64", width: 8, aliases: &["uint64", "biguint64"] },
    TypeInfo { ty: FieldType::F32, name: "f32", width: 4, aliases: &["float32", "float"] },
    TypeInfo { ty: FieldType::F64, name: "f64", width: 8, aliases: &["float64", "double"] },
];

static DEFAULTS: LazyLock<[Scalar; 11]> = LazyLock::new(|| {
    REGISTRY.map(|info| {
        let zeroed = vec![Cell::new(0u8); info.width];
        Window::new(info.ty, &zeroed)
            .get(0)
            .unwrap_or(Scalar::U8(0))
    })
});

impl FieldType {
    /// Every registered type, in registry order.
    pub fn all() -> impl Iterator<Item = FieldType> {
        REGISTRY.iter().map(|info| info.ty)
    }

    /// Registry entry for this type.
    pub fn info(self) -> &'static TypeInfo {
        &REGISTRY[self as usize]
    }

    /// Element width in bytes.
    pub fn width(self) -> usize {
        self.info().width
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Neutral value of this type (zero).
    pub fn default_value(self) -> Scalar {
        DEFAULTS[self as usize]
    }

    /// Looks up a type by canonical name or alias, ignoring ASCII case.
    pub fn lookup(name: &str) -> Option<FieldType> {
        REGISTRY
            .iter()
            .find(|info| {
                info.name.eq_ignore_ascii_case(name)
                    || info.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
            })
            .map(|info| info.ty)
    }
}

impl FromStr for FieldType {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::lookup(s.trim()).ok_or_else(|| CompileError::UnknownType(s.to_string()))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
