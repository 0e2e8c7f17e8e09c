//! JSON-deserializable layout description and value serialization.
//!
//! [LayoutDef] describes a record layout as data (for example a schema file
//! shipped with your application) and compiles into a
//! [StructLayout](crate::layout::StructLayout) through `TryFrom`.
//!
//! ```json
//! { "fields": [
//!     { "name": "big", "type": "int64" },
//!     { "name": "smol", "type": "uint8", "count": 3 },
//!     { "name": "float", "type": "float32" }
//! ] }
//! ```
//!
//! [Scalar] and [StructInstance] serialize as plain numbers, arrays of numbers
//! and maps in field declaration order.

use serde::{
    Deserialize, Serialize, Serializer,
    ser::{SerializeMap, SerializeSeq},
};

use crate::{
    instance::{FieldValue, Sequence, StructInstance},
    value::Scalar,
};

/// Top-level layout definition: fields in declaration order.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LayoutDef {
    pub fields: Vec<FieldDef>,
}

/// Description of a single field.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FieldDef {
    /// Field name; becomes the key of the decoded value.
    pub name: String,
    /// Type name, e.g. `"uint8"`, `"int64"` or `"float64"`.
    #[serde(rename = "type")]
    pub ty: String,
    /// Number of elements; defaults to a single scalar.
    #[serde(default = "default_count")]
    pub count: usize,
}

fn default_count() -> usize {
    1
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Scalar::I8(v) => serializer.serialize_i8(v),
            Scalar::U8(v) | Scalar::U8Clamped(v) => serializer.serialize_u8(v),
            Scalar::I16(v) => serializer.serialize_i16(v),
            Scalar::U16(v) => serializer.serialize_u16(v),
            Scalar::I32(v) => serializer.serialize_i32(v),
            Scalar::U32(v) => serializer.serialize_u32(v),
            Scalar::I64(v) => serializer.serialize_i64(v),
            Scalar::U64(v) => serializer.serialize_u64(v),
            Scalar::F32(v) => serializer.serialize_f32(v),
            Scalar::F64(v) => serializer.serialize_f64(v),
        }
    }
}

impl Serialize for Sequence<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for value in self.iter() {
            seq.serialize_element(&value)?;
        }
        seq.end()
    }
}

impl Serialize for FieldValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Scalar(v) => v.serialize(serializer),
            FieldValue::Sequence(seq) => seq.serialize(serializer),
        }
    }
}

impl Serialize for StructInstance<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.layout().len()))?;
        for (name, value) in self.fields() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{errors::CompileError, layout::StructLayout, registry::FieldType};

    const SCHEMA: &str = r#"{
        "fields": [
            { "name": "big", "type": "int64" },
            { "name": "smol", "type": "uint8", "count": 3 },
            { "name": "float", "type": "float32" }
        ]
    }"#;

    #[test]
    fn test_layout_from_json() {
        let def: LayoutDef = serde_json::from_str(SCHEMA).unwrap();
        let layout = StructLayout::try_from(def).unwrap();

        assert_eq!(layout.total_size(), 16);
        assert_eq!(layout.alignment(), 8);
        assert_eq!(layout.field("smol").unwrap().ty, FieldType::U8);
        assert_eq!(layout.field("smol").unwrap().count, 3);
        assert_eq!(layout.field("float").unwrap().offset, 3);
    }

    #[test]
    fn test_layout_from_json_unknown_type() {
        let def: LayoutDef =
            serde_json::from_str(r#"{ "fields": [{ "name": "x", "type": "int128" }] }"#).unwrap();

        assert_eq!(
            StructLayout::try_from(def).unwrap_err(),
            CompileError::UnknownType("int128".to_string())
        );
    }

    #[test]
    fn test_serialize_instance() {
        let def: LayoutDef = serde_json::from_str(SCHEMA).unwrap();
        let layout = Arc::new(StructLayout::try_from(def).unwrap());
        let mut instance = layout.instantiate();
        instance.set("big", i64::MAX).unwrap();
        instance.sequence("smol").unwrap().set(2, 8u8).unwrap();
        instance.set("float", 4.5f32).unwrap();

        let json = serde_json::to_string(&instance).unwrap();
        assert_eq!(
            json,
            r#"{"big":9223372036854775807,"smol":[0,0,8],"float":4.5}"#
        );
    }
}
