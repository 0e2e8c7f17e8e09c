use std::{collections::HashMap, fmt::Display};

use bytestruct::{CompiledField, Scalar, StructInstance, WriteError};
use serde::Serialize;
use wasm_bindgen::JsValue;

pub fn error_to_js<E: Display>(e: E) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Converts one JSON number into a value of the field's element type.
pub fn convert_json_number(
    field: &CompiledField,
    value: &serde_json::Value,
) -> Result<Scalar, JsValue> {
    let serde_json::Value::Number(n) = value else {
        return Err(JsValue::from_str(&format!(
            "field `{}` expects a number, got {}",
            field.name, value
        )));
    };

    let scalar = if let Some(v) = n.as_i64() {
        Scalar::from_i64(field.ty, v)
    } else if let Some(v) = n.as_u64() {
        Scalar::from_u64(field.ty, v)
    } else if let Some(v) = n.as_f64() {
        Scalar::from_f64(field.ty, v)
    } else {
        Err(WriteError::InvalidValue(field.ty))
    };

    scalar.map_err(error_to_js)
}

/// Assigns a JS object's properties onto `instance`. Missing properties keep their
/// current value; unknown properties are rejected.
pub fn apply_json_object(
    instance: &mut StructInstance<'_>,
    raw: HashMap<String, serde_json::Value>,
) -> Result<(), JsValue> {
    let layout = instance.layout().clone();

    for (name, value) in raw {
        let field = layout
            .field(&name)
            .ok_or_else(|| error_to_js(WriteError::UnknownField(name.clone())))?;

        if field.is_scalar() {
            let scalar = convert_json_number(field, &value)?;
            instance.set(&name, scalar).map_err(error_to_js)?;
        } else {
            let serde_json::Value::Array(items) = &value else {
                return Err(error_to_js(WriteError::NotScalar(name)));
            };

            let scalars = items
                .iter()
                .map(|item| convert_json_number(field, item))
                .collect::<Result<Vec<_>, _>>()?;

            instance.set_sequence(&name, &scalars).map_err(error_to_js)?;
        }
    }

    Ok(())
}

/// Serializes an instance into a plain JS object; 64-bit integers become `BigInt`s.
pub fn instance_to_js(instance: &StructInstance<'_>) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::new()
        .serialize_large_number_types_as_bigints(true)
        .serialize_maps_as_objects(true);

    instance
        .serialize(&serializer)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
