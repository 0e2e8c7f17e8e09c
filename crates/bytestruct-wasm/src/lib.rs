//! WASM bindings for the `bytestruct` layout compiler and codec.
//!
//! Layouts are described in JSON using the shape of
//! [`bytestruct::serde::LayoutDef`], compiled once, then used from JavaScript
//! to decode and encode many binary records:
//!
//! ```text
//! // const layout = new WasmLayout(JSON.stringify({
//! //   fields: [
//! //     { name: "big",   type: "int64" },
//! //     { name: "smol",  type: "uint8", count: 3 },
//! //     { name: "float", type: "float32" }
//! //   ]
//! // }));
//! //
//! // const bytes = layout.encode({ big: 4n, smol: [0, 2, 8], float: 4.5 });
//! // const value = layout.decode(bytes);
//! // // value is { big: 4n, smol: [0, 2, 8], float: 4.5 }
//! ```
//!
//! 64-bit integer fields cross the boundary as `BigInt`s. Error values are
//! converted to `JsValue` strings.

mod convert;

use std::{collections::HashMap, sync::Arc};

use bytestruct::{Region, RegionMut, StructLayout, serde::LayoutDef};
use wasm_bindgen::prelude::*;

/// Compiled layout that can be used from JavaScript.
#[wasm_bindgen]
pub struct WasmLayout {
    layout: Arc<StructLayout>,
}

#[wasm_bindgen]
impl WasmLayout {
    /// Compiles a layout from a JSON definition.
    #[wasm_bindgen(constructor)]
    pub fn new(schema_json: &str) -> Result<WasmLayout, JsValue> {
        let def: LayoutDef = serde_json::from_str(schema_json).map_err(convert::error_to_js)?;
        let layout = StructLayout::try_from(def).map_err(convert::error_to_js)?;
        Ok(WasmLayout {
            layout: Arc::new(layout),
        })
    }

    /// Total size in bytes.
    pub fn size(&self) -> usize {
        self.layout.total_size()
    }

    pub fn alignment(&self) -> usize {
        self.layout.alignment()
    }

    /// An object with every field set to zero.
    pub fn instantiate(&self) -> Result<JsValue, JsValue> {
        convert::instance_to_js(&self.layout.instantiate())
    }

    /// Decodes `data` (for example a `Uint8Array`) into a JS object. `byte_offset`
    /// is where `data` starts within its underlying store, 0 if omitted.
    pub fn decode(&self, data: &[u8], byte_offset: Option<usize>) -> Result<JsValue, JsValue> {
        let region = Region::with_offset(data, byte_offset.unwrap_or(0));
        let instance = self
            .layout
            .decode_owned(region)
            .map_err(convert::error_to_js)?;
        convert::instance_to_js(&instance)
    }

    /// Encodes a JS object into a new byte array of `size()` bytes.
    /// Missing fields are encoded as zero.
    pub fn encode(&self, obj: JsValue) -> Result<Vec<u8>, JsValue> {
        let mut instance = self.layout.instantiate();
        convert::apply_json_object(&mut instance, from_js_object(obj)?)?;
        Ok(instance.to_bytes())
    }

    /// Encodes a JS object into `buf`, which starts `byte_offset` bytes into its
    /// underlying store.
    pub fn encode_into(&self, obj: JsValue, buf: &mut [u8], byte_offset: usize) -> Result<(), JsValue> {
        let mut instance = self.layout.instantiate();
        convert::apply_json_object(&mut instance, from_js_object(obj)?)?;

        instance
            .encode(RegionMut::with_offset(buf, byte_offset))
            .map_err(convert::error_to_js)?;

        Ok(())
    }
}

fn from_js_object(obj: JsValue) -> Result<HashMap<String, serde_json::Value>, JsValue> {
    serde_wasm_bindgen::from_value(obj).map_err(|e| JsValue::from_str(&e.to_string()))
}
