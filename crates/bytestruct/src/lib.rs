//! # bytestruct
//!
//! Schema-driven description and serialization of fixed-layout binary records.
//!
//! Declare an ordered list of named, typed fields, compile it once into a
//! [StructLayout] with natural alignment and padding, then move values between
//! [StructInstance]s and byte buffers in the platform's native byte order.
//! Fields are scalars or fixed-length sequences of one numeric type.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use bytestruct::{FieldSpec, FieldType, Scalar, StructLayout};
//!
//! let layout = Arc::new(
//!     StructLayout::compile(&[
//!         FieldSpec::scalar(FieldType::I64, "big"),
//!         FieldSpec::array(FieldType::U8, "smol", 3),
//!         FieldSpec::scalar(FieldType::F32, "float"),
//!     ])
//!     .unwrap(),
//! );
//! assert_eq!(layout.total_size(), 16);
//!
//! let mut instance = layout.instantiate();
//! instance.set("big", 4i64).unwrap();
//! instance.set("float", 4.5f32).unwrap();
//!
//! let mut buf = [0u8; 16];
//! instance.encode(&mut buf).unwrap();
//!
//! let decoded = layout.decode(&mut buf).unwrap();
//! assert_eq!(decoded.scalar("big"), Some(Scalar::I64(4)));
//! ```

pub mod codec;
pub mod compiled;
pub mod errors;
pub mod field;
pub mod instance;
pub mod layout;
pub mod registry;
#[cfg(feature = "serde")]
pub mod serde;
pub mod value;
pub mod view;

pub use compiled::CompiledField;
pub use errors::{CompileError, ViewError, WriteError};
pub use field::FieldSpec;
pub use instance::{FieldValue, Sequence, StructInstance};
pub use layout::StructLayout;
pub use registry::FieldType;
pub use value::Scalar;
pub use view::{Region, RegionMut};
