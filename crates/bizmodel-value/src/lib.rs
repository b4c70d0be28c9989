//! Value layer for the bizmodel metamodel.
//!
//! This crate defines the closed set of runtime values a dynamic
//! business-object row can hold. Columns map to scalar variants,
//! associations are represented by row ids ([`Value::Reference`] and
//! [`Value::ReferenceList`]) rather than nested objects, so the type
//! is non-recursive.
//!
//! All types derive serde `Serialize`/`Deserialize`; values appear in
//! data-dictionary documents and test fixtures as plain JSON.

pub mod value;

pub use value::Value;
