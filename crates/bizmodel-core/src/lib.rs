//! bizmodel core - entity/property metamodel and dynamic rows.
//!
//! This crate provides the in-memory metamodel a business-object
//! persistence engine consults at runtime: entity and property
//! descriptors with their association and translation linkage, the
//! registry handing out the frozen model, the data-dictionary loader
//! that assembles it, and the dynamic row type storing actual values.
//!
//! The model is built once, single-threaded, at schema-load time and
//! is immutable afterwards; descriptors are consulted, never mutated,
//! to interpret what a given property means.

pub mod dictionary;
pub mod error;
pub mod model;
pub mod object;

pub use error::Error;
pub use model::{
    Entity, EntityBuilder, EntityId, Model, ModelBuilder, ModelProvider, Property,
    PropertyBuilder, PropertyRef, ScalarType, TranslationLink,
};
pub use object::BusinessObject;

/// Re-export the value layer.
pub use bizmodel_value as value;
pub use bizmodel_value::Value;
