//! Entity/property metamodel.
//!
//! The model describes every persistable business-object type: its
//! table, its ordered properties, its associations and its translation
//! linkage. It is assembled once via [`ModelBuilder`], frozen into an
//! immutable [`Model`] and shared read-only by every thread afterwards.

mod build;
mod entity;
mod model;
mod property;
mod registry;
mod types;

pub use build::{EntityBuilder, ModelBuilder, PropertyBuilder, LANGUAGE_COLUMN};
pub use entity::{Entity, EntityId};
pub use model::Model;
pub use property::{Property, PropertyRef, TranslationLink};
pub use registry::ModelProvider;
pub use types::ScalarType;
