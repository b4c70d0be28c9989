//! The frozen model: an arena of entity descriptors.

use super::build::ModelBuilder;
use super::entity::{Entity, EntityId};
use super::property::{Property, PropertyRef};
use crate::error::Error;
use std::collections::HashMap;

/// The whole in-memory metamodel.
///
/// Built once, single-threaded, by [`ModelBuilder::freeze`], then
/// shared read-only (typically behind an `Arc`) by every thread. All
/// cross-references between entities and properties are arena indices
/// into this structure.
#[derive(Debug, Clone)]
pub struct Model {
    pub(crate) entities: Vec<Entity>,
    pub(crate) by_name: HashMap<String, EntityId>,
    // keyed by lowercased table name
    pub(crate) by_table: HashMap<String, EntityId>,
}

impl Model {
    /// Start assembling a new model.
    pub fn builder() -> ModelBuilder {
        ModelBuilder::new()
    }

    /// All entities, in registration order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Resolve an arena id. Ids are only ever minted by the builder of
    /// this model, so resolution is a plain index.
    pub fn entity(&self, id: EntityId) -> &Entity {
        &self.entities[id.0]
    }

    /// Get an entity by name.
    pub fn get_entity(&self, name: &str) -> Option<&Entity> {
        self.by_name.get(name).map(|&id| &self.entities[id.0])
    }

    /// Get an entity by name, or fail with [`Error::UnknownEntity`].
    pub fn entity_by_name(&self, name: &str) -> Result<&Entity, Error> {
        self.get_entity(name)
            .ok_or_else(|| Error::UnknownEntity(name.to_string()))
    }

    /// Get an entity by table name (case-insensitive).
    pub fn get_entity_by_table(&self, table: &str) -> Option<&Entity> {
        self.by_table
            .get(&table.to_lowercase())
            .map(|&id| &self.entities[id.0])
    }

    /// Get an entity by table name, or fail with [`Error::UnknownTable`].
    pub fn entity_by_table(&self, table: &str) -> Result<&Entity, Error> {
        self.get_entity_by_table(table)
            .ok_or_else(|| Error::UnknownTable(table.to_string()))
    }

    /// Resolve a property ref minted by this model's builder.
    pub fn property(&self, r: PropertyRef) -> &Property {
        &self.entities[r.entity.0].properties[r.index]
    }
}
