//! Entity descriptors.

use super::property::{Property, PropertyRef};
use crate::error::Error;
use std::collections::HashMap;
use std::fmt;

/// Index of an entity in the model arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub(crate) usize);

impl EntityId {
    /// Position of the entity in the model's entity list.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// An entity descriptor: one persistable business-object type, its
/// table and its ordered property list.
///
/// Entities are produced by freezing a model builder; the id,
/// identifier and parent index lists are precomputed there so runtime
/// lookups never scan.
#[derive(Debug, Clone)]
pub struct Entity {
    pub(crate) id: EntityId,
    pub(crate) name: String,
    pub(crate) table_name: String,
    pub(crate) properties: Vec<Property>,
    pub(crate) id_properties: Vec<usize>,
    pub(crate) identifier_properties: Vec<usize>,
    pub(crate) parent_properties: Vec<usize>,
    pub(crate) by_name: HashMap<String, usize>,
    // keyed by lowercased column name, matching the SQL convention
    pub(crate) by_column: HashMap<String, usize>,
}

impl Entity {
    /// Arena id of this entity.
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Entity name (unique within the model).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mapped SQL table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// The ordered property list.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// O(1) positional access by `index_in_entity`.
    pub fn property_at(&self, index: usize) -> &Property {
        &self.properties[index]
    }

    /// Get a property by name.
    pub fn get_property(&self, name: &str) -> Option<&Property> {
        self.by_name.get(name).map(|&i| &self.properties[i])
    }

    /// Get a property by name, or fail with [`Error::UnknownProperty`].
    pub fn property(&self, name: &str) -> Result<&Property, Error> {
        self.get_property(name).ok_or_else(|| Error::UnknownProperty {
            entity: self.name.clone(),
            property: name.to_string(),
        })
    }

    /// Get a property by column name (case-insensitive). Only mapped
    /// columns are indexed; one-to-many properties are not reachable
    /// this way.
    pub fn get_property_by_column(&self, column: &str) -> Option<&Property> {
        self.by_column
            .get(&column.to_lowercase())
            .map(|&i| &self.properties[i])
    }

    /// Get a property by column name, or fail with [`Error::UnknownColumn`].
    pub fn property_by_column(&self, column: &str) -> Result<&Property, Error> {
        self.get_property_by_column(column)
            .ok_or_else(|| Error::UnknownColumn {
                entity: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// Primary key properties, in declaration order.
    pub fn id_properties(&self) -> impl Iterator<Item = &Property> {
        self.id_properties.iter().map(|&i| &self.properties[i])
    }

    /// The first primary key property. Translation resolution assumes
    /// a single-column primary key and only ever consults this one.
    pub fn first_id_property(&self) -> Option<&Property> {
        self.id_properties.first().map(|&i| &self.properties[i])
    }

    /// Properties forming the human-readable identifier.
    pub fn identifier_properties(&self) -> impl Iterator<Item = &Property> {
        self.identifier_properties
            .iter()
            .map(|&i| &self.properties[i])
    }

    /// Many-to-one properties pointing at parent entities.
    pub fn parent_properties(&self) -> impl Iterator<Item = &Property> {
        self.parent_properties.iter().map(|&i| &self.properties[i])
    }

    /// One-to-many collection properties.
    pub fn one_to_many_properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter().filter(|p| p.one_to_many)
    }

    /// Ref to the property at `index`.
    pub fn property_ref(&self, index: usize) -> PropertyRef {
        PropertyRef {
            entity: self.id,
            index,
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
