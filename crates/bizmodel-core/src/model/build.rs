//! Model assembly.
//!
//! The metamodel is built in two phases: a mutable assembly stage
//! ([`ModelBuilder`]) where entities are allocated and cross-references
//! wired, and a [`ModelBuilder::freeze`] step that computes the derived
//! per-property data (positional indices, derived-read eligibility) and
//! produces the immutable [`Model`]. Everything that depends on the
//! whole graph having settled is computed at freeze time, so read-side
//! accessors never observe partially-wired state.

use super::entity::{Entity, EntityId};
use super::model::Model;
use super::property::{Property, PropertyRef, TranslationLink};
use super::types::ScalarType;
use crate::error::Error;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Column every translation table must carry: the language
/// discriminator of its rows.
pub const LANGUAGE_COLUMN: &str = "ad_language";

/// Builder for a single property. Converts into a [`Property`] when
/// added to an entity.
#[derive(Debug, Clone)]
pub struct PropertyBuilder {
    prop: Property,
}

impl PropertyBuilder {
    /// Create a property with the given name and column.
    pub fn new(name: impl Into<String>, column_name: impl Into<String>) -> Self {
        Self {
            prop: Property::new(name, column_name),
        }
    }

    /// Create a primitive property with a declared scalar type.
    pub fn primitive(
        name: impl Into<String>,
        column_name: impl Into<String>,
        scalar_type: ScalarType,
    ) -> Self {
        let mut builder = Self::new(name, column_name);
        builder.prop.scalar_type = Some(scalar_type);
        builder
    }

    /// Mark as part of the primary key.
    pub fn id(mut self) -> Self {
        self.prop.id = true;
        self
    }

    /// Mark as part of the human-readable identifier.
    pub fn identifier(mut self) -> Self {
        self.prop.identifier = true;
        self
    }

    /// Mark as a many-to-one reference to a parent entity.
    pub fn parent(mut self) -> Self {
        self.prop.parent = true;
        self
    }

    /// Mark as the child side of a parent/child association.
    pub fn child(mut self) -> Self {
        self.prop.child = true;
        self
    }

    /// Mark as a one-to-one association.
    pub fn one_to_one(mut self) -> Self {
        self.prop.one_to_one = true;
        self
    }

    /// Mark as a one-to-many collection.
    pub fn one_to_many(mut self) -> Self {
        self.prop.one_to_many = true;
        self
    }

    /// Mark as the entity's active flag column.
    pub fn active_column(mut self) -> Self {
        self.prop.active_column = true;
        self
    }

    /// Mark as an audit-trail column.
    pub fn audit_info(mut self) -> Self {
        self.prop.audit_info = true;
        self
    }

    /// Mark as a tenant/organization scoping column.
    pub fn client_or_organization(mut self) -> Self {
        self.prop.client_or_organization = true;
        self
    }

    /// Require a value.
    pub fn mandatory(mut self) -> Self {
        self.prop.mandatory = true;
        self
    }

    /// Allow updates after insert.
    pub fn updatable(mut self) -> Self {
        self.prop.updatable = true;
        self
    }

    /// Store encrypted.
    pub fn encrypted(mut self) -> Self {
        self.prop.encrypted = true;
        self
    }

    /// Value is a generated UUID.
    pub fn uuid(mut self) -> Self {
        self.prop.uuid = true;
        self
    }

    /// Accessed through a proxy entity.
    pub fn proxy(mut self) -> Self {
        self.prop.proxy = true;
        self
    }

    /// Exclude from export under the given condition.
    pub fn transient(mut self, condition: impl Into<String>) -> Self {
        self.prop.transient = true;
        self.prop.transient_condition = Some(condition.into());
        self
    }

    /// Mark as a composite primary key holder.
    pub fn composite_id(mut self) -> Self {
        self.prop.composite_id = true;
        self
    }

    /// Mark as a member of a composite primary key.
    pub fn part_of_composite_id(mut self) -> Self {
        self.prop.part_of_composite_id = true;
        self
    }

    /// Request sequence-backed values; the column rules of
    /// [`Property::set_used_sequence`] apply.
    pub fn used_sequence(mut self, used: bool) -> Self {
        self.prop.set_used_sequence(used);
        self
    }

    /// Set the database-format default value.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.prop.default_value = Some(default.into());
        self
    }

    /// Set the enumerated allowed values.
    pub fn with_allowed_values(
        mut self,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.prop.allowed_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Set the SQL formula of a computed column.
    pub fn with_sql_logic(mut self, sql_logic: impl Into<String>) -> Self {
        self.prop.sql_logic = Some(sql_logic.into());
        self
    }

    /// Set the declared column length.
    pub fn with_field_length(mut self, field_length: u32) -> Self {
        self.prop.field_length = field_length;
        self
    }

    /// Set the dictionary ordering number.
    pub fn with_seqno(mut self, seqno: i32) -> Self {
        self.prop.seqno = Some(seqno);
        self
    }

    /// Set the dictionary column record id.
    pub fn with_column_id(mut self, column_id: impl Into<String>) -> Self {
        self.prop.column_id = Some(column_id.into());
        self
    }
}

impl From<PropertyBuilder> for Property {
    fn from(builder: PropertyBuilder) -> Self {
        builder.prop
    }
}

/// Builder for a single entity and its ordered property list.
#[derive(Debug, Clone)]
pub struct EntityBuilder {
    pub(crate) name: String,
    pub(crate) table_name: String,
    pub(crate) properties: Vec<Property>,
}

impl EntityBuilder {
    /// Create an entity with the given name and table.
    pub fn new(name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table_name: table_name.into(),
            properties: Vec::new(),
        }
    }

    /// Add a property. Position in the entity follows insertion order.
    pub fn with_property(mut self, property: impl Into<Property>) -> Self {
        self.properties.push(property.into());
        self
    }

    /// Add multiple properties.
    pub fn with_properties(
        mut self,
        properties: impl IntoIterator<Item = impl Into<Property>>,
    ) -> Self {
        self.properties.extend(properties.into_iter().map(Into::into));
        self
    }
}

/// The mutable assembly stage of the metamodel.
///
/// Allocate every entity first, then wire cross-references, then
/// [`freeze`](ModelBuilder::freeze). Reference wiring must be complete
/// before translation resolution runs, since the latter inspects the
/// already-built link structure.
#[derive(Debug, Default)]
pub struct ModelBuilder {
    entities: Vec<EntityBuilder>,
}

impl ModelBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an entity; returns its arena id.
    pub fn add_entity(&mut self, entity: EntityBuilder) -> EntityId {
        self.entities.push(entity);
        EntityId(self.entities.len() - 1)
    }

    /// Look up an allocated entity by name.
    pub fn entity_id(&self, name: &str) -> Option<EntityId> {
        self.entities
            .iter()
            .position(|e| e.name == name)
            .map(EntityId)
    }

    /// Look up an allocated entity by table name (case-insensitive).
    pub fn entity_id_by_table(&self, table: &str) -> Option<EntityId> {
        self.entities
            .iter()
            .position(|e| e.table_name.eq_ignore_ascii_case(table))
            .map(EntityId)
    }

    /// Look up a property of an allocated entity by name.
    pub fn property_ref(&self, entity: EntityId, name: &str) -> Option<PropertyRef> {
        self.entities[entity.0]
            .properties
            .iter()
            .position(|p| p.name == name)
            .map(|index| PropertyRef { entity, index })
    }

    /// Look up a property of an allocated entity by column name
    /// (case-insensitive). One-to-many properties are not mapped by a
    /// column of their own entity and are never returned here.
    pub fn property_ref_by_column(&self, entity: EntityId, column: &str) -> Option<PropertyRef> {
        self.entities[entity.0]
            .properties
            .iter()
            .position(|p| !p.one_to_many && p.column_name.eq_ignore_ascii_case(column))
            .map(|index| PropertyRef { entity, index })
    }

    /// Ref to the first primary key property of an allocated entity.
    pub fn first_id_ref(&self, entity: EntityId) -> Option<PropertyRef> {
        self.entities[entity.0]
            .properties
            .iter()
            .position(|p| p.id)
            .map(|index| PropertyRef { entity, index })
    }

    /// Read a property during assembly.
    pub fn property(&self, r: PropertyRef) -> &Property {
        &self.entities[r.entity.0].properties[r.index]
    }

    /// Mutate a property during assembly.
    pub fn property_mut(&mut self, r: PropertyRef) -> &mut Property {
        &mut self.entities[r.entity.0].properties[r.index]
    }

    /// Set the entity an association property points at, without naming
    /// a property on the other side (collections, plain key references).
    pub fn set_target_entity(&mut self, p: PropertyRef, target: EntityId) {
        self.property_mut(p).target_entity = Some(target);
    }

    /// Wire an association to a named property on the other side.
    ///
    /// Also marks the target as being referenced (which makes it
    /// derived-readable) and sets the source's target entity to the
    /// target's owning entity.
    pub fn set_referenced_property(&mut self, p: PropertyRef, target: PropertyRef) {
        self.property_mut(target).being_referenced = true;
        let prop = self.property_mut(p);
        prop.referenced_property = Some(target);
        prop.target_entity = Some(target.entity);
    }

    /// Record that a one-to-one property's id is derived from another
    /// property.
    pub fn set_id_based_on(&mut self, p: PropertyRef, base: PropertyRef) {
        self.property_mut(p).id_based_on = Some(base);
    }

    /// Register a member of a composite primary key on its holder.
    pub fn add_id_part(&mut self, composite: PropertyRef, part: PropertyRef) {
        self.property_mut(composite).id_parts.push(part);
    }

    /// Resolve translation linkage for a property.
    ///
    /// `translation_property` is the candidate column in the translation
    /// table that holds the localized text. The property becomes
    /// translatable only if the translation table carries a language
    /// column, the owning entity exposes the translation rows as a
    /// one-to-many collection, and the translation table has a parent
    /// property referencing the owning entity's primary key (a
    /// single-column key is assumed; only the first id property is
    /// consulted). Every failed check downgrades the property to
    /// non-translatable with a diagnostic; none is fatal.
    pub fn set_translatable(&mut self, p: PropertyRef, translation_property: Option<PropertyRef>) {
        let qualified = self.qualified(p);
        debug!(property = %qualified, "resolving translation linkage");

        let Some(trl_prop) = translation_property else {
            warn!(property = %qualified, "not translatable: no translation property");
            self.property_mut(p).translation = None;
            return;
        };
        let trl_entity = trl_prop.entity;

        if self
            .property_ref_by_column(trl_entity, LANGUAGE_COLUMN)
            .is_none()
        {
            warn!(
                property = %qualified,
                column = LANGUAGE_COLUMN,
                "not translatable: language column not found in translation table"
            );
            self.property_mut(p).translation = None;
            return;
        }

        let base = p.entity;
        let one_to_many = self.entities[base.0]
            .properties
            .iter()
            .position(|q| q.one_to_many && q.target_entity == Some(trl_entity));
        let Some(otm_index) = one_to_many else {
            warn!(
                property = %qualified,
                "not translatable: no one-to-many property exposing the translation table"
            );
            self.property_mut(p).translation = None;
            return;
        };

        let Some(pk_index) = self.entities[base.0].properties.iter().position(|q| q.id) else {
            warn!(property = %qualified, "not translatable: entity has no primary key property");
            self.property_mut(p).translation = None;
            return;
        };
        let pk = PropertyRef {
            entity: base,
            index: pk_index,
        };

        let trl_parent = self.entities[trl_entity.0]
            .properties
            .iter()
            .position(|q| q.parent && q.referenced_property == Some(pk));
        let Some(parent_index) = trl_parent else {
            warn!(
                property = %qualified,
                "not translatable: no parent property in the translation table references the primary key"
            );
            self.property_mut(p).translation = None;
            return;
        };

        self.property_mut(p).translation = Some(TranslationLink {
            translation_property: trl_prop,
            trl_parent_property: PropertyRef {
                entity: trl_entity,
                index: parent_index,
            },
            trl_one_to_many_property: PropertyRef {
                entity: base,
                index: otm_index,
            },
        });
    }

    /// Freeze the builder into an immutable [`Model`].
    ///
    /// Computes positional indices, per-entity id/identifier/parent
    /// lists, the lookup maps and derived-read eligibility. Derived
    /// read is a pure function of six flags, all settled by now:
    /// active-column, audit-info, id, identifier, client/organization
    /// and being-referenced properties may be read without a full
    /// per-object authorization check.
    pub fn freeze(self) -> Result<Model, Error> {
        let mut entities = Vec::with_capacity(self.entities.len());
        let mut by_name = HashMap::new();
        let mut by_table = HashMap::new();

        for (i, builder) in self.entities.into_iter().enumerate() {
            let id = EntityId(i);
            if by_name.insert(builder.name.clone(), id).is_some() {
                return Err(Error::Duplicate(format!("entity {}", builder.name)));
            }
            if by_table
                .insert(builder.table_name.to_lowercase(), id)
                .is_some()
            {
                return Err(Error::Duplicate(format!("table {}", builder.table_name)));
            }

            let mut properties = builder.properties;
            let mut prop_by_name = HashMap::new();
            let mut prop_by_column = HashMap::new();
            let mut id_properties = Vec::new();
            let mut identifier_properties = Vec::new();
            let mut parent_properties = Vec::new();

            for (j, prop) in properties.iter_mut().enumerate() {
                prop.index_in_entity = j;
                prop.allow_derived_read = prop.active_column
                    || prop.audit_info
                    || prop.id
                    || prop.identifier
                    || prop.client_or_organization
                    || prop.being_referenced;

                if prop_by_name.insert(prop.name.clone(), j).is_some() {
                    return Err(Error::Duplicate(format!(
                        "property {}.{}",
                        builder.name, prop.name
                    )));
                }
                // One-to-many properties carry the foreign key column of
                // the target table; they do not claim a column here.
                if !prop.one_to_many
                    && prop_by_column
                        .insert(prop.column_name.to_lowercase(), j)
                        .is_some()
                {
                    return Err(Error::Duplicate(format!(
                        "column {}.{}",
                        builder.table_name, prop.column_name
                    )));
                }

                if prop.id {
                    id_properties.push(j);
                }
                if prop.identifier {
                    identifier_properties.push(j);
                }
                if prop.parent {
                    parent_properties.push(j);
                }
            }

            entities.push(Entity {
                id,
                name: builder.name,
                table_name: builder.table_name,
                properties,
                id_properties,
                identifier_properties,
                parent_properties,
                by_name: prop_by_name,
                by_column: prop_by_column,
            });
        }

        Ok(Model {
            entities,
            by_name,
            by_table,
        })
    }

    // "table.column" label for diagnostics
    fn qualified(&self, p: PropertyRef) -> String {
        let entity = &self.entities[p.entity.0];
        format!("{}.{}", entity.table_name, entity.properties[p.index].column_name)
    }
}
