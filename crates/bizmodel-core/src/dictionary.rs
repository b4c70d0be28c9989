//! Data-dictionary loading.
//!
//! The metamodel is populated from an external data dictionary,
//! decoded here from a JSON document. Loading is a three-pass build:
//! allocate every entity and property, wire cross-references, then
//! resolve translation candidates. Translation resolution inspects
//! the already-wired link structure, so it has to run last.
//!
//! Reference wiring errors (unknown entity or property names,
//! duplicates) abort the load; translation resolution failures only
//! downgrade the affected property, matching the non-fatal contract of
//! [`ModelBuilder::set_translatable`].

use crate::error::Error;
use crate::model::{
    EntityBuilder, EntityId, Model, ModelBuilder, Property, PropertyRef, ScalarType,
};
use serde::Deserialize;
use tracing::debug;

/// Table-name suffix of translation tables: `<base table>_trl`.
pub const TRL_TABLE_SUFFIX: &str = "_trl";

/// A decoded data-dictionary document.
#[derive(Debug, Clone, Deserialize)]
pub struct DictionaryDocument {
    /// Entity records, in registration order.
    pub entities: Vec<EntityRecord>,
}

/// One entity record of the dictionary.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityRecord {
    /// Entity name.
    pub name: String,
    /// Mapped SQL table.
    pub table: String,
    /// Column records, in declaration order.
    #[serde(default)]
    pub columns: Vec<ColumnRecord>,
}

/// An association declared by a column record.
#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceRecord {
    /// Referenced entity name.
    pub entity: String,
    /// Referenced property name; absent when the reference targets the
    /// entity's primary key without naming a column.
    #[serde(default)]
    pub property: Option<String>,
}

/// One column record of the dictionary. Booleans default to false and
/// may be omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnRecord {
    /// Property name.
    pub property: String,
    /// SQL column name.
    pub column: String,
    /// Dictionary id of the column record.
    #[serde(default)]
    pub column_id: Option<String>,
    /// Logical name of the column record.
    #[serde(default)]
    pub name_of_column: Option<String>,
    /// Declared scalar type; absent for associations.
    #[serde(default, rename = "type")]
    pub scalar_type: Option<ScalarType>,

    #[serde(default)]
    pub id: bool,
    #[serde(default)]
    pub identifier: bool,
    #[serde(default)]
    pub parent: bool,
    #[serde(default)]
    pub child: bool,
    #[serde(default)]
    pub one_to_one: bool,
    #[serde(default)]
    pub one_to_many: bool,
    #[serde(default)]
    pub composite_id: bool,
    #[serde(default)]
    pub part_of_composite_id: bool,
    #[serde(default)]
    pub uuid: bool,
    #[serde(default)]
    pub proxy: bool,
    #[serde(default)]
    pub encrypted: bool,
    #[serde(default)]
    pub transient: bool,
    #[serde(default)]
    pub transient_condition: Option<String>,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default)]
    pub updatable: bool,
    #[serde(default)]
    pub inactive: bool,
    #[serde(default)]
    pub active_column: bool,
    #[serde(default)]
    pub audit_info: bool,
    #[serde(default)]
    pub client_or_organization: bool,
    #[serde(default)]
    pub order_by: bool,
    #[serde(default)]
    pub stored_in_session: bool,
    #[serde(default)]
    pub allowed_cross_org_reference: bool,
    /// Sequence-backed request; the column rules of
    /// [`Property::set_used_sequence`] still apply.
    #[serde(default)]
    pub used_sequence: bool,
    /// Candidate for translation; resolved in the last pass.
    #[serde(default)]
    pub translated: bool,

    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub min_value: Option<String>,
    #[serde(default)]
    pub max_value: Option<String>,
    #[serde(default)]
    pub field_length: u32,
    #[serde(default)]
    pub seqno: Option<i32>,
    #[serde(default)]
    pub sql_logic: Option<String>,
    #[serde(default)]
    pub allowed_values: Vec<String>,

    /// Explicit display column of a table reference.
    #[serde(default)]
    pub display_property: Option<String>,
    /// This column is the display column of a reference.
    #[serde(default)]
    pub display_value: bool,

    /// Declared association.
    #[serde(default)]
    pub reference: Option<ReferenceRecord>,
    /// Property (same entity) this one-to-one id is derived from.
    #[serde(default)]
    pub id_based_on: Option<String>,
    /// Members of a composite key, for the composite holder.
    #[serde(default)]
    pub id_parts: Vec<String>,
}

/// Load a model from a JSON dictionary document.
pub fn load(json: &str) -> Result<Model, Error> {
    let doc: DictionaryDocument = serde_json::from_str(json)?;
    build(doc)
}

/// Build a model from a decoded dictionary document.
pub fn build(doc: DictionaryDocument) -> Result<Model, Error> {
    debug!(entities = doc.entities.len(), "building model from dictionary");
    let mut builder = ModelBuilder::new();

    // Pass 1: allocate every entity and property.
    let ids: Vec<EntityId> = doc
        .entities
        .iter()
        .map(|entity| {
            let mut eb = EntityBuilder::new(&entity.name, &entity.table);
            for column in &entity.columns {
                eb = eb.with_property(property_from(column));
            }
            builder.add_entity(eb)
        })
        .collect();

    // Pass 2: wire references.
    for (entity, &eid) in doc.entities.iter().zip(&ids) {
        for column in &entity.columns {
            let p = resolve(&builder, eid, &entity.name, &column.property)?;

            if let Some(reference) = &column.reference {
                let target = builder
                    .entity_id(&reference.entity)
                    .ok_or_else(|| Error::UnknownEntity(reference.entity.clone()))?;

                if column.one_to_many {
                    builder.set_target_entity(p, target);
                } else if let Some(target_property) = &reference.property {
                    let target_ref =
                        resolve(&builder, target, &reference.entity, target_property)?;
                    builder.set_referenced_property(p, target_ref);
                } else if column.parent {
                    // parent references point at the primary key and
                    // carry the back-link translation resolution needs
                    let pk = builder.first_id_ref(target).ok_or_else(|| {
                        Error::Dictionary(format!(
                            "entity {} has no primary key for parent reference {}.{}",
                            reference.entity, entity.name, column.property
                        ))
                    })?;
                    builder.set_referenced_property(p, pk);
                } else {
                    builder.set_target_entity(p, target);
                }
            }

            if let Some(base) = &column.id_based_on {
                let base_ref = resolve(&builder, eid, &entity.name, base)?;
                builder.set_id_based_on(p, base_ref);
            }
            for part in &column.id_parts {
                let part_ref = resolve(&builder, eid, &entity.name, part)?;
                builder.add_id_part(p, part_ref);
            }
        }
    }

    // Pass 3: resolve translation candidates against the wired graph.
    for (entity, &eid) in doc.entities.iter().zip(&ids) {
        let trl_table = format!("{}{}", entity.table, TRL_TABLE_SUFFIX);
        for column in &entity.columns {
            if !column.translated {
                continue;
            }
            let p = resolve(&builder, eid, &entity.name, &column.property)?;
            let candidate = builder
                .entity_id_by_table(&trl_table)
                .and_then(|trl| builder.property_ref_by_column(trl, &column.column));
            builder.set_translatable(p, candidate);
        }
    }

    builder.freeze()
}

fn resolve(
    builder: &ModelBuilder,
    entity: EntityId,
    entity_name: &str,
    property: &str,
) -> Result<PropertyRef, Error> {
    builder
        .property_ref(entity, property)
        .ok_or_else(|| Error::UnknownProperty {
            entity: entity_name.to_string(),
            property: property.to_string(),
        })
}

fn property_from(record: &ColumnRecord) -> Property {
    let mut prop = Property::new(&record.property, &record.column);
    prop.column_id = record.column_id.clone();
    prop.name_of_column = record.name_of_column.clone();
    prop.scalar_type = record.scalar_type;

    prop.id = record.id;
    prop.identifier = record.identifier;
    prop.parent = record.parent;
    prop.child = record.child;
    prop.one_to_one = record.one_to_one;
    prop.one_to_many = record.one_to_many;
    prop.composite_id = record.composite_id;
    prop.part_of_composite_id = record.part_of_composite_id;
    prop.uuid = record.uuid;
    prop.proxy = record.proxy;
    prop.encrypted = record.encrypted;
    prop.transient = record.transient;
    prop.transient_condition = record.transient_condition.clone();
    prop.mandatory = record.mandatory;
    prop.updatable = record.updatable;
    prop.inactive = record.inactive;
    prop.active_column = record.active_column;
    prop.audit_info = record.audit_info;
    prop.client_or_organization = record.client_or_organization;
    prop.order_by = record.order_by;
    prop.stored_in_session = record.stored_in_session;
    prop.allowed_cross_org_reference = record.allowed_cross_org_reference;
    prop.set_used_sequence(record.used_sequence);

    prop.default_value = record.default_value.clone();
    prop.min_value = record.min_value.clone();
    prop.max_value = record.max_value.clone();
    prop.field_length = record.field_length;
    prop.seqno = record.seqno;
    prop.sql_logic = record.sql_logic.clone();
    prop.allowed_values = record.allowed_values.iter().cloned().collect();

    if let Some(display) = &record.display_property {
        prop.has_display_column = true;
        prop.display_property_name = Some(display.clone());
    }
    prop.is_display_value = record.display_value;

    prop
}
