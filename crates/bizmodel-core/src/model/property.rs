//! Property descriptors.
//!
//! A property describes one named attribute of an entity: a primitive
//! column, a reference (one-to-one / many-to-one) or a one-to-many
//! collection. Property descriptors are assembled by the model builder
//! and are read-only once the model is frozen.

use super::entity::EntityId;
use super::types::ScalarType;
use std::collections::BTreeSet;

/// Location of a property in the model arena.
///
/// Cross-references between properties are stored as refs rather than
/// owning pointers; the entity graph may be cyclic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyRef {
    /// Owning entity.
    pub entity: EntityId,
    /// Position of the property in the entity's ordered property list.
    pub index: usize,
}

/// Three-way linkage of a translatable property to its translation table.
///
/// All three references are resolved together or not at all; a property
/// with a `TranslationLink` is translatable by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslationLink {
    /// Column in the translation table holding the localized text.
    pub translation_property: PropertyRef,
    /// Foreign-key property in the translation table pointing back at
    /// the base entity.
    pub trl_parent_property: PropertyRef,
    /// One-to-many collection on the base entity exposing the
    /// translation rows.
    pub trl_one_to_many_property: PropertyRef,
}

/// A property descriptor within an entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Property {
    /// Property name (unique within the entity).
    pub name: String,
    /// Mapped SQL column name.
    pub column_name: String,
    /// Stable id of the column record in the data dictionary.
    pub column_id: Option<String>,
    /// Logical name of the column record in the data dictionary.
    pub name_of_column: Option<String>,
    /// Declared scalar type; `None` for association properties.
    pub scalar_type: Option<ScalarType>,

    /// Part of the primary key.
    pub id: bool,
    /// Part of the human-readable identifier of the entity.
    pub identifier: bool,
    /// Many-to-one reference to a parent entity.
    pub parent: bool,
    /// Child side of a parent/child association.
    pub child: bool,
    /// One-to-one association.
    pub one_to_one: bool,
    /// One-to-many collection.
    pub one_to_many: bool,
    /// Composite primary key holder (its parts are in [`Property::id_parts`]).
    pub composite_id: bool,
    /// Member of a composite primary key.
    pub part_of_composite_id: bool,
    /// Value is a generated UUID.
    pub uuid: bool,
    /// Accessed through a proxy entity (computed columns are not stored
    /// in the entity itself and are evaluated lazily).
    pub proxy: bool,
    /// Stored encrypted.
    pub encrypted: bool,
    /// Not exported; existence depends on [`Property::transient_condition`].
    pub transient: bool,
    /// Condition deciding whether the property is transient for a row.
    pub transient_condition: Option<String>,
    /// Value must be present.
    pub mandatory: bool,
    /// Value may change after insert.
    pub updatable: bool,
    /// Column is deactivated in the dictionary.
    pub inactive: bool,
    /// The entity's active/visibility flag column.
    pub active_column: bool,
    /// Audit-trail column (created/updated by/at).
    pub audit_info: bool,
    /// Tenant or organization scoping column.
    pub client_or_organization: bool,
    /// Used in the entity's default ordering.
    pub order_by: bool,
    /// Value is kept in the session cache between requests.
    pub stored_in_session: bool,
    /// Reference may escape the organization's natural tree.
    pub allowed_cross_org_reference: bool,
    /// Value is drawn from a document sequence.
    pub used_sequence: bool,

    /// Default value as it exists in the database (booleans are `Y`/`N`).
    pub default_value: Option<String>,
    /// Minimum allowed value, database representation.
    pub min_value: Option<String>,
    /// Maximum allowed value, database representation.
    pub max_value: Option<String>,
    /// Declared column length.
    pub field_length: u32,
    /// Ordering number within the dictionary.
    pub seqno: Option<i32>,
    /// SQL formula of a computed column.
    pub sql_logic: Option<String>,
    /// Enumerated allowed values; empty means no enumeration.
    pub allowed_values: BTreeSet<String>,

    /// The reference declares an explicit display column.
    pub has_display_column: bool,
    /// This property is the display column of a reference.
    pub is_display_value: bool,
    /// Name of the display property on the referenced entity.
    pub display_property_name: Option<String>,

    /// Entity this property points at, for associations.
    pub target_entity: Option<EntityId>,
    /// Property on the other side of the association; `None` when the
    /// association targets the referenced entity's primary key without
    /// naming a column.
    pub referenced_property: Option<PropertyRef>,
    /// Some other property's `referenced_property` points here.
    /// Referenced properties are readable in derived-read mode.
    pub being_referenced: bool,
    /// Property this one-to-one id is derived from.
    pub id_based_on: Option<PropertyRef>,
    /// Members of the composite key, when [`Property::composite_id`] is set.
    pub id_parts: Vec<PropertyRef>,

    /// Position in the entity's ordered property list. Gives O(1)
    /// positional access when reading row values.
    pub index_in_entity: usize,
    /// Whether the value may be read without a full per-object
    /// authorization check. Frozen from the id/identifier/active/audit/
    /// client-organization/being-referenced flags after the whole model
    /// has settled.
    pub allow_derived_read: bool,
    /// Resolved translation linkage; `None` means not translatable.
    pub translation: Option<TranslationLink>,
}

impl Property {
    /// Create a property descriptor with the given name and column.
    pub fn new(name: impl Into<String>, column_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_name: column_name.into(),
            ..Self::default()
        }
    }

    /// A property is a computed column when it carries SQL logic; it is
    /// then evaluated from the formula and accessed through a proxy.
    pub fn is_computed_column(&self) -> bool {
        self.sql_logic.is_some()
    }

    /// Whether translation linkage was resolved for this property.
    pub fn is_translatable(&self) -> bool {
        self.translation.is_some()
    }

    /// Mark the property as sequence-backed.
    ///
    /// The column name takes precedence over the argument: `DocumentNo`
    /// columns (any casing) always use a sequence, `Value` columns use
    /// one when requested, any other column never does.
    pub fn set_used_sequence(&mut self, used_sequence: bool) {
        self.used_sequence = self.column_name.eq_ignore_ascii_case("documentno")
            || (used_sequence && self.column_name == "Value");
    }

    /// Whether values must be checked against the enumerated set.
    pub fn check_allowed_values(&self) -> bool {
        !self.allowed_values.is_empty()
    }

    /// Check a database value against the enumerated set. Always false
    /// when the property declares no enumeration.
    pub fn is_allowed_value(&self, value: &str) -> bool {
        self.allowed_values.contains(value)
    }

    /// Comma-delimited list of allowed values, used for enums.
    pub fn concatenated_allowed_values(&self) -> String {
        let mut out = String::new();
        for v in &self.allowed_values {
            if !out.is_empty() {
                out.push_str(", ");
            }
            out.push_str(v);
        }
        out
    }
}
