//! Dynamic business-object rows.
//!
//! One [`BusinessObject`] represents one persisted row. There is no
//! per-entity struct hierarchy: every row is the same type, carrying a
//! reference to its entity descriptor, and stores its values in a
//! loosely-typed map keyed by property name.
//!
//! This layer performs no validation, type checking or authorization.
//! Those checks belong to the engine layers consuming the model; the
//! descriptors supply the classification data (for instance
//! [`Property::allow_derived_read`](crate::model::Property)) those
//! layers act on.

use crate::error::Error;
use crate::model::{Entity, EntityId, Model};
use bizmodel_value::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Reserved key under which the primary key value is stored.
pub const ID: &str = "id";

const NULL: Value = Value::Null;

/// A dynamic business-object row.
#[derive(Debug, Clone)]
pub struct BusinessObject {
    model: Arc<Model>,
    entity: EntityId,
    values: HashMap<String, Value>,
}

impl BusinessObject {
    /// Create an empty row for the named entity.
    pub fn new(model: Arc<Model>, entity_name: &str) -> Result<Self, Error> {
        let entity = model.entity_by_name(entity_name)?.id();
        Ok(Self::for_entity(model, entity))
    }

    /// Create an empty row for a known entity id.
    pub fn for_entity(model: Arc<Model>, entity: EntityId) -> Self {
        Self {
            model,
            entity,
            values: HashMap::new(),
        }
    }

    /// The entity descriptor of this row.
    pub fn entity(&self) -> &Entity {
        self.model.entity(self.entity)
    }

    /// Name of the entity this row belongs to.
    pub fn entity_name(&self) -> &str {
        self.entity().name()
    }

    /// Get the value of the property named `property`.
    ///
    /// A key that was never set reads as [`Value::Null`]; "absent" and
    /// "present but null" are indistinguishable at this layer.
    pub fn get(&self, property: &str) -> &Value {
        self.values.get(property).unwrap_or(&NULL)
    }

    /// Get the value of `property`, translating it, if possible, to
    /// the given language.
    ///
    /// The localized lookup itself is performed by the engine runtime
    /// using the property's translation linkage; this accessor reads
    /// the stored value.
    pub fn get_localized(&self, property: &str, _language: &str) -> &Value {
        self.get(property)
    }

    /// Set the value of the property named `property`.
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(property.into(), value.into());
    }

    /// Raw read, used by system code. Identical to [`BusinessObject::get`];
    /// the checked path differs only in the layers above.
    pub fn value(&self, property: &str) -> &Value {
        self.get(property)
    }

    /// Raw write without any checking. Should be used with care; used
    /// by system code.
    pub fn set_value(&mut self, property: impl Into<String>, value: impl Into<Value>) {
        self.set(property, value);
    }

    /// The primary key value, stored under the reserved [`ID`] key.
    pub fn id(&self) -> &Value {
        self.get(ID)
    }

    /// Set the primary key value.
    pub fn set_id(&mut self, id: impl Into<Value>) {
        self.set(ID, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntityBuilder, ModelBuilder, PropertyBuilder, ScalarType};

    fn order_model() -> Arc<Model> {
        let mut builder = ModelBuilder::new();
        builder.add_entity(
            EntityBuilder::new("Order", "c_order")
                .with_property(
                    PropertyBuilder::primitive("id", "C_Order_ID", ScalarType::Uuid).id(),
                )
                .with_property(
                    PropertyBuilder::primitive("documentNo", "DocumentNo", ScalarType::String)
                        .identifier(),
                ),
        );
        Arc::new(builder.freeze().unwrap())
    }

    #[test]
    fn test_unknown_entity() {
        assert!(matches!(
            BusinessObject::new(order_model(), "Invoice"),
            Err(Error::UnknownEntity(_))
        ));
    }

    #[test]
    fn test_id_key_aliasing() {
        let mut order = BusinessObject::new(order_model(), "Order").unwrap();
        order.set(ID, "A1B2C3");
        assert_eq!(order.get(ID).as_str(), Some("A1B2C3"));
        assert_eq!(order.id().as_str(), Some("A1B2C3"));

        order.set_id("D4E5F6");
        assert_eq!(order.get(ID).as_str(), Some("D4E5F6"));
    }

    #[test]
    fn test_missing_key_reads_null() {
        let order = BusinessObject::new(order_model(), "Order").unwrap();
        assert!(order.get("documentNo").is_null());
        assert!(order.id().is_null());
    }

    #[test]
    fn test_set_get_roundtrip() {
        let mut order = BusinessObject::new(order_model(), "Order").unwrap();
        order.set("documentNo", "1000023");
        assert_eq!(order.get("documentNo").as_str(), Some("1000023"));
        assert_eq!(order.value("documentNo"), order.get("documentNo"));
        assert_eq!(order.entity_name(), "Order");

        // No schema is enforced; unknown keys are stored structurally.
        order.set_value("freeForm", 12i32);
        assert_eq!(order.get("freeForm").as_i32(), Some(12));
    }

    #[test]
    fn test_localized_read_falls_back_to_stored_value() {
        let mut order = BusinessObject::new(order_model(), "Order").unwrap();
        order.set("documentNo", "1000023");
        assert_eq!(
            order.get_localized("documentNo", "en_US"),
            order.get("documentNo")
        );
    }
}
