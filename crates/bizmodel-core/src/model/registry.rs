//! Model registry.
//!
//! Holds the process-wide frozen model. The model is installed once,
//! at schema-load time, and handed out as a shared `Arc` afterwards;
//! the lock only guards the install/swap, never the model contents.

use super::entity::EntityId;
use super::model::Model;
use crate::error::Error;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

/// Registry handing out the current frozen [`Model`].
#[derive(Debug, Default)]
pub struct ModelProvider {
    current: RwLock<Option<Arc<Model>>>,
}

impl ModelProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a frozen model, replacing any previous one. Returns the
    /// shared handle callers keep.
    pub fn install(&self, model: Model) -> Arc<Model> {
        let model = Arc::new(model);
        info!(entities = model.entities().len(), "model installed");
        *self.current.write() = Some(Arc::clone(&model));
        model
    }

    /// Whether a model has been installed.
    pub fn is_installed(&self) -> bool {
        self.current.read().is_some()
    }

    /// Get the current model.
    pub fn get(&self) -> Result<Arc<Model>, Error> {
        self.current.read().as_ref().cloned().ok_or(Error::NoModel)
    }

    /// Resolve an entity name against the current model.
    pub fn entity_id(&self, name: &str) -> Result<EntityId, Error> {
        Ok(self.get()?.entity_by_name(name)?.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntityBuilder, ModelBuilder, PropertyBuilder};

    fn one_entity_model() -> Model {
        let mut builder = ModelBuilder::new();
        builder.add_entity(
            EntityBuilder::new("Currency", "c_currency")
                .with_property(PropertyBuilder::new("id", "C_Currency_ID").id()),
        );
        builder.freeze().unwrap()
    }

    #[test]
    fn test_empty_provider() {
        let provider = ModelProvider::new();
        assert!(!provider.is_installed());
        assert!(matches!(provider.get(), Err(Error::NoModel)));
    }

    #[test]
    fn test_install_and_lookup() {
        let provider = ModelProvider::new();
        let model = provider.install(one_entity_model());
        assert!(provider.is_installed());

        let id = provider.entity_id("Currency").unwrap();
        assert_eq!(model.entity(id).table_name(), "c_currency");
        assert!(matches!(
            provider.entity_id("Unknown"),
            Err(Error::UnknownEntity(_))
        ));
    }

    #[test]
    fn test_install_replaces() {
        let provider = ModelProvider::new();
        provider.install(one_entity_model());

        let mut builder = ModelBuilder::new();
        builder.add_entity(EntityBuilder::new("Country", "c_country"));
        provider.install(builder.freeze().unwrap());

        assert!(provider.entity_id("Country").is_ok());
        assert!(provider.entity_id("Currency").is_err());
    }
}
