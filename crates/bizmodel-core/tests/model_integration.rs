//! Integration tests for dictionary loading, model freezing and rows.

use bizmodel_core::model::{ModelProvider, PropertyRef};
use bizmodel_core::{dictionary, BusinessObject, Value};
use std::sync::Arc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// A product catalog: a translatable product, its translation table
/// and a category parent.
const CATALOG: &str = r#"{
  "entities": [
    {
      "name": "Category",
      "table": "m_category",
      "columns": [
        { "property": "id", "column": "M_Category_ID", "type": "uuid", "id": true, "uuid": true },
        { "property": "name", "column": "Name", "type": "string", "identifier": true, "mandatory": true },
        { "property": "productList", "column": "M_Category_ID", "one_to_many": true, "child": true,
          "reference": { "entity": "Product" } }
      ]
    },
    {
      "name": "Product",
      "table": "m_product",
      "columns": [
        { "property": "id", "column": "M_Product_ID", "type": "uuid", "id": true, "uuid": true },
        { "property": "searchKey", "column": "Value", "type": "string", "identifier": true,
          "used_sequence": true, "field_length": 40 },
        { "property": "name", "column": "Name", "type": "string", "identifier": true,
          "translated": true, "mandatory": true },
        { "property": "description", "column": "Description", "type": "string", "translated": true },
        { "property": "comments", "column": "Comments", "type": "string" },
        { "property": "active", "column": "IsActive", "type": "bool", "active_column": true,
          "default_value": "Y" },
        { "property": "organization", "column": "AD_Org_ID", "client_or_organization": true },
        { "property": "created", "column": "Created", "type": "timestamp", "audit_info": true },
        { "property": "category", "column": "M_Category_ID", "parent": true,
          "reference": { "entity": "Category" } },
        { "property": "trlList", "column": "M_Product_ID", "one_to_many": true, "child": true,
          "reference": { "entity": "ProductTrl" } }
      ]
    },
    {
      "name": "ProductTrl",
      "table": "m_product_trl",
      "columns": [
        { "property": "id", "column": "M_Product_Trl_ID", "type": "uuid", "id": true },
        { "property": "language", "column": "AD_Language", "type": "string", "mandatory": true },
        { "property": "product", "column": "M_Product_ID", "parent": true,
          "reference": { "entity": "Product" } },
        { "property": "name", "column": "Name", "type": "string" },
        { "property": "description", "column": "Description", "type": "string" }
      ]
    }
  ]
}"#;

#[test]
fn test_catalog_end_to_end() {
    init_tracing();

    let provider = ModelProvider::new();
    let model = provider.install(dictionary::load(CATALOG).unwrap());

    // Lookups by name and by table, case-insensitive on the table.
    let product = model.entity_by_name("Product").unwrap();
    assert_eq!(model.entity_by_table("M_PRODUCT").unwrap().id(), product.id());
    assert!(model.get_entity("Warehouse").is_none());

    // Both translated columns resolved against the same trl table.
    for name in ["name", "description"] {
        let prop = product.get_property(name).unwrap();
        assert!(prop.is_translatable(), "{name} should be translatable");

        let link = prop.translation.unwrap();
        assert_eq!(model.property(link.trl_parent_property).name, "product");
        assert_eq!(model.property(link.trl_one_to_many_property).name, "trlList");
        assert_eq!(model.property(link.translation_property).column_name, prop.column_name);
    }
    // No translation column for comments; never marked as a candidate.
    assert!(!product.get_property("comments").unwrap().is_translatable());

    // Derived-read classification over the frozen flags.
    for name in ["id", "searchKey", "name", "active", "organization", "created"] {
        assert!(
            product.get_property(name).unwrap().allow_derived_read,
            "{name} should be derived-readable"
        );
    }
    assert!(!product.get_property("comments").unwrap().allow_derived_read);
    // The category pk is referenced by product.category, so it
    // qualifies through being-referenced alone.
    let category = model.entity_by_name("Category").unwrap();
    assert!(category.get_property("id").unwrap().being_referenced);
    assert!(category.get_property("id").unwrap().allow_derived_read);

    // Parent wiring: product.category targets Category's pk.
    let category_prop = product.get_property("category").unwrap();
    assert_eq!(category_prop.target_entity, Some(category.id()));
    assert_eq!(
        category_prop.referenced_property,
        Some(PropertyRef {
            entity: category.id(),
            index: category.get_property("id").unwrap().index_in_entity,
        })
    );

    // Sequence-backed search key (column Value honors the flag).
    assert!(product.get_property("searchKey").unwrap().used_sequence);
}

#[test]
fn test_rows_over_installed_model() {
    init_tracing();

    let model = Arc::new(dictionary::load(CATALOG).unwrap());

    let mut row = BusinessObject::new(Arc::clone(&model), "Product").unwrap();
    assert_eq!(row.entity_name(), "Product");

    row.set_id("6E1A");
    row.set("searchKey", "PRD-001");
    row.set("name", "Espresso beans");
    row.set("active", true);
    row.set("category", Value::Reference("C100".into()));
    row.set(
        "trlList",
        Value::ReferenceList(vec!["T1".into(), "T2".into()]),
    );

    assert_eq!(row.id().as_str(), Some("6E1A"));
    assert_eq!(row.get("id"), row.id());
    assert_eq!(row.get("name").as_str(), Some("Espresso beans"));
    assert_eq!(row.get("active").as_bool(), Some(true));
    assert_eq!(row.get("category").as_reference(), Some("C100"));
    assert_eq!(
        row.get("trlList").as_reference_list().map(<[String]>::len),
        Some(2)
    );

    // Values the dictionary never declared still read as null.
    assert!(row.get("weight").is_null());

    // The localized read path returns the stored value until the engine
    // resolves a translation row.
    assert_eq!(row.get_localized("name", "es_ES").as_str(), Some("Espresso beans"));

    // Positional access through the descriptor matches name access.
    let entity = row.entity();
    let name_prop = entity.get_property("name").unwrap();
    assert_eq!(entity.property_at(name_prop.index_in_entity).name, "name");
}

#[test]
fn test_translation_degrades_when_trl_table_is_incomplete() {
    init_tracing();

    // Same catalog, but the trl table lost its language column: every
    // translated column degrades, the load itself still succeeds.
    let broken = CATALOG.replace("\"column\": \"AD_Language\"", "\"column\": \"Language\"");
    let model = dictionary::load(&broken).unwrap();

    let product = model.entity_by_name("Product").unwrap();
    assert!(!product.get_property("name").unwrap().is_translatable());
    assert!(!product.get_property("description").unwrap().is_translatable());
}
