// src/entities.rs
//! Per-entity configuration: one `EntityConfig` drives the list, table and
//! forms for every managed record type.

use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;
use strum::{AsRefStr, Display, EnumIter, EnumString};
use validator::Validate;

use crate::forms::schema::FormSchema;
use crate::status::BadgeTone;

// ==================== ENTITY KINDS ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EntityKind {
    Area,
    Location,
    StorageCondition,
    Goods,
    Category,
    UnitMeasure,
    Supplier,
    Retailer,
    Batch,
    Account,
}

impl EntityKind {
    /// Human label, singular.
    pub const fn label(&self) -> &'static str {
        match self {
            EntityKind::Area => "Area",
            EntityKind::Location => "Location",
            EntityKind::StorageCondition => "Storage condition",
            EntityKind::Goods => "Goods",
            EntityKind::Category => "Category",
            EntityKind::UnitMeasure => "Unit of measure",
            EntityKind::Supplier => "Supplier",
            EntityKind::Retailer => "Retailer",
            EntityKind::Batch => "Batch",
            EntityKind::Account => "Account",
        }
    }

    /// Path segment used by the backend controllers.
    pub const fn resource(&self) -> &'static str {
        match self {
            EntityKind::Area => "Area",
            EntityKind::Location => "Location",
            EntityKind::StorageCondition => "StorageCondition",
            EntityKind::Goods => "Goods",
            EntityKind::Category => "Category",
            EntityKind::UnitMeasure => "UnitMeasure",
            EntityKind::Supplier => "Supplier",
            EntityKind::Retailer => "Retailer",
            EntityKind::Batch => "Batch",
            EntityKind::Account => "Account",
        }
    }

    /// Wire name of the record's identifier.
    pub const fn id_field(&self) -> &'static str {
        match self {
            EntityKind::Area => "areaId",
            EntityKind::Location => "locationId",
            EntityKind::StorageCondition => "storageConditionId",
            EntityKind::Goods => "goodsId",
            EntityKind::Category => "categoryId",
            EntityKind::UnitMeasure => "unitMeasureId",
            EntityKind::Supplier => "supplierId",
            EntityKind::Retailer => "retailerId",
            EntityKind::Batch => "batchId",
            EntityKind::Account => "accountId",
        }
    }

    /// Wire name of the field shown in dropdowns that reference this kind.
    pub const fn name_field(&self) -> &'static str {
        match self {
            EntityKind::Area => "areaName",
            EntityKind::Location => "locationName",
            EntityKind::StorageCondition => "conditionName",
            EntityKind::Goods => "goodsName",
            EntityKind::Category => "categoryName",
            EntityKind::UnitMeasure => "unitName",
            EntityKind::Supplier => "supplierName",
            EntityKind::Retailer => "retailerName",
            EntityKind::Batch => "batchCode",
            EntityKind::Account => "username",
        }
    }
}

// ==================== ENDPOINTS ====================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub list: String,
    pub create: String,
    pub update: String,
    pub delete: String,
    pub detail: String,
}

impl Endpoints {
    /// `{Entity}/{Entities}`, `{Entity}/Create`, `{Entity}/Update/{id}`,
    /// `{Entity}/Delete/{id}`, `{Entity}/{Entity}ById/{id}`.
    pub fn conventional(resource: &str, plural: &str) -> Self {
        Self {
            list: format!("{}/{}", resource, plural),
            create: format!("{}/Create", resource),
            update: format!("{}/Update/{{id}}", resource),
            delete: format!("{}/Delete/{{id}}", resource),
            detail: format!("{}/{}ById/{{id}}", resource, resource),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    pub fn with_update(mut self, update: impl Into<String>) -> Self {
        self.update = update.into();
        self
    }

    /// Substitutes `{id}`; templates without a placeholder are returned as-is.
    pub fn resolve(template: &str, id: i64) -> String {
        template.replace("{id}", &id.to_string())
    }
}

// ==================== COLUMNS & FILTERS ====================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub key: &'static str,
    pub title: &'static str,
    pub sortable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFilter {
    Status,
    Availability,
}

// ==================== CONFIG ====================

#[derive(Debug, Clone)]
pub struct EntityConfig {
    pub kind: EntityKind,
    pub endpoints: Endpoints,
    pub columns: Vec<Column>,
    pub filters: Vec<ListFilter>,
    pub form: FormSchema,
    pub default_sort: &'static str,
    pub inactive_tone: BadgeTone,
}

impl EntityConfig {
    pub fn builder(kind: EntityKind, plural: &str) -> EntityConfigBuilder {
        EntityConfigBuilder {
            config: EntityConfig {
                kind,
                endpoints: Endpoints::conventional(kind.resource(), plural),
                columns: Vec::new(),
                filters: vec![ListFilter::Status],
                form: FormSchema::new(),
                default_sort: kind.id_field(),
                inactive_tone: BadgeTone::Red,
            },
        }
    }

    pub fn is_sortable(&self, field: &str) -> bool {
        self.columns.iter().any(|c| c.sortable && c.key == field)
    }

    pub fn supports(&self, filter: ListFilter) -> bool {
        self.filters.contains(&filter)
    }
}

pub struct EntityConfigBuilder {
    config: EntityConfig,
}

impl EntityConfigBuilder {
    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.config.endpoints = endpoints;
        self
    }

    pub fn column(mut self, key: &'static str, title: &'static str) -> Self {
        self.config.columns.push(Column { key, title, sortable: false });
        self
    }

    pub fn sortable(mut self, key: &'static str, title: &'static str) -> Self {
        self.config.columns.push(Column { key, title, sortable: true });
        self
    }

    pub fn filter(mut self, filter: ListFilter) -> Self {
        if !self.config.filters.contains(&filter) {
            self.config.filters.push(filter);
        }
        self
    }

    pub fn form(mut self, form: FormSchema) -> Self {
        self.config.form = form;
        self
    }

    pub fn default_sort(mut self, field: &'static str) -> Self {
        self.config.default_sort = field;
        self
    }

    pub fn inactive_tone(mut self, tone: BadgeTone) -> Self {
        self.config.inactive_tone = tone;
        self
    }

    pub fn build(self) -> EntityConfig {
        self.config
    }
}

// ==================== ENTITY TRAIT ====================

/// A record type the dashboard manages.
pub trait Entity: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    /// Payload for create; also used to check an update's merged values.
    type Draft: Serialize + DeserializeOwned + Validate + Send + Sync;

    const KIND: EntityKind;

    fn id(&self) -> i64;

    fn status_code(&self) -> i64;

    fn config() -> EntityConfig;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_kind_from_str() {
        assert_eq!(EntityKind::from_str("storage_condition").unwrap(), EntityKind::StorageCondition);
        assert_eq!(EntityKind::from_str("Goods").unwrap(), EntityKind::Goods);
        assert_eq!(EntityKind::UnitMeasure.to_string(), "unit_measure");
        assert!(EntityKind::from_str("warehouse").is_err());
        assert_eq!(EntityKind::iter().count(), 10);
    }

    #[test]
    fn test_conventional_endpoints() {
        let endpoints = Endpoints::conventional("Area", "Areas");
        assert_eq!(endpoints.list, "Area/Areas");
        assert_eq!(endpoints.create, "Area/Create");
        assert_eq!(Endpoints::resolve(&endpoints.update, 7), "Area/Update/7");
        assert_eq!(Endpoints::resolve(&endpoints.delete, 7), "Area/Delete/7");
        assert_eq!(Endpoints::resolve(&endpoints.detail, 7), "Area/AreaById/7");
        assert_eq!(Endpoints::resolve("Goods/Update", 7), "Goods/Update");
    }

    #[test]
    fn test_builder() {
        let config = EntityConfig::builder(EntityKind::Location, "Locations")
            .sortable("locationCode", "Code")
            .column("capacity", "Capacity")
            .filter(ListFilter::Availability)
            .filter(ListFilter::Status)
            .inactive_tone(BadgeTone::Amber)
            .build();

        assert!(config.is_sortable("locationCode"));
        assert!(!config.is_sortable("capacity"));
        assert!(!config.is_sortable("unknown"));
        assert!(config.supports(ListFilter::Availability));
        assert_eq!(config.filters.len(), 2);
        assert_eq!(config.default_sort, "locationId");
        assert_eq!(config.endpoints.list, "Location/Locations");
    }
}
