// src/models/storage_condition.rs
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::{Endpoints, Entity, EntityConfig, EntityKind};
use crate::forms::schema::FormSchema;
use crate::status::EntityStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageCondition {
    pub storage_condition_id: i64,
    pub condition_name: String,
    #[serde(default)]
    pub temperature_min: Option<f64>,
    #[serde(default)]
    pub temperature_max: Option<f64>,
    #[serde(default)]
    pub humidity_min: Option<f64>,
    #[serde(default)]
    pub humidity_max: Option<f64>,
    #[serde(default)]
    pub light_level: Option<String>,
    pub status: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StorageConditionDraft {
    #[validate(length(min = 1, max = 100, message = "Condition name must be between 1 and 100 characters"))]
    pub condition_name: String,
    #[serde(default)]
    pub temperature_min: Option<f64>,
    #[serde(default)]
    pub temperature_max: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0, message = "Humidity must be between 0 and 100"))]
    #[serde(default)]
    pub humidity_min: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0, message = "Humidity must be between 0 and 100"))]
    #[serde(default)]
    pub humidity_max: Option<f64>,
    #[validate(length(max = 50, message = "Light level cannot exceed 50 characters"))]
    #[serde(default)]
    pub light_level: Option<String>,
    pub status: EntityStatus,
}

impl Entity for StorageCondition {
    type Draft = StorageConditionDraft;

    const KIND: EntityKind = EntityKind::StorageCondition;

    fn id(&self) -> i64 {
        self.storage_condition_id
    }

    fn status_code(&self) -> i64 {
        self.status
    }

    fn config() -> EntityConfig {
        EntityConfig::builder(EntityKind::StorageCondition, "StorageConditions")
            .endpoints(
                Endpoints::conventional("StorageCondition", "StorageConditions")
                    .with_detail("StorageCondition/GetDetailStorageCondition/{id}"),
            )
            .sortable("conditionName", "Name")
            .column("temperatureMin", "Temp min")
            .column("temperatureMax", "Temp max")
            .column("humidityMin", "Humidity min")
            .column("humidityMax", "Humidity max")
            .column("lightLevel", "Light")
            .sortable("status", "Status")
            .default_sort("conditionName")
            .form(
                FormSchema::new()
                    .text("conditionName", "Condition name")
                    .decimal("temperatureMin", "Minimum temperature", false)
                    .decimal("temperatureMax", "Maximum temperature", false)
                    .decimal("humidityMin", "Minimum humidity", false)
                    .decimal("humidityMax", "Maximum humidity", false)
                    .optional_text("lightLevel", "Light level")
                    .status()
                    .range("temperatureMin", "temperatureMax", "Temperature")
                    .range("humidityMin", "humidityMax", "Humidity"),
            )
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_endpoint_override() {
        let config = StorageCondition::config();
        assert_eq!(
            Endpoints::resolve(&config.endpoints.detail, 5),
            "StorageCondition/GetDetailStorageCondition/5"
        );
        assert_eq!(config.endpoints.list, "StorageCondition/StorageConditions");
        assert_eq!(config.form.ranges.len(), 2);
    }
}
