// src/models/unit_measure.rs
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::{Entity, EntityConfig, EntityKind};
use crate::forms::schema::FormSchema;
use crate::status::EntityStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitMeasure {
    pub unit_measure_id: i64,
    pub unit_name: String,
    pub symbol: String,
    pub status: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UnitMeasureDraft {
    #[validate(length(min = 1, max = 50, message = "Unit name must be between 1 and 50 characters"))]
    pub unit_name: String,
    #[validate(length(min = 1, max = 10, message = "Symbol must be between 1 and 10 characters"))]
    pub symbol: String,
    pub status: EntityStatus,
}

impl Entity for UnitMeasure {
    type Draft = UnitMeasureDraft;

    const KIND: EntityKind = EntityKind::UnitMeasure;

    fn id(&self) -> i64 {
        self.unit_measure_id
    }

    fn status_code(&self) -> i64 {
        self.status
    }

    fn config() -> EntityConfig {
        EntityConfig::builder(EntityKind::UnitMeasure, "UnitMeasures")
            .sortable("unitName", "Unit")
            .sortable("symbol", "Symbol")
            .sortable("status", "Status")
            .default_sort("unitName")
            .form(
                FormSchema::new()
                    .text("unitName", "Unit name")
                    .text("symbol", "Symbol")
                    .status(),
            )
            .build()
    }
}
