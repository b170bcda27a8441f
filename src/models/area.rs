// src/models/area.rs
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::{Entity, EntityConfig, EntityKind};
use crate::forms::schema::FormSchema;
use crate::status::EntityStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    pub area_id: i64,
    pub area_code: String,
    pub area_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AreaDraft {
    #[validate(length(min = 1, max = 20, message = "Area code must be between 1 and 20 characters"))]
    pub area_code: String,
    #[validate(length(min = 1, max = 100, message = "Area name must be between 1 and 100 characters"))]
    pub area_name: String,
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    #[serde(default)]
    pub description: Option<String>,
    pub status: EntityStatus,
}

impl Entity for Area {
    type Draft = AreaDraft;

    const KIND: EntityKind = EntityKind::Area;

    fn id(&self) -> i64 {
        self.area_id
    }

    fn status_code(&self) -> i64 {
        self.status
    }

    fn config() -> EntityConfig {
        EntityConfig::builder(EntityKind::Area, "Areas")
            .sortable("areaCode", "Code")
            .sortable("areaName", "Name")
            .column("description", "Description")
            .sortable("status", "Status")
            .default_sort("areaName")
            .form(
                FormSchema::new()
                    .text("areaCode", "Area code")
                    .text("areaName", "Area name")
                    .optional_text("description", "Description")
                    .status(),
            )
            .build()
    }
}
