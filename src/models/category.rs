// src/models/category.rs
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::{Entity, EntityConfig, EntityKind};
use crate::forms::schema::FormSchema;
use crate::status::EntityStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub category_id: i64,
    pub category_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDraft {
    #[validate(length(min = 1, max = 100, message = "Category name must be between 1 and 100 characters"))]
    pub category_name: String,
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    #[serde(default)]
    pub description: Option<String>,
    pub status: EntityStatus,
}

impl Entity for Category {
    type Draft = CategoryDraft;

    const KIND: EntityKind = EntityKind::Category;

    fn id(&self) -> i64 {
        self.category_id
    }

    fn status_code(&self) -> i64 {
        self.status
    }

    fn config() -> EntityConfig {
        EntityConfig::builder(EntityKind::Category, "Categories")
            .sortable("categoryName", "Name")
            .column("description", "Description")
            .sortable("status", "Status")
            .default_sort("categoryName")
            .form(
                FormSchema::new()
                    .text("categoryName", "Category name")
                    .optional_text("description", "Description")
                    .status(),
            )
            .build()
    }
}
