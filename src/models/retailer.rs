// src/models/retailer.rs
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::{Entity, EntityConfig, EntityKind};
use crate::forms::schema::FormSchema;
use crate::status::EntityStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Retailer {
    pub retailer_id: i64,
    pub retailer_name: String,
    #[serde(default)]
    pub contact_person: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub status: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RetailerDraft {
    #[validate(length(min = 1, max = 255, message = "Retailer name must be between 1 and 255 characters"))]
    pub retailer_name: String,
    #[validate(length(max = 100, message = "Contact person cannot exceed 100 characters"))]
    #[serde(default)]
    pub contact_person: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 7, max = 20, message = "Phone must be between 7 and 20 characters"))]
    #[serde(default)]
    pub phone: Option<String>,
    #[validate(length(max = 255, message = "Address cannot exceed 255 characters"))]
    #[serde(default)]
    pub address: Option<String>,
    pub status: EntityStatus,
}

impl Entity for Retailer {
    type Draft = RetailerDraft;

    const KIND: EntityKind = EntityKind::Retailer;

    fn id(&self) -> i64 {
        self.retailer_id
    }

    fn status_code(&self) -> i64 {
        self.status
    }

    // Retailers are deactivated rather than deleted, hence the red badge.
    fn config() -> EntityConfig {
        EntityConfig::builder(EntityKind::Retailer, "Retailers")
            .sortable("retailerName", "Name")
            .column("contactPerson", "Contact")
            .sortable("email", "Email")
            .column("address", "Address")
            .sortable("status", "Status")
            .default_sort("retailerName")
            .form(
                FormSchema::new()
                    .text("retailerName", "Retailer name")
                    .optional_text("contactPerson", "Contact person")
                    .email("email", "Email")
                    .phone("phone", "Phone", false)
                    .optional_text("address", "Address")
                    .status(),
            )
            .build()
    }
}
