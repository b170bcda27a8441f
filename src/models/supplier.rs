// src/models/supplier.rs
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::{Entity, EntityConfig, EntityKind};
use crate::forms::schema::FormSchema;
use crate::status::{BadgeTone, EntityStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub supplier_id: i64,
    pub supplier_name: String,
    #[serde(default)]
    pub contact_person: Option<String>,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub address: Option<String>,
    pub status: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SupplierDraft {
    #[validate(length(min = 1, max = 255, message = "Supplier name must be between 1 and 255 characters"))]
    pub supplier_name: String,
    #[validate(length(max = 100, message = "Contact person cannot exceed 100 characters"))]
    #[serde(default)]
    pub contact_person: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 7, max = 20, message = "Phone must be between 7 and 20 characters"))]
    pub phone: String,
    #[validate(length(max = 255, message = "Address cannot exceed 255 characters"))]
    #[serde(default)]
    pub address: Option<String>,
    pub status: EntityStatus,
}

impl Entity for Supplier {
    type Draft = SupplierDraft;

    const KIND: EntityKind = EntityKind::Supplier;

    fn id(&self) -> i64 {
        self.supplier_id
    }

    fn status_code(&self) -> i64 {
        self.status
    }

    fn config() -> EntityConfig {
        EntityConfig::builder(EntityKind::Supplier, "Suppliers")
            .sortable("supplierName", "Name")
            .column("contactPerson", "Contact")
            .sortable("email", "Email")
            .column("phone", "Phone")
            .sortable("status", "Status")
            .default_sort("supplierName")
            .inactive_tone(BadgeTone::Amber)
            .form(
                FormSchema::new()
                    .text("supplierName", "Supplier name")
                    .optional_text("contactPerson", "Contact person")
                    .email("email", "Email")
                    .phone("phone", "Phone", true)
                    .optional_text("address", "Address")
                    .status(),
            )
            .build()
    }
}
