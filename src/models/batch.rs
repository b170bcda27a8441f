// src/models/batch.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::{Entity, EntityConfig, EntityKind};
use crate::forms::schema::FormSchema;
use crate::status::EntityStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub batch_id: i64,
    pub batch_code: String,
    pub goods_id: i64,
    pub supplier_id: i64,
    pub quantity: i64,
    #[serde(default)]
    pub manufacture_date: Option<NaiveDate>,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    pub status: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goods_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BatchDraft {
    #[validate(length(min = 1, max = 50, message = "Batch code must be between 1 and 50 characters"))]
    pub batch_code: String,
    #[validate(range(min = 1, message = "Please select goods"))]
    pub goods_id: i64,
    #[validate(range(min = 1, message = "Please select a supplier"))]
    pub supplier_id: i64,
    #[validate(range(min = 0, message = "Quantity must be non-negative"))]
    pub quantity: i64,
    #[serde(default)]
    pub manufacture_date: Option<NaiveDate>,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    pub status: EntityStatus,
}

impl Entity for Batch {
    type Draft = BatchDraft;

    const KIND: EntityKind = EntityKind::Batch;

    fn id(&self) -> i64 {
        self.batch_id
    }

    fn status_code(&self) -> i64 {
        self.status
    }

    fn config() -> EntityConfig {
        EntityConfig::builder(EntityKind::Batch, "Batches")
            .sortable("batchCode", "Code")
            .column("goodsName", "Goods")
            .sortable("quantity", "Quantity")
            .sortable("manufactureDate", "Manufactured")
            .sortable("expiryDate", "Expires")
            .sortable("status", "Status")
            .default_sort("expiryDate")
            .form(
                FormSchema::new()
                    .text("batchCode", "Batch code")
                    .select("goodsId", "Goods", EntityKind::Goods)
                    .select("supplierId", "Supplier", EntityKind::Supplier)
                    .integer("quantity", "Quantity", true)
                    .date("manufactureDate", "Manufacture date", false)
                    .date("expiryDate", "Expiry date", false)
                    .status()
                    .range("manufactureDate", "expiryDate", "Expiry date"),
            )
            .build()
    }
}
