// src/models/goods.rs
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::{Endpoints, Entity, EntityConfig, EntityKind};
use crate::forms::schema::FormSchema;
use crate::status::EntityStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goods {
    pub goods_id: i64,
    pub goods_code: String,
    pub goods_name: String,
    pub category_id: i64,
    pub supplier_id: i64,
    pub unit_measure_id: i64,
    pub storage_condition_id: i64,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub unit_price: Option<f64>,
    pub status: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GoodsDraft {
    #[validate(length(min = 1, max = 50, message = "Goods code must be between 1 and 50 characters"))]
    pub goods_code: String,
    #[validate(length(min = 1, max = 255, message = "Goods name must be between 1 and 255 characters"))]
    pub goods_name: String,
    #[validate(range(min = 1, message = "Please select a category"))]
    pub category_id: i64,
    #[validate(range(min = 1, message = "Please select a supplier"))]
    pub supplier_id: i64,
    #[validate(range(min = 1, message = "Please select a unit of measure"))]
    pub unit_measure_id: i64,
    #[validate(range(min = 1, message = "Please select a storage condition"))]
    pub storage_condition_id: i64,
    #[validate(length(max = 50, message = "Barcode cannot exceed 50 characters"))]
    #[serde(default)]
    pub barcode: Option<String>,
    #[validate(range(min = 0.0, message = "Unit price must be non-negative"))]
    #[serde(default)]
    pub unit_price: Option<f64>,
    pub status: EntityStatus,
}

impl Entity for Goods {
    type Draft = GoodsDraft;

    const KIND: EntityKind = EntityKind::Goods;

    fn id(&self) -> i64 {
        self.goods_id
    }

    fn status_code(&self) -> i64 {
        self.status
    }

    // The goods controller takes the id in the body on update.
    fn config() -> EntityConfig {
        EntityConfig::builder(EntityKind::Goods, "GoodsList")
            .endpoints(
                Endpoints::conventional("Goods", "GoodsList")
                    .with_update("Goods/Update")
                    .with_detail("Goods/GetDetailGoods/{id}"),
            )
            .sortable("goodsCode", "Code")
            .sortable("goodsName", "Name")
            .column("categoryName", "Category")
            .column("supplierName", "Supplier")
            .column("unitName", "Unit")
            .sortable("unitPrice", "Price")
            .sortable("status", "Status")
            .default_sort("goodsName")
            .form(
                FormSchema::new()
                    .text("goodsCode", "Goods code")
                    .text("goodsName", "Goods name")
                    .select("categoryId", "Category", EntityKind::Category)
                    .select("supplierId", "Supplier", EntityKind::Supplier)
                    .select("unitMeasureId", "Unit of measure", EntityKind::UnitMeasure)
                    .select("storageConditionId", "Storage condition", EntityKind::StorageCondition)
                    .optional_text("barcode", "Barcode")
                    .decimal("unitPrice", "Unit price", false)
                    .status(),
            )
            .build()
    }
}
