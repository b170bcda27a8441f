// src/models/location.rs
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::{Entity, EntityConfig, EntityKind, ListFilter};
use crate::forms::schema::FormSchema;
use crate::status::{BadgeTone, EntityStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub location_id: i64,
    pub location_code: String,
    pub location_name: String,
    pub area_id: i64,
    pub storage_condition_id: i64,
    #[serde(default)]
    pub capacity: Option<i64>,
    #[serde(default)]
    pub is_available: bool,
    pub status: i64,
    // Joined names some list endpoints include for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LocationDraft {
    #[validate(length(min = 1, max = 20, message = "Location code must be between 1 and 20 characters"))]
    pub location_code: String,
    #[validate(length(min = 1, max = 100, message = "Location name must be between 1 and 100 characters"))]
    pub location_name: String,
    #[validate(range(min = 1, message = "Please select an area"))]
    pub area_id: i64,
    #[validate(range(min = 1, message = "Please select a storage condition"))]
    pub storage_condition_id: i64,
    #[validate(range(min = 0, message = "Capacity must be non-negative"))]
    #[serde(default)]
    pub capacity: Option<i64>,
    #[serde(default)]
    pub is_available: bool,
    pub status: EntityStatus,
}

impl Entity for Location {
    type Draft = LocationDraft;

    const KIND: EntityKind = EntityKind::Location;

    fn id(&self) -> i64 {
        self.location_id
    }

    fn status_code(&self) -> i64 {
        self.status
    }

    fn config() -> EntityConfig {
        EntityConfig::builder(EntityKind::Location, "Locations")
            .sortable("locationCode", "Code")
            .sortable("locationName", "Name")
            .column("areaName", "Area")
            .column("conditionName", "Storage condition")
            .sortable("capacity", "Capacity")
            .column("isAvailable", "Available")
            .sortable("status", "Status")
            .filter(ListFilter::Availability)
            .default_sort("locationCode")
            .inactive_tone(BadgeTone::Amber)
            .form(
                FormSchema::new()
                    .text("locationCode", "Location code")
                    .text("locationName", "Location name")
                    .select("areaId", "Area", EntityKind::Area)
                    .select("storageConditionId", "Storage condition", EntityKind::StorageCondition)
                    .integer("capacity", "Capacity", false)
                    .flag("isAvailable", "Available")
                    .status(),
            )
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_location_decodes_without_joined_names() {
        let location: Location = serde_json::from_value(json!({
            "locationId": 3,
            "locationCode": "A-01",
            "locationName": "Aisle 1",
            "areaId": 1,
            "storageConditionId": 2,
            "isAvailable": true,
            "status": 1
        }))
        .unwrap();

        assert_eq!(location.capacity, None);
        assert!(location.is_available);
        let back = serde_json::to_value(&location).unwrap();
        assert!(back.get("areaName").is_none());
    }

    #[test]
    fn test_draft_requires_references() {
        let draft: LocationDraft = serde_json::from_value(json!({
            "locationCode": "A-01",
            "locationName": "Aisle 1",
            "areaId": 0,
            "storageConditionId": 2,
            "status": 1
        }))
        .unwrap();

        let err = draft.validate().unwrap_err();
        assert!(err.field_errors().contains_key("area_id"));
    }
}
