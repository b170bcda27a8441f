// src/models/account.rs
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::{Entity, EntityConfig, EntityKind};
use crate::forms::schema::FormSchema;
use crate::status::{BadgeTone, EntityStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_id: i64,
    pub username: String,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: String,
    pub status: i64,
}

/// Password is only sent when creating an account or resetting it.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AccountDraft {
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: String,
    #[validate(length(min = 1, max = 100, message = "Full name must be between 1 and 100 characters"))]
    pub full_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 7, max = 20, message = "Phone must be between 7 and 20 characters"))]
    #[serde(default)]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 30, message = "Role must be between 1 and 30 characters"))]
    pub role: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub status: EntityStatus,
}

impl Entity for Account {
    type Draft = AccountDraft;

    const KIND: EntityKind = EntityKind::Account;

    fn id(&self) -> i64 {
        self.account_id
    }

    fn status_code(&self) -> i64 {
        self.status
    }

    fn config() -> EntityConfig {
        EntityConfig::builder(EntityKind::Account, "Accounts")
            .sortable("username", "Username")
            .sortable("fullName", "Full name")
            .sortable("email", "Email")
            .column("phone", "Phone")
            .sortable("role", "Role")
            .sortable("status", "Status")
            .default_sort("username")
            .inactive_tone(BadgeTone::Amber)
            .form(
                FormSchema::new()
                    .text("username", "Username")
                    .text("fullName", "Full name")
                    .email("email", "Email")
                    .phone("phone", "Phone", false)
                    .text("role", "Role")
                    .secret("password", "Password")
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
    fn test_password_optional_but_checked() {
        let mut draft: AccountDraft = serde_json::from_value(json!({
            "username": "jdoe",
            "fullName": "Jane Doe",
            "email": "jane@example.com",
            "role": "Staff",
            "status": 1
        }))
        .unwrap();
        assert!(draft.validate().is_ok());
        assert!(serde_json::to_value(&draft).unwrap().get("password").is_none());

        draft.password = Some("short".to_string());
        assert!(draft.validate().is_err());
    }
}
