// src/forms/schema.rs
//! Declarative description of an entity's create/update form.

use serde_json::{Map, Number, Value};

use crate::entities::EntityKind;
use crate::error::{ClientError, ClientResult};
use crate::status::FormStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Phone,
    Integer,
    Decimal,
    /// ISO date, `YYYY-MM-DD`.
    Date,
    Flag,
    /// Foreign key chosen from another entity's list; `0` means unselected.
    Select(EntityKind),
    Status,
    /// Write-only value such as a password: required when creating, left out
    /// of an update while blank.
    Secret,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

/// `min_key <= max_key` whenever both are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRule {
    pub min_key: &'static str,
    pub max_key: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSchema {
    pub fields: Vec<FieldSpec>,
    pub ranges: Vec<RangeRule>,
}

impl FormSchema {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, key: &'static str, label: &'static str, kind: FieldKind, required: bool) -> Self {
        self.fields.push(FieldSpec { key, label, kind, required });
        self
    }

    pub fn text(self, key: &'static str, label: &'static str) -> Self {
        self.push(key, label, FieldKind::Text, true)
    }

    pub fn optional_text(self, key: &'static str, label: &'static str) -> Self {
        self.push(key, label, FieldKind::Text, false)
    }

    pub fn email(self, key: &'static str, label: &'static str) -> Self {
        self.push(key, label, FieldKind::Email, true)
    }

    pub fn phone(self, key: &'static str, label: &'static str, required: bool) -> Self {
        self.push(key, label, FieldKind::Phone, required)
    }

    pub fn integer(self, key: &'static str, label: &'static str, required: bool) -> Self {
        self.push(key, label, FieldKind::Integer, required)
    }

    pub fn decimal(self, key: &'static str, label: &'static str, required: bool) -> Self {
        self.push(key, label, FieldKind::Decimal, required)
    }

    pub fn date(self, key: &'static str, label: &'static str, required: bool) -> Self {
        self.push(key, label, FieldKind::Date, required)
    }

    pub fn flag(self, key: &'static str, label: &'static str) -> Self {
        self.push(key, label, FieldKind::Flag, false)
    }

    pub fn select(self, key: &'static str, label: &'static str, reference: EntityKind) -> Self {
        self.push(key, label, FieldKind::Select(reference), true)
    }

    pub fn secret(self, key: &'static str, label: &'static str) -> Self {
        self.push(key, label, FieldKind::Secret, true)
    }

    pub fn status(self) -> Self {
        self.push("status", "Status", FieldKind::Status, true)
    }

    pub fn range(mut self, min_key: &'static str, max_key: &'static str, label: &'static str) -> Self {
        self.ranges.push(RangeRule { min_key, max_key, label });
        self
    }

    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Entity lists the form needs for its dropdowns, in field order.
    pub fn references(&self) -> Vec<EntityKind> {
        let mut kinds = Vec::new();
        for field in &self.fields {
            if let FieldKind::Select(kind) = field.kind {
                if !kinds.contains(&kind) {
                    kinds.push(kind);
                }
            }
        }
        kinds
    }

    /// Blank values for a create form: selects start at the `0` sentinel, the
    /// status picker unselected.
    pub fn blank_values(&self) -> Map<String, Value> {
        let mut values = Map::new();
        for field in &self.fields {
            let value = match field.kind {
                FieldKind::Select(_) => Value::from(0),
                FieldKind::Status => FormStatus::Unselected.to_value(),
                FieldKind::Flag => Value::Bool(false),
                FieldKind::Text | FieldKind::Email | FieldKind::Phone if field.required => {
                    Value::String(String::new())
                }
                _ => Value::Null,
            };
            values.insert(field.key.to_string(), value);
        }
        values
    }

    /// Converts raw user input into the JSON value stored for `key`.
    pub fn parse_input(&self, key: &str, raw: &str) -> ClientResult<Value> {
        let field = self
            .field(key)
            .ok_or_else(|| ClientError::validation(format!("Unknown field '{}'", key)))?;
        let raw = raw.trim();

        let value = match field.kind {
            FieldKind::Text | FieldKind::Email | FieldKind::Phone | FieldKind::Date => {
                if raw.is_empty() && !field.required {
                    Value::Null
                } else {
                    Value::String(raw.to_string())
                }
            }
            FieldKind::Secret if raw.is_empty() => Value::Null,
            FieldKind::Secret => Value::String(raw.to_string()),
            FieldKind::Status => FormStatus::parse(raw)
                .map(|status| status.to_value())
                .ok_or_else(|| ClientError::validation(format!("{} must be active or inactive", field.label)))?,
            FieldKind::Integer | FieldKind::Select(_) => {
                if raw.is_empty() {
                    if matches!(field.kind, FieldKind::Integer) {
                        Value::Null
                    } else {
                        Value::from(0)
                    }
                } else {
                    let parsed: i64 = raw.parse().map_err(|_| {
                        ClientError::validation(format!("{} must be a whole number", field.label))
                    })?;
                    Value::from(parsed)
                }
            }
            FieldKind::Decimal => {
                if raw.is_empty() {
                    Value::Null
                } else {
                    let parsed: f64 = raw.parse().map_err(|_| {
                        ClientError::validation(format!("{} must be a number", field.label))
                    })?;
                    Number::from_f64(parsed).map(Value::Number).ok_or_else(|| {
                        ClientError::validation(format!("{} must be a finite number", field.label))
                    })?
                }
            }
            FieldKind::Flag => match raw.to_lowercase().as_str() {
                "true" | "yes" | "1" => Value::Bool(true),
                "false" | "no" | "0" | "" => Value::Bool(false),
                _ => {
                    return Err(ClientError::validation(format!(
                        "{} must be true or false",
                        field.label
                    )))
                }
            },
        };

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location_form() -> FormSchema {
        FormSchema::new()
            .text("locationCode", "Location code")
            .select("areaId", "Area", EntityKind::Area)
            .select("storageConditionId", "Storage condition", EntityKind::StorageCondition)
            .integer("capacity", "Capacity", false)
            .flag("isAvailable", "Available")
            .status()
    }

    #[test]
    fn test_references_in_field_order() {
        let schema = location_form().select("areaId", "Area again", EntityKind::Area);
        assert_eq!(
            schema.references(),
            vec![EntityKind::Area, EntityKind::StorageCondition]
        );
    }

    #[test]
    fn test_blank_values_use_sentinels() {
        let values = location_form().blank_values();
        assert_eq!(values["areaId"], Value::from(0));
        assert_eq!(values["status"], Value::Null);
        assert_eq!(values["locationCode"], Value::String(String::new()));
        assert_eq!(values["capacity"], Value::Null);
        assert_eq!(values["isAvailable"], Value::Bool(false));
    }

    #[test]
    fn test_parse_input() {
        let schema = location_form();
        assert_eq!(schema.parse_input("areaId", "4").unwrap(), Value::from(4));
        assert_eq!(schema.parse_input("areaId", "").unwrap(), Value::from(0));
        assert_eq!(schema.parse_input("capacity", "").unwrap(), Value::Null);
        assert_eq!(schema.parse_input("isAvailable", "yes").unwrap(), Value::Bool(true));
        assert_eq!(schema.parse_input("status", "Inactive").unwrap(), Value::from(2));
        assert_eq!(schema.parse_input("status", "").unwrap(), Value::Null);
        assert!(schema.parse_input("status", "deleted").is_err());
        assert!(schema.parse_input("capacity", "ten").is_err());
        assert!(schema.parse_input("nope", "1").is_err());
    }
}
