// src/validator.rs - Form validation before anything reaches the network
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ClientError;
use crate::forms::modal::ModalKind;
use crate::forms::schema::{FieldKind, FieldSpec, FormSchema, RangeRule};
use crate::status::{EntityStatus, FormStatus};

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
    static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9][0-9 ().-]{6,19}$").unwrap();
}

// ==================== VALIDATION RESULT ====================

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct FieldIssues {
    pub field: String,
    pub messages: Vec<String>,
}

/// Issues keep the order they were found in, which is form field order.
#[derive(Debug, Default, Serialize)]
pub struct ValidationResult {
    pub errors: Vec<FieldIssues>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let (field, message) = (field.into(), message.into());
        match self.errors.iter_mut().find(|issue| issue.field == field) {
            Some(issue) => issue.messages.push(message),
            None => self.errors.push(FieldIssues { field, messages: vec![message] }),
        }
    }

    /// One aggregate message: the whole form gets a single toast.
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .flat_map(|issue| issue.messages.iter().cloned())
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn to_client_error(&self) -> ClientError {
        ClientError::Validation(self.summary())
    }
}

// ==================== FIELD VALIDATORS ====================

pub struct FieldValidator;

impl FieldValidator {
    pub fn not_empty(value: &str, label: &str) -> Result<(), String> {
        if value.trim().is_empty() {
            Err(format!("{} is required", label))
        } else {
            Ok(())
        }
    }

    pub fn email(value: &str) -> Result<(), String> {
        if EMAIL_REGEX.is_match(value.trim()) {
            Ok(())
        } else {
            Err("Invalid email format".to_string())
        }
    }

    pub fn phone(value: &str) -> Result<(), String> {
        if PHONE_REGEX.is_match(value.trim()) {
            Ok(())
        } else {
            Err("Invalid phone number format".to_string())
        }
    }

    /// Dropdowns use `0` for "nothing picked".
    pub fn selected(value: i64, label: &str) -> Result<(), String> {
        if value > 0 {
            Ok(())
        } else {
            Err(format!("Please select {}", label.to_lowercase()))
        }
    }

    pub fn status(value: FormStatus) -> Result<EntityStatus, String> {
        value
            .selected()
            .ok_or_else(|| "Please select a status".to_string())
    }

    pub fn date(value: &str, label: &str) -> Result<NaiveDate, String> {
        NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
            .map_err(|_| format!("{} must be a date (YYYY-MM-DD)", label))
    }

    pub fn range<T: PartialOrd + std::fmt::Display>(min: T, max: T, label: &str) -> Result<(), String> {
        if min > max {
            Err(format!("{}: minimum ({}) must not exceed maximum ({})", label, min, max))
        } else {
            Ok(())
        }
    }
}

// ==================== SCHEMA VALIDATION ====================

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        _ => false,
    }
}

fn check_field(field: &FieldSpec, value: Option<&Value>, modal: ModalKind) -> Result<(), String> {
    match field.kind {
        FieldKind::Select(_) => {
            let code = value.and_then(Value::as_i64).unwrap_or(0);
            if field.required {
                FieldValidator::selected(code, field.label)
            } else {
                Ok(())
            }
        }
        FieldKind::Status => FieldValidator::status(FormStatus::from_value(value)).map(|_| ()),
        FieldKind::Flag => Ok(()),
        // Only a new record must carry one; a blank one on update keeps the stored secret.
        FieldKind::Secret if is_blank(value) => match modal {
            ModalKind::Create if field.required => Err(format!("{} is required", field.label)),
            _ => Ok(()),
        },
        _ if is_blank(value) => {
            if field.required {
                Err(format!("{} is required", field.label))
            } else {
                Ok(())
            }
        }
        FieldKind::Text | FieldKind::Secret => match value {
            Some(Value::String(s)) => FieldValidator::not_empty(s, field.label),
            _ => Err(format!("{} must be text", field.label)),
        },
        FieldKind::Email => match value.and_then(Value::as_str) {
            Some(s) => FieldValidator::email(s),
            None => Err("Invalid email format".to_string()),
        },
        FieldKind::Phone => match value.and_then(Value::as_str) {
            Some(s) => FieldValidator::phone(s),
            None => Err("Invalid phone number format".to_string()),
        },
        FieldKind::Integer => match value.and_then(Value::as_i64) {
            Some(_) => Ok(()),
            None => Err(format!("{} must be a whole number", field.label)),
        },
        FieldKind::Decimal => match value.and_then(Value::as_f64) {
            Some(_) => Ok(()),
            None => Err(format!("{} must be a number", field.label)),
        },
        FieldKind::Date => match value.and_then(Value::as_str) {
            Some(s) => FieldValidator::date(s, field.label).map(|_| ()),
            None => Err(format!("{} must be a date (YYYY-MM-DD)", field.label)),
        },
    }
}

fn check_range(rule: &RangeRule, values: &Map<String, Value>) -> Result<(), String> {
    let (min, max) = match (values.get(rule.min_key), values.get(rule.max_key)) {
        (Some(min), Some(max)) if !is_blank(Some(min)) && !is_blank(Some(max)) => (min, max),
        _ => return Ok(()),
    };

    if let (Some(min), Some(max)) = (min.as_f64(), max.as_f64()) {
        return FieldValidator::range(min, max, rule.label);
    }

    if let (Some(min), Some(max)) = (min.as_str(), max.as_str()) {
        // Malformed dates are already reported by the field check.
        if let (Ok(min), Ok(max)) = (
            FieldValidator::date(min, rule.label),
            FieldValidator::date(max, rule.label),
        ) {
            if min > max {
                return Err(format!("{}: start date must not be after end date", rule.label));
            }
        }
    }

    Ok(())
}

/// Checks required fields, formats and range rules of a form opened as `modal`.
pub fn validate_values(schema: &FormSchema, values: &Map<String, Value>, modal: ModalKind) -> ValidationResult {
    let mut result = ValidationResult::new();

    for field in &schema.fields {
        if let Err(message) = check_field(field, values.get(field.key), modal) {
            result.add_error(field.key, message);
        }
    }

    for rule in &schema.ranges {
        if let Err(message) = check_range(rule, values) {
            result.add_error(rule.min_key, message);
        }
    }

    result
}
