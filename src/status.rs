// src/status.rs
//! Record status as stored by the backend (`1` active, `2` inactive) and the
//! form-side selection that may still be empty.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::convert::TryFrom;
use std::fmt;

// ==================== DOMAIN STATUS ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum EntityStatus {
    Active,
    Inactive,
}

impl EntityStatus {
    pub const fn code(&self) -> i64 {
        match self {
            EntityStatus::Active => 1,
            EntityStatus::Inactive => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(EntityStatus::Active),
            2 => Some(EntityStatus::Inactive),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "1" | "active" => Some(EntityStatus::Active),
            "2" | "inactive" => Some(EntityStatus::Inactive),
            _ => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            EntityStatus::Active => "active",
            EntityStatus::Inactive => "inactive",
        }
    }
}

impl Default for EntityStatus {
    fn default() -> Self {
        EntityStatus::Active
    }
}

impl TryFrom<i64> for EntityStatus {
    type Error = String;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        EntityStatus::from_code(code).ok_or_else(|| format!("Invalid status code: {}", code))
    }
}

impl From<EntityStatus> for i64 {
    fn from(status: EntityStatus) -> Self {
        status.code()
    }
}

impl fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==================== FORM STATUS ====================

/// Status picker value inside a form. `Unselected` never reaches the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormStatus {
    #[default]
    Unselected,
    Selected(EntityStatus),
}

impl FormStatus {
    pub fn selected(&self) -> Option<EntityStatus> {
        match self {
            FormStatus::Unselected => None,
            FormStatus::Selected(status) => Some(*status),
        }
    }

    /// `0` and anything unknown mean "nothing picked yet".
    pub fn from_code(code: i64) -> Self {
        EntityStatus::from_code(code)
            .map(FormStatus::Selected)
            .unwrap_or(FormStatus::Unselected)
    }

    /// Reads the picker back out of a form's value map.
    pub fn from_value(value: Option<&Value>) -> Self {
        value
            .and_then(Value::as_i64)
            .map(FormStatus::from_code)
            .unwrap_or_default()
    }

    /// Blank input and `0` clear the picker; anything else must name a status.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "" | "0" => Some(FormStatus::Unselected),
            other => EntityStatus::parse(other).map(FormStatus::Selected),
        }
    }

    /// What the form stores: the wire code, or null while unselected.
    pub fn to_value(&self) -> Value {
        match self.selected() {
            Some(status) => Value::from(status.code()),
            None => Value::Null,
        }
    }
}

impl From<EntityStatus> for FormStatus {
    fn from(status: EntityStatus) -> Self {
        FormStatus::Selected(status)
    }
}

// ==================== BADGES ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Green,
    Amber,
    Red,
}

impl BadgeTone {
    pub const fn as_str(&self) -> &'static str {
        match self {
            BadgeTone::Green => "green",
            BadgeTone::Amber => "amber",
            BadgeTone::Red => "red",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusBadge {
    pub label: &'static str,
    pub tone: BadgeTone,
}

/// Maps a raw status code to its badge. Unknown codes render as deleted.
pub fn status_badge(raw: i64, inactive_tone: BadgeTone) -> StatusBadge {
    match EntityStatus::from_code(raw) {
        Some(EntityStatus::Active) => StatusBadge { label: "Active", tone: BadgeTone::Green },
        Some(EntityStatus::Inactive) => StatusBadge { label: "Inactive", tone: inactive_tone },
        None => StatusBadge { label: "Deleted", tone: BadgeTone::Red },
    }
}
