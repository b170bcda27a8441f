// src/forms/reference.rs
//! Dropdown data for select fields, loaded side by side when a form opens.

use futures::future::join_all;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::entities::EntityKind;
use crate::error::ClientResult;
use crate::gateway::{ApiTransport, ResourceGateway};
use crate::models::config_for;
use crate::notify::Notifier;
use crate::pagination::{ListQuery, MAX_PAGE_SIZE};
use crate::status::EntityStatus;

#[derive(Debug, Clone, PartialEq)]
pub struct RefOption {
    pub id: i64,
    pub label: String,
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    lists: HashMap<EntityKind, Vec<RefOption>>,
}

impl ReferenceData {
    pub fn options(&self, kind: EntityKind) -> &[RefOption] {
        self.lists.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_loaded(&self, kind: EntityKind) -> bool {
        self.lists.contains_key(&kind)
    }

    /// Display name of a referenced record, if it was among the loaded options.
    pub fn label_of(&self, kind: EntityKind, id: i64) -> Option<&str> {
        self.options(kind)
            .iter()
            .find(|option| option.id == id)
            .map(|option| option.label.as_str())
    }
}

fn to_option(kind: EntityKind, item: &Value) -> Option<RefOption> {
    let id = item.get(kind.id_field()).and_then(Value::as_i64)?;
    let label = item
        .get(kind.name_field())
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("#{}", id));
    Some(RefOption { id, label })
}

async fn load_one(transport: Arc<dyn ApiTransport>, kind: EntityKind) -> ClientResult<Vec<RefOption>> {
    let gateway = ResourceGateway::new(transport, config_for(kind));
    let mut query = ListQuery::new(MAX_PAGE_SIZE, gateway.config().default_sort);
    query.filters.status = Some(EntityStatus::Active);

    let page = gateway.list(&query).await?;
    Ok(page.items.iter().filter_map(|item| to_option(kind, item)).collect())
}

/// Loads every list concurrently. A failing list raises its own toast and is
/// left out; the others are still returned.
pub async fn load_references(
    transport: Arc<dyn ApiTransport>,
    kinds: &[EntityKind],
    notifier: &dyn Notifier,
) -> ReferenceData {
    let results = join_all(
        kinds
            .iter()
            .map(|&kind| load_one(Arc::clone(&transport), kind)),
    )
    .await;

    let mut data = ReferenceData::default();
    for (&kind, result) in kinds.iter().zip(results) {
        match result {
            Ok(options) => {
                tracing::debug!("Loaded {} {} options", options.len(), kind.label());
                data.lists.insert(kind, options);
            }
            Err(err) => {
                tracing::warn!("Failed to load {} options: {}", kind.label(), err);
                notifier.error(&format!(
                    "Failed to load {} list: {}",
                    kind.label().to_lowercase(),
                    err.user_message()
                ));
            }
        }
    }
    data
}
