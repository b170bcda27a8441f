// src/stats.rs - Dashboard counters built from the paginated list endpoints
use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::entities::EntityKind;
use crate::error::ClientResult;
use crate::gateway::{ApiTransport, ResourceGateway};
use crate::models::config_for;
use crate::pagination::ListQuery;
use crate::status::EntityStatus;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    /// What the backend reported as `totalCount`.
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    pub other: u64,
    pub pages: u32,
}

impl StatusCounts {
    fn add(&mut self, item: &Value) {
        let code = item.get("status").and_then(Value::as_i64).unwrap_or(0);
        match EntityStatus::from_code(code) {
            Some(EntityStatus::Active) => self.active += 1,
            Some(EntityStatus::Inactive) => self.inactive += 1,
            None => self.other += 1,
        }
    }

    pub fn seen(&self) -> u64 {
        self.active + self.inactive + self.other
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EntityStats {
    pub kind: String,
    pub label: &'static str,
    pub counts: Option<StatusCounts>,
    pub error: Option<String>,
}

/// Walks every page of the unfiltered list. Stops on an empty page or once
/// `totalCount` records have been counted.
pub async fn count_statuses(gateway: &ResourceGateway, page_size: u32) -> ClientResult<StatusCounts> {
    let mut query = ListQuery::new(page_size, gateway.config().default_sort);
    let mut counts = StatusCounts::default();

    loop {
        let page = gateway.list(&query).await?;
        if query.page_number == 1 {
            counts.total = page.total_count;
        }
        if page.items.is_empty() {
            break;
        }

        counts.pages += 1;
        for item in &page.items {
            counts.add(item);
        }
        if counts.seen() >= counts.total {
            break;
        }
        query.page_number += 1;
    }

    log::debug!(
        "Counted {} {} records over {} pages",
        counts.seen(),
        gateway.config().kind.label(),
        counts.pages
    );
    Ok(counts)
}

/// Counts for every kind; a failing entity is reported and the rest carry on.
pub async fn collect_dashboard(
    transport: Arc<dyn ApiTransport>,
    kinds: &[EntityKind],
    page_size: u32,
) -> Vec<EntityStats> {
    let gateways: Vec<ResourceGateway> = kinds
        .iter()
        .map(|&kind| ResourceGateway::new(Arc::clone(&transport), config_for(kind)))
        .collect();
    let results = join_all(gateways.iter().map(|g| count_statuses(g, page_size))).await;

    kinds
        .iter()
        .zip(results)
        .map(|(kind, result)| match result {
            Ok(counts) => EntityStats {
                kind: kind.to_string(),
                label: kind.label(),
                counts: Some(counts),
                error: None,
            },
            Err(err) => {
                log::error!("Failed to collect {} statistics: {}", kind.label(), err);
                EntityStats {
                    kind: kind.to_string(),
                    label: kind.label(),
                    counts: None,
                    error: Some(err.user_message()),
                }
            }
        })
        .collect()
}

pub fn render_dashboard(stats: &[EntityStats]) -> String {
    let width = stats.iter().map(|s| s.label.len()).max().unwrap_or(0).max(6);
    let mut out = format!(
        "{:<width$}  {:>7}  {:>7}  {:>8}  {:>7}\n",
        "Entity",
        "Total",
        "Active",
        "Inactive",
        "Other",
        width = width
    );
    for entry in stats {
        match (&entry.counts, &entry.error) {
            (Some(c), _) => out.push_str(&format!(
                "{:<width$}  {:>7}  {:>7}  {:>8}  {:>7}\n",
                entry.label,
                c.total,
                c.active,
                c.inactive,
                c.other,
                width = width
            )),
            (None, error) => out.push_str(&format!(
                "{:<width$}  unavailable: {}\n",
                entry.label,
                error.as_deref().unwrap_or("unknown error"),
                width = width
            )),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::gateway::testing::MockTransport;
    use crate::gateway::Method;
    use serde_json::json;

    fn areas(statuses: &[i64], total: u64) -> Value {
        let items: Vec<Value> = statuses
            .iter()
            .enumerate()
            .map(|(i, s)| json!({ "areaId": i + 1, "status": s }))
            .collect();
        json!({ "items": items, "totalCount": total })
    }

    #[tokio::test]
    async fn test_walk_stops_at_total_count() {
        let transport = MockTransport::new();
        transport.on(Method::Post, "Area/Areas", Ok(areas(&[1, 1], 5)));
        transport.on(Method::Post, "Area/Areas", Ok(areas(&[2, 1], 5)));
        transport.on(Method::Post, "Area/Areas", Ok(areas(&[3], 5)));
        let gateway = ResourceGateway::new(transport.clone(), config_for(EntityKind::Area));

        let counts = count_statuses(&gateway, 2).await.unwrap();

        assert_eq!(counts.total, 5);
        assert_eq!((counts.active, counts.inactive, counts.other), (3, 1, 1));
        assert_eq!(counts.pages, 3);
        // The last reply would keep answering; the walk must not ask again.
        assert_eq!(transport.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_walk_stops_on_empty_page() {
        let transport = MockTransport::new();
        transport.on(Method::Post, "Area/Areas", Ok(areas(&[1, 2], 10)));
        transport.on(Method::Post, "Area/Areas", Ok(areas(&[], 10)));
        let gateway = ResourceGateway::new(transport.clone(), config_for(EntityKind::Area));

        let counts = count_statuses(&gateway, 2).await.unwrap();
        assert_eq!(counts.seen(), 2);
        assert_eq!(counts.total, 10);
        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_failures_do_not_abort_dashboard() {
        let transport = MockTransport::new();
        transport.on(Method::Post, "Area/Areas", Ok(areas(&[1], 1)));
        transport.on(
            Method::Post,
            "Category/Categories",
            Err(ClientError::Network("timed out".to_string())),
        );

        let stats = collect_dashboard(transport, &[EntityKind::Area, EntityKind::Category], 10).await;

        assert_eq!(stats[0].counts.as_ref().unwrap().active, 1);
        assert!(stats[1].counts.is_none());
        assert!(stats[1].error.is_some());

        let text = render_dashboard(&stats);
        assert!(text.contains("Category"));
        assert!(text.contains("unavailable"));
    }
}
