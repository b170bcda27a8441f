// src/gateway/mod.rs
//! Remote gateway: turns list queries and form payloads into REST calls and
//! normalizes what comes back.

pub mod envelope;
pub mod transport;

#[cfg(test)]
pub mod testing;

use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::entities::{Endpoints, Entity, EntityConfig};
use crate::error::{ClientError, ClientResult};
use crate::pagination::{ListQuery, Page};

pub use envelope::{normalize_page, unwrap_data};
pub use transport::{ApiTransport, HttpTransport, Method};

// ==================== UNTYPED GATEWAY ====================

/// Gateway for any configured entity, working on raw JSON records. Used where
/// the record type is only known at runtime (dropdown data, stats).
#[derive(Clone)]
pub struct ResourceGateway {
    transport: Arc<dyn ApiTransport>,
    config: EntityConfig,
}

impl ResourceGateway {
    pub fn new(transport: Arc<dyn ApiTransport>, config: EntityConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &EntityConfig {
        &self.config
    }

    pub fn transport(&self) -> Arc<dyn ApiTransport> {
        Arc::clone(&self.transport)
    }

    pub async fn list(&self, query: &ListQuery) -> ClientResult<Page<Value>> {
        let body = serde_json::to_value(query)?;
        let response = self
            .transport
            .send(Method::Post, &self.config.endpoints.list, Some(&body))
            .await?;
        normalize_page(response)
    }

    pub async fn create(&self, body: &Value) -> ClientResult<Value> {
        self.transport
            .send(Method::Post, &self.config.endpoints.create, Some(body))
            .await
    }

    pub async fn update(&self, id: i64, body: &Value) -> ClientResult<Value> {
        let path = Endpoints::resolve(&self.config.endpoints.update, id);
        self.transport.send(Method::Put, &path, Some(body)).await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<Value> {
        let path = Endpoints::resolve(&self.config.endpoints.delete, id);
        self.transport.send(Method::Delete, &path, None).await
    }

    pub async fn get_detail(&self, id: i64) -> ClientResult<Value> {
        let path = Endpoints::resolve(&self.config.endpoints.detail, id);
        self.transport.send(Method::Get, &path, None).await
    }
}

// ==================== TYPED GATEWAY ====================

pub struct Gateway<T> {
    inner: ResourceGateway,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Gateway<T> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone(), _record: PhantomData }
    }
}

impl<T: Entity> Gateway<T> {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self {
            inner: ResourceGateway::new(transport, T::config()),
            _record: PhantomData,
        }
    }

    pub fn config(&self) -> &EntityConfig {
        self.inner.config()
    }

    pub fn resource(&self) -> &ResourceGateway {
        &self.inner
    }

    pub async fn list(&self, query: &ListQuery) -> ClientResult<Page<T>> {
        let page = self.inner.list(query).await?;
        let total_count = page.total_count;
        let items = page
            .items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()?;
        Ok(Page::new(items, total_count))
    }

    pub async fn create(&self, draft: &T::Draft) -> ClientResult<Value> {
        let body = serde_json::to_value(draft)?;
        self.inner.create(&body).await
    }

    pub async fn update(&self, id: i64, body: &Value) -> ClientResult<Value> {
        self.inner.update(id, body).await
    }

    pub async fn update_record(&self, record: &T) -> ClientResult<Value> {
        let body = serde_json::to_value(record)?;
        self.inner.update(record.id(), &body).await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<Value> {
        self.inner.delete(id).await
    }

    pub async fn get_detail(&self, id: i64) -> ClientResult<Value> {
        self.inner.get_detail(id).await
    }

    /// Detail call decoded into the record type.
    pub async fn fetch_record(&self, id: i64) -> ClientResult<T> {
        let record = unwrap_data(self.inner.get_detail(id).await?);
        if record.is_null() {
            return Err(ClientError::not_found(T::KIND.label(), id));
        }
        Ok(serde_json::from_value(record)?)
    }
}

#[cfg(test)]
mod tests {
    use super::testing::MockTransport;
    use super::*;
    use crate::models::Category;
    use crate::status::EntityStatus;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_posts_query_and_decodes() {
        let transport = MockTransport::new();
        transport.on(
            Method::Post,
            "Category/Categories",
            Ok(json!({
                "data": {
                    "items": [
                        { "categoryId": 1, "categoryName": "Dairy", "status": 1 },
                        { "categoryId": 2, "categoryName": "Frozen", "description": "Below zero", "status": 2 }
                    ],
                    "totalCount": 12
                }
            })),
        );

        let gateway: Gateway<Category> = Gateway::new(transport.clone());
        let mut query = ListQuery::new(2, "categoryName");
        query.filters.status = Some(EntityStatus::Active);
        let page = gateway.list(&query).await.unwrap();

        assert_eq!(page.total_count, 12);
        assert_eq!(page.items[1].category_name, "Frozen");

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].body.as_ref().unwrap()["filters"], json!({ "status": 1 }));
        assert_eq!(calls[0].body.as_ref().unwrap()["pageSize"], json!(2));
    }

    #[tokio::test]
    async fn test_mutation_paths() {
        let transport = MockTransport::new();
        transport.on(Method::Put, "Category/Update/4", Ok(json!({ "success": true })));
        transport.on(Method::Delete, "Category/Delete/4", Ok(json!({ "success": true })));
        transport.on(
            Method::Get,
            "Category/CategoryById/4",
            Ok(json!({ "data": { "categoryId": 4, "categoryName": "Bakery", "status": 1 } })),
        );

        let gateway: Gateway<Category> = Gateway::new(transport.clone());
        gateway.update(4, &json!({ "categoryId": 4 })).await.unwrap();
        gateway.delete(4).await.unwrap();
        let record = gateway.fetch_record(4).await.unwrap();
        assert_eq!(record.category_name, "Bakery");

        let methods: Vec<Method> = transport.calls().iter().map(|c| c.method).collect();
        assert_eq!(methods, vec![Method::Put, Method::Delete, Method::Get]);
    }

    #[tokio::test]
    async fn test_api_errors_propagate() {
        let transport = MockTransport::new();
        transport.on(
            Method::Post,
            "Category/Create",
            Err(ClientError::from_response(409, &json!({ "message": "[E1001] Category exists" }))),
        );

        let gateway: Gateway<Category> = Gateway::new(transport);
        let draft: crate::models::CategoryDraft = serde_json::from_value(json!({ "categoryName": "Dairy", "status": 1 })).unwrap();
        let err = gateway.create(&draft).await.unwrap_err();
        assert_eq!(err.user_message(), "Category exists");
    }
}
