//! Cached reads and schema-safe writes for business entities.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::cache::TtlCache;
use crate::domain::{
    AuditEntry, BackendError, Filter, InventoryItem, InventoryKind, Location, Movement, Product,
    Profile, Resource, Row, SchemaSafeWrite, SelectQuery, WritePayload,
};
use crate::ports::{BackendClient, BackendRequest, TransportError};
use crate::schema_safe::SchemaSafeWriter;

pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

pub type WriteReport = SchemaSafeWrite<Vec<Row>>;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("Backend rejected request: {0}")]
    Backend(BackendError),
    #[error("Could not decode {resource} row: {message}")]
    Decode { resource: Resource, message: String },
}

pub struct Repository {
    backend: Arc<dyn BackendClient>,
    writer: SchemaSafeWriter,
    cache: TtlCache<SelectQuery, Vec<Row>>,
}

impl Repository {
    pub fn new(
        backend: Arc<dyn BackendClient>,
        writer: SchemaSafeWriter,
        cache: TtlCache<SelectQuery, Vec<Row>>,
    ) -> Self {
        Self {
            backend,
            writer,
            cache,
        }
    }

    pub fn cache(&self) -> &TtlCache<SelectQuery, Vec<Row>> {
        &self.cache
    }

    pub async fn fetch_rows(&self, query: &SelectQuery) -> Result<Vec<Row>, RepositoryError> {
        if let Some(rows) = self.cache.get(query).await {
            debug!(resource = %query.resource, rows = rows.len(), "cache hit");
            return Ok(rows);
        }

        self.cache.cleanup_expired().await;
        let rows = self
            .backend
            .execute(&BackendRequest::Select(query.clone()))
            .await?
            .map_err(RepositoryError::Backend)?;

        self.cache.set(query.clone(), rows.clone()).await;
        Ok(rows)
    }

    pub async fn fetch<T: DeserializeOwned>(
        &self,
        query: &SelectQuery,
    ) -> Result<Vec<T>, RepositoryError> {
        self.fetch_rows(query)
            .await?
            .into_iter()
            .map(|row| decode(query.resource, row))
            .collect()
    }

    pub async fn fetch_by_id<T: DeserializeOwned>(
        &self,
        resource: Resource,
        id: &str,
    ) -> Result<Option<T>, RepositoryError> {
        let query = SelectQuery::new(resource).eq("id", id).limit(1);
        Ok(self.fetch(&query).await?.into_iter().next())
    }

    pub async fn insert(
        &self,
        resource: Resource,
        payload: &WritePayload,
    ) -> Result<WriteReport, RepositoryError> {
        let backend = &self.backend;
        let report = self
            .writer
            .execute(payload, |attempt| async move {
                backend
                    .execute(&BackendRequest::Insert {
                        resource,
                        payload: attempt,
                    })
                    .await
            })
            .await?;

        self.after_write(resource, &report).await;
        Ok(report)
    }

    pub async fn update(
        &self,
        resource: Resource,
        id: &str,
        payload: &WritePayload,
    ) -> Result<WriteReport, RepositoryError> {
        let backend = &self.backend;
        let filters = vec![Filter::eq("id", id)];
        let report = self
            .writer
            .execute(payload, |attempt| {
                let filters = filters.clone();
                async move {
                    backend
                        .execute(&BackendRequest::Update {
                            resource,
                            filters,
                            payload: attempt,
                        })
                        .await
                }
            })
            .await?;

        self.after_write(resource, &report).await;
        Ok(report)
    }

    /// Deletes carry no payload, so there is nothing to strip and no retry.
    pub async fn delete(&self, resource: Resource, id: &str) -> Result<Vec<Row>, RepositoryError> {
        let rows = self
            .backend
            .execute(&BackendRequest::Delete {
                resource,
                filters: vec![Filter::eq("id", id)],
            })
            .await?
            .map_err(RepositoryError::Backend)?;

        self.invalidate(resource).await;
        Ok(rows)
    }

    pub async fn invalidate(&self, resource: Resource) {
        let dropped = self.cache.invalidate_where(|q| q.resource == resource).await;
        debug!(resource = %resource, dropped, "invalidated cached queries");
    }

    async fn after_write(&self, resource: Resource, report: &WriteReport) {
        if !report.removed_columns.is_empty() {
            warn!(
                resource = %resource,
                removed = ?report.removed_columns.as_slice(),
                "backend schema is missing columns; write sent without them"
            );
        }
        if report.is_success() {
            self.invalidate(resource).await;
        }
    }

    pub async fn products(&self) -> Result<Vec<Product>, RepositoryError> {
        self.fetch(&SelectQuery::ordered(Resource::Products)).await
    }

    pub async fn locations(&self) -> Result<Vec<Location>, RepositoryError> {
        self.fetch(&SelectQuery::ordered(Resource::Locations)).await
    }

    pub async fn movements(&self, product: Option<Uuid>) -> Result<Vec<Movement>, RepositoryError> {
        let mut query = SelectQuery::ordered(Resource::Movements);
        if let Some(product) = product {
            query = query.eq("produto_id", product.to_string());
        }
        self.fetch(&query).await
    }

    pub async fn profiles(&self) -> Result<Vec<Profile>, RepositoryError> {
        self.fetch(&SelectQuery::ordered(Resource::Profiles)).await
    }

    pub async fn audit_log(&self, limit: usize) -> Result<Vec<AuditEntry>, RepositoryError> {
        self.fetch(&SelectQuery::ordered(Resource::AuditLog).limit(limit))
            .await
    }

    pub async fn inventory(&self, kind: InventoryKind) -> Result<Vec<InventoryItem>, RepositoryError> {
        self.fetch(&SelectQuery::ordered(kind.resource())).await
    }
}

fn decode<T: DeserializeOwned>(resource: Resource, row: Row) -> Result<T, RepositoryError> {
    serde_json::from_value(Value::Object(row)).map_err(|e| RepositoryError::Decode {
        resource,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FailureKind;
    use crate::ports::MockBackendClient;
    use serde_json::json;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => panic!("row fixture must be an object"),
        }
    }

    fn repository(backend: MockBackendClient) -> Repository {
        Repository::new(
            Arc::new(backend),
            SchemaSafeWriter::default(),
            TtlCache::new(60),
        )
    }

    fn product_row() -> Row {
        row(json!({
            "id": "6f1c1e5e-8f7a-4f7e-9a63-2b7d6f0d2c11",
            "nome": "Mármore Carrara",
            "cor": "branco"
        }))
    }

    mod reads {
        use super::*;

        #[tokio::test]
        async fn second_fetch_is_served_from_cache() {
            let mut backend = MockBackendClient::new();
            backend
                .expect_execute()
                .times(1)
                .returning(|_| Ok(Ok(vec![product_row()])));
            let repo = repository(backend);
            let query = SelectQuery::ordered(Resource::Products);

            let first = repo.fetch_rows(&query).await.unwrap();
            let second = repo.fetch_rows(&query).await.unwrap();

            assert_eq!(first, second);
        }

        #[tokio::test(start_paused = true)]
        async fn cache_miss_evicts_expired_entries() {
            let mut backend = MockBackendClient::new();
            backend
                .expect_execute()
                .times(2)
                .returning(|_| Ok(Ok(vec![product_row()])));
            let repo = Repository::new(
                Arc::new(backend),
                SchemaSafeWriter::default(),
                TtlCache::new(1),
            );

            repo.fetch_rows(&SelectQuery::new(Resource::Products))
                .await
                .unwrap();
            tokio::time::advance(std::time::Duration::from_millis(1100)).await;
            repo.fetch_rows(&SelectQuery::new(Resource::Locations))
                .await
                .unwrap();

            assert_eq!(repo.cache().len().await, 1);
        }

        #[tokio::test]
        async fn backend_rejection_is_not_cached() {
            let mut backend = MockBackendClient::new();
            backend
                .expect_execute()
                .times(2)
                .returning(|_| Ok(Err(BackendError::new("permission denied"))));
            let repo = repository(backend);
            let query = SelectQuery::new(Resource::Profiles);

            assert!(matches!(
                repo.fetch_rows(&query).await,
                Err(RepositoryError::Backend(_))
            ));
            assert!(repo.fetch_rows(&query).await.is_err());
        }

        #[tokio::test]
        async fn products_decode_into_entities() {
            let mut backend = MockBackendClient::new();
            backend
                .expect_execute()
                .withf(|req| {
                    matches!(req, BackendRequest::Select(q) if q.resource == Resource::Products)
                })
                .returning(|_| Ok(Ok(vec![product_row()])));
            let repo = repository(backend);

            let products = repo.products().await.unwrap();

            assert_eq!(products.len(), 1);
            assert_eq!(products[0].name, "Mármore Carrara");
            assert_eq!(products[0].color.as_deref(), Some("branco"));
        }

        #[tokio::test]
        async fn malformed_row_returns_decode_error() {
            let mut backend = MockBackendClient::new();
            backend
                .expect_execute()
                .returning(|_| Ok(Ok(vec![row(json!({"id": "not-a-uuid"}))])));
            let repo = repository(backend);

            let result = repo.locations().await;

            assert!(matches!(
                result,
                Err(RepositoryError::Decode {
                    resource: Resource::Locations,
                    ..
                })
            ));
        }

        #[tokio::test]
        async fn transport_error_propagates() {
            let mut backend = MockBackendClient::new();
            backend
                .expect_execute()
                .returning(|_| Err(TransportError::Timeout));
            let repo = repository(backend);

            assert!(matches!(
                repo.profiles().await,
                Err(RepositoryError::Transport(TransportError::Timeout))
            ));
        }
    }

    mod writes {
        use super::*;

        fn payload_of(request: &BackendRequest) -> &WritePayload {
            match request {
                BackendRequest::Insert { payload, .. } | BackendRequest::Update { payload, .. } => {
                    payload
                }
                other => panic!("expected a write request, got {:?}", other),
            }
        }

        #[tokio::test]
        async fn insert_drops_unknown_column_and_retries() {
            let mut backend = MockBackendClient::new();
            backend.expect_execute().times(2).returning(|request| {
                if payload_of(request).contains("cor") {
                    Ok(Err(BackendError::new(
                        "Could not find the 'cor' column of 'produtos' in the schema cache",
                    )))
                } else {
                    Ok(Ok(vec![row(json!({"nome": "Teste"}))]))
                }
            });
            let repo = repository(backend);
            let payload = WritePayload::new().with("nome", "Teste").with("cor", "azul");

            let report = repo.insert(Resource::Products, &payload).await.unwrap();

            assert!(report.is_success());
            assert_eq!(report.removed_columns.as_slice(), ["cor"]);
        }

        #[tokio::test]
        async fn update_targets_row_by_id() {
            let mut backend = MockBackendClient::new();
            backend
                .expect_execute()
                .withf(|req| match req {
                    BackendRequest::Update {
                        resource, filters, ..
                    } => *resource == Resource::Slabs && filters == &[Filter::eq("id", "42")],
                    _ => false,
                })
                .times(1)
                .returning(|_| Ok(Ok(vec![])));
            let repo = repository(backend);

            let report = repo
                .update(
                    Resource::Slabs,
                    "42",
                    &WritePayload::new().with("status", "vendida"),
                )
                .await
                .unwrap();

            assert!(report.is_success());
        }

        #[tokio::test]
        async fn successful_write_invalidates_only_that_resource() {
            let mut backend = MockBackendClient::new();
            backend.expect_execute().returning(|_| Ok(Ok(vec![])));
            let repo = repository(backend);
            let products = SelectQuery::ordered(Resource::Products);
            let locations = SelectQuery::ordered(Resource::Locations);
            repo.cache().set(products.clone(), vec![product_row()]).await;
            repo.cache().set(locations.clone(), vec![]).await;

            repo.insert(Resource::Products, &WritePayload::new().with("nome", "x"))
                .await
                .unwrap();

            assert_eq!(repo.cache().get(&products).await, None);
            assert_eq!(repo.cache().get(&locations).await, Some(vec![]));
        }

        #[tokio::test]
        async fn failed_write_keeps_cache_and_reports_failure() {
            let mut backend = MockBackendClient::new();
            backend
                .expect_execute()
                .times(1)
                .returning(|_| Ok(Err(BackendError::new("permission denied"))));
            let repo = repository(backend);
            let products = SelectQuery::ordered(Resource::Products);
            repo.cache().set(products.clone(), vec![product_row()]).await;

            let report = repo
                .insert(Resource::Products, &WritePayload::new().with("nome", "x"))
                .await
                .unwrap();

            assert_eq!(report.failure().unwrap().kind, FailureKind::NonRetryable);
            assert!(repo.cache().get(&products).await.is_some());
        }

        #[tokio::test]
        async fn delete_invalidates_resource() {
            let mut backend = MockBackendClient::new();
            backend
                .expect_execute()
                .withf(|req| matches!(req, BackendRequest::Delete { .. }))
                .times(1)
                .returning(|_| Ok(Ok(vec![])));
            let repo = repository(backend);
            let tiles = SelectQuery::ordered(Resource::Tiles);
            repo.cache().set(tiles.clone(), vec![]).await;

            repo.delete(Resource::Tiles, "7").await.unwrap();

            assert_eq!(repo.cache().get(&tiles).await, None);
        }
    }
}
