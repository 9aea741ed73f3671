use std::sync::Arc;

use multimarmore::app::cache::TtlCache;
use multimarmore::app::{Repository, RetryOptions, SchemaSafeWriter};
use multimarmore::domain::{Resource, WritePayload};

use super::SchemaDriftBackend;

/// `produtos` as deployed before the `cor` and `acabamento` migrations.
pub fn legacy_products_backend() -> Arc<SchemaDriftBackend> {
    Arc::new(
        SchemaDriftBackend::new().with_table(Resource::Products, &["id", "nome", "unidade"]),
    )
}

pub fn repository(backend: Arc<SchemaDriftBackend>, max_retries: usize) -> Repository {
    Repository::new(
        backend,
        SchemaSafeWriter::new(RetryOptions::with_max_retries(max_retries)),
        TtlCache::new(60),
    )
}

pub fn new_product_payload() -> WritePayload {
    WritePayload::new()
        .with("nome", "Granito Verde Ubatuba")
        .with("cor", "verde")
        .with("acabamento", "polido")
        .with("unidade", "m2")
}
