pub mod fixtures;

use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use multimarmore::app::ports::{BackendClient, BackendRequest, BackendResponse, TransportError};
use multimarmore::domain::{BackendError, Resource, Row};

/// In-memory backend whose tables only accept a fixed column set, answering
/// unknown columns the way PostgREST does.
pub struct SchemaDriftBackend {
    columns: HashMap<Resource, BTreeSet<String>>,
    rows: Mutex<HashMap<Resource, Vec<Row>>>,
    requests: Mutex<Vec<BackendRequest>>,
}

impl Default for SchemaDriftBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaDriftBackend {
    pub fn new() -> Self {
        Self {
            columns: HashMap::new(),
            rows: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_table(mut self, resource: Resource, columns: &[&str]) -> Self {
        self.columns.insert(
            resource,
            columns.iter().map(|c| (*c).to_string()).collect(),
        );
        self
    }

    pub fn requests(&self) -> Vec<BackendRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn write_count(&self) -> usize {
        self.requests().iter().filter(|r| r.is_write()).count()
    }

    pub fn stored(&self, resource: Resource) -> Vec<Row> {
        self.rows
            .lock()
            .unwrap()
            .get(&resource)
            .cloned()
            .unwrap_or_default()
    }

    fn unknown_column(&self, resource: Resource, row: &Row) -> Option<String> {
        let known = self.columns.get(&resource)?;
        row.keys().find(|k| !known.contains(*k)).cloned()
    }
}

#[async_trait]
impl BackendClient for SchemaDriftBackend {
    async fn execute(&self, request: &BackendRequest) -> Result<BackendResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());

        let resource = request.resource();
        match request {
            BackendRequest::Select(_) => Ok(Ok(self.stored(resource))),
            BackendRequest::Insert { payload, .. } => {
                let row = payload.as_map().clone();
                if let Some(column) = self.unknown_column(resource, &row) {
                    return Ok(Err(BackendError::new(format!(
                        "Could not find the '{}' column of '{}' in the schema cache",
                        column,
                        resource.table_name()
                    ))
                    .with_code("PGRST204")));
                }
                self.rows
                    .lock()
                    .unwrap()
                    .entry(resource)
                    .or_default()
                    .push(row.clone());
                Ok(Ok(vec![row]))
            }
            BackendRequest::Update { .. } | BackendRequest::Delete { .. } => {
                Ok(Err(BackendError::new("permission denied for table").with_code("42501")))
            }
        }
    }
}

pub fn object(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        _ => panic!("fixture must be a JSON object"),
    }
}
