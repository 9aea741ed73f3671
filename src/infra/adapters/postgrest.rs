use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use crate::app::ports::{BackendClient, BackendRequest, BackendResponse, TransportError};
use crate::domain::{BackendError, Deployment, Filter, Resource, Row, SelectQuery};

const PREFER_REPRESENTATION: &str = "return=representation";

/// `col=op.value` pairs; column names and values are percent-encoded.
pub fn render_filters(filters: &[Filter]) -> Vec<String> {
    filters
        .iter()
        .map(|f| {
            format!(
                "{}={}.{}",
                urlencoding::encode(&f.column),
                f.op.token(),
                urlencoding::encode(&f.value)
            )
        })
        .collect()
}

pub fn render_query(query: &SelectQuery) -> String {
    let select = query.columns.as_ref().map_or_else(
        || "*".to_string(),
        |cols| {
            cols.iter()
                .map(|c| urlencoding::encode(c).into_owned())
                .collect::<Vec<_>>()
                .join(",")
        },
    );

    let mut params = vec![format!("select={}", select)];
    params.extend(render_filters(&query.filters));
    if let Some(order) = &query.order {
        let direction = if order.ascending { "asc" } else { "desc" };
        params.push(format!(
            "order={}.{}",
            urlencoding::encode(&order.column),
            direction
        ));
    }
    if let Some(limit) = query.limit {
        params.push(format!("limit={}", limit));
    }
    if let Some(offset) = query.offset {
        params.push(format!("offset={}", offset));
    }
    params.join("&")
}

/// 2xx bodies: an array of rows, a single object, or nothing.
fn parse_rows(body: &str) -> Result<Vec<Row>, TransportError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let value: Value =
        serde_json::from_str(body).map_err(|e| TransportError::Decode(e.to_string()))?;
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(row) => Ok(row),
                other => Err(TransportError::Decode(format!(
                    "expected row object, got {}",
                    other
                ))),
            })
            .collect(),
        Value::Object(row) => Ok(vec![row]),
        other => Err(TransportError::Decode(format!(
            "expected rows, got {}",
            other
        ))),
    }
}

/// Non-2xx bodies. Anything that is not a PostgREST error object is wrapped
/// with the HTTP status as its code.
fn parse_error(status: StatusCode, body: &str) -> BackendError {
    serde_json::from_str::<BackendError>(body).unwrap_or_else(|_| {
        let trimmed = body.trim();
        let message = if trimmed.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        } else {
            trimmed.to_string()
        };
        BackendError::new(message).with_code(status.as_u16().to_string())
    })
}

fn map_reqwest_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else if error.is_decode() {
        TransportError::Decode(error.to_string())
    } else if error.is_builder() {
        TransportError::InvalidUrl(error.to_string())
    } else {
        TransportError::Request(error.to_string())
    }
}

/// REST client for one deployment.
pub struct PostgrestClient {
    http: reqwest::Client,
    rest_url: String,
    anon_key: String,
    access_token: Option<String>,
    schema: String,
}

impl PostgrestClient {
    pub fn new(deployment: &Deployment) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(deployment.timeout_secs))
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(Self {
            http,
            rest_url: deployment.rest_url(),
            anon_key: deployment.anon_key.clone(),
            access_token: None,
            schema: deployment.schema.clone(),
        })
    }

    /// Signed-in user's token; requests fall back to the anon key without one.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    fn table_url(&self, resource: Resource) -> String {
        format!("{}/{}", self.rest_url, resource.table_name())
    }

    pub fn request_url(&self, request: &BackendRequest) -> String {
        let base = self.table_url(request.resource());
        let query = match request {
            BackendRequest::Select(query) => render_query(query),
            BackendRequest::Insert { .. } => String::new(),
            BackendRequest::Update { filters, .. } | BackendRequest::Delete { filters, .. } => {
                render_filters(filters).join("&")
            }
        };
        if query.is_empty() {
            base
        } else {
            format!("{}?{}", base, query)
        }
    }

    fn build(&self, request: &BackendRequest) -> reqwest::RequestBuilder {
        let url = self.request_url(request);
        let builder = match request {
            BackendRequest::Select(_) => self.http.get(url).header("Accept-Profile", &self.schema),
            BackendRequest::Insert { payload, .. } => self
                .http
                .post(url)
                .header("Content-Profile", &self.schema)
                .header("Prefer", PREFER_REPRESENTATION)
                .json(payload),
            BackendRequest::Update { payload, .. } => self
                .http
                .patch(url)
                .header("Content-Profile", &self.schema)
                .header("Prefer", PREFER_REPRESENTATION)
                .json(payload),
            BackendRequest::Delete { .. } => self
                .http
                .delete(url)
                .header("Content-Profile", &self.schema)
                .header("Prefer", PREFER_REPRESENTATION),
        };
        let token = self.access_token.as_deref().unwrap_or(&self.anon_key);
        builder.header("apikey", &self.anon_key).bearer_auth(token)
    }
}

#[async_trait]
impl BackendClient for PostgrestClient {
    async fn execute(&self, request: &BackendRequest) -> Result<BackendResponse, TransportError> {
        let start = Instant::now();
        let response = self
            .build(request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;
        debug!(
            resource = %request.resource(),
            write = request.is_write(),
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "backend request finished"
        );

        if status.is_success() {
            parse_rows(&body).map(Ok)
        } else {
            Ok(Err(parse_error(status, &body)))
        }
    }
}
