//! Firestore REST client: request building and HTTP error mapping.

use std::sync::RwLock;

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::StoreError;

use super::value::{encode_fields, encode_value, Document};

/// Where the database lives.
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    pub base_url: String,
    pub project_id: String,
    pub database: String,
}

impl FirestoreConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            base_url: "https://firestore.googleapis.com/v1".into(),
            project_id: project_id.into(),
            database: "(default)".into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }
}

/// Equality filter for `run_query`.
#[derive(Debug, Clone)]
pub struct FieldFilter {
    pub field: String,
    pub value: Value,
}

impl FieldFilter {
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Firestore REST client authenticated with a user's ID token.
///
/// The token can be swapped on a shared client when the user signs in or out.
pub struct FirestoreClient {
    config: FirestoreConfig,
    id_token: RwLock<Option<String>>,
    http: reqwest::Client,
}

impl FirestoreClient {
    pub fn new(config: FirestoreConfig) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| StoreError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            config,
            id_token: RwLock::new(None),
            http,
        })
    }

    // TODO: refresh through securetoken.googleapis.com once the one-hour ID token expires.
    pub fn with_id_token(self, id_token: impl Into<String>) -> Self {
        self.set_id_token(Some(id_token.into()));
        self
    }

    /// Replace the bearer token; `None` sends unauthenticated requests.
    pub fn set_id_token(&self, id_token: Option<String>) {
        let mut slot = self
            .id_token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = id_token;
    }

    pub fn has_id_token(&self) -> bool {
        self.id_token
            .read()
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }

    /// `projects/{p}/databases/{db}/documents`
    pub fn documents_root(&self) -> String {
        format!(
            "projects/{}/databases/{}/documents",
            self.config.project_id, self.config.database
        )
    }

    /// Full resource name for a path relative to the documents root.
    pub fn document_name(&self, path: &str) -> String {
        format!("{}/{}", self.documents_root(), path.trim_matches('/'))
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), resource)
    }

    fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let token = self
            .id_token
            .read()
            .map(|slot| slot.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone());
        match token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn execute(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, StoreError> {
        let response = self
            .authorized(req)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(classify_status(status, &body))
    }

    /// Read one document. A missing document is `Ok(None)`.
    pub async fn get_document(&self, path: &str) -> Result<Option<Document>, StoreError> {
        let name = self.document_name(path);
        debug!(document = %name, "firestore get");

        let response = match self.execute(self.http.get(self.url(&name))).await {
            Ok(response) => response,
            Err(StoreError::Http { status: 404, .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        let json: Value = response
            .json()
            .await
            .map_err(|e| StoreError::Codec(e.to_string()))?;
        Document::from_resource(&json).map(Some)
    }

    /// Merge `fields` into the document at `path`, creating it if needed.
    /// Fields listed in `server_time_fields` are set to the commit time.
    pub async fn merge_document(
        &self,
        path: &str,
        fields: &Map<String, Value>,
        server_time_fields: &[&str],
    ) -> Result<(), StoreError> {
        let body = self.merge_write_body(path, fields, server_time_fields);
        let url = self.url(&format!("{}:commit", self.documents_root()));
        debug!(document = %path, fields = fields.len(), "firestore merge");

        self.execute(self.http.post(url).json(&body)).await?;
        Ok(())
    }

    pub(crate) fn merge_write_body(
        &self,
        path: &str,
        fields: &Map<String, Value>,
        server_time_fields: &[&str],
    ) -> Value {
        let field_paths: Vec<&String> = fields.keys().collect();
        let transforms: Vec<Value> = server_time_fields
            .iter()
            .map(|f| json!({ "fieldPath": f, "setToServerValue": "REQUEST_TIME" }))
            .collect();

        let mut write = json!({
            "update": {
                "name": self.document_name(path),
                "fields": encode_fields(fields),
            },
            "updateMask": { "fieldPaths": field_paths },
        });
        if !transforms.is_empty() {
            write["updateTransforms"] = Value::Array(transforms);
        }
        json!({ "writes": [write] })
    }

    /// Delete the document at `path`. Deleting a missing document succeeds.
    pub async fn delete_document(&self, path: &str) -> Result<(), StoreError> {
        let name = self.document_name(path);
        debug!(document = %name, "firestore delete");
        self.execute(self.http.delete(self.url(&name))).await?;
        Ok(())
    }

    /// Query one collection under `parent` (empty for a root collection).
    pub async fn run_query(
        &self,
        parent: &str,
        collection_id: &str,
        filter: Option<FieldFilter>,
    ) -> Result<Vec<Document>, StoreError> {
        let parent_name = if parent.is_empty() {
            self.documents_root()
        } else {
            self.document_name(parent)
        };
        let url = self.url(&format!("{parent_name}:runQuery"));
        let body = query_body(collection_id, filter.as_ref());
        debug!(parent = %parent_name, collection = collection_id, "firestore query");

        let response = self.execute(self.http.post(url).json(&body)).await?;
        let rows: Vec<Value> = response
            .json()
            .await
            .map_err(|e| StoreError::Codec(e.to_string()))?;

        // Rows without a document only carry read progress.
        rows.iter()
            .filter_map(|row| row.get("document"))
            .map(Document::from_resource)
            .collect()
    }
}

pub(crate) fn query_body(collection_id: &str, filter: Option<&FieldFilter>) -> Value {
    let mut query = json!({ "from": [{ "collectionId": collection_id }] });
    if let Some(filter) = filter {
        query["where"] = json!({
            "fieldFilter": {
                "field": { "fieldPath": filter.field },
                "op": "EQUAL",
                "value": encode_value(&filter.value),
            }
        });
    }
    json!({ "structuredQuery": query })
}

pub(crate) fn classify_status(status: reqwest::StatusCode, body: &str) -> StoreError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| status.to_string());
    match status {
        reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
            StoreError::PermissionDenied(message)
        }
        _ => StoreError::Http {
            status: status.as_u16(),
            message,
        },
    }
}
