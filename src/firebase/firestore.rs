//! Firestore v1 REST client: typed values, document CRUD, structured queries.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{error_from_response, FirebaseError};
use crate::config::Config;
use crate::constants::DOCUMENT_ID_LENGTH;

/// Firestore's typed value encoding.
///
/// Integers travel as decimal strings per the REST contract; a stored null is
/// an explicit `{"nullValue": null}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldValue {
    StringValue(String),
    IntegerValue(String),
    DoubleValue(f64),
    BooleanValue(bool),
    TimestampValue(DateTime<Utc>),
    NullValue(()),
}

impl FieldValue {
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::StringValue(value.into())
    }

    #[must_use]
    pub fn integer(value: i64) -> Self {
        Self::IntegerValue(value.to_string())
    }

    #[must_use]
    pub const fn null() -> Self {
        Self::NullValue(())
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::StringValue(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::IntegerValue(s) => s.parse().ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::TimestampValue(t) => Some(*t),
            _ => None,
        }
    }
}

/// One Firestore document: full resource name plus decoded fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub name: String,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
    pub create_time: Option<DateTime<Utc>>,
    pub update_time: Option<DateTime<Utc>>,
}

impl Document {
    /// Document identifier: the final segment of the resource name.
    #[must_use]
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    #[must_use]
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(FieldValue::as_str)
    }

    #[must_use]
    pub fn integer_field(&self, name: &str) -> Option<i64> {
        self.fields.get(name).and_then(FieldValue::as_integer)
    }

    #[must_use]
    pub fn timestamp_field(&self, name: &str) -> Option<DateTime<Utc>> {
        self.fields.get(name).and_then(FieldValue::as_timestamp)
    }
}

/// Generate a document identifier in the backend SDK's auto-ID format:
/// 20 random alphanumeric characters.
#[must_use]
pub fn generate_document_id() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(DOCUMENT_ID_LENGTH)
        .map(char::from)
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitResponse {
    commit_time: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct QueryResult {
    /// Absent on the bookkeeping entries an empty result set still returns.
    #[serde(default)]
    document: Option<Document>,
}

/// Client for the Firestore v1 REST API, scoped to one project's
/// `(default)` database.
#[derive(Clone)]
pub struct FirestoreClient {
    http: reqwest::Client,
    base_url: String,
    documents_root: String,
}

impl std::fmt::Debug for FirestoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirestoreClient")
            .field("base_url", &self.base_url)
            .field("documents_root", &self.documents_root)
            .finish_non_exhaustive()
    }
}

impl FirestoreClient {
    #[must_use]
    pub fn new(config: &Config, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: config.firestore_base_url.clone(),
            documents_root: config.firestore_documents_root(),
        }
    }

    /// Create a document, letting the server assign `server_time_field`.
    ///
    /// The write carries an exists-precondition so a colliding identifier
    /// fails instead of overwriting. Returns the commit time, which equals
    /// the server-assigned timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error when the commit is rejected or the call fails.
    pub async fn create_document(
        &self,
        collection: &str,
        document_id: &str,
        fields: BTreeMap<String, FieldValue>,
        server_time_field: &str,
        id_token: Option<&str>,
    ) -> Result<DateTime<Utc>, FirebaseError> {
        debug!(collection = %collection, id = %document_id, "Creating document");
        self.commit_write(collection, document_id, fields, server_time_field, false, id_token)
            .await
    }

    /// Patch listed fields of an existing document, letting the server
    /// assign `server_time_field`. Unlisted fields keep their values.
    ///
    /// # Errors
    ///
    /// Returns an error when the document is missing or the call fails.
    pub async fn update_document(
        &self,
        collection: &str,
        document_id: &str,
        fields: BTreeMap<String, FieldValue>,
        server_time_field: &str,
        id_token: Option<&str>,
    ) -> Result<DateTime<Utc>, FirebaseError> {
        debug!(collection = %collection, id = %document_id, "Updating document");
        self.commit_write(collection, document_id, fields, server_time_field, true, id_token)
            .await
    }

    /// Fetch one document. Missing documents are `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error for any failure other than not-found.
    pub async fn get_document(
        &self,
        collection: &str,
        document_id: &str,
        id_token: Option<&str>,
    ) -> Result<Option<Document>, FirebaseError> {
        let url = self.document_url(collection, document_id);
        let response = with_bearer(self.http.get(&url), id_token).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(Some(response.json().await?))
    }

    /// Delete one document. A document that is already gone counts as
    /// deleted.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend rejects the deletion.
    pub async fn delete_document(
        &self,
        collection: &str,
        document_id: &str,
        id_token: Option<&str>,
    ) -> Result<(), FirebaseError> {
        debug!(collection = %collection, id = %document_id, "Deleting document");
        let url = self.document_url(collection, document_id);
        let response = with_bearer(self.http.delete(&url), id_token).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(())
    }

    /// Run an equality-filtered, ordered query over one collection and
    /// return the matching documents in response order.
    ///
    /// # Errors
    ///
    /// Returns an error when the query is rejected or the call fails.
    pub async fn query_collection(
        &self,
        collection: &str,
        filter: Option<(&str, FieldValue)>,
        order_by_field: &str,
        descending: bool,
        id_token: Option<&str>,
    ) -> Result<Vec<Document>, FirebaseError> {
        let url = format!("{}/v1/{}:runQuery", self.base_url, self.documents_root);
        let query = build_structured_query(
            collection,
            filter.as_ref().map(|(field, value)| (*field, value)),
            order_by_field,
            descending,
        );
        let body = serde_json::json!({ "structuredQuery": query });
        let response = with_bearer(self.http.post(&url), id_token)
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        let results: Vec<QueryResult> = response.json().await?;
        Ok(results.into_iter().filter_map(|r| r.document).collect())
    }

    async fn commit_write(
        &self,
        collection: &str,
        document_id: &str,
        fields: BTreeMap<String, FieldValue>,
        server_time_field: &str,
        must_exist: bool,
        id_token: Option<&str>,
    ) -> Result<DateTime<Utc>, FirebaseError> {
        let field_paths: Vec<&String> = fields.keys().collect();
        let mut write = serde_json::json!({
            "update": {
                "name": format!("{}/{collection}/{document_id}", self.documents_root),
                "fields": fields,
            },
            "updateTransforms": [{
                "fieldPath": server_time_field,
                "setToServerValue": "REQUEST_TIME",
            }],
            "currentDocument": { "exists": must_exist },
        });
        // Patch semantics need the mask; a create writes the whole document.
        if must_exist {
            write["updateMask"] = serde_json::json!({ "fieldPaths": field_paths });
        }

        let url = format!("{}/v1/{}:commit", self.base_url, self.documents_root);
        let body = serde_json::json!({ "writes": [write] });
        let response = with_bearer(self.http.post(&url), id_token)
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        let commit: CommitResponse = response.json().await?;
        Ok(commit.commit_time)
    }

    fn document_url(&self, collection: &str, document_id: &str) -> String {
        format!(
            "{}/v1/{}/{collection}/{document_id}",
            self.base_url, self.documents_root
        )
    }
}

fn with_bearer(
    request: reqwest::RequestBuilder,
    id_token: Option<&str>,
) -> reqwest::RequestBuilder {
    match id_token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

/// Build a `structuredQuery`: one collection, optional equality filter,
/// single order clause.
fn build_structured_query(
    collection: &str,
    filter: Option<(&str, &FieldValue)>,
    order_by_field: &str,
    descending: bool,
) -> serde_json::Value {
    let mut query = serde_json::json!({
        "from": [{ "collectionId": collection }],
        "orderBy": [{
            "field": { "fieldPath": order_by_field },
            "direction": if descending { "DESCENDING" } else { "ASCENDING" },
        }],
    });
    if let Some((field, value)) = filter {
        query["where"] = serde_json::json!({
            "fieldFilter": {
                "field": { "fieldPath": field },
                "op": "EQUAL",
                "value": value,
            }
        });
    }
    query
}
