//! Firestore REST adapter for the inventory collection
//!
//! Each item is a document keyed by its normalized name with a single
//! `quantity` integer field. Firestore's REST surface is used directly:
//! list, get, patch (upsert with full field replace) and delete.
//!
//! `apply_delta` uses the trait's get-then-patch default. There is no
//! precondition on the patch, so two writers racing on the same document can
//! lose an update; the last patch wins.

use async_trait::async_trait;
use pantry_domain::{InventoryItem, InventoryStore, ItemName, StoreError};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Connection settings for a Firestore database
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    /// REST root, e.g. `https://firestore.googleapis.com/v1`
    pub base_url: String,
    pub project_id: String,
    /// Database ID, usually `(default)`
    pub database: String,
    /// Collection holding the inventory documents
    pub collection: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        Self {
            base_url: "https://firestore.googleapis.com/v1".to_string(),
            project_id: String::new(),
            database: "(default)".to_string(),
            collection: "inventory".to_string(),
            timeout_secs: 30,
        }
    }
}

const PAGE_SIZE: &str = "300";

/// Firestore-backed inventory store
pub struct FirestoreInventoryStore {
    client: Client,
    collection_url: Url,
    api_key: Option<SecretString>,
}

impl FirestoreInventoryStore {
    pub fn new(config: FirestoreConfig, api_key: Option<SecretString>) -> Result<Self, StoreError> {
        if config.project_id.trim().is_empty() {
            return Err(StoreError::Unavailable(
                "Firestore project_id is required".to_string(),
            ));
        }

        let collection_url = Url::parse(&format!(
            "{}/projects/{}/databases/{}/documents/{}",
            config.base_url.trim_end_matches('/'),
            config.project_id,
            config.database,
            config.collection
        ))
        .map_err(|e| StoreError::Unavailable(format!("Invalid Firestore URL: {}", e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoreError::Unavailable(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            collection_url,
            api_key,
        })
    }

    fn document_url(&self, name: &ItemName) -> Result<Url, StoreError> {
        let mut url = self.collection_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::Unavailable("Firestore URL cannot be a base".to_string()))?
            .push(name.as_str());
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.query(&[("key", key.expose_secret())]),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, StoreError> {
        self.authorize(request)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

async fn unexpected_status(response: reqwest::Response) -> StoreError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    StoreError::Unavailable(format!("Firestore returned {}: {}", status, body))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
    next_page_token: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct Document {
    #[serde(default, skip_serializing)]
    name: String,
    #[serde(default)]
    fields: HashMap<String, FieldValue>,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct FieldValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    integer_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    double_value: Option<f64>,
}

impl Document {
    fn from_item(item: &InventoryItem) -> Self {
        let mut fields = HashMap::new();
        fields.insert(
            "quantity".to_string(),
            FieldValue {
                integer_value: Some(item.quantity.to_string()),
                double_value: None,
            },
        );
        Self {
            name: String::new(),
            fields,
        }
    }

    fn into_item(self) -> Result<InventoryItem, StoreError> {
        let id = self.name.rsplit('/').next().unwrap_or_default();
        let name = ItemName::parse(id).map_err(|e| {
            StoreError::Serialization(format!("Bad document name {:?}: {}", self.name, e))
        })?;

        let value = self.fields.get("quantity").ok_or_else(|| {
            StoreError::Serialization(format!("Document {} has no quantity", name))
        })?;

        let quantity = match (&value.integer_value, value.double_value) {
            (Some(raw), _) => raw.parse::<i64>().ok(),
            (None, Some(n)) if n.fract() == 0.0 => Some(n as i64),
            _ => None,
        }
        .and_then(|q| u32::try_from(q).ok())
        .filter(|q| *q > 0)
        .ok_or_else(|| {
            StoreError::Serialization(format!("Document {} has an invalid quantity", name))
        })?;

        Ok(InventoryItem::new(name, quantity))
    }
}

#[async_trait]
impl InventoryStore for FirestoreInventoryStore {
    async fn list_items(&self) -> Result<Vec<InventoryItem>, StoreError> {
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(self.collection_url.clone())
                .query(&[("pageSize", PAGE_SIZE)]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = self.send(request).await?;
            if !response.status().is_success() {
                return Err(unexpected_status(response).await);
            }

            let page: ListDocumentsResponse = response
                .json()
                .await
                .map_err(|e| StoreError::Serialization(e.to_string()))?;

            for document in page.documents {
                // Other clients may leave zero or malformed quantities behind
                match document.into_item() {
                    Ok(item) => items.push(item),
                    Err(e) => tracing::warn!(error = %e, "Skipping unreadable document"),
                }
            }

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::debug!(count = items.len(), "Listed Firestore documents");
        Ok(items)
    }

    async fn get_item(&self, name: &ItemName) -> Result<Option<InventoryItem>, StoreError> {
        let url = self.document_url(name)?;
        let response = self.send(self.client.get(url)).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(unexpected_status(response).await);
        }

        let document: Document = response
            .json()
            .await
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        document.into_item().map(Some)
    }

    async fn put_item(&self, item: &InventoryItem) -> Result<(), StoreError> {
        let url = self.document_url(&item.name)?;
        let response = self
            .send(self.client.patch(url).json(&Document::from_item(item)))
            .await?;

        if !response.status().is_success() {
            return Err(unexpected_status(response).await);
        }

        Ok(())
    }

    async fn delete_item(&self, name: &ItemName) -> Result<(), StoreError> {
        let url = self.document_url(name)?;
        let response = self.send(self.client.delete(url)).await?;

        if response.status() == StatusCode::NOT_FOUND || response.status().is_success() {
            return Ok(());
        }

        Err(unexpected_status(response).await)
    }

    fn backend(&self) -> &'static str {
        "firestore"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const COLLECTION: &str = "/v1/projects/demo/databases/(default)/documents/inventory";

    fn store(server: &MockServer, api_key: Option<&str>) -> FirestoreInventoryStore {
        FirestoreInventoryStore::new(
            FirestoreConfig {
                base_url: format!("{}/v1", server.uri()),
                project_id: "demo".to_string(),
                ..Default::default()
            },
            api_key.map(|k| SecretString::new(k.into())),
        )
        .unwrap()
    }

    fn name(raw: &str) -> ItemName {
        ItemName::parse(raw).unwrap()
    }

    fn document(id: &str, quantity: u32) -> serde_json::Value {
        serde_json::json!({
            "name": format!("projects/demo/databases/(default)/documents/inventory/{}", id),
            "fields": { "quantity": { "integerValue": quantity.to_string() } },
            "createTime": "2024-08-01T10:00:00.000000Z",
            "updateTime": "2024-08-01T10:00:00.000000Z"
        })
    }

    #[test]
    fn test_project_id_required() {
        let result = FirestoreInventoryStore::new(FirestoreConfig::default(), None);
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_list_follows_page_tokens() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(COLLECTION))
            .and(query_param("pageToken", "next"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "documents": [document("milk", 1)]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(COLLECTION))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "documents": [document("eggs", 3)],
                "nextPageToken": "next"
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        let items = store(&server, None).list_items().await.unwrap();

        assert_eq!(
            items,
            vec![
                InventoryItem::new(name("eggs"), 3),
                InventoryItem::new(name("milk"), 1),
            ]
        );
    }

    #[tokio::test]
    async fn test_list_empty_collection() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(COLLECTION))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        assert!(store(&server, None).list_items().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_document() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("{}/eggs", COLLECTION)))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let item = store(&server, None).get_item(&name("eggs")).await.unwrap();
        assert!(item.is_none());
    }

    #[tokio::test]
    async fn test_put_sends_integer_field_with_key() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path(format!("{}/eggs", COLLECTION)))
            .and(query_param("key", "test-key"))
            .and(body_json(serde_json::json!({
                "fields": { "quantity": { "integerValue": "4" } }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(document("eggs", 4)))
            .expect(1)
            .mount(&server)
            .await;

        store(&server, Some("test-key"))
            .put_item(&InventoryItem::new(name("eggs"), 4))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_apply_delta_reads_then_patches() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("{}/eggs", COLLECTION)))
            .respond_with(ResponseTemplate::new(200).set_body_json(document("eggs", 2)))
            .mount(&server)
            .await;

        Mock::given(method("PATCH"))
            .and(path(format!("{}/eggs", COLLECTION)))
            .and(body_json(serde_json::json!({
                "fields": { "quantity": { "integerValue": "3" } }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(document("eggs", 3)))
            .expect(1)
            .mount(&server)
            .await;

        let quantity = store(&server, None)
            .apply_delta(&name("eggs"), 1)
            .await
            .unwrap();
        assert_eq!(quantity, Some(3));
    }

    #[tokio::test]
    async fn test_decrement_last_unit_deletes_document() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("{}/eggs", COLLECTION)))
            .respond_with(ResponseTemplate::new(200).set_body_json(document("eggs", 1)))
            .mount(&server)
            .await;

        Mock::given(method("DELETE"))
            .and(path(format!("{}/eggs", COLLECTION)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let quantity = store(&server, None)
            .apply_delta(&name("eggs"), -1)
            .await
            .unwrap();
        assert_eq!(quantity, None);
    }

    #[tokio::test]
    async fn test_delete_missing_document_is_ok() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path(format!("{}/eggs", COLLECTION)))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        store(&server, None).delete_item(&name("eggs")).await.unwrap();
    }

    #[tokio::test]
    async fn test_permission_denied_is_unavailable() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(COLLECTION))
            .respond_with(ResponseTemplate::new(403).set_body_string("PERMISSION_DENIED"))
            .mount(&server)
            .await;

        let result = store(&server, None).list_items().await;
        assert!(matches!(result, Err(StoreError::Unavailable(msg)) if msg.contains("403")));
    }

    #[test]
    fn test_document_with_double_quantity() {
        let document: Document = serde_json::from_value(serde_json::json!({
            "name": "projects/demo/databases/(default)/documents/inventory/Rice",
            "fields": { "quantity": { "doubleValue": 2.0 } }
        }))
        .unwrap();

        let item = document.into_item().unwrap();
        assert_eq!(item, InventoryItem::new(name("rice"), 2));
    }
}
