//! Firebase Realtime Database Backend
//!
//! Speaks the database's REST protocol: `POST {db}/{path}.json` pushes a
//! child under a server-generated key and answers `{"name": "<key>"}`;
//! `GET {db}/{path}.json` returns the whole subtree, or `null` when empty.

use crate::{NewObservation, StorageError, StoredRecord};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Connection settings for the remote collection
#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    /// Database root, e.g. `https://<project>-default-rtdb.firebaseio.com`
    pub database_url: String,
    /// Reference path of the observation collection
    pub collection: String,
    /// Database secret or ID token, sent as the `auth` query parameter
    pub auth_token: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl FirebaseConfig {
    /// Settings for the default `potholes` collection at `database_url`
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            collection: "potholes".to_string(),
            auth_token: None,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Reply to a push
#[derive(Debug, Deserialize)]
struct PushResponse {
    name: String,
}

/// Observation collection stored in Firebase
pub struct FirebaseStore {
    client: reqwest::Client,
    collection_url: String,
    auth_token: Option<String>,
}

impl FirebaseStore {
    /// Build a store client. No request is made until first use.
    pub fn new(config: FirebaseConfig) -> Result<Self, StorageError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StorageError::Request(format!("HTTP client setup failed: {e}")))?;

        let collection_url = format!(
            "{}/{}.json",
            config.database_url.trim_end_matches('/'),
            config.collection.trim_matches('/'),
        );
        info!("Using Firebase collection at {}", collection_url);

        Ok(Self {
            client,
            collection_url,
            auth_token: config.auth_token,
        })
    }

    /// Full URL of the collection resource (without credentials)
    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => request.query(&[("auth", token)]),
            None => request,
        }
    }

    /// Push a record; returns the key Firebase generated for it
    pub async fn add(&self, record: &NewObservation) -> Result<String, StorageError> {
        let response = self
            .authorize(self.client.post(&self.collection_url))
            .json(record)
            .send()
            .await
            .map_err(|e| StorageError::Request(format!("push failed: {e}")))?;

        let response = check_status(response).await?;
        let pushed: PushResponse = response
            .json()
            .await
            .map_err(|e| StorageError::SerializationError(format!("push reply: {e}")))?;

        debug!("Pushed observation {}", pushed.name);
        Ok(pushed.name)
    }

    /// Read the whole collection
    pub async fn list_all(&self) -> Result<BTreeMap<String, StoredRecord>, StorageError> {
        let response = self
            .authorize(self.client.get(&self.collection_url))
            .send()
            .await
            .map_err(|e| StorageError::Request(format!("read failed: {e}")))?;

        let response = check_status(response).await?;
        let records: Option<BTreeMap<String, StoredRecord>> = response
            .json()
            .await
            .map_err(|e| StorageError::SerializationError(format!("collection body: {e}")))?;

        let records = records.unwrap_or_default();
        debug!("Read {} observations", records.len());
        Ok(records)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unable to read error body".to_owned());
    warn!("Firebase returned {}: {}", status, body);

    Err(StorageError::Rejected {
        status: status.as_u16(),
        body,
    })
}
