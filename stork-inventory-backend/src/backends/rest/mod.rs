//! PostgREST-compatible backend (Supabase and self-hosted PostgREST).

mod error;
mod http;
mod query;

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::backends::merge_by_id_desc;
use crate::error::{BackendError, Result};
use crate::http_client::{DEFAULT_REQUEST_TIMEOUT_SECS, create_http_client};
use crate::traits::{InstalledSoftwareSource, RecordBackend};
use crate::types::{INSTALLED_SOFTWARE_TABLE, InstalledSoftware, InventoryRecord, RecordField, RecordId};

use http::RestClient;
use query::{id_eq, id_in, ilike_any};

pub(crate) const BACKEND_NAME: &str = "postgrest";

/// Reads retried on transient failures. Writes are never retried.
const DEFAULT_READ_RETRIES: u32 = 2;

/// Connection settings for a PostgREST endpoint.
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`. `/rest/v1` is appended.
    pub base_url: Url,
    /// Anonymous / service API key, sent as the `apikey` header.
    pub api_key: String,
    /// Signed-in user's JWT. Falls back to `api_key` for the bearer header.
    pub access_token: Option<String>,
    pub request_timeout: Duration,
    pub max_read_retries: u32,
}

impl RestConfig {
    /// Validate the base URL and build a config with default timeouts.
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        let parsed = Url::parse(base_url).map_err(|e| BackendError::Configuration {
            backend: BACKEND_NAME.to_string(),
            detail: format!("Invalid backend URL {base_url:?}: {e}"),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(BackendError::Configuration {
                backend: BACKEND_NAME.to_string(),
                detail: format!("Unsupported URL scheme: {}", parsed.scheme()),
            });
        }
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(BackendError::Configuration {
                backend: BACKEND_NAME.to_string(),
                detail: "API key is empty".to_string(),
            });
        }
        Ok(Self {
            base_url: parsed,
            api_key,
            access_token: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_read_retries: DEFAULT_READ_RETRIES,
        })
    }

    #[must_use]
    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = token.filter(|t| !t.is_empty());
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_max_read_retries(mut self, retries: u32) -> Self {
        self.max_read_retries = retries;
        self
    }

    /// `{base}/rest/v1/{table}`
    pub(crate) fn table_url(&self, table: &str) -> String {
        format!(
            "{}/rest/v1/{table}",
            self.base_url.as_str().trim_end_matches('/')
        )
    }
}

/// [`RecordBackend`] over a PostgREST table.
pub struct RestBackend<R: InventoryRecord> {
    http: RestClient,
    software: Option<Arc<dyn InstalledSoftwareSource>>,
    _record: PhantomData<fn() -> R>,
}

impl<R: InventoryRecord> RestBackend<R> {
    pub fn new(config: RestConfig) -> Result<Self> {
        let client = create_http_client(BACKEND_NAME, config.request_timeout)?;
        Ok(Self {
            http: RestClient::new(client, Arc::new(config)),
            software: None,
            _record: PhantomData,
        })
    }

    /// Union installed-software matches into search results (PC table).
    #[must_use]
    pub fn with_software(mut self, software: Arc<dyn InstalledSoftwareSource>) -> Self {
        self.software = Some(software);
        self
    }

    fn table() -> &'static str {
        R::descriptor().table()
    }

    async fn fetch_by_ids(&self, ids: &[RecordId]) -> Result<Vec<R>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.http
            .get_json(
                Self::table(),
                &format!("select=*&id={}&order=id.desc", id_in(ids)),
            )
            .await
    }

    async fn search_primary(&self, query: &str) -> Result<Vec<R>> {
        let names: Vec<&str> = R::descriptor()
            .search_fields
            .iter()
            .map(|f| f.name())
            .collect();
        self.http
            .get_json(
                Self::table(),
                &format!("select=*&or={}&order=id.desc", ilike_any(&names, query)),
            )
            .await
    }

    async fn set_hidden(&self, ids: &[RecordId], hidden: bool) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let body = if hidden {
            json!({ "is_hidden": true, "hidden_at": Utc::now().to_rfc3339() })
        } else {
            json!({ "is_hidden": false, "hidden_at": null })
        };
        self.http
            .patch_minimal(Self::table(), &format!("id={}", id_in(ids)), &body)
            .await
    }
}

#[async_trait]
impl<R: InventoryRecord> RecordBackend<R> for RestBackend<R> {
    fn id(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn list_all(&self) -> Result<Vec<R>> {
        self.http
            .get_json(Self::table(), "select=*&order=id.desc")
            .await
    }

    async fn create(&self, draft: &R::Draft) -> Result<R> {
        let rows: Vec<R> = self
            .http
            .post_json(Self::table(), "select=*", draft)
            .await?;
        rows.into_iter().next().ok_or_else(|| BackendError::Parse {
            backend: BACKEND_NAME.to_string(),
            detail: "insert returned no representation".to_string(),
        })
    }

    async fn update(&self, id: RecordId, draft: &R::Draft) -> Result<R> {
        let rows: Vec<R> = self
            .http
            .patch_json(Self::table(), &format!("id={}&select=*", id_eq(id)), draft)
            .await?;
        // PATCH 命中 0 行时 PostgREST 仍返回 200 + []
        rows.into_iter().next().ok_or_else(|| BackendError::NotFound {
            backend: BACKEND_NAME.to_string(),
            resource: format!("{}#{id}", Self::table()),
            raw_message: None,
        })
    }

    async fn hide(&self, ids: &[RecordId]) -> Result<()> {
        self.set_hidden(ids, true).await
    }

    async fn restore(&self, ids: &[RecordId]) -> Result<()> {
        self.set_hidden(ids, false).await
    }

    async fn permanent_delete(&self, ids: &[RecordId]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        self.http
            .delete(Self::table(), &format!("id={}", id_in(ids)))
            .await
    }

    async fn search(&self, query: &str) -> Result<Vec<R>> {
        let query = query.trim();
        if query.is_empty() {
            return self.list_all().await;
        }

        let Some(software) = &self.software else {
            return self.search_primary(query).await;
        };

        let (primary, software_ids) = futures::try_join!(
            self.search_primary(query),
            software.search_record_ids(query)
        )?;

        let extra_ids: Vec<RecordId> = software_ids
            .into_iter()
            .filter(|id| !primary.iter().any(|r| r.id() == *id))
            .collect();
        let extra = self.fetch_by_ids(&extra_ids).await?;
        Ok(merge_by_id_desc(primary, extra))
    }
}

/// [`InstalledSoftwareSource`] over the `installed_software` table.
pub struct RestInstalledSoftware {
    http: RestClient,
}

#[derive(Deserialize)]
struct PcinfoIdRow {
    pcinfo_id: RecordId,
}

impl RestInstalledSoftware {
    pub fn new(config: RestConfig) -> Result<Self> {
        let client = create_http_client(BACKEND_NAME, config.request_timeout)?;
        Ok(Self {
            http: RestClient::new(client, Arc::new(config)),
        })
    }
}

#[async_trait]
impl InstalledSoftwareSource for RestInstalledSoftware {
    async fn list_by_record(&self, pc_id: RecordId) -> Result<Vec<InstalledSoftware>> {
        self.http
            .get_json(
                INSTALLED_SOFTWARE_TABLE,
                &format!("select=*&pcinfo_id={}&order=software_name.asc", id_eq(pc_id)),
            )
            .await
    }

    async fn search_record_ids(&self, query: &str) -> Result<Vec<RecordId>> {
        let rows: Vec<PcinfoIdRow> = self
            .http
            .get_json(
                INSTALLED_SOFTWARE_TABLE,
                &format!(
                    "select=pcinfo_id&or={}",
                    ilike_any(&["software_name", "version", "publisher"], query.trim())
                ),
            )
            .await?;
        let mut ids: Vec<RecordId> = Vec::with_capacity(rows.len());
        for row in rows {
            if !ids.contains(&row.pcinfo_id) {
                ids.push(row.pcinfo_id);
            }
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_bad_url() {
        assert!(matches!(
            RestConfig::new("not a url", "key"),
            Err(BackendError::Configuration { .. })
        ));
        assert!(matches!(
            RestConfig::new("ftp://example.com", "key"),
            Err(BackendError::Configuration { .. })
        ));
        assert!(matches!(
            RestConfig::new("https://example.com", "  "),
            Err(BackendError::Configuration { .. })
        ));
    }

    #[test]
    fn table_url_joins_rest_prefix() {
        let config = RestConfig::new("https://xyz.supabase.co/", "key").unwrap();
        assert_eq!(
            config.table_url("printers"),
            "https://xyz.supabase.co/rest/v1/printers"
        );
    }

    #[test]
    fn empty_access_token_falls_back() {
        let config = RestConfig::new("https://xyz.supabase.co", "key")
            .unwrap()
            .with_access_token(Some(String::new()));
        assert!(config.access_token.is_none());
    }
}
