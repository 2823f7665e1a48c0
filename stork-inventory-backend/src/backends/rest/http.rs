//! PostgREST HTTP 请求方法

use std::sync::Arc;

use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{BackendError, Result};
use crate::http_client::HttpUtils;

use super::error::map_status;
use super::{BACKEND_NAME, RestConfig};

/// Authenticated client bound to one PostgREST endpoint.
pub(crate) struct RestClient {
    client: Client,
    config: Arc<RestConfig>,
}

impl RestClient {
    pub(crate) fn new(client: Client, config: Arc<RestConfig>) -> Self {
        Self { client, config }
    }

    fn url(&self, table: &str, query: &str) -> String {
        format!("{}?{query}", self.config.table_url(table))
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let bearer = self
            .config
            .access_token
            .as_deref()
            .unwrap_or(&self.config.api_key);
        builder
            .header("apikey", &self.config.api_key)
            .header("Authorization", format!("Bearer {bearer}"))
            .header("Accept", "application/json")
    }

    fn check(status: u16, body: &str, table: &str) -> Result<()> {
        if status >= 400 {
            let err = map_status(status, body, table);
            if err.is_expected() {
                log::warn!("[{BACKEND_NAME}] {err}");
            } else {
                log::error!("[{BACKEND_NAME}] {err}");
            }
            return Err(err);
        }
        Ok(())
    }

    fn to_body<B: Serialize + ?Sized>(body: &B) -> Result<String> {
        serde_json::to_string(body).map_err(|e| BackendError::Serialization {
            backend: BACKEND_NAME.to_string(),
            detail: e.to_string(),
        })
    }

    /// 执行 GET 请求（只读，可重试）
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, table: &str, query: &str) -> Result<T> {
        let url = self.url(table, query);
        let request = self.authorize(self.client.get(&url));
        let (status, text) = HttpUtils::execute_request_with_retry(
            request,
            BACKEND_NAME,
            "GET",
            &url,
            self.config.max_read_retries,
        )
        .await?;
        Self::check(status, &text, table)?;
        HttpUtils::parse_json(&text, BACKEND_NAME)
    }

    /// 执行 POST 请求，返回插入后的行
    pub(crate) async fn post_json<B, T>(&self, table: &str, query: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(table, query);
        let request = self
            .authorize(self.client.post(&url))
            .header("Content-Type", "application/json")
            .header("Prefer", "return=representation")
            .body(Self::to_body(body)?);
        let (status, text) = HttpUtils::execute_request(request, BACKEND_NAME, "POST", &url).await?;
        Self::check(status, &text, table)?;
        HttpUtils::parse_json(&text, BACKEND_NAME)
    }

    /// 执行 PATCH 请求，返回更新后的行
    pub(crate) async fn patch_json<B, T>(&self, table: &str, query: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(table, query);
        let request = self
            .authorize(self.client.patch(&url))
            .header("Content-Type", "application/json")
            .header("Prefer", "return=representation")
            .body(Self::to_body(body)?);
        let (status, text) =
            HttpUtils::execute_request(request, BACKEND_NAME, "PATCH", &url).await?;
        Self::check(status, &text, table)?;
        HttpUtils::parse_json(&text, BACKEND_NAME)
    }

    /// 执行 PATCH 请求，不要求返回内容
    pub(crate) async fn patch_minimal<B>(&self, table: &str, query: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(table, query);
        let request = self
            .authorize(self.client.patch(&url))
            .header("Content-Type", "application/json")
            .header("Prefer", "return=minimal")
            .body(Self::to_body(body)?);
        let (status, text) =
            HttpUtils::execute_request(request, BACKEND_NAME, "PATCH", &url).await?;
        Self::check(status, &text, table)
    }

    /// 执行 DELETE 请求
    pub(crate) async fn delete(&self, table: &str, query: &str) -> Result<()> {
        let url = self.url(table, query);
        let request = self
            .authorize(self.client.delete(&url))
            .header("Prefer", "return=minimal");
        let (status, text) =
            HttpUtils::execute_request(request, BACKEND_NAME, "DELETE", &url).await?;
        Self::check(status, &text, table)
    }
}
