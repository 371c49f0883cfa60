//! Registrar backend client.

use std::time::Duration;

use registrar_core::decode_content;
use registrar_models::{Department, DepartmentId, Program, School, SchoolId};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::OptionProvider;
use crate::error::ProviderError;

const USER_AGENT_VALUE: &str = concat!("registrar-filters/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct HttpOptionProvider {
    client: reqwest::Client,
    base_url: String,
    page_size: u32,
}

impl HttpOptionProvider {
    /// Creates a client for the backend rooted at `base_url`
    /// (e.g. `http://localhost:8080/api`).
    pub fn new(
        base_url: impl Into<String>,
        page_size: u32,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT_VALUE)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            page_size: page_size.max(1),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_list<T>(&self, path: &str, scope: Option<(&str, &str)>) -> Result<Vec<T>, ProviderError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path);
        let page_size = self.page_size.to_string();

        let mut request = self
            .client
            .get(&url)
            .query(&[("page", "0"), ("size", page_size.as_str())]);
        if let Some(scope) = scope {
            request = request.query(&[scope]);
        }

        debug!(url = %url, scope = ?scope, "Fetching option list");

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.bytes().await?;
        let items = decode_content(&body)?;
        Ok(items)
    }
}

impl OptionProvider for HttpOptionProvider {
    #[instrument(skip(self))]
    async fn schools(&self) -> Result<Vec<School>, ProviderError> {
        self.get_list("schools", None).await
    }

    #[instrument(skip(self))]
    async fn departments(&self, school: Option<&SchoolId>) -> Result<Vec<Department>, ProviderError> {
        self.get_list("departments", school.map(|id| ("schoolId", id.as_str())))
            .await
    }

    #[instrument(skip(self))]
    async fn programs(
        &self,
        department: Option<&DepartmentId>,
    ) -> Result<Vec<Program>, ProviderError> {
        self.get_list(
            "programs",
            department.map(|id| ("departmentId", id.as_str())),
        )
        .await
    }
}
