//! Bearer-token HTTP client for the platform REST API
//!
//! Every request reads the access token from the [`SecretStore`] at send
//! time. A `403` answer triggers exactly one refresh (`POST auth/refresh/`)
//! and the `403` is still returned to the caller: the request is not sent
//! again, the next one carries the new token. Concurrent requests are not
//! coordinated, so two requests failing at the same time may both refresh.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use platon_meta::{ApiEnvelope, Settings};
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, Response, StatusCode, Url};
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::io::AsyncWriteExt;

use crate::secrets::{ACCESS_TOKEN, REFRESH_TOKEN, SecretStore};
use crate::{Error, Result};

/// Connection settings of a [`PlatonClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// REST root, e.g. `https://platon.example.org/api/v1/`
    pub api_url: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            api_url: settings.api_url(),
            timeout: Duration::from_secs(settings.api.timeout_secs),
        }
    }
}

/// Request payload
enum Body {
    Empty,
    Json(Value),
    File {
        field: String,
        file_name: String,
        bytes: Vec<u8>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshedToken {
    access_token: String,
}

/// Authenticated client, cheap to clone
#[derive(Clone)]
pub struct PlatonClient {
    http: reqwest::Client,
    api_url: Url,
    secrets: Arc<dyn SecretStore>,
}

impl PlatonClient {
    pub fn new(config: ApiConfig, secrets: Arc<dyn SecretStore>) -> Result<Self> {
        let mut raw = config.api_url.clone();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let api_url = Url::parse(&raw).map_err(|e| Error::InvalidUrl {
            url: config.api_url.clone(),
            reason: e.to_string(),
        })?;

        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            api_url,
            secrets,
        })
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    pub fn secrets(&self) -> &Arc<dyn SecretStore> {
        &self.secrets
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(Method::GET, path, Body::Empty).await?;
        Ok(response.json().await?)
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let body = Body::Json(serde_json::to_value(body)?);
        let response = self.send(Method::POST, path, body).await?;
        Ok(response.json().await?)
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let body = Body::Json(serde_json::to_value(body)?);
        let response = self.send(Method::PUT, path, body).await?;
        Ok(response.json().await?)
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send(Method::DELETE, path, Body::Empty).await?;
        Ok(())
    }

    /// Stream the body of a `GET` into `dest`, returning the number of bytes written.
    pub async fn download(&self, path: &str, dest: &Path) -> Result<u64> {
        let mut response = self.send(Method::GET, path, Body::Empty).await?;

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::File::create(dest).await?;
        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        tracing::debug!(path, dest = %dest.display(), bytes = written, "Download complete");
        Ok(written)
    }

    /// `PUT` a single file as a multipart form field.
    pub async fn put_file(
        &self,
        path: &str,
        field: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<()> {
        let body = Body::File {
            field: field.to_string(),
            file_name: file_name.to_string(),
            bytes,
        };
        self.send(Method::PUT, path, body).await?;
        Ok(())
    }

    /// Exchange the refresh token for a new access token and store it.
    pub async fn refresh(&self) -> Result<()> {
        let refresh = self
            .secrets
            .get(REFRESH_TOKEN)?
            .ok_or(Error::MissingCredential { key: REFRESH_TOKEN })?;

        let url = self.url("auth/refresh/")?;
        let body = Body::Json(json!({ "refresh": refresh }));
        let response = self.dispatch(&Method::POST, &url, &body).await?;

        if !response.status().is_success() {
            return Err(Error::RefreshFailed {
                reason: format!("HTTP {}", response.status()),
            });
        }

        let refreshed: ApiEnvelope<RefreshedToken> =
            response.json().await.map_err(|e| Error::RefreshFailed {
                reason: e.to_string(),
            })?;
        self.secrets
            .store(ACCESS_TOKEN, &refreshed.into_inner().access_token)?;

        tracing::info!("Access token refreshed");
        Ok(())
    }

    async fn send(&self, method: Method, path: &str, body: Body) -> Result<Response> {
        let url = self.url(path)?;
        let response = self.dispatch(&method, &url, &body).await?;

        if response.status() != StatusCode::FORBIDDEN {
            return ensure_success(&method, response);
        }

        tracing::info!(%method, %url, "Request forbidden, refreshing access token");
        self.refresh().await?;
        ensure_success(&method, response)
    }

    async fn dispatch(&self, method: &Method, url: &Url, body: &Body) -> Result<Response> {
        let token = self
            .secrets
            .get(ACCESS_TOKEN)?
            .ok_or(Error::MissingCredential { key: ACCESS_TOKEN })?;

        let request = self
            .http
            .request(method.clone(), url.clone())
            .header(ACCEPT, "application/json")
            .bearer_auth(token);

        let request = match body {
            Body::Empty => request,
            Body::Json(value) => request.json(value),
            Body::File {
                field,
                file_name,
                bytes,
            } => {
                let part = Part::bytes(bytes.clone())
                    .file_name(file_name.clone())
                    .mime_str("application/octet-stream")?;
                request.multipart(Form::new().part(field.clone(), part))
            }
        };

        tracing::debug!(%method, %url, "Sending request");
        Ok(request.send().await?)
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.api_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| Error::InvalidUrl {
                url: format!("{}{}", self.api_url, path),
                reason: e.to_string(),
            })
    }
}

fn ensure_success(method: &Method, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(Error::Status {
            method: method.to_string(),
            url: response.url().to_string(),
            status: status.as_u16(),
        })
    }
}
