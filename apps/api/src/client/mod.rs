//! Resume API client: cache-aware queries and mutations for UI code.
//!
//! Queries read through a caller-owned `QueryCache`. Mutations never write
//! to the cache optimistically: they wait for the server, then invalidate
//! the affected entries so the next read refetches.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::models::resume::{NewResume, Resume, ResumePatch};

pub mod cache;
pub mod decode;
pub mod notify;

pub use cache::{QueryCache, QueryKey};
pub use decode::{decode_best_effort, decode_strict, Decoded};
pub use notify::{Notification, Notifier, TracingNotifier, Variant};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid client configuration: {0}")]
    Config(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unusable response body: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Substitutes `:id` in a route template.
pub fn build_url(path: &str, id: i32) -> String {
    path.replace(":id", &id.to_string())
}

pub struct ResumeClient {
    http: Client,
    base_url: String,
    notifier: Arc<dyn Notifier>,
}

impl ResumeClient {
    /// `identity` is the (header, value) pair the identity proxy would attach
    /// for a signed-in session; `None` makes anonymous calls.
    pub fn new(
        base_url: impl Into<String>,
        identity: Option<(&str, &str)>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        if let Some((name, value)) = identity {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ClientError::Config(format!("header name '{name}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ClientError::Config(format!("header value: {e}")))?;
            headers.insert(name, value);
        }

        Ok(Self {
            http: Client::builder().default_headers(headers).build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            notifier,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// All of the caller's resumes. `None` when not signed in.
    pub async fn list(
        &self,
        cache: &mut QueryCache,
    ) -> Result<Option<Decoded<Vec<Resume>>>, ClientError> {
        let key = QueryKey::list();
        if let Some(entry) = cache.fresh(&key) {
            return Ok(entry.data.clone().map(decode_best_effort));
        }

        let response = self.http.get(self.url(cache::LIST_RESOURCE)).send().await?;
        let data = match response.status() {
            StatusCode::UNAUTHORIZED => None,
            status if status.is_success() => Some(response.json::<Value>().await?),
            status => {
                return Err(ClientError::Api {
                    status: status.as_u16(),
                    message: "Failed to fetch resumes".to_string(),
                })
            }
        };

        debug!("Fetched resume list (has data: {})", data.is_some());
        cache.store(key, data.clone());
        Ok(data.map(decode_best_effort))
    }

    /// One resume. `None` when not signed in or when there is no such resume.
    pub async fn get(
        &self,
        cache: &mut QueryCache,
        id: i32,
    ) -> Result<Option<Decoded<Resume>>, ClientError> {
        let key = QueryKey::detail(id);
        if let Some(entry) = cache.fresh(&key) {
            return Ok(entry.data.clone().map(decode_best_effort));
        }

        let url = self.url(&build_url(cache::DETAIL_RESOURCE, id));
        let response = self.http.get(url).send().await?;
        let data = match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::NOT_FOUND => None,
            status if status.is_success() => Some(response.json::<Value>().await?),
            status => {
                return Err(ClientError::Api {
                    status: status.as_u16(),
                    message: "Failed to fetch resume".to_string(),
                })
            }
        };

        debug!("Fetched resume {id} (has data: {})", data.is_some());
        cache.store(key, data.clone());
        Ok(data.map(decode_best_effort))
    }

    pub async fn create(
        &self,
        cache: &mut QueryCache,
        input: &NewResume,
    ) -> Result<Decoded<Resume>, ClientError> {
        let request = self.http.post(self.url(cache::LIST_RESOURCE)).json(input);
        let fallback = "Failed to create resume";

        match self.send_mutation(request, fallback).await {
            Ok(body) => {
                cache.invalidate(&QueryKey::list());
                self.notifier
                    .notify(Notification::success("Success", "Resume created successfully"));
                Ok(decode_best_effort(body.unwrap_or(Value::Null)))
            }
            Err(err) => Err(self.report(err, fallback)),
        }
    }

    pub async fn update(
        &self,
        cache: &mut QueryCache,
        id: i32,
        patch: &ResumePatch,
    ) -> Result<Decoded<Resume>, ClientError> {
        let url = self.url(&build_url(cache::DETAIL_RESOURCE, id));
        let request = self.http.patch(url).json(patch);
        let fallback = "Failed to update resume";

        match self.send_mutation(request, fallback).await {
            Ok(body) => {
                cache.invalidate(&QueryKey::list());
                cache.invalidate(&QueryKey::detail(id));
                self.notifier
                    .notify(Notification::success("Saved", "Resume updated successfully"));
                Ok(decode_best_effort(body.unwrap_or(Value::Null)))
            }
            Err(err) => Err(self.report(err, fallback)),
        }
    }

    pub async fn delete(&self, cache: &mut QueryCache, id: i32) -> Result<(), ClientError> {
        let url = self.url(&build_url(cache::DETAIL_RESOURCE, id));
        let fallback = "Failed to delete resume";

        match self.send_mutation(self.http.delete(url), fallback).await {
            Ok(_) => {
                cache.invalidate(&QueryKey::list());
                self.notifier
                    .notify(Notification::success("Deleted", "Resume has been deleted"));
                Ok(())
            }
            Err(err) => Err(self.report(err, fallback)),
        }
    }

    /// Sends a mutation and returns its JSON body, if any. Non-2xx answers
    /// become `ClientError::Api` carrying the server's message when it sent one.
    async fn send_mutation(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<Option<Value>, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|b| b.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| fallback.to_string());
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        Ok(Some(response.json::<Value>().await?))
    }

    fn report(&self, err: ClientError, fallback: &str) -> ClientError {
        let description = match &err {
            ClientError::Api { message, .. } => message.clone(),
            _ => fallback.to_string(),
        };
        self.notifier.notify(Notification::error(description));
        err
    }
}
