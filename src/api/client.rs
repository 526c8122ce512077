// src/api/client.rs
//! Pure HTTP transport for the private block API.
//!
//! This module wraps reqwest: it attaches the session cookies and headers,
//! POSTs the request body and hands back the decoded JSON together with the
//! response headers. It does no retrying and no field extraction.

use super::types::{LoadPageChunkRequest, TransportResponse};
use crate::constants::{ACTIVE_USER_HEADER, LOAD_PAGE_CHUNK_ENDPOINT};
use crate::error::{AppError, NotionErrorCode};
use crate::types::{ApiBaseUrl, Session};
use reqwest::{header, Client, Response};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A thin wrapper around reqwest Client for the private API.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    base_url: ApiBaseUrl,
}

/// Error body returned by the private API on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl NotionHttpClient {
    /// Creates a new HTTP client carrying the session's cookies and headers.
    pub fn new(session: &Session, base_url: ApiBaseUrl) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(session)?)
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Creates the default headers for every request of this session.
    fn create_headers(session: &Session) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        headers.insert(
            header::COOKIE,
            header::HeaderValue::from_str(&session.cookie_header()).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid session cookie format: {}", e))
            })?,
        );

        if let Some(active_user) = &session.active_user {
            headers.insert(
                ACTIVE_USER_HEADER,
                header::HeaderValue::from_str(active_user.as_str()).map_err(|e| {
                    AppError::MissingConfiguration(format!("Invalid active user format: {}", e))
                })?,
            );
        }

        Ok(headers)
    }

    /// Makes a POST request with JSON body to the specified endpoint.
    pub async fn post<T: Serialize>(&self, endpoint: &str, body: &T) -> Result<Response, AppError> {
        let url = self.base_url.endpoint(endpoint);
        log::debug!("POST {}", url);
        Ok(self.client.post(url).json(body).send().await?)
    }
}

#[async_trait::async_trait]
impl super::RecordTransport for NotionHttpClient {
    async fn load_page_chunk(
        &self,
        request: &LoadPageChunkRequest,
    ) -> Result<TransportResponse, AppError> {
        let response = self.post(LOAD_PAGE_CHUNK_ENDPOINT, request).await?;
        decode_response(response).await
    }
}

/// Decodes a response into JSON body plus lowercase headers.
///
/// Non-2xx statuses become [`AppError::NotionService`], classified from the
/// error body's `name` when it has one.
pub async fn decode_response(response: Response) -> Result<TransportResponse, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let headers: HashMap<String, String> = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_ascii_lowercase(), value.to_string()))
        })
        .collect();
    let text = response.text().await?;

    if !status.is_success() {
        let parsed = serde_json::from_str::<ServiceErrorBody>(&text).ok();
        let code = parsed
            .as_ref()
            .and_then(|body| body.name.as_deref())
            .map(NotionErrorCode::from_api_response)
            .unwrap_or_else(|| NotionErrorCode::from_http_status(status.as_u16()));
        let message = parsed
            .and_then(|body| body.message)
            .unwrap_or_else(|| format!("HTTP {} from {}", status, url));
        log::debug!("{} failed with {}: {}", url, code, message);
        return Err(AppError::NotionService {
            code,
            status,
            message,
        });
    }

    let body = serde_json::from_str(&text).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", url, e);
        AppError::MalformedResponse(format!("{} (body: {})", e, preview(&text)))
    })?;

    Ok(TransportResponse { body, headers })
}

fn preview(body: &str) -> String {
    const PREVIEW_CHARS: usize = 200;
    if body.chars().count() > PREVIEW_CHARS {
        format!("{}...", body.chars().take(PREVIEW_CHARS).collect::<String>())
    } else {
        body.to_string()
    }
}
