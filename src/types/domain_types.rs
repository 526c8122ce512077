// src/types/domain_types.rs
//! Domain-specific newtypes for the session credentials and API endpoint.

use super::ValidationError;
use std::fmt;
use url::Url;

/// The `token_v2` cookie that authenticates requests to the private API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Create a new session token with validation
    pub fn new(token: impl Into<String>) -> Result<Self, ValidationError> {
        let token = token.into();
        let trimmed = token.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::InvalidSessionToken {
                reason: "token_v2 cannot be empty".to_string(),
            });
        }

        if trimmed.chars().any(|c| c.is_whitespace() || c == ';') {
            return Err(ValidationError::InvalidSessionToken {
                reason: "token_v2 must not contain whitespace or ';'".to_string(),
            });
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Get the token as a string reference
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Redact token in display
        let visible: String = self.0.chars().take(6).collect();
        write!(f, "{}...", visible)
    }
}

/// The active user id sent as both a cookie and a header on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveUser(String);

impl ActiveUser {
    pub fn new(user: impl Into<String>) -> Result<Self, ValidationError> {
        let user = user.into();
        if user.trim().is_empty() {
            return Err(ValidationError::EmptyField("active user"));
        }
        Ok(Self(user.trim().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActiveUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Credentials shared read-only by every request a client makes.
///
/// Built once and handed to the transport at construction; nothing mutates
/// it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: SessionToken,
    pub active_user: Option<ActiveUser>,
}

impl Session {
    pub fn new(token: SessionToken, active_user: Option<ActiveUser>) -> Self {
        Self { token, active_user }
    }

    /// Builds the `Cookie` header value for this session.
    pub fn cookie_header(&self) -> String {
        let active_user = self.active_user.as_ref().map(ActiveUser::as_str).unwrap_or("");
        format!(
            "token_v2={}; x-active-user-header={}",
            self.token.as_str(),
            active_user
        )
    }
}

/// Validated base URL of the private API (e.g. `https://www.notion.so/api/v3`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBaseUrl(Url);

impl ApiBaseUrl {
    pub fn parse(url: &str) -> Result<Self, ValidationError> {
        let parsed = Url::parse(url).map_err(|e| ValidationError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ValidationError::InvalidUrl {
                url: url.to_string(),
                reason: "URL must use http or https".to_string(),
            });
        }

        Ok(Self(parsed))
    }

    /// Joins an endpoint name onto the base URL.
    pub fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.0.as_str().trim_end_matches('/'), name)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ApiBaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
