use thiserror::Error;

mod domain_types;
mod ids;

pub use domain_types::*;
pub use ids::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid block identifier '{input}': expected a full Notion page URL or a page ID. Please consult the documentation for further information.")]
    InvalidIdentifier { input: String },

    #[error("Invalid session token: {reason}")]
    InvalidSessionToken { reason: String },

    #[error("Empty required field: {0}")]
    EmptyField(&'static str),

    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },
}
