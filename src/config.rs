// src/config.rs
use crate::api::Pagination;
use crate::constants::{DEFAULT_CHUNK_LIMIT, NOTION_API_BASE_URL};
use crate::error::AppError;
use crate::types::{ActiveUser, ApiBaseUrl, Session, SessionToken};
use clap::{Parser, Subcommand};
use std::time::Duration;

/// Environment variable holding the `token_v2` session cookie.
pub const TOKEN_ENV_VAR: &str = "NOTION_TOKEN_V2";

/// Environment variable holding the active user id (optional).
pub const ACTIVE_USER_ENV_VAR: &str = "NOTION_ACTIVE_USER";

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Number of concurrent child fetches (default: auto, max 32)
    #[arg(long, global = true)]
    pub concurrency: Option<usize>,

    /// Give up on a stuck lookup after this many seconds (default: no limit)
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Initial delay between retries in milliseconds (0 = retry immediately)
    #[arg(long, global = true, default_value_t = 0)]
    pub backoff_ms: u64,

    /// Records requested per chunk
    #[arg(long, global = true, default_value_t = DEFAULT_CHUNK_LIMIT)]
    pub limit: u32,

    /// Base URL of the private API
    #[arg(long, global = true, default_value = NOTION_API_BASE_URL)]
    pub base_url: String,

    /// Print results as JSON instead of plain text
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,
}

/// What to do with the page URL or id given on the command line.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Resolve a page and print its id, title, parent and children
    Page { url_or_id: String },

    /// Resolve any block, whatever its type
    Block { url_or_id: String },

    /// Resolve every child block of a page, in document order
    Children { url_or_id: String },

    /// Print the child ids of a page, in document order
    ChildrenIds { url_or_id: String },

    /// Resolve a page and its descendants
    Tree {
        url_or_id: String,

        /// Levels to expand below the page
        #[arg(long, default_value_t = 3)]
        depth: u8,
    },

    /// Print collection id, view ids and name of a collection view block
    Collection { url_or_id: String },

    /// Normalize a page URL or id without contacting the service
    Normalize { url_or_id: String },

    /// Print the id of the user the session belongs to
    Whoami { url_or_id: String },
}

impl Command {
    /// Whether the command talks to the service at all.
    pub fn needs_session(&self) -> bool {
        !matches!(self, Command::Normalize { .. })
    }
}

/// Resolved client configuration, validated and ready to build a client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub command: Command,
    /// `None` only for commands that never contact the service.
    pub session: Option<Session>,
    pub base_url: ApiBaseUrl,
    pub concurrency: Option<usize>,
    pub timeout: Option<Duration>,
    pub backoff: Duration,
    pub pagination: Pagination,
    pub verbose: bool,
    pub json: bool,
}

impl ClientConfig {
    /// Resolves a complete configuration from CLI input and environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        Self::resolve_with(cli, |name| std::env::var(name).ok())
    }

    /// Like [`resolve`](Self::resolve), reading variables through `env`.
    pub fn resolve_with<F>(cli: CommandLineInput, env: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let session = if cli.command.needs_session() {
            let token = env(TOKEN_ENV_VAR).ok_or_else(|| {
                AppError::MissingConfiguration(format!(
                    "{} environment variable not set",
                    TOKEN_ENV_VAR
                ))
            })?;
            let active_user = env(ACTIVE_USER_ENV_VAR)
                .filter(|user| !user.trim().is_empty())
                .map(ActiveUser::new)
                .transpose()?;
            Some(Session::new(SessionToken::new(token)?, active_user))
        } else {
            None
        };

        Ok(ClientConfig {
            command: cli.command,
            session,
            base_url: ApiBaseUrl::parse(&cli.base_url)?,
            concurrency: cli.concurrency,
            timeout: cli.timeout_secs.map(Duration::from_secs),
            backoff: Duration::from_millis(cli.backoff_ms),
            pagination: Pagination {
                limit: cli.limit,
                ..Pagination::default()
            },
            verbose: cli.verbose,
            json: cli.json,
        })
    }

    /// The session, or a configuration error for offline-only configs.
    pub fn require_session(&self) -> Result<&Session, AppError> {
        self.session.as_ref().ok_or_else(|| {
            AppError::MissingConfiguration(format!(
                "{} environment variable not set",
                TOKEN_ENV_VAR
            ))
        })
    }
}
