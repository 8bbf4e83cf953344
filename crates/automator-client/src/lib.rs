//! HTTP client SDK for the MCP automation backend.
//!
//! Provides typed request builders for every remote capability the terminal
//! client consumes (Jira lookups, GitHub commit history, AI text generation
//! and the `/adk/agent` natural-language agent), plus a [`ServerRegistry`]
//! that resolves logical server names to configured, cached clients.
//!
//! Responses are deliberately loose: the backend enforces no schema beyond
//! optional fields, so every operation returns a raw [`serde_json::Value`]
//! for the formatting layer to probe.
//!
//! # Example
//!
//! ```no_run
//! use automator_client::McpClient;
//!
//! # async fn example() -> automator_client::Result<()> {
//! let client = McpClient::builder()
//!     .base_url("http://localhost:8000")
//!     .build()?;
//!
//! let issue = client.jira().issue("ABC-123").await?;
//! println!("{issue:#}");
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod registry;
pub mod types;

pub use client::{ClientBuilder, McpClient};
pub use error::{Error, Result};
pub use registry::{ServerConfig, ServerRegistry, DEFAULT_SERVER};
pub use types::CommitQuery;
