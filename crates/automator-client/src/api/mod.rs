//! API endpoint implementations, one module per backend capability.

mod agent;
mod ai;
mod github;
mod jira;

pub use agent::AgentApi;
pub use ai::AiApi;
pub use github::GithubApi;
pub use jira::JiraApi;
