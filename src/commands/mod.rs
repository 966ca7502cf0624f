//! Command runtime.
//!
//! The api server does no routing of its own: every request under the API prefix is
//! turned into a [`CommandRequest`] and handed to a [`CommandRuntime`] together with a
//! snapshot of the node it is serving.

pub mod builtin;

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use builtin::BuiltinCommands;

/// What a command may know about the node it runs against.
#[derive(Debug, Clone)]
pub struct CommandEnv {
    pub peer_id: String,
    pub listen_addresses: Vec<String>,
    pub version: &'static str,
}

/// A command invocation.
#[derive(Debug, Clone, Default)]
pub struct CommandRequest {
    /// Slash-separated command path, e.g. `swarm/addrs`.
    pub path: String,
    /// Query-string arguments.
    pub args: HashMap<String, String>,
}

impl CommandRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            args: HashMap::new(),
        }
    }

    pub fn arg(&self, name: &str) -> Option<&str> {
        self.args.get(name).map(String::as_str)
    }
}

/// Errors a command can report to its caller.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

/// Executes commands on behalf of the api server.
#[async_trait]
pub trait CommandRuntime: Send + Sync {
    async fn execute(
        &self,
        env: &CommandEnv,
        request: CommandRequest,
    ) -> Result<Value, CommandError>;
}
