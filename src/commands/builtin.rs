//! Commands every daemon answers.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::commands::{CommandEnv, CommandError, CommandRequest, CommandRuntime};

/// `id`, `version`, `swarm/addrs` and `echo`.
#[derive(Debug, Clone, Default)]
pub struct BuiltinCommands;

#[async_trait]
impl CommandRuntime for BuiltinCommands {
    async fn execute(
        &self,
        env: &CommandEnv,
        request: CommandRequest,
    ) -> Result<Value, CommandError> {
        match request.path.trim_matches('/') {
            "id" => Ok(json!({
                "ID": env.peer_id,
                "Addresses": env.listen_addresses,
            })),
            "version" => Ok(json!({ "Version": env.version })),
            "swarm/addrs" => Ok(json!({ "Addresses": env.listen_addresses })),
            "echo" => request
                .arg("arg")
                .map(|arg| json!({ "Message": arg }))
                .ok_or_else(|| CommandError::BadRequest("argument 'arg' is required".into())),
            other => Err(CommandError::NotFound(other.to_string())),
        }
    }
}
