use serde::{Deserialize, Serialize};

/// A request sent from client to server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// Command name, e.g. `PING`.
    pub cmd: String,
    /// Positional arguments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

impl Command {
    /// Create a command with arguments.
    pub fn new<I, S>(cmd: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cmd: cmd.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

/// A reply sent from server to client.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Response {
    /// Error message, set when the command failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,
    /// Result value, set when the command succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

impl Response {
    /// A successful reply carrying `value`.
    pub fn ok(value: impl Into<serde_json::Value>) -> Self {
        Self {
            err: None,
            value: Some(value.into()),
        }
    }

    /// A failed reply.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            err: Some(message.into()),
            value: None,
        }
    }

    /// Whether the command succeeded.
    pub fn is_ok(&self) -> bool {
        self.err.is_none()
    }
}
