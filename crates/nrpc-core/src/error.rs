/// Boxed error produced by a [`NodeTransport`](crate::rpc::NodeTransport)
/// when no response could be obtained from the node.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid argument: {0}")]
    Validation(String),

    #[error("node unreachable: {0}")]
    Transport(#[source] TransportError),

    #[error(transparent)]
    Application(#[from] ApplicationError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A reply was obtained from the node but it represents a failure.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    /// The node returned a structured JSON error body.
    #[error("node error: {0}")]
    Structured(serde_json::Value),

    /// The node replied without a structured body.
    #[error("node replied with status {status} and no structured body: {body}")]
    Raw { status: u16, body: String },

    /// A success reply lacked something the operation relies on.
    #[error("unexpected node response: {0}")]
    Unexpected(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Transport,
    Application,
    Config,
    Io,
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Validation(_) => ErrorKind::Validation,
            CoreError::Transport(_) => ErrorKind::Transport,
            CoreError::Application(_) => ErrorKind::Application,
            CoreError::Config(_) => ErrorKind::Config,
            CoreError::Io(_) => ErrorKind::Io,
        }
    }

    /// The structured error body reported by the node, if any.
    pub fn node_error_body(&self) -> Option<&serde_json::Value> {
        match self {
            CoreError::Application(ApplicationError::Structured(body)) => Some(body),
            _ => None,
        }
    }
}
