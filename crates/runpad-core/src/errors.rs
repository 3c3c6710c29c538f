use thiserror::Error;

/// A caller-supplied request did not match the expected shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid request: '{field}' {reason}")]
pub struct ValidationError {
    /// Offending property, or `body` when the problem is the request as a whole.
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn body(reason: impl Into<String>) -> Self {
        Self::new("body", reason)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    /// The engine could not be reached, timed out, or sent a body that is not a JSON object.
    #[error("Execution engine error: {0}")]
    Transport(String),
    /// The engine answered but refused to run the code.
    #[error("{message}")]
    RemoteRejected { message: String },
}

impl ExecutionError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::RemoteRejected {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ExecutionError::Transport(_) => "transport",
            ExecutionError::RemoteRejected { .. } => "remote_rejected",
        }
    }
}

impl From<reqwest::Error> for ExecutionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ExecutionError::Transport(format!("request timed out: {}", err))
        } else {
            ExecutionError::Transport(err.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
