use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConnectorError>;

#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    DialectLoad(#[from] DialectLoadError),
    #[error("connection error: {0}")]
    Connection(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("wire format error: {0}")]
    Wire(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ConnectorError {
    /// Name of the offending field when this is a validation failure.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ConnectorError::Validation(ValidationError::MissingField { field, .. }) => Some(*field),
            _ => None,
        }
    }
}

/// Field-labeled failures raised before any connection attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing {field}")]
    MissingField {
        field: &'static str,
        label: &'static str,
    },
}

/// A dialect definition could not be read or parsed. Cached by the registry,
/// so it is cheap to clone and replay to every later caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to load dialect definition {path}: {reason}")]
pub struct DialectLoadError {
    pub path: String,
    pub reason: String,
}
