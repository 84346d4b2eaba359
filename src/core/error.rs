use thiserror::Error;

#[derive(Error, Debug)]
pub enum PilotError {
    /// No sentinel-delimited payload in the model response. Recoverable:
    /// the turn simply produced no directives.
    #[error("no machine-readable payload in model output: {0}")]
    MalformedOutput(String),

    /// Payload present but not valid JSON after normalization. Turn-fatal.
    #[error("payload did not parse: {0}")]
    ParseError(String),

    /// Operation name has no registry match. Directive-local.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// A task reference matched more than one task title. Directive-local.
    #[error("ambiguous task reference {reference:?}: matches {matches:?}")]
    AmbiguousReference {
        reference: String,
        matches: Vec<String>,
    },

    /// A task reference matched nothing. Directive-local.
    #[error("unresolved task reference: {0:?}")]
    UnresolvedReference(String),

    /// The store returned no usable output. Directive-local.
    #[error("task store command failed: {0}")]
    ExternalCommandFailure(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("forecast error: {0}")]
    ForecastError(String),

    #[error("config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PilotError>;
