use thiserror::Error;

/// Raised when a legacy list payload has no shape we can map onto
/// a paginated envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    #[error("Cannot normalize {kind} into a paginated response: expected an array or an object")]
    Uninterpretable { kind: &'static str },
}

#[derive(Debug, Error)]
pub enum ContractError {
    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    #[error("Unsupported sort field `{field}` (allowed: {})", allowed.join(", "))]
    InvalidSortField { field: String, allowed: Vec<String> },

    #[error("Response format invalid: {0}")]
    InvalidFormat(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}
