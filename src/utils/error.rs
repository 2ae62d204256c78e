use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("Missing credential: {var} is not set")]
    MissingCredential { var: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Places API returned status {status}: {message}")]
    ApiStatus { status: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Where in a run an error was caught. Decides whether the run continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Query,
    Page,
    Detail,
    Persistence,
}

impl CollectorError {
    /// Default category when the error is seen outside the collector loop.
    pub fn category(&self) -> ErrorCategory {
        match self {
            CollectorError::MissingCredential { .. }
            | CollectorError::ConfigError { .. }
            | CollectorError::InvalidConfigValue { .. }
            | CollectorError::TomlParse(_) => ErrorCategory::Configuration,
            CollectorError::Io(_) | CollectorError::Serialization(_) => {
                ErrorCategory::Persistence
            }
            CollectorError::Http(_) | CollectorError::ApiStatus { .. } => ErrorCategory::Query,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            CollectorError::MissingCredential { var } => format!(
                "Create a .env file with your Google Maps API key:\n{}=your_api_key_here",
                var
            ),
            CollectorError::ConfigError { .. } | CollectorError::TomlParse(_) => {
                "Check the configuration file syntax and section names".to_string()
            }
            CollectorError::InvalidConfigValue { field, .. } => {
                format!("Fix the value of '{}' and run again", field)
            }
            CollectorError::Http(_) => {
                "Check network connectivity and the API base URL".to_string()
            }
            CollectorError::ApiStatus { status, .. } if status == "REQUEST_DENIED" => {
                "Verify the API key and that the Places API is enabled for it".to_string()
            }
            CollectorError::ApiStatus { status, .. } if status == "OVER_QUERY_LIMIT" => {
                "Wait for the quota to reset or lower --max-results".to_string()
            }
            CollectorError::ApiStatus { .. } => "Retry later".to_string(),
            CollectorError::Io(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            CollectorError::Serialization(_) => {
                "Make sure the file is a JSON array of business records".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration error: {}", self),
            ErrorCategory::Persistence => format!("Could not read or write results: {}", self),
            _ => format!("Places API error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, CollectorError>;
