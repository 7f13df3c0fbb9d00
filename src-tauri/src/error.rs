use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptDeckError {
    #[error("Keychain error: {0}")]
    Keychain(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Request to {url} failed: {reason}")]
    Http { url: String, reason: String },

    #[error("API error {status} from {url}: {body}")]
    Api { url: String, status: u16, body: String },

    #[error("Failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("Run cancelled")]
    Cancelled,

    #[error("Run failed: {0}")]
    Run(String),
}

impl From<PromptDeckError> for String {
    fn from(err: PromptDeckError) -> Self {
        err.to_string()
    }
}
