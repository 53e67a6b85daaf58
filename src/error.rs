use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodeCartError {
    #[error("Not in a codecart project. Run 'codecart init' first.")]
    NotInitialized,

    #[error("Already initialized. Remove .codecart/ to reinitialize.")]
    AlreadyInitialized,

    #[error("Tracker is locked. Run 'codecart unlock' first.")]
    Locked,

    #[error("Incorrect passcode")]
    IncorrectPasscode,

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Ambiguous id '{0}' matches more than one item")]
    AmbiguousId(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CodeCartError>;
