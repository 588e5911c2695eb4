use thiserror::Error;

/// Main error type for construct engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Construct not found: {construct_id} (instance '{instance_name}')")]
    ConstructNotFound {
        construct_id: String,
        instance_name: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File system error: {0}")]
    FileSystem(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
