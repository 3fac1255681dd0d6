use thiserror::Error;

#[derive(Error, Debug)]
pub enum SitepadError {
    /// Bad or missing input. Nothing was mutated.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The target of an update does not exist. Nothing was mutated.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

impl SitepadError {
    /// HTTP-style status code for the gateway's structured `{error}` replies.
    pub fn status_code(&self) -> u16 {
        match self {
            SitepadError::Validation(_) => 400,
            SitepadError::NotFound(_) => 404,
            _ => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, SitepadError>;
