use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Registry load failed: {0}")]
    RegistryLoad(String),

    #[error("Notice has no identifier: '{0}'")]
    MissingIdentifier(String),

    #[error("Invalid classification: {0}")]
    InvalidClassification(String),

    #[error("Invalid entity kind: {0}")]
    InvalidEntityKind(String),

    #[error("Invalid mapping method: {0}")]
    InvalidMappingMethod(String),
}

pub type Result<T> = std::result::Result<T, Error>;
