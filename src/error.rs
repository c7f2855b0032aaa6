use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Catalog parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Catalog CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Invalid price bucket: '{0}'")]
    InvalidBucket(String),

    #[error("{0}")]
    Other(String),
}
