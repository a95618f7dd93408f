use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Cannot fit a standardizer on an empty batch")]
    EmptyBatch,

    #[error("Invalid track: {0}")]
    InvalidTrack(String),

    #[error("Invalid value for feature '{field}': {value}")]
    InvalidFeature { field: String, value: String },

    #[error("Too few tracks to cluster: need at least {required}, got {actual}")]
    TooFewTracks { required: usize, actual: usize },

    #[error("Invalid cluster count: {0}")]
    InvalidClusterCount(usize),

    #[error("Classification error: {0}")]
    Classification(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
