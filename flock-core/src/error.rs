use flock_client::ApiError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("graph has no nodes; nothing to analyze")]
    EmptyGraph,

    #[error("graph is disconnected; average distance and diameter are undefined")]
    Disconnected,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
