use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("unknown datum index {index} (data length {len})")]
    UnknownDatum { index: usize, len: usize },

    #[error("listener with id `{0}` is already registered")]
    DuplicateListener(String),
}
