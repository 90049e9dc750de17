use thiserror::Error;

pub type Result<T> = std::result::Result<T, SweepError>;

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// A bounded wait expired before the element became visible.
    /// Callers decide whether this means "feature absent" or "retry".
    #[error("timed out waiting for {0}")]
    WaitTimeout(String),

    #[error("run cancelled")]
    Cancelled,

    #[error("webdriver: {0}")]
    Driver(#[from] thirtyfour::error::WebDriverError),

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl SweepError {
    pub fn other(msg: impl Into<String>) -> Self {
        SweepError::Other(msg.into())
    }
}
