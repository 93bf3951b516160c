use thiserror::Error;

#[derive(Error, Debug)]
pub enum LizbotError {
    /// Inbound update carried neither text nor a location (or lacked a chat).
    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    /// A content provider failed or had nothing to return.
    #[error("Content unavailable: {0}")]
    ContentUnavailable(String),

    /// The conversation store could not complete a read or write.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl LizbotError {
    pub fn content(msg: impl Into<String>) -> Self {
        Self::ContentUnavailable(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, LizbotError>;
