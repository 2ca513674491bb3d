/// Convenience result type used across earthwall.
pub type EarthwallResult<T> = Result<T, EarthwallError>;

/// Top-level error taxonomy used by the fetch-and-compose pipeline.
#[derive(thiserror::Error, Debug)]
pub enum EarthwallError {
    /// Invalid configuration or caller-provided values.
    #[error("config error: {0}")]
    Config(String),

    /// The metadata source could not be reached or returned an unreadable payload.
    #[error("metadata error: {0}")]
    Metadata(String),

    /// Concurrent tile work could not be launched or produced an inconsistent canvas.
    #[error("compose error: {0}")]
    Compose(String),

    /// Encoding or writing the final image failed.
    #[error("publish error: {0}")]
    Publish(String),

    /// The desktop wallpaper backend rejected the request.
    #[error("sink error: {0}")]
    Sink(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EarthwallError {
    /// Build a [`EarthwallError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`EarthwallError::Metadata`] value.
    pub fn metadata(msg: impl Into<String>) -> Self {
        Self::Metadata(msg.into())
    }

    /// Build a [`EarthwallError::Compose`] value.
    pub fn compose(msg: impl Into<String>) -> Self {
        Self::Compose(msg.into())
    }

    /// Build a [`EarthwallError::Publish`] value.
    pub fn publish(msg: impl Into<String>) -> Self {
        Self::Publish(msg.into())
    }

    /// Build a [`EarthwallError::Sink`] value.
    pub fn sink(msg: impl Into<String>) -> Self {
        Self::Sink(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
