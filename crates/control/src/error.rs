use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("please check request params, no params configured")]
    EmptyPatch,

    #[error("unrecognized log level: {value:?}")]
    InvalidLevel { value: String },

    #[error("service log level entry {index} ({service:?}): unrecognized log level {value:?}")]
    InvalidServiceLevel {
        index: usize,
        service: String,
        value: String,
    },

    #[error("service log level entry {index}: service name must not be empty")]
    InvalidServiceName { index: usize },

    #[error("no log level override for service: {service}")]
    OverrideNotFound { service: String },

    #[error("service has never been referenced: {service}")]
    ServiceNotFound { service: String },

    #[error("log config unavailable: {message}")]
    ConfigUnavailable { message: String },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("{message}")]
    Message { message: String },
}

impl Error {
    #[must_use]
    pub fn invalid_level(value: impl Into<String>) -> Self {
        Self::InvalidLevel {
            value: value.into(),
        }
    }

    #[must_use]
    pub fn override_not_found(service: impl Into<String>) -> Self {
        Self::OverrideNotFound {
            service: service.into(),
        }
    }

    #[must_use]
    pub fn service_not_found(service: impl Into<String>) -> Self {
        Self::ServiceNotFound {
            service: service.into(),
        }
    }

    #[must_use]
    pub fn config_unavailable(message: impl Into<String>) -> Self {
        Self::ConfigUnavailable {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }

    /// True when the request itself was at fault rather than the
    /// store or configuration backend.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyPatch
                | Self::InvalidLevel { .. }
                | Self::InvalidServiceLevel { .. }
                | Self::InvalidServiceName { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
