//! Error types for kvshim

use crate::handle::Dependency;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, KvShimError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KvShimError {
    /// The dependency could not be reached at startup and stays down for the
    /// lifetime of the process.
    #[error("{0} service unavailable")]
    Unavailable(Dependency),

    /// A call against a live handle failed. Not retried.
    #[error("{dependency} error: {message}")]
    Transient {
        dependency: Dependency,
        message: String,
    },

    #[error("Key '{0}' not found")]
    NotFound(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl KvShimError {
    pub fn transient(dependency: Dependency, message: impl Into<String>) -> Self {
        KvShimError::Transient {
            dependency,
            message: message.into(),
        }
    }
}

impl From<redis::RedisError> for KvShimError {
    fn from(e: redis::RedisError) -> Self {
        KvShimError::transient(Dependency::Redis, e.to_string())
    }
}

impl From<sqlx::Error> for KvShimError {
    fn from(e: sqlx::Error) -> Self {
        KvShimError::transient(Dependency::Postgres, e.to_string())
    }
}

impl From<config::ConfigError> for KvShimError {
    fn from(e: config::ConfigError) -> Self {
        KvShimError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_dependency_and_detail() {
        assert_eq!(
            KvShimError::Unavailable(Dependency::Redis).to_string(),
            "Redis service unavailable"
        );
        assert_eq!(
            KvShimError::transient(Dependency::Postgres, "connection reset").to_string(),
            "PostgreSQL error: connection reset"
        );
        assert_eq!(
            KvShimError::NotFound("foo".into()).to_string(),
            "Key 'foo' not found"
        );
    }

    #[test]
    fn test_client_errors_convert_to_transient() {
        let e: KvShimError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(
            e,
            KvShimError::Transient {
                dependency: Dependency::Postgres,
                ..
            }
        ));

        let e: KvShimError =
            redis::RedisError::from((redis::ErrorKind::IoError, "Connection refused")).into();
        assert!(matches!(
            e,
            KvShimError::Transient {
                dependency: Dependency::Redis,
                ..
            }
        ));
    }
}
