//! Server error types with recovery suggestions.

use std::io;

use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    /// Server configuration is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to bind to the specified address.
    #[error("Failed to bind to {address}: {source}")]
    BindError {
        address: String,
        #[source]
        source: io::Error,
    },

    /// The server stopped with an IO error.
    #[error("Runtime error: {0}")]
    Runtime(#[source] io::Error),
}

impl ServerError {
    /// Creates a bind error with address context.
    pub fn bind_error(address: impl ToString, source: io::Error) -> Self {
        Self::BindError {
            address: address.to_string(),
            source,
        }
    }

    /// Whether changing `HOST`/`PORT` or the environment may let a retry succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::BindError { .. }) && self.suggestion().is_some()
    }

    /// Hint for the bind failures this server can hit.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidConfig(_) => {
                Some("Check the --host, --port and --shutdown-timeout values")
            }
            Self::BindError { source, .. } => match source.kind() {
                io::ErrorKind::AddrInUse => {
                    Some("Another process holds the port; set PORT to a free one")
                }
                io::ErrorKind::PermissionDenied => {
                    Some("Ports below 1024 need elevated privileges; set PORT above 1024")
                }
                io::ErrorKind::AddrNotAvailable => {
                    Some("HOST is not an address of this machine; use 0.0.0.0 or a local address")
                }
                _ => None,
            },
            Self::Runtime(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_in_use_is_recoverable() {
        let error = ServerError::bind_error(
            "0.0.0.0:8080",
            io::Error::new(io::ErrorKind::AddrInUse, "address in use"),
        );

        assert!(error.is_recoverable());
        assert!(error.suggestion().is_some());
        assert!(error.to_string().contains("0.0.0.0:8080"));
    }

    #[test]
    fn invalid_config_is_not_recoverable() {
        let error = ServerError::InvalidConfig("port must not be 0".to_owned());

        assert!(!error.is_recoverable());
        assert!(error.suggestion().is_some());
    }

    #[test]
    fn permission_denied_bind_suggests_higher_port() {
        let error = ServerError::bind_error(
            "0.0.0.0:80",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );

        assert!(error.is_recoverable());
        assert!(error.suggestion().is_some_and(|s| s.contains("PORT")));
    }

    #[test]
    fn runtime_errors_have_no_suggestion() {
        let error = ServerError::Runtime(io::Error::other("boom"));

        assert!(!error.is_recoverable());
        assert!(error.suggestion().is_none());
    }
}
