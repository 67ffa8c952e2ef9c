//! Catalog error types
//!
//! Every failure of the catalog path ends up as one of these variants. None
//! of them is fatal: the session stores the message and stays usable.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Non-2xx response (`status` set) or transport failure (`status` empty)
    #[error("{}", network_message(*status, message))]
    Network {
        status: Option<u16>,
        message: String,
    },

    #[error("Malformed catalog page: {message}")]
    Decode { message: String },

    #[error("A catalog request is already in progress")]
    Busy,

    #[error("Catalog session is closed")]
    Closed,

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

fn network_message(status: Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("HTTP error {code}: {message}"),
        None => format!("HTTP request failed: {message}"),
    }
}

impl CatalogError {
    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        Self::Network {
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Network {
            status: None,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// HTTP status carried by a network error
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Network { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether re-triggering the same request by hand can succeed
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Network { status, .. } => match status {
                Some(code) => *code >= 500 || *code == 408 || *code == 429,
                None => true,
            },
            Self::Decode { .. } => true,
            Self::Busy => true,
            Self::Closed => false,
            Self::Configuration { .. } => false,
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(error: serde_json::Error) -> Self {
        Self::decode(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_messages_mention_status() {
        let err = CatalogError::http_status(503, "Service Unavailable");
        assert_eq!(err.to_string(), "HTTP error 503: Service Unavailable");
        assert_eq!(err.status(), Some(503));

        let err = CatalogError::transport("connection reset");
        assert_eq!(err.to_string(), "HTTP request failed: connection reset");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn client_errors_are_not_recoverable() {
        assert!(!CatalogError::http_status(401, "Unauthorized").is_recoverable());
        assert!(CatalogError::http_status(502, "Bad Gateway").is_recoverable());
        assert!(CatalogError::http_status(429, "Too Many Requests").is_recoverable());
        assert!(!CatalogError::Closed.is_recoverable());
    }

    #[test]
    fn json_errors_become_decode_errors() {
        let err: CatalogError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, CatalogError::Decode { .. }));
    }
}
