//! Client error model.

use thiserror::Error;

/// Failure of a gateway call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The request did not complete: connection, timeout, or a response body
    /// that could not be decoded.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    ///
    /// `message` is the `error` field of the body, when there was a usable one.
    #[error("API error ({status})")]
    Api { status: u16, message: Option<String> },

    /// The request could not be built, so nothing was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl GatewayError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: Some(message.into()),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Text to show the user: the server's message if it sent one, otherwise
    /// `transport_message` for transport errors and `api_fallback` for the rest.
    pub fn user_message(&self, api_fallback: &str, transport_message: &str) -> String {
        match self {
            Self::Transport(_) => transport_message.to_string(),
            Self::Api {
                message: Some(m), ..
            } => m.clone(),
            Self::Api { message: None, .. } | Self::InvalidRequest(_) => api_fallback.to_string(),
        }
    }
}

/// Invalid configuration value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: expected a whole number of seconds, got {value:?}")]
    InvalidSeconds { var: &'static str, value: String },

    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_prefers_server_text() {
        let err = GatewayError::api(500, "locked");
        assert_eq!(err.user_message("Failed to delete item", "net"), "locked");
    }

    #[test]
    fn user_message_falls_back_per_kind() {
        let api = GatewayError::Api {
            status: 502,
            message: None,
        };
        assert_eq!(api.user_message("Failed to add item", "net"), "Failed to add item");

        let transport = GatewayError::transport("connection refused");
        assert!(transport.is_transport());
        assert_eq!(transport.user_message("Failed to add item", "net"), "net");

        let unsent = GatewayError::InvalidRequest("unusable path segment \"..\"".into());
        assert!(!unsent.is_transport());
        assert_eq!(unsent.user_message("Failed to delete item", "net"), "Failed to delete item");
    }
}
