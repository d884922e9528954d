use thiserror::Error;

/// Why a page fetch failed.
///
/// The loader treats every variant the same way; the distinction only
/// matters for the message shown to the user and for logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Transport-level failure: DNS, connect, timeout, reset.
    #[error("network failure: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("server error ({status}): {body}")]
    Server { status: u16, body: String },

    /// The body was not a JSON array of records.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Bodies are decoded by `serde_json`, not reqwest, so any error reqwest
/// itself reports happened in transport.
impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_message_includes_status() {
        let e = FetchError::Server {
            status: 503,
            body: "maintenance".into(),
        };
        assert_eq!(e.to_string(), "server error (503): maintenance");
    }

    #[test]
    fn malformed_message_is_prefixed() {
        let e = FetchError::Malformed("expected array".into());
        assert!(e.to_string().starts_with("malformed response"));
    }
}
