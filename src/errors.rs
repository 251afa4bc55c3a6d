use std::fmt;

use crate::net::Method;

/// Boxed cause of a failed fetch attempt.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Broad category of a failed fetch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The network call itself failed (DNS, connect, TLS, reading the body...)
    Transport,
    /// The response body was not valid JSON
    Decode,
    /// The request payload could not be serialized
    Encode,
    /// Anything else: unresolvable URL, invalid header value...
    Other,
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FetchErrorKind::Transport => "transport",
            FetchErrorKind::Decode => "decode",
            FetchErrorKind::Encode => "encode",
            FetchErrorKind::Other => "other",
        };
        f.write_str(s)
    }
}

/// Error returned by the fetcher when a call could not be completed.
///
/// The message is deliberately generic. The underlying cause is available
/// through [`std::error::Error::source`] and is also written to the log at the
/// moment the call fails.
#[derive(Debug, thiserror::Error)]
#[error("Bad fetcher call: {method} {url} ({kind} error)")]
pub struct FetchError {
    kind: FetchErrorKind,
    method: Method,
    url: String,
    #[source]
    source: BoxError,
}

impl FetchError {
    pub fn new(kind: FetchErrorKind, method: Method, url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            kind,
            method,
            url: url.into(),
            source: source.into(),
        }
    }

    pub fn kind(&self) -> FetchErrorKind {
        self.kind
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// URL as passed by the caller (before resolving against any base URL)
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_transport(&self) -> bool {
        self.kind == FetchErrorKind::Transport
    }

    pub fn is_decode(&self) -> bool {
        self.kind == FetchErrorKind::Decode
    }
}
