use thiserror::Error;

/// Failures a wallet provider interaction can surface.
///
/// All of these are handled inside the session manager: they are reported
/// through transient notices, never propagated to callers as panics.
#[derive(Error, Debug)]
pub enum SessionError {
    /// No wallet capability object is present. A normal condition, not a bug.
    #[error("no wallet provider available")]
    ProviderUnavailable,

    /// The user declined the connection prompt.
    #[error("wallet connection rejected by user")]
    UserRejected,

    /// Any HTTP or RPC failure talking to the provider.
    #[error("provider request failed: {0}")]
    NetworkFailure(String),

    /// A response that arrived after a state transition invalidated it.
    /// Discarded silently, never reported to the user.
    #[error("response arrived for a stale session generation")]
    StaleResponse,
}

impl From<reqwest::Error> for SessionError {
    fn from(err: reqwest::Error) -> Self {
        SessionError::NetworkFailure(err.to_string())
    }
}
