//! Request authentication
//!
//! Tally authenticates every call, including the `/users/me` self-lookup,
//! with the same bearer token taken from configuration.

use reqwest::RequestBuilder;

/// Authenticator applied to every outgoing request
#[derive(Debug, Clone)]
pub enum Authenticator {
    /// No authentication (tests only)
    None,
    /// Bearer token in the Authorization header
    Bearer { token: String },
}

impl Authenticator {
    /// Create a bearer-token authenticator
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Apply authentication to a request builder
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        match self {
            Self::None => req,
            Self::Bearer { token } => req.bearer_auth(token),
        }
    }
}
