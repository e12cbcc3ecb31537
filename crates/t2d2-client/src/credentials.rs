//! Credential modes for API authentication

/// How the client authenticates against the API.
///
/// Exactly one mode is in effect per client; the modes cannot be combined.
#[derive(Clone, Debug)]
pub enum Credentials {
    /// Pre-issued token, sent as `Authorization: Bearer <token>`. No
    /// network call is made during login.
    AccessToken {
        /// The bearer token
        access_token: String,
    },
    /// Email/password pair exchanged for a bearer token via
    /// `POST user/login`.
    Password {
        /// Account email
        email: String,
        /// Account password
        password: String,
    },
    /// Static key, sent as `x-api-key` on every request.
    ApiKey {
        /// The API key
        api_key: String,
    },
    /// No authentication. Protected endpoints will be rejected by the
    /// remote API itself.
    None,
}

impl Credentials {
    /// Bearer-token credentials
    pub fn access_token(token: impl Into<String>) -> Self {
        Self::AccessToken {
            access_token: token.into(),
        }
    }

    /// Email/password credentials
    pub fn password(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Password {
            email: email.into(),
            password: password.into(),
        }
    }

    /// API-key credentials
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey {
            api_key: key.into(),
        }
    }
}
