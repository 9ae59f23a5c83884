use serde::{Deserialize, Serialize};

/// The request to log into the server. This is sent form-encoded, not as
/// JSON, so the field names follow OAuth2 password flow conventions.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Req {
    /// The account's email address.
    pub username: String,

    /// Plaintext password.
    pub password: String,
}

/// The parts of the login response we need to read.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resp {
    /// Bearer token to use for future requests.
    pub access_token: String,

    /// Usually `bearer`.
    #[serde(default)]
    pub token_type: Option<String>,
}

/// A successful login: the token plus the full body the server sent.
#[derive(Debug, PartialEq)]
pub struct LoggedIn {
    /// Bearer token to use for future requests.
    pub token: String,

    /// Everything the server returned, for display.
    pub body: serde_json::Value,
}

/// Where the login endpoint lives.
pub const PATH: &str = "/api/v1/login/access-token";
