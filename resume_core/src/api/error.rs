use reqwest::StatusCode;
use thiserror::Error;

/// Easy alias for error handling
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can happen while making requests
#[derive(Debug, Error)]
pub enum Error {
    /// We couldn't parse a URL, for example if the base URL was invalid.
    #[error("URL error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// We couldn't talk to the server at all, for example because it's not
    /// running or the connection dropped.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered, but not with a success status. We keep whatever
    /// it said so the user can see it.
    #[error("server returned {status}: {body}")]
    Status {
        /// The non-2xx status
        status: StatusCode,

        /// The response body, as text
        body: String,
    },

    /// The server returned something we couldn't read as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A login succeeded but there was no usable token in the response.
    #[error("login response did not contain an access token")]
    MissingToken,

    /// We tried to make an authenticated call without logging in first.
    #[error("not logged in")]
    Unauthenticated,
}
