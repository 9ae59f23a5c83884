use super::error::{self, Error};
use super::{login, parse, signup};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// Client for the resume agent API
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Client {
    /// The server to connect to, e.g. `http://localhost:8000`. Endpoint paths
    /// are appended to this, so a path prefix (like `/backend`) is kept.
    pub server: String,

    /// Bearer token. Set this by logging in.
    pub auth: Option<String>,
}

impl Client {
    /// Construct a new client
    pub fn new(server: String) -> Self {
        Self { server, auth: None }
    }

    /// Get the full URL for an endpoint path.
    ///
    /// ## Errors
    ///
    /// If the server plus path is not a valid URL.
    pub fn url(&self, path: &str) -> error::Result<Url> {
        let base = self.server.trim_end_matches('/');

        Ok(Url::parse(&format!("{base}{path}"))?)
    }

    /// Build (but do not send) a request to register a new account.
    ///
    /// ## Errors
    ///
    /// If the server URL is invalid.
    pub fn signup_request(
        &self,
        client: &reqwest::Client,
        req: &signup::Req,
    ) -> error::Result<RequestBuilder> {
        Ok(client.post(self.url(signup::PATH)?).json(req))
    }

    /// Register a new account. This does not log in.
    ///
    /// ## Errors
    ///
    /// Errors are the same as `handle_response`.
    pub async fn signup(&self, client: &reqwest::Client, req: &signup::Req) -> error::Result<Value> {
        Self::handle_response(self.signup_request(client, req)?).await
    }

    /// Build (but do not send) a login request. The body is form-encoded.
    ///
    /// ## Errors
    ///
    /// If the server URL is invalid.
    pub fn login_request(
        &self,
        client: &reqwest::Client,
        req: &login::Req,
    ) -> error::Result<RequestBuilder> {
        Ok(client.post(self.url(login::PATH)?).form(req))
    }

    /// Log into the server, getting a token and the full response body.
    ///
    /// ## Errors
    ///
    /// Errors are the same as `handle_response`, plus `Error::MissingToken`
    /// if the response has no non-empty `access_token`.
    pub async fn login(
        &self,
        client: &reqwest::Client,
        req: &login::Req,
    ) -> error::Result<login::LoggedIn> {
        let body: Value = Self::handle_response(self.login_request(client, req)?).await?;

        match login::Resp::deserialize(&body) {
            Ok(resp) if !resp.access_token.is_empty() => Ok(login::LoggedIn {
                token: resp.access_token,
                body,
            }),
            _ => Err(Error::MissingToken),
        }
    }

    /// Build (but do not send) a request to parse resume text.
    ///
    /// ## Errors
    ///
    /// `Error::Unauthenticated` if we have not logged in, or an error if the
    /// server URL is invalid.
    pub fn parse_request(
        &self,
        client: &reqwest::Client,
        req: &parse::Req,
    ) -> error::Result<RequestBuilder> {
        let url = self.url(parse::PATH)?;

        self.authenticated(|token| client.post(url).bearer_auth(token).json(req))
    }

    /// Send resume text to be parsed.
    ///
    /// ## Errors
    ///
    /// Errors are the same as `parse_request` and `handle_response`.
    pub async fn parse(&self, client: &reqwest::Client, req: &parse::Req) -> error::Result<Value> {
        Self::handle_response(self.parse_request(client, req)?).await
    }

    fn authenticated<CB>(&self, cb: CB) -> error::Result<RequestBuilder>
    where
        CB: FnOnce(&str) -> RequestBuilder,
    {
        match &self.auth {
            Some(auth) if !auth.is_empty() => Ok(cb(auth)),
            _ => Err(Error::Unauthenticated),
        }
    }

    /// Send a request and interpret the response in a standard way.
    ///
    /// ## Errors
    ///
    /// - `Error::Http` if the request could not be sent or the body could not
    ///   be read
    /// - `Error::Status` if the server returned anything other than a 2xx
    /// - `Error::Json` if a 2xx body is not valid JSON for `T`
    async fn handle_response<T>(req: RequestBuilder) -> error::Result<T>
    where
        T: DeserializeOwned,
    {
        let resp = req.send().await?;

        let status = resp.status();

        if status.is_success() {
            let bytes = resp.bytes().await?;

            Ok(serde_json::from_slice(&bytes)?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            tracing::debug!(%status, "server returned an error status");

            Err(Error::Status { status, body })
        }
    }
}
