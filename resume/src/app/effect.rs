use super::Action;
use resume_core::{
    api,
    session::{Call, Operation},
};
use std::time::Duration;

/// Connections to external services that effects use. We keep these around to
/// share connections across calls for the app as a whole.
pub struct EffectContext {
    /// an HTTP client with reqwest
    http: reqwest::Client,
}

impl EffectContext {
    /// Get a new `EffectContext`. Every request gives up after `timeout`, so
    /// a stalled server always ends in `Action::Failed` and the operation can
    /// be tried again.
    ///
    /// ## Errors
    ///
    /// If the HTTP client can't be set up (e.g. no TLS backend available.)
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self {
            http: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }
}

/// Things that can happen as a result of user input. Side effects!
#[derive(Debug, PartialEq)]
pub enum Effect {
    /// Make a call to the API
    Send(Call),
}

impl Effect {
    /// Perform the side-effectful portions of this effect, returning the next
    /// `Action` the application needs to handle
    pub async fn run(self, conn: &EffectContext) -> Action {
        let Self::Send(call) = self;
        let op = call.operation();

        match Self::run_inner(call, conn).await {
            Ok(action) => action,
            Err(problem) => {
                tracing::error!(?op, ?problem, "problem running effect");
                Action::Failed(op, problem.to_string())
            }
        }
    }

    /// The actual implementation of `run`, but with a `Result` wrapper to make
    /// it more ergonomic to write.
    async fn run_inner(call: Call, conn: &EffectContext) -> Result<Action, Problem> {
        match call {
            Call::Register(client, req) => {
                tracing::info!("signing up");

                let body = client.signup(&conn.http, &req).await?;

                Ok(Action::Succeeded(Operation::Register, body))
            }

            Call::Authenticate(client, req) => {
                tracing::info!("logging in");

                let logged_in = client.login(&conn.http, &req).await?;

                Ok(Action::LoggedIn(logged_in))
            }

            Call::SubmitResumeText(client, req) => {
                tracing::info!(chars = req.resume_text.len(), "parsing resume");

                let body = client.parse(&conn.http, &req).await?;

                Ok(Action::Succeeded(Operation::SubmitResumeText, body))
            }
        }
    }
}

/// Problems that can happen while running an `Effect`.
#[derive(Debug, thiserror::Error)]
pub enum Problem {
    /// We had a problem communicating with the server, for example because it
    /// was down or rejected our credentials.
    #[error(transparent)]
    Api(#[from] api::Error),
}

#[cfg(test)]
mod test {
    use super::*;
    use resume_core::api::{signup, Client};
    use tokio::net::TcpListener;

    fn context() -> EffectContext {
        EffectContext::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn unreachable_server_reports_failure() {
        let port = {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };

        let effect = Effect::Send(Call::Register(
            Client::new(format!("http://127.0.0.1:{port}")),
            signup::Req::new("a@b.com".into(), "p".into()),
        ));

        match effect.run(&context()).await {
            Action::Failed(Operation::Register, message) => assert!(!message.is_empty()),
            other => panic!("expected a failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn bad_url_reports_failure() {
        let effect = Effect::Send(Call::Register(
            Client::new("not a url".into()),
            signup::Req::new("a@b.com".into(), "p".into()),
        ));

        match effect.run(&context()).await {
            Action::Failed(Operation::Register, message) => {
                assert!(message.starts_with("URL error"), "{message}");
            }
            other => panic!("expected a failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn stalled_server_times_out() {
        // Accept connections but never answer them.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let effect = Effect::Send(Call::Register(
            Client::new(format!("http://{addr}")),
            signup::Req::new("a@b.com".into(), "p".into()),
        ));
        let context = EffectContext::new(Duration::from_millis(200)).unwrap();

        let action = tokio::time::timeout(Duration::from_secs(5), effect.run(&context))
            .await
            .expect("request should give up on its own");

        assert!(
            matches!(action, Action::Failed(Operation::Register, _)),
            "expected a failure, got {action:?}"
        );
    }
}
